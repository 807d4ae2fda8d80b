//! Flash storage driver for RP2040
//!
//! Wear-leveled key-value storage in the last 64KB of flash, built on
//! sequential-storage. The CYW43 firmware blobs live at 1MB and 1.25MB,
//! well below this partition.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use ntpclock_hal::flash::{FlashError, FlashStorage, StorageKey};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// 2MB flash on the Pico W
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
/// Size of the config partition
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the config partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch space for one stored item, key and header included
const ITEM_BUFFER: usize = 512;

/// RP2040 flash storage
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    async fn fetch<'b>(
        &mut self,
        key: StorageKey,
        scratch: &'b mut [u8],
    ) -> Result<Option<&'b [u8]>, FlashError> {
        map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            scratch,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}

impl FlashStorage for Rp2040FlashStorage<'_> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut scratch = [0u8; ITEM_BUFFER];
        let data = self
            .fetch(key, &mut scratch)
            .await?
            .ok_or(FlashError::NotFound)?;

        let out = buffer
            .get_mut(..data.len())
            .ok_or(FlashError::BufferTooSmall)?;
        out.copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.len() > ITEM_BUFFER / 2 {
            return Err(FlashError::Full);
        }
        let mut scratch = [0u8; ITEM_BUFFER];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        let mut scratch = [0u8; ITEM_BUFFER];
        matches!(self.fetch(key, &mut scratch).await, Ok(Some(_)))
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        self.flash
            .erase(CONFIG_RANGE.start, CONFIG_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}
