//! Lock-free display buffer shared with the scan task
//!
//! Each column is a single atomic byte. The clock task and the CLI write
//! whole column values; the scan task loads them. A reader therefore
//! always sees some value that was written in full, never a mix of two.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

/// Number of display columns (h h m m s s)
pub const COLUMNS: usize = 6;

/// LEDs wired on each column, LSB at the bottom
///
/// Hour tens carries the PM flag in its top LED; minute and second tens
/// never exceed 5 and only have three.
pub const COLUMN_LEDS: [u8; COLUMNS] = [4, 4, 3, 4, 3, 4];

/// Bit mask of the LEDs available on a column
pub const fn column_mask(column: usize) -> u8 {
    ((1u16 << COLUMN_LEDS[column]) - 1) as u8
}

/// Errors from writes into the display buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Column index beyond the last column
    ColumnOutOfRange,
    /// Value needs more LEDs than the column has
    ValueTooLarge,
    /// Wrong number of digits supplied
    InvalidLength,
    /// Character is not a lowercase hex digit
    InvalidDigit,
}

/// Shared per-column display data
pub struct DisplayBuffer {
    columns: [AtomicU8; COLUMNS],
    scans: AtomicU32,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBuffer {
    /// Create an all-dark buffer
    pub const fn new() -> Self {
        Self {
            columns: [
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
            ],
            scans: AtomicU32::new(0),
        }
    }

    /// Write one column
    ///
    /// Values that do not fit the column's LEDs are rejected and the
    /// column keeps its previous value.
    pub fn set_column(&self, column: usize, value: u8) -> Result<(), DisplayError> {
        check(column, value)?;
        self.columns[column].store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Read one column
    pub fn column(&self, column: usize) -> Option<u8> {
        self.columns
            .get(column)
            .map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Write all columns
    ///
    /// Every value is checked before anything is stored, so a rejected
    /// update leaves the whole buffer untouched.
    pub fn set_digits(&self, digits: &[u8; COLUMNS]) -> Result<(), DisplayError> {
        for (column, &value) in digits.iter().enumerate() {
            check(column, value)?;
        }
        for (cell, &value) in self.columns.iter().zip(digits.iter()) {
            cell.store(value, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Snapshot of all columns
    pub fn digits(&self) -> [u8; COLUMNS] {
        let mut digits = [0u8; COLUMNS];
        for (digit, cell) in digits.iter_mut().zip(self.columns.iter()) {
            *digit = cell.load(Ordering::Relaxed);
        }
        digits
    }

    /// Count one column scan
    pub fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Column scans since boot
    pub fn scan_count(&self) -> u32 {
        self.scans.load(Ordering::Relaxed)
    }
}

fn check(column: usize, value: u8) -> Result<(), DisplayError> {
    if column >= COLUMNS {
        return Err(DisplayError::ColumnOutOfRange);
    }
    if value & !column_mask(column) != 0 {
        return Err(DisplayError::ValueTooLarge);
    }
    Ok(())
}

/// Parse six lowercase hex digits, one per column
///
/// Used by the `display` debug command. Each digit is checked against its
/// column's LED count.
pub fn parse_hex_digits(text: &str) -> Result<[u8; COLUMNS], DisplayError> {
    let bytes = text.as_bytes();
    if bytes.len() != COLUMNS {
        return Err(DisplayError::InvalidLength);
    }

    let mut digits = [0u8; COLUMNS];
    for (column, &byte) in bytes.iter().enumerate() {
        let value = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            _ => return Err(DisplayError::InvalidDigit),
        };
        check(column, value)?;
        digits[column] = value;
    }
    Ok(digits)
}
