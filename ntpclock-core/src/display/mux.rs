//! Column-scanning display multiplexer
//!
//! One call to [`DisplayMultiplexer::scan`] lights the next column. Called
//! a few hundred times a second, persistence of vision makes all columns
//! appear lit at once.

use super::buffer::{column_mask, DisplayBuffer, COLUMNS};
use crate::traits::ColumnDriver;

/// Scan state for a column-multiplexed LED matrix
///
/// Owns the column driver and the active column index. Only the scan
/// task touches it; the buffer is the sole state shared with other tasks.
pub struct DisplayMultiplexer<'a, D> {
    buffer: &'a DisplayBuffer,
    driver: D,
    active: usize,
}

impl<'a, D: ColumnDriver> DisplayMultiplexer<'a, D> {
    /// Create a multiplexer with every column off
    ///
    /// The first scan lights column 0.
    pub fn new(buffer: &'a DisplayBuffer, mut driver: D) -> Self {
        driver.blank();
        Self {
            buffer,
            driver,
            active: COLUMNS - 1,
        }
    }

    /// Advance to the next column and light it
    ///
    /// Rows are driven before the column is selected so the previous
    /// column's pattern never shows on the new one.
    pub fn scan(&mut self) {
        self.driver.deselect(self.active);

        self.active = (self.active + 1) % COLUMNS;

        let value = self.buffer.column(self.active).unwrap_or(0);
        self.driver.write_rows(value & column_mask(self.active));

        self.driver.select(self.active);
        self.buffer.record_scan();
    }

    /// Column currently lit
    pub fn active_column(&self) -> usize {
        self.active
    }

    /// Turn the whole display off until the next scan
    pub fn blank(&mut self) {
        self.driver.blank();
    }

    /// Access the column driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
