//! GPIO LED matrix
//!
//! Four row lines carry the bit pattern of one digit; six column lines
//! select which digit is lit. Both sides may be active-low when driven
//! through transistors.

use ntpclock_core::traits::ColumnDriver;
use ntpclock_hal::{OutputPin, Polarity};

/// Row lines, LSB first
pub const MATRIX_ROWS: usize = 4;

/// Column select lines, h-h-m-m-s-s
pub const MATRIX_COLUMNS: usize = 6;

/// Column-scanned LED matrix on plain GPIO
pub struct GpioMatrix<R, C> {
    rows: [R; MATRIX_ROWS],
    columns: [C; MATRIX_COLUMNS],
    row_polarity: Polarity,
    column_polarity: Polarity,
}

impl<R: OutputPin, C: OutputPin> GpioMatrix<R, C> {
    /// Create a matrix with all rows and columns off
    pub fn new(
        rows: [R; MATRIX_ROWS],
        columns: [C; MATRIX_COLUMNS],
        row_polarity: Polarity,
        column_polarity: Polarity,
    ) -> Self {
        let mut matrix = Self {
            rows,
            columns,
            row_polarity,
            column_polarity,
        };
        matrix.write_rows(0);
        matrix.blank();
        matrix
    }
}

impl<R: OutputPin, C: OutputPin> ColumnDriver for GpioMatrix<R, C> {
    fn columns(&self) -> usize {
        MATRIX_COLUMNS
    }

    fn deselect(&mut self, column: usize) {
        if let Some(pin) = self.columns.get_mut(column) {
            pin.set_state(self.column_polarity.level(false));
        }
    }

    fn select(&mut self, column: usize) {
        if let Some(pin) = self.columns.get_mut(column) {
            pin.set_state(self.column_polarity.level(true));
        }
    }

    fn write_rows(&mut self, rows: u8) {
        for (bit, pin) in self.rows.iter_mut().enumerate() {
            pin.set_state(self.row_polarity.level(rows & (1 << bit) != 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntpclock_core::display::{DisplayBuffer, DisplayMultiplexer};

    /// Mock GPIO pin for testing
    #[derive(Debug, Default)]
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn matrix(rows: Polarity, columns: Polarity) -> GpioMatrix<MockPin, MockPin> {
        GpioMatrix::new(Default::default(), Default::default(), rows, columns)
    }

    fn row_levels(m: &GpioMatrix<MockPin, MockPin>) -> [bool; MATRIX_ROWS] {
        core::array::from_fn(|i| m.rows[i].is_set_high())
    }

    fn column_levels(m: &GpioMatrix<MockPin, MockPin>) -> [bool; MATRIX_COLUMNS] {
        core::array::from_fn(|i| m.columns[i].is_set_high())
    }

    #[test]
    fn test_starts_dark() {
        let m = matrix(Polarity::ActiveHigh, Polarity::ActiveLow);
        assert_eq!(row_levels(&m), [false; MATRIX_ROWS]);
        // Active-low columns idle high
        assert_eq!(column_levels(&m), [true; MATRIX_COLUMNS]);
    }

    #[test]
    fn test_row_bits_lsb_first() {
        let mut m = matrix(Polarity::ActiveHigh, Polarity::ActiveHigh);
        m.write_rows(0b1001);
        assert_eq!(row_levels(&m), [true, false, false, true]);

        let mut m = matrix(Polarity::ActiveLow, Polarity::ActiveHigh);
        m.write_rows(0b0011);
        assert_eq!(row_levels(&m), [false, false, true, true]);
    }

    #[test]
    fn test_select_and_deselect() {
        let mut m = matrix(Polarity::ActiveHigh, Polarity::ActiveLow);
        m.select(2);
        assert!(!m.columns[2].is_set_high());
        m.deselect(2);
        assert!(m.columns[2].is_set_high());

        // Out-of-range columns are ignored
        m.select(6);
        assert_eq!(column_levels(&m), [true; MATRIX_COLUMNS]);
    }

    #[test]
    fn test_driven_by_multiplexer() {
        let buffer = DisplayBuffer::new();
        buffer.set_digits(&[1, 2, 3, 4, 5, 6]).unwrap();
        let mut mux = DisplayMultiplexer::new(
            &buffer,
            matrix(Polarity::ActiveHigh, Polarity::ActiveHigh),
        );

        mux.scan();
        mux.scan();
        mux.scan();

        let m = mux.driver();
        assert_eq!(
            column_levels(m),
            [false, false, true, false, false, false]
        );
        assert_eq!(row_levels(m), [true, true, false, false]);
    }
}
