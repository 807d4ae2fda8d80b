//! LED matrix column driver trait

/// Trait for the electrical side of a column-scanned LED matrix
///
/// The multiplexer calls these in a fixed order per scan step:
/// `deselect` the old column, `write_rows` for the new column, then
/// `select` it. Implementations must not block; they run at interrupt
/// priority.
pub trait ColumnDriver {
    /// Number of column select lines
    fn columns(&self) -> usize;

    /// Drive a column's select line to its "off" state
    fn deselect(&mut self, column: usize);

    /// Enable a column's select line
    fn select(&mut self, column: usize);

    /// Drive the row lines, LSB on the first row
    ///
    /// `rows` is already masked to the LEDs wired on the column about to
    /// be selected.
    fn write_rows(&mut self, rows: u8);

    /// Turn every column off
    fn blank(&mut self) {
        for column in 0..self.columns() {
            self.deselect(column);
        }
    }
}
