//! Display drivers

pub mod matrix;

pub use matrix::{GpioMatrix, MATRIX_COLUMNS, MATRIX_ROWS};
