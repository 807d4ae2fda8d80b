//! Console line editor

use core::fmt::{self, Write};

use heapless::String;

/// Longest accepted input line
pub const LINE_LEN: usize = 80;

const BS: u8 = 0x08;
const LF: u8 = 0x0a;
const CR: u8 = 0x0d;
const DEL: u8 = 0x7f;

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Line still being typed
    Pending,
    /// Enter pressed; the line is ready in [`LineEditor::line`]
    Complete,
}

/// Collects typed characters into a line with echo and backspace
#[derive(Debug, Default)]
pub struct LineEditor {
    buf: String<LINE_LEN>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one received byte, writing any echo to `echo`
    ///
    /// Characters beyond the line length and non-printable bytes are
    /// dropped without echo.
    pub fn feed<W: Write>(&mut self, byte: u8, echo: &mut W) -> Result<Input, fmt::Error> {
        match byte {
            CR | LF => {
                echo.write_str("\r\n")?;
                return Ok(Input::Complete);
            }
            BS | DEL => {
                if self.buf.pop().is_some() {
                    echo.write_str("\x08 \x08")?;
                }
            }
            0x20..=0x7e => {
                if self.buf.push(char::from(byte)).is_ok() {
                    echo.write_char(char::from(byte))?;
                }
            }
            _ => {}
        }
        Ok(Input::Pending)
    }

    /// Current line contents
    pub fn line(&self) -> &str {
        &self.buf
    }

    /// Start a new line
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
