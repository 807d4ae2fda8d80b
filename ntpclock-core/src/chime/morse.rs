//! Morse digit encoding
//!
//! Digits are five symbols each. Timing is in units of one dot:
//! a dash is three units, symbols are separated by one unit, characters
//! by five, and words by a further ten.

use heapless::Vec;

use crate::display::{COLUMNS, PM_FLAG};

/// Length of one dot (milliseconds)
pub const MORSE_DOT_MS: u16 = 60;

/// Longest sequence: an IPv4 address, twelve digits
pub const MAX_TONES: usize = 128;

const DASH_UNITS: u16 = 3;
const SYMBOL_GAP_UNITS: u16 = 1;
const CHAR_GAP_UNITS: u16 = 5;
const WORD_GAP_UNITS: u16 = 10;
/// Gap between the two hour digits of the hourly chime
const CHIME_GAP_UNITS: u16 = 3;

/// Digits 0-9, LSB sent first, 1 = dot
const DIGITS: [u8; 10] = [0x00, 0x01, 0x03, 0x07, 0x0f, 0x1f, 0x1e, 0x1c, 0x18, 0x10];

/// Beeper on or off for a fixed time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub on: bool,
    pub duration_ms: u16,
}

/// A sequence of tones ready to play
#[derive(Debug, Clone, Default)]
pub struct Morse {
    tones: Vec<Tone, MAX_TONES>,
}

impl Morse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one digit (values above 9 are ignored)
    pub fn digit(&mut self, digit: u8) -> &mut Self {
        let Some(&code) = DIGITS.get(usize::from(digit)) else {
            return self;
        };

        let mut bits = code;
        for _ in 0..5 {
            let units = if bits & 1 != 0 { 1 } else { DASH_UNITS };
            self.push(true, units);
            self.gap(SYMBOL_GAP_UNITS);
            bits >>= 1;
        }
        self
    }

    /// Append silence, merged into any silence already at the end
    pub fn gap(&mut self, units: u16) -> &mut Self {
        self.push(false, units);
        self
    }

    fn push(&mut self, on: bool, units: u16) {
        let duration_ms = units * MORSE_DOT_MS;
        if let Some(last) = self.tones.last_mut() {
            if !on && !last.on {
                last.duration_ms += duration_ms;
                return;
            }
        }
        // Capacity covers the longest sequence built here
        let _ = self.tones.push(Tone { on, duration_ms });
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tone> {
        self.tones.iter()
    }

    /// Total play time (milliseconds)
    pub fn duration_ms(&self) -> u32 {
        self.tones.iter().map(|t| u32::from(t.duration_ms)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

/// The hour, two digits, from the displayed columns
pub fn hour_chime(digits: &[u8; COLUMNS]) -> Morse {
    let mut morse = Morse::new();
    morse
        .digit(digits[0] & !PM_FLAG)
        .gap(CHIME_GAP_UNITS)
        .digit(digits[1]);
    morse
}

/// Hours and minutes from the displayed columns
pub fn time_in_morse(digits: &[u8; COLUMNS]) -> Morse {
    let mut morse = Morse::new();
    for (column, &digit) in digits.iter().take(4).enumerate() {
        let digit = if column == 0 { digit & !PM_FLAG } else { digit };
        morse.digit(digit).gap(CHAR_GAP_UNITS);
        if column == 1 {
            morse.gap(WORD_GAP_UNITS);
        }
    }
    morse
}

fn append_number(morse: &mut Morse, n: u8) {
    let hundreds = n / 100;
    if hundreds != 0 {
        morse.digit(hundreds).gap(CHAR_GAP_UNITS);
    }
    morse.digit(n / 10 % 10).gap(CHAR_GAP_UNITS);
    morse.digit(n % 10).gap(CHAR_GAP_UNITS);
}

/// A number 0-255; the hundreds digit is skipped when zero
pub fn number_in_morse(n: u8) -> Morse {
    let mut morse = Morse::new();
    append_number(&mut morse, n);
    morse
}

/// The four octets of an IPv4 address, separated by word gaps
pub fn ip_in_morse(ip: [u8; 4]) -> Morse {
    let mut morse = Morse::new();
    for octet in ip {
        append_number(&mut morse, octet);
        morse.gap(WORD_GAP_UNITS);
    }
    morse
}
