//! Conversion from calendar time to column digits

use super::buffer::{column_mask, COLUMNS};
use crate::time::ClockTime;
use crate::traits::SwitchState;

/// PM indicator: top LED of the hour-tens column
pub const PM_FLAG: u8 = 0x08;

fn split(value: u8) -> (u8, u8) {
    (value / 10, value % 10)
}

/// Digits for hh:mm:ss
///
/// In 12-hour mode midnight and noon show as 12 and the PM flag is set in
/// the hour-tens column from 12:00 to 23:59.
pub fn time_digits(time: &ClockTime, twelve_hour: bool) -> [u8; COLUMNS] {
    let (hour, pm) = if twelve_hour {
        time.hour12()
    } else {
        (time.hour(), false)
    };

    let (h_tens, h_units) = split(hour);
    let (m_tens, m_units) = split(time.minute());
    let (s_tens, s_units) = split(time.second());

    let h_tens = if pm { h_tens | PM_FLAG } else { h_tens };

    [h_tens, h_units, m_tens, m_units, s_tens, s_units]
}

/// Digits for dd mm yy
///
/// The year-tens column only has three LEDs, so it saturates at 7.
pub fn date_digits(time: &ClockTime) -> [u8; COLUMNS] {
    let (d_tens, d_units) = split(time.day());
    let (mo_tens, mo_units) = split(time.month());
    let (y_tens, y_units) = split((time.year() % 100) as u8);

    [
        d_tens,
        d_units,
        mo_tens,
        mo_units,
        y_tens.min(column_mask(4)),
        y_units,
    ]
}

/// Digits for the current switch positions
pub fn derive_digits(time: &ClockTime, switches: SwitchState) -> [u8; COLUMNS] {
    if switches.show_date {
        date_digits(time)
    } else {
        time_digits(time, switches.twelve_hour)
    }
}
