//! Chime sounder trait

/// On/off sounder used for the morse chime
pub trait Beeper {
    /// Start or stop the tone
    fn set_tone(&mut self, on: bool);

    /// Check if the tone is currently sounding
    fn is_sounding(&self) -> bool;
}
