//! Hardware abstraction traits for the WOPR board peripherals.
//!
//! Implement these for your display driver, PWM audio pin and LED strips. The
//! animation code never touches hardware directly; it receives a [`Board`]
//! and writes to whichever implementations it holds.

use crate::button::ButtonEdges;
use crate::types::Tone;
use palette::Srgb;

/// The 12-character 14-segment display.
pub trait SegmentDisplay {
    /// Shows `text` left-aligned, blank-padded or truncated to twelve columns.
    ///
    /// [`crate::fit_text`] performs the padding for implementations that need it.
    fn show(&mut self, text: &str);

    /// Blanks every segment.
    fn clear(&mut self);
}

/// Piezo or analog audio output driven by PWM.
///
/// `play` must return immediately. For bounded tones the caller waits out the
/// duration and then calls [`Buzzer::silence`]; continuous tones keep sounding
/// until the next `play` or `silence`.
pub trait Buzzer {
    /// Starts sounding `tone`, replacing any current tone.
    fn play(&mut self, tone: Tone);

    /// Stops any tone.
    fn silence(&mut self);
}

/// The five defcon LEDs along the top of the board.
pub trait DefconLeds {
    /// Sets LED `index` (0-4) to `color`. Out-of-range indices are ignored.
    fn set(&mut self, index: usize, color: Srgb);

    /// Turns every LED off.
    fn clear_all(&mut self);
}

/// Trait for abstracting RGB LED hardware.
///
/// Used for the single status pixel on the microcontroller module.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    ///
    /// Color components are in the range 0.0-1.0. Implementations should
    /// convert these to their hardware's native format and handle any
    /// hardware errors internally - this method cannot fail.
    fn set_color(&mut self, color: Srgb);
}

/// Local time of day, as kept by the real-time clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Wall-clock source for the idle clock face.
///
/// Setting the clock (network time, time zone) happens before the control
/// loop starts and is outside this crate.
pub trait WallClock {
    fn time_of_day(&mut self) -> TimeOfDay;
}

/// The peripherals an animation drives, bundled so they can be borrowed together.
pub struct Board<D, Z, L, B> {
    pub display: D,
    pub buzzer: Z,
    pub defcon: L,
    pub buttons: B,
}

impl<D, Z, L, B> Board<D, Z, L, B>
where
    D: SegmentDisplay,
    Z: Buzzer,
    L: DefconLeds,
    B: ButtonEdges,
{
    /// Bundles the peripherals.
    pub fn new(display: D, buzzer: Z, defcon: L, buttons: B) -> Self {
        Self {
            display,
            buzzer,
            defcon,
            buttons,
        }
    }
}
