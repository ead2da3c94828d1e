//! Color tables and the ambient color wheel.
//!
//! All colors are `palette::Srgb` (0.0-1.0 range); LED implementations convert
//! them to their native format.

use palette::Srgb;

/// Number of defcon LEDs across the top of the board.
pub const DEFCON_LEDS: usize = 5;

pub const OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);
pub const YELLOW: Srgb = Srgb::new(1.0, 1.0, 0.0);
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);
pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);

/// Urgency colors, index 0 (defcon 1, most urgent) through 4.
pub const DEFCON_COLORS: [Srgb; DEFCON_LEDS] = [WHITE, RED, YELLOW, GREEN, BLUE];

/// Position on the three-segment red → blue → green → red wheel.
///
/// `pos` is taken modulo 255, matching the board support helper the idle
/// animation was designed around.
pub fn color_wheel(pos: u32) -> Srgb {
    let pos = pos % 255;
    let (r, g, b) = if pos < 85 {
        (255 - pos * 3, 0, pos * 3)
    } else if pos < 170 {
        let pos = pos - 85;
        (0, pos * 3, 255 - pos * 3)
    } else {
        let pos = pos - 170;
        (pos * 3, 255 - pos * 3, 0)
    };
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
