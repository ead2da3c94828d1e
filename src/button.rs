//! Button identifiers, edge detection and a pin-backed button bank.
//!
//! Edges are one-shot: a button that stays held reports `rose` on exactly one
//! poll and nothing afterwards until it is released.

use embedded_hal::digital::InputPin;

/// Number of buttons on the board.
pub const BUTTON_COUNT: usize = 4;

/// The four board buttons. 1 and 2 are on the front, 3 and 4 on the back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Button1,
    Button2,
    Button3,
    Button4,
}

impl ButtonId {
    /// All buttons in dispatch order.
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::Button1,
        ButtonId::Button2,
        ButtonId::Button3,
        ButtonId::Button4,
    ];

    /// Zero-based slot of this button.
    pub fn index(self) -> usize {
        match self {
            ButtonId::Button1 => 0,
            ButtonId::Button2 => 1,
            ButtonId::Button3 => 2,
            ButtonId::Button4 => 3,
        }
    }
}

/// Source of debounced button edges.
///
/// `rose` means pressed and `fell` means released, both since the last
/// [`ButtonEdges::poll`].
pub trait ButtonEdges {
    /// Samples every button and refreshes the edge flags.
    fn poll(&mut self);

    /// Samples only `button`. Every other button keeps its state and flags,
    /// so an edge on it is still reported by the next full [`poll`](Self::poll).
    fn poll_button(&mut self, button: ButtonId);

    /// True if `button` was pressed since the last poll.
    fn rose(&self, button: ButtonId) -> bool;

    /// True if `button` was released since the last poll.
    fn fell(&self, button: ButtonId) -> bool;
}

/// Tracks one button's pressed state and reports transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    pressed: bool,
    rose: bool,
    fell: bool,
}

impl EdgeDetector {
    /// Creates a detector for a button that starts released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the latest sample. Edge flags only survive until the next update.
    pub fn update(&mut self, pressed: bool) {
        self.rose = pressed && !self.pressed;
        self.fell = !pressed && self.pressed;
        self.pressed = pressed;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn rose(&self) -> bool {
        self.rose
    }

    pub fn fell(&self) -> bool {
        self.fell
    }
}

/// Pin level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pulled up, shorted to ground when pressed.
    Low,
    /// Pulled down, driven high when pressed.
    High,
}

/// Four input pins read as buttons.
///
/// The pins are expected to be debounced already (RC filter, or a pin wrapper
/// that filters). A pin read error leaves that button's state unchanged.
pub struct ButtonBank<P: InputPin> {
    pins: [P; BUTTON_COUNT],
    detectors: [EdgeDetector; BUTTON_COUNT],
    active: ActiveLevel,
}

impl<P: InputPin> ButtonBank<P> {
    /// Creates a bank from pins in [`ButtonId::ALL`] order.
    pub fn new(pins: [P; BUTTON_COUNT], active: ActiveLevel) -> Self {
        Self {
            pins,
            detectors: [EdgeDetector::new(); BUTTON_COUNT],
            active,
        }
    }

    /// True while `button` is held down, as of the last poll.
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.detectors[button.index()].is_pressed()
    }

    /// Releases the pins.
    pub fn release(self) -> [P; BUTTON_COUNT] {
        self.pins
    }
}

fn sample<P: InputPin>(pin: &mut P, detector: &mut EdgeDetector, active: ActiveLevel) {
    let level = match active {
        ActiveLevel::Low => pin.is_low(),
        ActiveLevel::High => pin.is_high(),
    };
    match level {
        Ok(pressed) => detector.update(pressed),
        Err(_) => detector.update(detector.is_pressed()),
    }
}

impl<P: InputPin> ButtonEdges for ButtonBank<P> {
    fn poll(&mut self) {
        for (pin, detector) in self.pins.iter_mut().zip(self.detectors.iter_mut()) {
            sample(pin, detector, self.active);
        }
    }

    fn poll_button(&mut self, button: ButtonId) {
        let slot = button.index();
        sample(&mut self.pins[slot], &mut self.detectors[slot], self.active);
    }

    fn rose(&self, button: ButtonId) -> bool {
        self.detectors[button.index()].rose()
    }

    fn fell(&self, button: ButtonId) -> bool {
        self.detectors[button.index()].fell()
    }
}
