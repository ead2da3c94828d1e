//! Shared test infrastructure for wopr-codebreak integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};
use rand::rngs::mock::StepRng;
use wopr_codebreak::{
    ActiveLevel, Board, ButtonBank, ButtonEdges, ButtonId, Buzzer, DefconLeds, Edge, RgbLed,
    SegmentDisplay, ServiceTiming, Srgb, TickDuration, Ticks, TimeOfDay, TimeSource, Tone,
    WallClock,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Ticks>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(Ticks(0))
    }

    pub fn starting_at(time: Ticks) -> Self {
        Self {
            current_time: Cell::new(time),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TickDuration) {
        let current = self.current_time.get();
        self.current_time.set(Ticks(current.0.wrapping_add(duration.0)));
    }

    pub fn set_time(&self, time: Ticks) {
        self.current_time.set(time);
    }
}

impl TimeSource<Ticks> for MockTimeSource {
    fn now(&self) -> Ticks {
        self.current_time.get()
    }
}

// ============================================================================
// Recording peripherals
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Show(String),
    Clear,
}

/// Display that records everything written to it
#[derive(Default)]
pub struct MockDisplay {
    pub events: Vec<DisplayEvent>,
}

impl MockDisplay {
    /// Every shown text, in order, ignoring clears
    pub fn shown(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Show(text) => Some(text.as_str()),
                DisplayEvent::Clear => None,
            })
            .collect()
    }

    pub fn last_shown(&self) -> Option<&str> {
        self.shown().last().copied()
    }

    pub fn count_shown(&self, text: &str) -> usize {
        self.shown().iter().filter(|&&shown| shown == text).count()
    }
}

impl SegmentDisplay for MockDisplay {
    fn show(&mut self, text: &str) {
        self.events.push(DisplayEvent::Show(text.to_string()));
    }

    fn clear(&mut self) {
        self.events.push(DisplayEvent::Clear);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuzzerEvent {
    Play(Tone),
    Silence,
}

/// Buzzer that records tones and silences
#[derive(Default)]
pub struct MockBuzzer {
    pub events: Vec<BuzzerEvent>,
}

impl MockBuzzer {
    pub fn tones(&self) -> Vec<Tone> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BuzzerEvent::Play(tone) => Some(*tone),
                BuzzerEvent::Silence => None,
            })
            .collect()
    }

    pub fn count_frequency(&self, frequency_hz: u32) -> usize {
        self.tones()
            .iter()
            .filter(|tone| tone.frequency_hz == frequency_hz)
            .count()
    }
}

impl Buzzer for MockBuzzer {
    fn play(&mut self, tone: Tone) {
        self.events.push(BuzzerEvent::Play(tone));
    }

    fn silence(&mut self) {
        self.events.push(BuzzerEvent::Silence);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefconEvent {
    Set(usize, Srgb),
    ClearAll,
}

/// Defcon LED strip that tracks current colors and history
pub struct MockDefcon {
    pub leds: [Srgb; 5],
    pub events: Vec<DefconEvent>,
}

impl MockDefcon {
    pub fn new() -> Self {
        Self {
            leds: [BLACK; 5],
            events: Vec::new(),
        }
    }

    pub fn lit(&self) -> Vec<usize> {
        (0..5).filter(|&i| self.leds[i] != BLACK).collect()
    }
}

impl DefconLeds for MockDefcon {
    fn set(&mut self, index: usize, color: Srgb) {
        if let Some(led) = self.leds.get_mut(index) {
            *led = color;
        }
        self.events.push(DefconEvent::Set(index, color));
    }

    fn clear_all(&mut self) {
        self.leds = [BLACK; 5];
        self.events.push(DefconEvent::ClearAll);
    }
}

/// Status pixel that records every color
#[derive(Default)]
pub struct MockStatus {
    pub colors: Vec<Srgb>,
}

impl RgbLed for MockStatus {
    fn set_color(&mut self, color: Srgb) {
        self.colors.push(color);
    }
}

/// Wall clock stuck at one time
pub struct FixedClock(pub TimeOfDay);

impl WallClock for FixedClock {
    fn time_of_day(&mut self) -> TimeOfDay {
        self.0
    }
}

// ============================================================================
// Scripted buttons
// ============================================================================

/// Buttons whose edges are scheduled by poll number (1-based)
///
/// Edges scheduled on a single-button poll for other buttons are held back
/// until the next full poll, like a real button that stays pressed.
#[derive(Default)]
pub struct ScriptedButtons {
    schedule: HashMap<usize, Vec<(ButtonId, Edge)>>,
    current: Vec<(ButtonId, Edge)>,
    held_back: Vec<(ButtonId, Edge)>,
    pub polls: usize,
}

impl ScriptedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_poll(mut self, poll: usize, button: ButtonId, edge: Edge) -> Self {
        self.schedule.entry(poll).or_default().push((button, edge));
        self
    }

    pub fn release_on_poll(self, poll: usize, button: ButtonId) -> Self {
        self.on_poll(poll, button, Edge::Released)
    }

    pub fn press_on_poll(self, poll: usize, button: ButtonId) -> Self {
        self.on_poll(poll, button, Edge::Pressed)
    }

    fn has(&self, button: ButtonId, edge: Edge) -> bool {
        self.current.contains(&(button, edge))
    }
}

impl ButtonEdges for ScriptedButtons {
    fn poll(&mut self) {
        self.polls += 1;
        self.current = std::mem::take(&mut self.held_back);
        self.current
            .extend(self.schedule.remove(&self.polls).unwrap_or_default());
    }

    fn poll_button(&mut self, button: ButtonId) {
        self.polls += 1;
        let scheduled = self.schedule.remove(&self.polls).unwrap_or_default();
        let (mine, others): (Vec<_>, Vec<_>) = scheduled
            .into_iter()
            .partition(|&(id, _)| id == button);
        self.current.retain(|&(id, _)| id != button);
        self.current.extend(mine);
        self.held_back.extend(others);
    }

    fn rose(&self, button: ButtonId) -> bool {
        self.has(button, Edge::Pressed)
    }

    fn fell(&self, button: ButtonId) -> bool {
        self.has(button, Edge::Released)
    }
}

// ============================================================================
// Deterministic randomness
// ============================================================================

/// Generator that always draws zero, so every range yields its low end
pub fn zero_rng() -> StepRng {
    StepRng::new(0, 0)
}

// ============================================================================
// Fake pins
// ============================================================================

#[derive(Debug)]
pub struct ReadError;

impl Error for ReadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Shared handle to a pin level. `None` makes reads fail.
pub type PinLevel = Rc<Cell<Option<bool>>>;

/// Pin whose level the test sets through a [`PinLevel`] handle
pub struct FakePin {
    level: PinLevel,
}

impl ErrorType for FakePin {
    type Error = ReadError;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level.get().ok_or(ReadError)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Button bank over fake pins that all start at `idle`
pub fn pin_bank(active: ActiveLevel, idle: bool) -> (ButtonBank<FakePin>, [PinLevel; 4]) {
    let levels: [PinLevel; 4] = core::array::from_fn(|_| Rc::new(Cell::new(Some(idle))));
    let pins = core::array::from_fn(|i| FakePin {
        level: Rc::clone(&levels[i]),
    });
    (ButtonBank::new(pins, active), levels)
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);

pub type TestBoard = Board<MockDisplay, MockBuzzer, MockDefcon, ScriptedButtons>;

pub fn test_board(buttons: ScriptedButtons) -> TestBoard {
    Board::new(
        MockDisplay::default(),
        MockBuzzer::default(),
        MockDefcon::new(),
        buttons,
    )
}

/// Services a routine until it completes, advancing the clock by each delay.
///
/// Returns the number of service calls. Panics after `limit` calls.
pub fn drive<F>(timer: &MockTimeSource, first: ServiceTiming<TickDuration>, limit: usize, mut service: F) -> usize
where
    F: FnMut() -> ServiceTiming<TickDuration>,
{
    let mut timing = first;
    let mut calls = 0;
    while let ServiceTiming::Delay(delay) = timing {
        assert!(calls < limit, "routine did not complete within {} calls", limit);
        timer.advance(delay);
        timing = service();
        calls += 1;
    }
    calls
}
