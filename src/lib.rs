#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Codebreaker`**: Cracks a `Code` cell by cell in a `SolveOrder`, with abort support
//! - **`Wopr`**: The board's control loop: clock face, ambient colors, button dispatch
//! - **`ScriptPlayer`**: Plays fixed `Script`s (beeps, self-test, marquee, completion flourish)
//! - **`Board`**: Bundle of the display, buzzer, defcon LEDs and buttons
//! - **`SegmentDisplay`**, **`Buzzer`**, **`DefconLeds`**, **`RgbLed`**: Traits to implement for your hardware
//! - **`ButtonEdges`**: Trait for debounced press/release edges; `ButtonBank` implements it over pins
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`RngCore`**: Any `rand_core` generator (`SmallRng`, a HAL RNG) drives search frames and wait times
//! - **`ServiceTiming`**: What every `service` call returns: wait this long, or done
//!
//! Nothing in this crate blocks. Each `service`/`tick` call does the work that
//! is due and says how long to sleep before the next one, so tests can drive
//! the animation with a virtual clock.

// Logging goes through these so call sites compile to nothing without `defmt`.
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

pub(crate) use log_debug;
pub(crate) use log_info;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;
pub use rand::rngs::SmallRng;
pub use rand::{RngCore, SeedableRng};

pub mod button;
pub mod codebreak;
pub mod colors;
pub mod command;
pub mod config;
pub mod control;
pub mod hardware;
mod pacer;
pub mod script;
pub mod time;
pub mod types;

pub use button::{ActiveLevel, ButtonBank, ButtonEdges, ButtonId, EdgeDetector};
pub use codebreak::{CodebreakError, CodebreakState, Codebreaker, Outcome, defcon_level};
pub use command::{Action, Edge, LOLZ, MOVIE, Preset, actions_for};
pub use config::{CodebreakConfig, ConfigError, WoprConfig};
pub use control::{Wopr, clock_face};
pub use hardware::{Board, Buzzer, DefconLeds, RgbLed, SegmentDisplay, TimeOfDay, WallClock};
pub use pacer::ServiceTiming;
pub use script::{Script, ScriptError, ScriptPlayer, Segment, Step};
pub use time::{TickDuration, Ticks, TimeDuration, TimeInstant, TimeSource};
pub use types::{CODE_ALPHABET, Code, CodeError, DISPLAY_WIDTH, SolveOrder, Tone, ToneLength, fit_text};
