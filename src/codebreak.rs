//! The codebreaking animation engine.
//!
//! Provides [`Codebreaker`], which "cracks" a [`Code`] one cell at a time in a
//! caller-chosen [`SolveOrder`]. Unsolved cells flicker through random
//! characters while a low "computer noise" tone plays; every few seconds the
//! next cell locks to its target character with an alert tone and the defcon
//! LEDs step down toward defcon 1. Once every cell in the order is solved the
//! engine plays the [`FLOURISH`] script and reports [`Outcome::Completed`].
//!
//! The abort button is checked once per search frame. Releasing it ends the
//! session with [`Outcome::Aborted`] after a short alert. Once the flourish
//! has started it always runs to the end.
//!
//! Like the script player, the engine never blocks: each [`Codebreaker::service`]
//! call does the work that is due and returns how long to wait before the next.

use crate::button::ButtonEdges;
use crate::colors::{DEFCON_COLORS, DEFCON_LEDS};
use crate::config::{CodebreakConfig, ConfigError};
use crate::hardware::{Board, Buzzer, DefconLeds, SegmentDisplay};
use crate::pacer::{Pacer, ServiceTiming};
use crate::script::{ALERT_TONE, FLOURISH, ScriptError, ScriptPlayer};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{CODE_ALPHABET, Code, SolveOrder, Tone};
use rand::{Rng, RngCore};

/// The current state of a codebreak session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodebreakState {
    /// No session started.
    Idle,
    /// Cycling random characters until the next reveal deadline.
    Searching,
    /// A cell was just revealed; the alert tone is sounding.
    Revealing,
    /// The abort button was released; the alert tone is sounding.
    Aborting,
    /// Every cell is solved; the completion script is playing.
    Flourish,
    /// Session over. See [`Codebreaker::outcome`].
    Complete,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Every cell in the order was revealed. Holds the final display row.
    Completed(Code),
    /// The abort button was released during the search.
    Aborted,
}

/// Errors that can occur during engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodebreakError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: CodebreakState,
    },
    /// The completion script could not be serviced.
    Script(ScriptError),
}

impl core::fmt::Display for CodebreakError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodebreakError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but codebreaker is in {:?}",
                    expected, actual
                )
            }
            CodebreakError::Script(err) => write!(f, "flourish error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodebreakError {}

impl From<ScriptError> for CodebreakError {
    fn from(err: ScriptError) -> Self {
        CodebreakError::Script(err)
    }
}

/// Defcon LED to light after `solved` of `total` cells are revealed.
///
/// Falls from 4 toward 0 as the code nears completion and reaches index 1 on
/// the final reveal; index 0 is reserved for the completion flourish. Clamped
/// to the LED range so an unsolved session (`solved == 0`) maps to 4.
pub fn defcon_level(solved: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let remaining = total - solved.min(total);
    (remaining * 4 / total + 1).min(DEFCON_LEDS - 1)
}

/// Runs codebreak sessions.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
pub struct Codebreaker<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    config: CodebreakConfig,
    state: CodebreakState,
    target: Code,
    order: SolveOrder,
    current: Code,
    solve_count: usize,
    deadline: Option<I>,
    pacer: Pacer<I>,
    flourish: ScriptPlayer<'t, I, T>,
    outcome: Option<Outcome>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> Codebreaker<'t, I, T> {
    /// Creates an idle engine.
    ///
    /// # Errors
    /// Returns the first problem found by [`CodebreakConfig::validate`].
    pub fn new(time_source: &'t T, config: CodebreakConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            time_source,
            config,
            state: CodebreakState::Idle,
            target: Code::BLANK,
            order: SolveOrder::default(),
            current: Code::BLANK,
            solve_count: 0,
            deadline: None,
            pacer: Pacer::new(),
            flourish: ScriptPlayer::new(time_source),
            outcome: None,
        })
    }

    /// Starts a session cracking `target` in `order`. Can be called from any state.
    ///
    /// Turns the defcon LEDs off, blanks the display and runs the first search
    /// frame. Any session in progress is discarded.
    pub fn start<D, Z, L, B, R>(
        &mut self,
        target: Code,
        order: SolveOrder,
        board: &mut Board<D, Z, L, B>,
        rng: &mut R,
    ) -> Result<ServiceTiming<I::Duration>, CodebreakError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
        B: ButtonEdges,
        R: RngCore,
    {
        crate::log_info!("codebreak start: {} cells", order.len());

        board.defcon.clear_all();
        board.display.clear();

        self.target = target;
        self.order = order;
        self.current = Code::BLANK;
        self.solve_count = 0;
        self.deadline = None;
        self.pacer.reset();
        self.outcome = None;
        self.state = CodebreakState::Searching;

        self.service(board, rng)
    }

    /// Services the session, updating the display, LEDs and buzzer as due.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(duration))` - Service again after this delay
    /// - `Ok(ServiceTiming::Complete)` - Session over, see [`Self::outcome`]
    /// - `Err` - No session running
    pub fn service<D, Z, L, B, R>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
        rng: &mut R,
    ) -> Result<ServiceTiming<I::Duration>, CodebreakError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
        B: ButtonEdges,
        R: RngCore,
    {
        match self.state {
            CodebreakState::Idle | CodebreakState::Complete => {
                return Err(CodebreakError::InvalidState {
                    expected: "Searching, Revealing, Aborting, or Flourish",
                    actual: self.state,
                });
            }
            CodebreakState::Flourish => return self.service_flourish(board),
            _ => {}
        }

        let now = self.time_source.now();
        if let Some(remaining) = self.pacer.remaining(now) {
            return Ok(ServiceTiming::Delay(remaining));
        }
        self.pacer.resume(&mut board.buzzer);

        if self.state == CodebreakState::Aborting {
            crate::log_info!("codebreak aborted after {} reveals", self.solve_count);
            self.current = Code::BLANK;
            self.finish(Outcome::Aborted);
            return Ok(ServiceTiming::Complete);
        }

        if self.state == CodebreakState::Revealing {
            // A fresh search interval is drawn for every cell.
            self.deadline = None;
            self.state = CodebreakState::Searching;
        }

        self.search(board, rng, now)
    }

    /// Abandons the session without an outcome and silences the buzzer.
    pub fn stop<Z: Buzzer>(&mut self, buzzer: &mut Z) {
        self.flourish.stop(buzzer);
        if self.is_running() {
            buzzer.silence();
        }
        self.pacer.reset();
        self.deadline = None;
        self.state = CodebreakState::Idle;
    }

    fn search<D, Z, L, B, R>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
        rng: &mut R,
        now: I,
    ) -> Result<ServiceTiming<I::Duration>, CodebreakError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
        B: ButtonEdges,
        R: RngCore,
    {
        if self.solve_count >= self.order.len() {
            return self.begin_flourish(board);
        }

        let deadline = match self.deadline {
            Some(deadline) => deadline,
            None => {
                let deadline = now.wrapping_add(self.random_wait(rng));
                self.deadline = Some(deadline);
                deadline
            }
        };

        if !now.is_before(deadline) {
            return Ok(self.reveal_next(board, now));
        }

        // Only the abort button is sampled; other edges wait for the control loop.
        board.buttons.poll_button(self.config.abort_button);
        if board.buttons.fell(self.config.abort_button) {
            board.display.show("ABORT");
            self.state = CodebreakState::Aborting;
            return Ok(self.pacer.play(&mut board.buzzer, now, ALERT_TONE, 0));
        }

        let pitch = rng.gen_range(self.config.noise_min_hz..=self.config.noise_max_hz);
        let timing = self.pacer.play(
            &mut board.buzzer,
            now,
            Tone::continuous(pitch, 0.5),
            self.config.noise_ms,
        );

        for cell in self.order.iter().skip(self.solve_count) {
            let glyph = CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())];
            self.current.set_cell(cell, glyph);
        }
        board.display.show(self.current.as_str());

        Ok(timing)
    }

    fn reveal_next<D, Z, L, B>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
        now: I,
    ) -> ServiceTiming<I::Duration>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        if let Some(cell) = self.order.get(self.solve_count) {
            self.current.set_cell(cell, self.target.cell(cell) as u8);
        }
        board.display.show(self.current.as_str());
        self.solve_count += 1;

        let level = defcon_level(self.solve_count, self.order.len());
        board.defcon.clear_all();
        board.defcon.set(level, DEFCON_COLORS[level]);

        crate::log_debug!(
            "revealed {}/{}, defcon {}",
            self.solve_count,
            self.order.len(),
            level + 1
        );

        self.state = CodebreakState::Revealing;
        self.pacer.play(&mut board.buzzer, now, ALERT_TONE, 0)
    }

    fn begin_flourish<D, Z, L, B>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
    ) -> Result<ServiceTiming<I::Duration>, CodebreakError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        crate::log_info!("code broken: {}", self.current.as_str());

        self.state = CodebreakState::Flourish;
        let timing = self.flourish.start(FLOURISH, self.current, board)?;
        Ok(self.after_flourish(timing))
    }

    fn service_flourish<D, Z, L, B>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
    ) -> Result<ServiceTiming<I::Duration>, CodebreakError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        let timing = self.flourish.service(board)?;
        Ok(self.after_flourish(timing))
    }

    fn after_flourish(&mut self, timing: ServiceTiming<I::Duration>) -> ServiceTiming<I::Duration> {
        if timing == ServiceTiming::Complete {
            self.finish(Outcome::Completed(self.current));
        }
        timing
    }

    fn finish(&mut self, outcome: Outcome) {
        self.deadline = None;
        self.outcome = Some(outcome);
        self.state = CodebreakState::Complete;
    }

    fn random_wait<R: RngCore>(&self, rng: &mut R) -> I::Duration {
        let base = rng.gen_range(
            self.config.solve_interval_min_ms..=self.config.solve_interval_max_ms,
        );
        let scaled = (base as f32 * self.config.solve_interval_multiplier) as u64;
        I::Duration::from_millis(scaled)
    }

    /// Returns the current state.
    pub fn state(&self) -> CodebreakState {
        self.state
    }

    /// Returns true while a session is in progress, flourish included.
    pub fn is_running(&self) -> bool {
        !matches!(self.state, CodebreakState::Idle | CodebreakState::Complete)
    }

    /// How the last session ended, once it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Number of cells permanently revealed so far.
    pub fn solved_count(&self) -> usize {
        self.solve_count
    }

    /// The row as currently displayed by the session.
    pub fn current_solution(&self) -> &Code {
        &self.current
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CodebreakConfig {
        &self.config
    }
}
