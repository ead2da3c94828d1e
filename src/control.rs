//! The board's main control loop.
//!
//! [`Wopr`] owns every peripheral and alternates between the idle clock face
//! and whichever routine a button edge launched. Only one routine runs at a
//! time. While a codebreak runs, the loop stops polling buttons itself; the
//! engine polls the abort button on its own schedule.

use crate::button::{ButtonEdges, ButtonId};
use crate::codebreak::{Codebreaker, Outcome};
use crate::colors::{DEFCON_LEDS, color_wheel};
use crate::command::{Action, Edge, actions_for};
use crate::config::{ConfigError, WoprConfig};
use crate::hardware::{Board, Buzzer, DefconLeds, RgbLed, SegmentDisplay, TimeOfDay, WallClock};
use crate::pacer::ServiceTiming;
use crate::script::ScriptPlayer;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::Code;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use heapless::{Deque, String};
use rand::RngCore;

/// Most routines a single poll can queue (every button changing at once).
pub const MAX_PENDING: usize = 8;

/// Formats the idle clock face, `"HH MM SS "`.
pub fn clock_face(time: TimeOfDay) -> String<12> {
    let mut face = String::new();
    let _ = write!(
        face,
        "{:02} {:02} {:02} ",
        time.hour, time.minute, time.second
    );
    face
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    None,
    Script,
    Codebreak,
}

/// The WOPR control loop.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I`, `T` - Time instant and time source
/// * `D`, `Z`, `L`, `B` - Display, buzzer, defcon LEDs and buttons
/// * `P` - Status pixel
/// * `W` - Wall clock
/// * `R` - Random source
pub struct Wopr<'t, I, T, D, Z, L, B, P, W, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
{
    board: Board<D, Z, L, B>,
    status: P,
    wall_clock: W,
    rng: R,
    config: WoprConfig,
    codebreaker: Codebreaker<'t, I, T>,
    player: ScriptPlayer<'t, I, T>,
    active: Active,
    pending: Deque<Action, MAX_PENDING>,
    dispatching: bool,
    color_index: u32,
    last_outcome: Option<Outcome>,
}

impl<'t, I, T, D, Z, L, B, P, W, R> Wopr<'t, I, T, D, Z, L, B, P, W, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
    D: SegmentDisplay,
    Z: Buzzer,
    L: DefconLeds,
    B: ButtonEdges,
    P: RgbLed,
    W: WallClock,
    R: RngCore,
{
    /// Creates the control loop. Peripherals must already be initialised and
    /// the wall clock set.
    ///
    /// # Errors
    /// Returns the first problem found by [`WoprConfig::validate`].
    pub fn new(
        board: Board<D, Z, L, B>,
        status: P,
        wall_clock: W,
        rng: R,
        time_source: &'t T,
        config: WoprConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            board,
            status,
            wall_clock,
            rng,
            config,
            codebreaker: Codebreaker::new(time_source, config.codebreak)?,
            player: ScriptPlayer::new(time_source),
            active: Active::None,
            pending: Deque::new(),
            dispatching: false,
            color_index: 0,
            last_outcome: None,
        })
    }

    /// Runs one step of the loop and returns how long to sleep before the next.
    ///
    /// With no routine running this polls the buttons, shows the time, runs
    /// any routines the edges asked for, then advances the ambient colors and
    /// returns the tick period.
    pub fn tick(&mut self) -> I::Duration {
        if let Some(delay) = self.service_active() {
            return delay;
        }

        if !self.dispatching {
            self.board.buttons.poll();
            let face = clock_face(self.wall_clock.time_of_day());
            self.board.display.show(&face);
            self.queue_edges();
            self.dispatching = true;
        }

        while let Some(action) = self.pending.pop_front() {
            if let Some(delay) = self.launch(action) {
                return delay;
            }
        }
        self.dispatching = false;

        self.advance_ambient();
        I::Duration::from_millis(self.config.tick_ms as u64)
    }

    /// Runs the loop forever, sleeping with `delay` between ticks.
    pub fn run<DL: DelayNs>(&mut self, delay: &mut DL) -> ! {
        loop {
            let pause = self.tick();
            delay.delay_ms(pause.as_millis().min(u32::MAX as u64) as u32);
        }
    }

    fn queue_edges(&mut self) {
        for button in ButtonId::ALL {
            if self.board.buttons.fell(button) {
                crate::log_info!("release {}", button);
                self.queue(actions_for(button, Edge::Released));
            }
            if self.board.buttons.rose(button) {
                crate::log_info!("press {}", button);
                self.queue(actions_for(button, Edge::Pressed));
            }
        }
    }

    fn queue(&mut self, actions: &[Action]) {
        for &action in actions {
            if self.pending.push_back(action).is_err() {
                crate::log_debug!("action queue full, dropping routine");
            }
        }
    }

    /// Starts `action`. Returns the delay it asked for if it is still running.
    fn launch(&mut self, action: Action) -> Option<I::Duration> {
        match action {
            Action::Play(script) => {
                let timing = self.player.start(script, Code::BLANK, &mut self.board).ok()?;
                self.track(Active::Script, timing)
            }
            Action::Codebreak(preset) => {
                let (code, order) = match preset.build() {
                    Ok(inputs) => inputs,
                    Err(_err) => {
                        crate::log_info!("preset {} rejected: {}", preset.name, _err);
                        return None;
                    }
                };
                let timing = self
                    .codebreaker
                    .start(code, order, &mut self.board, &mut self.rng)
                    .ok()?;
                self.track(Active::Codebreak, timing)
            }
        }
    }

    /// Services the running routine. Returns `None` once nothing is running.
    fn service_active(&mut self) -> Option<I::Duration> {
        let routine = self.active;
        let timing = match routine {
            Active::None => return None,
            Active::Script => self.player.service(&mut self.board).ok(),
            Active::Codebreak => self
                .codebreaker
                .service(&mut self.board, &mut self.rng)
                .ok(),
        };
        // A routine that errors has nothing left to do.
        self.track(routine, timing.unwrap_or(ServiceTiming::Complete))
    }

    fn track(&mut self, routine: Active, timing: ServiceTiming<I::Duration>) -> Option<I::Duration> {
        match timing {
            ServiceTiming::Delay(delay) => {
                self.active = routine;
                Some(delay)
            }
            ServiceTiming::Complete => {
                if routine == Active::Codebreak {
                    self.last_outcome = self.codebreaker.outcome();
                }
                self.active = Active::None;
                None
            }
        }
    }

    fn advance_ambient(&mut self) {
        self.status.set_color(color_wheel(self.color_index));
        for led in 0..DEFCON_LEDS {
            let pos = self.color_index + led as u32 * self.config.wheel_spread;
            self.board.defcon.set(led, color_wheel(pos));
        }
        self.color_index = self.color_index.wrapping_add(1);
    }

    /// Returns true while a routine (script or codebreak) is running.
    pub fn is_busy(&self) -> bool {
        self.active != Active::None
    }

    /// How the most recent codebreak ended.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// Returns the codebreak engine.
    pub fn codebreaker(&self) -> &Codebreaker<'t, I, T> {
        &self.codebreaker
    }

    /// Returns the peripherals.
    pub fn board(&self) -> &Board<D, Z, L, B> {
        &self.board
    }

    /// Returns the peripherals mutably.
    pub fn board_mut(&mut self) -> &mut Board<D, Z, L, B> {
        &mut self.board
    }

    /// Returns the status pixel.
    pub fn status(&self) -> &P {
        &self.status
    }
}
