//! Fixed display/audio/LED step sequences and the player that runs them.
//!
//! A [`Script`] is a list of [`Segment`]s, each a run of [`Step`]s repeated a
//! fixed number of times. Scripts are plain `'static` data, so the built-in
//! ones below cost no RAM. [`ScriptPlayer`] executes them one step at a time
//! and reports how long to wait before the next call, the same way the
//! codebreak engine does.

use crate::colors::{DEFCON_COLORS, WHITE};
use crate::hardware::{Board, Buzzer, DefconLeds, SegmentDisplay};
use crate::pacer::{Pacer, ServiceTiming};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{Code, DISPLAY_WIDTH, Tone};
use palette::Srgb;

/// A single script instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Show literal text.
    Show(&'static str),

    /// Show the code bound when the script was started.
    ShowCode,

    /// Blank the display.
    Clear,

    /// Sound a tone. Bounded tones hold the script for their duration.
    Tone(Tone),

    /// Do nothing for this many milliseconds.
    Pause(u32),

    /// Turn every defcon LED off.
    LedsOff,

    /// Light one defcon LED.
    Led(usize, Srgb),

    /// Scroll `text` right to left, one column every `interval_ms`.
    ///
    /// Shows every twelve-column window of `text` in turn; lead the text with
    /// blanks to scroll in from the right edge.
    Marquee {
        text: &'static str,
        interval_ms: u32,
    },
}

/// A run of steps played `repeat` times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub steps: &'static [Step],
    pub repeat: u8,
}

impl Segment {
    pub const fn new(steps: &'static [Step], repeat: u8) -> Self {
        Self { steps, repeat }
    }

    pub const fn once(steps: &'static [Step]) -> Self {
        Self::new(steps, 1)
    }
}

/// A complete script.
pub type Script = &'static [Segment];

/// Alert tone used for reveals, aborts and the completion blink.
pub const ALERT_TONE: Tone = Tone::new(1500, 500, 0.5);

/// Short high chirp when a button goes down.
pub const PRESS_TONE: Tone = Tone::new(880, 20, 0.5);

/// Short low chirp when a button comes up.
pub const RELEASE_TONE: Tone = Tone::new(120, 20, 0.5);

const FLOURISH_INTRO: [Step; 3] = [Step::LedsOff, Step::Led(0, WHITE), Step::Pause(1000)];

const FLOURISH_BLINK: [Step; 6] = [
    Step::LedsOff,
    Step::Clear,
    Step::Pause(500),
    Step::Led(0, DEFCON_COLORS[0]),
    Step::ShowCode,
    Step::Tone(ALERT_TONE),
];

const FLOURISH_LAUNCH: [Step; 4] = [
    Step::Clear,
    Step::Pause(500),
    Step::Show("LAUNCHING ..."),
    Step::Pause(500),
];

/// Completion tail of a codebreak: blink the broken code, then "LAUNCHING".
pub const FLOURISH: Script = &[
    Segment::once(&FLOURISH_INTRO),
    Segment::new(&FLOURISH_BLINK, 5),
    Segment::new(&FLOURISH_LAUNCH, 5),
];

const PRESS_STEPS: [Step; 1] = [Step::Tone(PRESS_TONE)];
const RELEASE_STEPS: [Step; 1] = [Step::Tone(RELEASE_TONE)];

/// Single press chirp.
pub const PRESS_BEEP: Script = &[Segment::once(&PRESS_STEPS)];

/// Single release chirp.
pub const RELEASE_BEEP: Script = &[Segment::once(&RELEASE_STEPS)];

const SELF_TEST_INTRO: [Step; 4] = [
    Step::Show("WOPR DEMO"),
    Step::Tone(PRESS_TONE),
    Step::Pause(1000),
    Step::Show("AUDIO"),
];

const fn note(frequency_hz: u32) -> Step {
    Step::Tone(Tone::new(frequency_hz, 50, 0.5))
}

const SELF_TEST_SCALE: [Step; 16] = [
    note(262),
    Step::Pause(10),
    note(294),
    Step::Pause(10),
    note(330),
    Step::Pause(10),
    note(349),
    Step::Pause(10),
    note(392),
    Step::Pause(10),
    note(440),
    Step::Pause(10),
    note(494),
    Step::Pause(10),
    note(523),
    Step::Pause(10),
];

const SELF_TEST_TEXT: [Step; 20] = [
    Step::Show("AUDIO DONE"),
    Step::Pause(1000),
    Step::Show("LEFT        "),
    Step::Pause(1000),
    Step::Show("RIGHT"),
    Step::Pause(1000),
    Step::Show("ABCDEFGHIJKL"),
    Step::Pause(1000),
    Step::Show("0123456789AB"),
    Step::Pause(1000),
    // Each sample twice: pre-padded, then raw for the display to fit
    Step::Show("WOPR        "),
    Step::Pause(1000),
    Step::Show("WOPR"),
    Step::Pause(1000),
    Step::Show("TOO LONG MY "),
    Step::Pause(1000),
    Step::Show("TOO LONG MY MAN"),
    Step::Pause(1000),
    Step::Show("DEMO OVER"),
    Step::Pause(1000),
];

/// Display and audio self-test: a scale, then text alignment samples.
pub const SELF_TEST: Script = &[
    Segment::once(&SELF_TEST_INTRO),
    Segment::once(&SELF_TEST_SCALE),
    Segment::once(&SELF_TEST_TEXT),
];

const MARQUEE_STEPS: [Step; 1] = [Step::Marquee {
    text: "            DON'T FORGET TO DRINK YOUR OVALTINE            ",
    interval_ms: 250,
}];

/// Scrolling reminder for the back button.
pub const MARQUEE: Script = &[Segment::once(&MARQUEE_STEPS)];

/// Errors that can occur during script playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScriptError {
    /// `service` was called with no script running.
    NotRunning,
}

impl core::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScriptError::NotRunning => write!(f, "no script is running"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScriptError {}

/// Runs a [`Script`] against a [`Board`].
pub struct ScriptPlayer<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    script: Script,
    code: Code,
    running: bool,
    segment: usize,
    pass: u8,
    step: usize,
    scroll: usize,
    pacer: Pacer<I>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> ScriptPlayer<'t, I, T> {
    /// Creates an idle player.
    pub fn new(time_source: &'t T) -> Self {
        Self {
            time_source,
            script: &[],
            code: Code::BLANK,
            running: false,
            segment: 0,
            pass: 0,
            step: 0,
            scroll: 0,
            pacer: Pacer::new(),
        }
    }

    /// Starts `script` from the top, binding `code` for [`Step::ShowCode`].
    ///
    /// Replaces any script already running.
    pub fn start<D, Z, L, B>(
        &mut self,
        script: Script,
        code: Code,
        board: &mut Board<D, Z, L, B>,
    ) -> Result<ServiceTiming<I::Duration>, ScriptError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        self.script = script;
        self.code = code;
        self.segment = 0;
        self.pass = 0;
        self.step = 0;
        self.scroll = 0;
        self.pacer.reset();
        self.running = true;
        self.service(board)
    }

    /// Runs steps until the next wait or the end of the script.
    pub fn service<D, Z, L, B>(
        &mut self,
        board: &mut Board<D, Z, L, B>,
    ) -> Result<ServiceTiming<I::Duration>, ScriptError>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        if !self.running {
            return Err(ScriptError::NotRunning);
        }

        let now = self.time_source.now();
        if let Some(remaining) = self.pacer.remaining(now) {
            return Ok(ServiceTiming::Delay(remaining));
        }
        self.pacer.resume(&mut board.buzzer);

        while let Some(step) = self.current_step() {
            if let Some(timing) = self.apply(step, board, now) {
                return Ok(timing);
            }
        }

        self.running = false;
        Ok(ServiceTiming::Complete)
    }

    /// Stops playback and silences the buzzer. The display is left as is.
    pub fn stop<Z: Buzzer>(&mut self, buzzer: &mut Z) {
        if self.running {
            buzzer.silence();
        }
        self.pacer.reset();
        self.running = false;
    }

    /// Returns true while a script is playing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn current_step(&mut self) -> Option<Step> {
        loop {
            let segment = self.script.get(self.segment)?;
            if self.pass >= segment.repeat {
                self.segment += 1;
                self.pass = 0;
                self.step = 0;
                continue;
            }
            if let Some(step) = segment.steps.get(self.step) {
                return Some(*step);
            }
            self.step = 0;
            self.pass += 1;
        }
    }

    /// Executes `step` and moves the cursor. Returns the wait it asks for, if any.
    fn apply<D, Z, L, B>(
        &mut self,
        step: Step,
        board: &mut Board<D, Z, L, B>,
        now: I,
    ) -> Option<ServiceTiming<I::Duration>>
    where
        D: SegmentDisplay,
        Z: Buzzer,
        L: DefconLeds,
    {
        if let Step::Marquee { text, interval_ms } = step {
            let last_window = text.len().saturating_sub(DISPLAY_WIDTH);
            let end = (self.scroll + DISPLAY_WIDTH).min(text.len());
            board.display.show(text.get(self.scroll..end).unwrap_or(""));
            if self.scroll < last_window {
                self.scroll += 1;
            } else {
                self.scroll = 0;
                self.step += 1;
            }
            return Some(self.pacer.wait(now, interval_ms));
        }

        self.step += 1;
        match step {
            Step::Show(text) => board.display.show(text),
            Step::ShowCode => board.display.show(self.code.as_str()),
            Step::Clear => board.display.clear(),
            Step::LedsOff => board.defcon.clear_all(),
            Step::Led(index, color) => board.defcon.set(index, color),
            Step::Tone(tone) => return Some(self.pacer.play(&mut board.buzzer, now, tone, 0)),
            Step::Pause(millis) => return Some(self.pacer.wait(now, millis)),
            Step::Marquee { .. } => {}
        }
        None
    }
}
