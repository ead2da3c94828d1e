//! Wait bookkeeping shared by the script player and the codebreak engine.

use crate::hardware::Buzzer;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::{Tone, ToneLength};

/// Timing information returned by service operations.
///
/// Indicates when a routine needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Nothing to do until this much time has passed.
    ///
    /// Servicing earlier is harmless; the routine reports the remaining time.
    Delay(D),

    /// The routine has finished. No further servicing is needed.
    Complete,
}

/// A pending wait, optionally ending a bounded tone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pacer<I> {
    resume_at: Option<I>,
    silence_on_resume: bool,
}

impl<I: TimeInstant> Pacer<I> {
    pub(crate) fn new() -> Self {
        Self {
            resume_at: None,
            silence_on_resume: false,
        }
    }

    /// Schedules the next step `millis` after `now`.
    pub(crate) fn wait(&mut self, now: I, millis: u32) -> ServiceTiming<I::Duration> {
        let duration = I::Duration::from_millis(millis as u64);
        self.resume_at = Some(now.wrapping_add(duration));
        ServiceTiming::Delay(duration)
    }

    /// Starts `tone` and waits for it. Bounded tones are silenced on resume.
    pub(crate) fn play<Z: Buzzer>(
        &mut self,
        buzzer: &mut Z,
        now: I,
        tone: Tone,
        continuous_hold_ms: u32,
    ) -> ServiceTiming<I::Duration> {
        buzzer.play(tone);
        match tone.length {
            ToneLength::For(millis) => {
                self.silence_on_resume = true;
                self.wait(now, millis)
            }
            ToneLength::Continuous => self.wait(now, continuous_hold_ms),
        }
    }

    /// Time left on the current wait, if it has not elapsed.
    pub(crate) fn remaining(&self, now: I) -> Option<I::Duration> {
        match self.resume_at {
            Some(resume_at) if now.is_before(resume_at) => Some(now.duration_until(resume_at)),
            _ => None,
        }
    }

    /// Ends an elapsed wait, silencing a bounded tone if one was playing.
    pub(crate) fn resume<Z: Buzzer>(&mut self, buzzer: &mut Z) {
        if self.silence_on_resume {
            buzzer.silence();
        }
        self.reset();
    }

    pub(crate) fn reset(&mut self) {
        self.resume_at = None;
        self.silence_on_resume = false;
    }
}
