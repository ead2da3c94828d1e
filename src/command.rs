//! Button edges mapped to the routines they launch.

use crate::button::ButtonId;
use crate::script::{MARQUEE, PRESS_BEEP, RELEASE_BEEP, SELF_TEST, Script};
use crate::types::{Code, CodeError, SolveOrder};

/// A code to crack and the order to crack it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub code: &'static str,
    pub order: &'static [usize],
}

impl Preset {
    /// Validates the preset into engine inputs.
    pub fn build(&self) -> Result<(Code, SolveOrder), CodeError> {
        Ok((Code::new(self.code)?, SolveOrder::new(self.order)?))
    }
}

/// The launch code from the end of WarGames. The blanks are never "solved".
pub const MOVIE: Preset = Preset {
    name: "movie",
    code: "CPE 1704 TKS",
    order: &[7, 1, 4, 6, 11, 2, 5, 0, 10, 9],
};

/// The board maker's own greeting, cracked left to right.
pub const LOLZ: Preset = Preset {
    name: "lolz",
    code: "LOLZ FOR YOU",
    order: &[0, 1, 2, 3, 5, 6, 7, 9, 10, 11],
};

/// A routine the control loop can run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Play a script to the end.
    Play(Script),
    /// Run a codebreak session.
    Codebreak(Preset),
}

/// Which way a button moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

const RELEASE: [Action; 1] = [Action::Play(RELEASE_BEEP)];
const PRESS: [Action; 1] = [Action::Play(PRESS_BEEP)];
const SELF_TEST_ACTIONS: [Action; 1] = [Action::Play(SELF_TEST)];
const MOVIE_ACTIONS: [Action; 2] = [Action::Play(RELEASE_BEEP), Action::Codebreak(MOVIE)];
const LOLZ_ACTIONS: [Action; 2] = [Action::Play(RELEASE_BEEP), Action::Codebreak(LOLZ)];
const MARQUEE_ACTIONS: [Action; 2] = [Action::Play(PRESS_BEEP), Action::Play(MARQUEE)];

/// Routines to run, in order, for `edge` on `button`.
///
/// Releasing the front buttons starts the codebreaks; pressing starts the
/// self-test (button 1) and marquee (button 4). Every edge gets a chirp; the
/// self-test sounds its own.
pub fn actions_for(button: ButtonId, edge: Edge) -> &'static [Action] {
    match (button, edge) {
        (ButtonId::Button1, Edge::Released) => &RELEASE,
        (ButtonId::Button1, Edge::Pressed) => &SELF_TEST_ACTIONS,
        (ButtonId::Button2, Edge::Released) => &MOVIE_ACTIONS,
        (ButtonId::Button2, Edge::Pressed) => &PRESS,
        (ButtonId::Button3, Edge::Released) => &LOLZ_ACTIONS,
        (ButtonId::Button3, Edge::Pressed) => &PRESS,
        (ButtonId::Button4, Edge::Released) => &RELEASE,
        (ButtonId::Button4, Edge::Pressed) => &MARQUEE_ACTIONS,
    }
}
