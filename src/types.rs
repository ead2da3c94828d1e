//! Core types for codes, solve orders and tones.

use heapless::{String, Vec};

/// Number of character cells on the WOPR display (three 4-digit modules).
pub const DISPLAY_WIDTH: usize = 12;

/// Maximum number of entries a [`SolveOrder`] can hold.
pub const MAX_SOLVE_STEPS: usize = 32;

/// Characters drawn for cells that are still being "searched".
///
/// The doubled `'0'` is intentional and makes zero twice as likely.
pub const CODE_ALPHABET: [u8; 17] = *b"ABCDEF01234567890";

/// Code construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodeError {
    /// Character cannot be rendered on a segment display.
    UnsupportedChar(char),

    /// Solve order names a cell outside the display.
    IndexOutOfRange(usize),

    /// Solve order has more entries than it can hold.
    CapacityExceeded,
}

impl core::fmt::Display for CodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodeError::UnsupportedChar(c) => {
                write!(f, "character {:?} cannot be shown on the display", c)
            }
            CodeError::IndexOutOfRange(index) => {
                write!(
                    f,
                    "solve order index {} is outside the {} display cells",
                    index, DISPLAY_WIDTH
                )
            }
            CodeError::CapacityExceeded => {
                write!(f, "solve order exceeds {} entries", MAX_SOLVE_STEPS)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodeError {}

/// Left-aligns `text` in a display-width buffer, blank-padding or truncating.
///
/// Non-ASCII characters are replaced with blanks. Display implementations can
/// use this to honour the fixed-width contract of [`crate::SegmentDisplay`].
pub fn fit_text(text: &str) -> String<DISPLAY_WIDTH> {
    let mut fitted = String::new();
    for c in text.chars().take(DISPLAY_WIDTH) {
        let c = if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' };
        let _ = fitted.push(c);
    }
    while fitted.len() < DISPLAY_WIDTH {
        let _ = fitted.push(' ');
    }
    fitted
}

/// A full row of display cells, each holding a printable ASCII character.
///
/// Used both for the solved target and for the in-progress buffer that the
/// codebreak animation renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Code {
    cells: [u8; DISPLAY_WIDTH],
}

impl Code {
    /// An all-blank row.
    pub const BLANK: Code = Code {
        cells: [b' '; DISPLAY_WIDTH],
    };

    /// Builds a code from text, left-aligned and blank-padded or truncated.
    ///
    /// # Errors
    /// * `UnsupportedChar` - A character in the first twelve is not printable ASCII
    pub fn new(text: &str) -> Result<Self, CodeError> {
        let mut code = Self::BLANK;
        for (cell, c) in code.cells.iter_mut().zip(text.chars()) {
            if !c.is_ascii() || c.is_ascii_control() {
                return Err(CodeError::UnsupportedChar(c));
            }
            *cell = c as u8;
        }
        Ok(code)
    }

    /// Returns the character at `index`.
    ///
    /// # Panics
    /// Panics if `index >= DISPLAY_WIDTH`.
    pub fn cell(&self, index: usize) -> char {
        self.cells[index] as char
    }

    pub(crate) fn set_cell(&mut self, index: usize, value: u8) {
        self.cells[index] = value;
    }

    /// Returns the row as a twelve-character string.
    pub fn as_str(&self) -> &str {
        // Cells only ever hold printable ASCII.
        core::str::from_utf8(&self.cells).unwrap_or("")
    }
}

impl Default for Code {
    fn default() -> Self {
        Self::BLANK
    }
}

impl core::fmt::Display for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The order in which display cells are permanently revealed.
///
/// Cells not named here stay blank for the whole animation. Naming a cell
/// twice is allowed; the second reveal writes the same character again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveOrder {
    indices: Vec<u8, MAX_SOLVE_STEPS>,
}

impl SolveOrder {
    /// Builds a validated solve order.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - An index is not a display cell
    /// * `CapacityExceeded` - More than [`MAX_SOLVE_STEPS`] entries
    pub fn new(indices: &[usize]) -> Result<Self, CodeError> {
        let mut order = Vec::new();
        for &index in indices {
            if index >= DISPLAY_WIDTH {
                return Err(CodeError::IndexOutOfRange(index));
            }
            order
                .push(index as u8)
                .map_err(|_| CodeError::CapacityExceeded)?;
        }
        Ok(Self { indices: order })
    }

    /// Number of reveal steps.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if nothing will be revealed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Cell revealed at `step`, if any.
    pub fn get(&self, step: usize) -> Option<usize> {
        self.indices.get(step).map(|&index| index as usize)
    }

    /// Iterates over the cell indices in reveal order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().map(|&index| index as usize)
    }
}

/// How long a tone sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneLength {
    /// Sound for this many milliseconds, then fall silent.
    For(u32),

    /// Keep sounding until the next tone or an explicit silence.
    Continuous,
}

/// A square-wave tone for the piezo/analog audio output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency_hz: u32,

    /// PWM duty cycle, 0.0-1.0.
    pub duty: f32,

    /// Bounded or continuous.
    pub length: ToneLength,
}

impl Tone {
    /// Creates a bounded tone.
    pub const fn new(frequency_hz: u32, duration_ms: u32, duty: f32) -> Self {
        Self {
            frequency_hz,
            duty,
            length: ToneLength::For(duration_ms),
        }
    }

    /// Creates a tone that keeps sounding after the call returns.
    pub const fn continuous(frequency_hz: u32, duty: f32) -> Self {
        Self {
            frequency_hz,
            duty,
            length: ToneLength::Continuous,
        }
    }
}
