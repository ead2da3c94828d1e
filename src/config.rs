//! Tunable timing and behavior for the codebreak engine and control loop.

use crate::button::ButtonId;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minimum solve interval is above the maximum.
    InvertedInterval,

    /// Interval multiplier is zero, negative or not finite.
    InvalidMultiplier,

    /// Lowest noise pitch is above the highest.
    InvertedNoiseRange,

    /// Search frame length is zero.
    ZeroNoiseFrame,

    /// Control loop tick period is zero.
    ZeroTickPeriod,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvertedInterval => {
                write!(f, "solve interval minimum exceeds maximum")
            }
            ConfigError::InvalidMultiplier => {
                write!(f, "solve interval multiplier must be finite and positive")
            }
            ConfigError::InvertedNoiseRange => {
                write!(f, "noise frequency minimum exceeds maximum")
            }
            ConfigError::ZeroNoiseFrame => {
                write!(f, "noise frame length must be non-zero")
            }
            ConfigError::ZeroTickPeriod => {
                write!(f, "tick period must be non-zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Codebreak animation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodebreakConfig {
    /// Shortest time spent searching before a cell is revealed.
    pub solve_interval_min_ms: u32,

    /// Longest time spent searching before a cell is revealed.
    pub solve_interval_max_ms: u32,

    /// Scales the drawn interval. 0.5 breaks the code twice as fast.
    pub solve_interval_multiplier: f32,

    /// Lowest "computer noise" pitch.
    pub noise_min_hz: u32,

    /// Highest "computer noise" pitch.
    pub noise_max_hz: u32,

    /// How long each noise tone and search frame lasts. Also the abort latency.
    pub noise_ms: u32,

    /// Releasing this button aborts a running codebreak.
    pub abort_button: ButtonId,
}

impl Default for CodebreakConfig {
    fn default() -> Self {
        Self {
            solve_interval_min_ms: 4000,
            solve_interval_max_ms: 8000,
            solve_interval_multiplier: 1.0,
            noise_min_hz: 90,
            noise_max_hz: 250,
            noise_ms: 50,
            abort_button: ButtonId::Button2,
        }
    }
}

impl CodebreakConfig {
    pub fn with_solve_interval(mut self, min_ms: u32, max_ms: u32) -> Self {
        self.solve_interval_min_ms = min_ms;
        self.solve_interval_max_ms = max_ms;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.solve_interval_multiplier = multiplier;
        self
    }

    pub fn with_noise(mut self, min_hz: u32, max_hz: u32, frame_ms: u32) -> Self {
        self.noise_min_hz = min_hz;
        self.noise_max_hz = max_hz;
        self.noise_ms = frame_ms;
        self
    }

    pub fn with_abort_button(mut self, button: ButtonId) -> Self {
        self.abort_button = button;
        self
    }

    /// Checks the settings are usable.
    ///
    /// # Errors
    /// * `InvertedInterval` - `solve_interval_min_ms > solve_interval_max_ms`
    /// * `InvalidMultiplier` - multiplier is not a finite positive number
    /// * `InvertedNoiseRange` - `noise_min_hz > noise_max_hz`
    /// * `ZeroNoiseFrame` - `noise_ms` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solve_interval_min_ms > self.solve_interval_max_ms {
            return Err(ConfigError::InvertedInterval);
        }
        if !self.solve_interval_multiplier.is_finite() || self.solve_interval_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier);
        }
        if self.noise_min_hz > self.noise_max_hz {
            return Err(ConfigError::InvertedNoiseRange);
        }
        if self.noise_ms == 0 {
            return Err(ConfigError::ZeroNoiseFrame);
        }
        Ok(())
    }
}

/// Control loop settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WoprConfig {
    /// Idle loop period; paces the clock refresh and the color wheel.
    pub tick_ms: u32,

    /// Spacing of the defcon LEDs on the color wheel.
    pub wheel_spread: u32,

    pub codebreak: CodebreakConfig,
}

impl Default for WoprConfig {
    fn default() -> Self {
        Self {
            tick_ms: 15,
            wheel_spread: 3,
            codebreak: CodebreakConfig::default(),
        }
    }
}

impl WoprConfig {
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_codebreak(mut self, codebreak: CodebreakConfig) -> Self {
        self.codebreak = codebreak;
        self
    }

    /// Checks the settings, including the nested codebreak config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        self.codebreak.validate()
    }
}
