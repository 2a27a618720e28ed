use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Characters used when turning a board into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbols {
    pub live: char,
    pub dead: char,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            live: '@',
            dead: ' ',
        }
    }
}

/// Tallest board a terminal frame can address: the rows plus two summary lines must fit in a
/// `u16` cursor move.
pub const MAX_HEIGHT: u32 = u16::MAX as u32 - 2;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("width must be at least 1")]
    ZeroWidth,

    #[error("height must be at least 1")]
    ZeroHeight,

    #[error("height {0} exceeds the limit of {max} rows", max = MAX_HEIGHT)]
    TooTall(u32),

    #[error("live ratio must be within [0, 1], got {0}")]
    LiveRatio(f64),
}

/// Construction-time settings. Nothing here changes once the simulation is running.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    /// Probability of each cell starting alive.
    pub live_ratio: f64,
    /// Pause between two generations.
    pub delay: Duration,
    pub symbols: Symbols,
    pub seed: Option<u64>,
    /// Text file to start from instead of a random board.
    pub pattern: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            live_ratio: 0.4,
            delay: Duration::from_millis(100),
            symbols: Symbols::default(),
            seed: None,
            pattern: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.height > MAX_HEIGHT {
            return Err(ConfigError::TooTall(self.height));
        }
        // NaN fails `contains` as well
        if !(0.0..=1.0).contains(&self.live_ratio) {
            return Err(ConfigError::LiveRatio(self.live_ratio));
        }
        Ok(())
    }
}
