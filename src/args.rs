use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::config::{Config, Symbols};

/// Conway's Game of Life on a wrap-around board, redrawn in place.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(long, default_value_t = 30)]
    pub width: u32,
    /// Board rows, at most 65533 so a frame fits the terminal cursor range
    #[arg(long, default_value_t = 30)]
    pub height: u32,
    /// Chance of each cell starting alive, within [0, 1]
    #[arg(short, long, default_value_t = 0.4)]
    pub ratio: f64,
    /// Seed for a reproducible starting board
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Milliseconds between generations
    #[arg(short, long, default_value_t = 100)]
    pub delay_ms: u64,
    #[arg(long, default_value_t = '@')]
    pub live: char,
    #[arg(long, default_value_t = ' ')]
    pub dead: char,
    /// Start from a text board, one line per row, `--live` marking live cells. Overrides the
    /// size and ratio options
    #[arg(short, long)]
    pub pattern: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            width: args.width,
            height: args.height,
            live_ratio: args.ratio,
            delay: Duration::from_millis(args.delay_ms),
            symbols: Symbols {
                live: args.live,
                dead: args.dead,
            },
            seed: args.seed,
            pattern: args.pattern,
        }
    }
}
