use std::fs;
use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, execute};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::Config;
use crate::render::TermRenderer;
use crate::sim::{Simulation, SleepTicker};

mod args;
mod config;
mod gol;
mod render;
mod sim;
mod stability;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = Config::from(Args::parse());
    config.validate().context("invalid configuration")?;

    let mut sim = match &config.pattern {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read pattern {}", path.display()))?;
            Simulation::from_pattern(&text, &config)?
        }
        None => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Simulation::new(&config, &mut rng)?
        }
    };
    info!(
        width = sim.board().width(),
        height = sim.board().height(),
        live = sim.board().alive(),
        "board ready"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to install interrupt handler")?;

    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    scopeguard::defer! {
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, cursor::Show) {
            warn!("failed to restore cursor: {}", e);
        }
    }

    let mut renderer = TermRenderer::new(stdout);
    let mut ticker = SleepTicker::new(config.delay, stop);
    let result = sim.run(&mut renderer, &mut ticker);
    info!(phase = ?sim.phase(), generation = sim.generation(), "stopped");
    result
}
