use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::{Config, ConfigError, Symbols, MAX_HEIGHT},
    gol::Board,
    render::{Frame, Renderer},
    stability::StabilityTracker,
};

/// Where the loop is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Terminated,
}

/// Paces the loop and tells it when to stop.
pub trait Ticker {
    /// False once the run has been interrupted.
    fn running(&self) -> bool;
    /// Waits out the gap between two generations.
    fn tick(&mut self);
}

/// Sleeps a fixed delay per generation. The sleep itself is not interruptible; `stop` is only
/// looked at between generations.
pub struct SleepTicker {
    delay: Duration,
    stop: Arc<AtomicBool>,
}

impl SleepTicker {
    pub fn new(delay: Duration, stop: Arc<AtomicBool>) -> Self {
        Self { delay, stop }
    }
}

impl Ticker for SleepTicker {
    fn running(&self) -> bool {
        !self.stop.load(Ordering::SeqCst)
    }

    fn tick(&mut self) {
        thread::sleep(self.delay);
    }
}

pub struct Simulation {
    board: Board,
    tracker: StabilityTracker,
    generation: u64,
    symbols: Symbols,
    phase: Phase,
}

impl Simulation {
    pub fn new<R: Rng>(config: &Config, rng: &mut R) -> Result<Self, ConfigError> {
        debug!(
            width = config.width,
            height = config.height,
            ratio = config.live_ratio,
            "seeding board"
        );
        let board = Board::random(config, rng)?;
        Ok(Self::from_board(board, config.symbols))
    }

    /// Starts from a text board instead of a random one; `config` only supplies the symbols.
    pub fn from_pattern(text: &str, config: &Config) -> Result<Self> {
        let board = Board::parse(text, config.symbols.live).context("malformed pattern")?;
        ensure!(
            board.height() <= MAX_HEIGHT,
            "pattern has {} rows, the limit is {}",
            board.height(),
            MAX_HEIGHT
        );
        debug!(
            width = board.width(),
            height = board.height(),
            "loaded pattern"
        );
        Ok(Self::from_board(board, config.symbols))
    }

    pub fn from_board(board: Board, symbols: Symbols) -> Self {
        Self {
            board,
            tracker: StabilityTracker::new(),
            generation: 1,
            symbols,
            phase: Phase::Initializing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = ?self.phase, to = ?phase, generation = self.generation, "phase change");
        self.phase = phase;
    }

    /// Snapshot of the current generation. Records its live count in the stability window, so
    /// call it once per generation.
    pub fn frame(&mut self) -> Frame {
        let live = self.board.alive();
        let was_static = self.tracker.is_static();
        self.tracker.update(live);
        let is_static = self.tracker.is_static();
        if is_static != was_static {
            info!(generation = self.generation, live, is_static, "stability changed");
        }
        Frame {
            rows: self.board.render(self.symbols),
            live,
            generation: self.generation,
            is_static,
        }
    }

    pub fn advance(&mut self) {
        self.board.step();
        self.generation += 1;
    }

    /// Runs until `ticker` reports an interrupt, which is a normal, successful exit. A renderer
    /// error ends the run early and is returned.
    pub fn run<R, T>(&mut self, renderer: &mut R, ticker: &mut T) -> Result<()>
    where
        R: Renderer,
        T: Ticker,
    {
        self.enter(Phase::Running);
        while ticker.running() {
            let frame = self.frame();
            debug!(
                generation = frame.generation,
                live = frame.live,
                is_static = frame.is_static,
                "frame"
            );
            if let Err(e) = renderer.render_frame(&frame) {
                self.enter(Phase::Terminated);
                return Err(e)
                    .with_context(|| format!("failed to render generation {}", frame.generation));
            }
            self.advance();
            ticker.tick();
        }
        info!(generation = self.generation, "interrupted");
        self.enter(Phase::Terminated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        fail_at: Option<u64>,
    }

    impl Renderer for Recorder {
        fn render_frame(&mut self, frame: &Frame) -> Result<()> {
            if self.fail_at == Some(frame.generation) {
                return Err(anyhow!("sink closed"));
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    /// Allows a fixed number of generations, then reports an interrupt.
    struct Budget(usize);

    impl Ticker for Budget {
        fn running(&self) -> bool {
            self.0 > 0
        }

        fn tick(&mut self) {
            self.0 -= 1;
        }
    }

    fn blinker() -> Simulation {
        let board = Board::from_rows(&[".....", ".....", ".@@@.", ".....", "....."], '@')
            .expect("valid board");
        Simulation::from_board(board, Symbols::default())
    }

    #[test]
    fn test_runs_until_interrupted() -> Result<()> {
        let mut sim = blinker();
        assert_eq!(sim.phase(), Phase::Initializing);
        let mut sink = Recorder::default();
        sim.run(&mut sink, &mut Budget(4))?;

        assert_eq!(sim.phase(), Phase::Terminated);
        assert_eq!(sim.generation(), 5);
        let gens = sink.frames.iter().map(|f| f.generation).collect::<Vec<_>>();
        assert_eq!(gens, vec![1, 2, 3, 4]);
        assert_eq!(sink.frames[0].rows[2], " @@@ ");
        assert_eq!(sink.frames[1].rows[1], "  @  ");
        assert_eq!(sink.frames[2].rows, sink.frames[0].rows);
        Ok(())
    }

    #[test]
    fn test_interrupt_before_start_renders_nothing() -> Result<()> {
        let mut sim = blinker();
        let mut sink = Recorder::default();
        sim.run(&mut sink, &mut Budget(0))?;
        assert!(sink.frames.is_empty());
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.phase(), Phase::Terminated);
        Ok(())
    }

    #[test]
    fn test_blinker_reads_static_by_count() -> Result<()> {
        // the population stays at 3 while the cells move
        let mut sim = blinker();
        let mut sink = Recorder::default();
        sim.run(&mut sink, &mut Budget(3))?;
        assert!(sink.frames.iter().all(|f| f.live == 3 && f.is_static));
        Ok(())
    }

    #[test]
    fn test_dying_board_is_not_static_until_settled() -> Result<()> {
        let board = Board::from_rows(&["....", ".@..", "....", "...."], '@')?;
        let mut sim = Simulation::from_board(board, Symbols::default());
        let mut sink = Recorder::default();
        sim.run(&mut sink, &mut Budget(12))?;

        let flags = sink.frames.iter().map(|f| f.is_static).collect::<Vec<_>>();
        // the lone cell dies after the first frame; the window holds the 1 for ten frames
        assert!(flags[0]);
        assert!(flags[1..10].iter().all(|s| !s));
        assert!(flags[10] && flags[11]);
        Ok(())
    }

    #[test]
    fn test_pattern_seeds_the_run() -> Result<()> {
        let config = Config {
            symbols: Symbols {
                live: '#',
                dead: '.',
            },
            ..Default::default()
        };
        let mut sim = Simulation::from_pattern(".....\n.....\n.###.\n", &config)?;
        assert_eq!(sim.board().height(), 3);
        let mut sink = Recorder::default();
        sim.run(&mut sink, &mut Budget(2))?;
        assert_eq!(sink.frames[0].rows, [".....", ".....", ".###."]);
        // on a 5x3 torus the vertical blinker wraps through the top row
        assert_eq!(sink.frames[1].rows, ["..#..", "..#..", "..#.."]);
        Ok(())
    }

    #[test]
    fn test_pattern_errors() {
        let config = Config::default();
        let err = Simulation::from_pattern("", &config).err().expect("empty pattern");
        assert!(format!("{:#}", err).contains("malformed pattern"));

        let tall = "@\n".repeat(MAX_HEIGHT as usize + 1);
        let err = Simulation::from_pattern(&tall, &config).err().expect("too tall");
        assert!(format!("{}", err).contains("limit"));
    }

    #[test]
    fn test_render_error_stops_loop() {
        let mut sim = blinker();
        let mut sink = Recorder {
            fail_at: Some(3),
            ..Default::default()
        };
        let err = sim.run(&mut sink, &mut Budget(10)).unwrap_err();
        assert!(format!("{:#}", err).contains("sink closed"));
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sim.generation(), 3);
        assert_eq!(sim.phase(), Phase::Terminated);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = Config {
            width: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            Simulation::new(&config, &mut rng),
            Err(ConfigError::ZeroWidth)
        ));
    }

    #[test]
    fn test_sleep_ticker_obeys_flag() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut ticker = SleepTicker::new(Duration::ZERO, stop.clone());
        assert!(ticker.running());
        ticker.tick();
        stop.store(true, Ordering::SeqCst);
        assert!(!ticker.running());
    }
}
