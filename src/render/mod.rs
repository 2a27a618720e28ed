use anyhow::Result;

pub mod term;

pub use term::TermRenderer;

/// Everything a sink needs to draw one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<String>,
    pub live: usize,
    pub generation: u64,
    pub is_static: bool,
}

impl Frame {
    /// The two lines printed under the board.
    pub fn summary(&self) -> [String; 2] {
        let live = if self.is_static {
            format!("Live cells: {} / STATIC", self.live)
        } else {
            format!("Live cells: {}", self.live)
        };
        [live, format!("Generation: {}", self.generation)]
    }

    /// Lines the frame occupies once drawn.
    pub fn height(&self) -> usize {
        self.rows.len() + 2
    }
}

pub trait Renderer {
    /// Replaces the previously drawn frame with `frame`. An error stops the simulation.
    fn render_frame(&mut self, frame: &Frame) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let mut frame = Frame {
            rows: vec!["@ ".into(), " @".into()],
            live: 2,
            generation: 14,
            is_static: false,
        };
        assert_eq!(frame.summary(), ["Live cells: 2", "Generation: 14"]);
        assert_eq!(frame.height(), 4);

        frame.is_static = true;
        assert_eq!(frame.summary()[0], "Live cells: 2 / STATIC");
    }
}
