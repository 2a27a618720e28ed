use std::io::Write;

use anyhow::{Context, Result};
use crossterm::{
    cursor, queue, style,
    terminal::{self, ClearType},
};

use super::{Frame, Renderer};

/// Draws frames in place without taking over the screen. Each frame moves the cursor back over
/// the previous one and clears to the end of the screen before printing.
pub struct TermRenderer<W: Write> {
    out: W,
    /// Lines written by the last frame, 0 before the first.
    drawn: u16,
}

impl<W: Write> TermRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Each cell takes three columns, ` @ `, to keep the board roughly square.
fn pad_row(row: &str) -> String {
    row.chars().flat_map(|c| [' ', c, ' ']).collect()
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn render_frame(&mut self, frame: &Frame) -> Result<()> {
        let height = u16::try_from(frame.height())
            .with_context(|| format!("frame of {} lines is too tall", frame.height()))?;
        if self.drawn > 0 {
            queue!(
                self.out,
                cursor::MoveToPreviousLine(self.drawn),
                terminal::Clear(ClearType::FromCursorDown)
            )?;
        }
        for row in &frame.rows {
            queue!(self.out, style::Print(pad_row(row)), style::Print("\n"))?;
        }
        for line in frame.summary() {
            queue!(self.out, style::Print(line), style::Print("\n"))?;
        }
        self.out.flush().context("failed to flush frame")?;
        self.drawn = height;
        Ok(())
    }
}
