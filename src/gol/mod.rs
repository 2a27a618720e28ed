use std::ops::{Add, Index};

use itertools::iproduct;
use rand::Rng;
use thiserror::Error;

use crate::config::{Config, ConfigError, Symbols};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Live,
    Dead,
}

impl Cell {
    pub fn is_live(self) -> bool {
        self == Cell::Live
    }

    /// Conway's B3/S23 transition for a single cell.
    pub fn next(self, neighbors: u8) -> Cell {
        match (self, neighbors) {
            (Cell::Dead, 3) => Cell::Live,
            (Cell::Live, 2 | 3) => Cell::Live,
            _ => Cell::Dead,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}
impl Add for Point {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.x += rhs.x;
        self.y += rhs.y;
        self
    }
}
impl<I1, I2> From<(I1, I2)> for Point
where
    I1: Into<i64>,
    I2: Into<i64>,
{
    fn from((l, r): (I1, I2)) -> Self {
        Self {
            x: l.into(),
            y: r.into(),
        }
    }
}

impl Point {
    /// Wraps the point onto a `w` x `h` torus.
    pub fn remap<T>(&mut self, w: T, h: T)
    where
        T: Into<i64>,
    {
        self.x = self.x.rem_euclid(w.into());
        self.y = self.y.rem_euclid(h.into());
    }
}

/// The eight offsets around a cell, `(0, 0)` excluded.
fn neighbor_offsets() -> impl Iterator<Item = Point> {
    iproduct!(-1i64..=1, -1i64..=1)
        .filter(|&(dx, dy)| (dx, dy) != (0, 0))
        .map(Point::from)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,

    #[error("board width must be at least 1")]
    ZeroWidth,

    #[error("{len} cells do not fill rows of width {width}")]
    Ragged { len: usize, width: u32 },
}

/// A toroidal Life board.
///
/// Cells live in a flat row-major buffer. `back` is the second half of a double buffer: `step`
/// writes every next state into it while reading only from `buf`, then swaps the two.
#[derive(Clone, Debug)]
pub struct Board {
    buf: Vec<Cell>,
    back: Vec<Cell>,
    width: u32,
}

impl Board {
    pub fn new(width: u32, buf: Vec<Cell>) -> Result<Self, BoardError> {
        if width == 0 {
            return Err(BoardError::ZeroWidth);
        }
        if buf.is_empty() {
            return Err(BoardError::Empty);
        }
        if buf.len() % width as usize != 0 {
            return Err(BoardError::Ragged {
                len: buf.len(),
                width,
            });
        }
        Ok(Board {
            back: buf.clone(),
            buf,
            width,
        })
    }

    /// Fills a board by drawing one uniform sample per cell; the cell starts live when the sample
    /// falls below `config.live_ratio`.
    pub fn random<R: Rng>(config: &Config, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let len = config.width as usize * config.height as usize;
        let buf = (0..len)
            .map(|_| {
                if rng.gen::<f64>() < config.live_ratio {
                    Cell::Live
                } else {
                    Cell::Dead
                }
            })
            .collect::<Vec<_>>();
        Ok(Board {
            back: buf.clone(),
            buf,
            width: config.width,
        })
    }

    /// Parses rows of text, `live` marking live cells and anything else dead. Rows must share a
    /// length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], live: char) -> Result<Self, BoardError> {
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .unwrap_or(0);
        let buf = rows
            .iter()
            .flat_map(|r| r.as_ref().chars())
            .map(|c| if c == live { Cell::Live } else { Cell::Dead })
            .collect::<Vec<_>>();
        let width = width as u32;
        if rows.iter().any(|r| r.as_ref().chars().count() != width as usize) {
            return Err(BoardError::Ragged {
                len: buf.len(),
                width,
            });
        }
        Self::new(width, buf)
    }

    /// Reads a hand-written pattern: one line per row, `live` marking live cells. Trailing blank
    /// lines are dropped and short rows are padded with dead cells.
    pub fn parse(text: &str, live: char) -> Result<Self, BoardError> {
        let dead = if live == '.' { ' ' } else { '.' };
        let lines = text
            .trim_end_matches(|c: char| c == '\n' || c == '\r')
            .lines()
            .collect::<Vec<_>>();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let rows = lines
            .iter()
            .map(|l| {
                let pad = width - l.chars().count();
                l.chars()
                    .chain(std::iter::repeat(dead).take(pad))
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        Self::from_rows(&rows, live)
    }

    fn pt_to_index(&self, mut pt: Point) -> usize {
        pt.remap(self.width(), self.height());
        ((pt.y * self.width as i64) + pt.x) as usize
    }

    fn index_to_pt(&self, i: usize) -> Point {
        let w = self.width as usize;
        Point {
            x: (i % w) as i64,
            y: (i / w) as i64,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        (self.buf.len() / (self.width() as usize)) as u32
    }

    #[cfg(test)]
    pub fn set(&mut self, pt: impl Into<Point>, cell: Cell) {
        let idx = self.pt_to_index(pt.into());
        self.buf[idx] = cell;
    }

    /// Number of live cells among the eight wrapped neighbors of `pt`.
    pub fn neighbor_count(&self, pt: impl Into<Point>) -> u8 {
        let pt = pt.into();
        neighbor_offsets()
            .filter(|&off| self[pt + off].is_live())
            .count() as u8
    }

    /// State `pt` takes in the next generation, computed from the current buffer only.
    pub fn next_state(&self, pt: impl Into<Point>) -> Cell {
        let pt = pt.into();
        self[pt].next(self.neighbor_count(pt))
    }

    /// Advances one generation.
    pub fn step(&mut self) {
        let mut next = std::mem::take(&mut self.back);
        for (i, slot) in next.iter_mut().enumerate() {
            *slot = self.next_state(self.index_to_pt(i));
        }
        self.back = std::mem::replace(&mut self.buf, next);
    }

    pub fn alive(&self) -> usize {
        self.buf.iter().filter(|c| c.is_live()).count()
    }

    /// One string per row, top to bottom, one symbol per cell.
    pub fn render(&self, symbols: Symbols) -> Vec<String> {
        self.buf
            .chunks(self.width as usize)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Live => symbols.live,
                        Cell::Dead => symbols.dead,
                    })
                    .collect()
            })
            .collect()
    }
}

impl Index<Point> for Board {
    type Output = Cell;
    fn index(&self, index: Point) -> &Self::Output {
        &self.buf[self.pt_to_index(index)]
    }
}
