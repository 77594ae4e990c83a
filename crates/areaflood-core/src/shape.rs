//! Shapes drawn as text.
//!
//! A [`Shape`] parses a square ASCII picture into cell states that can be
//! painted onto a [`Grid`]:
//!
//! ```text
//! #####
//! #...#
//! #.S.#
//! #...#
//! #####
//! ```
//!
//! `.` is a default cell, `#` a boundary cell and `S` the start point.

use std::fmt;

use crate::cell::CellState;
use crate::geom::Point;
use crate::grid::{Grid, GridConfig, GridError};

/// A parsed square picture of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    states: Vec<CellState>,
    size: usize,
    start: Option<usize>,
}

impl Shape {
    /// Characters accepted by [`parse`](Self::parse).
    pub const RUNES: &'static str = ".#S";

    /// Parse a picture.
    ///
    /// Leading and trailing whitespace of the whole text is trimmed; lines
    /// are not. Every line must be as wide as there are lines, and at most
    /// one `S` may appear.
    pub fn parse(s: &str) -> Result<Self, ShapeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShapeError::Empty);
        }

        let mut states = Vec::new();
        let mut start: Option<Point> = None;
        let mut width: Option<usize> = None;
        let mut height = 0;

        for (y, line) in s.lines().enumerate() {
            let mut x = 0;
            for ch in line.chars() {
                let pos = Point::new(x, y);
                let state = match CellState::from_glyph(ch) {
                    Some(state) if Self::RUNES.contains(ch) => state,
                    _ => return Err(ShapeError::InvalidRune { ch, pos }),
                };
                if state == CellState::StartPoint {
                    if let Some(first) = start {
                        return Err(ShapeError::MultipleStartPoints { first, second: pos });
                    }
                    start = Some(pos);
                }
                states.push(state);
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(ShapeError::InconsistentWidth {
                        line: y,
                        expected: w,
                        found: x,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        if width != height {
            return Err(ShapeError::NotSquare { width, height });
        }
        Ok(Self {
            states,
            size: width,
            start: start.map(|p| p.to_index(width)),
        })
    }

    /// Side length of the picture.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the `S` cell, if any.
    pub fn start_point(&self) -> Option<usize> {
        self.start
    }

    /// States in row-major order.
    pub fn states(&self) -> &[CellState] {
        &self.states
    }

    /// Rebuild `grid` to this shape's size and paint the shape on it.
    pub fn draw(&self, grid: &Grid) -> Result<(), ShapeError> {
        grid.rebuild(self.size)?;
        for (index, state) in self.states.iter().enumerate() {
            match state {
                CellState::Boundary => grid.set_boundary(index, true)?,
                CellState::StartPoint => grid.set_start_point(index)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Build a fresh grid holding this shape.
    pub fn build(&self, config: GridConfig) -> Result<Grid, ShapeError> {
        let grid = Grid::with_config(self.size, config)?;
        self.draw(&grid)?;
        Ok(grid)
    }
}

/// Errors that can occur when parsing or drawing a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Nothing but whitespace.
    Empty,
    /// A line is wider or narrower than the first one.
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// The picture is not square.
    NotSquare { width: usize, height: usize },
    /// A character outside [`Shape::RUNES`].
    InvalidRune { ch: char, pos: Point },
    /// More than one `S`.
    MultipleStartPoints { first: Point, second: Point },
    /// The target grid rejected the shape.
    Grid(GridError),
}

impl From<GridError> for ShapeError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "shape: empty picture"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "shape: line {line} has {found} cells, expected {expected}"
            ),
            Self::NotSquare { width, height } => {
                write!(f, "shape: picture is {width}x{height}, must be square")
            }
            Self::InvalidRune { ch, pos } => write!(
                f,
                "shape: invalid character \u{201c}{ch}\u{201d} at {pos}; use one of \u{201c}{}\u{201d}",
                Shape::RUNES
            ),
            Self::MultipleStartPoints { first, second } => {
                write!(f, "shape: second start point at {second} (first at {first})")
            }
            Self::Grid(e) => write!(f, "shape: {e}"),
        }
    }
}

impl std::error::Error for ShapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}
