//! Terminal rendering of a grid with crossterm.
//!
//! Each cell is drawn as two columns so cells look roughly square. Redraws
//! move the cursor back up over the previous frame instead of clearing the
//! screen, so the picture stays in the scrollback when the run ends.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor},
    terminal::{self, ClearType},
};

use areaflood_core::{CellState, Grid};

/// Background color for a cell state.
pub fn state_color(state: CellState) -> CtColor {
    let (r, g, b) = match state {
        CellState::Default => (230, 230, 230),
        CellState::Boundary => (0, 0, 0),
        CellState::StartPoint => (200, 175, 70),
        CellState::Area => (200, 100, 115),
    };
    CtColor::Rgb { r, g, b }
}

/// The area line printed under the grid.
pub fn area_label(total: usize) -> String {
    format!("Area: {total} units^2")
}

/// Draws successive frames of one grid on a terminal-like writer.
pub struct Canvas<W: Write> {
    out: W,
    color: bool,
    drawn_rows: u16,
}

impl<W: Write> Canvas<W> {
    /// `color` selects filled cells; otherwise cells are drawn as glyphs.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            drawn_rows: 0,
        }
    }

    /// Draw the grid followed by the area label, over the previous frame.
    pub fn draw(&mut self, grid: &Grid, total: usize) -> io::Result<()> {
        if self.drawn_rows > 0 {
            queue!(self.out, cursor::MoveToPreviousLine(self.drawn_rows))?;
        }

        let size = grid.size();
        for (i, cell) in grid.cells().iter().enumerate() {
            if self.color {
                queue!(
                    self.out,
                    SetBackgroundColor(state_color(cell.state())),
                    Print("  ")
                )?;
            } else {
                queue!(self.out, Print(cell.state().glyph()))?;
            }
            if (i + 1) % size == 0 {
                if self.color {
                    queue!(self.out, ResetColor)?;
                }
                queue!(self.out, Print("\n"))?;
            }
        }
        queue!(
            self.out,
            terminal::Clear(ClearType::CurrentLine),
            Print(area_label(total)),
            Print("\n")
        )?;

        self.drawn_rows = u16::try_from(size + 1).unwrap_or(u16::MAX);
        self.out.flush()
    }

    /// Hand back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
