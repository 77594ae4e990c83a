//! The [`Grid`] type: an N×N board of [`Cell`]s behind a shared handle.
//!
//! A `Grid` is a *handle* to shared storage. Cloning it yields another handle
//! to the **same** cells, so a painting front-end and an estimator can both
//! hold one. [`rebuild`](Grid::rebuild) through any handle replaces the
//! storage contents for every handle.
//!
//! Storage is single-threaded (`Rc<RefCell<_>>`): the painter and the
//! estimator take turns and never hold a borrow across calls.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cell::{Cell, CellState};
use crate::geom::{Neighborhood, Point, von_neumann};

/// Largest accepted grid side. Bounds the traversal at `MAX_SIZE²` visits.
pub const MAX_SIZE: usize = 128;

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Construction-time checks beyond the hard [`MAX_SIZE`] bound.
///
/// When a display extent is given (e.g. a window height in pixels, or a
/// terminal height in rows), the grid is refused if each cell would end up
/// smaller than `min_cell_size` units on that display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub min_cell_size: u32,
    pub display_extent: Option<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_cell_size: 2,
            display_extent: None,
        }
    }
}

impl GridConfig {
    /// Set the display extent cells are laid out on (builder).
    pub const fn with_display_extent(mut self, extent: u32) -> Self {
        self.display_extent = Some(extent);
        self
    }

    /// Set the minimum per-cell display size (builder).
    pub const fn with_min_cell_size(mut self, min: u32) -> Self {
        self.min_cell_size = min;
        self
    }

    /// Check `size` against [`MAX_SIZE`] and, if configured, the display.
    pub fn validate(&self, size: usize) -> Result<(), GridError> {
        if size == 0 {
            return Err(GridError::Empty);
        }
        if size > MAX_SIZE {
            return Err(GridError::TooLarge {
                size,
                max: MAX_SIZE,
            });
        }
        if let Some(extent) = self.display_extent {
            let cell_size = extent as usize / size;
            if cell_size < self.min_cell_size as usize {
                return Err(GridError::CellTooSmall {
                    size,
                    cell_size,
                    min: self.min_cell_size,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct GridBuffer {
    cells: Vec<Cell>,
    size: usize,
    start_point: Option<usize>,
    generation: u64,
    config: GridConfig,
}

impl GridBuffer {
    fn build(size: usize, generation: u64, config: GridConfig) -> Self {
        Self {
            cells: (0..size * size).map(Cell::new).collect(),
            size,
            start_point: None,
            generation,
            config,
        }
    }

    #[inline]
    fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, GridError> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(GridError::IndexOutOfRange { index, len })
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A square board of cells backed by shared storage.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<GridBuffer>>,
}

impl Grid {
    /// Create a `size`×`size` grid of default cells with no start point.
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::with_config(size, GridConfig::default())
    }

    /// Like [`new`](Self::new) with explicit display checks.
    ///
    /// The config is kept and applied again on every rebuild.
    pub fn with_config(size: usize, config: GridConfig) -> Result<Self, GridError> {
        config.validate(size)?;
        log::debug!("grid: built {size}x{size}");
        Ok(Self {
            buffer: Rc::new(RefCell::new(GridBuffer::build(size, 0, config))),
        })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.borrow().size
    }

    /// Number of cells, N².
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.borrow().cells.len()
    }

    /// Whether the grid has no cells. Construction rejects a zero size, so
    /// a built grid is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build counter, bumped by every [`rebuild`](Self::rebuild).
    #[inline]
    pub fn generation(&self) -> u64 {
        self.buffer.borrow().generation
    }

    #[inline]
    pub fn config(&self) -> GridConfig {
        self.buffer.borrow().config
    }

    /// Whether two handles share the same storage.
    #[inline]
    pub fn same_storage(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Index of the cell at `p`, or `None` if outside the grid.
    pub fn index_of(&self, p: Point) -> Option<usize> {
        let size = self.size();
        (p.x < size && p.y < size).then(|| p.to_index(size))
    }

    /// Position of `index`, or `None` if outside the grid.
    pub fn position(&self, index: usize) -> Option<Point> {
        let size = self.size();
        (index < size * size).then(|| Point::from_index(index, size))
    }

    /// Copy of the cell at `index`.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.buffer.borrow().cells.get(index).copied()
    }

    /// Copy of every cell, row-major.
    pub fn cells(&self) -> Vec<Cell> {
        self.buffer.borrow().cells.clone()
    }

    /// Von Neumann neighbors of `index` (left, up, right, down).
    #[inline]
    pub fn neighbors(&self, index: usize) -> Neighborhood {
        von_neumann(self.size(), index)
    }

    // -----------------------------------------------------------------------
    // Counting
    // -----------------------------------------------------------------------

    /// Count the default cell at `index` and turn it into area.
    ///
    /// Returns `false` (and changes nothing) if the cell is already counted
    /// or is not a default cell.
    pub fn claim_area(&self, index: usize) -> Result<bool, GridError> {
        let mut buf = self.buffer.borrow_mut();
        let cell = buf.cell_mut(index)?;
        if cell.is_counted() || cell.state() != CellState::Default {
            return Ok(false);
        }
        cell.apply(CellState::Area)?;
        Ok(cell.mark_counted())
    }

    /// Count the boundary cell at `index`.
    ///
    /// Returns `false` if the cell is already counted or is not a boundary
    /// cell.
    pub fn count_boundary(&self, index: usize) -> Result<bool, GridError> {
        let mut buf = self.buffer.borrow_mut();
        let cell = buf.cell_mut(index)?;
        if cell.state() != CellState::Boundary {
            return Ok(false);
        }
        Ok(cell.mark_counted())
    }

    /// Number of cells whose counted flag is set.
    pub fn counted_cells(&self) -> usize {
        self.buffer
            .borrow()
            .cells
            .iter()
            .filter(|c| c.is_counted())
            .count()
    }

    // -----------------------------------------------------------------------
    // Painting
    // -----------------------------------------------------------------------

    /// Paint (`true`) or erase (`false`) a boundary cell.
    ///
    /// Painting a cell that is already in the requested state is a no-op.
    /// Start points and area cells cannot be painted.
    pub fn set_boundary(&self, index: usize, on: bool) -> Result<(), GridError> {
        let mut buf = self.buffer.borrow_mut();
        let cell = buf.cell_mut(index)?;
        let to = if on {
            CellState::Boundary
        } else {
            CellState::Default
        };
        if cell.state() == to {
            return Ok(());
        }
        cell.transition(to)
    }

    /// Index of the start point, if one is set.
    #[inline]
    pub fn start_point(&self) -> Option<usize> {
        self.buffer.borrow().start_point
    }

    /// Mark the default cell at `index` as the start point.
    ///
    /// Fails if a start point already exists or the cell is not default.
    pub fn set_start_point(&self, index: usize) -> Result<(), GridError> {
        let mut buf = self.buffer.borrow_mut();
        if let Some(existing) = buf.start_point {
            return Err(GridError::StartPointTaken { existing });
        }
        buf.cell_mut(index)?.apply(CellState::StartPoint)?;
        buf.start_point = Some(index);
        Ok(())
    }

    /// Return the start point cell to default. Returns its index, if any.
    pub fn clear_start_point(&self) -> Option<usize> {
        let mut buf = self.buffer.borrow_mut();
        let index = buf.start_point.take()?;
        if let Ok(cell) = buf.cell_mut(index) {
            // StartPoint -> Default is always an edge.
            let _ = cell.apply(CellState::Default);
        }
        Some(index)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Discard every cell and the start point, rebuilding at `size`.
    ///
    /// All handles observe the new grid. On error the grid is unchanged.
    pub fn rebuild(&self, size: usize) -> Result<(), GridError> {
        let mut buf = self.buffer.borrow_mut();
        let config = buf.config;
        config.validate(size)?;
        let generation = buf.generation + 1;
        *buf = GridBuffer::build(size, generation, config);
        log::debug!("grid: rebuilt {size}x{size} (generation {generation})");
        Ok(())
    }

    /// [`rebuild`](Self::rebuild) at the current size.
    pub fn reset(&self) {
        let mut buf = self.buffer.borrow_mut();
        let (size, config) = (buf.size, buf.config);
        let generation = buf.generation + 1;
        *buf = GridBuffer::build(size, generation, config);
        log::debug!("grid: reset {size}x{size} (generation {generation})");
    }

    /// Render as text, one line per row, using [`CellState::glyph`].
    pub fn to_text(&self) -> String {
        let buf = self.buffer.borrow();
        let mut out = String::with_capacity(buf.cells.len() + buf.size);
        for (i, cell) in buf.cells.iter().enumerate() {
            if i > 0 && i % buf.size == 0 {
                out.push('\n');
            }
            out.push(cell.state().glyph());
        }
        out
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors raised by grid construction and painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid must have at least one cell.
    Empty,
    /// The side exceeds [`MAX_SIZE`].
    TooLarge { size: usize, max: usize },
    /// Cells would be drawn smaller than the configured minimum.
    CellTooSmall {
        size: usize,
        cell_size: usize,
        min: u32,
    },
    /// No cell at `index`.
    IndexOutOfRange { index: usize, len: usize },
    /// Not an edge of the cell state machine.
    InvalidTransition {
        index: usize,
        from: CellState,
        to: CellState,
    },
    /// The grid already has a start point.
    StartPointTaken { existing: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid: size must be at least 1"),
            Self::TooLarge { size, max } => write!(
                f,
                "grid: {size} cells per side would take too long to fill; use at most {max}"
            ),
            Self::CellTooSmall {
                size,
                cell_size,
                min,
            } => write!(
                f,
                "grid: {size} cells per side leaves {cell_size} units per cell, need at least {min}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "grid: cell {index} out of range (grid has {len} cells)")
            }
            Self::InvalidTransition { index, from, to } => {
                write!(f, "grid: cell {index} cannot go from {from} to {to}")
            }
            Self::StartPointTaken { existing } => {
                write!(f, "grid: start point already set at cell {existing}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_default() {
        let g = Grid::new(4).unwrap();
        assert_eq!(g.size(), 4);
        assert_eq!(g.len(), 16);
        assert!(!g.is_empty());
        assert_eq!(g.start_point(), None);
        for (i, c) in g.cells().iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(c.state(), CellState::Default);
            assert!(!c.is_counted());
        }
    }

    #[test]
    fn size_bounds() {
        assert!(Grid::new(1).is_ok());
        assert!(Grid::new(MAX_SIZE).is_ok());
        assert_eq!(
            Grid::new(MAX_SIZE + 1).unwrap_err(),
            GridError::TooLarge {
                size: 129,
                max: 128
            }
        );
        assert_eq!(Grid::new(0).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn display_extent_limits_size() {
        let config = GridConfig::default().with_display_extent(100);
        assert!(Grid::with_config(50, config).is_ok());
        assert_eq!(
            Grid::with_config(51, config).unwrap_err(),
            GridError::CellTooSmall {
                size: 51,
                cell_size: 1,
                min: 2
            }
        );
    }

    #[test]
    fn clones_share_storage() {
        let g = Grid::new(3).unwrap();
        let h = g.clone();
        h.set_boundary(4, true).unwrap();
        assert_eq!(g.cell(4).unwrap().state(), CellState::Boundary);
        assert!(g.same_storage(&h));
    }

    #[test]
    fn single_start_point() {
        let g = Grid::new(3).unwrap();
        g.set_start_point(4).unwrap();
        assert_eq!(g.start_point(), Some(4));
        assert_eq!(
            g.set_start_point(0).unwrap_err(),
            GridError::StartPointTaken { existing: 4 }
        );
        assert_eq!(g.clear_start_point(), Some(4));
        assert_eq!(g.cell(4).unwrap().state(), CellState::Default);
        assert_eq!(g.clear_start_point(), None);
        g.set_start_point(0).unwrap();
    }

    #[test]
    fn start_point_needs_default_cell() {
        let g = Grid::new(3).unwrap();
        g.set_boundary(2, true).unwrap();
        assert!(matches!(
            g.set_start_point(2),
            Err(GridError::InvalidTransition { index: 2, .. })
        ));
        assert_eq!(g.start_point(), None);
    }

    #[test]
    fn boundary_paint_and_erase() {
        let g = Grid::new(3).unwrap();
        g.set_boundary(1, true).unwrap();
        g.set_boundary(1, true).unwrap();
        assert_eq!(g.cell(1).unwrap().state(), CellState::Boundary);
        g.set_boundary(1, false).unwrap();
        assert_eq!(g.cell(1).unwrap().state(), CellState::Default);

        g.set_start_point(0).unwrap();
        assert!(g.set_boundary(0, true).is_err());
        assert_eq!(
            g.set_boundary(9, true).unwrap_err(),
            GridError::IndexOutOfRange { index: 9, len: 9 }
        );
    }

    #[test]
    fn rebuild_discards_everything() {
        let g = Grid::new(3).unwrap();
        g.set_boundary(0, true).unwrap();
        g.set_start_point(4).unwrap();
        assert!(g.count_boundary(0).unwrap());
        let generation = g.generation();

        g.rebuild(5).unwrap();
        assert_eq!(g.size(), 5);
        assert_eq!(g.start_point(), None);
        assert_eq!(g.counted_cells(), 0);
        assert!(g.cells().iter().all(|c| c.state() == CellState::Default));
        assert!(g.generation() > generation);

        assert!(g.rebuild(200).is_err());
        assert_eq!(g.size(), 5);
    }

    #[test]
    fn counting_is_limited_to_matching_cells() {
        let g = Grid::new(3).unwrap();
        g.set_boundary(1, true).unwrap();
        g.set_start_point(4).unwrap();

        assert!(!g.claim_area(1).unwrap());
        assert!(!g.claim_area(4).unwrap());
        assert!(!g.count_boundary(0).unwrap());
        assert!(!g.count_boundary(4).unwrap());
        assert_eq!(g.counted_cells(), 0);

        assert!(g.claim_area(0).unwrap());
        assert!(!g.claim_area(0).unwrap());
        assert_eq!(g.cell(0).unwrap().state(), CellState::Area);
        assert!(g.count_boundary(1).unwrap());
        assert!(!g.count_boundary(1).unwrap());
        assert_eq!(g.cell(1).unwrap().state(), CellState::Boundary);
        assert_eq!(g.counted_cells(), 2);

        assert_eq!(
            g.claim_area(9).unwrap_err(),
            GridError::IndexOutOfRange { index: 9, len: 9 }
        );
    }

    #[test]
    fn painting_never_produces_area() {
        let g = Grid::new(3).unwrap();
        for i in 0..9 {
            g.set_boundary(i, true).unwrap();
            g.set_boundary(i, false).unwrap();
        }
        g.set_start_point(4).unwrap();
        g.clear_start_point();
        assert!(g.cells().iter().all(|c| c.state() == CellState::Default));
        assert_eq!(g.counted_cells(), 0);

        // area cells cannot be painted back either
        g.claim_area(0).unwrap();
        assert_eq!(
            g.set_boundary(0, true).unwrap_err(),
            GridError::InvalidTransition {
                index: 0,
                from: CellState::Area,
                to: CellState::Boundary,
            }
        );
        assert!(matches!(
            g.set_start_point(0),
            Err(GridError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn reset_keeps_size() {
        let g = Grid::new(4).unwrap();
        g.set_boundary(3, true).unwrap();
        g.reset();
        assert_eq!(g.size(), 4);
        assert_eq!(g.cell(3).unwrap().state(), CellState::Default);
        assert_eq!(g.generation(), 1);
    }

    #[test]
    fn positions() {
        let g = Grid::new(4).unwrap();
        assert_eq!(g.index_of(Point::new(1, 2)), Some(9));
        assert_eq!(g.position(9), Some(Point::new(1, 2)));
        assert_eq!(g.index_of(Point::new(4, 0)), None);
        assert_eq!(g.position(16), None);
    }

    #[test]
    fn text_rendering() {
        let g = Grid::new(3).unwrap();
        g.set_boundary(0, true).unwrap();
        g.set_start_point(4).unwrap();
        assert_eq!(g.to_text(), "#..\n.S.\n...");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let config = GridConfig::default().with_display_extent(768);
        let json = serde_json::to_string(&config).unwrap();
        let back: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn config_fields_default() {
        let config: GridConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GridConfig::default());
    }
}
