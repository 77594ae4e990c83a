//! The [`Cell`] type: one grid unit with a state and a counted flag.

use std::fmt;

use crate::grid::GridError;

/// Every state a [`Cell`] can be in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Unpainted.
    #[default]
    Default,
    /// Painted as part of the shape's outline.
    Boundary,
    /// Where the traversal begins. At most one per grid.
    StartPoint,
    /// Counted by the traversal while it was `Default`. Never left.
    Area,
}

impl CellState {
    /// Whether `self → to` is an edge of the cell state machine.
    ///
    /// ```text
    /// Default  -> Boundary | StartPoint | Area
    /// Boundary -> Default | Area
    /// StartPoint -> Default
    /// ```
    pub const fn can_become(self, to: CellState) -> bool {
        matches!(
            (self, to),
            (Self::Default, Self::Boundary)
                | (Self::Default, Self::StartPoint)
                | (Self::Default, Self::Area)
                | (Self::Boundary, Self::Default)
                | (Self::Boundary, Self::Area)
                | (Self::StartPoint, Self::Default)
        )
    }

    /// The character used for this state in text shapes.
    pub const fn glyph(self) -> char {
        match self {
            Self::Default => '.',
            Self::Boundary => '#',
            Self::StartPoint => 'S',
            Self::Area => '*',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Default),
            '#' => Some(Self::Boundary),
            'S' => Some(Self::StartPoint),
            '*' => Some(Self::Area),
            _ => None,
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Boundary => "boundary",
            Self::StartPoint => "start point",
            Self::Area => "area",
        };
        f.write_str(name)
    }
}

/// A single grid unit.
///
/// The index is fixed at construction. `counted` only ever goes from
/// `false` to `true`; a fresh cell is only obtained by rebuilding the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    index: usize,
    state: CellState,
    counted: bool,
}

impl Cell {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self {
            index,
            state: CellState::Default,
            counted: false,
        }
    }

    /// Row-major position in the grid.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Whether the traversal has counted this cell.
    #[inline]
    pub const fn is_counted(&self) -> bool {
        self.counted
    }

    /// Move to `to` along a state machine edge.
    ///
    /// Edges into or out of [`CellState::StartPoint`] are refused here: the
    /// start point is unique per grid, so it is only set and cleared through
    /// [`Grid::set_start_point`](crate::Grid::set_start_point) and
    /// [`Grid::clear_start_point`](crate::Grid::clear_start_point). Outside
    /// this crate cells change only through [`Grid`](crate::Grid) methods.
    pub(crate) fn transition(&mut self, to: CellState) -> Result<(), GridError> {
        if to == CellState::StartPoint || self.state == CellState::StartPoint {
            return Err(self.invalid(to));
        }
        self.apply(to)
    }

    /// Mark the cell as counted. Returns `false` if it already was.
    #[inline]
    pub(crate) fn mark_counted(&mut self) -> bool {
        !std::mem::replace(&mut self.counted, true)
    }

    pub(crate) fn apply(&mut self, to: CellState) -> Result<(), GridError> {
        if !self.state.can_become(to) {
            return Err(self.invalid(to));
        }
        self.state = to;
        Ok(())
    }

    fn invalid(&self, to: CellState) -> GridError {
        GridError::InvalidTransition {
            index: self.index,
            from: self.state,
            to,
        }
    }
}
