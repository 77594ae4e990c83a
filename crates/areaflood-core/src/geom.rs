//! Grid geometry: [`Point`] and the von Neumann [`Neighborhood`].
//!
//! Cells are addressed by a flat row-major index. Neighbors are derived from
//! the grid size and that index alone; nothing about adjacency is stored.

use std::fmt;
use std::ops::Deref;

/// A (column, row) position. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Row-major index of this point in a square grid of side `size`.
    #[inline]
    pub const fn to_index(self, size: usize) -> usize {
        self.y * size + self.x
    }

    /// Inverse of [`to_index`](Self::to_index).
    #[inline]
    pub const fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: index % size,
            y: index / size,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The up-to-four orthogonal neighbors of a cell, as indices.
///
/// Order is always left, up, right, down with missing edges skipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    slots: [usize; 4],
    len: usize,
}

impl Neighborhood {
    const EMPTY: Self = Self {
        slots: [0; 4],
        len: 0,
    };

    #[inline]
    const fn push(mut self, index: usize) -> Self {
        self.slots[self.len] = index;
        self.len += 1;
        self
    }
}

impl Deref for Neighborhood {
    type Target = [usize];

    #[inline]
    fn deref(&self) -> &[usize] {
        &self.slots[..self.len]
    }
}

impl<'a> IntoIterator for &'a Neighborhood {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Von Neumann neighborhood of `index` in a square grid of side `size`.
///
/// No diagonals and no wraparound. An `index` outside the grid (or a zero
/// `size`) has no neighbors.
pub const fn von_neumann(size: usize, index: usize) -> Neighborhood {
    let mut n = Neighborhood::EMPTY;
    if size == 0 || index >= size * size {
        return n;
    }
    let col = index % size;
    let row = index / size;
    let last_row = (size * size - 1) / size;

    if col > 0 {
        n = n.push(index - 1);
    }
    if row > 0 {
        n = n.push(index - size);
    }
    if col < size - 1 {
        n = n.push(index + 1);
    }
    if row < last_row {
        n = n.push(index + size);
    }
    n
}
