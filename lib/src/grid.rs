use std::hash::Hash;

use itertools::Itertools;
use strum::VariantArray;

pub(crate) type Coord = usize;

/// A location `(x, y)` on a board. The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// Row-major `(y, x)` index for an [`ndarray::Array2`] holding this board.
    pub fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Offset by a signed step; wraps on underflow, so an out-of-bounds result
    /// fails any subsequent bounds check rather than panicking here.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(
            self.0.wrapping_add_signed(rhs.0),
            self.1.wrapping_add_signed(rhs.1),
        )
    }

    /// Manhattan distance to `other`, the stock heuristic for 4-connected
    /// route puzzles.
    pub fn manhattan(&self, other: &Self) -> u32 {
        (self.0.abs_diff(other.0) + self.1.abs_diff(other.1)) as u32
    }
}

/// A unit move on some grid organization, enumerable via
/// [`VariantArray`](strum::VariantArray).
pub trait Step: Sized + Copy + VariantArray + PartialEq + Eq + Hash {
    /// The location one step in this direction from `location`.
    fn attempt_from(&self, location: Location) -> Location;

    /// Every direction paired with the location it reaches from `location`.
    ///
    /// Results may lie outside any particular board; callers bounds-check.
    fn neighbors_of(location: Location) -> Vec<(Self, Location)> {
        Self::VARIANTS
            .iter()
            .map(|dir| (*dir, dir.attempt_from(location)))
            .collect_vec()
    }
}

/// The four orthogonal moves on a square grid.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum SquareStep {
    Up,
    Down,
    Left,
    Right,
}

impl Step for SquareStep {
    fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }
}
