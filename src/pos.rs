use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    ops::Sub,
};

/// A grid coordinate, `x` being the column and `y` the row
///
/// Serialized as a `[x, y]` pair, which is how pattern offsets are written
/// in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Pos2 {
    pub x: i32,
    pub y: i32,
}
impl Pos2 {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    #[inline]
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Addition that yields [`None`] instead of overflowing
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(rhs.x)?,
            y: self.y.checked_add(rhs.y)?,
        })
    }

    /// Converts to a `(row, col)` pair if the position lies inside a `rows x cols` grid
    #[inline]
    pub fn to_cell(self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let row = usize::try_from(self.y).ok()?;
        let col = usize::try_from(self.x).ok()?;
        (row < rows && col < cols).then_some((row, col))
    }
}
impl Default for Pos2 {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}
impl PartialOrd for Pos2 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pos2 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // row-major: compare y coordinate first, then x coordinate
        Ord::cmp(&self.y, &other.y).then(Ord::cmp(&self.x, &other.x))
    }
}
impl Sub for Pos2 {
    type Output = Pos2;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl From<(i32, i32)> for Pos2 {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
impl From<Pos2> for (i32, i32) {
    #[inline]
    fn from(pos: Pos2) -> Self {
        (pos.x, pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_row_major() {
        let mut cells = vec![Pos2::new(2, 1), Pos2::new(0, 1), Pos2::new(5, 0)];
        cells.sort();

        assert_eq!(cells, vec![Pos2::new(5, 0), Pos2::new(0, 1), Pos2::new(2, 1)]);
    }

    #[test]
    fn to_cell_rejects_out_of_bounds() {
        assert_eq!(Pos2::new(2, 1).to_cell(3, 4), Some((1, 2)));
        assert_eq!(Pos2::new(-1, 0).to_cell(3, 4), None);
        assert_eq!(Pos2::new(0, -1).to_cell(3, 4), None);
        assert_eq!(Pos2::new(4, 0).to_cell(3, 4), None);
        assert_eq!(Pos2::new(0, 3).to_cell(3, 4), None);
        assert_eq!(Pos2::zero().to_cell(0, 0), None);
    }

    #[test]
    fn checked_add_catches_overflow() {
        assert_eq!(Pos2::new(i32::MAX, 0).checked_add(Pos2::new(1, 0)), None);
        assert_eq!(
            Pos2::new(3, 4).checked_add(Pos2::new(-1, 2)),
            Some(Pos2::new(2, 6))
        );
    }

    #[test]
    fn serializes_as_pair() {
        let pos: Pos2 = serde_json::from_str("[3, -2]").expect("parse pair");
        assert_eq!(pos, Pos2::new(3, -2));
        assert_eq!(serde_json::to_string(&pos).expect("write pair"), "[3,-2]");
    }
}
