use crate::Pos2;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}
impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Self::Alive
    }
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }
}
impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive { Self::Alive } else { Self::Dead }
    }
}

/// A fixed-size `rows x cols` field of cells, stored row-major
///
/// Every coordinate-based write is bounds-checked; writes outside the grid
/// are silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// The relative positions of the 8 cells around a center cell
    const MOORE: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Dead; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }
    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_alive)
    }

    /// Sets a cell, returning whether `(row, col)` was inside the grid
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }
    /// Sets the cell at `pos` (`x` column, `y` row), returning whether it was inside the grid
    pub fn set_at(&mut self, pos: Pos2, cell: Cell) -> bool {
        match pos.to_cell(self.rows, self.cols) {
            Some((row, col)) => self.set(row, col, cell),
            None => false,
        }
    }
    /// Flips a cell between dead and alive, returning the new state
    pub fn toggle(&mut self, row: usize, col: usize) -> Option<Cell> {
        let i = self.index(row, col)?;
        self.cells[i] = self.cells[i].toggled();
        Some(self.cells[i])
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Iterates over the grid one row slice at a time
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // `max(1)` keeps `chunks` happy for a zero-width grid, which has no cells anyway
        self.cells.chunks(self.cols.max(1))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Counts live cells in the Moore neighborhood, without wrapping around edges
    pub fn alive_neighbors(&self, row: usize, col: usize) -> usize {
        Self::MOORE
            .iter()
            .filter(|&&(dr, dc)| {
                match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
                    (Some(r), Some(c)) => self.is_alive(r, c),
                    _ => false,
                }
            })
            .count()
    }

    /// The positions of all live cells, sorted row-major
    pub fn alive_positions(&self) -> Vec<Pos2> {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| Pos2::new((i % cols) as i32, (i / cols) as i32))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for cell in row {
                f.write_str(if cell.is_alive() { "█" } else { " " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
