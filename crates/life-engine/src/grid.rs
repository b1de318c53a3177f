//! 2D grid of cells.

use life_core::{Cell, Error, Position, Result, Size};
use rand::Rng;

/// Offsets of the eight Moore neighbors
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A bounded, row-major grid. Edges are hard: nothing wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: Size,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-dead grid of the given shape
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::Dead; size.area()],
        }
    }

    /// Grid where every cell is independently alive with probability 1/2
    pub fn random<R: Rng + ?Sized>(size: Size, rng: &mut R) -> Self {
        let cells = (0..size.area()).map(|_| Cell::from(rng.gen::<bool>())).collect();
        Self { size, cells }
    }

    /// Build a grid from explicit rows. Rows must be non-empty and equally long.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let cols = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(Error::format(0, "grid has no cells")),
        };

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::format(
                    idx + 1,
                    format!("row has {} cells, expected {}", row.len(), cols),
                ));
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            size: Size::new(rows.len(), cols),
            cells,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let i = self.index(pos).ok_or(Error::OutOfBounds(pos))?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Flip a cell, returning its new state
    pub fn toggle(&mut self, pos: Position) -> Result<Cell> {
        let i = self.index(pos).ok_or(Error::OutOfBounds(pos))?;
        self.cells[i] = self.cells[i].toggled();
        Ok(self.cells[i])
    }

    /// Number of live cells among the in-bounds Moore neighbors of `pos`
    pub fn neighbor_count(&self, pos: Position) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| pos.offset(dr, dc))
            .filter_map(|neighbor| self.get(neighbor))
            .map(Cell::value)
            .sum()
    }

    /// Iterator over rows as slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size.cols.max(1))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (self.index_to_pos(i), cell))
    }

    pub fn live_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(pos, _)| pos)
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.size
            .contains(pos)
            .then(|| pos.row * self.size.cols + pos.col)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        Position::new(index / self.size.cols, index % self.size.cols)
    }
}
