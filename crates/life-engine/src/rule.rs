//! The B3/S23 transition rule.

use life_core::Cell;

/// State of a cell in the next generation given its live neighbor count
pub fn next_state(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, 2 | 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival() {
        for n in 0..=8 {
            let expected = if n == 2 || n == 3 { Cell::Alive } else { Cell::Dead };
            assert_eq!(next_state(Cell::Alive, n), expected, "alive with {} neighbors", n);
        }
    }

    #[test]
    fn test_birth() {
        for n in 0..=8 {
            let expected = if n == 3 { Cell::Alive } else { Cell::Dead };
            assert_eq!(next_state(Cell::Dead, n), expected, "dead with {} neighbors", n);
        }
    }
}
