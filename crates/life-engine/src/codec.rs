//! Plain-text grid format: one line per row, one '0'/'1' digit per cell.

use crate::grid::Grid;
use crate::simulation::GameOfLife;
use life_core::{Cell, Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, instrument};

/// Parse a grid. Blank lines are skipped; the first row fixes the width.
pub fn read_grid<R: BufRead>(reader: R) -> Result<Grid> {
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line = trim_ascii(&line);
        if line.is_empty() {
            continue;
        }

        let row = line
            .iter()
            .map(|&byte| {
                Cell::from_digit(char::from(byte)).ok_or_else(|| {
                    Error::format(idx + 1, format!("unexpected byte '{}'", byte.escape_ascii()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::format(
                    idx + 1,
                    format!("row has {} cells, expected {}", row.len(), first.len()),
                ));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Error::format(0, "no grid rows found"));
    }

    Grid::from_rows(rows)
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Write a grid, one '\n'-terminated line per row
pub fn write_grid<W: Write>(mut writer: W, grid: &Grid) -> Result<()> {
    for row in grid.rows() {
        let line: String = row.iter().map(|cell| cell.to_digit()).collect();
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        read_grid(s.as_bytes())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.to_digit())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameOfLife {
    /// New unbounded engine whose first generation is read from `reader`
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_grid(read_grid(reader)?)
    }

    #[instrument]
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let game = Self::from_reader(BufReader::new(file))?;
        info!(size = %game.size(), "Loaded grid");
        Ok(game)
    }

    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        write_grid(writer, self.current())
    }

    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.save_to(BufWriter::new(file))?;
        info!(generation = self.generations(), "Saved grid");
        Ok(())
    }
}
