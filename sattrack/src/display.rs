//! Character display contract and an in-memory 20x4 grid.

use crate::model::{SattrackError, SattrackResult};

pub const COLS: usize = 20;
pub const ROWS: usize = 4;

/// A row/column addressed character display.
pub trait Display {
    fn clear(&mut self) -> SattrackResult<()>;
    fn write(&mut self, text: &str) -> SattrackResult<()>;
    /// Moves to the first column of the next row.
    fn newline(&mut self) -> SattrackResult<()>;
    fn set_cursor(&mut self, row: usize, col: usize) -> SattrackResult<()>;
    /// Pushes buffered output to the device, if it buffers.
    fn flush(&mut self) -> SattrackResult<()> {
        Ok(())
    }

    /// Gives the device back at shutdown.
    fn release(&mut self) -> SattrackResult<()> {
        Ok(())
    }
}

/// Display memory of an HD44780-style 20x4 panel.
///
/// Writing past the last column wraps to the next row, writing past the
/// last row wraps to the first, matching the controller's addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    cells: [[char; COLS]; ROWS],
    row: usize,
    col: usize,
}

impl Default for CharGrid {
    fn default() -> Self {
        Self {
            cells: [[' '; COLS]; ROWS],
            row: 0,
            col: 0,
        }
    }
}

impl CharGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of one row, trailing blanks included.
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..ROWS).map(|row| self.row_text(row)).collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|c| *c == ' ')
    }

    fn put(&mut self, c: char) {
        self.cells[self.row][self.col] = c;
        self.col += 1;
        if self.col == COLS {
            self.col = 0;
            self.row = (self.row + 1) % ROWS;
        }
    }
}

impl Display for CharGrid {
    fn clear(&mut self) -> SattrackResult<()> {
        self.cells = [[' '; COLS]; ROWS];
        self.row = 0;
        self.col = 0;
        Ok(())
    }

    fn write(&mut self, text: &str) -> SattrackResult<()> {
        for c in text.chars() {
            self.put(c);
        }
        Ok(())
    }

    fn newline(&mut self) -> SattrackResult<()> {
        self.col = 0;
        self.row = (self.row + 1) % ROWS;
        Ok(())
    }

    fn set_cursor(&mut self, row: usize, col: usize) -> SattrackResult<()> {
        if row >= ROWS || col >= COLS {
            return Err(SattrackError::DisplayError(format!(
                "cursor ({row}, {col}) is outside the {COLS}x{ROWS} grid"
            )));
        }
        self.row = row;
        self.col = col;
        Ok(())
    }
}
