use crate::{
    display::{CharGrid, Display, COLS},
    model::{SattrackError, SattrackResult},
};
use std::io::Write;

/// Prints the 20x4 grid to a writer each time the loop flushes.
///
/// Consecutive identical frames are printed once.
pub struct TerminalDisplay<W: Write> {
    grid: CharGrid,
    out: W,
    last_frame: Option<Vec<String>>,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            grid: CharGrid::new(),
            out,
            last_frame: None,
        }
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_frame(&mut self, rows: &[String]) -> std::io::Result<()> {
        let border = format!("+{}+", "-".repeat(COLS));
        writeln!(self.out, "{border}")?;
        for row in rows {
            writeln!(self.out, "|{row}|")?;
        }
        writeln!(self.out, "{border}")?;
        self.out.flush()
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn clear(&mut self) -> SattrackResult<()> {
        self.grid.clear()
    }

    fn write(&mut self, text: &str) -> SattrackResult<()> {
        self.grid.write(text)
    }

    fn newline(&mut self) -> SattrackResult<()> {
        self.grid.newline()
    }

    fn set_cursor(&mut self, row: usize, col: usize) -> SattrackResult<()> {
        self.grid.set_cursor(row, col)
    }

    fn flush(&mut self) -> SattrackResult<()> {
        let rows = self.grid.rows();
        if self.last_frame.as_ref() == Some(&rows) {
            return Ok(());
        }
        self.print_frame(&rows)
            .map_err(|e| SattrackError::DisplayError(e.to_string()))?;
        self.last_frame = Some(rows);
        Ok(())
    }

    fn release(&mut self) -> SattrackResult<()> {
        self.last_frame = None;
        self.out
            .flush()
            .map_err(|e| SattrackError::DisplayError(e.to_string()))
    }
}
