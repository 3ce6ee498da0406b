use anyhow::Result;

use super::cell::CellData;

/// Receives render instructions in row-major order.
pub trait RenderSink {
    fn emit(&mut self, glyph: char, fg: u8, bg: u8) -> Result<()>;
    fn emit_newline(&mut self) -> Result<()>;
}

/// Collects cells in memory, one `Vec` per finished row
#[derive(Debug, Default)]
pub struct CellBuffer {
    rows: Vec<Vec<CellData>>,
    current: Vec<CellData>,
}

impl CellBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Vec<CellData>] {
        &self.rows
    }

    /// Cells of the row still being written
    pub fn pending(&self) -> &[CellData] {
        &self.current
    }

    /// Glyphs only, one line per row
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            text.extend(row.iter().map(|c| c.glyph));
            text.push('\n');
        }
        text
    }
}

impl RenderSink for CellBuffer {
    fn emit(&mut self, glyph: char, fg: u8, bg: u8) -> Result<()> {
        self.current.push(CellData { glyph, fg, bg });
        Ok(())
    }

    fn emit_newline(&mut self) -> Result<()> {
        self.rows.push(std::mem::take(&mut self.current));
        Ok(())
    }
}
