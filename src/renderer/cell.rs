use serde::Serialize;

/// Represents a single character cell on the console
///
/// Colors are console palette indices, not RGB
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct CellData {
    pub glyph: char,
    pub fg: u8,
    pub bg: u8,
}

impl Default for CellData {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: 0,
            bg: 0,
        }
    }
}
