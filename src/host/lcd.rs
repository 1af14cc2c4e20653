//! Terminal stand-in for the 16×2 character LCD.

use tracing::debug;

use crate::display::{
    CharDisplay, DisplayError, GLYPH_SLOTS, GlyphBitmap, LCD_COLUMNS, LCD_ROWS,
};

/// Shades used for custom glyphs, indexed by lit-pixel density.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// In-memory character LCD that logs each row it draws.
///
/// Custom glyphs show as a shade block matching how much of the 5×8 cell
/// they light up.
#[derive(Debug)]
pub struct TerminalLcd {
    cells: [[char; LCD_COLUMNS]; LCD_ROWS],
    col: usize,
    row: usize,
    glyphs: [Option<GlyphBitmap>; GLYPH_SLOTS as usize],
}

impl TerminalLcd {
    pub fn new() -> Self {
        Self {
            cells: [[' '; LCD_COLUMNS]; LCD_ROWS],
            col: 0,
            row: 0,
            glyphs: [None; GLYPH_SLOTS as usize],
        }
    }

    /// Row `row` as it would appear on the panel.
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().map(|&c| self.render(c)).collect())
            .unwrap_or_default()
    }

    fn render(&self, c: char) -> char {
        let code = c as u32;
        if code >= u32::from(GLYPH_SLOTS) {
            return c;
        }
        match self.glyphs[code as usize] {
            Some(bitmap) => {
                let lit: u32 = bitmap.iter().map(|r| (r & 0x1f).count_ones()).sum();
                // 40 pixels per cell.
                let shade = (lit as usize * (SHADES.len() - 1) + 39) / 40;
                SHADES[shade.min(SHADES.len() - 1)]
            }
            None => ' ',
        }
    }
}

impl Default for TerminalLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl CharDisplay for TerminalLcd {
    fn move_to(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if usize::from(col) >= LCD_COLUMNS || usize::from(row) >= LCD_ROWS {
            return Err(DisplayError::OutOfBounds { col, row });
        }
        self.col = usize::from(col);
        self.row = usize::from(row);
        Ok(())
    }

    fn putstr(&mut self, text: &str) -> Result<(), DisplayError> {
        for c in text.chars() {
            if self.col >= LCD_COLUMNS {
                break;
            }
            self.cells[self.row][self.col] = c;
            self.col += 1;
        }
        debug!(row = self.row, text = %self.row_text(self.row), "lcd");
        Ok(())
    }

    fn custom_char(&mut self, slot: u8, glyph: &GlyphBitmap) -> Result<(), DisplayError> {
        let entry = self
            .glyphs
            .get_mut(usize::from(slot))
            .ok_or(DisplayError::OutOfBounds { col: slot, row: 0 })?;
        *entry = Some(*glyph);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.cells = [[' '; LCD_COLUMNS]; LCD_ROWS];
        self.col = 0;
        self.row = 0;
        Ok(())
    }
}
