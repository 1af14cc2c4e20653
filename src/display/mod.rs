//! Character display contract and glyph slot management.
//!
//! The node drives an HD44780-style 16×2 character LCD through
//! [`CharDisplay`]. Pixel transport belongs to the display driver; the node
//! only decides what goes where and which custom glyphs occupy the eight
//! CGRAM slots.

/// Status line and marquee rendering.
pub mod status;

use thiserror::Error;

use crate::appliances::battery::GLYPH_COUNT;
use crate::error::NodeError;

/// Characters per row.
pub const LCD_COLUMNS: usize = 16;
/// Number of rows.
pub const LCD_ROWS: usize = 2;
/// Custom glyph slots offered by the controller.
pub const GLYPH_SLOTS: u8 = 8;

/// One 5×8 custom glyph, one byte per pixel row (low five bits used).
pub type GlyphBitmap = [u8; 8];

/// Failures reported by a display driver.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display bus error: {0}")]
    Bus(String),
    #[error("position ({col}, {row}) is outside the display")]
    OutOfBounds { col: u8, row: u8 },
}

/// Capability contract of the character display.
pub trait CharDisplay {
    /// Moves the cursor to `col`, `row` (both zero-based).
    fn move_to(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Writes `text` at the cursor. Characters `'\0'..='\x07'` select
    /// custom glyph slots.
    fn putstr(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Uploads `glyph` into CGRAM `slot` (0–7).
    fn custom_char(&mut self, slot: u8, glyph: &GlyphBitmap) -> Result<(), DisplayError>;

    /// Blanks the screen and homes the cursor.
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// Hands out custom glyph slots in upload order.
///
/// Slots are never released; asking for a ninth glyph is a setup error.
#[derive(Debug, Default)]
pub struct GlyphBank {
    next_slot: u8,
}

impl GlyphBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots already taken.
    pub fn used(&self) -> u8 {
        self.next_slot
    }

    /// Uploads `glyph` to the next free slot and returns the character that
    /// displays it.
    ///
    /// # Errors
    ///
    /// [`NodeError::GlyphSlotsExhausted`] once all slots are in use, or the
    /// display's own error if the upload fails.
    pub fn register<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        glyph: &GlyphBitmap,
    ) -> Result<char, NodeError> {
        if self.next_slot >= GLYPH_SLOTS {
            return Err(NodeError::GlyphSlotsExhausted {
                slots: GLYPH_SLOTS,
            });
        }
        let slot = self.next_slot;
        display.custom_char(slot, glyph)?;
        self.next_slot += 1;
        Ok(char::from(slot))
    }
}

const HOUSE_GLYPH: GlyphBitmap = [0x04, 0x0E, 0x1F, 0x11, 0x15, 0x11, 0x1F, 0x00];
const TURBINE_GLYPH: GlyphBitmap = [0x11, 0x0A, 0x04, 0x0A, 0x11, 0x04, 0x04, 0x0E];

/// Battery outlines from empty to full, one per 20% of charge.
const BATTERY_GLYPHS: [GlyphBitmap; GLYPH_COUNT] = [
    [0x0E, 0x1B, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    [0x0E, 0x1B, 0x11, 0x11, 0x11, 0x11, 0x1F, 0x1F],
    [0x0E, 0x1B, 0x11, 0x11, 0x11, 0x1F, 0x1F, 0x1F],
    [0x0E, 0x1B, 0x11, 0x11, 0x1F, 0x1F, 0x1F, 0x1F],
    [0x0E, 0x1B, 0x11, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F],
    [0x0E, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F],
];

/// Characters for the status line prefixes, after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusGlyphs {
    pub house: char,
    pub turbine: char,
    pub battery: [char; GLYPH_COUNT],
}

impl StatusGlyphs {
    /// Uploads the house, turbine and battery glyphs.
    pub fn upload<D: CharDisplay + ?Sized>(
        bank: &mut GlyphBank,
        display: &mut D,
    ) -> Result<Self, NodeError> {
        let house = bank.register(display, &HOUSE_GLYPH)?;
        let turbine = bank.register(display, &TURBINE_GLYPH)?;
        let mut battery = ['\0'; GLYPH_COUNT];
        for (slot, glyph) in battery.iter_mut().zip(BATTERY_GLYPHS.iter()) {
            *slot = bank.register(display, glyph)?;
        }
        Ok(Self {
            house,
            turbine,
            battery,
        })
    }

    /// Battery glyph for a glyph-table index, saturating at full.
    pub fn battery(&self, index: usize) -> char {
        self.battery[index.min(GLYPH_COUNT - 1)]
    }
}
