//! Status screen: the power summary line and the scrolling marquee.

use super::{CharDisplay, DisplayError, LCD_COLUMNS, StatusGlyphs};
use crate::node::power_balance::PowerBalance;

/// Prefix of the total-flow field; a ROM character, not a custom glyph.
const TOTAL_PREFIX: char = '=';

/// Horizontally scrolling text.
///
/// # Examples
///
/// ```
/// use house_node::display::status::Marquee;
///
/// let mut marquee = Marquee::new("ABCDEFGHIJKLMNOPQR");
/// for _ in 0..17 {
///     marquee.advance();
/// }
/// assert_eq!(marquee.window(16), "RABCDEFGHIJKLMNO");
/// ```
#[derive(Debug, Clone)]
pub struct Marquee {
    text: Vec<char>,
    offset: usize,
}

impl Marquee {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            offset: 0,
        }
    }

    /// Current scroll offset in `0..len`.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Text visible in a window of `width` characters at the current offset.
    ///
    /// A window running past the end continues from the start of the text.
    /// Empty text yields a blank window.
    pub fn window(&self, width: usize) -> String {
        if self.text.is_empty() {
            return " ".repeat(width);
        }
        self.text
            .iter()
            .cycle()
            .skip(self.offset)
            .take(width)
            .collect()
    }

    /// Scrolls left by one character, wrapping at the end of the text.
    pub fn advance(&mut self) {
        if !self.text.is_empty() {
            self.offset = (self.offset + 1) % self.text.len();
        }
    }
}

/// Pads or truncates `line` to exactly `width` characters.
fn fit(line: &str, width: usize) -> String {
    line.chars()
        .chain(std::iter::repeat(' '))
        .take(width)
        .collect()
}

/// Formats the power summary row.
///
/// `⌂+4 ✇-2 ▯-2 =+0` with each custom glyph standing in for its symbol.
/// When the spaced row is wider than the display the separators are
/// dropped. The total field is always shown in full; if the row is still
/// too wide, the load fields before it are cut.
pub fn status_line(balance: &PowerBalance, glyphs: &StatusGlyphs) -> String {
    let loads = [
        format!("{}{:+}", glyphs.house, balance.house_load),
        format!("{}{:+}", glyphs.turbine, balance.turbine_load),
        format!("{}{:+}", glyphs.battery(balance.battery_glyph), balance.battery_load),
    ];
    let total = format!("{TOTAL_PREFIX}{:+}", balance.total_load);

    let spaced = format!("{} {total}", loads.join(" "));
    if spaced.chars().count() <= LCD_COLUMNS {
        return fit(&spaced, LCD_COLUMNS);
    }
    let room = LCD_COLUMNS.saturating_sub(total.chars().count());
    let head: String = loads.concat().chars().take(room).collect();
    fit(&format!("{head}{total}"), LCD_COLUMNS)
}

/// Renders the two status rows and owns the marquee position.
#[derive(Debug, Clone)]
pub struct StatusScreen {
    glyphs: StatusGlyphs,
    marquee: Marquee,
}

impl StatusScreen {
    pub fn new(glyphs: StatusGlyphs, marquee: Marquee) -> Self {
        Self { glyphs, marquee }
    }

    pub fn glyphs(&self) -> &StatusGlyphs {
        &self.glyphs
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// Draws `balance` on row 0 and the marquee on row 1, then scrolls the
    /// marquee by one character for the next report.
    pub fn render<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        balance: &PowerBalance,
    ) -> Result<(), DisplayError> {
        display.move_to(0, 0)?;
        display.putstr(&status_line(balance, &self.glyphs))?;
        display.move_to(0, 1)?;
        display.putstr(&self.marquee.window(LCD_COLUMNS))?;
        self.marquee.advance();
        Ok(())
    }
}
