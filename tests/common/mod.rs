//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use house_node::appliances::{Battery, DiscreteLoadAppliance, OnOffAppliance, Turbine};
use house_node::display::{CharDisplay, DisplayError, GlyphBitmap, LCD_COLUMNS, LCD_ROWS};
use house_node::hal::{
    Board, DigitalInput, DigitalOutput, PixelStrip, PwmChannel, Rgb, SerialLink, TickSource,
};
use house_node::node::{House, Node, NodeSettings, Peripherals};

/// Pin usable as an output or as an idle-high button.
#[derive(Debug)]
pub struct MockPin {
    pub high: bool,
}

impl DigitalOutput for MockPin {
    fn set_level(&mut self, high: bool) {
        self.high = high;
    }
}

impl DigitalInput for MockPin {
    fn is_high(&mut self) -> bool {
        self.high
    }
}

#[derive(Debug, Default)]
pub struct MockPixels {
    pub frame: Vec<Rgb>,
}

impl PixelStrip for MockPixels {
    fn write(&mut self, pixels: &[Rgb]) {
        self.frame = pixels.to_vec();
    }
}

#[derive(Debug, Default)]
pub struct MockPwm {
    pub duty: u16,
}

impl PwmChannel for MockPwm {
    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
    }
}

/// Serial link fed from a queue; everything sent is recorded.
#[derive(Debug, Default)]
pub struct MockSerial {
    pub incoming: VecDeque<Vec<u8>>,
    pub sent: Vec<String>,
    pub fail_reads: bool,
}

impl MockSerial {
    pub fn push(&mut self, line: &str) {
        self.push_bytes(line.as_bytes());
    }

    pub fn push_bytes(&mut self, line: &[u8]) {
        self.incoming.push_back(line.to_vec());
    }
}

impl SerialLink for MockSerial {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.fail_reads {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "link down"));
        }
        Ok(self.incoming.pop_front())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.sent.push(line.to_string());
        Ok(())
    }
}

/// 16×2 character buffer that records glyph uploads.
#[derive(Debug)]
pub struct MockDisplay {
    pub cells: [[char; LCD_COLUMNS]; LCD_ROWS],
    pub cursor: (usize, usize),
    pub glyph_slots: Vec<u8>,
    pub clears: usize,
    pub fail: bool,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self {
            cells: [[' '; LCD_COLUMNS]; LCD_ROWS],
            cursor: (0, 0),
            glyph_slots: Vec::new(),
            clears: 0,
            fail: false,
        }
    }
}

impl MockDisplay {
    pub fn row(&self, row: usize) -> String {
        self.cells[row].iter().collect()
    }

    fn check(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::Bus("i2c nack".to_string()))
        } else {
            Ok(())
        }
    }
}

impl CharDisplay for MockDisplay {
    fn move_to(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.check()?;
        self.cursor = (usize::from(col), usize::from(row));
        Ok(())
    }

    fn putstr(&mut self, text: &str) -> Result<(), DisplayError> {
        self.check()?;
        let (mut col, row) = self.cursor;
        for c in text.chars().take(LCD_COLUMNS.saturating_sub(col)) {
            self.cells[row][col] = c;
            col += 1;
        }
        self.cursor = (col, row);
        Ok(())
    }

    fn custom_char(&mut self, slot: u8, _glyph: &GlyphBitmap) -> Result<(), DisplayError> {
        self.check()?;
        self.glyph_slots.push(slot);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.cells = [[' '; LCD_COLUMNS]; LCD_ROWS];
        self.cursor = (0, 0);
        self.clears += 1;
        Ok(())
    }
}

/// Manual clock; sleeping advances time instantly.
#[derive(Debug, Default)]
pub struct MockClock {
    pub now: u32,
    pub slept: Vec<u32>,
}

impl TickSource for MockClock {
    fn now_ms(&mut self) -> u32 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.slept.push(ms);
        self.now = self.now.wrapping_add(ms);
    }
}

#[derive(Debug)]
pub struct MockBoard;

impl Board for MockBoard {
    type Led = MockPin;
    type Pixels = MockPixels;
    type TurbinePwm = MockPwm;
    type Button = MockPin;
    type Serial = MockSerial;
    type Display = MockDisplay;
    type Clock = MockClock;
}

pub type MockHouse = House<MockPin, MockPixels, MockPwm>;

/// Default house: 1-unit light, heat pump, turbine, empty 50/3 battery.
pub fn default_house() -> MockHouse {
    House::new(
        OnOffAppliance::new(1, MockPin { high: false }),
        DiscreteLoadAppliance::new(MockPixels::default()),
        Turbine::new(MockPwm::default()),
        Battery::default(),
    )
}

pub fn peripherals(display: MockDisplay, start_ms: u32) -> Peripherals<MockBoard> {
    Peripherals {
        heat_pump_button: MockPin { high: true },
        wind_button: MockPin { high: true },
        serial: MockSerial::default(),
        display,
        clock: MockClock {
            now: start_ms,
            slept: Vec::new(),
        },
    }
}

pub fn settings() -> NodeSettings {
    NodeSettings {
        report_interval_ms: 1000,
        idle_delay_ms: 100,
        marquee: "ABCDEFGHIJKLMNOPQR".to_string(),
    }
}

/// Node with the default house and settings, clock at zero.
pub fn default_node() -> Node<MockBoard> {
    Node::new(
        default_house(),
        peripherals(MockDisplay::default(), 0),
        &settings(),
    )
    .expect("mock setup should succeed")
}

/// Iterates until the next report and returns it.
pub fn next_report(node: &mut Node<MockBoard>) -> house_node::node::PowerBalance {
    for _ in 0..10_000 {
        let iteration = node.iterate().expect("iteration should succeed");
        if let Some(report) = iteration.report {
            return report;
        }
    }
    panic!("no report within 10000 iterations");
}
