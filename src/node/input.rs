//! Falling-edge detection for the two idle-high push buttons.

use crate::hal::DigitalInput;

/// Detects high→low transitions between successive samples.
///
/// Sampling once per loop iteration with a fixed inter-iteration delay is
/// the whole debounce strategy; there is no separate filter.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    last_high: bool,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        // Inputs are pulled up, so idle reads high.
        Self { last_high: true }
    }
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `high` and returns `true` if it completes a falling edge.
    pub fn sample(&mut self, high: bool) -> bool {
        let falling = self.last_high && !high;
        self.last_high = high;
        falling
    }
}

/// Edges seen in one iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    /// Heat pump toggle button pressed.
    pub heat_pump: bool,
    /// Wind button pressed.
    pub wind: bool,
}

impl ButtonEdges {
    pub fn any(&self) -> bool {
        self.heat_pump || self.wind
    }
}

/// The two physical buttons with their edge detectors.
#[derive(Debug)]
pub struct Buttons<I> {
    heat_pump: I,
    wind: I,
    heat_pump_edge: EdgeDetector,
    wind_edge: EdgeDetector,
}

impl<I: DigitalInput> Buttons<I> {
    pub fn new(heat_pump: I, wind: I) -> Self {
        Self {
            heat_pump,
            wind,
            heat_pump_edge: EdgeDetector::new(),
            wind_edge: EdgeDetector::new(),
        }
    }

    /// Samples both inputs once.
    pub fn poll(&mut self) -> ButtonEdges {
        ButtonEdges {
            heat_pump: self.heat_pump_edge.sample(self.heat_pump.is_high()),
            wind: self.wind_edge.sample(self.wind.is_high()),
        }
    }

    pub fn heat_pump_input(&mut self) -> &mut I {
        &mut self.heat_pump
    }

    pub fn wind_input(&mut self) -> &mut I {
        &mut self.wind
    }
}
