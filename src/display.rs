//! Output seam between the simulation and the host platform
//!
//! The Tunnel entity is the sole renderer: once per tick it hands the
//! composited frame to whatever implements [`Display`]. Real hosts wrap
//! an LCD driver or a terminal; tests use [`RecordingDisplay`] to assert
//! on what would have been shown. All calls are fire-and-forget.

use crate::sim::bitmap::BitGrid;

/// What the simulation needs from the platform's display
pub trait Display {
    /// Present a full 1-bit frame
    fn draw_frame(&mut self, frame: &BitGrid);

    /// Draw a text string at a pixel column / text row
    fn draw_string(&mut self, x: u8, row: u8, text: &str);

    /// Update the dedicated score readout
    fn update_score(&mut self, score: u16);

    /// Power the display back up (leaving the screen saver's dark phase)
    fn power_on(&mut self);

    /// Power the display down (screen saver)
    fn power_off(&mut self);
}

/// A display that goes nowhere (headless simulation)
#[derive(Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn draw_frame(&mut self, _frame: &BitGrid) {}

    fn draw_string(&mut self, x: u8, row: u8, text: &str) {
        log::trace!("display: text {text:?} at ({x},{row})");
    }

    fn update_score(&mut self, score: u16) {
        log::trace!("display: score {score}");
    }

    fn power_on(&mut self) {
        log::debug!("display: power on");
    }

    fn power_off(&mut self) {
        log::debug!("display: power off");
    }
}

/// A display that records everything it is told, for tests and replay
/// tooling
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    /// Number of frames presented
    pub frames: u32,
    /// Last frame presented
    pub last_frame: BitGrid,
    /// Every string drawn, in order
    pub strings: Vec<(u8, u8, String)>,
    /// Every score update, in order
    pub scores: Vec<u16>,
    /// Current power state (starts on)
    pub powered_off: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent score update, if any
    pub fn last_score(&self) -> Option<u16> {
        self.scores.last().copied()
    }
}

impl Display for RecordingDisplay {
    fn draw_frame(&mut self, frame: &BitGrid) {
        self.frames += 1;
        self.last_frame = frame.clone();
    }

    fn draw_string(&mut self, x: u8, row: u8, text: &str) {
        self.strings.push((x, row, text.to_string()));
    }

    fn update_score(&mut self, score: u16) {
        self.scores.push(score);
    }

    fn power_on(&mut self) {
        self.powered_off = false;
    }

    fn power_off(&mut self) {
        self.powered_off = true;
    }
}
