//! Host-agnostic draw list
//!
//! The simulation fills a `Frame` each tick; a `Surface` turns it into pixels.
//! Coordinates are in CSS pixels with the origin at the top-left.

use glam::Vec2;

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

/// A stroked line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: [f32; 4],
}

/// Everything drawn in one display frame. Presenting a frame replaces the
/// previous one entirely.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Surface size the frame was drawn for
    pub size: (f32, f32),
    pub discs: Vec<Disc>,
    pub lines: Vec<Line>,
}

impl Frame {
    /// Drop last frame's shapes, keeping allocations
    pub fn clear(&mut self, width: f32, height: f32) {
        self.size = (width, height);
        self.discs.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty() && self.lines.is_empty()
    }
}

/// Something that can show a frame
pub trait Surface {
    /// Present `frame`, replacing whatever was shown before
    fn present(&mut self, frame: &Frame);

    /// The viewport changed size (CSS pixels)
    fn resize(&mut self, _width: f32, _height: f32) {}
}

/// Keeps the last presented frame, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub last: Frame,
    pub presented: u64,
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Frame) {
        self.last.clone_from(frame);
        self.presented += 1;
    }
}
