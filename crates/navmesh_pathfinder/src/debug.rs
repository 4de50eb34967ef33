//! Debug drawing of computed paths.

use glam::Vec3A;

use crate::NavmeshPath;

/// Height of the tick drawn at every corner by [`visualize_path`]. `[Units: wu]`
pub const CORNER_TICK_HEIGHT: f32 = 0.1;

/// A linear RGBA color for debug lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugColor {
    /// Red channel.
    pub red: f32,
    /// Green channel.
    pub green: f32,
    /// Blue channel.
    pub blue: f32,
    /// Alpha channel.
    pub alpha: f32,
}

impl DebugColor {
    /// Opaque red.
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its channels.
    pub const fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Color of the corner ticks drawn by [`visualize_path`].
pub const CORNER_COLOR: DebugColor = DebugColor::RED;
/// Color of the segments drawn by [`visualize_path`].
pub const SEGMENT_COLOR: DebugColor = DebugColor::WHITE.with_alpha(0.2);

/// Receives debug lines, e.g. an engine's immediate-mode line renderer.
pub trait DebugLineSink {
    /// Draws a line from `start` to `end`.
    fn draw_line(&mut self, start: Vec3A, end: Vec3A, color: DebugColor);
}

impl DebugLineSink for Vec<(Vec3A, Vec3A, DebugColor)> {
    fn draw_line(&mut self, start: Vec3A, end: Vec3A, color: DebugColor) {
        self.push((start, end, color));
    }
}

/// Draws a path: a short vertical tick at each corner that has a successor,
/// and a translucent line to the next corner.
pub fn visualize_path(path: &NavmeshPath, sink: &mut impl DebugLineSink) {
    for (start, end) in path.segments() {
        sink.draw_line(start, start + Vec3A::Y * CORNER_TICK_HEIGHT, CORNER_COLOR);
        sink.draw_line(start, end, SEGMENT_COLOR);
    }
}
