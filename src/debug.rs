use glam::Vec2;

/// Colour of every camera debug shape (light blue, RGBA).
pub const DEBUG_COLOR: [f32; 4] = [0.0, 150.0 / 255.0, 1.0, 1.0];
/// Stroke width of camera debug shapes in pixels.
pub const DEBUG_STROKE: f32 = 2.0;

/// One outline shape for the host to draw. The camera never draws itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment between two points.
    Line { from: Vec2, to: Vec2 },
    /// Unfilled axis-aligned rectangle given by its top-left corner and size.
    Rect { min: Vec2, size: Vec2 },
}

impl DebugShape {
    /// Rectangle spanned by two opposite corners, in any order.
    pub fn rect_between(a: Vec2, b: Vec2) -> Self {
        let (min, max) = crate::geometry::region_bounds(a, b);
        Self::Rect { min, size: max - min }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn rect_centered(center: Vec2, size: Vec2) -> Self {
        Self::Rect { min: center - size * 0.5, size }
    }
}
