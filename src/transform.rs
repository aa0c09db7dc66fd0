use glam::{Affine2, Vec2};

/// Smallest zoom scale used when converting screen points back into the world.
/// Keeps a zoom of zero (a legal lower bound) from dividing by zero.
const MIN_SCALE: f32 = 0.01;

// ── RenderContext ────────────────────────────────────────────────────────────

/// Transform primitives the host renderer hands to the camera each frame.
///
/// Calls compose in order, like an immediate-mode matrix stack: everything
/// drawn after `update()` is affected by the transforms issued here.
pub trait RenderContext {
    /// Current viewport size in pixels. Read every frame so resizes just work.
    fn viewport_size(&self) -> Vec2;
    fn translate(&mut self, offset: Vec2);
    /// Rotate by `angle` radians around the current origin.
    fn rotate(&mut self, angle: f32);
    /// Uniform scale around the current origin.
    fn scale(&mut self, factor: f32);
}

// ── MatrixContext ────────────────────────────────────────────────────────────

/// A [`RenderContext`] that records the transforms into a single `Affine2`.
///
/// Useful headless (tests, tools) and for GPU backends which want the final
/// matrix instead of a stream of calls. Call [`MatrixContext::reset`] at the
/// start of each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixContext {
    viewport: Vec2,
    matrix: Affine2,
}

impl MatrixContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self { viewport: Vec2::new(width, height), matrix: Affine2::IDENTITY }
    }

    /// Drop all recorded transforms.
    pub fn reset(&mut self) {
        self.matrix = Affine2::IDENTITY;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// The accumulated world → screen transform.
    pub fn matrix(&self) -> Affine2 {
        self.matrix
    }

    /// Map a point through the accumulated transform.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point2(point)
    }
}

impl RenderContext for MatrixContext {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn translate(&mut self, offset: Vec2) {
        self.matrix = self.matrix * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.matrix = self.matrix * Affine2::from_angle(angle);
    }

    fn scale(&mut self, factor: f32) {
        self.matrix = self.matrix * Affine2::from_scale(Vec2::splat(factor));
    }
}

// ── ZoomPan ──────────────────────────────────────────────────────────────────

/// Pan/zoom state: the translate-then-scale transform the camera drives.
///
/// A world point `w` lands on screen at `pan_offset + w * zoom_scale`.
/// Host gesture code may poke at it between frames (see [`ZoomPan::pan_by`]
/// and [`ZoomPan::zoom_about`]); the camera eases it back on its next update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomPan {
    /// Screen-space translation applied before scaling.
    pub pan_offset: Vec2,
    /// Per-axis scale. The camera always writes the same value to both axes.
    pub zoom_scale: Vec2,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self { pan_offset: Vec2::ZERO, zoom_scale: Vec2::ONE }
    }
}

impl ZoomPan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the pan then the zoom to `ctx`.
    pub fn apply<C: RenderContext + ?Sized>(&self, ctx: &mut C) {
        ctx.translate(self.pan_offset);
        ctx.scale(self.zoom_scale.x);
    }

    /// Set a uniform zoom scale.
    pub fn set_zoom_scale(&mut self, scale: f32) {
        self.zoom_scale = Vec2::splat(scale);
    }

    /// World → screen, ignoring any rotation applied around it.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.pan_offset + world * self.zoom_scale
    }

    /// Screen → world, ignoring any rotation applied around it.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan_offset) / self.zoom_scale.max(Vec2::splat(MIN_SCALE))
    }

    /// Drag gesture: shift the view by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    /// Wheel/pinch gesture: scale by `factor` while keeping the world point
    /// under `screen_point` where it is.
    pub fn zoom_about(&mut self, factor: f32, screen_point: Vec2) {
        let anchor = self.screen_to_world(screen_point);
        self.zoom_scale *= factor;
        self.pan_offset = screen_point - anchor * self.zoom_scale;
    }
}
