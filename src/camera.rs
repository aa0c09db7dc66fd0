use std::cell::{Cell, RefCell};
use std::f32::consts::TAU;
use std::rc::{Rc, Weak};

use glam::{Affine2, IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CameraConfig;
use crate::debug::DebugShape;
use crate::error::CameraError;
use crate::geometry::{lerp, lerp_vec2, rotate_about, within_region};
use crate::transform::{RenderContext, ZoomPan};

/// Half-length of the debug crosshair arms in pixels.
const DEBUG_CROSSHAIR: f32 = 20.0;

// ── CameraUniform ────────────────────────────────────────────────────────────

/// Camera uniform uploaded to the GPU — contains the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [ax/w*2,  -ay/h*2,  0, 0]
/// col1: [bx/w*2,  -by/h*2,  0, 0]
/// col2: [0,        0,       1, 0]
/// col3: [tx/w*2-1, 1-ty/h*2, 0, 1]
/// ```
/// where `[a b | t]` is the camera's world → screen-pixel affine transform.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection (no camera transform).
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// Used for HUD passes so they stay screen-fixed.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        Self::from_view(Affine2::IDENTITY, width, height)
    }

    /// Combine a world → screen-pixel transform with the pixel → NDC projection
    /// (y-down pixels, y-up clip space).
    pub fn from_view(view: Affine2, width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        let a = view.matrix2.x_axis;
        let b = view.matrix2.y_axis;
        let t = view.translation;
        Self {
            view_proj: [
                [a.x * sx,       a.y * sy,       0.0, 0.0], // col0
                [b.x * sx,       b.y * sy,       0.0, 0.0], // col1
                [0.0,            0.0,            1.0, 0.0], // col2
                [t.x * sx - 1.0, t.y * sy + 1.0, 0.0, 1.0], // col3
            ],
        }
    }
}

// ── Follow targets ───────────────────────────────────────────────────────────

/// Anything the camera can track: it only ever reads the current position.
pub trait PositionSource {
    /// Current world position.
    fn position(&self) -> Vec2;
}

impl PositionSource for Cell<Vec2> {
    fn position(&self) -> Vec2 {
        self.get()
    }
}

impl<T: PositionSource> PositionSource for RefCell<T> {
    fn position(&self) -> Vec2 {
        self.borrow().position()
    }
}

// ── Dead zones ───────────────────────────────────────────────────────────────

/// Which space a dead zone's corners are expressed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeadZoneKind {
    /// Screen pixels; the region stays fixed on screen as the camera moves.
    Screen,
    /// World coordinates; the region is part of the level.
    World,
}

/// A rectangle the followed entity can roam without the camera moving.
///
/// Only one dead zone exists at a time; setting a new one replaces the old
/// kind, and toggling flips [`DeadZone::active`] on whichever was set last.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeadZone {
    /// Space the corners are expressed in.
    pub kind: DeadZoneKind,
    /// One corner of the region.
    pub p1: Vec2,
    /// The corner opposite `p1`.
    pub p2: Vec2,
    /// Whether the zone currently gates following.
    pub active: bool,
}

impl DeadZone {
    /// Is `point` inside the region? Corner order is irrelevant.
    pub fn contains(&self, point: Vec2) -> bool {
        within_region(point, self.p1, self.p2)
    }
}

// ── ViewCamera ───────────────────────────────────────────────────────────────

/// 2D side-scroller camera: eases toward a fixed point or a followed entity,
/// optionally gated by a dead zone, with trauma-driven shake.
///
/// Call [`ViewCamera::update`] exactly once per frame before drawing world
/// content. Every mutator only stages a target; `update` is the one place
/// the view actually moves.
pub struct ViewCamera {
    config: CameraConfig,
    /// Pan/zoom transform the camera drives.
    transform: ZoomPan,
    /// Screen centre, refreshed every update.
    offset: Vec2,
    zoom: f32,
    zoom_target: f32,
    rotation: f32,
    rotation_target: f32,
    shake_rotation_offset: f32,
    /// Negated world point to centre on when not following.
    target_position: Vec2,
    /// Some ⇔ following.
    follow: Option<Weak<dyn PositionSource>>,
    follow_offset: Vec2,
    dead_zone: Option<DeadZone>,
    trauma: f32,
    shake_offset: Vec2,
    /// Transform and angle actually issued to the render context last update.
    applied_transform: ZoomPan,
    applied_rotation: f32,
    rng: StdRng,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewCamera {
    /// Camera centred on the world origin, not following anything.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Camera centred on `start_position`, not following anything.
    pub fn at(start_position: Vec2) -> Self {
        Self::builder().start_position(start_position).build()
    }

    /// Camera following `entity` from the first frame.
    pub fn following<E: PositionSource + 'static>(entity: &Rc<E>, offset: Vec2) -> Self {
        Self::builder().follow(entity).follow_offset(offset).build()
    }

    /// Start a [`CameraBuilder`] for the optional construction parameters.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    // ── Frame update ─────────────────────────────────────────────────────────

    /// Advance the camera one frame and apply its transform to `ctx`.
    ///
    /// Issues, in order: a rotation about the screen centre, then the pan and
    /// zoom. Then eases zoom, position and shake toward their targets.
    pub fn update<C: RenderContext + ?Sized>(&mut self, ctx: &mut C) {
        let t = self.config.lerp_speed;
        self.offset = ctx.viewport_size() * 0.5;

        self.rotation = lerp(self.rotation, self.rotation_target, t);
        self.zoom = lerp(self.zoom, self.zoom_target, t);

        let angle = self.rotation + self.shake_rotation_offset;
        ctx.translate(self.offset);
        ctx.rotate(angle);
        ctx.translate(-self.offset);
        self.transform.apply(ctx);
        self.applied_transform = self.transform;
        self.applied_rotation = angle;

        // Ease the live scale as well, so gestures that changed it settle back.
        let scale = lerp(self.transform.zoom_scale.x, self.zoom, t);
        self.transform.set_zoom_scale(scale);

        match self.followed_position() {
            Some(entity_pos) => {
                if self.should_chase(entity_pos) {
                    let target = (-entity_pos - self.follow_offset - self.shake_offset + self.offset)
                        * self.zoom;
                    self.transform.pan_offset = lerp_vec2(self.transform.pan_offset, target, t);
                }
            }
            None => {
                let target = (self.target_position - self.shake_offset + self.offset) * self.zoom;
                self.transform.pan_offset = lerp_vec2(self.transform.pan_offset, target, t);
            }
        }

        if self.trauma > 0.0 {
            let decay = self.config.trauma_decay;
            self.trauma = (self.trauma - decay).max(0.0);
            // Repeated f32 subtraction leaves residue a tiny fraction of a step.
            if self.trauma <= decay * 1e-3 {
                self.trauma = 0.0;
            }
            if self.trauma == 0.0 {
                self.shake_offset = Vec2::ZERO;
                self.shake_rotation_offset = 0.0;
            } else {
                let intensity = self.trauma * self.trauma;
                let x = intensity * self.rng.random_range(-1.0_f32..=1.0) * self.config.shake_translation;
                let y = intensity * self.rng.random_range(-1.0_f32..=1.0) * self.config.shake_translation;
                self.shake_offset = Vec2::new(x, y);
                self.shake_rotation_offset =
                    intensity * self.rng.random_range(-1.0_f32..=1.0) * self.config.shake_rotation;
            }
        }
    }

    /// Position of the followed entity, or `None` when not following.
    /// A followed entity that no longer exists ends following.
    fn followed_position(&mut self) -> Option<Vec2> {
        match self.follow.as_ref().map(Weak::upgrade) {
            Some(Some(entity)) => Some(entity.position()),
            Some(None) => {
                log::warn!("camera: followed entity was dropped; holding current position");
                self.clear_follow();
                None
            }
            None => None,
        }
    }

    fn should_chase(&self, entity_pos: Vec2) -> bool {
        match self.dead_zone {
            Some(zone) if zone.active => {
                let probe = match zone.kind {
                    DeadZoneKind::Screen => self.transform.world_to_screen(entity_pos),
                    DeadZoneKind::World => entity_pos,
                };
                !zone.contains(probe)
            }
            _ => true,
        }
    }

    // ── Following ────────────────────────────────────────────────────────────

    /// Track `entity`, keeping the current follow offset. Cancels any pending
    /// rotation.
    pub fn set_follow_entity<E: PositionSource + 'static>(&mut self, entity: &Rc<E>) {
        let weak: Weak<E> = Rc::downgrade(entity);
        self.follow = Some(weak);
        self.rotation_target = 0.0;
    }

    /// Track `entity` with a new follow offset.
    pub fn set_follow_entity_with_offset<E: PositionSource + 'static>(
        &mut self,
        entity: &Rc<E>,
        offset: Vec2,
    ) {
        self.set_follow_entity(entity);
        self.follow_offset = offset;
    }

    /// Change the follow offset without touching the follow state.
    pub fn set_follow_offset(&mut self, offset: Vec2) {
        self.follow_offset = offset;
    }

    /// Stop following and hold the world point currently at screen centre.
    pub fn clear_follow(&mut self) {
        self.follow = None;
        self.target_position = self.transform.pan_offset / self.zoom.max(0.01) - self.offset;
    }

    pub fn is_following(&self) -> bool {
        self.follow.is_some()
    }

    pub fn follow_offset(&self) -> Vec2 {
        self.follow_offset
    }

    /// Centre on world point `position`. Takes precedence over following,
    /// which is switched off.
    pub fn set_camera_position(&mut self, position: Vec2) {
        self.follow = None;
        self.target_position = -position;
    }

    /// Internal absolute target (the negated world point).
    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    // ── Shake ────────────────────────────────────────────────────────────────

    /// Add trauma. Successive shakes stack up to a trauma of 1; a negative
    /// force calms the camera but never below 0.
    pub fn shake(&mut self, force: f32) {
        self.trauma = (self.trauma + force).clamp(0.0, 1.0);
        if self.trauma == 0.0 {
            self.shake_offset = Vec2::ZERO;
            self.shake_rotation_offset = 0.0;
        }
    }

    pub fn trauma(&self) -> f32 {
        self.trauma
    }

    /// Trauma removed per frame.
    pub fn set_trauma_decay(&mut self, decay: f32) {
        self.config.trauma_decay = decay.max(0.0);
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn shake_rotation_offset(&self) -> f32 {
        self.shake_rotation_offset
    }

    // ── Dead zones ───────────────────────────────────────────────────────────

    /// Dead zone in screen pixels, active immediately. Replaces any world
    /// dead zone.
    pub fn set_screen_dead_zone(&mut self, p1: Vec2, p2: Vec2) {
        self.dead_zone = Some(DeadZone { kind: DeadZoneKind::Screen, p1, p2, active: true });
    }

    /// Dead zone in world coordinates, active immediately. Replaces any
    /// screen dead zone.
    pub fn set_world_dead_zone(&mut self, p1: Vec2, p2: Vec2) {
        self.dead_zone = Some(DeadZone { kind: DeadZoneKind::World, p1, p2, active: true });
    }

    /// Flip the most recently set dead zone on or off.
    ///
    /// Returns [`CameraError::NoDeadZone`] (and changes nothing) if no dead
    /// zone was ever set.
    pub fn toggle_dead_zone(&mut self) -> Result<(), CameraError> {
        match self.dead_zone.as_mut() {
            Some(zone) => {
                zone.active = !zone.active;
                log::debug!("camera: {:?} dead zone active = {}", zone.kind, zone.active);
                Ok(())
            }
            None => {
                log::warn!("camera: toggle_dead_zone called before a dead zone was set");
                Err(CameraError::NoDeadZone)
            }
        }
    }

    /// The configured dead zone, active or not.
    pub fn dead_zone(&self) -> Option<&DeadZone> {
        self.dead_zone.as_ref()
    }

    pub fn is_screen_dead_zone_active(&self) -> bool {
        self.dead_zone.is_some_and(|z| z.active && z.kind == DeadZoneKind::Screen)
    }

    pub fn is_world_dead_zone_active(&self) -> bool {
        self.dead_zone.is_some_and(|z| z.active && z.kind == DeadZoneKind::World)
    }

    // ── Rotation ─────────────────────────────────────────────────────────────

    /// Rotate to `angle` radians (about the screen centre).
    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation_target = angle;
    }

    /// Rotate a further `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.rotation_target += angle;
    }

    /// Current (eased) rotation, excluding shake.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotation_target(&self) -> f32 {
        self.rotation_target
    }

    /// Clockwise rotation magnitude, wrapped into `[0, 2π)`.
    pub fn camera_rotation(&self) -> f32 {
        self.rotation.abs() % TAU
    }

    // ── Zoom ─────────────────────────────────────────────────────────────────

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.config.zoom_min).min(self.config.zoom_max)
    }

    pub fn set_zoom_target(&mut self, zoom: f32) {
        self.zoom_target = self.clamp_zoom(zoom);
    }

    pub fn set_zoom_min(&mut self, min: f32) {
        self.config.zoom_min = min;
        self.zoom_target = self.clamp_zoom(self.zoom_target);
    }

    pub fn set_zoom_max(&mut self, max: f32) {
        self.config.zoom_max = max;
        self.zoom_target = self.clamp_zoom(self.zoom_target);
    }

    pub fn zoom_in(&mut self, amount: f32) {
        self.zoom_target = self.clamp_zoom(self.zoom_target + amount);
    }

    pub fn zoom_out(&mut self, amount: f32) {
        self.zoom_target = self.clamp_zoom(self.zoom_target - amount);
    }

    /// Current (eased) zoom.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_target(&self) -> f32 {
        self.zoom_target
    }

    /// `(min, max)` zoom bounds.
    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.config.zoom_min, self.config.zoom_max)
    }

    // ── Easing ───────────────────────────────────────────────────────────────

    /// Per-frame easing rate for position, zoom and rotation, clamped to
    /// `[0, 1]`. Smaller is smoother and slower; 1 snaps instantly.
    pub fn set_lerp_speed(&mut self, rate: f32) {
        self.config.lerp_speed = rate.clamp(0.0, 1.0);
    }

    pub fn lerp_speed(&self) -> f32 {
        self.config.lerp_speed
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// World point the camera is centred on, rounded for HUD display.
    pub fn camera_position(&self) -> IVec2 {
        let logical = self.transform.pan_offset - self.offset;
        IVec2::new((-logical.x).round() as i32, (-logical.y).round() as i32)
    }

    /// [`ViewCamera::camera_position`] formatted as `"x, y"`.
    pub fn camera_position_label(&self) -> String {
        let p = self.camera_position();
        format!("{}, {}", p.x, p.y)
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.transform.pan_offset
    }

    /// Screen centre as of the last update.
    pub fn screen_center(&self) -> Vec2 {
        self.offset
    }

    pub fn transform(&self) -> &ZoomPan {
        &self.transform
    }

    /// Mutable access for host gestures (drag, wheel, pinch).
    pub fn transform_mut(&mut self) -> &mut ZoomPan {
        &mut self.transform
    }

    /// Full world → screen transform issued by the last update, including the
    /// rotation about the screen centre.
    pub fn view_matrix(&self) -> Affine2 {
        let zp = &self.applied_transform;
        Affine2::from_translation(self.offset)
            * Affine2::from_angle(self.applied_rotation)
            * Affine2::from_translation(zp.pan_offset - self.offset)
            * Affine2::from_scale(zp.zoom_scale)
    }

    /// World point → screen pixel, as drawn by the last update.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let unrotated = self.applied_transform.world_to_screen(world);
        rotate_about(unrotated, self.offset, self.applied_rotation)
    }

    /// Screen pixel → world point, as drawn by the last update. Accounts for
    /// rotation, so it is safe to feed mouse coordinates through.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let unrotated = rotate_about(screen, self.offset, -self.applied_rotation);
        self.applied_transform.screen_to_world(unrotated)
    }

    /// GPU-ready view-projection for the viewport seen by the last update.
    pub fn view_proj(&self) -> CameraUniform {
        let viewport = self.offset * 2.0;
        CameraUniform::from_view(self.view_matrix(), viewport.x.max(1.0), viewport.y.max(1.0))
    }

    // ── Debug overlays ───────────────────────────────────────────────────────

    /// Screen-space debug shapes: centre crosshair, rotation indicator, a
    /// box around the tracked point and the screen dead zone.
    ///
    /// Draw after world content with the camera transform popped. Empty
    /// unless the config's `debug` flag is set.
    pub fn render_debug_overlay(&self) -> Vec<DebugShape> {
        if !self.config.debug {
            return Vec::new();
        }
        let c = self.offset;
        let arm = Vec2::new(DEBUG_CROSSHAIR, 0.0);
        let leg = Vec2::new(0.0, DEBUG_CROSSHAIR);
        let mut shapes = vec![
            DebugShape::Line { from: c - arm, to: c + arm },
            DebugShape::Line { from: c - leg, to: c + leg },
            DebugShape::Line {
                from: rotate_about(c - arm * 2.0, c, self.rotation),
                to: rotate_about(c + arm * 2.0, c, self.rotation),
            },
        ];

        let marker = Vec2::splat(DEBUG_CROSSHAIR * 2.0);
        match &self.follow {
            Some(weak) => {
                if let Some(entity) = weak.upgrade() {
                    let at = self.transform.world_to_screen(entity.position());
                    shapes.push(DebugShape::rect_centered(at, marker));
                }
                if let Some(zone) = self.dead_zone.filter(|z| z.active && z.kind == DeadZoneKind::Screen) {
                    shapes.push(DebugShape::rect_between(zone.p1, zone.p2));
                }
            }
            None => {
                let at = self.transform.world_to_screen(-self.target_position);
                shapes.push(DebugShape::rect_centered(at, marker));
            }
        }
        shapes
    }

    /// World-space debug shapes (the world dead zone). Draw while the camera
    /// transform is still applied. Empty unless `debug` is set.
    pub fn render_world_debug(&self) -> Vec<DebugShape> {
        match self.dead_zone {
            Some(zone) if self.config.debug && zone.active && zone.kind == DeadZoneKind::World => {
                vec![DebugShape::rect_between(zone.p1, zone.p2)]
            }
            _ => Vec::new(),
        }
    }
}

// ── CameraBuilder ────────────────────────────────────────────────────────────

/// Optional construction parameters for [`ViewCamera`].
#[derive(Default)]
pub struct CameraBuilder {
    config: CameraConfig,
    start_position: Vec2,
    follow: Option<Weak<dyn PositionSource>>,
    follow_offset: Vec2,
    seed: Option<u64>,
}

impl CameraBuilder {
    /// World point to centre on initially (when not following).
    pub fn start_position(mut self, position: Vec2) -> Self {
        self.start_position = position;
        self
    }

    pub fn follow<E: PositionSource + 'static>(mut self, entity: &Rc<E>) -> Self {
        let weak: Weak<E> = Rc::downgrade(entity);
        self.follow = Some(weak);
        self
    }

    pub fn follow_offset(mut self, offset: Vec2) -> Self {
        self.follow_offset = offset;
        self
    }

    pub fn config(mut self, config: CameraConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    /// Seed the shake RNG for reproducible runs. Defaults to OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> ViewCamera {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut camera = ViewCamera {
            config: self.config,
            transform: ZoomPan::new(),
            offset: Vec2::ZERO,
            zoom: 1.0,
            zoom_target: 1.0,
            rotation: 0.0,
            rotation_target: 0.0,
            shake_rotation_offset: 0.0,
            target_position: -self.start_position,
            follow: self.follow,
            follow_offset: self.follow_offset,
            dead_zone: None,
            trauma: 0.0,
            shake_offset: Vec2::ZERO,
            applied_transform: ZoomPan::new(),
            applied_rotation: 0.0,
            rng,
        };
        camera.zoom_target = camera.clamp_zoom(camera.zoom_target);
        camera
    }
}
