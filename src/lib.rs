//! Side-scroller view camera: eased follow, dead zones and trauma shake.

pub mod camera;
pub mod config;
pub mod debug;
pub mod error;
pub mod geometry;
pub mod transform;

pub use camera::{CameraBuilder, CameraUniform, DeadZone, DeadZoneKind, PositionSource, ViewCamera};
pub use config::CameraConfig;
pub use error::CameraError;
pub use transform::{MatrixContext, RenderContext, ZoomPan};
