use std::fmt;

/// Errors reported by the camera.
///
/// None of these are fatal: the camera state is left untouched when one is
/// returned.
#[derive(Debug)]
pub enum CameraError {
    /// `toggle_dead_zone` was called before any dead zone was configured.
    NoDeadZone,
    /// A camera configuration could not be parsed.
    InvalidConfig(serde_json::Error),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDeadZone => write!(f, "no dead zone configured; set a screen or world dead zone first"),
            Self::InvalidConfig(e) => write!(f, "invalid camera config: {e}"),
        }
    }
}

impl std::error::Error for CameraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::NoDeadZone => None,
        }
    }
}

impl From<serde_json::Error> for CameraError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e)
    }
}
