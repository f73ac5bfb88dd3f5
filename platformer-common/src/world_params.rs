use serde::{Deserialize, Serialize};
use crate::vector2::Vector2;

/// Parameters derived from the configuration, read by the frame loop every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldParams {
    // Motion
    pub gravity: Vector2, // Constant acceleration added to velocity each frame
    pub move_speed: f64,
    pub jump_impulse: f64,

    // Boundaries (screen space, y grows downward)
    pub floor_y: f64,
    pub wall_left: f64,
    pub wall_right: f64,

    // Time
    pub dt: f64, // Seconds per frame, only used for reporting
    pub frame: u64, // Current frame number
}

impl WorldParams {
    /// Simulated time in seconds at the current frame.
    pub fn elapsed_secs(&self) -> f64 {
        self.frame as f64 * self.dt
    }
}
