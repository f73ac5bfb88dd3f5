use serde::{Serialize, Deserialize};
use crate::vector2::Vector2;

/// The state of the body at a specific frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Number of frames integrated so far.
    pub frame: u64,
    /// Simulated time in seconds (`frame / frame_rate`).
    pub time_s: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    /// Whether the body is resting on the floor line.
    pub on_floor: bool,
    /// The label rendered for this frame: the y coordinate with six decimals.
    pub text: String,
}
