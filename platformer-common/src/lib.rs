pub mod config;
pub mod snapshot;
pub mod vector2;
pub mod world_params;

// Re-export key types for easier use by dependent crates
pub use config::{PlatformerConfig, WorldConfig, PhysicsConfig, TimingConfig, InputConfig, InputMode, Key, KeyWindow, OutputConfig};
pub use snapshot::FrameSnapshot;
pub use vector2::{Vector2, ByLength, VECTOR_PRECISION};
pub use world_params::WorldParams;
