use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::vector2::Vector2;
use crate::world_params::WorldParams;
use std::path::Path;

// Screen-space world bounds (y grows downward)
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub floor_y: f64,
    pub wall_left: f64,
    pub wall_right: f64,
}

// Motion parameters, all in pixels per frame
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    pub gravity: [f64; 2],
    pub initial_position: [f64; 2],
    #[serde(default)]
    pub initial_velocity: [f64; 2],
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_jump_impulse")]
    pub jump_impulse: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub frames: u64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default = "default_record_interval")]
    pub record_interval_frames: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Left,
    Right,
}

/// A key held down for every frame in `from_frame..=to_frame`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct KeyWindow {
    pub key: Key,
    pub from_frame: u64,
    pub to_frame: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Idle,
    Scripted,
    Random,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InputConfig {
    #[serde(default = "default_input_mode")]
    pub mode: InputMode,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_press_probability")]
    pub press_probability: f64,
    #[serde(default)]
    pub script: Vec<KeyWindow>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default)]
    pub save_frames: bool,
    #[serde(default)]
    pub save_final_position: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default)]
    pub echo_text: bool,
}

/// Top-level configuration, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PlatformerConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub input: InputConfig,
    pub output: OutputConfig,
}

// A missing [input] section means nobody is pressing anything
impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            mode: InputMode::Idle,
            seed: 0,
            press_probability: default_press_probability(),
            script: Vec::new(),
        }
    }
}

impl PlatformerConfig {
    /// Loads and validates the configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: PlatformerConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timing.frame_rate > 0.0) {
            anyhow::bail!("frame_rate must be positive.");
        }
        if self.timing.record_interval_frames == 0 {
            anyhow::bail!("record_interval_frames must be at least 1.");
        }
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            anyhow::bail!("world width and height must be positive.");
        }
        if world.wall_right > world.width || world.wall_left < 0.0 {
            anyhow::bail!(
                "walls ({}, {}) must lie within the world width {}.",
                world.wall_left,
                world.wall_right,
                world.width
            );
        }
        if !(0.0..=world.height).contains(&world.floor_y) {
            anyhow::bail!("floor_y ({}) must lie within the world height {}.", world.floor_y, world.height);
        }
        if self.world.wall_left >= self.world.wall_right {
            anyhow::bail!(
                "wall_left ({}) must be less than wall_right ({}).",
                self.world.wall_left,
                self.world.wall_right
            );
        }
        let physics = &self.physics;
        let vectors = [
            ("gravity", physics.gravity),
            ("initial_position", physics.initial_position),
            ("initial_velocity", physics.initial_velocity),
        ];
        for (name, [x, y]) in vectors {
            if !(x.is_finite() && y.is_finite()) {
                anyhow::bail!("physics.{} must be finite, got [{}, {}].", name, x, y);
            }
        }
        if !(physics.move_speed.is_finite() && physics.jump_impulse.is_finite()) {
            anyhow::bail!("move_speed and jump_impulse must be finite.");
        }
        if !(0.0..=1.0).contains(&self.input.press_probability) {
            anyhow::bail!("press_probability must be within [0, 1].");
        }
        for window in &self.input.script {
            if window.from_frame > window.to_frame {
                anyhow::bail!(
                    "Script window for {:?} starts at frame {} after it ends at frame {}.",
                    window.key,
                    window.from_frame,
                    window.to_frame
                );
            }
        }
        Ok(())
    }

    pub fn initial_position(&self) -> Vector2 {
        self.physics.initial_position.into()
    }

    pub fn initial_velocity(&self) -> Vector2 {
        self.physics.initial_velocity.into()
    }

    /// Converts the configuration into the parameters the frame loop reads.
    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            gravity: self.physics.gravity.into(),
            floor_y: self.world.floor_y,
            wall_left: self.world.wall_left,
            wall_right: self.world.wall_right,
            move_speed: self.physics.move_speed,
            jump_impulse: self.physics.jump_impulse,
            dt: 1.0 / self.timing.frame_rate,
            frame: 0,
        }
    }
}

fn default_move_speed() -> f64 {
    10.0
}

fn default_jump_impulse() -> f64 {
    10.0
}

fn default_frame_rate() -> f64 {
    30.0
}

fn default_record_interval() -> u64 {
    1
}

fn default_input_mode() -> InputMode {
    InputMode::Idle
}

fn default_press_probability() -> f64 {
    0.1
}
