use crate::input::{input_from_config, InputSource, KeyState};
use platformer_common::{FrameSnapshot, PlatformerConfig, Vector2, WorldParams};
use anyhow::Result;
use log::{debug, trace};

/// Moves a single body through the world one frame at a time.
///
/// Each frame polls the input source, sets the velocity from the held keys,
/// integrates gravity and velocity, and then applies the floor and wall rules.
pub struct FrameLoop {
    /// The configuration the loop was built from.
    pub config: PlatformerConfig,
    params: WorldParams,
    position: Vector2,
    velocity: Vector2,
    input: Box<dyn InputSource>,
    /// Text drawn for the last frame, and where it was drawn.
    label: String,
    label_anchor: Vector2,
    recorded_snapshots: Vec<FrameSnapshot>,
}

impl FrameLoop {
    /// Creates a loop that reads input from the source selected in the config.
    pub fn new(config: PlatformerConfig) -> Self {
        let input = input_from_config(&config.input);
        Self::with_input(config, input)
    }

    /// Creates a loop driven by the given input source.
    pub fn with_input(config: PlatformerConfig, input: Box<dyn InputSource>) -> Self {
        let params = config.world_params();
        let position = config.initial_position();
        let velocity = config.initial_velocity();
        debug!("Initial position {}, velocity {}", position, velocity);
        Self {
            config,
            params,
            position,
            velocity,
            input,
            label: render_label(position),
            label_anchor: position,
            recorded_snapshots: Vec::new(),
        }
    }

    /// Advances the world by one frame.
    pub fn step(&mut self) -> Result<()> {
        let frame = self.params.frame;
        let keys = self.input.poll(frame);
        self.apply_keys(keys);

        // The label shows where the body was before this frame moved it.
        self.label = render_label(self.position);
        self.label_anchor = self.position;

        self.velocity += self.params.gravity;
        self.position += self.velocity;

        if self.position.y() >= self.params.floor_y && self.velocity.y() > 0.0 {
            self.velocity.set_y(0.0); // no bounce
            self.position.set_y(self.params.floor_y);
        }

        if self.position.x() >= self.params.wall_right || self.position.x() <= self.params.wall_left {
            self.velocity.set_x(0.0); // no bounce
        }

        if !self.position.is_not_nan() || !self.velocity.is_not_nan() {
            anyhow::bail!(
                "Frame {} produced NaN: position {}, velocity {}",
                frame,
                self.position,
                self.velocity
            );
        }

        self.params.frame += 1;
        trace!(
            "Frame {} | keys {:?} | position {} | velocity {}",
            frame,
            keys,
            self.position,
            self.velocity
        );
        Ok(())
    }

    /// Up takes priority over left, which takes priority over right.
    fn apply_keys(&mut self, keys: KeyState) {
        self.velocity.set_x(0.0);
        if keys.up {
            self.velocity.set_y(self.velocity.y() - self.params.jump_impulse);
        } else if keys.left {
            self.velocity.set_x(-self.params.move_speed);
        } else if keys.right {
            self.velocity.set_x(self.params.move_speed);
        }
    }

    /// True when a snapshot is due at the current frame.
    pub fn should_record(&self) -> bool {
        self.params.frame % self.config.timing.record_interval_frames == 0
    }

    /// Records the current state.
    pub fn record_snapshot(&mut self) {
        let snapshot = FrameSnapshot {
            frame: self.params.frame,
            time_s: self.params.elapsed_secs(),
            position: self.position,
            velocity: self.velocity,
            on_floor: self.on_floor(),
            text: self.label.clone(),
        };
        self.recorded_snapshots.push(snapshot);
    }

    pub fn on_floor(&self) -> bool {
        self.position.y() >= self.params.floor_y
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Number of frames integrated so far.
    pub fn frame(&self) -> u64 {
        self.params.frame
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn label_anchor(&self) -> Vector2 {
        self.label_anchor
    }

    pub fn recorded_snapshots(&self) -> &[FrameSnapshot] {
        &self.recorded_snapshots
    }
}

// Six decimals, the way the y coordinate has always been printed on screen.
fn render_label(position: Vector2) -> String {
    format!("{:.6}", position.y())
}
