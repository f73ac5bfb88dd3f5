use platformer_common::{InputConfig, InputMode, Key, KeyWindow};
use log::debug;
use rand::prelude::*;

/// Keys held down during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    fn press(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
        }
    }
}

/// Something the frame loop can poll for keyboard state once per frame.
pub trait InputSource {
    fn poll(&mut self, frame: u64) -> KeyState;
}

/// Nothing is ever pressed.
#[derive(Debug, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _frame: u64) -> KeyState {
        KeyState::default()
    }
}

/// Replays key presses from inclusive frame windows.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    windows: Vec<KeyWindow>,
}

impl ScriptedInput {
    pub fn new(windows: Vec<KeyWindow>) -> Self {
        Self { windows }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64) -> KeyState {
        let mut keys = KeyState::default();
        self.windows
            .iter()
            .filter(|w| (w.from_frame..=w.to_frame).contains(&frame))
            .for_each(|w| keys.press(w.key));
        keys
    }
}

/// Presses each key independently with a fixed probability per frame.
/// The same seed always produces the same sequence.
#[derive(Debug)]
pub struct RandomInput {
    rng: StdRng,
    press_probability: f64,
}

impl RandomInput {
    pub fn new(seed: u64, press_probability: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            press_probability: press_probability.clamp(0.0, 1.0),
        }
    }
}

impl InputSource for RandomInput {
    fn poll(&mut self, _frame: u64) -> KeyState {
        let p = self.press_probability;
        KeyState {
            up: self.rng.random_bool(p),
            left: self.rng.random_bool(p),
            right: self.rng.random_bool(p),
        }
    }
}

/// Builds the input source selected by `[input] mode`.
pub fn input_from_config(config: &InputConfig) -> Box<dyn InputSource> {
    debug!("Input mode: {:?}", config.mode);
    match config.mode {
        InputMode::Idle => Box::new(IdleInput),
        InputMode::Scripted => Box::new(ScriptedInput::new(config.script.clone())),
        InputMode::Random => Box::new(RandomInput::new(config.seed, config.press_probability)),
    }
}
