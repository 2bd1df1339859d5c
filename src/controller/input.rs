/// Platform-agnostic input handling for the character controller.
use serde::Deserialize;
use std::collections::HashSet;

/// Input sampled once per frame: directional flags plus accumulated mouse
/// look and wheel zoom deltas.
///
/// The flags are refreshed from `pressed_keys` by an [`InputProcessor`] at
/// the start of every update; hosts only feed raw key events in. Look and
/// zoom deltas accumulate between frames and are consumed exactly once.
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
    pub jump: bool,
    pub run: bool,

    pub pressed_keys: HashSet<String>,
    pub look_delta: (f32, f32),
    pub zoom_delta: f32,
    pub pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            leftward: false,
            rightward: false,
            jump: false,
            run: false,
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            zoom_delta: 0.0,
            pointer_locked: false,
        }
    }

    pub fn key_down(&mut self, key: impl Into<String>) {
        self.pressed_keys.insert(key.into());
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed_keys.remove(key);
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Drop all pressed keys, e.g. when the host window loses focus, so no
    /// key sticks across the focus gap.
    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.forward = false;
        self.backward = false;
        self.leftward = false;
        self.rightward = false;
        self.jump = false;
        self.run = false;
    }

    pub fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        let result = self.look_delta;
        self.look_delta = (0.0, 0.0);
        result
    }

    pub fn add_zoom(&mut self, delta: f32) {
        self.zoom_delta += delta;
    }

    pub fn consume_zoom(&mut self) -> f32 {
        let result = self.zoom_delta;
        self.zoom_delta = 0.0;
        result
    }

    /// Number of directional flags currently set.
    pub fn direction_count(&self) -> usize {
        [self.forward, self.backward, self.leftward, self.rightward]
            .iter()
            .filter(|&&f| f)
            .count()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Key mapping configuration, part of the controller's option bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub leftward: String,
    pub rightward: String,
    pub jump: String,
    pub run: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            leftward: "a".to_string(),
            rightward: "d".to_string(),
            jump: " ".to_string(),
            run: "Shift".to_string(),
        }
    }
}

/// Maps the currently-pressed keys onto the directional flags.
#[derive(Clone)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Refresh the directional flags from `pressed_keys`. Arrow keys always
    /// work alongside the bound letters; "Space" is accepted as a spelled-out
    /// alias for the space bar.
    pub fn refresh(&self, input: &mut InputState) {
        input.forward =
            input.is_key_pressed(&self.bindings.forward) || input.is_key_pressed("ArrowUp");
        input.backward =
            input.is_key_pressed(&self.bindings.backward) || input.is_key_pressed("ArrowDown");
        input.leftward =
            input.is_key_pressed(&self.bindings.leftward) || input.is_key_pressed("ArrowLeft");
        input.rightward =
            input.is_key_pressed(&self.bindings.rightward) || input.is_key_pressed("ArrowRight");
        input.jump = input.is_key_pressed(&self.bindings.jump)
            || (self.bindings.jump == " " && input.is_key_pressed("Space"));
        input.run = input.is_key_pressed(&self.bindings.run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_maps_bound_keys_to_flags() {
        let processor = InputProcessor::new(KeyBindings::default());
        let mut input = InputState::new();
        input.key_down("W");
        input.key_down("Shift");
        processor.refresh(&mut input);
        assert!(input.forward && input.run);
        assert!(!input.backward && !input.jump);

        input.key_up("W");
        input.key_down("ArrowUp");
        processor.refresh(&mut input);
        assert!(input.forward, "arrow keys work alongside letters");
    }

    #[test]
    fn clear_keys_drops_flags() {
        let processor = InputProcessor::new(KeyBindings::default());
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down(" ");
        processor.refresh(&mut input);
        assert!(input.leftward && input.jump);
        input.clear_keys();
        assert!(!input.leftward && !input.jump);
        assert_eq!(input.direction_count(), 0);
    }

    #[test]
    fn look_and_zoom_are_consumed_once() {
        let mut input = InputState::new();
        input.add_look(3.0, -1.0);
        input.add_look(1.0, 1.0);
        input.add_zoom(2.0);
        assert_eq!(input.consume_look(), (4.0, 0.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
        assert_eq!(input.consume_zoom(), 2.0);
        assert_eq!(input.consume_zoom(), 0.0);
    }

    #[test]
    fn rebound_keys_take_effect() {
        let bindings = KeyBindings {
            forward: "i".to_string(),
            backward: "k".to_string(),
            leftward: "j".to_string(),
            rightward: "l".to_string(),
            jump: "x".to_string(),
            run: "c".to_string(),
        };
        let processor = InputProcessor::new(bindings);
        let mut input = InputState::new();
        input.key_down("i");
        input.key_down("x");
        processor.refresh(&mut input);
        assert!(input.forward && input.jump);
        input.key_down("w");
        processor.refresh(&mut input);
        assert!(input.forward, "unbound keys are ignored");
        assert!(!input.backward);
    }
}
