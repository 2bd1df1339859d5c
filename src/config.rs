//! Controller configuration: a flat bundle of named tunables fixed at
//! construction time. Loadable from TOML (native hosts) or JSON (browser
//! hosts); every field has a documented default so partial files work.

use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::path::PathBuf;

use crate::controller::input::KeyBindings;

/// All tunables for the character controller and follow-camera rig.
///
/// The bundle is immutable once the controller is constructed; there is no
/// runtime reconfiguration API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // -- movement --
    /// Planar movement speed in units per second; the per-frame impulse is
    /// `base_move_speed * dt` along each active axis.
    pub base_move_speed: f32,
    /// Speed factor applied while the run flag is held.
    pub sprint_multiplier: f32,
    /// Vertical velocity applied on the frame the jump flag is set.
    pub jump_velocity: f32,
    /// Extra jump velocity factor while running.
    pub sprint_jump_multiplier: f32,
    /// Maximum facing rotation rate, radians per second.
    pub turn_speed: f32,
    /// Facing angle at construction, radians. The only instantaneous facing
    /// assignment; afterwards rotation is always rate-bounded.
    pub initial_facing: f32,

    // -- frame timing --
    /// Upper clamp on the per-frame time step, seconds. Guards against the
    /// host clock jumping while the tab is hidden.
    pub max_frame_dt: f32,

    // -- character capsule (used to derive the default look-at height) --
    pub capsule_half_height: f32,
    pub capsule_radius: f32,

    // -- camera follow --
    /// Exponential follow rate for the pivot; higher is snappier.
    pub cam_follow_multiplier: f32,
    pub cam_initial_distance: f32,
    pub cam_min_distance: f32,
    pub cam_max_distance: f32,
    /// Distance change per wheel notch.
    pub cam_zoom_speed: f32,
    /// Enables the occlusion-avoidance ray.
    pub cam_collision_enabled: bool,
    /// Pull-in margin subtracted from the occlusion hit distance.
    pub cam_collision_offset: f32,
    /// Exponential rate at which the camera eases back out to its desired
    /// distance once the occluder clears.
    pub cam_collision_recover_multiplier: f32,
    /// Horizontal offsets of the follow target from the character position.
    pub cam_target_offset_x: f32,
    pub cam_target_offset_z: f32,
    /// Explicit vertical offset of the follow target. When unset the target
    /// sits at `capsule_half_height + capsule_radius / 2` above the feet.
    pub cam_target_height: Option<f32>,

    // -- camera orbit --
    /// Initial orbit yaw, radians. The default looks along -Z so the
    /// forward impulse axis and the view direction line up.
    pub cam_initial_yaw: f32,
    pub cam_initial_pitch: f32,
    pub cam_min_pitch: f32,
    pub cam_max_pitch: f32,
    /// Radians of orbit per pixel of mouse movement.
    pub look_sensitivity: f32,

    // -- projection --
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,

    // -- input --
    pub keys: KeyBindings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_move_speed: 150.0,
            sprint_multiplier: 2.0,
            jump_velocity: 4.0,
            sprint_jump_multiplier: 1.2,
            turn_speed: 15.0,
            initial_facing: 0.0,

            max_frame_dt: 0.1,

            capsule_half_height: 0.35,
            capsule_radius: 0.3,

            cam_follow_multiplier: 11.0,
            cam_initial_distance: 5.0,
            cam_min_distance: 2.0,
            cam_max_distance: 9.0,
            cam_zoom_speed: 0.5,
            cam_collision_enabled: true,
            cam_collision_offset: 0.7,
            cam_collision_recover_multiplier: 4.0,
            cam_target_offset_x: 0.0,
            cam_target_offset_z: 0.0,
            cam_target_height: None,

            cam_initial_yaw: -std::f32::consts::FRAC_PI_2,
            cam_initial_pitch: -0.3,
            cam_min_pitch: -1.3,
            cam_max_pitch: 1.3,
            look_sensitivity: 0.002,

            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 1000.0,

            keys: KeyBindings::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse a TOML options string; missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Toml)
    }

    /// Parse a JSON options string, the form a browser host hands over.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::Json)
    }

    /// Load configuration from a TOML file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// Vertical offset of the camera follow target above the character
    /// position.
    pub fn follow_target_height(&self) -> f32 {
        self.cam_target_height
            .unwrap_or(self.capsule_half_height + self.capsule_radius / 2.0)
    }
}

/// Errors that can occur while loading controller configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => {
                write!(f, "failed to read config file {}: {}", path.display(), e)
            }
            ConfigError::Toml(e) => write!(f, "failed to parse TOML config: {}", e),
            ConfigError::Json(e) => write!(f, "failed to parse JSON config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = ControllerConfig::from_toml_str(
            "base_move_speed = 90.0\ncam_max_distance = 12.0\n",
        )
        .unwrap();
        assert_eq!(cfg.base_move_speed, 90.0);
        assert_eq!(cfg.cam_max_distance, 12.0);
        // untouched fields stay at their defaults
        let defaults = ControllerConfig::default();
        assert_eq!(cfg.sprint_multiplier, defaults.sprint_multiplier);
        assert_eq!(cfg.keys.forward, defaults.keys.forward);
    }

    #[test]
    fn json_options_parse() {
        let cfg = ControllerConfig::from_json_str(
            r#"{"jump_velocity": 6.0, "keys": {"run": "Control"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.jump_velocity, 6.0);
        assert_eq!(cfg.keys.run, "Control");
        assert_eq!(cfg.keys.jump, KeyBindings::default().jump);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ControllerConfig::from_toml_str("base_move_speed = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn target_height_falls_back_to_capsule() {
        let mut cfg = ControllerConfig::default();
        assert!((cfg.follow_target_height() - (0.35 + 0.15)).abs() < 1e-6);
        cfg.cam_target_height = Some(1.2);
        assert_eq!(cfg.follow_target_height(), 1.2);
    }
}
