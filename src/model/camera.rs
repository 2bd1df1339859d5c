use glam::{Mat4, Vec3};

use crate::config::ControllerConfig;

/// Orbit camera aimed at the follow pivot.
///
/// Yaw and pitch are driven by mouse look; the eye position is recomputed
/// every frame from the pivot and the rig's current boom distance, so the
/// camera is always looking at the (possibly still-interpolating) pivot.
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    eye: Vec3,
    target: Vec3,
}

impl Camera {
    pub fn new(config: &ControllerConfig, width: u32, height: u32) -> Self {
        let mut cam = Self {
            yaw: config.cam_initial_yaw,
            pitch: config
                .cam_initial_pitch
                .clamp(config.cam_min_pitch, config.cam_max_pitch),
            up: Vec3::Y,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: config.z_near,
            z_far: config.z_far,
            eye: Vec3::ZERO,
            target: Vec3::ZERO,
        };
        cam.place(Vec3::ZERO, config.cam_initial_distance);
        cam
    }

    /// View direction derived from yaw/pitch.
    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-1.5533, 1.5533); // slightly less than π/2 to avoid gimbal lock
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    /// Apply mouse look delta to the orbit angles.
    pub fn apply_look(&mut self, dx: f32, dy: f32, config: &ControllerConfig) {
        self.yaw += dx * config.look_sensitivity;
        self.pitch = (self.pitch - dy * config.look_sensitivity)
            .clamp(config.cam_min_pitch, config.cam_max_pitch);
    }

    /// Position the eye `distance` behind the pivot along the view direction
    /// and aim at the pivot.
    pub fn place(&mut self, pivot: Vec3, distance: f32) {
        self.eye = pivot - self.forward() * distance;
        self.target = pivot;
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_target(&self) -> Vec3 {
        self.target
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_keeps_eye_on_the_boom() {
        let config = ControllerConfig::default();
        let mut cam = Camera::new(&config, 800, 600);
        let pivot = Vec3::new(3.0, 1.0, -2.0);
        cam.place(pivot, 5.0);
        assert!(((cam.eye() - pivot).length() - 5.0).abs() < 1e-4);
        assert_eq!(cam.look_target(), pivot);
    }

    #[test]
    fn pitch_is_clamped_by_config() {
        let config = ControllerConfig::default();
        let mut cam = Camera::new(&config, 800, 600);
        cam.apply_look(0.0, -1e6, &config);
        assert!(cam.pitch <= config.cam_max_pitch + 1e-6);
        cam.apply_look(0.0, 1e6, &config);
        assert!(cam.pitch >= config.cam_min_pitch - 1e-6);
    }
}
