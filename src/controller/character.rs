//! Per-frame orchestration: motion resolution, impulse write-back, facing
//! blend, and camera follow, in that order.

use crate::config::ControllerConfig;
use crate::controller::camera_rig::CameraRig;
use crate::controller::input::InputState;
use crate::controller::motion;
use crate::host::{CameraObstacles, RigidBody};
use crate::model::{Camera, CharacterState};

pub struct CharacterController {
    config: ControllerConfig,
    state: CharacterState,
    rig: CameraRig,
}

impl CharacterController {
    pub fn new(config: ControllerConfig) -> Self {
        let state = CharacterState::new(config.initial_facing);
        let rig = CameraRig::new(&config);
        Self { config, state, rig }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current model facing yaw in radians.
    pub fn facing_angle(&self) -> f32 {
        self.state.facing_angle()
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Feed accumulated wheel input into the camera boom.
    pub fn zoom(&mut self, wheel_delta: f32) {
        self.rig.apply_zoom(wheel_delta, &self.config);
    }

    /// Run one frame of the controller against the host.
    ///
    /// Reads the body's transform, writes the velocity impulse back, turns
    /// the model toward the resolved facing, then updates the camera pivot
    /// and boom and aims the camera at the pivot.
    pub fn update<B: RigidBody, O: CameraObstacles>(
        &mut self,
        body: &mut B,
        obstacles: &O,
        camera: &mut Camera,
        input: &InputState,
        dt: f32,
    ) {
        let position = body.position();
        let velocity = body.linear_velocity();

        let plan = motion::resolve(input, camera.yaw, velocity.y, dt, &self.config);
        body.set_linear_velocity(plan.impulse);

        if let Some(target) = plan.facing {
            self.state.turn_towards(target, self.config.turn_speed * dt);
        }

        self.rig.follow(position, dt, &self.config);
        self.rig
            .avoid_occlusion(position, -camera.forward(), obstacles, dt, &self.config);
        camera.place(self.rig.pivot(), self.rig.distance());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoObstacles;
    use glam::Vec3;

    struct FakeBody {
        position: Vec3,
        velocity: Vec3,
    }

    impl RigidBody for FakeBody {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn linear_velocity(&self) -> Vec3 {
            self.velocity
        }
        fn set_linear_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }
    }

    #[test]
    fn update_writes_impulse_and_turns_model() {
        let config = ControllerConfig::default();
        let mut camera = Camera::new(&config, 800, 600);
        let mut controller = CharacterController::new(config);
        let mut body = FakeBody {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, -2.0, 0.0),
        };
        let mut input = InputState::new();
        input.forward = true;

        let dt = 1.0 / 60.0;
        controller.update(&mut body, &NoObstacles, &mut camera, &input, dt);

        assert!((body.velocity.z - (-2.5)).abs() < 1e-5);
        assert_eq!(body.velocity.y, -2.0, "falling speed untouched without jump");

        // facing heads toward the camera yaw, rate-bounded
        let expected_step = controller.config().turn_speed * dt;
        let moved = (controller.facing_angle() - 0.0).abs();
        assert!(moved <= expected_step + 1e-6);

        // camera is aimed at the rig pivot
        assert_eq!(camera.look_target(), controller.rig().pivot());
    }

    #[test]
    fn facing_settles_on_camera_yaw_when_walking_forward() {
        let config = ControllerConfig::default();
        let mut camera = Camera::new(&config, 800, 600);
        let mut controller = CharacterController::new(config);
        let mut body = FakeBody {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        };
        let mut input = InputState::new();
        input.forward = true;

        for _ in 0..120 {
            controller.update(&mut body, &NoObstacles, &mut camera, &input, 1.0 / 60.0);
        }
        let delta = crate::utils::angle_delta(controller.facing_angle(), camera.yaw);
        assert!(delta.abs() < 1e-4);
    }
}
