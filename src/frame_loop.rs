//! Per-frame entry point the host drives: derives a clamped time step from
//! the host clock, refreshes input flags, and runs the controller. A frame
//! with no rigid body yet is skipped whole; the next one retries with fresh
//! state.

use tracing::debug;

use crate::config::ControllerConfig;
use crate::controller::{CharacterController, InputProcessor, InputState};
use crate::host::{CameraObstacles, RigidBody};
use crate::model::Camera;

pub struct FrameLoopContext {
    pub controller: CharacterController,
    pub camera: Camera,
    pub input: InputState,
    processor: InputProcessor,
    last_time_ms: Option<f64>,
}

impl FrameLoopContext {
    pub fn new(config: ControllerConfig, width: u32, height: u32) -> Self {
        let camera = Camera::new(&config, width, height);
        let processor = InputProcessor::new(config.keys.clone());
        Self {
            controller: CharacterController::new(config),
            camera,
            input: InputState::new(),
            processor,
            last_time_ms: None,
        }
    }

    /// Advance one frame. `now_ms` comes from the host clock. A missing
    /// `body` (still loading, already unmounted) skips the update entirely;
    /// accumulated look/zoom input is kept for the frame that can use it.
    pub fn update<B: RigidBody, O: CameraObstacles>(
        &mut self,
        body: Option<&mut B>,
        obstacles: &O,
        now_ms: f64,
    ) {
        let dt = self.step_clock(now_ms);

        let Some(body) = body else {
            debug!("rigid body not available, skipping frame");
            return;
        };

        let (dx, dy) = self.input.consume_look();
        self.camera.apply_look(dx, dy, self.controller.config());
        let zoom = self.input.consume_zoom();
        self.controller.zoom(zoom);

        self.processor.refresh(&mut self.input);
        self.controller
            .update(body, obstacles, &mut self.camera, &self.input, dt);
    }

    /// Seconds since the previous call, clamped so a backgrounded tab does
    /// not turn into one giant step.
    fn step_clock(&mut self, now_ms: f64) -> f32 {
        let max_dt = self.controller.config().max_frame_dt;
        let dt = match self.last_time_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, max_dt),
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        dt
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
        writes: usize,
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
            self.writes += 1;
        }
    }

    fn body() -> FakeBody {
        FakeBody {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            writes: 0,
        }
    }

    #[test]
    fn clock_steps_are_clamped() {
        let mut ctx = FrameLoopContext::new(ControllerConfig::default(), 800, 600);
        assert_eq!(ctx.step_clock(0.0), 0.0, "first frame has no delta yet");
        assert!((ctx.step_clock(16.6667) - 0.0166667).abs() < 1e-4);
        // five seconds in the background collapses to the clamp
        let dt = ctx.step_clock(5016.6667);
        assert_eq!(dt, ctx.controller.config().max_frame_dt);
    }

    #[test]
    fn missing_body_skips_the_frame_but_keeps_input() {
        let mut ctx = FrameLoopContext::new(ControllerConfig::default(), 800, 600);
        ctx.input.add_look(5.0, 0.0);
        let yaw_before = ctx.camera.yaw;
        ctx.update::<FakeBody, _>(None, &NoObstacles, 0.0);
        assert_eq!(ctx.camera.yaw, yaw_before, "skipped frame mutates nothing");
        assert_eq!(ctx.input.look_delta, (5.0, 0.0), "look input survives the skip");

        let mut b = body();
        ctx.update(Some(&mut b), &NoObstacles, 16.0);
        assert_eq!(b.writes, 1);
        assert_ne!(ctx.camera.yaw, yaw_before, "kept look applies next frame");
    }

    #[test]
    fn pressed_keys_drive_movement_through_the_loop() {
        let mut ctx = FrameLoopContext::new(ControllerConfig::default(), 800, 600);
        let mut b = body();
        ctx.input.key_down("w");
        ctx.update(Some(&mut b), &NoObstacles, 0.0);
        ctx.update(Some(&mut b), &NoObstacles, 1000.0 / 60.0);
        assert!(b.velocity.z < 0.0, "forward key produced a forward impulse");
    }
}
