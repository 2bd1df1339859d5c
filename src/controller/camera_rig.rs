//! Follow-camera rig: a pivot that lags the character with exponential
//! smoothing, a zoom distance clamped to configured bounds, and occlusion
//! avoidance against the host scene.

use glam::Vec3;

use crate::config::ControllerConfig;
use crate::host::CameraObstacles;
use crate::utils::smoothing_factor;

pub struct CameraRig {
    pivot: Vec3,
    /// Boom length actually in use this frame, possibly pulled in by an
    /// occluder.
    distance: f32,
    /// Boom length the zoom input asks for, always within
    /// `[cam_min_distance, cam_max_distance]`.
    desired_distance: f32,
}

impl CameraRig {
    pub fn new(config: &ControllerConfig) -> Self {
        let desired = config
            .cam_initial_distance
            .clamp(config.cam_min_distance, config.cam_max_distance);
        Self {
            pivot: Vec3::ZERO,
            distance: desired,
            desired_distance: desired,
        }
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Point the pivot chases: the character position plus the configured
    /// offset, defaulting to upper-body height.
    pub fn follow_target(character_pos: Vec3, config: &ControllerConfig) -> Vec3 {
        character_pos
            + Vec3::new(
                config.cam_target_offset_x,
                config.follow_target_height(),
                config.cam_target_offset_z,
            )
    }

    /// Move the pivot toward the follow target with frame-rate independent
    /// exponential smoothing.
    pub fn follow(&mut self, character_pos: Vec3, dt: f32, config: &ControllerConfig) {
        let target = Self::follow_target(character_pos, config);
        self.pivot += (target - self.pivot) * smoothing_factor(config.cam_follow_multiplier, dt);
    }

    /// Apply accumulated wheel input to the desired boom length.
    pub fn apply_zoom(&mut self, wheel_delta: f32, config: &ControllerConfig) {
        if wheel_delta != 0.0 {
            self.desired_distance = (self.desired_distance
                + wheel_delta * config.cam_zoom_speed)
                .clamp(config.cam_min_distance, config.cam_max_distance);
        }
    }

    /// Clamp the boom against scene geometry. Casts from the character's
    /// follow target backwards along the camera boom; a hit pulls the camera
    /// in immediately, a cleared ray eases it back out.
    pub fn avoid_occlusion<O: CameraObstacles>(
        &mut self,
        character_pos: Vec3,
        boom_direction: Vec3,
        obstacles: &O,
        dt: f32,
        config: &ControllerConfig,
    ) {
        let target = if config.cam_collision_enabled {
            let origin = Self::follow_target(character_pos, config);
            match obstacles.cast_ray(origin, boom_direction, self.desired_distance) {
                Some(hit) => (hit - config.cam_collision_offset)
                    .max(0.0)
                    .min(self.desired_distance),
                None => self.desired_distance,
            }
        } else {
            self.desired_distance
        };

        if target < self.distance {
            // snap in so geometry never clips through the camera
            self.distance = target;
        } else {
            self.distance += (target - self.distance)
                * smoothing_factor(config.cam_collision_recover_multiplier, dt);
        }
    }
}
