//! Motion resolver: maps the frame's input flags onto a linear-velocity
//! impulse and a target facing angle. Pure math, no host access.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

use crate::config::ControllerConfig;
use crate::controller::input::InputState;
use crate::utils::wrap_angle;

/// Per-frame movement decision for the character body.
#[derive(Debug, Clone, Copy)]
pub struct MotionPlan {
    /// Linear-velocity impulse to hand to the rigid body this frame.
    pub impulse: Vec3,
    /// Facing angle the model should turn toward; `None` holds the
    /// previous value.
    pub facing: Option<f32>,
}

/// Resolve input into an impulse and facing target.
///
/// `camera_yaw` is the current camera-pivot yaw, so movement facing is
/// camera-relative. `current_vertical_velocity` is passed through unchanged
/// unless the jump flag fires; gravity and ground contact stay with the
/// physics host.
pub fn resolve(
    input: &InputState,
    camera_yaw: f32,
    current_vertical_velocity: f32,
    dt: f32,
    config: &ControllerConfig,
) -> MotionPlan {
    let speed = planar_speed(input, dt, config);

    // Opposite flags contribute in opposite directions and cancel to zero
    // on their axis.
    let mut impulse = Vec3::ZERO;
    if input.leftward {
        impulse.x -= speed;
    }
    if input.rightward {
        impulse.x += speed;
    }
    if input.forward {
        impulse.z -= speed;
    }
    if input.backward {
        impulse.z += speed;
    }

    impulse.y = if input.jump {
        if input.run {
            config.jump_velocity * config.sprint_jump_multiplier
        } else {
            config.jump_velocity
        }
    } else {
        current_vertical_velocity
    };

    MotionPlan {
        impulse,
        facing: facing_target(input, camera_yaw),
    }
}

/// Per-axis planar speed for this frame. A single directional flag moves at
/// `base_move_speed * dt`; with two orthogonal flags each axis gets
/// `√2 * (base_move_speed / 2) * dt` so the resultant diagonal magnitude
/// matches the single-axis case.
fn planar_speed(input: &InputState, dt: f32, config: &ControllerConfig) -> f32 {
    let mut speed = if input.direction_count() == 1 {
        config.base_move_speed * dt
    } else {
        SQRT_2 * (config.base_move_speed / 2.0) * dt
    };
    if input.run {
        speed *= config.sprint_multiplier;
    }
    speed
}

/// First-match priority chain over the four directional flags. Covers all
/// sixteen combinations exactly once; `None` means no flag is set and the
/// facing holds its previous value.
fn facing_target(input: &InputState, base: f32) -> Option<f32> {
    let (f, b, l, r) = (input.forward, input.backward, input.leftward, input.rightward);
    if !f && !b && !l && !r {
        return None;
    }
    let target = if f && l {
        base + FRAC_PI_4
    } else if f && r {
        base - FRAC_PI_4
    } else if b && l {
        base - FRAC_PI_4 + PI
    } else if b && r {
        base + FRAC_PI_4 + PI
    } else if b {
        base + PI
    } else if l {
        base + FRAC_PI_2
    } else if r {
        base - FRAC_PI_2
    } else {
        base
    };
    Some(wrap_angle(target))
}
