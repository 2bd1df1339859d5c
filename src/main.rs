use glam::Vec3;
use tracing::info;

use charcam::{
    logging, Camera, CameraObstacles, ControllerConfig, FrameLoopContext, RigidBody,
};

/// Stand-in for the external physics engine: integrates the velocity the
/// controller writes, applies gravity, and keeps the capsule on a flat
/// ground plane at y = 0.
struct DemoBody {
    position: Vec3,
    velocity: Vec3,
    gravity: f32,
}

impl DemoBody {
    fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity: -9.8,
        }
    }

    fn step(&mut self, dt: f32) {
        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
        }
    }
}

impl RigidBody for DemoBody {
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

struct Obstacle {
    min: Vec3,
    max: Vec3,
    /// Tagged geometry the camera ray ignores, e.g. foliage.
    camera_excluded: bool,
}

impl Obstacle {
    fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Static scene with a marching ray query for camera occlusion.
struct DemoScene {
    obstacles: Vec<Obstacle>,
}

impl CameraObstacles for DemoScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let step_size = 0.1;
        let mut distance = 0.0;
        while distance < max_distance {
            distance += step_size;
            let p = origin + direction * distance;
            if self
                .obstacles
                .iter()
                .any(|o| !o.camera_excluded && o.contains(p))
            {
                return Some(distance);
            }
        }
        None
    }
}

/// Scripted input: (frame the phase starts at, keys held from then on).
const SCRIPT: &[(u32, &[&str])] = &[
    (0, &["w"]),
    (120, &["w", "a"]),
    (240, &["w", "Shift"]),
    (300, &["w", " "]),
    (320, &["w"]),
    (420, &["s"]),
    (540, &[]),
];

fn main() {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ControllerConfig::from_file(std::path::Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => ControllerConfig::default(),
    };

    let mut ctx = FrameLoopContext::new(config, 1280, 720);
    let mut body = DemoBody::new();
    let scene = DemoScene {
        obstacles: vec![
            // a wall behind the walking line the camera will back into
            Obstacle {
                min: Vec3::new(-20.0, 0.0, 2.0),
                max: Vec3::new(20.0, 4.0, 3.0),
                camera_excluded: false,
            },
            // tagged geometry the occlusion ray skips
            Obstacle {
                min: Vec3::new(-2.0, 0.0, -6.0),
                max: Vec3::new(2.0, 3.0, -5.0),
                camera_excluded: true,
            },
        ],
    };

    let frame_ms = 1000.0 / 60.0;
    for frame in 0u32..600 {
        if let Some((_, keys)) = SCRIPT.iter().rev().find(|(start, _)| frame >= *start) {
            ctx.input.clear_keys();
            for key in *keys {
                ctx.input.key_down(*key);
            }
        }

        ctx.update(Some(&mut body), &scene, frame as f64 * frame_ms);
        body.step(1.0 / 60.0);

        if frame % 60 == 0 {
            log_state(frame, &body, &ctx.camera, &ctx);
        }
    }

    info!("demo finished");
}

fn log_state(frame: u32, body: &DemoBody, camera: &Camera, ctx: &FrameLoopContext) {
    info!(
        frame,
        position = ?body.position,
        facing = ctx.controller.facing_angle(),
        cam_eye = ?camera.eye(),
        boom = ctx.controller.rig().distance(),
    );
}
