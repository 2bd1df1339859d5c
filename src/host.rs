//! Capability interfaces toward the external physics/render host.
//!
//! The controller never owns rigid-body dynamics or scene geometry; it only
//! reads and writes through these traits, so the motion and camera math can
//! be exercised against fake hosts in tests.

use glam::Vec3;

/// Accessor for the externally-owned rigid body the character rides on.
///
/// Position and velocity stay authoritative on the host side; the controller
/// reads them once per frame and writes back a single velocity impulse.
pub trait RigidBody {
    fn position(&self) -> Vec3;
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
}

/// Ray query against the host scene, used for camera occlusion avoidance.
///
/// Implementations return the distance to the first hit along `direction`
/// within `max_distance`, and must skip geometry the host has tagged as
/// camera-excluded (the exclusion predicate lives on the host side, where
/// the collider tags are known).
pub trait CameraObstacles {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}

/// A host with no camera-blocking geometry.
pub struct NoObstacles;

impl CameraObstacles for NoObstacles {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<f32> {
        None
    }
}
