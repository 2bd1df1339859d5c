// CONTROLLER: input, motion resolution, and the follow-camera rig
pub mod camera_rig;
pub mod character;
pub mod input;
pub mod motion;

pub use camera_rig::CameraRig;
pub use character::CharacterController;
pub use input::{InputProcessor, InputState, KeyBindings};
pub use motion::MotionPlan;
