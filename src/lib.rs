// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod utils;

pub mod frame_loop;
pub mod host;

// MVC architecture
pub mod controller;
pub mod model;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{CameraRig, CharacterController, InputProcessor, InputState, KeyBindings};
pub use frame_loop::FrameLoopContext;
pub use host::{CameraObstacles, NoObstacles, RigidBody};
pub use model::{Camera, CharacterState};

#[cfg(target_arch = "wasm32")]
use glam::Vec3;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Event, KeyboardEvent, MouseEvent, Window};

/// Rigid-body snapshot handed over by the JS host each frame. The impulse
/// the controller writes back is captured and returned to the host, which
/// owns the actual physics body.
#[cfg(target_arch = "wasm32")]
struct JsBody {
    position: Vec3,
    velocity: Vec3,
    impulse: Option<Vec3>,
}

#[cfg(target_arch = "wasm32")]
impl RigidBody for JsBody {
    fn position(&self) -> Vec3 {
        self.position
    }
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.impulse = Some(velocity);
    }
}

/// Camera occlusion queries forwarded to a host-side callback
/// `(ox, oy, oz, dx, dy, dz, maxDistance) -> distance | null`. The host
/// applies its own camera-exclusion tags before reporting a hit.
#[cfg(target_arch = "wasm32")]
struct JsRaycaster {
    callback: Option<js_sys::Function>,
}

#[cfg(target_arch = "wasm32")]
impl CameraObstacles for JsRaycaster {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let f = self.callback.as_ref()?;
        let args = js_sys::Array::new();
        for v in [
            origin.x,
            origin.y,
            origin.z,
            direction.x,
            direction.y,
            direction.z,
            max_distance,
        ] {
            args.push(&JsValue::from_f64(v as f64));
        }
        let hit = f.apply(&JsValue::NULL, &args).ok()?;
        hit.as_f64().map(|d| d as f32)
    }
}

/// Browser-facing controller handle.
///
/// The host constructs one, attaches the DOM listeners, and calls `frame`
/// once per animation frame with the physics body's current transform. The
/// returned array carries the impulse to apply plus the camera pose.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WebController {
    ctx: Rc<RefCell<FrameLoopContext>>,
    raycaster: Rc<RefCell<JsRaycaster>>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WebController {
    /// `options_json` is an optional JSON object overriding any subset of
    /// the configuration defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        options_json: Option<String>,
    ) -> Result<WebController, JsValue> {
        logging::init();

        let config = match options_json {
            Some(json) => {
                ControllerConfig::from_json_str(&json).map_err(|e| js_error(e.to_string()))?
            }
            None => ControllerConfig::default(),
        };

        Ok(WebController {
            ctx: Rc::new(RefCell::new(FrameLoopContext::new(config, width, height))),
            raycaster: Rc::new(RefCell::new(JsRaycaster { callback: None })),
        })
    }

    /// Register the host's occlusion ray callback. Without one the camera
    /// never pulls in.
    pub fn set_raycaster(&self, callback: js_sys::Function) {
        self.raycaster.borrow_mut().callback = Some(callback);
    }

    pub fn set_aspect(&self, width: u32, height: u32) {
        self.ctx.borrow_mut().camera.set_aspect(width, height);
    }

    /// Wire keyboard/mouse/wheel/focus listeners into the input state.
    pub fn attach(&self, document: &Document, window: &Window) -> Result<(), JsValue> {
        // Keyboard down
        {
            let ctx = self.ctx.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                let key = e.key();

                // Prevent default for navigation keys
                if matches!(
                    key.as_str(),
                    "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "w" | "a" | "s" | "d"
                        | "W" | "A" | "S" | "D" | " " | "Shift"
                ) {
                    e.prevent_default();
                }

                ctx.borrow_mut().input.key_down(key);
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let ctx = self.ctx.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                ctx.borrow_mut().input.key_up(e.key().as_str());
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Focus loss - clear all keys
        {
            let ctx = self.ctx.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                ctx.borrow_mut().input.clear_keys();
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Visibility change - clear all keys
        {
            let ctx = self.ctx.clone();
            let visibility = Closure::wrap(Box::new(move |_e: Event| {
                ctx.borrow_mut().input.clear_keys();
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback(
                "visibilitychange",
                visibility.as_ref().unchecked_ref(),
            )?;
            visibility.forget();
        }

        // Pointer lock change
        {
            let ctx = self.ctx.clone();
            let doc_pl = document.clone();
            let plc = Closure::wrap(Box::new(move |_e: Event| {
                ctx.borrow_mut().input.pointer_locked = doc_pl.pointer_lock_element().is_some();
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback(
                "pointerlockchange",
                plc.as_ref().unchecked_ref(),
            )?;
            plc.forget();
        }

        // Mouse move - orbit the camera while pointer-locked
        {
            let ctx = self.ctx.clone();
            let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
                let mut ctx = ctx.borrow_mut();
                if ctx.input.pointer_locked {
                    ctx.input
                        .add_look(e.movement_x() as f32, e.movement_y() as f32);
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
            mm.forget();
        }

        // Mouse wheel - zoom, one notch per event
        {
            let ctx = self.ctx.clone();
            let wheel = Closure::wrap(Box::new(move |e: Event| {
                let js_val = JsValue::from(e.clone());
                if let Ok(delta_y) = js_sys::Reflect::get(&js_val, &JsValue::from_str("deltaY")) {
                    if let Some(dy) = delta_y.as_f64() {
                        if dy != 0.0 {
                            ctx.borrow_mut().input.add_zoom(dy.signum() as f32);
                            e.prevent_default();
                        }
                    }
                }
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
            wheel.forget();
        }

        Ok(())
    }

    /// Advance one frame with the body's current transform. Returns
    /// `[impulse xyz, facing yaw, camera eye xyz, pivot xyz]`.
    pub fn frame(
        &self,
        now_ms: f64,
        px: f32,
        py: f32,
        pz: f32,
        vx: f32,
        vy: f32,
        vz: f32,
    ) -> js_sys::Float32Array {
        let mut body = JsBody {
            position: Vec3::new(px, py, pz),
            velocity: Vec3::new(vx, vy, vz),
            impulse: None,
        };

        let raycaster = self.raycaster.borrow();
        let mut ctx = self.ctx.borrow_mut();
        ctx.update(Some(&mut body), &*raycaster, now_ms);

        let impulse = body.impulse.unwrap_or(body.velocity);
        let facing = ctx.controller.facing_angle();
        let eye = ctx.camera.eye();
        let pivot = ctx.controller.rig().pivot();
        let out = [
            impulse.x, impulse.y, impulse.z, facing, eye.x, eye.y, eye.z, pivot.x, pivot.y,
            pivot.z,
        ];
        js_sys::Float32Array::from(&out[..])
    }

    /// Advance the clock on a frame where the body is not ready yet.
    pub fn frame_skipped(&self, now_ms: f64) {
        self.ctx
            .borrow_mut()
            .update::<JsBody, _>(None, &NoObstacles, now_ms);
    }

    /// Column-major view-projection matrix for the host renderer.
    pub fn view_proj(&self) -> js_sys::Float32Array {
        let m = self.ctx.borrow().camera.view_proj().to_cols_array();
        js_sys::Float32Array::from(&m[..])
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}
