//! Components and helpers shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::{CAMERA, CameraController};
use crate::ecs::{Arguments, Capability, Component, ComponentContext, Entity, FromArguments, Requirement};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::scene::Scene;
use crate::script::ScriptRegistry;

pub const BODY: Capability = Capability::new("Body");
pub const THRUST: Capability = Capability::new("Thrust");
pub const SHOOTER: Capability = Capability::new("Shooter");
pub const RECORDER: Capability = Capability::new("Recorder");

/// Shared, ordered record of callbacks.
#[derive(Clone, Default)]
pub struct Log {
    entries: Rc<RefCell<Vec<String>>>,
    first_flags: Rc<RefCell<Vec<bool>>>,
}

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn first_flags(&self) -> Vec<bool> {
        self.first_flags.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.first_flags.borrow_mut().clear();
    }
}

/// A plain capability provider with a speed.
pub struct Body {
    pub speed: f32,
}

impl Body {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl FromArguments for Body {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        Ok(Self::new(arguments.get_or("Body", "speed", 0.0)?))
    }
}

impl Component for Body {
    fn capability(&self) -> Capability {
        BODY
    }
}

/// Provides both its own capability and `BODY`.
pub struct Thruster;

impl Component for Thruster {
    fn capability(&self) -> Capability {
        THRUST
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![THRUST, BODY]
    }
}

/// Requires a `BODY`; remembers its speed at awake.
#[derive(Default)]
pub struct Shooter {
    pub rate: f32,
    pub body_speed_at_awake: Option<f32>,
}

impl FromArguments for Shooter {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        Ok(Self {
            rate: arguments.get_or("Shooter", "rate", 1.0)?,
            body_speed_at_awake: None,
        })
    }
}

impl Component for Shooter {
    fn capability(&self) -> Capability {
        SHOOTER
    }

    fn works_with(&self) -> Vec<Requirement> {
        vec![Requirement::new("body", BODY)]
    }

    fn awake(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        self.body_speed_at_awake = ctx.dependency::<Body>("body").map(|body| body.speed);
        Ok(())
    }
}

/// Requires a `Body` faster than 10.
#[derive(Default)]
pub struct Gunner {
    pub bound_speed: Option<f32>,
}

impl Component for Gunner {
    fn capability(&self) -> Capability {
        SHOOTER
    }

    fn works_with(&self) -> Vec<Requirement> {
        vec![Requirement::new("body", BODY).filtered(|c| {
            c.downcast_ref::<Body>().is_some_and(|body| body.speed > 10.0)
        })]
    }

    fn awake(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        self.bound_speed = ctx.dependency::<Body>("body").map(|body| body.speed);
        Ok(())
    }
}

/// Logs every callback it receives under its label.
pub struct Recorder {
    label: String,
    log: Log,
    destroy_owner_on_update: bool,
    fail_on_update: bool,
}

impl Recorder {
    pub fn new(label: &str, log: &Log) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
            destroy_owner_on_update: false,
            fail_on_update: false,
        }
    }

    pub fn destroy_owner_on_update(mut self) -> Self {
        self.destroy_owner_on_update = true;
        self
    }

    pub fn fail_on_update(mut self) -> Self {
        self.fail_on_update = true;
        self
    }
}

impl Component for Recorder {
    fn capability(&self) -> Capability {
        RECORDER
    }

    fn awake(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<()> {
        self.log.push(format!("awake {}", self.label));
        Ok(())
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _dt: f32, first_update: bool) -> Result<()> {
        self.log.push(format!("update {}", self.label));
        self.log.first_flags.borrow_mut().push(first_update);
        if self.fail_on_update {
            return Err(Error::component("Recorder", format!("{} failed", self.label)));
        }
        if self.destroy_owner_on_update {
            let owner = ctx.owner();
            ctx.scene_mut().destroy(owner);
        }
        Ok(())
    }

    fn draw(&mut self, _ctx: &mut ComponentContext<'_>, debug: bool) {
        let prefix = if debug { "debug-draw" } else { "draw" };
        self.log.push(format!("{prefix} {}", self.label));
    }

    fn on_event(&mut self, _ctx: &mut ComponentContext<'_>, event: &Event) {
        self.log.push(format!("{} {}", event.name(), self.label));
    }
}

/// A camera that logs what the scene asks of it.
pub struct RecordingCamera {
    log: Log,
}

impl RecordingCamera {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl Component for RecordingCamera {
    fn capability(&self) -> Capability {
        CAMERA
    }

    fn as_camera(&mut self) -> Option<&mut dyn CameraController> {
        Some(self)
    }
}

impl CameraController for RecordingCamera {
    fn apply(&mut self, scene: &Scene, entity: Entity) {
        self.log.push(format!("apply {}", scene.name_of(entity).unwrap_or("?")));
    }

    fn set(&mut self, scene: &Scene, object: Entity) {
        self.log.push(format!("set {}", scene.name_of(object).unwrap_or("?")));
    }

    fn unset(&mut self) {
        self.log.push("unset");
    }
}

/// Scripts used across the tests: `body`, `shooter`, `recorder` (argument
/// `label`), and a `camera` that logs into `log`.
pub fn scripts(log: &Log) -> ScriptRegistry {
    let mut scripts = ScriptRegistry::empty();
    scripts.register_type::<Body>("body");
    scripts.register_type::<Shooter>("shooter");
    let recorder_log = log.clone();
    scripts.register("recorder", move |arguments| {
        let label: String = arguments.required("Recorder", "label")?;
        let mut recorder = Recorder::new(&label, &recorder_log);
        if arguments.get_or("Recorder", "fail", false)? {
            recorder = recorder.fail_on_update();
        }
        Ok(Box::new(recorder))
    });
    let camera_log = log.clone();
    scripts.register("camera", move |_| Ok(Box::new(RecordingCamera::new(&camera_log))));
    scripts
}
