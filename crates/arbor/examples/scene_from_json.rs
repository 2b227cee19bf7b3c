//! Load a scene from a JSON table, run a few frames headless, and print a
//! snapshot of the result.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example scene_from_json
//! ```

use arbor::prelude::*;
use serde_json::json;

const SPINNER: Capability = Capability::new("Spinner");
const ORBIT: Capability = Capability::new("Orbit");

/// Rotates its owner at a fixed rate (degrees per second).
struct Spinner {
    rate: f32,
}

impl FromArguments for Spinner {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        arguments.require("Spinner", &["rate"])?;
        Ok(Self {
            rate: arguments.required("Spinner", "rate")?,
        })
    }
}

impl Component for Spinner {
    fn capability(&self) -> Capability {
        SPINNER
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32, _first_update: bool) -> Result<()> {
        if let Some(transform) = ctx.transform_mut() {
            transform.rotate(self.rate * dt);
        }
        Ok(())
    }
}

/// Reports its owner's global position once, on the first update, after the
/// whole scene exists.
struct Orbit;

impl Component for Orbit {
    fn capability(&self) -> Capability {
        ORBIT
    }

    fn works_with(&self) -> Vec<Requirement> {
        vec![Requirement::new("spinner", SPINNER)]
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _dt: f32, first_update: bool) -> Result<()> {
        if first_update {
            let rate = ctx.dependency::<Spinner>("spinner").map_or(0.0, |s| s.rate);
            if let Some(global) = ctx.global_transform() {
                println!("{} starts at {} spinning {rate}°/s", ctx.name(), global.position);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut scripts = ScriptRegistry::new().with_type::<Spinner>("spinner");
    scripts.register("orbit", |_| Ok(Box::new(Orbit)));

    let mut scene = Scene::new(scripts);
    scene.load(SceneSource::Table(json!({
        "name": "solar",
        "settings": {
            "window": { "title": "Solar", "width": 1280, "height": 720 },
            "game": { "debug": false }
        },
        "gameObjects": [
            {
                "name": "sun",
                "transform": { "position": [640, 360] },
                "components": [{ "script": "spinner", "arguments": { "rate": 30 } }],
                "children": [
                    {
                        "name": "planet",
                        "transform": { "position": [200, 0], "size": [0.5, 0.5] },
                        "components": [
                            { "script": "spinner", "arguments": { "rate": 90 } },
                            { "script": "orbit" }
                        ]
                    }
                ]
            },
            { "name": "axes", "isDebug": true }
        ]
    })))?;

    for _ in 0..60 {
        scene.update(1.0 / 60.0)?;
        scene.draw();
    }

    let planet = scene
        .find_object("planet")
        .ok_or_else(|| Error::component("demo", "planet missing"))?;
    if let Some(global) = scene.global_transform(planet) {
        println!("after one second the planet is at {} (rotation {:.1}°)", global.position, global.rotation());
    }

    let snapshot = scene.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
