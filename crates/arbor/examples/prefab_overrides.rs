//! Build several instances of one prefab, each with its own argument
//! overrides, from JSON files on disk.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example prefab_overrides
//! ```

use arbor::prelude::*;
use serde_json::json;

const MOVER: Capability = Capability::new("Mover");
const HEALTH: Capability = Capability::new("Health");

struct Mover {
    speed: f32,
    drag: f32,
}

impl FromArguments for Mover {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        Ok(Self {
            speed: arguments.get_or("Mover", "speed", 0.0)?,
            drag: arguments.get_or("Mover", "drag", 0.0)?,
        })
    }
}

impl Component for Mover {
    fn capability(&self) -> Capability {
        MOVER
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32, _first_update: bool) -> Result<()> {
        self.speed = (self.speed - self.drag * dt).max(0.0);
        let step = self.speed * dt;
        if let Some(transform) = ctx.transform_mut() {
            transform.translate(Vec2::new(step, 0.0));
        }
        Ok(())
    }
}

struct Health {
    points: u32,
}

impl FromArguments for Health {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        Ok(Self {
            points: arguments.required("Health", "points")?,
        })
    }
}

impl Component for Health {
    fn capability(&self) -> Capability {
        HEALTH
    }
}

fn write_json(dir: &std::path::Path, id: &str, value: serde_json::Value) -> std::io::Result<()> {
    std::fs::write(dir.join(format!("{id}.json")), value.to_string())
}

fn main() -> Result<()> {
    env_logger::init();

    let assets = tempfile::tempdir().map_err(|e| Error::component("demo", e.to_string()))?;
    let io = |e: std::io::Error| Error::component("demo", e.to_string());
    write_json(
        assets.path(),
        "asteroid",
        json!({
            "components": [
                { "script": "mover", "arguments": { "speed": 100, "drag": 2 } },
                { "script": "health", "arguments": { "points": 3 } }
            ]
        }),
    )
    .map_err(io)?;
    write_json(
        assets.path(),
        "field",
        json!({
            "name": "asteroid field",
            "settings": {},
            "gameObjects": [
                { "name": "small", "prefab": "asteroid" },
                {
                    "name": "fast",
                    "prefab": "asteroid",
                    "prefabComponents": [{ "script": "mover", "arguments": { "speed": 200 } }]
                },
                {
                    "name": "tough",
                    "prefab": "asteroid",
                    "prefabComponents": [{ "script": "health", "arguments": { "points": 10 } }]
                }
            ]
        }),
    )
    .map_err(io)?;

    let scripts = ScriptRegistry::new()
        .with_type::<Mover>("mover")
        .with_type::<Health>("health");
    let mut scene = Scene::new(scripts).with_sources(DirectorySource::new(assets.path()));
    scene.load(SceneSource::Named("field".to_string()))?;

    for _ in 0..30 {
        scene.update(1.0 / 30.0)?;
    }

    for &object in scene.objects() {
        let name = scene.name_of(object).unwrap_or("?");
        let mover = scene.component::<Mover>(object);
        let health = scene.component::<Health>(object);
        let x = scene.transform(object).map_or(0.0, |t| t.position.x);
        println!(
            "{name:>6}: speed {:>5.1} drag {:.1} hp {:>2} x {x:.1}",
            mover.map_or(0.0, |m| m.speed),
            mover.map_or(0.0, |m| m.drag),
            health.map_or(0, |h| h.points),
        );
    }
    println!("{} objects carry health", scene.objects_with(HEALTH).len());
    Ok(())
}
