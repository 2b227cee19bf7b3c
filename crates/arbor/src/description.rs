//! # Descriptions — Scene Data Before It Is Alive
//!
//! Declarative records the builder turns into live objects. They mirror the
//! JSON scene format:
//!
//! ```text
//! SceneDescription  { name, settings, camera?, gameObjects: [ObjectDescription] }
//! ObjectDescription { name, transform, prefab?, prefabComponents?, components?,
//!                     children?: [ObjectDescription], isDebug? }
//! ComponentDescription { script, arguments?, isDebug? }
//! PrefabDescription { components: [ComponentDescription] }
//! ```
//!
//! Descriptions are plain data: cloning one never shares argument tables with
//! the original.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ecs::Arguments;
use crate::error::{Error, Result};
use crate::math::Transform;
use crate::settings::Settings;
use crate::source::SourceLoader;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentDescription {
    pub script: String,
    pub arguments: Arguments,
    pub is_debug: bool,
}

impl ComponentDescription {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            ..Self::default()
        }
    }

    pub fn with_argument(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(name, value);
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Only built when the scene runs in debug mode.
    pub fn debug_only(mut self) -> Self {
        self.is_debug = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectDescription {
    pub name: String,
    pub transform: Transform,
    pub prefab: Option<String>,
    /// Argument overrides for the prefab's components, matched by script.
    pub prefab_components: Vec<ComponentDescription>,
    pub components: Vec<ComponentDescription>,
    pub children: Vec<ObjectDescription>,
    pub is_debug: bool,
}

impl ObjectDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_prefab(mut self, prefab: &str) -> Self {
        self.prefab = Some(prefab.to_string());
        self
    }

    pub fn with_override(mut self, component: ComponentDescription) -> Self {
        self.prefab_components.push(component);
        self
    }

    pub fn with_component(mut self, component: ComponentDescription) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_child(mut self, child: ObjectDescription) -> Self {
        self.children.push(child);
        self
    }

    pub fn debug_only(mut self) -> Self {
        self.is_debug = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefabDescription {
    #[serde(default)]
    pub components: Vec<ComponentDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    pub settings: Settings,
    #[serde(default)]
    pub camera: Option<ObjectDescription>,
    pub game_objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Read a scene description from a table. Both `gameObjects` and
    /// `settings` must be present.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(table) = value.as_object() else {
            return Err(Error::InvalidScene("scene description is not a table".to_string()));
        };
        let missing: Vec<&str> = ["gameObjects", "settings"]
            .into_iter()
            .filter(|key| !table.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidScene(format!("missing {}", missing.join(" and "))));
        }
        Ok(serde_json::from_value(value)?)
    }
}

// ── Prefab library ───────────────────────────────────────────────────────

/// Named prefab templates. Prefabs not in the library are fetched through a
/// [`SourceLoader`] on first use and kept.
#[derive(Debug, Clone, Default)]
pub struct Prefabs {
    library: HashMap<String, PrefabDescription>,
}

impl Prefabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, prefab: PrefabDescription) {
        self.library.insert(name.to_string(), prefab);
    }

    pub fn with(mut self, name: &str, prefab: PrefabDescription) -> Self {
        self.insert(name, prefab);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PrefabDescription> {
        self.library.get(name)
    }

    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    /// Look a prefab up, loading it from `sources` if it is not known yet.
    pub fn resolve(&mut self, name: &str, sources: &dyn SourceLoader) -> Result<&PrefabDescription> {
        if name.trim().is_empty() {
            return Err(Error::InvalidPrefab(name.to_string()));
        }
        if !self.library.contains_key(name) {
            let value = sources.load(name).map_err(|e| {
                log::warn!("prefab `{name}` not in library and not loadable: {e}");
                Error::UnknownPrefab(name.to_string())
            })?;
            let prefab: PrefabDescription = serde_json::from_value(value)?;
            log::debug!("loaded prefab `{name}` ({} components)", prefab.components.len());
            self.library.insert(name.to_string(), prefab);
        }
        self.library
            .get(name)
            .ok_or_else(|| Error::UnknownPrefab(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::source::{MemorySource, NoSources};
    use serde_json::json;

    #[test]
    fn object_description_reads_camel_case_json() {
        let value = json!({
            "name": "ship",
            "transform": { "position": [10, 20], "rotation": 90 },
            "prefab": "ship",
            "prefabComponents": [{ "script": "body", "arguments": { "speed": 200 } }],
            "components": [{ "script": "hud", "isDebug": true }],
            "children": [{ "name": "turret" }],
        });
        let description: ObjectDescription = serde_json::from_value(value).unwrap();
        assert_eq!(description.transform.position, Vec2::new(10.0, 20.0));
        assert_eq!(description.transform.size, Vec2::ONE);
        assert_eq!(description.prefab.as_deref(), Some("ship"));
        assert_eq!(description.prefab_components[0].arguments.value("speed"), Some(&json!(200)));
        assert!(description.components[0].is_debug);
        assert_eq!(description.children[0].name, "turret");
        assert!(description.children[0].components.is_empty());
    }

    #[test]
    fn scene_description_requires_objects_and_settings() {
        let ok = SceneDescription::from_value(json!({ "name": "s", "settings": {}, "gameObjects": [] }));
        assert!(ok.unwrap().camera.is_none());

        match SceneDescription::from_value(json!({ "name": "s" })) {
            Err(Error::InvalidScene(message)) => {
                assert!(message.contains("gameObjects") && message.contains("settings"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            SceneDescription::from_value(json!("level")),
            Err(Error::InvalidScene(_))
        ));
    }

    #[test]
    fn prefabs_load_once_from_sources() {
        let sources = MemorySource::new().with("rock", json!({ "components": [{ "script": "body" }] }));
        let mut prefabs = Prefabs::new();
        assert_eq!(prefabs.resolve("rock", &sources).unwrap().components.len(), 1);
        assert_eq!(prefabs.len(), 1);
        // Cached: resolvable without the source now.
        assert!(prefabs.resolve("rock", &NoSources).is_ok());
    }

    #[test]
    fn prefab_reference_errors() {
        let mut prefabs = Prefabs::new();
        assert!(matches!(prefabs.resolve("", &NoSources), Err(Error::InvalidPrefab(_))));
        assert!(matches!(prefabs.resolve("  ", &NoSources), Err(Error::InvalidPrefab(_))));
        assert!(matches!(prefabs.resolve("ghost", &NoSources), Err(Error::UnknownPrefab(name)) if name == "ghost"));
    }
}
