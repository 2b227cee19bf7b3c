//! # Settings — Sectioned Configuration With Default Filling
//!
//! Settings are a JSON-shaped table of sections. A section is either an
//! option mapping (`window`, `graphics`, `game`) or a bare scalar:
//!
//! ```text
//! {
//!   "window":   { "width": 1024, "height": 600, "title": "arbor", ... },
//!   "graphics": { "background": [0, 0, 0, 1], "font": null, "fontSize": 12 },
//!   "game":     { "scene": "level1", "debug": false }
//! }
//! ```
//!
//! [`create_settings_table`] fills a table from defaults one level deep:
//!
//! - a section missing from the settings is copied from the defaults,
//! - a mapping section present in both gets its missing keys filled,
//! - a scalar section is set to the default only if it is absent or `null`.
//!
//! Nested mappings below the first level are taken as a whole, never merged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// A settings table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a settings table out of an arbitrary JSON value. The value must be
    /// an object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A single option of a mapping section.
    pub fn option(&self, section: &str, key: &str) -> Option<&Value> {
        self.0.get(section)?.as_object()?.get(key)
    }

    pub fn set_section(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Set one option, turning the section into a mapping if it was not one.
    pub fn set_option(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .0
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(options) = entry {
            options.insert(key.to_string(), value.into());
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Typed view of a section. Absent or `null` sections yield `T::default()`.
    pub fn typed<T: DeserializeOwned + Default>(&self, section: &str) -> Result<T> {
        match self.0.get(section) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::deserialize(value).map_err(|source| Error::Settings {
                section: section.to_string(),
                source,
            }),
        }
    }

    pub fn window(&self) -> Result<WindowSettings> {
        self.typed("window")
    }

    pub fn graphics(&self) -> Result<GraphicsSettings> {
        self.typed("graphics")
    }

    pub fn game(&self) -> Result<GameSettings> {
        self.typed("game")
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Fill `settings` from `defaults`, one level deep. Explicit settings win.
pub fn create_settings_table(settings: &Settings, defaults: &Settings) -> Settings {
    let mut merged = settings.0.clone();
    for (section, default) in &defaults.0 {
        match (merged.get_mut(section), default) {
            (None, _) => {
                merged.insert(section.clone(), default.clone());
            }
            (Some(Value::Object(options)), Value::Object(default_options)) => {
                for (key, value) in default_options {
                    options.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            (Some(current), Value::Object(_)) if current.is_null() => {
                *current = default.clone();
            }
            (Some(_), Value::Object(_)) => {
                log::warn!("settings section `{section}` is not a mapping; defaults not applied");
            }
            (Some(current), _) => {
                if current.is_null() {
                    *current = default.clone();
                }
            }
        }
    }
    Settings(merged)
}

/// The engine's built-in defaults.
pub fn engine_defaults() -> Settings {
    let value = json!({
        "window": {
            "width": 800,
            "height": 600,
            "title": "arbor",
            "fullscreen": false,
            "resizable": false,
            "vsync": true,
        },
        "graphics": {
            "background": [0.0, 0.0, 0.0, 1.0],
            "font": null,
            "fontSize": 12.0,
        },
        "game": {
            "scene": null,
            "debug": false,
        },
    });
    match value {
        Value::Object(map) => Settings(map),
        _ => Settings::default(),
    }
}

// ── Typed sections ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fullscreen: bool,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "arbor".to_string(),
            fullscreen: false,
            resizable: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphicsSettings {
    /// Clear color as RGBA in `[0, 1]`.
    pub background: [f32; 4],
    pub font: Option<String>,
    pub font_size: f32,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            font: None,
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Identifier of the first scene, loaded by `SceneSource::Default`.
    pub scene: Option<String>,
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(value: Value) -> Settings {
        Settings::from_value(value).unwrap()
    }

    #[test]
    fn mapping_sections_are_filled_key_by_key() {
        let defaults = settings(json!({ "window": { "width": 800, "height": 600 } }));
        let user = settings(json!({ "window": { "width": 1024 } }));
        let merged = create_settings_table(&user, &defaults);
        assert_eq!(merged.section("window"), Some(&json!({ "width": 1024, "height": 600 })));
    }

    #[test]
    fn absent_sections_are_copied_and_extras_kept() {
        let defaults = settings(json!({ "game": { "debug": false }, "volume": 3 }));
        let user = settings(json!({ "custom": { "x": 1 } }));
        let merged = create_settings_table(&user, &defaults);
        assert_eq!(merged.section("game"), Some(&json!({ "debug": false })));
        assert_eq!(merged.section("volume"), Some(&json!(3)));
        assert_eq!(merged.section("custom"), Some(&json!({ "x": 1 })));
    }

    #[test]
    fn scalar_sections_only_fill_when_unset() {
        let defaults = settings(json!({ "volume": 3, "lang": "en" }));
        let user = settings(json!({ "volume": 7, "lang": null }));
        let merged = create_settings_table(&user, &defaults);
        assert_eq!(merged.section("volume"), Some(&json!(7)));
        assert_eq!(merged.section("lang"), Some(&json!("en")));
    }

    #[test]
    fn merge_is_one_level_deep() {
        let defaults = settings(json!({ "graphics": { "background": [0, 0, 0, 1], "extra": { "a": 1, "b": 2 } } }));
        let user = settings(json!({ "graphics": { "extra": { "a": 5 } } }));
        let merged = create_settings_table(&user, &defaults);
        assert_eq!(merged.option("graphics", "extra"), Some(&json!({ "a": 5 })));
        assert_eq!(merged.option("graphics", "background"), Some(&json!([0, 0, 0, 1])));
    }

    #[test]
    fn typed_views_read_merged_defaults() {
        let user = settings(json!({ "window": { "title": "Asteroids" }, "game": { "debug": true } }));
        let merged = create_settings_table(&user, &engine_defaults());
        let window = merged.window().unwrap();
        assert_eq!((window.width, window.height), (800, 600));
        assert_eq!(window.title, "Asteroids");
        assert!(merged.game().unwrap().debug);
        assert_eq!(merged.graphics().unwrap(), GraphicsSettings::default());
    }

    #[test]
    fn malformed_section_names_itself() {
        let broken = settings(json!({ "window": { "width": "wide" } }));
        match broken.window() {
            Err(Error::Settings { section, .. }) => assert_eq!(section, "window"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(Settings::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn set_option_creates_sections() {
        let mut settings = Settings::new();
        settings.set_option("game", "scene", "intro");
        assert_eq!(settings.game().unwrap().scene.as_deref(), Some("intro"));
    }
}
