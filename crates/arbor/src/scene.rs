//! # Scene — Root, Registry, Settings, Frame Loop
//!
//! The [`Scene`] owns the node [`Tree`] whose root it is, the flat registry
//! of tracked objects, the settings, the camera object, and the shared
//! [`Globals`].
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──load_settings──▶ SettingsLoaded ──load──▶ Built ──update──▶ Running
//! ```
//!
//! `load` on an uninitialized scene loads the engine defaults first, so
//! `Scene::new(..).load(SceneSource::Table(..))` is enough to get going.
//!
//! ## Frame
//!
//! ```text
//! update(dt):  refresh root global
//!              for child in root.children:  camera.apply(child); child.update(dt, first)
//!              first-update flag cleared for good
//! draw():      for object in registry order: camera.set(object); draw; camera.unset()
//! ```
//!
//! Update walks the tree; draw walks the registry. An object's draw position
//! is decided by when it was added to the scene, not by where it sits in the
//! tree.

use serde_json::Value;

use crate::backend::{HeadlessWindow, WindowBackend};
use crate::builder::build_object;
use crate::camera::CameraController;
use crate::description::{ComponentDescription, ObjectDescription, Prefabs, SceneDescription};
use crate::ecs::hierarchy::{compute_global_transform, refresh_global_transform};
use crate::ecs::{Capability, Entity, Tree};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::globals::Globals;
use crate::math::{Transform, Vec2};
use crate::script::ScriptRegistry;
use crate::settings::{Settings, create_settings_table, engine_defaults};
use crate::source::{NoSources, SourceLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneState {
    Uninitialized,
    SettingsLoaded,
    Built,
    Running,
}

/// Where [`Scene::load_settings`] gets its table from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    Table(Settings),
    /// Resolved through the scene's [`SourceLoader`].
    Named(String),
}

/// What [`Scene::load`] builds.
#[derive(Debug, Clone)]
pub enum SceneSource {
    /// The first scene named by the `game.scene` setting.
    Default,
    /// Resolved through the scene's [`SourceLoader`].
    Named(String),
    /// A raw table, validated before use.
    Table(Value),
    Description(SceneDescription),
}

pub struct Scene {
    pub(crate) tree: Tree,
    root: Entity,
    name: String,
    pub(crate) registry: Vec<Entity>,
    camera: Option<Entity>,
    settings: Settings,
    defaults: Settings,
    pub(crate) globals: Globals,
    finished_first_update: bool,
    state: SceneState,
    pub(crate) scripts: ScriptRegistry,
    pub(crate) prefabs: Prefabs,
    pub(crate) sources: Box<dyn SourceLoader>,
    window: Box<dyn WindowBackend>,
}

impl Scene {
    pub fn new(scripts: ScriptRegistry) -> Self {
        let mut tree = Tree::new();
        let root = tree.spawn(Transform::IDENTITY, None);
        Self {
            tree,
            root,
            name: String::new(),
            registry: Vec::new(),
            camera: None,
            settings: Settings::new(),
            defaults: engine_defaults(),
            globals: Globals::default(),
            finished_first_update: false,
            state: SceneState::Uninitialized,
            scripts,
            prefabs: Prefabs::new(),
            sources: Box::new(NoSources),
            window: Box::new(HeadlessWindow::default()),
        }
    }

    pub fn with_window(mut self, window: impl WindowBackend + 'static) -> Self {
        self.window = Box::new(window);
        self
    }

    pub fn with_sources(mut self, sources: impl SourceLoader + 'static) -> Self {
        self.sources = Box::new(sources);
        self
    }

    pub fn with_prefabs(mut self, prefabs: Prefabs) -> Self {
        self.prefabs = prefabs;
        self
    }

    /// Replace the engine defaults settings are filled from.
    pub fn with_defaults(mut self, defaults: Settings) -> Self {
        self.defaults = defaults;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn camera(&self) -> Option<Entity> {
        self.camera
    }

    pub fn window(&self) -> &dyn WindowBackend {
        self.window.as_ref()
    }

    pub fn scripts_mut(&mut self) -> &mut ScriptRegistry {
        &mut self.scripts
    }

    pub fn prefabs_mut(&mut self) -> &mut Prefabs {
        &mut self.prefabs
    }

    pub fn is_debug(&self) -> bool {
        self.globals.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.globals.debug = debug;
    }

    /// Whether an update pass has completed. Never reset, not even by `load`.
    pub fn has_finished_first_update(&self) -> bool {
        self.finished_first_update
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.tree.is_alive(entity)
    }

    /// An object's name, or the scene's name for the root.
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        if entity == self.root {
            return Some(&self.name);
        }
        self.object(entity).map(|object| object.name())
    }

    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.tree.get(entity).map(|node| node.transform())
    }

    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.tree.get_mut(entity).map(|node| &mut node.transform)
    }

    /// Global transform from the current ancestor chain.
    pub fn global_transform(&self, entity: Entity) -> Option<Transform> {
        compute_global_transform(&self.tree, entity)
    }

    // ── Registry queries ─────────────────────────────────────────────────

    /// Tracked objects in the order they were added.
    pub fn objects(&self) -> &[Entity] {
        &self.registry
    }

    pub fn find_object(&self, name: &str) -> Option<Entity> {
        self.registry
            .iter()
            .copied()
            .find(|&object| self.name_of(object) == Some(name))
    }

    /// Tracked objects with at least one component providing `capability`.
    pub fn objects_with(&self, capability: Capability) -> Vec<Entity> {
        self.registry
            .iter()
            .copied()
            .filter(|&object| self.object(object).is_some_and(|o| o.has(capability)))
            .collect()
    }

    // ── Tree operations ──────────────────────────────────────────────────

    /// A component-less entity at scene level.
    pub fn spawn_entity(&mut self, transform: Transform) -> Entity {
        let entity = self.tree.spawn(transform, Some(self.root));
        if let Some(root) = self.tree.get_mut(self.root) {
            root.children.push(entity);
        }
        entity
    }

    /// Move `child` under `parent`. Adding to the root places the child at
    /// scene level without a parent link.
    pub fn add_child(&mut self, parent: Entity, child: Entity) -> Result<()> {
        let track_parent = parent != self.root;
        self.tree.add_child(parent, child, track_parent)?;
        if let Some(node) = self.tree.get_mut(child) {
            node.scene = Some(self.root);
        }
        Ok(())
    }

    /// Unlist `child` from `parent`. The child stays alive but is no longer
    /// reached by traversal until it is added somewhere again.
    pub fn remove_child(&mut self, parent: Entity, child: Entity) -> bool {
        self.tree.remove_child(parent, child)
    }

    /// Destroy every descendant of `entity`, deepest first.
    pub fn remove_all_children(&mut self, entity: Entity) {
        for child in self.tree.children(entity).to_vec() {
            self.destroy(child);
        }
    }

    /// Detach `entity`, then destroy it and its whole subtree: registry
    /// entries, components, and nodes.
    pub fn destroy(&mut self, entity: Entity) {
        if entity == self.root {
            log::warn!("refusing to destroy the scene root; use remove_all_children");
            return;
        }
        if !self.tree.is_alive(entity) {
            log::warn!("destroy of dead entity {entity}");
            return;
        }

        self.tree.detach(entity);
        let mut doomed = self.tree.descendants(entity);
        doomed.insert(0, entity);
        for &gone in doomed.iter().rev() {
            self.registry.retain(|&tracked| tracked != gone);
            if self.camera == Some(gone) {
                self.camera = None;
            }
            if let Some(node) = self.tree.despawn(gone) {
                if let Some(object) = node.object {
                    log::debug!("destroyed `{}` ({gone})", object.name());
                }
            }
        }
    }

    // ── Settings ─────────────────────────────────────────────────────────

    /// Fill `source` from the engine defaults and make it the active settings.
    pub fn load_settings(&mut self, source: SettingsSource) -> Result<()> {
        let table = match source {
            SettingsSource::Table(table) => table,
            SettingsSource::Named(id) => Settings::from_value(self.sources.load(&id)?)?,
        };
        self.settings = create_settings_table(&table, &self.defaults);
        self.state = self.state.max(SceneState::SettingsLoaded);
        log::info!("settings loaded ({} sections)", self.settings.sections().count());
        Ok(())
    }

    /// Push the window and graphics sections to the window backend and the
    /// debug flag to the globals.
    pub fn apply_settings(&mut self) -> Result<()> {
        let window = self.settings.window()?;
        let graphics = self.settings.graphics()?;
        let game = self.settings.game()?;

        self.window.set_window_mode(window.width, window.height, &window);
        self.window.set_window_title(&window.title);
        self.window.set_background_color(graphics.background);
        self.window.set_default_font(graphics.font.as_deref(), graphics.font_size);

        self.globals.debug = game.debug;
        self.globals.window_size = Vec2::new(window.width as f32, window.height as f32);
        log::info!(
            "settings applied: {}x{} `{}`, debug {}",
            window.width,
            window.height,
            window.title,
            game.debug
        );
        Ok(())
    }

    // ── Loading ──────────────────────────────────────────────────────────

    /// Replace the scene's content with a scene description.
    pub fn load(&mut self, source: SceneSource) -> Result<()> {
        if self.state == SceneState::Uninitialized {
            self.load_settings(SettingsSource::Table(Settings::new()))?;
        }

        let description = match source {
            SceneSource::Default => {
                let id = self.settings.game()?.scene.ok_or(Error::NoStartScene)?;
                SceneDescription::from_value(self.sources.load(&id)?)?
            }
            SceneSource::Named(id) => SceneDescription::from_value(self.sources.load(&id)?)?,
            SceneSource::Table(value) => SceneDescription::from_value(value)?,
            SceneSource::Description(description) => description,
        };

        self.reinitialize(&description.name);
        self.settings = create_settings_table(&description.settings, &self.settings);
        self.apply_settings()?;

        let camera = description.camera.clone().unwrap_or_else(default_camera);
        self.camera = Some(build_object(self, &camera, false)?);

        let debug = self.globals.debug;
        for object in &description.game_objects {
            if object.is_debug && !debug {
                log::debug!("skipping debug-only object `{}`", object.name);
                continue;
            }
            build_object(self, object, true)?;
        }

        self.state = SceneState::Built;
        log::info!("scene `{}` loaded: {} objects", self.name, self.registry.len());
        Ok(())
    }

    /// Build one more object into the scene, tracked.
    pub fn build(&mut self, description: &ObjectDescription) -> Result<Entity> {
        build_object(self, description, true)
    }

    fn reinitialize(&mut self, name: &str) {
        self.remove_all_children(self.root);
        // Entities unlisted by `remove_child` are unreachable from the root.
        let root = self.root;
        let stray: Vec<Entity> = self
            .tree
            .iter()
            .map(|(entity, _)| entity)
            .filter(|&entity| entity != root)
            .collect();
        if !stray.is_empty() {
            log::debug!("sweeping {} unlisted entities", stray.len());
        }
        for entity in stray {
            if self.tree.is_alive(entity) {
                self.destroy(entity);
            }
        }
        self.registry.clear();
        self.camera = None;
        self.name = name.to_string();
        if let Some(root) = self.tree.get_mut(self.root) {
            root.transform = Transform::IDENTITY;
            root.global = Transform::IDENTITY;
        }
    }

    // ── Frame ────────────────────────────────────────────────────────────

    /// Update every scene-level child, depth-first. The first failure stops
    /// the pass and comes back annotated with the path to the failing object.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        refresh_global_transform(&mut self.tree, self.root);
        let first_update = !self.finished_first_update;
        log::trace!("update frame {} (dt {dt})", self.globals.frame);

        for child in self.tree.children(self.root).to_vec() {
            if !self.tree.is_alive(child) {
                continue;
            }
            self.with_camera(|camera, scene| camera.apply(scene, child));
            let name = self.label(child);
            self.update_entity(child, dt, first_update)
                .map_err(|source| Error::Update {
                    name,
                    entity: child,
                    source: Box::new(source),
                })?;
        }

        self.finished_first_update = true;
        self.globals.frame += 1;
        self.globals.elapsed += f64::from(dt);
        self.globals.input.end_frame();
        if self.state == SceneState::Built {
            self.state = SceneState::Running;
            log::info!("scene `{}` running", self.name);
        }
        Ok(())
    }

    /// Draw every tracked object in registry order.
    pub fn draw(&mut self) {
        let debug = self.globals.debug;
        for object in self.registry.clone() {
            if !self.tree.is_alive(object) {
                log::trace!("skipping {object}, destroyed earlier in this draw pass");
                continue;
            }
            self.with_camera(|camera, scene| camera.set(scene, object));
            self.draw_object(object, debug);
            self.with_camera(|camera, _| camera.unset());
        }
    }

    /// Record `event` in the shared input state, then deliver it through the
    /// tree: each entity's components first, then its children.
    pub fn dispatch(&mut self, event: &Event) {
        log::trace!("dispatch {}", event.name());
        self.globals.input.apply(event);
        if let Event::Resize { width, height } = event {
            self.globals.window_size = Vec2::new(*width as f32, *height as f32);
        }
        self.dispatch_to(self.root, event);
    }

    /// Run `f` against the camera object's camera component, if any.
    fn with_camera(&mut self, f: impl FnOnce(&mut dyn CameraController, &Scene)) {
        let Some(camera) = self.camera else {
            return;
        };
        let mut f = Some(f);
        for slot in 0..self.slot_count(camera) {
            self.with_component(camera, slot, |component, ctx| {
                if let Some(controller) = component.as_camera() {
                    if let Some(f) = f.take() {
                        f(controller, ctx.scene());
                    }
                }
            });
            if f.is_none() {
                return;
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ScriptRegistry::new())
    }
}

fn default_camera() -> ObjectDescription {
    ObjectDescription::new("camera").with_component(ComponentDescription::new("camera"))
}
