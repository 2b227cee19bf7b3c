//! Scene snapshots for tooling.
//!
//! Enabled by the `diagnostics` feature flag. [`Scene::snapshot`] captures the
//! live tree as plain serializable data, which tools dump as JSON to inspect
//! a running scene or to diff two frames.

use serde::Serialize;

use crate::ecs::hierarchy::compute_global_transform;
use crate::ecs::Entity;
use crate::math::Transform;
use crate::scene::{Scene, SceneState};

// ── Snapshot types (wire format) ────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub name: String,
    pub state: String,
    pub frame: u64,
    pub debug: bool,
    pub registry: Vec<String>,
    pub camera: Option<String>,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub tracked: bool,
    pub components: Vec<String>,
    pub global: Transform,
}

fn id(entity: Entity) -> String {
    entity.to_string()
}

impl Scene {
    /// Capture every live node in tree order (depth-first from the root).
    pub fn snapshot(&self) -> SceneSnapshot {
        let root = self.root();
        let mut order = vec![root];
        order.extend(self.tree().descendants(root));

        let nodes = order
            .into_iter()
            .filter_map(|entity| {
                let node = self.tree().get(entity)?;
                let object = node.object();
                Some(NodeSnapshot {
                    id: id(entity),
                    name: self.name_of(entity).map(str::to_string),
                    parent: node.parent().map(id),
                    children: node.children().iter().copied().map(id).collect(),
                    tracked: object.is_some_and(|o| o.is_tracked()),
                    components: object
                        .map(|o| o.components().map(|c| c.type_name().to_string()).collect())
                        .unwrap_or_default(),
                    global: compute_global_transform(self.tree(), entity).unwrap_or(*node.transform()),
                })
            })
            .collect();

        SceneSnapshot {
            name: self.name().to_string(),
            state: state_name(self.state()).to_string(),
            frame: self.globals().frame(),
            debug: self.is_debug(),
            registry: self.objects().iter().copied().map(id).collect(),
            camera: self.camera().map(id),
            nodes,
        }
    }
}

fn state_name(state: SceneState) -> &'static str {
    match state {
        SceneState::Uninitialized => "uninitialized",
        SceneState::SettingsLoaded => "settings-loaded",
        SceneState::Built => "built",
        SceneState::Running => "running",
    }
}
