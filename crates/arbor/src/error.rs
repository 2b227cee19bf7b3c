//! Runtime error types.
//!
//! Every configuration problem (bad arguments, unmet component dependencies,
//! malformed prefab references, unknown scripts, invalid reparenting) is fatal
//! to the operation that raised it and surfaces as an [`Error`]. Failures
//! inside the per-frame update are wrapped in [`Error::Update`] once per tree
//! level, so the error that reaches [`Scene::update`](crate::scene::Scene::update)
//! carries the path to the failing entity.

use crate::ecs::Entity;

/// Errors raised while building, wiring, or running a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A component was constructed without arguments it cannot work without.
    #[error("component `{component}` is missing required arguments: {}", .missing.join(", "))]
    MissingArguments {
        component: String,
        missing: Vec<String>,
    },

    /// An argument was present but had the wrong shape.
    #[error("component `{component}` has an invalid argument `{name}`: {reason}")]
    InvalidArgument {
        component: String,
        name: String,
        reason: String,
    },

    /// A component was attached before the components it works with.
    #[error(
        "component `{component}` on object `{object}` requires components that are not attached: {}",
        .missing.join(", ")
    )]
    MissingDependencies {
        component: String,
        object: String,
        missing: Vec<String>,
    },

    /// A filtered requirement could only be checked against a component whose
    /// own callback is running.
    #[error(
        "component `{component}` on object `{object}` cannot check `{busy}` while its callback is running"
    )]
    ComponentBusy {
        component: String,
        object: String,
        busy: String,
    },

    /// A prefab reference was empty.
    #[error("invalid prefab reference `{0}`")]
    InvalidPrefab(String),

    /// A prefab reference could not be resolved.
    #[error("unknown prefab `{0}`")]
    UnknownPrefab(String),

    /// A script identifier does not resolve to a registered component.
    #[error("script `{0}` does not resolve to a component")]
    UnknownScript(String),

    /// An entity was added as its own child.
    #[error("entity {0} cannot be its own child")]
    SelfParent(Entity),

    /// Adding the child would make the tree cyclic.
    #[error("entity {child} is an ancestor of {parent} and cannot become its child")]
    Cycle { parent: Entity, child: Entity },

    /// The handle refers to a destroyed (or never created) entity.
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),

    /// The operation needs an object (an entity carrying components).
    #[error("entity {0} is not an object")]
    NotAnObject(Entity),

    /// A scene description is missing required parts.
    #[error("invalid scene description: {0}")]
    InvalidScene(String),

    /// `load` was asked for the default scene but the settings name none.
    #[error("no scene given and the settings name no first scene")]
    NoStartScene,

    /// A named source could not be produced by the source loader.
    #[error("failed to load source `{id}`: {reason}")]
    Source { id: String, reason: String },

    /// A settings section could not be read as the expected shape.
    #[error("invalid settings section `{section}`: {source}")]
    Settings {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    /// A description could not be deserialized.
    #[error("malformed description: {0}")]
    Json(#[from] serde_json::Error),

    /// A component reported a failure from one of its callbacks.
    #[error("{component}: {message}")]
    Component { component: String, message: String },

    /// A failure inside the update of `entity`, annotated during traversal.
    #[error("update of `{name}` ({entity}) failed: {source}")]
    Update {
        name: String,
        entity: Entity,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Shorthand for component callbacks reporting their own failures.
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Follow the [`Error::Update`] chain down to the failure that started it.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Update { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Names of the entities an update failure passed through, outermost first.
    pub fn update_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Error::Update { name, source, .. } = current {
            path.push(name.as_str());
            current = source;
        }
        path
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
