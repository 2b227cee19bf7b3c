//! # Builder — Descriptions to Live Objects
//!
//! [`build_object`] instantiates one [`ObjectDescription`] (and its nested
//! children) into a scene:
//!
//! ```text
//! 1. resolve components   explicit components ++ prefab components (overrides merged)
//! 2. create the object    tracked or not
//! 3. attach components    in order, skipping debug-only ones outside debug mode
//! 4. build children       recursively, tracked, then reparented under the object
//! ```
//!
//! Any failure stops the build. Objects and components built before the
//! failure stay in the scene; a scene whose load failed should be discarded.

use crate::description::{ComponentDescription, ObjectDescription};
use crate::ecs::Entity;
use crate::error::Result;
use crate::scene::Scene;

/// Build `description` into `scene` and return the new object.
pub fn build_object(scene: &mut Scene, description: &ObjectDescription, track: bool) -> Result<Entity> {
    let debug = scene.is_debug();
    let components = resolve_components(scene, description)?;
    let object = scene.create_object(&description.name, description.transform, track);

    for component in &components {
        if component.is_debug && !debug {
            log::debug!(
                "skipping debug-only component `{}` on `{}`",
                component.script,
                description.name
            );
            continue;
        }
        let built = scene.scripts.create(&component.script, &component.arguments)?;
        scene.add_component(object, built)?;
    }

    for child in &description.children {
        if child.is_debug && !debug {
            log::debug!("skipping debug-only child `{}` of `{}`", child.name, description.name);
            continue;
        }
        let child = build_object(scene, child, true)?;
        scene.add_child(object, child)?;
    }

    log::debug!("built `{}` with {} components", description.name, components.len());
    Ok(object)
}

/// The final component list of `description`: its explicit components, then
/// deep copies of its prefab's components with `prefabComponents` overrides
/// merged in by script identifier.
pub fn resolve_components(scene: &mut Scene, description: &ObjectDescription) -> Result<Vec<ComponentDescription>> {
    let mut components = description.components.clone();
    let Some(prefab) = &description.prefab else {
        if !description.prefab_components.is_empty() {
            log::warn!("`{}` overrides prefab components but names no prefab", description.name);
        }
        return Ok(components);
    };

    let template = scene.prefabs.resolve(prefab, scene.sources.as_ref())?;
    let mut expanded = template.components.clone();
    for overriding in &description.prefab_components {
        let mut matched = false;
        for component in expanded.iter_mut().filter(|c| c.script == overriding.script) {
            component.arguments.merge(&overriding.arguments);
            matched = true;
        }
        if !matched {
            log::warn!(
                "override for `{}` on `{}` matches no component of prefab `{prefab}`",
                overriding.script,
                description.name
            );
        }
    }
    log::debug!("expanded prefab `{prefab}` into {} components for `{}`", expanded.len(), description.name);
    components.extend(expanded);
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{PrefabDescription, Prefabs};
    use crate::ecs::Arguments;
    use crate::error::Error;
    use crate::math::{Transform, Vec2};
    use crate::source::MemorySource;
    use crate::testing::{Body, Log, Shooter, scripts};
    use serde_json::json;

    fn ship_prefab() -> PrefabDescription {
        PrefabDescription {
            components: vec![
                ComponentDescription::new("body").with_argument("speed", 100).with_argument("drag", 2),
                ComponentDescription::new("shooter").with_argument("rate", 3),
            ],
        }
    }

    fn scene(log: &Log) -> Scene {
        Scene::new(scripts(log)).with_prefabs(Prefabs::new().with("ship", ship_prefab()))
    }

    #[test]
    fn overrides_merge_into_matching_prefab_components() {
        let log = Log::default();
        let mut scene = scene(&log);
        let description = ObjectDescription::new("player")
            .with_prefab("ship")
            .with_override(ComponentDescription::new("body").with_argument("speed", 200));

        let components = resolve_components(&mut scene, &description).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(
            components[0].arguments,
            Arguments::new().with("speed", 200).with("drag", 2)
        );
        assert_eq!(components[1].arguments, Arguments::new().with("rate", 3));

        // The template itself is untouched.
        let template = scene.prefabs.get("ship").unwrap();
        assert_eq!(template.components[0].arguments.value("speed"), Some(&json!(100)));
    }

    #[test]
    fn explicit_components_come_before_prefab_components() {
        let log = Log::default();
        let mut scene = scene(&log);
        let description = ObjectDescription::new("player")
            .with_prefab("ship")
            .with_component(ComponentDescription::new("recorder").with_argument("label", "hud"));
        let scripts: Vec<String> = resolve_components(&mut scene, &description)
            .unwrap()
            .into_iter()
            .map(|c| c.script)
            .collect();
        assert_eq!(scripts, vec!["recorder", "body", "shooter"]);
    }

    #[test]
    fn built_object_binds_prefab_dependencies() {
        let log = Log::default();
        let mut scene = scene(&log);
        let description = ObjectDescription::new("player")
            .with_transform(Transform::from_xy(5.0, 5.0))
            .with_prefab("ship")
            .with_override(ComponentDescription::new("body").with_argument("speed", 250));

        let player = build_object(&mut scene, &description, true).unwrap();
        assert_eq!(scene.name_of(player), Some("player"));
        assert_eq!(scene.transform(player).unwrap().position, Vec2::new(5.0, 5.0));
        assert_eq!(scene.component::<Body>(player).unwrap().speed, 250.0);
        let shooter = scene.component::<Shooter>(player).unwrap();
        assert_eq!(shooter.body_speed_at_awake, Some(250.0));
        assert_eq!(shooter.rate, 3.0);
    }

    #[test]
    fn instances_do_not_share_arguments() {
        let log = Log::default();
        let mut scene = scene(&log);
        let plain = ObjectDescription::new("a").with_prefab("ship");
        let fast = ObjectDescription::new("b")
            .with_prefab("ship")
            .with_override(ComponentDescription::new("body").with_argument("speed", 999));
        let a = build_object(&mut scene, &plain, true).unwrap();
        let b = build_object(&mut scene, &fast, true).unwrap();
        let c = build_object(&mut scene, &plain, true).unwrap();
        assert_eq!(scene.component::<Body>(a).unwrap().speed, 100.0);
        assert_eq!(scene.component::<Body>(b).unwrap().speed, 999.0);
        assert_eq!(scene.component::<Body>(c).unwrap().speed, 100.0);
    }

    #[test]
    fn children_are_built_tracked_and_parented() {
        let log = Log::default();
        let mut scene = scene(&log);
        let description = ObjectDescription::new("ship")
            .with_child(ObjectDescription::new("turret").with_transform(Transform::from_xy(1.0, 0.0)))
            .with_child(ObjectDescription::new("shield").debug_only());

        let ship = build_object(&mut scene, &description, true).unwrap();
        let children = scene.tree().children(ship).to_vec();
        assert_eq!(children.len(), 1);
        let turret = children[0];
        assert_eq!(scene.name_of(turret), Some("turret"));
        assert_eq!(scene.tree().parent(turret), Some(ship));
        assert_eq!(scene.objects(), &[ship, turret]);
        assert!(!scene.tree().children(scene.root()).contains(&turret));
    }

    #[test]
    fn debug_only_entries_are_built_in_debug_mode() {
        let log = Log::default();
        let mut scene = scene(&log);
        scene.set_debug(true);
        let description = ObjectDescription::new("ship")
            .with_component(ComponentDescription::new("recorder").with_argument("label", "overlay").debug_only())
            .with_child(ObjectDescription::new("shield").debug_only());
        let ship = build_object(&mut scene, &description, true).unwrap();
        assert_eq!(scene.object(ship).unwrap().len(), 1);
        assert_eq!(scene.tree().children(ship).len(), 1);
    }

    #[test]
    fn debug_only_components_are_skipped_outside_debug_mode() {
        let log = Log::default();
        let mut scene = scene(&log).with_prefabs(Prefabs::new().with(
            "gizmo-ship",
            PrefabDescription {
                components: vec![
                    ComponentDescription::new("body").with_argument("speed", 1),
                    ComponentDescription::new("recorder").with_argument("label", "gizmo").debug_only(),
                ],
            },
        ));
        assert!(!scene.is_debug());
        let description = ObjectDescription::new("ship")
            .with_component(ComponentDescription::new("recorder").with_argument("label", "overlay").debug_only())
            .with_prefab("gizmo-ship");

        let ship = build_object(&mut scene, &description, true).unwrap();
        let data = scene.object(ship).unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.component::<Body>().is_some());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn configuration_errors_stop_the_build() {
        let log = Log::default();
        let mut scene = scene(&log);

        let unknown = ObjectDescription::new("x").with_component(ComponentDescription::new("laser"));
        assert!(matches!(build_object(&mut scene, &unknown, true), Err(Error::UnknownScript(_))));

        let empty_prefab = ObjectDescription::new("y").with_prefab("");
        assert!(matches!(build_object(&mut scene, &empty_prefab, true), Err(Error::InvalidPrefab(_))));

        let missing_prefab = ObjectDescription::new("z").with_prefab("ufo");
        assert!(matches!(build_object(&mut scene, &missing_prefab, true), Err(Error::UnknownPrefab(_))));

        // Shooter listed before the body it needs.
        let misordered = ObjectDescription::new("w")
            .with_component(ComponentDescription::new("shooter"))
            .with_component(ComponentDescription::new("body"));
        assert!(matches!(
            build_object(&mut scene, &misordered, true),
            Err(Error::MissingDependencies { .. })
        ));
    }

    #[test]
    fn prefabs_fall_back_to_the_source_loader() {
        let log = Log::default();
        let sources = MemorySource::new().with(
            "rock",
            json!({ "components": [{ "script": "body", "arguments": { "speed": 4 } }] }),
        );
        let mut scene = Scene::new(scripts(&log)).with_sources(sources);
        let rock = build_object(&mut scene, &ObjectDescription::new("rock").with_prefab("rock"), true).unwrap();
        assert_eq!(scene.component::<Body>(rock).unwrap().speed, 4.0);
    }
}
