//! Scene entity factory. Consumes a decoded hierarchy snapshot plus the
//! computed layout and spawns the full entity set: family halos,
//! constellation halos, subnode spheres and connector lines. Materials come
//! from a pooled table built once at startup so entities share handles
//! instead of allocating per spawn.

use bevy::prelude::*;
use constants::difficulty::{srgb_from_hex, style_for, DIFFICULTY_STYLES};
use constants::palette::{constellation_halo_color, family_halo_color};

use crate::engine::assets::{ActiveHierarchy, MapRebuildRequest};
use crate::engine::render::governor::RenderGovernor;
use crate::engine::scene::connectors;
use crate::engine::scene::layout::{compute_layout, constellation_key};
use crate::engine::visibility::lod::LodBand;
use crate::interaction::hover::InteractionState;

/// Marker carried by every spawned map entity. Teardown queries on this
/// component alone, so nothing the factory spawns can leak across rebuilds.
#[derive(Component, Debug, Clone)]
pub struct MapEntity {
    pub kind: MapEntityKind,
    pub source_id: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEntityKind {
    Family,
    Constellation,
    Subnode,
    Connector,
}

/// Presentation payload attached to subnode spheres; everything the
/// interaction layer needs without going back to the snapshot.
#[derive(Component, Debug, Clone)]
pub struct SubnodeVisual {
    pub id: String,
    pub title: String,
    pub link: Option<String>,
    pub difficulty: u8,
    pub difficulty_label: String,
    pub family: String,
    pub constellation: String,
    pub base_radius: f32,
}

/// Shared material handles, one per difficulty level plus hover variants
/// and the halo/connector tints.
#[derive(Resource)]
pub struct MaterialPool {
    pub subnode: Vec<Handle<StandardMaterial>>,
    pub subnode_hover: Vec<Handle<StandardMaterial>>,
    pub subnode_marker: Handle<StandardMaterial>,
    pub family_halo: Vec<Handle<StandardMaterial>>,
    pub constellation_halo: Vec<Handle<StandardMaterial>>,
    pub strong_connector: Handle<StandardMaterial>,
    pub weak_connector: Handle<StandardMaterial>,
}

/// Shared unit-radius sphere; entities scale it instead of holding their
/// own mesh.
#[derive(Resource)]
pub struct ScenePrimitives {
    pub unit_sphere: Handle<Mesh>,
}

pub fn init_scene_pools(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let subnode = DIFFICULTY_STYLES
        .iter()
        .map(|style| {
            let color = srgb_from_hex(style.color);
            materials.add(StandardMaterial {
                base_color: color.with_alpha(0.9),
                emissive: color.to_linear() * 0.35,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })
        })
        .collect();
    let subnode_hover = DIFFICULTY_STYLES
        .iter()
        .map(|style| {
            let color = srgb_from_hex(style.color);
            materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * 0.8,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })
        })
        .collect();
    let subnode_marker = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.5, 0.6).with_alpha(0.5),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let halo = |color: Color, materials: &mut Assets<StandardMaterial>| {
        materials.add(StandardMaterial {
            base_color: color.with_alpha(0.08),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            cull_mode: None,
            ..default()
        })
    };
    let family_halo = (0..8)
        .map(|i| halo(family_halo_color(i), &mut materials))
        .collect();
    let constellation_halo = (0..8)
        .map(|i| halo(constellation_halo_color(i), &mut materials))
        .collect();

    let strong_connector = materials.add(StandardMaterial {
        base_color: srgb_from_hex(0xFFD700).with_alpha(0.8),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let weak_connector = materials.add(StandardMaterial {
        base_color: Color::WHITE.with_alpha(0.25),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    commands.insert_resource(MaterialPool {
        subnode,
        subnode_hover,
        subnode_marker,
        family_halo,
        constellation_halo,
        strong_connector,
        weak_connector,
    });
    commands.insert_resource(ScenePrimitives {
        unit_sphere: meshes.add(Sphere::new(1.0)),
    });
}

/// Despawn every map entity. Idempotent: `try_despawn` tolerates entities
/// already gone, so calling this on an empty or half-torn scene is a no-op.
pub fn despawn_map_entities(commands: &mut Commands, existing: &Query<Entity, With<MapEntity>>) {
    for entity in existing.iter() {
        commands.entity(entity).try_despawn();
    }
}

pub fn spawn_stellar_map(
    mut commands: Commands,
    mut rebuilds: EventReader<MapRebuildRequest>,
    hierarchy: Option<Res<ActiveHierarchy>>,
    pool: Res<MaterialPool>,
    primitives: Res<ScenePrimitives>,
    mut meshes: ResMut<Assets<Mesh>>,
    existing: Query<Entity, With<MapEntity>>,
    mut interaction: ResMut<InteractionState>,
    mut governor: ResMut<RenderGovernor>,
) {
    if rebuilds.is_empty() {
        return;
    }
    rebuilds.clear();
    let Some(hierarchy) = hierarchy else {
        return;
    };
    let snapshot = &hierarchy.0;

    despawn_map_entities(&mut commands, &existing);
    // Hover and selection refer to entities that no longer exist.
    *interaction = InteractionState::default();
    let layout = compute_layout(snapshot);

    for (family_index, family) in snapshot.families.iter().enumerate() {
        let Some(family_placement) = layout.families.get(&family.name) else {
            continue;
        };
        commands.spawn((
            Mesh3d(primitives.unit_sphere.clone()),
            MeshMaterial3d(pool.family_halo[family_index % pool.family_halo.len()].clone()),
            Transform::from_translation(family_placement.center)
                .with_scale(Vec3::splat(family_placement.radius)),
            MapEntity {
                kind: MapEntityKind::Family,
                source_id: family.name.clone(),
                parent_id: None,
            },
            LodBand::default(),
        ));

        for (const_index, constellation) in family.constellations.iter().enumerate() {
            let key = constellation_key(&family.name, &constellation.name);
            let Some(placement) = layout.constellations.get(&key) else {
                continue;
            };
            commands.spawn((
                Mesh3d(primitives.unit_sphere.clone()),
                MeshMaterial3d(
                    pool.constellation_halo[const_index % pool.constellation_halo.len()].clone(),
                ),
                Transform::from_translation(placement.center)
                    .with_scale(Vec3::splat(placement.radius)),
                MapEntity {
                    kind: MapEntityKind::Constellation,
                    source_id: key.clone(),
                    parent_id: Some(family.name.clone()),
                },
                LodBand::default(),
            ));

            for node in &constellation.subnodes {
                let Some(&position) = layout.subnodes.get(&node.id) else {
                    continue;
                };
                if !position.is_finite() {
                    warn!("skipping subnode '{}': non-finite position", node.id);
                    continue;
                }
                let style = style_for(node.difficulty);
                commands.spawn((
                    Mesh3d(primitives.unit_sphere.clone()),
                    MeshMaterial3d(pool.subnode[style.difficulty as usize].clone()),
                    Transform::from_translation(position).with_scale(Vec3::splat(style.radius)),
                    MapEntity {
                        kind: MapEntityKind::Subnode,
                        source_id: node.id.clone(),
                        parent_id: Some(key.clone()),
                    },
                    SubnodeVisual {
                        id: node.id.clone(),
                        title: node.title.clone(),
                        link: node.link.clone(),
                        difficulty: node.difficulty,
                        difficulty_label: node.difficulty_label.clone(),
                        family: family.name.clone(),
                        constellation: key.clone(),
                        base_radius: style.radius,
                    },
                    LodBand::default(),
                ));
            }

            connectors::spawn_constellation_connectors(
                &mut commands,
                &mut meshes,
                &pool,
                family_placement.center,
                &key,
                constellation,
                &layout,
            );
        }
    }

    commands.insert_resource(layout);
    governor.invalidate();
    info!("stellar map rebuilt: {} subnodes", snapshot.subnode_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{ConstellationData, FamilyData, HierarchySnapshot, SubnodeData};
    use bevy::ecs::system::RunSystemOnce;

    fn small_snapshot() -> HierarchySnapshot {
        HierarchySnapshot {
            core_name: "Ignition".into(),
            families: vec![FamilyData {
                name: "Energy Architects".into(),
                constellations: vec![ConstellationData {
                    name: "Grid Foundations".into(),
                    subnodes: vec![SubnodeData {
                        id: "grid-basics".into(),
                        title: "Grid Basics".into(),
                        link: None,
                        difficulty: 0,
                        difficulty_label: "Novice".into(),
                    }],
                }],
            }],
        }
    }

    fn test_pool(materials: &mut Assets<StandardMaterial>) -> MaterialPool {
        let mut add = |_: usize| materials.add(StandardMaterial::default());
        MaterialPool {
            subnode: (0..11).map(&mut add).collect(),
            subnode_hover: (0..11).map(&mut add).collect(),
            subnode_marker: add(0),
            family_halo: (0..8).map(&mut add).collect(),
            constellation_halo: (0..8).map(&mut add).collect(),
            strong_connector: add(0),
            weak_connector: add(0),
        }
    }

    #[test]
    fn rebuild_clears_stale_interaction_state() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.init_resource::<Events<MapRebuildRequest>>();
        world.init_resource::<RenderGovernor>();
        let pool = {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            test_pool(&mut materials)
        };
        world.insert_resource(pool);
        let sphere = world.resource_mut::<Assets<Mesh>>().add(Sphere::new(1.0));
        world.insert_resource(ScenePrimitives { unit_sphere: sphere });
        world.insert_resource(ActiveHierarchy(small_snapshot()));
        world.insert_resource(InteractionState {
            hovered: Some("ghost".into()),
            selected: Some("ghost".into()),
            pointer_position: None,
        });

        world
            .resource_mut::<Events<MapRebuildRequest>>()
            .send(MapRebuildRequest);
        world.run_system_once(spawn_stellar_map).unwrap();

        let state = world.resource::<InteractionState>();
        assert!(state.hovered.is_none());
        assert!(state.selected.is_none());
        let mut query = world.query::<&MapEntity>();
        assert!(query.iter(&world).count() > 0);
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut world = World::new();
        world.spawn(MapEntity {
            kind: MapEntityKind::Subnode,
            source_id: "a".into(),
            parent_id: None,
        });
        world.spawn(MapEntity {
            kind: MapEntityKind::Connector,
            source_id: "a->b".into(),
            parent_id: None,
        });

        let clear = |mut commands: Commands, existing: Query<Entity, With<MapEntity>>| {
            despawn_map_entities(&mut commands, &existing);
        };
        world.run_system_once(clear).unwrap();
        let mut query = world.query::<&MapEntity>();
        assert_eq!(query.iter(&world).count(), 0);

        // Second pass over an already empty scene must not panic.
        world.run_system_once(clear).unwrap();
        let mut query = world.query::<&MapEntity>();
        assert_eq!(query.iter(&world).count(), 0);
    }
}
