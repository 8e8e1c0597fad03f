//! Connector lines. Each constellation gets one strong line from the family
//! centre to its easiest subnode (the suggested entry point) and a web of
//! weak lines between neighbouring subnodes, capped at the k nearest per
//! node so dense constellations stay linear in line count.

use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use constants::render_settings::WEAK_LINKS_PER_NODE;
use std::collections::BTreeSet;

use crate::engine::assets::{ConstellationData, SubnodeData};
use crate::engine::scene::entities::{MapEntity, MapEntityKind, MaterialPool};
use crate::engine::scene::layout::MapLayout;
use crate::engine::visibility::lod::LodBand;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorClass {
    Strong,
    Weak,
}

/// Subnode ids a connector depends on; the line hides whenever a named
/// endpoint is outside the visibility set. `a` is `None` for strong lines,
/// which start at the family centre.
#[derive(Component, Debug, Clone)]
pub struct ConnectorEndpoints {
    pub a: Option<String>,
    pub b: String,
}

/// Whether weak intra-constellation lines render at all. Flipped at runtime
/// by the keyboard toggle.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WeakConnectorToggle(pub bool);

impl Default for WeakConnectorToggle {
    fn default() -> Self {
        Self(true)
    }
}

/// W flips the weak-line web on and off.
pub fn toggle_weak_connectors(
    keys: Res<ButtonInput<KeyCode>>,
    mut toggle: ResMut<WeakConnectorToggle>,
    mut governor: ResMut<crate::engine::render::governor::RenderGovernor>,
) {
    if keys.just_pressed(KeyCode::KeyW) {
        toggle.0 = !toggle.0;
        governor.invalidate();
    }
}

/// Lowest difficulty wins; ties break on document order.
pub fn easiest_subnode(constellation: &ConstellationData) -> Option<&SubnodeData> {
    constellation
        .subnodes
        .iter()
        .min_by_key(|node| node.difficulty)
}

/// Undirected nearest-k pairs over a point set. Each index contributes at
/// most `k` candidate edges, deduplicated as (low, high), so the result is
/// bounded by `n * k` rather than the all-pairs square.
pub fn weak_link_pairs(positions: &[Vec3], k: usize) -> Vec<(usize, usize)> {
    let mut pairs = BTreeSet::new();
    for i in 0..positions.len() {
        let mut neighbours: Vec<(usize, f32)> = positions
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, p)| (j, positions[i].distance_squared(*p)))
            .collect();
        neighbours.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (j, _) in neighbours.into_iter().take(k) {
            pairs.insert((i.min(j), i.max(j)));
        }
    }
    pairs.into_iter().collect()
}

/// Line-list mesh with endpoints relative to the segment midpoint; the
/// entity's transform sits at the midpoint so distance culling has a
/// meaningful anchor.
fn line_mesh(a: Vec3, b: Vec3) -> (Mesh, Vec3) {
    let midpoint = (a + b) * 0.5;
    let (a, b) = (a - midpoint, b - midpoint);
    let mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[a.x, a.y, a.z], [b.x, b.y, b.z]],
        );
    (mesh, midpoint)
}

pub fn spawn_constellation_connectors(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    pool: &MaterialPool,
    family_center: Vec3,
    constellation_id: &str,
    constellation: &ConstellationData,
    layout: &MapLayout,
) {
    if let Some(entry) = easiest_subnode(constellation) {
        if let Some(&target) = layout.subnodes.get(&entry.id) {
            let (mesh, midpoint) = line_mesh(family_center, target);
            commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(pool.strong_connector.clone()),
                Transform::from_translation(midpoint),
                MapEntity {
                    kind: MapEntityKind::Connector,
                    source_id: format!("{constellation_id}->{}", entry.id),
                    parent_id: Some(constellation_id.to_string()),
                },
                ConnectorClass::Strong,
                ConnectorEndpoints {
                    a: None,
                    b: entry.id.clone(),
                },
                LodBand::default(),
            ));
        }
    }

    let placed: Vec<(&str, Vec3)> = constellation
        .subnodes
        .iter()
        .filter_map(|node| {
            layout
                .subnodes
                .get(&node.id)
                .map(|&pos| (node.id.as_str(), pos))
        })
        .collect();
    let positions: Vec<Vec3> = placed.iter().map(|(_, pos)| *pos).collect();
    for (i, j) in weak_link_pairs(&positions, WEAK_LINKS_PER_NODE) {
        let (a, b) = (placed[i].0, placed[j].0);
        let (mesh, midpoint) = line_mesh(positions[i], positions[j]);
        commands.spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(pool.weak_connector.clone()),
            Transform::from_translation(midpoint),
            MapEntity {
                kind: MapEntityKind::Connector,
                source_id: format!("{a}<->{b}"),
                parent_id: Some(constellation_id.to_string()),
            },
            ConnectorClass::Weak,
            ConnectorEndpoints {
                a: Some(a.to_string()),
                b: b.to_string(),
            },
            LodBand::default(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, difficulty: u8) -> SubnodeData {
        SubnodeData {
            id: id.into(),
            title: id.into(),
            link: None,
            difficulty,
            difficulty_label: String::new(),
        }
    }

    #[test]
    fn easiest_subnode_prefers_low_difficulty_then_order() {
        let constellation = ConstellationData {
            name: "c".into(),
            subnodes: vec![node("x", 4), node("y", 1), node("z", 1)],
        };
        assert_eq!(easiest_subnode(&constellation).unwrap().id, "y");
    }

    #[test]
    fn weak_links_are_capped_per_node() {
        let positions: Vec<Vec3> = (0..40)
            .map(|i| Vec3::new((i % 7) as f32, (i / 7) as f32, (i % 3) as f32))
            .collect();
        let pairs = weak_link_pairs(&positions, 3);
        assert!(pairs.len() <= positions.len() * 3);
        for &(i, j) in &pairs {
            assert!(i < j);
        }
    }

    #[test]
    fn weak_links_empty_for_single_node() {
        assert!(weak_link_pairs(&[Vec3::ZERO], 3).is_empty());
    }

    #[test]
    fn weak_links_connect_obvious_neighbours() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
        ];
        let pairs = weak_link_pairs(&positions, 1);
        assert!(pairs.contains(&(0, 1)));
    }
}
