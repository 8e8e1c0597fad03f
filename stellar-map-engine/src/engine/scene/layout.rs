//! Deterministic nested-sphere layout. Families orbit the core on a golden
//! angle spiral, constellations sit inside their family sphere, and subnodes
//! fill their constellation on the thirteen-point cube with a golden-angle
//! overflow shell. Pure functions over the snapshot, no ECS access.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use constants::difficulty::style_for;
use constants::layout::{
    CONST_MARGIN, CONST_RADIUS_BASE, CONST_RADIUS_SCALE, FAMILY_PLACEMENT_SCALE,
    FAMILY_RADIUS_BASE, FAMILY_RADIUS_SCALE, METATRON_CUBE, SUBNODE_SHELL_MARGIN,
};

use crate::engine::assets::HierarchySnapshot;

const GOLDEN_ANGLE: f32 = std::f32::consts::PI * 0.763_932;

/// Placement record for a sphere-shaped map entity.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub center: Vec3,
    pub radius: f32,
}

/// Computed positions for one snapshot. Constellation keys are qualified as
/// `family::constellation` since constellation names are only unique within
/// their family; subnode ids are globally unique already.
#[derive(Resource, Debug, Clone, Default)]
pub struct MapLayout {
    pub families: HashMap<String, Placement>,
    pub constellations: HashMap<String, Placement>,
    pub subnodes: HashMap<String, Vec3>,
}

pub fn constellation_key(family: &str, constellation: &str) -> String {
    format!("{family}::{constellation}")
}

/// Unit direction for slot `index` of `total` slots, evenly spread over the
/// sphere by the golden-angle spiral.
pub fn spread_direction(index: usize, total: usize) -> Vec3 {
    let total = total.max(1);
    let y = 1.0 - 2.0 * (index as f32 + 0.5) / total as f32;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * index as f32;
    Vec3::new(theta.cos() * ring, y, theta.sin() * ring)
}

pub fn family_radius(subnode_count: usize) -> f32 {
    FAMILY_RADIUS_BASE + FAMILY_RADIUS_SCALE * (subnode_count as f32).sqrt()
}

pub fn constellation_radius(subnode_count: usize) -> f32 {
    CONST_RADIUS_BASE + CONST_RADIUS_SCALE * (subnode_count as f32).sqrt()
}

/// Distance from the family centre at which a constellation sphere fits
/// entirely inside the family sphere with clearance.
pub fn constellation_orbit(family_radius: f32, constellation_radius: f32) -> f32 {
    (family_radius - constellation_radius - CONST_MARGIN).max(0.0)
}

/// Distance from the core at which families are placed. Derived from the
/// largest family sphere so siblings cannot overlap, then pulled inward.
pub fn family_orbit(max_family_radius: f32, family_count: usize) -> f32 {
    let raw = max_family_radius * family_count as f32 * 0.5;
    let raw = if raw > 0.0 { raw } else { 1.0 };
    raw * FAMILY_PLACEMENT_SCALE
}

/// Position of subnode `index` inside a constellation. The first thirteen
/// slots take the cube vertices; later slots fall back to an evenly spread
/// shell so overcrowded constellations stay readable.
pub fn subnode_offset(index: usize, total: usize, shell_radius: f32) -> Vec3 {
    if index < METATRON_CUBE.len() {
        METATRON_CUBE[index] * shell_radius
    } else {
        let overflow_total = total.saturating_sub(METATRON_CUBE.len()).max(1);
        spread_direction(index - METATRON_CUBE.len(), overflow_total) * shell_radius
    }
}

pub fn compute_layout(snapshot: &HierarchySnapshot) -> MapLayout {
    let mut layout = MapLayout::default();

    let family_radii: Vec<f32> = snapshot
        .families
        .iter()
        .map(|f| {
            let count = f
                .constellations
                .iter()
                .map(|c| c.subnodes.len())
                .sum::<usize>();
            family_radius(count)
        })
        .collect();
    let max_radius = family_radii.iter().copied().fold(0.0_f32, f32::max);
    let orbit = family_orbit(max_radius, snapshot.families.len());

    for (family_index, family) in snapshot.families.iter().enumerate() {
        let family_center = spread_direction(family_index, snapshot.families.len()) * orbit;
        let family_r = family_radii[family_index];
        layout.families.insert(
            family.name.clone(),
            Placement {
                center: family_center,
                radius: family_r,
            },
        );

        for (const_index, constellation) in family.constellations.iter().enumerate() {
            let const_r = constellation_radius(constellation.subnodes.len());
            let const_center = family_center
                + spread_direction(const_index, family.constellations.len())
                    * constellation_orbit(family_r, const_r);
            layout.constellations.insert(
                constellation_key(&family.name, &constellation.name),
                Placement {
                    center: const_center,
                    radius: const_r,
                },
            );

            for (node_index, node) in constellation.subnodes.iter().enumerate() {
                let node_r = style_for(node.difficulty).radius;
                let shell = (const_r - node_r - SUBNODE_SHELL_MARGIN).max(0.0);
                let position = const_center
                    + subnode_offset(node_index, constellation.subnodes.len(), shell);
                layout.subnodes.insert(node.id.clone(), position);
            }
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{ConstellationData, FamilyData, SubnodeData};

    fn node(id: &str, difficulty: u8) -> SubnodeData {
        SubnodeData {
            id: id.into(),
            title: id.into(),
            link: None,
            difficulty,
            difficulty_label: String::new(),
        }
    }

    fn snapshot() -> HierarchySnapshot {
        HierarchySnapshot {
            core_name: "Ignition".into(),
            families: vec![
                FamilyData {
                    name: "Energy Architects".into(),
                    constellations: vec![ConstellationData {
                        name: "Grid Foundations".into(),
                        subnodes: vec![node("a", 0), node("b", 3), node("c", 7)],
                    }],
                },
                FamilyData {
                    name: "Wheel Harmonizers".into(),
                    constellations: vec![ConstellationData {
                        name: "Rotational Dynamics".into(),
                        subnodes: (0..16).map(|i| node(&format!("w{i}"), 5)).collect(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let snap = snapshot();
        let first = compute_layout(&snap);
        let second = compute_layout(&snap);
        for (id, pos) in &first.subnodes {
            assert_eq!(*pos, second.subnodes[id]);
        }
    }

    #[test]
    fn spread_directions_are_unit_length() {
        for total in [1, 2, 13, 50] {
            for index in 0..total {
                let dir = spread_direction(index, total);
                assert!((dir.length() - 1.0).abs() < 1e-4, "{index}/{total}");
            }
        }
    }

    #[test]
    fn subnodes_stay_inside_their_constellation() {
        let layout = compute_layout(&snapshot());
        let snap = snapshot();
        for family in &snap.families {
            for constellation in &family.constellations {
                let key = constellation_key(&family.name, &constellation.name);
                let placement = layout.constellations[&key];
                for node in &constellation.subnodes {
                    let dist = (layout.subnodes[&node.id] - placement.center).length();
                    let node_r = style_for(node.difficulty).radius;
                    assert!(
                        dist + node_r <= placement.radius + 1e-3,
                        "{} escapes {}",
                        node.id,
                        key
                    );
                }
            }
        }
    }

    #[test]
    fn constellations_stay_inside_their_family() {
        let layout = compute_layout(&snapshot());
        let snap = snapshot();
        for family in &snap.families {
            let family_placement = layout.families[&family.name];
            for constellation in &family.constellations {
                let key = constellation_key(&family.name, &constellation.name);
                let placement = layout.constellations[&key];
                let dist = (placement.center - family_placement.center).length();
                assert!(dist + placement.radius <= family_placement.radius + 1e-3);
            }
        }
    }

    #[test]
    fn overflow_slots_fall_back_to_shell() {
        let offset = subnode_offset(14, 16, 3.0);
        assert!((offset.length() - 3.0).abs() < 1e-3);
    }
}
