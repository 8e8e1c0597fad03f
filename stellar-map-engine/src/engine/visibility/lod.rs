//! Distance-banded level of detail and the single writer of entity
//! `Visibility`. Subnodes degrade from full detail to a flat marker to
//! culled; halos and connectors simply cull past the far band.

use bevy::prelude::*;
use constants::render_settings::{LOD_FAR_DISTANCE, LOD_NEAR_DISTANCE};

use crate::engine::render::governor::RenderGovernor;
use crate::engine::scene::connectors::{ConnectorClass, ConnectorEndpoints, WeakConnectorToggle};
use crate::engine::scene::entities::{MapEntity, MapEntityKind, MaterialPool, SubnodeVisual};
use crate::engine::visibility::VisibilitySet;
use crate::interaction::hover::Hovered;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LodBand {
    #[default]
    Full,
    Reduced,
    Culled,
}

/// Band boundaries are inclusive on the cheap side: exactly NEAR is still
/// full detail, exactly FAR is already culled.
pub fn decide_lod(distance: f32) -> LodBand {
    if distance <= LOD_NEAR_DISTANCE {
        LodBand::Full
    } else if distance < LOD_FAR_DISTANCE {
        LodBand::Reduced
    } else {
        LodBand::Culled
    }
}

pub fn apply_lod(
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut entities: Query<(
        Entity,
        &MapEntity,
        &Transform,
        &mut LodBand,
        &mut Visibility,
    )>,
    mut subnode_materials: Query<(&SubnodeVisual, &mut MeshMaterial3d<StandardMaterial>)>,
    connector_info: Query<(&ConnectorClass, &ConnectorEndpoints)>,
    hovered: Query<(), With<Hovered>>,
    visible_set: Res<VisibilitySet>,
    weak_toggle: Res<WeakConnectorToggle>,
    pool: Res<MaterialPool>,
    mut governor: ResMut<RenderGovernor>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let camera_position = camera.translation();
    let mut changed = false;

    for (entity, map_entity, transform, mut band, mut visibility) in entities.iter_mut() {
        let distance = camera_position.distance(transform.translation);
        let next_band = decide_lod(distance);
        if band.set_if_neq(next_band) {
            changed = true;
        }

        let show = match map_entity.kind {
            MapEntityKind::Subnode => {
                visible_set.contains(&map_entity.source_id) && next_band != LodBand::Culled
            }
            MapEntityKind::Family | MapEntityKind::Constellation => next_band != LodBand::Culled,
            MapEntityKind::Connector => {
                let endpoints_visible = connector_info.get(entity).is_ok_and(|(class, ends)| {
                    let class_allowed = *class != ConnectorClass::Weak || weak_toggle.0;
                    let a_visible = ends.a.as_deref().is_none_or(|a| visible_set.contains(a));
                    class_allowed && a_visible && visible_set.contains(&ends.b)
                });
                endpoints_visible && next_band != LodBand::Culled
            }
        };
        let target = if show {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if visibility.set_if_neq(target) {
            changed = true;
        }

        // Hover owns the material while active; restore happens on unhover.
        if map_entity.kind == MapEntityKind::Subnode && !hovered.contains(entity) {
            if let Ok((visual, mut material)) = subnode_materials.get_mut(entity) {
                let desired = match next_band {
                    LodBand::Full => &pool.subnode[visual.difficulty.min(10) as usize],
                    LodBand::Reduced | LodBand::Culled => &pool.subnode_marker,
                };
                if material.0 != *desired {
                    material.0 = desired.clone();
                    changed = true;
                }
            }
        }
    }

    if changed {
        governor.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_boundary_is_full_detail() {
        assert_eq!(decide_lod(0.0), LodBand::Full);
        assert_eq!(decide_lod(LOD_NEAR_DISTANCE), LodBand::Full);
        assert_eq!(decide_lod(LOD_NEAR_DISTANCE + 0.01), LodBand::Reduced);
    }

    #[test]
    fn far_boundary_is_culled() {
        assert_eq!(decide_lod(LOD_FAR_DISTANCE - 0.01), LodBand::Reduced);
        assert_eq!(decide_lod(LOD_FAR_DISTANCE), LodBand::Culled);
        assert_eq!(decide_lod(f32::MAX), LodBand::Culled);
    }
}
