//! Hover tracking. At most one subnode is hovered; hand-off restores the
//! previous node's pooled material and base scale before the next one is
//! boosted, so a missed frame can never leave two nodes lit.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::HOVER_SCALE;

use crate::engine::render::governor::RenderGovernor;
use crate::engine::scene::entities::{MaterialPool, SubnodeVisual};
use crate::engine::visibility::lod::LodBand;
use crate::engine::visibility::VisibilitySet;
use crate::interaction::ray::nearest_sphere_hit;

/// Current hover, selection and pointer position, mirrored for the host UI.
#[derive(Resource, Debug, Clone, Default)]
pub struct InteractionState {
    pub hovered: Option<String>,
    pub selected: Option<String>,
    pub pointer_position: Option<Vec2>,
}

#[derive(Component)]
pub struct Hovered;

/// Cursor pick ray in world space, if the cursor is over the window.
pub(crate) fn cursor_ray(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<(Vec3, Vec3)> {
    let cursor = window.cursor_position()?;
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    Some((ray.origin, *ray.direction))
}

/// Move the hover highlight to `target`, restoring the previous holder
/// first. `None` clears the highlight.
pub fn apply_hover(
    target: Option<Entity>,
    commands: &mut Commands,
    previous: &Query<Entity, With<Hovered>>,
    nodes: &mut Query<(&SubnodeVisual, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
    pool: &MaterialPool,
    state: &mut InteractionState,
    governor: &mut RenderGovernor,
) {
    let current = previous.iter().next();
    if current.is_none() && state.hovered.is_some() {
        // The holder was despawned out from under us (snapshot rebuild);
        // drop the stale id before anything reads it.
        state.hovered = None;
    }
    if current == target {
        return;
    }

    if let Some(entity) = current {
        if let Ok((visual, mut transform, mut material)) = nodes.get_mut(entity) {
            transform.scale = Vec3::splat(visual.base_radius);
            material.0 = pool.subnode[visual.difficulty.min(10) as usize].clone();
        }
        commands.entity(entity).remove::<Hovered>();
        state.hovered = None;
    }

    if let Some(entity) = target {
        if let Ok((visual, mut transform, mut material)) = nodes.get_mut(entity) {
            transform.scale = Vec3::splat(visual.base_radius * HOVER_SCALE);
            material.0 = pool.subnode_hover[visual.difficulty.min(10) as usize].clone();
            state.hovered = Some(visual.id.clone());
            commands.entity(entity).insert(Hovered);
        }
    }

    governor.invalidate();
}

pub fn update_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    candidates: Query<(Entity, &GlobalTransform, &SubnodeVisual, &LodBand)>,
    visible: Res<VisibilitySet>,
    previous: Query<Entity, With<Hovered>>,
    mut nodes: Query<(&SubnodeVisual, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
    pool: Res<MaterialPool>,
    mut state: ResMut<InteractionState>,
    mut governor: ResMut<RenderGovernor>,
    mut commands: Commands,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    state.pointer_position = window.cursor_position();

    let target = cursor_ray(window, camera, camera_transform).and_then(|(origin, direction)| {
        // Only full-detail, revealed subnodes are pickable.
        let spheres = candidates.iter().filter_map(|(entity, transform, visual, band)| {
            (*band == LodBand::Full && visible.contains(&visual.id)).then(|| {
                (entity, transform.translation(), visual.base_radius)
            })
        });
        nearest_sphere_hit(origin, direction, spheres).map(|(entity, _)| entity)
    });

    apply_hover(
        target,
        &mut commands,
        &previous,
        &mut nodes,
        &pool,
        &mut state,
        &mut governor,
    );
}
