//! Fog-of-war overlay. A camera-pinned quad renders a near-opaque veil; the
//! material uniform carries the projected positions of revealed subnodes and
//! the shader cuts a soft clearing around each one. Window entries are
//! refreshed every tick so clearings track camera motion exactly.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use bevy::window::PrimaryWindow;
use constants::render_settings::{
    FOG_OPACITY, FOG_WINDOW_RADIUS, FOG_WINDOW_SOFTNESS, MAX_FOG_WINDOWS,
};

use crate::engine::scene::entities::SubnodeVisual;
use crate::engine::visibility::VisibilitySet;

const FOG_SHADER_PATH: &str = "shaders/fog_overlay.wgsl";

/// Distance of the overlay quad in front of the camera.
const FOG_PLANE_OFFSET: f32 = 1.0;

#[derive(Clone, Copy, Debug, ShaderType)]
pub struct FogOverlayUniform {
    pub fog_color: Vec4,
    pub viewport: Vec4,
    pub windows: [Vec4; MAX_FOG_WINDOWS],
}

impl Default for FogOverlayUniform {
    fn default() -> Self {
        Self {
            fog_color: Vec4::new(0.039, 0.039, 0.102, FOG_OPACITY),
            viewport: Vec4::new(1.0, 1.0, 0.0, 1.0),
            windows: [Vec4::ZERO; MAX_FOG_WINDOWS],
        }
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct FogOverlayMaterial {
    #[uniform(0)]
    pub data: FogOverlayUniform,
}

impl Material for FogOverlayMaterial {
    fn fragment_shader() -> ShaderRef {
        FOG_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}

#[derive(Component)]
pub struct FogOverlay;

#[derive(Resource)]
pub struct FogOverlayHandle(pub Handle<FogOverlayMaterial>);

/// Spawn the overlay quad as a child of the camera so it stays glued to the
/// view. Runs after camera setup in the startup chain.
pub fn setup_fog_overlay(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut fog_materials: ResMut<Assets<FogOverlayMaterial>>,
    cameras: Query<Entity, With<Camera3d>>,
) {
    let Ok(camera) = cameras.single() else {
        warn!("fog overlay skipped: no camera to attach to");
        return;
    };
    let handle = fog_materials.add(FogOverlayMaterial {
        data: FogOverlayUniform::default(),
    });
    commands.insert_resource(FogOverlayHandle(handle.clone()));
    let quad = commands
        .spawn((
            Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
            MeshMaterial3d(handle),
            Transform::from_xyz(0.0, 0.0, -FOG_PLANE_OFFSET),
            NotShadowCaster,
            FogOverlay,
        ))
        .id();
    commands.entity(camera).add_child(quad);
}

/// Uniform entry for a projected node, or `None` when the projection lands
/// outside the viewport. The window array is a fixed budget; off-screen
/// nodes must not claim slots that on-screen nodes need. A node just past
/// the edge is kept while its clearing radius still reaches into view.
fn fog_window_entry(viewport_pos: Vec2, logical: Vec2) -> Option<Vec4> {
    let margin = FOG_WINDOW_RADIUS;
    if viewport_pos.x < -margin
        || viewport_pos.y < -margin
        || viewport_pos.x > logical.x + margin
        || viewport_pos.y > logical.y + margin
    {
        return None;
    }
    Some(Vec4::new(
        viewport_pos.x / logical.x,
        viewport_pos.y / logical.y,
        FOG_WINDOW_RADIUS / logical.y,
        FOG_WINDOW_SOFTNESS,
    ))
}

pub fn update_fog_overlay(
    cameras: Query<(&Camera, &GlobalTransform, &Projection), With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    visible: Res<VisibilitySet>,
    nodes: Query<(&SubnodeVisual, &GlobalTransform)>,
    handle: Option<Res<FogOverlayHandle>>,
    mut fog_materials: ResMut<Assets<FogOverlayMaterial>>,
    mut overlays: Query<&mut Transform, With<FogOverlay>>,
) {
    let Some(handle) = handle else {
        return;
    };
    let Ok((camera, camera_transform, projection)) = cameras.single() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(material) = fog_materials.get_mut(&handle.0) else {
        return;
    };

    let logical = Vec2::new(window.width(), window.height()).max(Vec2::ONE);
    let physical = Vec2::new(
        window.physical_width() as f32,
        window.physical_height() as f32,
    )
    .max(Vec2::ONE);

    let mut count = 0usize;
    for (visual, node_transform) in nodes.iter() {
        if count >= MAX_FOG_WINDOWS {
            break;
        }
        if !visible.contains(&visual.id) {
            continue;
        }
        let Ok(viewport_pos) = camera.world_to_viewport(camera_transform, node_transform.translation())
        else {
            continue;
        };
        let Some(entry) = fog_window_entry(viewport_pos, logical) else {
            continue;
        };
        material.data.windows[count] = entry;
        count += 1;
    }
    for slot in material.data.windows[count..].iter_mut() {
        *slot = Vec4::ZERO;
    }
    material.data.viewport = Vec4::new(physical.x, physical.y, count as f32, logical.x / logical.y);

    // Scale the quad to exactly cover the frustum at its depth.
    let fov = match projection {
        Projection::Perspective(perspective) => perspective.fov,
        _ => std::f32::consts::FRAC_PI_4,
    };
    let height = 2.0 * FOG_PLANE_OFFSET * (fov * 0.5).tan();
    let aspect = logical.x / logical.y;
    if let Ok(mut transform) = overlays.single_mut() {
        transform.scale = Vec3::new(height * aspect, height, 1.0);
    }
}
