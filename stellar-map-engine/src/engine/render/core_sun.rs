//! Central core sun: a custom-shaded sphere at the origin with a ring of
//! small flare lights slowly orbiting it. The shader clock advances every
//! tick whether or not a frame presents, so an eventual redraw shows the
//! current phase instead of a stale one.

use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use constants::difficulty::srgb_from_hex;
use constants::palette::core_palette_for;
use constants::render_settings::FLARE_ROTATION_RATE;

const SUN_SHADER_PATH: &str = "shaders/core_sun.wgsl";
const SUN_RADIUS: f32 = 2.5;
const FLARE_COUNT: usize = 6;
const FLARE_ORBIT: f32 = 3.4;

#[derive(Clone, Copy, Debug, ShaderType)]
pub struct CoreSunUniform {
    pub palette: [Vec4; 4],
    pub params: Vec4,
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct CoreSunMaterial {
    #[uniform(0)]
    pub data: CoreSunUniform,
}

impl Material for CoreSunMaterial {
    fn fragment_shader() -> ShaderRef {
        SUN_SHADER_PATH.into()
    }
}

#[derive(Component)]
pub struct CoreSun;

/// Flare ring root; rotating this one transform orbits all flares.
#[derive(Component)]
pub struct FlareRing;

fn palette_vec(hex: u32) -> Vec4 {
    let linear = srgb_from_hex(hex).to_linear();
    Vec4::new(linear.red, linear.green, linear.blue, 1.0)
}

pub fn spawn_core_sun(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut sun_materials: ResMut<Assets<CoreSunMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let palette = core_palette_for("Ignition");
    let material = sun_materials.add(CoreSunMaterial {
        data: CoreSunUniform {
            palette: [
                palette_vec(palette.core),
                palette_vec(palette.layer2),
                palette_vec(palette.layer3),
                palette_vec(palette.surface),
            ],
            params: Vec4::new(0.0, 0.12, 0.0, 0.0),
        },
    });
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(SUN_RADIUS))),
        MeshMaterial3d(material),
        Transform::default(),
        CoreSun,
    ));

    let flare_material = materials.add(StandardMaterial {
        base_color: srgb_from_hex(palette.corona),
        emissive: srgb_from_hex(palette.corona).to_linear() * 2.0,
        unlit: true,
        ..default()
    });
    let flare_mesh = meshes.add(Sphere::new(0.12));
    commands
        .spawn((Transform::default(), Visibility::default(), FlareRing))
        .with_children(|ring| {
            for i in 0..FLARE_COUNT {
                let angle = std::f32::consts::TAU * i as f32 / FLARE_COUNT as f32;
                ring.spawn((
                    Mesh3d(flare_mesh.clone()),
                    MeshMaterial3d(flare_material.clone()),
                    Transform::from_xyz(
                        angle.cos() * FLARE_ORBIT,
                        (i as f32 * 0.7).sin() * 0.6,
                        angle.sin() * FLARE_ORBIT,
                    ),
                ));
            }
        });
}

/// Re-tint the sun when a hierarchy with a different core palette loads.
pub fn retint_core_sun(
    hierarchy: Option<Res<crate::engine::assets::ActiveHierarchy>>,
    mut sun_materials: ResMut<Assets<CoreSunMaterial>>,
) {
    let Some(hierarchy) = hierarchy else {
        return;
    };
    if !hierarchy.is_changed() {
        return;
    }
    let palette = core_palette_for(&hierarchy.0.core_name);
    for (_, material) in sun_materials.iter_mut() {
        material.data.palette = [
            palette_vec(palette.core),
            palette_vec(palette.layer2),
            palette_vec(palette.layer3),
            palette_vec(palette.surface),
        ];
    }
}

/// Always-on animation work: advance the shader clock and rotate the flare
/// ring. Deliberately does not touch the render governor.
pub fn advance_sun_animation(
    time: Res<Time>,
    mut sun_materials: ResMut<Assets<CoreSunMaterial>>,
    mut rings: Query<&mut Transform, With<FlareRing>>,
) {
    for (_, material) in sun_materials.iter_mut() {
        material.data.params.x = time.elapsed_secs();
    }
    if let Ok(mut transform) = rings.single_mut() {
        transform.rotate_y(FLARE_ROTATION_RATE * time.delta_secs());
    }
}
