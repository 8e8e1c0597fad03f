use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};
use bevy_common_assets::json::JsonAssetPlugin;
use std::time::Duration;

mod engine;
mod interaction;

use constants::render_settings::CAMERA_HOME_DISTANCE;
use engine::assets::{
    begin_snapshot_load, promote_loaded_documents, DifficultyThresholds, HierarchySnapshot,
    MapRebuildRequest, ProgressionProfile, SnapshotLoader,
};
use engine::camera::focus::{handle_focus_requests, tick_camera_focus, CameraFocus, FocusRequest};
use engine::camera::rig::{orbit_rig_controller, OrbitRig};
use engine::camera::{focus_shortcuts, publish_camera_snapshot, CameraSnapshot};
use engine::render::core_sun::{
    advance_sun_animation, retint_core_sun, spawn_core_sun, CoreSunMaterial,
};
use engine::render::governor::{
    cap_pixel_ratio, flush_redraws, invalidate_on_camera_motion, invalidate_on_resize,
    HostViewState, RenderGovernor,
};
use engine::scene::connectors::{toggle_weak_connectors, WeakConnectorToggle};
use engine::scene::entities::{init_scene_pools, spawn_stellar_map};
use engine::visibility::fog::{setup_fog_overlay, update_fog_overlay, FogOverlayMaterial};
use engine::visibility::lod::apply_lod;
use engine::visibility::{recompute_visibility, VisibilitySet};
use interaction::breadcrumb::{update_breadcrumb, BreadcrumbPath};
use interaction::hover::{update_hover, InteractionState};
use interaction::select::{handle_clicks, open_external_links, ExternalLinkRequest};

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<FogOverlayMaterial>::default())
        .add_plugins(MaterialPlugin::<CoreSunMaterial>::default())
        .add_plugins(JsonAssetPlugin::<HierarchySnapshot>::new(&["hierarchy.json"]))
        .add_plugins(JsonAssetPlugin::<ProgressionProfile>::new(&["profile.json"]))
        .add_plugins(JsonAssetPlugin::<DifficultyThresholds>::new(&[
            "thresholds.json",
        ]));

    // Present only when something changed; the reactive cadence caps the
    // tick rate while idle input events still wake the loop.
    app.insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive(Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(Duration::from_millis(100)),
    });

    app.add_event::<MapRebuildRequest>()
        .add_event::<FocusRequest>()
        .add_event::<ExternalLinkRequest>();

    app.init_resource::<SnapshotLoader>()
        .init_resource::<VisibilitySet>()
        .init_resource::<InteractionState>()
        .init_resource::<BreadcrumbPath>()
        .init_resource::<CameraSnapshot>()
        .init_resource::<OrbitRig>()
        .init_resource::<CameraFocus>()
        .init_resource::<RenderGovernor>()
        .init_resource::<HostViewState>()
        .init_resource::<WeakConnectorToggle>();

    app.add_systems(
        Startup,
        (
            init_scene_pools,
            setup,
            spawn_core_sun,
            setup_fog_overlay,
            begin_snapshot_load,
        )
            .chain(),
    )
    .add_systems(
        Update,
        (
            promote_loaded_documents,
            spawn_stellar_map,
            recompute_visibility,
            retint_core_sun,
            focus_shortcuts,
            toggle_weak_connectors,
            handle_focus_requests,
            orbit_rig_controller,
            tick_camera_focus,
            publish_camera_snapshot,
            update_hover,
            handle_clicks,
            open_external_links,
            update_breadcrumb,
            breadcrumb_text_update,
        )
            .chain(),
    )
    .add_systems(
        Update,
        (
            apply_lod,
            advance_sun_animation,
            update_fog_overlay,
            invalidate_on_camera_motion,
            invalidate_on_resize,
            cap_pixel_ratio,
            flush_redraws,
        )
            .chain()
            .after(breadcrumb_text_update),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Stellar Map".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

fn setup(mut commands: Commands) {
    spawn_camera(&mut commands);
    spawn_lighting(&mut commands);
    spawn_ui(&mut commands);
}

fn spawn_camera(commands: &mut Commands) {
    let rig = OrbitRig::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(rig.eye()).looking_at(rig.target, Vec3::Y),
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.7, 0.75, 0.9),
        brightness: 80.0,
        ..default()
    });
    // Light radiates from the core sun.
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: CAMERA_HOME_DISTANCE * 6.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));
}

#[derive(Component)]
struct BreadcrumbText;

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.88, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                BreadcrumbText,
            ));
        });
}

fn breadcrumb_text_update(
    path: Res<BreadcrumbPath>,
    mut query: Query<&mut Text, With<BreadcrumbText>>,
) {
    if !path.is_changed() {
        return;
    }
    let rendered = [
        path.core.as_deref(),
        path.family.as_deref(),
        path.constellation.as_deref(),
        path.subnode.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" > ");
    for mut text in &mut query {
        text.0 = rendered.clone();
    }
}
