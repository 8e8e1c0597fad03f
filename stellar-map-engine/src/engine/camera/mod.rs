pub mod focus;
pub mod rig;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use focus::FocusRequest;

/// Published camera pose and viewport size, refreshed every tick for host
/// code that mirrors the view elsewhere.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub forward: Vec3,
    pub viewport: Vec2,
}

pub fn publish_camera_snapshot(
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut snapshot: ResMut<CameraSnapshot>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    snapshot.position = camera.translation();
    snapshot.forward = camera.forward().as_vec3();
    if let Ok(window) = windows.single() {
        snapshot.viewport = Vec2::new(window.width(), window.height());
    }
}

/// R returns the camera to the home view.
pub fn focus_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<FocusRequest>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        requests.write(FocusRequest::Reset);
    }
}
