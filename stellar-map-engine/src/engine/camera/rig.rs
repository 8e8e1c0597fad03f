//! Free orbit rig: yaw/pitch/distance around a look target, driven by
//! right-button drag and the scroll wheel. Input is ignored while a focus
//! animation owns the camera; on settle the rig is resynced from the final
//! pose so manual control resumes without a jump.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::render_settings::CAMERA_HOME_DISTANCE;

use crate::engine::camera::focus::CameraFocus;

const ORBIT_SENSITIVITY: f32 = 0.005;
const PITCH_LIMIT: f32 = 1.54;
const DOLLY_STEP: f32 = 0.1;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 150.0;
const SMOOTHING_RATE: f32 = 12.0;

#[derive(Resource, Debug, Clone, Copy)]
pub struct OrbitRig {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.6,
            pitch: -0.5,
            distance: CAMERA_HOME_DISTANCE,
        }
    }
}

impl OrbitRig {
    /// Camera position implied by the current rig parameters.
    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        self.target + rotation * (Vec3::Z * self.distance)
    }

    /// Recover rig parameters from an explicit camera pose.
    pub fn sync_from(&mut self, eye: Vec3, target: Vec3) {
        self.target = target;
        let offset = eye - target;
        self.distance = offset.length().max(MIN_DISTANCE * 0.1);
        let dir = offset / self.distance;
        self.pitch = -dir.y.clamp(-1.0, 1.0).asin();
        self.yaw = dir.x.atan2(dir.z);
    }
}

pub fn orbit_rig_controller(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motions: EventReader<MouseMotion>,
    mut wheels: EventReader<MouseWheel>,
    focus: Res<CameraFocus>,
    time: Res<Time>,
    mut rig: ResMut<OrbitRig>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    if focus.is_animating() {
        motions.clear();
        wheels.clear();
        return;
    }
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    if buttons.pressed(MouseButton::Right) {
        for motion in motions.read() {
            rig.yaw -= motion.delta.x * ORBIT_SENSITIVITY;
            rig.pitch =
                (rig.pitch - motion.delta.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    } else {
        motions.clear();
    }
    for wheel in wheels.read() {
        let step = match wheel.unit {
            MouseScrollUnit::Line => wheel.y,
            MouseScrollUnit::Pixel => wheel.y / 50.0,
        };
        rig.distance = (rig.distance * (1.0 - step * DOLLY_STEP)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    let desired = rig.eye();
    if transform.translation.distance_squared(desired) > 1e-8 {
        let alpha = (SMOOTHING_RATE * time.delta_secs()).min(1.0);
        let target = rig.target;
        transform.translation = transform.translation.lerp(desired, alpha);
        transform.look_at(target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_round_trips_through_eye() {
        let mut rig = OrbitRig::default();
        rig.sync_from(Vec3::new(3.0, 4.0, 12.0), Vec3::new(1.0, 0.0, -2.0));
        let eye = rig.eye();
        assert!(eye.distance(Vec3::new(3.0, 4.0, 12.0)) < 1e-3);
        assert!(rig.target.distance(Vec3::new(1.0, 0.0, -2.0)) < 1e-6);
    }
}
