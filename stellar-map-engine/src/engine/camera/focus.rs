//! Camera focus controller. A focus request computes a single goal pose
//! (position plus look target) and an exponential-decay animation carries
//! the camera there; within the snap epsilon the pose is set exactly and the
//! state returns to idle. A new request at any time simply replaces the
//! goal, including a reset issued mid-flight.

use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_HOME_DISTANCE, CONSTELLATION_FOCUS_DISTANCE, FAMILY_FOCUS_DISTANCE, FOCUS_BASE_RATE,
    FOCUS_DISTANCE_GAIN, FOCUS_EPSILON, SUBNODE_FOCUS_DISTANCE,
};

use crate::engine::camera::rig::OrbitRig;
use crate::engine::render::governor::RenderGovernor;
use crate::engine::scene::layout::MapLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    Idle,
    Animating { goal_position: Vec3, goal_look: Vec3 },
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraFocus {
    pub state: FocusState,
}

impl Default for CameraFocus {
    fn default() -> Self {
        Self {
            state: FocusState::Idle,
        }
    }
}

impl CameraFocus {
    pub fn is_animating(&self) -> bool {
        matches!(self.state, FocusState::Animating { .. })
    }
}

#[derive(Event, Debug, Clone)]
pub enum FocusRequest {
    Family(String),
    Constellation(String),
    Subnode(String),
    Reset,
}

/// Goal pose for a focus target: approach along the current camera
/// direction, stopping at the canonical distance for the target kind. A
/// camera sitting exactly on the target falls back to the +Z axis.
pub fn focus_goal(target: Vec3, distance: f32, camera_position: Vec3) -> (Vec3, Vec3) {
    let direction = (camera_position - target)
        .try_normalize()
        .unwrap_or(Vec3::Z);
    (target + direction * distance, target)
}

/// One animation step. Approach rate grows with remaining distance so long
/// hops start fast, and the exponential form keeps the step stable across
/// uneven frame times.
pub fn approach_step(current: Vec3, goal: Vec3, dt: f32) -> Vec3 {
    let remaining = goal - current;
    let distance = remaining.length();
    if distance <= f32::EPSILON {
        return goal;
    }
    let rate = FOCUS_BASE_RATE * (1.0 + FOCUS_DISTANCE_GAIN * distance);
    let alpha = 1.0 - (-rate * dt).exp();
    current + remaining * alpha
}

pub fn handle_focus_requests(
    mut requests: EventReader<FocusRequest>,
    layout: Option<Res<MapLayout>>,
    cameras: Query<&Transform, With<Camera3d>>,
    mut focus: ResMut<CameraFocus>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };
    let Ok(camera) = cameras.single() else {
        return;
    };

    let resolved = match request {
        FocusRequest::Reset => Some((Vec3::ZERO, CAMERA_HOME_DISTANCE)),
        FocusRequest::Family(name) => layout
            .as_ref()
            .and_then(|l| l.families.get(name))
            .map(|p| (p.center, FAMILY_FOCUS_DISTANCE)),
        FocusRequest::Constellation(key) => layout
            .as_ref()
            .and_then(|l| l.constellations.get(key))
            .map(|p| (p.center, CONSTELLATION_FOCUS_DISTANCE)),
        FocusRequest::Subnode(id) => layout
            .as_ref()
            .and_then(|l| l.subnodes.get(id).copied())
            .map(|center| (center, SUBNODE_FOCUS_DISTANCE)),
    };
    let Some((target, distance)) = resolved else {
        warn!("focus request ignored: unknown target {request:?}");
        return;
    };

    let (goal_position, goal_look) = focus_goal(target, distance, camera.translation);
    focus.state = FocusState::Animating {
        goal_position,
        goal_look,
    };
}

pub fn tick_camera_focus(
    time: Res<Time>,
    mut focus: ResMut<CameraFocus>,
    mut rig: ResMut<OrbitRig>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut governor: ResMut<RenderGovernor>,
) {
    let FocusState::Animating {
        goal_position,
        goal_look,
    } = focus.state
    else {
        return;
    };
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    let dt = time.delta_secs();
    let next_position = approach_step(transform.translation, goal_position, dt);
    let next_look = approach_step(rig.target, goal_look, dt);

    if next_position.distance(goal_position) < FOCUS_EPSILON
        && next_look.distance(goal_look) < FOCUS_EPSILON
    {
        transform.translation = goal_position;
        rig.sync_from(goal_position, goal_look);
        focus.state = FocusState::Idle;
    } else {
        transform.translation = next_position;
        rig.target = next_look;
    }
    let look = rig.target;
    transform.look_at(look, Vec3::Y);
    governor.invalidate();
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn converge(mut position: Vec3, goal: Vec3) -> (Vec3, usize) {
        for tick in 0..10_000 {
            if position.distance(goal) < FOCUS_EPSILON {
                return (goal, tick);
            }
            position = approach_step(position, goal, DT);
        }
        (position, 10_000)
    }

    #[test]
    fn approach_converges_in_bounded_ticks() {
        let (position, ticks) = converge(Vec3::new(100.0, 50.0, -30.0), Vec3::ZERO);
        assert_eq!(position, Vec3::ZERO);
        assert!(ticks < 1_000, "took {ticks} ticks");
    }

    #[test]
    fn approach_never_overshoots() {
        let goal = Vec3::new(5.0, 0.0, 0.0);
        let mut position = Vec3::new(-20.0, 3.0, 8.0);
        let mut last_distance = position.distance(goal);
        for _ in 0..600 {
            position = approach_step(position, goal, DT);
            let distance = position.distance(goal);
            assert!(distance <= last_distance + 1e-4);
            last_distance = distance;
        }
    }

    #[test]
    fn goal_preserves_approach_direction() {
        let camera = Vec3::new(30.0, 10.0, 5.0);
        let target = Vec3::new(2.0, 1.0, -4.0);
        let (goal_position, goal_look) = focus_goal(target, 15.0, camera);
        assert_eq!(goal_look, target);
        let expected_dir = (camera - target).normalize();
        let actual_dir = (goal_position - target).normalize();
        assert!(expected_dir.distance(actual_dir) < 1e-5);
        assert!((goal_position.distance(target) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_direction_falls_back_to_axis() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let (goal_position, _) = focus_goal(target, 10.0, target);
        assert!(goal_position.distance(target + Vec3::Z * 10.0) < 1e-5);
    }

    #[test]
    fn reset_mid_flight_lands_at_home_distance() {
        // Begin an approach toward a constellation, interrupt part way with
        // a reset, and verify the final pose sits at the canonical home
        // distance from the origin.
        let mut position = Vec3::new(40.0, 20.0, 40.0);
        let (first_goal, _) = focus_goal(Vec3::new(8.0, 0.0, -6.0), 15.0, position);
        for _ in 0..30 {
            position = approach_step(position, first_goal, DT);
        }
        let (reset_goal, reset_look) = focus_goal(Vec3::ZERO, CAMERA_HOME_DISTANCE, position);
        let (position, _) = converge(position, reset_goal);
        assert_eq!(reset_look, Vec3::ZERO);
        assert!((position.length() - CAMERA_HOME_DISTANCE).abs() < 1e-3);
    }
}
