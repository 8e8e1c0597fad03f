//! Render-loop governor. The winit loop runs in reactive mode, so a frame
//! is only presented when something marked the scene dirty and a redraw was
//! requested. Per-tick uniform work still happens upstream; this module
//! decides whether that work reaches the screen.

use bevy::prelude::*;
use bevy::window::{RequestRedraw, WindowResized};
use constants::render_settings::MAX_PIXEL_RATIO;

/// Dirty flag collected over the frame. Starts dirty so the very first
/// frame always presents.
#[derive(Resource, Debug)]
pub struct RenderGovernor {
    dirty: bool,
    pixel_ratio_capped: bool,
}

impl Default for RenderGovernor {
    fn default() -> Self {
        Self {
            dirty: true,
            pixel_ratio_capped: false,
        }
    }
}

impl RenderGovernor {
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Host-controlled view visibility. While hidden, redraw requests are
/// withheld and the dirty flag accumulates until the view returns.
#[derive(Resource, Debug, Clone, Copy)]
pub struct HostViewState {
    pub visible: bool,
}

impl Default for HostViewState {
    fn default() -> Self {
        Self { visible: true }
    }
}

pub fn invalidate_on_camera_motion(
    cameras: Query<(), (With<Camera3d>, Changed<Transform>)>,
    mut governor: ResMut<RenderGovernor>,
) {
    if !cameras.is_empty() {
        governor.invalidate();
    }
}

pub fn invalidate_on_resize(
    mut resizes: EventReader<WindowResized>,
    mut governor: ResMut<RenderGovernor>,
) {
    if resizes.read().next().is_some() {
        governor.invalidate();
    }
}

/// Cap the device pixel ratio once the window reports its real scale
/// factor. High-density displays otherwise quadruple the fill cost of the
/// fog overlay.
pub fn cap_pixel_ratio(mut windows: Query<&mut Window>, mut governor: ResMut<RenderGovernor>) {
    if governor.pixel_ratio_capped {
        return;
    }
    for mut window in windows.iter_mut() {
        if window.resolution.scale_factor() > MAX_PIXEL_RATIO {
            window
                .resolution
                .set_scale_factor_override(Some(MAX_PIXEL_RATIO));
            info!("pixel ratio capped at {MAX_PIXEL_RATIO}");
        }
        governor.pixel_ratio_capped = true;
    }
}

/// Last system of the frame: convert an accumulated dirty flag into one
/// redraw request, unless the host has hidden the view.
pub fn flush_redraws(
    host: Res<HostViewState>,
    mut governor: ResMut<RenderGovernor>,
    mut redraws: EventWriter<RequestRedraw>,
) {
    if !host.visible {
        return;
    }
    if governor.take_dirty() {
        redraws.write(RequestRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<RenderGovernor>();
        world.init_resource::<HostViewState>();
        world.init_resource::<Events<RequestRedraw>>();
        world
    }

    fn redraw_count(world: &World) -> usize {
        world.resource::<Events<RequestRedraw>>().len()
    }

    #[test]
    fn first_frame_is_dirty_then_settles() {
        let mut world = world();
        world.run_system_once(flush_redraws).unwrap();
        assert_eq!(redraw_count(&world), 1);
        world.run_system_once(flush_redraws).unwrap();
        assert_eq!(redraw_count(&world), 1);
    }

    #[test]
    fn invalidation_triggers_exactly_one_redraw() {
        let mut world = world();
        world.resource_mut::<RenderGovernor>().take_dirty();
        world.resource_mut::<RenderGovernor>().invalidate();
        world.resource_mut::<RenderGovernor>().invalidate();
        world.run_system_once(flush_redraws).unwrap();
        assert_eq!(redraw_count(&world), 1);
    }

    #[test]
    fn hidden_view_withholds_redraws_but_keeps_dirty() {
        let mut world = world();
        world.resource_mut::<HostViewState>().visible = false;
        world.run_system_once(flush_redraws).unwrap();
        assert_eq!(redraw_count(&world), 0);
        assert!(world.resource::<RenderGovernor>().is_dirty());

        world.resource_mut::<HostViewState>().visible = true;
        world.run_system_once(flush_redraws).unwrap();
        assert_eq!(redraw_count(&world), 1);
    }
}
