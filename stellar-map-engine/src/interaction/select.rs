//! Click selection. A hit selects the subnode, pulls the camera toward it
//! and fires its external link if it has one; a click on empty space clears
//! the selection. Link opening is a browser navigation on wasm and a log
//! line on native builds.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::focus::FocusRequest;
use crate::engine::render::governor::RenderGovernor;
use crate::engine::scene::entities::SubnodeVisual;
use crate::engine::visibility::lod::LodBand;
use crate::engine::visibility::VisibilitySet;
use crate::interaction::hover::{cursor_ray, InteractionState};
use crate::interaction::ray::nearest_sphere_hit;

#[derive(Event, Debug, Clone)]
pub struct ExternalLinkRequest {
    pub url: String,
}

/// Selection outcome for a resolved click. Split from the input plumbing so
/// the empty-click and link semantics are directly testable.
pub fn apply_click(
    hit: Option<&SubnodeVisual>,
    state: &mut InteractionState,
    links: &mut EventWriter<ExternalLinkRequest>,
    focus: &mut EventWriter<FocusRequest>,
    governor: &mut RenderGovernor,
) {
    match hit {
        Some(visual) => {
            state.selected = Some(visual.id.clone());
            focus.write(FocusRequest::Subnode(visual.id.clone()));
            if let Some(url) = &visual.link {
                links.write(ExternalLinkRequest { url: url.clone() });
            }
            governor.invalidate();
        }
        None => {
            if state.selected.take().is_some() {
                governor.invalidate();
            }
        }
    }
}

pub fn handle_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    candidates: Query<(Entity, &GlobalTransform, &SubnodeVisual, &LodBand)>,
    visible: Res<VisibilitySet>,
    mut state: ResMut<InteractionState>,
    mut links: EventWriter<ExternalLinkRequest>,
    mut focus: EventWriter<FocusRequest>,
    mut governor: ResMut<RenderGovernor>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let hit = cursor_ray(window, camera, camera_transform).and_then(|(origin, direction)| {
        let spheres = candidates.iter().filter_map(|(entity, transform, visual, band)| {
            (*band == LodBand::Full && visible.contains(&visual.id))
                .then(|| (entity, transform.translation(), visual.base_radius))
        });
        nearest_sphere_hit(origin, direction, spheres)
            .and_then(|(entity, _)| candidates.get(entity).ok())
            .map(|(_, _, visual, _)| visual.clone())
    });

    apply_click(
        hit.as_ref(),
        &mut state,
        &mut links,
        &mut focus,
        &mut governor,
    );
}

pub fn open_external_links(mut requests: EventReader<ExternalLinkRequest>) {
    for request in requests.read() {
        #[cfg(target_arch = "wasm32")]
        {
            let opened = web_sys::window()
                .and_then(|w| w.open_with_url_and_target(&request.url, "_blank").ok())
                .flatten();
            if opened.is_none() {
                warn!("browser refused to open {}", request.url);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        info!("external link requested: {}", request.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn visual(id: &str, link: Option<&str>) -> SubnodeVisual {
        SubnodeVisual {
            id: id.into(),
            title: id.into(),
            link: link.map(String::from),
            difficulty: 1,
            difficulty_label: String::new(),
            family: "f".into(),
            constellation: "f::c".into(),
            base_radius: 0.4,
        }
    }

    fn click(world: &mut World, hit: Option<SubnodeVisual>) {
        world
            .run_system_once(
                move |mut state: ResMut<InteractionState>,
                      mut links: EventWriter<ExternalLinkRequest>,
                      mut focus: EventWriter<FocusRequest>,
                      mut governor: ResMut<RenderGovernor>| {
                    apply_click(hit.as_ref(), &mut state, &mut links, &mut focus, &mut governor);
                },
            )
            .unwrap();
    }

    fn test_world() -> World {
        let mut world = World::new();
        world.init_resource::<InteractionState>();
        world.init_resource::<RenderGovernor>();
        world.init_resource::<Events<ExternalLinkRequest>>();
        world.init_resource::<Events<FocusRequest>>();
        world
    }

    #[test]
    fn click_selects_focuses_and_fires_link() {
        let mut world = test_world();
        click(&mut world, Some(visual("a", Some("https://example.org/a"))));

        assert_eq!(
            world.resource::<InteractionState>().selected.as_deref(),
            Some("a")
        );
        assert_eq!(world.resource::<Events<FocusRequest>>().len(), 1);
        assert_eq!(world.resource::<Events<ExternalLinkRequest>>().len(), 1);
    }

    #[test]
    fn linkless_node_selects_without_firing() {
        let mut world = test_world();
        click(&mut world, Some(visual("a", None)));
        assert_eq!(world.resource::<Events<ExternalLinkRequest>>().len(), 0);
        assert_eq!(
            world.resource::<InteractionState>().selected.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn empty_click_clears_selection() {
        let mut world = test_world();
        click(&mut world, Some(visual("a", None)));
        click(&mut world, None);
        assert!(world.resource::<InteractionState>().selected.is_none());
    }

    #[test]
    fn empty_click_with_no_selection_is_inert() {
        let mut world = test_world();
        world.resource_mut::<RenderGovernor>().take_dirty();
        click(&mut world, None);
        assert!(!world.resource::<RenderGovernor>().is_dirty());
    }
}
