//! Breadcrumb path derived from the current selection: core, family,
//! constellation, subnode. With nothing selected only the core remains.

use bevy::prelude::*;

use crate::engine::assets::ActiveHierarchy;
use crate::engine::scene::entities::SubnodeVisual;
use crate::interaction::hover::InteractionState;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct BreadcrumbPath {
    pub core: Option<String>,
    pub family: Option<String>,
    pub constellation: Option<String>,
    pub subnode: Option<String>,
}

pub fn breadcrumb_for(core: Option<&str>, selected: Option<&SubnodeVisual>) -> BreadcrumbPath {
    let mut path = BreadcrumbPath {
        core: core.map(String::from),
        ..Default::default()
    };
    if let Some(visual) = selected {
        path.family = Some(visual.family.clone());
        // Constellation keys are qualified; only the display name goes in
        // the path.
        path.constellation = visual
            .constellation
            .rsplit("::")
            .next()
            .map(String::from);
        path.subnode = Some(visual.title.clone());
    }
    path
}

pub fn update_breadcrumb(
    state: Res<InteractionState>,
    hierarchy: Option<Res<ActiveHierarchy>>,
    nodes: Query<&SubnodeVisual>,
    mut path: ResMut<BreadcrumbPath>,
) {
    let selected = state
        .selected
        .as_deref()
        .and_then(|id| nodes.iter().find(|visual| visual.id == id));
    let next = breadcrumb_for(
        hierarchy.as_ref().map(|h| h.0.core_name.as_str()),
        selected,
    );
    if *path != next {
        *path = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_produces_full_path() {
        let visual = SubnodeVisual {
            id: "pumped-hydro".into(),
            title: "Pumped Hydro".into(),
            link: None,
            difficulty: 6,
            difficulty_label: "Blaze".into(),
            family: "Energy Architects".into(),
            constellation: "Energy Architects::Storage Systems".into(),
            base_radius: 0.9,
        };
        let path = breadcrumb_for(Some("Ignition"), Some(&visual));
        assert_eq!(path.core.as_deref(), Some("Ignition"));
        assert_eq!(path.family.as_deref(), Some("Energy Architects"));
        assert_eq!(path.constellation.as_deref(), Some("Storage Systems"));
        assert_eq!(path.subnode.as_deref(), Some("Pumped Hydro"));
    }

    #[test]
    fn no_selection_keeps_only_the_core() {
        let path = breadcrumb_for(Some("Ignition"), None);
        assert_eq!(path.core.as_deref(), Some("Ignition"));
        assert!(path.family.is_none());
        assert!(path.constellation.is_none());
        assert!(path.subnode.is_none());
    }
}
