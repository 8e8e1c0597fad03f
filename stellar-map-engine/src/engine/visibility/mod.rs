//! Progression-driven visibility. A subnode is visible when the current
//! score meets the threshold for its difficulty level; the derived id set
//! only ever grows as the score grows.

pub mod fog;
pub mod lod;

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::engine::assets::{
    ActiveHierarchy, DifficultyThresholds, ProgressionScore, SubnodeData,
};
use crate::engine::render::governor::RenderGovernor;

/// Ids of subnodes revealed at the current score.
#[derive(Resource, Debug, Clone, Default)]
pub struct VisibilitySet {
    pub ids: HashSet<String>,
}

impl VisibilitySet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

pub fn compute_visible<'a>(
    score: f32,
    subnodes: impl Iterator<Item = &'a SubnodeData>,
    thresholds: &DifficultyThresholds,
) -> HashSet<String> {
    subnodes
        .filter(|node| score >= thresholds.min_score_for(node.difficulty))
        .map(|node| node.id.clone())
        .collect()
}

/// Rebuild the visibility set whenever the hierarchy, the score or the
/// threshold table changes. Entity-level visibility application lives in
/// the LOD pass, which is the single writer of `Visibility`.
pub fn recompute_visibility(
    hierarchy: Option<Res<ActiveHierarchy>>,
    score: Option<Res<ProgressionScore>>,
    thresholds: Option<Res<DifficultyThresholds>>,
    mut set: ResMut<VisibilitySet>,
    mut governor: ResMut<RenderGovernor>,
) {
    let (Some(hierarchy), Some(score)) = (hierarchy, score) else {
        return;
    };
    let inputs_changed = hierarchy.is_changed()
        || score.is_changed()
        || thresholds.as_ref().is_some_and(|t| t.is_changed());
    if !inputs_changed {
        return;
    }

    let fallback = DifficultyThresholds::default();
    let table = thresholds.as_deref().unwrap_or(&fallback);
    let next = compute_visible(score.0, hierarchy.0.subnodes(), table);
    if next != set.ids {
        info!(
            "visibility recomputed: {} of {} subnodes revealed",
            next.len(),
            hierarchy.0.subnode_count()
        );
        set.ids = next;
        governor.invalidate();
    }
}
