//! JSON asset boundary: hierarchy snapshot, progression profile and
//! difficulty thresholds. Each document type registers its own extension so
//! the loader never has to guess which shape a `.json` file carries.

pub mod hierarchy;
pub mod thresholds;

use bevy::prelude::*;

pub use hierarchy::{ConstellationData, FamilyData, HierarchySnapshot, ProgressionProfile, SubnodeData};
pub use thresholds::DifficultyThresholds;

/// Decoded hierarchy currently driving the scene. Replaced wholesale when a
/// new snapshot finishes loading.
#[derive(Resource, Debug, Clone)]
pub struct ActiveHierarchy(pub HierarchySnapshot);

/// Current progression score, read-only from the engine's point of view.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ProgressionScore(pub f32);

/// Fired when a hierarchy snapshot has been promoted and the scene must be
/// torn down and rebuilt from scratch.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct MapRebuildRequest;

/// Tracks in-flight asset handles until each document decodes, then promotes
/// the result to a plain resource and drops the handle.
#[derive(Resource, Default)]
pub struct SnapshotLoader {
    hierarchy: Option<Handle<HierarchySnapshot>>,
    profile: Option<Handle<ProgressionProfile>>,
    thresholds: Option<Handle<DifficultyThresholds>>,
}

pub fn begin_snapshot_load(asset_server: Res<AssetServer>, mut loader: ResMut<SnapshotLoader>) {
    loader.hierarchy = Some(asset_server.load("demo.hierarchy.json"));
    loader.profile = Some(asset_server.load("user.profile.json"));
    loader.thresholds = Some(asset_server.load("difficulty.thresholds.json"));
    info!("loading stellar map documents");
}

pub fn promote_loaded_documents(
    mut commands: Commands,
    mut loader: ResMut<SnapshotLoader>,
    hierarchies: Res<Assets<HierarchySnapshot>>,
    profiles: Res<Assets<ProgressionProfile>>,
    thresholds: Res<Assets<DifficultyThresholds>>,
    mut rebuilds: EventWriter<MapRebuildRequest>,
) {
    if let Some(handle) = loader.hierarchy.as_ref() {
        if let Some(snapshot) = hierarchies.get(handle) {
            info!(
                "hierarchy '{}' loaded: {} families, {} subnodes",
                snapshot.core_name,
                snapshot.families.len(),
                snapshot.subnode_count()
            );
            commands.insert_resource(ActiveHierarchy(snapshot.clone()));
            rebuilds.write(MapRebuildRequest);
            loader.hierarchy = None;
        }
    }

    if let Some(handle) = loader.profile.as_ref() {
        if let Some(profile) = profiles.get(handle) {
            commands.insert_resource(ProgressionScore(profile.current_xp));
            loader.profile = None;
        }
    }

    if let Some(handle) = loader.thresholds.as_ref() {
        if let Some(table) = thresholds.get(handle) {
            commands.insert_resource(table.clone().monotonized());
            loader.thresholds = None;
        }
    }
}
