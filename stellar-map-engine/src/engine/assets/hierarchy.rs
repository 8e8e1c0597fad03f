use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One learnable item inside a constellation, mirroring the JSON document
/// shape field for field. `link` is optional; nodes without one are still
/// selectable but never open anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnodeData {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub difficulty: u8,
    #[serde(default)]
    pub difficulty_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstellationData {
    pub name: String,
    pub subnodes: Vec<SubnodeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyData {
    pub name: String,
    pub constellations: Vec<ConstellationData>,
}

/// Complete hierarchy snapshot: one core, its families, their constellations
/// and subnodes. Treated as immutable once loaded; a changed snapshot means
/// a full teardown and rebuild of the scene.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    pub core_name: String,
    pub families: Vec<FamilyData>,
}

impl HierarchySnapshot {
    pub fn subnodes(&self) -> impl Iterator<Item = &SubnodeData> {
        self.families
            .iter()
            .flat_map(|f| f.constellations.iter())
            .flat_map(|c| c.subnodes.iter())
    }

    pub fn subnode_count(&self) -> usize {
        self.subnodes().count()
    }
}

/// External progression document. The engine only ever reads it; progression
/// advances outside and arrives as a fresh document.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionProfile {
    #[serde(default)]
    pub current_xp: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_with_optional_fields_missing() {
        let json = r#"{
            "core_name": "Ignition",
            "families": [{
                "name": "Energy Architects",
                "constellations": [{
                    "name": "Grid Foundations",
                    "subnodes": [{"id": "a", "title": "A"}]
                }]
            }]
        }"#;
        let snapshot: HierarchySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.subnode_count(), 1);
        let node = snapshot.subnodes().next().unwrap();
        assert_eq!(node.difficulty, 0);
        assert!(node.link.is_none());
    }
}
