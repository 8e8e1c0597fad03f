use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum progression score required to reveal each difficulty level.
/// Loaded from JSON; levels absent from the table fall back to
/// `default_threshold`, so an empty document reveals everything.
#[derive(Asset, Resource, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyThresholds {
    #[serde(default)]
    pub levels: BTreeMap<u8, f32>,
    #[serde(default)]
    pub default_threshold: f32,
}

impl DifficultyThresholds {
    pub fn min_score_for(&self, difficulty: u8) -> f32 {
        self.levels
            .get(&difficulty)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Enforce non-decreasing thresholds across difficulty levels by
    /// raising any dip to the running maximum. A harder level must never
    /// unlock before an easier one.
    pub fn monotonized(mut self) -> Self {
        let mut running_max = f32::MIN;
        for (difficulty, threshold) in self.levels.iter_mut() {
            if *threshold < running_max {
                warn!(
                    "threshold for difficulty {} raised from {} to {} to keep ordering",
                    difficulty, threshold, running_max
                );
                *threshold = running_max;
            } else {
                running_max = *threshold;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(pairs: &[(u8, f32)]) -> DifficultyThresholds {
        DifficultyThresholds {
            levels: pairs.iter().copied().collect(),
            default_threshold: 0.0,
        }
    }

    #[test]
    fn missing_level_falls_back_to_default() {
        let mut t = thresholds(&[(0, 0.0), (1, 100.0)]);
        t.default_threshold = 250.0;
        assert_eq!(t.min_score_for(1), 100.0);
        assert_eq!(t.min_score_for(7), 250.0);
    }

    #[test]
    fn empty_table_reveals_everything_at_zero() {
        let t = DifficultyThresholds::default();
        for difficulty in 0..=10 {
            assert_eq!(t.min_score_for(difficulty), 0.0);
        }
    }

    #[test]
    fn monotonize_raises_dips_to_running_max() {
        let t = thresholds(&[(0, 0.0), (1, 500.0), (2, 300.0), (3, 800.0)]).monotonized();
        assert_eq!(t.min_score_for(1), 500.0);
        assert_eq!(t.min_score_for(2), 500.0);
        assert_eq!(t.min_score_for(3), 800.0);
    }
}
