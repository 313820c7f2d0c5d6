use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Accumulated outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub committed_score: i64,
    pub combo: u32,
    pub max_combo: u32,
    /// Score multiplier, always at least 1
    pub multiplier: i32,
    /// Star power meter in `[0, 1]`
    pub star_power_amount: f64,
    pub star_power_active: bool,
    pub notes_hit: u32,
    pub notes_missed: u32,
    pub star_power_phrases_hit: u32,
    /// Fractional star rating, `0.0..=6.0`
    pub stars: f64,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            committed_score: 0,
            combo: 0,
            max_combo: 0,
            multiplier: 1,
            star_power_amount: 0.0,
            star_power_active: false,
            notes_hit: 0,
            notes_missed: 0,
            star_power_phrases_hit: 0,
            stars: 0.0,
        }
    }
}

impl BaseStats {
    /// Extend the combo by one, tracking the best combo
    pub fn increment_combo(&mut self) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Instrument statistics built around [`BaseStats`]
pub trait EngineStats: Debug + Clone + Default + Serialize {
    fn base(&self) -> &BaseStats;

    fn base_mut(&mut self) -> &mut BaseStats;

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_multiplier_is_one() {
        assert_eq!(BaseStats::default().multiplier, 1);
    }

    #[test]
    fn test_increment_combo_tracks_max() {
        let mut stats = BaseStats::default();
        stats.increment_combo();
        stats.increment_combo();
        stats.combo = 0;
        stats.increment_combo();

        assert_eq!(stats.combo, 1);
        assert_eq!(stats.max_combo, 2);
    }
}
