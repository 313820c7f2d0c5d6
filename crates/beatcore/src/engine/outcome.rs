use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Resolution of a single note in the current run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoteOutcome {
    #[default]
    Pending,
    Hit,
    Missed,
}

/// Per-run outcome of every chart note, indexed like the chart
///
/// A note is resolved at most once per pass; resolving an already resolved
/// note is ignored and reported as `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteOutcomes {
    outcomes: Vec<NoteOutcome>,
}

impl NoteOutcomes {
    pub fn new(len: usize) -> Self {
        Self {
            outcomes: vec![NoteOutcome::Pending; len],
        }
    }

    pub fn get(&self, index: usize) -> NoteOutcome {
        self.outcomes
            .get(index)
            .copied()
            .unwrap_or(NoteOutcome::Pending)
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.get(index) == NoteOutcome::Pending
    }

    pub fn mark_hit(&mut self, index: usize) -> bool {
        self.resolve(index, NoteOutcome::Hit)
    }

    pub fn mark_missed(&mut self, index: usize) -> bool {
        self.resolve(index, NoteOutcome::Missed)
    }

    fn resolve(&mut self, index: usize, outcome: NoteOutcome) -> bool {
        match self.outcomes.get_mut(index) {
            Some(slot) if *slot == NoteOutcome::Pending => {
                *slot = outcome;
                true
            }
            _ => false,
        }
    }

    /// Set every note back to pending
    pub fn clear(&mut self) {
        self.outcomes.fill(NoteOutcome::Pending);
    }

    pub fn count(&self, outcome: NoteOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = NoteOutcome> + '_ {
        self.outcomes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_resolves_once() {
        let mut outcomes = NoteOutcomes::new(2);
        assert!(outcomes.mark_hit(0));
        assert!(!outcomes.mark_missed(0));
        assert_eq!(outcomes.get(0), NoteOutcome::Hit);
        assert!(outcomes.is_pending(1));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut outcomes = NoteOutcomes::new(1);
        assert!(!outcomes.mark_hit(5));
        assert_eq!(outcomes.get(5), NoteOutcome::Pending);
    }

    #[test]
    fn test_clear_and_count() {
        let mut outcomes = NoteOutcomes::new(3);
        outcomes.mark_hit(0);
        outcomes.mark_missed(2);
        assert_eq!(outcomes.count(NoteOutcome::Hit), 1);
        assert_eq!(outcomes.count(NoteOutcome::Missed), 1);

        outcomes.clear();
        assert_eq!(outcomes.count(NoteOutcome::Pending), 3);
        assert_eq!(NoteOutcome::Missed.to_string(), "missed");
    }
}
