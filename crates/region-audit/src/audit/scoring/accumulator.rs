use indexmap::IndexMap;
use std::cmp::Ordering;

use super::round_to;

/// Weighted vote tally keyed by region, remembering first-seen order.
///
/// `max_weight` grows with every evaluated source, matched or not, so the
/// leader's share of it doubles as a confidence measure.
#[derive(Debug, Clone, Default)]
pub struct ScoringAccumulator {
    scores: IndexMap<String, f64>,
    max_weight: f64,
}

impl ScoringAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `weight` to `region` and to the total weight in play.
    pub fn add(&mut self, region: &str, weight: f64) {
        *self.scores.entry(region.to_string()).or_insert(0.0) += weight;
        self.max_weight += weight;
    }

    /// Record a source that was evaluated but named no region.
    pub fn miss(&mut self, weight: f64) {
        self.max_weight += weight;
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn score(&self, region: &str) -> Option<f64> {
        self.scores.get(region).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest-scoring region; ties go to whichever region was seen first.
    pub fn leader(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (region, score) in &self.scores {
            if best.map_or(true, |(_, leading)| *score > leading) {
                best = Some((region.as_str(), *score));
            }
        }
        best
    }

    /// Leader's share of the total weight, capped at 1.0 and rounded to 2 places.
    pub fn leader_confidence(&self) -> f64 {
        let Some((_, score)) = self.leader() else {
            return 0.0;
        };

        let share = if self.max_weight > 0.0 {
            score / self.max_weight
        } else {
            score
        };
        round_to(share.clamp(0.0, 1.0), 2)
    }

    /// Scores rounded to 3 places, highest first. Equal scores keep first-seen order.
    pub fn breakdown(&self) -> IndexMap<String, f64> {
        let mut entries: Vec<(&String, &f64)> = self.scores.iter().collect();
        entries.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(Ordering::Equal));
        entries
            .into_iter()
            .map(|(region, score)| (region.clone(), round_to(*score, 3)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misses_only_grow_the_denominator() {
        let mut acc = ScoringAccumulator::new();
        acc.add("DE", 1.0);
        acc.miss(1.0);

        assert_eq!(acc.score("DE"), Some(1.0));
        assert!((acc.max_weight() - 2.0).abs() < f64::EPSILON);
        assert_eq!(acc.leader_confidence(), 0.5);
    }

    #[test]
    fn ties_resolve_to_first_seen_region() {
        let mut acc = ScoringAccumulator::new();
        acc.add("FR", 0.3);
        acc.add("DE", 0.3);

        assert_eq!(acc.leader().map(|(region, _)| region), Some("FR"));
        let binding = acc.breakdown();
        let order: Vec<&str> = binding.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["FR", "DE"]);
    }

    #[test]
    fn breakdown_sorts_descending() {
        let mut acc = ScoringAccumulator::new();
        acc.add("US", 0.4);
        acc.add("DE", 1.0);
        acc.add("US", 0.3);

        let breakdown = acc.breakdown();
        let order: Vec<(&str, f64)> = breakdown
            .iter()
            .map(|(region, score)| (region.as_str(), *score))
            .collect();
        assert_eq!(order, vec![("DE", 1.0), ("US", 0.7)]);
    }

    #[test]
    fn empty_accumulator_has_no_confidence() {
        let mut acc = ScoringAccumulator::new();
        acc.miss(3.0);
        assert!(acc.leader().is_none());
        assert_eq!(acc.leader_confidence(), 0.0);
    }
}
