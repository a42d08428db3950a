use crate::core::{
    filters::is_eligible,
    scoring::{compare_pairwise, compatibility_score, global_span},
};
use crate::models::{Profile, ScoringWeights, SpanNormalization};
use std::cmp::Ordering;

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Eligible candidates, best first
    pub matches: Vec<Profile>,
    /// Number of eligible candidates
    pub total: usize,
    /// Requester's own location as entered, empty when unset
    pub requester_location: String,
    /// Candidates dropped because they lack fields the filter needs
    pub skipped: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Identity exclusion and malformed-record skip
/// 2. Eligibility filtering (location, gender preference, budget)
/// 3. Scoring and ranking
/// 4. Result assembly
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    normalization: SpanNormalization,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, normalization: SpanNormalization) -> Self {
        Self {
            weights,
            normalization,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), SpanNormalization::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn normalization(&self) -> SpanNormalization {
        self.normalization
    }

    /// Find eligible roommates for `requester` in `candidates`
    ///
    /// The pool is consumed as a snapshot; no profile is modified. Candidates
    /// missing a location, a budget bound or a gender preference are skipped
    /// rather than failing the whole computation.
    pub fn find_matches(&self, requester: &Profile, candidates: Vec<Profile>) -> MatchResult {
        let pool_size = candidates.len();
        let mut skipped = 0;

        let mut eligible: Vec<Profile> = candidates
            .into_iter()
            // Stage 1: identity exclusion + malformed skip
            .filter(|candidate| candidate.id != requester.id)
            .filter(|candidate| {
                let missing = candidate.missing_match_fields();
                if missing.is_empty() {
                    return true;
                }
                tracing::warn!(
                    "Skipping malformed candidate {} (missing: {})",
                    candidate.id,
                    missing.join(", ")
                );
                skipped += 1;
                false
            })
            // Stage 2: hard constraints
            .filter(|candidate| is_eligible(candidate, requester))
            .collect();

        // Stage 3: ranking
        self.rank(requester, &mut eligible);

        tracing::debug!(
            "Ranked {} eligible of {} candidates for {} ({} skipped, {:?} normalization)",
            eligible.len(),
            pool_size,
            requester.id,
            skipped,
            self.normalization
        );

        MatchResult {
            total: eligible.len(),
            matches: eligible,
            requester_location: requester.internship_location.clone().unwrap_or_default(),
            skipped,
        }
    }

    /// Sort eligible candidates best first, keeping pool order on ties
    pub fn rank(&self, requester: &Profile, eligible: &mut Vec<Profile>) {
        match self.normalization {
            SpanNormalization::Pairwise => {
                stable_insertion_sort_by(eligible, |a, b| {
                    compare_pairwise(a, b, requester, &self.weights)
                });
            }
            SpanNormalization::Global => {
                let span = global_span(requester, eligible);
                let mut scored: Vec<(f64, Profile)> = eligible
                    .drain(..)
                    .map(|candidate| {
                        let score = compatibility_score(&candidate, requester, span, &self.weights);
                        (score, candidate)
                    })
                    .collect();

                scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
                eligible.extend(scored.into_iter().map(|(_, candidate)| candidate));
            }
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Stable insertion sort that tolerates a non-transitive comparator
///
/// The pairwise comparator re-derives its denominator for every pair, so it
/// is not guaranteed to be a total order; `slice::sort_by` may panic on such
/// input. Pools are capped at a few hundred profiles, so quadratic is fine.
pub fn stable_insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GenderPreference};

    fn create_candidate(id: &str, location: &str, budget: (i64, i64), company: &str) -> Profile {
        Profile {
            id: id.to_string(),
            full_name: Some(format!("User {}", id)),
            internship_location: Some(location.to_string()),
            internship_company: Some(company.to_string()),
            gender: Some(Gender::Female),
            preferred_gender: Some(GenderPreference::NoPreference),
            price_range_min: Some(budget.0),
            price_range_max: Some(budget.1),
            ..Default::default()
        }
    }

    fn create_requester() -> Profile {
        Profile {
            id: "current_user".to_string(),
            internship_location: Some("NYC".to_string()),
            internship_company: Some("Acme".to_string()),
            gender: Some(Gender::Male),
            preferred_gender: Some(GenderPreference::NoPreference),
            price_range_min: Some(1000),
            price_range_max: Some(1500),
            ..Default::default()
        }
    }

    fn ids(result: &MatchResult) -> Vec<&str> {
        result.matches.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let candidates = vec![
            create_candidate("1", "New York", (1200, 1800), "Globex"), // Eligible
            create_candidate("2", "Seattle", (1200, 1800), "Globex"),  // Wrong city
            create_candidate("3", "nyc", (1600, 2000), "Globex"),      // No budget overlap
        ];

        let result = matcher.find_matches(&requester, candidates);

        assert_eq!(ids(&result), vec!["1"]);
        assert_eq!(result.total, 1);
        assert_eq!(result.requester_location, "NYC");
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_matches_sorted_by_budget_overlap() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let candidates = vec![
            create_candidate("narrow", "NYC", (1400, 2000), "Globex"),
            create_candidate("exact", "NYC", (1000, 1500), "Globex"),
            create_candidate("mid", "NYC", (1200, 1700), "Globex"),
        ];

        let result = matcher.find_matches(&requester, candidates);

        assert_eq!(ids(&result), vec!["exact", "mid", "narrow"]);
    }

    #[test]
    fn test_employer_bonus_breaks_tie() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let candidates = vec![
            create_candidate("stranger", "NYC", (1100, 1600), "Globex"),
            create_candidate("colleague", "NYC", (1100, 1600), "Acme"),
        ];

        let result = matcher.find_matches(&requester, candidates);

        assert_eq!(ids(&result), vec!["colleague", "stranger"]);
    }

    #[test]
    fn test_ties_keep_pool_order() {
        for normalization in [SpanNormalization::Pairwise, SpanNormalization::Global] {
            let matcher = Matcher::new(ScoringWeights::default(), normalization);
            let requester = create_requester();

            let candidates: Vec<Profile> = (0..10)
                .map(|i| create_candidate(&i.to_string(), "NYC", (1000, 1500), "Globex"))
                .collect();

            let result = matcher.find_matches(&requester, candidates);

            let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
            assert_eq!(ids(&result), expected, "{:?} lost pool order", normalization);
        }
    }

    #[test]
    fn test_requester_excluded_from_pool() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let result = matcher.find_matches(&requester, vec![requester.clone()]);

        assert!(result.matches.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_malformed_candidates_skipped() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let mut no_location = create_candidate("a", "NYC", (1000, 1500), "Globex");
        no_location.internship_location = None;
        let mut no_budget = create_candidate("b", "NYC", (1000, 1500), "Globex");
        no_budget.price_range_min = None;
        let fine = create_candidate("c", "NYC", (1000, 1500), "Globex");

        let result = matcher.find_matches(&requester, vec![no_location, no_budget, fine]);

        assert_eq!(ids(&result), vec!["c"]);
        assert_eq!(result.skipped, 2);
    }

    #[test]
    fn test_missing_preference_counts_as_skipped() {
        let matcher = Matcher::with_default_weights();
        let requester = create_requester();

        let mut undecided = create_candidate("a", "NYC", (1000, 1500), "Globex");
        undecided.preferred_gender = None;
        let fine = create_candidate("b", "NYC", (1000, 1500), "Globex");

        let result = matcher.find_matches(&requester, vec![undecided, fine]);

        assert_eq!(ids(&result), vec!["b"]);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_empty_pool() {
        let matcher = Matcher::with_default_weights();
        let result = matcher.find_matches(&create_requester(), vec![]);

        assert!(result.matches.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_global_normalization_orders_by_score() {
        let matcher = Matcher::new(ScoringWeights::default(), SpanNormalization::Global);
        let requester = create_requester();

        let candidates = vec![
            create_candidate("narrow", "NYC", (1400, 2000), "Acme"),
            create_candidate("exact", "NYC", (1000, 1500), "Globex"),
            create_candidate("wide", "NYC", (500, 3000), "Globex"),
        ];

        let result = matcher.find_matches(&requester, candidates);

        let span = global_span(&requester, &result.matches);
        let scores: Vec<f64> = result
            .matches
            .iter()
            .map(|p| compatibility_score(p, &requester, span, matcher.weights()))
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "scores not descending: {:?}", scores);
        }
    }

    #[test]
    fn test_insertion_sort_is_stable() {
        let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        stable_insertion_sort_by(&mut items, |x, y| x.0.cmp(&y.0));
        assert_eq!(items, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }
}
