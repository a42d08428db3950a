use crate::models::{BudgetRange, Profile, ScoringWeights};
use std::cmp::Ordering;

/// Budget closeness of a candidate relative to the requester
///
/// `min(candidate.max - requester.min, requester.max - candidate.min)`.
/// Non-negative whenever the two intervals overlap.
#[inline]
pub fn budget_overlap(candidate: &BudgetRange, requester: &BudgetRange) -> i64 {
    (candidate.max - requester.min).min(requester.max - candidate.min)
}

/// Widest span among the given budgets, 0 when none are known
pub fn max_span<I>(budgets: I) -> i64
where
    I: IntoIterator<Item = Option<BudgetRange>>,
{
    budgets
        .into_iter()
        .flatten()
        .map(|b| b.span())
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Denominator for comparing `a` against `b`
#[inline]
pub fn pairwise_span(requester: &Profile, a: &Profile, b: &Profile) -> i64 {
    max_span([requester.budget(), a.budget(), b.budget()])
}

/// Denominator shared by a whole result set
pub fn global_span(requester: &Profile, candidates: &[Profile]) -> i64 {
    max_span(std::iter::once(requester.budget()).chain(candidates.iter().map(Profile::budget)))
}

/// Bonus for interning at the same company (exact, case-sensitive)
///
/// Profiles without a company never share one.
#[inline]
pub fn employer_bonus(candidate: &Profile, requester: &Profile, weights: &ScoringWeights) -> f64 {
    match (candidate.company(), requester.company()) {
        (Some(c), Some(r)) if c == r => weights.employer,
        _ => 0.0,
    }
}

/// Ranking-only compatibility score
///
/// score = overlap / span * weights.budget + employer bonus
///
/// The value only means something relative to other candidates scored with
/// the same `span`.
pub fn compatibility_score(
    candidate: &Profile,
    requester: &Profile,
    span: i64,
    weights: &ScoringWeights,
) -> f64 {
    let budget_score = match (candidate.budget(), requester.budget()) {
        (Some(c), Some(r)) if span > 0 => {
            (budget_overlap(&c, &r) as f64 / span as f64) * weights.budget
        }
        _ => 0.0,
    };

    budget_score + employer_bonus(candidate, requester, weights)
}

/// Order two candidates, best first, normalizing by the pair's own span
pub fn compare_pairwise(
    a: &Profile,
    b: &Profile,
    requester: &Profile,
    weights: &ScoringWeights,
) -> Ordering {
    let span = pairwise_span(requester, a, b);
    let score_a = compatibility_score(a, requester, span, weights);
    let score_b = compatibility_score(b, requester, span, weights);

    score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
}
