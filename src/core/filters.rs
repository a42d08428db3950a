use crate::core::location::same_location;
use crate::models::Profile;

/// Check that the candidate interns in the same (normalized) city
///
/// An absent or empty location on either side fails.
#[inline]
pub fn matches_location(candidate: &Profile, requester: &Profile) -> bool {
    match (candidate.location(), requester.location()) {
        (Some(c), Some(r)) => same_location(c, r),
        _ => false,
    }
}

/// Check that the candidate would accept the requester as a roommate
///
/// Only the candidate's preference is consulted. A candidate without a
/// preference is never treated as accepting everyone.
#[inline]
pub fn matches_gender_preference(candidate: &Profile, requester: &Profile) -> bool {
    candidate
        .preferred_gender
        .map_or(false, |pref| pref.accepts(requester.gender))
}

/// Check that the two closed budget intervals overlap
#[inline]
pub fn budgets_overlap(candidate: &Profile, requester: &Profile) -> bool {
    match (candidate.budget(), requester.budget()) {
        (Some(c), Some(r)) => c.overlaps(&r),
        _ => false,
    }
}

/// All hard constraints, plus exclusion of the requester itself
#[inline]
pub fn is_eligible(candidate: &Profile, requester: &Profile) -> bool {
    if candidate.id == requester.id {
        return false;
    }

    matches_location(candidate, requester)
        && matches_gender_preference(candidate, requester)
        && budgets_overlap(candidate, requester)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GenderPreference};

    fn create_test_profile(
        id: &str,
        location: &str,
        preferred: GenderPreference,
        budget: (i64, i64),
    ) -> Profile {
        Profile {
            id: id.to_string(),
            internship_location: Some(location.to_string()),
            gender: Some(Gender::Female),
            preferred_gender: Some(preferred),
            price_range_min: Some(budget.0),
            price_range_max: Some(budget.1),
            ..Default::default()
        }
    }

    fn create_requester() -> Profile {
        Profile {
            id: "requester".to_string(),
            internship_location: Some("NYC".to_string()),
            gender: Some(Gender::Male),
            preferred_gender: Some(GenderPreference::NoPreference),
            price_range_min: Some(1000),
            price_range_max: Some(1500),
            ..Default::default()
        }
    }

    #[test]
    fn test_eligible_candidate() {
        let requester = create_requester();
        let candidate = create_test_profile(
            "c1",
            "New York",
            GenderPreference::Only(Gender::Male),
            (1200, 1800),
        );

        assert!(is_eligible(&candidate, &requester));
    }

    #[test]
    fn test_gender_preference_mismatch() {
        let requester = create_requester();
        let candidate = create_test_profile(
            "c2",
            "nyc",
            GenderPreference::Only(Gender::Female),
            (1000, 1500),
        );

        assert!(!matches_gender_preference(&candidate, &requester));
        assert!(!is_eligible(&candidate, &requester));
    }

    #[test]
    fn test_budget_without_overlap() {
        let requester = create_requester();
        let candidate = create_test_profile(
            "c3",
            "NYC",
            GenderPreference::NoPreference,
            (1600, 2000),
        );

        assert!(!budgets_overlap(&candidate, &requester));
    }

    #[test]
    fn test_location_mismatch() {
        let requester = create_requester();
        let candidate = create_test_profile(
            "c4",
            "Seattle, WA",
            GenderPreference::NoPreference,
            (1000, 1500),
        );

        assert!(!matches_location(&candidate, &requester));
    }

    #[test]
    fn test_absent_fields_fail_their_constraint() {
        let requester = create_requester();
        let mut candidate = create_test_profile(
            "c5",
            "NYC",
            GenderPreference::NoPreference,
            (1000, 1500),
        );
        candidate.preferred_gender = None;
        assert!(!matches_gender_preference(&candidate, &requester));

        candidate.preferred_gender = Some(GenderPreference::NoPreference);
        candidate.internship_location = Some(String::new());
        assert!(!matches_location(&candidate, &requester));

        candidate.internship_location = Some("NYC".to_string());
        candidate.price_range_max = None;
        assert!(!budgets_overlap(&candidate, &requester));
    }

    #[test]
    fn test_requester_without_gender_only_meets_no_preference() {
        let mut requester = create_requester();
        requester.gender = None;

        let open = create_test_profile("c6", "NYC", GenderPreference::NoPreference, (1000, 1500));
        let picky = create_test_profile(
            "c7",
            "NYC",
            GenderPreference::Only(Gender::Male),
            (1000, 1500),
        );

        assert!(matches_gender_preference(&open, &requester));
        assert!(!matches_gender_preference(&picky, &requester));
    }

    #[test]
    fn test_requester_excluded() {
        let requester = create_requester();
        let mut twin = requester.clone();
        twin.preferred_gender = Some(GenderPreference::NoPreference);

        assert!(!is_eligible(&twin, &requester));
    }
}
