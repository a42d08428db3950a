// Core algorithm exports
pub mod filters;
pub mod location;
pub mod matcher;
pub mod scoring;

pub use filters::{budgets_overlap, is_eligible, matches_gender_preference, matches_location};
pub use location::{normalize_location, same_location};
pub use matcher::{stable_insertion_sort_by, MatchResult, Matcher};
pub use scoring::{compare_pairwise, compatibility_score, global_span, pairwise_span};
