//! NestMates Matcher - roommate matching service for interns
//!
//! This library provides the eligibility filter and compatibility ranking used
//! to suggest roommates, plus the profile store adapters it reads from.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{normalize_location, MatchResult, Matcher};
pub use models::{FindMatchesResponse, Gender, GenderPreference, Profile, ProfileUpdate, ScoringWeights, SpanNormalization};
pub use services::{MatchError, MatchService, ProfileStore, StoreContext, StoreError};
