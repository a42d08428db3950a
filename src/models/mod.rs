// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BudgetRange, Gender, GenderPreference, ParseEnumError, Profile, ProfileUpdate, ScoringWeights,
    SpanNormalization,
};
pub use requests::{ConnectRequest, CreateProfileRequest, FindMatchesRequest};
pub use responses::{ConnectResponse, ErrorResponse, FindMatchesResponse, HealthResponse};
