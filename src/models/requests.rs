use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::ProfileUpdate;

/// Request to find matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to connect with a matched roommate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Request to create a profile at sign-up
///
/// The id is normally the auth user id; one is generated when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub id: Option<String>,
    #[validate(nested)]
    #[serde(flatten)]
    pub fields: ProfileUpdate,
}
