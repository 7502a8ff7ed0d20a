//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to login. Fields are optional so that missing values can be
/// reported as a 400 instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public information about a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
    pub expires_in: i64,
}

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentity {
    pub user_id: String,
    pub username: String,
}

/// Response to `GET /auth/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user: TokenIdentity,
}

/// Query string accepted by the post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPostsQuery {
    /// `"false"` selects every post; anything else only published ones.
    pub published: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl ListPostsQuery {
    pub const DEFAULT_LIMIT: u64 = 10;

    pub fn published_only(&self) -> bool {
        self.published.as_deref() != Some("false")
    }

    /// Requested page, clamped to at least 1.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1) as u64
    }

    /// Requested page size, clamped to at least 1.
    pub fn limit(&self) -> u64 {
        self.limit.map_or(Self::DEFAULT_LIMIT, |limit| limit.max(1) as u64)
    }
}

/// Response to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Request to delete an uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteUploadRequest {
    pub filename: Option<String>,
}
