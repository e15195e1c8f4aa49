//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{KataId, UserId};
use kernel::query::Page;
use serde::{Deserialize, Serialize};

use crate::domain::entity::kata::Kata;
use crate::domain::value_object::{kata_level::KataLevel, kata_stars::KataStars};

// ============================================================================
// Query strings
// ============================================================================

/// `?id&page&limit&order&level`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KatasQuery {
    pub id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub level: Option<String>,
}

/// `?id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KataIdQuery {
    pub id: Option<String>,
}

/// `?id&filename`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileQuery {
    pub id: Option<String>,
    pub filename: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

/// Everything but `name` falls back to a default
#[derive(Debug, Clone, Deserialize)]
pub struct CreateKataRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub intents: Option<i64>,
    pub solution: Option<String>,
    pub participants: Option<Vec<UserId>>,
}

/// Full replacement: every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateKataRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub intents: Option<i64>,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateKataRequest {
    pub stars: Option<f64>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KataResponse {
    pub id: KataId,
    pub name: String,
    pub description: String,
    pub level: KataLevel,
    pub intents: i32,
    pub stars: KataStars,
    pub creator: UserId,
    pub solution: String,
    pub participants: Vec<UserId>,
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Kata> for KataResponse {
    fn from(kata: Kata) -> Self {
        Self {
            id: kata.kata_id,
            name: kata.name.into_db(),
            description: kata.description,
            level: kata.level,
            intents: kata.intents,
            stars: kata.stars,
            creator: kata.creator,
            solution: kata.solution,
            participants: kata.participants,
            files: kata.files,
            created_at: kata.created_at,
            updated_at: kata.updated_at,
        }
    }
}

/// Paged katas
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KatasPageResponse {
    pub katas: Vec<KataResponse>,
    pub total_pages: u64,
    pub current_page: u64,
}

impl From<Page<Kata>> for KatasPageResponse {
    fn from(page: Page<Kata>) -> Self {
        let page = page.map(KataResponse::from);
        Self {
            katas: page.items,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

/// Katas created by one user, keyed by the user's email
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKatasResponse {
    pub user: String,
    pub katas: Vec<KataResponse>,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KataCreatedResponse {
    pub message: String,
    pub id: KataId,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarsResponse {
    pub message: String,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantsResponse {
    pub message: String,
    pub participants: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesResponse {
    pub message: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
