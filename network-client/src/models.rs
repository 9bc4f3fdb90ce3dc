use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of posts the backend returns per page.
pub const PAGE_SIZE: u32 = 10;

// ==================== Модели пользователей ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub follower_count: i64,
    #[serde(default)]
    pub following_count: i64,
    pub date_joined: DateTime<Utc>,
}

/// The part of a [`User`] kept for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ==================== Модели постов ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// Author id.
    pub user: i64,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub is_liked: bool,
}

impl Post {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%b %d %Y, %I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostContent {
    pub content: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(alias = "items")]
    pub results: Vec<T>,
}

pub type PostsPage = Paginated<Post>;

// ==================== Общие ответы ====================

/// Error body of the backend. `detail` is either a message or, for schema
/// validation failures, a list of per-field errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub msg: Option<String>,
}

impl ErrorDetail {
    /// The text to show a user, if there is any.
    pub fn message(self) -> Option<String> {
        let message = match self {
            ErrorDetail::Message(message) => message.trim().to_string(),
            ErrorDetail::Fields(fields) => fields
                .into_iter()
                .filter_map(|f| f.msg)
                .collect::<Vec<_>>()
                .join("; "),
        };
        (!message.is_empty()).then_some(message)
    }
}
