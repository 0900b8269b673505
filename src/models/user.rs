//! Request, identity and collection models for the user API.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/user/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "userName")]
    #[validate(length(min = 1, max = 255, message = "userName is required"))]
    pub user_name: String,
    #[validate(length(min = 1, max = 128, message = "password is required"))]
    pub password: String,
    /// Confirmation; compared against `password` by the user service.
    #[serde(default)]
    pub password2: String,
}

/// Body of `POST /api/user/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(rename = "userName")]
    #[validate(length(min = 1, message = "userName is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// A user as returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub user_name: String,
}

/// Identity carried inside a token. Field names match the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
        }
    }
}

/// Response of `POST /api/user/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

/// Per-user item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Favourites,
    History,
}

impl Collection {
    /// Column holding the list in the `users` table.
    pub fn column(self) -> &'static str {
        match self {
            Collection::Favourites => "favourites",
            Collection::History => "history",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
