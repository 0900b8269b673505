//! User-data service contract: accounts, favourites, history.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{Collection, LoginRequest, RegisterRequest, User};

/// Longest a favourites or history list may grow.
pub const MAX_ITEMS: usize = 50;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Persistence behind the HTTP API. Failures carry a human-readable reason
/// that handlers return to the client unchanged.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Must succeed before the server starts accepting requests.
    async fn connect(&self) -> ServiceResult<()>;

    async fn register_user(&self, registration: &RegisterRequest) -> ServiceResult<String>;

    async fn check_user(&self, credentials: &LoginRequest) -> ServiceResult<User>;

    async fn get_favourites(&self, user_id: &str) -> ServiceResult<Vec<String>>;

    async fn add_favourite(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>>;

    async fn remove_favourite(&self, user_id: &str, item_id: &str)
        -> ServiceResult<Vec<String>>;

    async fn get_history(&self, user_id: &str) -> ServiceResult<Vec<String>>;

    async fn add_history(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>>;

    async fn remove_history(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>>;
}

pub(crate) fn passwords_do_not_match() -> ServiceError {
    ServiceError::new("Passwords do not match")
}

pub(crate) fn user_name_taken() -> ServiceError {
    ServiceError::new("User Name already taken")
}

pub(crate) fn registered(user_name: &str) -> String {
    format!("User {} successfully registered", user_name)
}

pub(crate) fn unknown_user_name(user_name: &str) -> ServiceError {
    ServiceError::new(format!("Unable to find user {}", user_name))
}

pub(crate) fn wrong_password(user_name: &str) -> ServiceError {
    ServiceError::new(format!("Incorrect password for user {}", user_name))
}

pub(crate) fn unknown_user_id(user_id: &str) -> ServiceError {
    ServiceError::new(format!("Unable to find user with id: {}", user_id))
}

pub(crate) fn list_full(collection: Collection, user_id: &str) -> ServiceError {
    ServiceError::new(format!(
        "Unable to update {} for user with id: {}",
        collection, user_id
    ))
}
