//! In-process user service: used when no `DATABASE_URL` is configured, and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::PasswordService;
use crate::error::ServiceError;
use crate::models::{Collection, LoginRequest, RegisterRequest, User};
use crate::services::user::{self, ServiceResult, UserService, MAX_ITEMS};

#[derive(Debug, Clone)]
struct UserRecord {
    id: String,
    user_name: String,
    password_hash: String,
    favourites: Vec<String>,
    history: Vec<String>,
}

impl UserRecord {
    fn list_mut(&mut self, collection: Collection) -> &mut Vec<String> {
        match collection {
            Collection::Favourites => &mut self.favourites,
            Collection::History => &mut self.history,
        }
    }
}

/// Users keyed by id, behind one async lock.
#[derive(Clone, Default)]
pub struct MemoryUserService {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserService {
    pub fn new() -> Self {
        Self::default()
    }

    async fn items(&self, user_id: &str, collection: Collection) -> ServiceResult<Vec<String>> {
        let users = self.users.read().await;
        let record = users
            .get(user_id)
            .ok_or_else(|| user::unknown_user_id(user_id))?;
        Ok(match collection {
            Collection::Favourites => record.favourites.clone(),
            Collection::History => record.history.clone(),
        })
    }

    async fn add_item(
        &self,
        user_id: &str,
        collection: Collection,
        item_id: &str,
    ) -> ServiceResult<Vec<String>> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(user_id)
            .ok_or_else(|| user::unknown_user_id(user_id))?;
        let list = record.list_mut(collection);
        // A full list refuses every add, including ids it already holds.
        if list.len() >= MAX_ITEMS {
            return Err(user::list_full(collection, user_id));
        }
        if !list.iter().any(|id| id == item_id) {
            list.push(item_id.to_string());
        }
        debug!(user_id = %user_id, %collection, item_id = %item_id, "item added");
        Ok(list.clone())
    }

    async fn remove_item(
        &self,
        user_id: &str,
        collection: Collection,
        item_id: &str,
    ) -> ServiceResult<Vec<String>> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(user_id)
            .ok_or_else(|| user::unknown_user_id(user_id))?;
        let list = record.list_mut(collection);
        list.retain(|id| id != item_id);
        Ok(list.clone())
    }
}

#[async_trait]
impl UserService for MemoryUserService {
    async fn connect(&self) -> ServiceResult<()> {
        warn!("using in-memory user service; data is lost on restart");
        Ok(())
    }

    async fn register_user(&self, registration: &RegisterRequest) -> ServiceResult<String> {
        if registration.password != registration.password2 {
            return Err(user::passwords_do_not_match());
        }
        let password_hash = PasswordService::hash_password(&registration.password)
            .map_err(|e| ServiceError::new(format!("There was an error creating the user: {}", e)))?;

        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.user_name == registration.user_name)
        {
            return Err(user::user_name_taken());
        }
        let id = Uuid::new_v4().to_string();
        users.insert(
            id.clone(),
            UserRecord {
                id,
                user_name: registration.user_name.clone(),
                password_hash,
                favourites: Vec::new(),
                history: Vec::new(),
            },
        );
        Ok(user::registered(&registration.user_name))
    }

    async fn check_user(&self, credentials: &LoginRequest) -> ServiceResult<User> {
        let record = {
            let users = self.users.read().await;
            users
                .values()
                .find(|u| u.user_name == credentials.user_name)
                .cloned()
                .ok_or_else(|| user::unknown_user_name(&credentials.user_name))?
        };
        let matches =
            PasswordService::verify_password(&credentials.password, &record.password_hash)
                .map_err(|_| user::wrong_password(&credentials.user_name))?;
        if !matches {
            return Err(user::wrong_password(&credentials.user_name));
        }
        Ok(User {
            id: record.id,
            user_name: record.user_name,
        })
    }

    async fn get_favourites(&self, user_id: &str) -> ServiceResult<Vec<String>> {
        self.items(user_id, Collection::Favourites).await
    }

    async fn add_favourite(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>> {
        self.add_item(user_id, Collection::Favourites, item_id).await
    }

    async fn remove_favourite(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> ServiceResult<Vec<String>> {
        self.remove_item(user_id, Collection::Favourites, item_id)
            .await
    }

    async fn get_history(&self, user_id: &str) -> ServiceResult<Vec<String>> {
        self.items(user_id, Collection::History).await
    }

    async fn add_history(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>> {
        self.add_item(user_id, Collection::History, item_id).await
    }

    async fn remove_history(&self, user_id: &str, item_id: &str) -> ServiceResult<Vec<String>> {
        self.remove_item(user_id, Collection::History, item_id).await
    }
}
