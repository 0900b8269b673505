//! PostgreSQL user service: one `users` row per account, favourites and history as `TEXT[]`.

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};
use uuid::Uuid;

use super::{create_pool, DbPool};
use crate::auth::PasswordService;
use crate::error::ServiceError;
use crate::models::{Collection, LoginRequest, RegisterRequest, User};
use crate::services::user::{self, ServiceResult, UserService, MAX_ITEMS};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    user_name: String,
    password_hash: String,
}

/// Log the driver error and hand the client `reason` instead.
fn db_failure(e: sqlx::Error, reason: ServiceError) -> ServiceError {
    error!(error = %e, %reason, "database error");
    reason
}

fn parse_user_id(user_id: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(user_id).map_err(|_| user::unknown_user_id(user_id))
}

#[derive(Clone)]
pub struct PgUserService {
    pool: DbPool,
}

impl PgUserService {
    pub fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self::from_pool(create_pool(database_url)?))
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn items(&self, user_id: &str, collection: Collection) -> ServiceResult<Vec<String>> {
        let id = parse_user_id(user_id)?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", collection.column());
        sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_failure(e, ServiceError::new("Unable to read user data")))?
            .ok_or_else(|| user::unknown_user_id(user_id))
    }

    /// Cap check and append are one statement; a concurrent writer re-checks the
    /// cap against the locked row.
    async fn add_item(
        &self,
        user_id: &str,
        collection: Collection,
        item_id: &str,
    ) -> ServiceResult<Vec<String>> {
        let id = parse_user_id(user_id)?;
        let sql = format!(
            r#"
            UPDATE users
            SET {col} = CASE WHEN $2 = ANY({col}) THEN {col} ELSE array_append({col}, $2) END
            WHERE id = $1 AND cardinality({col}) < $3
            RETURNING {col}
            "#,
            col = collection.column()
        );
        let updated = sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .bind(item_id)
            .bind(MAX_ITEMS as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_failure(e, user::list_full(collection, user_id)))?;
        if let Some(list) = updated {
            return Ok(list);
        }

        // No row updated: either the list is full or the user does not exist.
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_failure(e, user::list_full(collection, user_id)))?;
        if exists {
            Err(user::list_full(collection, user_id))
        } else {
            Err(user::unknown_user_id(user_id))
        }
    }

    async fn remove_item(
        &self,
        user_id: &str,
        collection: Collection,
        item_id: &str,
    ) -> ServiceResult<Vec<String>> {
        let id = parse_user_id(user_id)?;
        let sql = format!(
            "UPDATE users SET {col} = array_remove({col}, $2) WHERE id = $1 RETURNING {col}",
            col = collection.column()
        );
        sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_failure(e, user::list_full(collection, user_id)))?
            .ok_or_else(|| user::unknown_user_id(user_id))
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn connect(&self) -> ServiceResult<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| ServiceError::new(e.to_string()))?;
        info!("connected to PostgreSQL");
        Ok(())
    }

    async fn register_user(&self, registration: &RegisterRequest) -> ServiceResult<String> {
        if registration.password != registration.password2 {
            return Err(user::passwords_do_not_match());
        }
        let password_hash = PasswordService::hash_password(&registration.password)
            .map_err(|e| ServiceError::new(format!("There was an error creating the user: {}", e)))?;

        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (id, user_name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&registration.user_name)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_failure(e, ServiceError::new("There was an error creating the user")))?;

        match inserted {
            Some(_) => Ok(user::registered(&registration.user_name)),
            None => Err(user::user_name_taken()),
        }
    }

    async fn check_user(&self, credentials: &LoginRequest) -> ServiceResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, user_name, password_hash FROM users WHERE user_name = $1",
        )
        .bind(&credentials.user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_failure(e, user::unknown_user_name(&credentials.user_name)))?
        .ok_or_else(|| user::unknown_user_name(&credentials.user_name))?;

        let matches = PasswordService::verify_password(&credentials.password, &row.password_hash)
            .map_err(|_| user::wrong_password(&credentials.user_name))?;
        if !matches {
            return Err(user::wrong_password(&credentials.user_name));
        }

        Ok(User {
            id: row.id.to_string(),
            user_name: row.user_name,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_surface_as_the_domain_reason() {
        let reason = user::unknown_user_name("alice");
        let surfaced = db_failure(sqlx::Error::PoolTimedOut, reason.clone());
        assert_eq!(surfaced, reason);
        assert_eq!(surfaced.reason, "Unable to find user alice");
    }

    #[test]
    fn non_uuid_ids_are_unknown_users() {
        assert_eq!(
            parse_user_id("u1").unwrap_err().reason,
            "Unable to find user with id: u1"
        );
    }
}
