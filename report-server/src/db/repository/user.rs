//! User Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate, UserRole, UserUpdate};
use shared::util::now_millis;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, payload: UserCreate) -> RepoResult<User> {
        let username = payload.username.trim().to_lowercase();
        if username.is_empty() {
            return Err(RepoError::Validation("Username is required".to_string()));
        }
        if self.find_by_username(&username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{username}' already exists"
            )));
        }

        let hash_pass = User::hash_password(&payload.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        let display_name = payload
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| username.clone());

        // hash_pass is skip_serializing on the model, so the record is
        // written with explicit SET bindings
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    display_name = $display_name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_active = true,
                    created_at = $created_at"#,
            )
            .bind(("username", username))
            .bind(("display_name", display_name))
            .bind(("email", payload.email.filter(|e| !e.trim().is_empty())))
            .bind(("hash_pass", hash_pass))
            .bind(("role", payload.role))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Vec<User> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = self.base.parse_id(id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_lowercase()))
            .await?;

        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY username ASC")
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    pub async fn update(&self, id: &str, payload: UserUpdate) -> RepoResult<User> {
        let record_id = self.base.parse_id(id)?;

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))?;

        // The owner account cannot be demoted or disabled
        if existing.role == UserRole::Owner {
            if payload.role.is_some_and(|r| r != UserRole::Owner) {
                return Err(RepoError::Validation(
                    "The owner account cannot change role".to_string(),
                ));
            }
            if payload.is_active == Some(false) {
                return Err(RepoError::Validation(
                    "The owner account cannot be deactivated".to_string(),
                ));
            }
        }

        let mut data = serde_json::Map::new();
        if let Some(username) = &payload.username {
            let username = username.trim().to_lowercase();
            if username.is_empty() {
                return Err(RepoError::Validation("Username is required".to_string()));
            }
            if let Some(other) = self.find_by_username(&username).await?
                && other.id.as_ref() != Some(&record_id)
            {
                return Err(RepoError::Duplicate(format!(
                    "Username '{username}' already exists"
                )));
            }
            data.insert("username".to_string(), username.into());
        }
        if let Some(password) = &payload.password {
            let hash = User::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
            data.insert("hash_pass".to_string(), hash.into());
        }
        if let Some(display_name) = &payload.display_name {
            data.insert("display_name".to_string(), display_name.clone().into());
        }
        if let Some(email) = &payload.email {
            data.insert("email".to_string(), email.clone().into());
        }
        if let Some(role) = payload.role {
            data.insert("role".to_string(), role.as_str().into());
        }
        if let Some(is_active) = payload.is_active {
            data.insert("is_active".to_string(), is_active.into());
        }

        if data.is_empty() {
            return Ok(existing);
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", record_id))
            .bind(("data", serde_json::Value::Object(data)))
            .await?;

        let updated: Vec<User> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    /// Delete a user, re-parenting every report they created to
    /// `transfer_to` in the same transaction. The caller decides
    /// whether a transfer target is required.
    pub async fn delete_with_transfer(
        &self,
        id: &str,
        transfer_to: Option<&str>,
    ) -> RepoResult<u64> {
        let record_id = self.base.parse_id(id)?;

        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))?;
        if user.role == UserRole::Owner {
            return Err(RepoError::Validation(
                "The owner account cannot be deleted".to_string(),
            ));
        }

        match transfer_to {
            Some(target) => {
                let target_id = self.base.parse_id(target)?;
                if target_id == record_id {
                    return Err(RepoError::Validation(
                        "Cannot transfer reports to the user being deleted".to_string(),
                    ));
                }
                let target_user = self
                    .find_by_id(target)
                    .await?
                    .ok_or_else(|| RepoError::NotFound("Transfer target not found".to_string()))?;
                if !target_user.is_active {
                    return Err(RepoError::Validation(
                        "Transfer target is deactivated".to_string(),
                    ));
                }
                if !target_user.role.is_admin() {
                    return Err(RepoError::Validation(
                        "Transfer target must be an admin".to_string(),
                    ));
                }

                let mut result = self
                    .base
                    .db()
                    .query(
                        r#"
                        BEGIN TRANSACTION;
                        LET $moved = UPDATE daily_report SET created_by = $to WHERE created_by = $from;
                        DELETE $user;
                        RETURN count($moved);
                        COMMIT TRANSACTION;
                        "#,
                    )
                    .bind(("from", record_id.to_string()))
                    .bind(("to", target_id.to_string()))
                    .bind(("user", record_id))
                    .await?;

                let moved: Option<u64> = result.take(result.num_statements() - 1)?;
                Ok(moved.unwrap_or(0))
            }
            None => {
                let mut result = self
                    .base
                    .db()
                    .query("RETURN count(SELECT VALUE id FROM daily_report WHERE created_by = $from)")
                    .bind(("from", record_id.to_string()))
                    .await?;
                let count: Option<u64> = result.take(0)?;
                if count.unwrap_or(0) > 0 {
                    return Err(RepoError::Validation(
                        "User has reports; a transfer target is required".to_string(),
                    ));
                }

                let _deleted: Option<User> = self.base.db().delete(record_id).await?;
                Ok(0)
            }
        }
    }
}
