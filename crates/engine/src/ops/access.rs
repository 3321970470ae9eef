//! User lookup and the single admin capability predicate.
//!
//! Authorization is decided here, at the operation boundary, instead of
//! being re-derived inline in every handler.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{EngineError, FieldErrors, ResultEngine, users};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn require_admin(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        let user = self.require_user(db, username).await?;
        if !user.is_admin {
            return Err(EngineError::Forbidden("admin access required".to_string()));
        }
        Ok(user)
    }

    /// Verifies a username/password pair against the users table.
    ///
    /// Returns `None` for an unknown user or a wrong password; the caller
    /// only learns that authentication failed.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Option<users::Model>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        Ok(user.filter(|user| user.password == password))
    }

    /// Creates a regular (non-admin) user account.
    pub async fn register_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        let mut errors = FieldErrors::new();
        let username = super::normalize_required_text(username, "username", &mut errors);
        if password.trim().is_empty() {
            errors.push("password", "must not be empty");
        }
        errors.into_result()?;

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(username.clone()));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password.to_string()),
                is_admin: ActiveValue::Set(false),
            };
            user.insert(&db_tx).await?;
            tracing::info!("registered user {username}");
            Ok(())
        })
    }
}
