//! User entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::{login, user as msg};
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::require_text;
use bizhub_core::validation::formats::is_valid_email;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{tenant_entity, trimmed};

/// Failed sign-ins allowed before the account locks.
pub const MAX_LOGIN_ATTEMPTS: i32 = 5;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Default role for users created through the API.
pub const DEFAULT_ROLE: &str = "user";

/// A row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub client_id: DbId,
    pub login_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_confirmed: bool,
    #[serde(skip_serializing)]
    pub confirmation_token: Option<String>,
    pub locked: bool,
    pub login_attempts: i32,
    pub last_login_at: Option<Timestamp>,
    pub role: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(User);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("login_name"),
    ColumnSpec::text("first_name"),
    ColumnSpec::text("last_name"),
    ColumnSpec::text("email"),
    ColumnSpec::text("phone"),
    ColumnSpec::text("role"),
    ColumnSpec::boolean("email_confirmed"),
    ColumnSpec::boolean("locked"),
    ColumnSpec::date("last_login_at"),
    ColumnSpec::date("created_at"),
];

/// Body of `POST /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub login_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl CreateUser {
    pub fn validate(&self) -> CoreResult<()> {
        require_text(self.login_name.as_deref(), msg::LOGIN_NAME_REQUIRED)?;
        require_text(self.first_name.as_deref(), msg::FIRST_NAME_REQUIRED)?;
        require_text(self.last_name.as_deref(), msg::LAST_NAME_REQUIRED)?;
        let email = require_text(self.email.as_deref(), msg::INVALID_EMAIL)?;
        if !is_valid_email(email) {
            return Err(CoreError::validation(msg::INVALID_EMAIL));
        }
        let password = self.password.as_deref().unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(CoreError::validation(msg::PASSWORD_TOO_SHORT));
        }
        Ok(())
    }

    /// Build the row. `password_hash` is computed by the caller.
    pub fn into_user(
        self,
        client_id: DbId,
        password_hash: String,
        actor: &str,
        now: Timestamp,
    ) -> User {
        let text = |v: Option<String>| v.unwrap_or_default().trim().to_string();
        User {
            id: 0,
            client_id,
            login_name: text(self.login_name),
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            email: text(self.email).to_lowercase(),
            phone: trimmed(&self.phone),
            password_hash,
            email_confirmed: false,
            confirmation_token: None,
            locked: false,
            login_attempts: MAX_LOGIN_ATTEMPTS,
            last_login_at: None,
            role: trimmed(&self.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}

/// Body of `PUT /users/{id}`. Login name and email cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> CoreResult<()> {
        require_text(self.first_name.as_deref(), msg::FIRST_NAME_REQUIRED)?;
        require_text(self.last_name.as_deref(), msg::LAST_NAME_REQUIRED)?;
        Ok(())
    }

    /// Copy the editable fields onto `user`. A blank role keeps the current one.
    pub fn apply_to(&self, user: &mut User) {
        let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        user.first_name = text(&self.first_name);
        user.last_name = text(&self.last_name);
        user.phone = trimmed(&self.phone);
        if let Some(role) = trimmed(&self.role) {
            user.role = role;
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub login_name: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the trimmed login name and the password as given.
    pub fn validate(&self) -> CoreResult<(&str, &str)> {
        let login_name = require_text(self.login_name.as_deref(), login::CREDENTIALS_REQUIRED)?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CoreError::validation(login::CREDENTIALS_REQUIRED))?;
        Ok((login_name, password))
    }
}

/// Body of `POST /auth/confirm-email`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmEmailRequest {
    pub user_id: Option<DbId>,
    pub token: Option<String>,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordRequest {
    pub login_name: Option<String>,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> CoreResult<&str> {
        require_text(self.login_name.as_deref(), login::RESET_LOGIN_REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request() -> CreateUser {
        CreateUser {
            login_name: Some("asha".into()),
            first_name: Some("Asha".into()),
            last_name: Some("Rao".into()),
            email: Some("Asha@Example.com".into()),
            phone: None,
            password: Some("correct-horse".into()),
            role: None,
        }
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request();
        req.password = Some("short".into());
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m == msg::PASSWORD_TOO_SHORT
        );
    }

    #[test]
    fn test_email_lowercased_and_defaults_applied() {
        let req = request();
        req.validate().unwrap();
        let user = req.into_user(3, "hash".into(), "admin", chrono::Utc::now());
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.login_attempts, MAX_LOGIN_ATTEMPTS);
        assert_eq!(user.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest {
            login_name: Some("asha".into()),
            password: Some(String::new()),
        };
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m == login::CREDENTIALS_REQUIRED
        );
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut user = request().into_user(1, "secret-hash".into(), "admin", chrono::Utc::now());
        user.confirmation_token = Some("token".into());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("confirmation_token").is_none());
    }

    #[test]
    fn test_update_keeps_role_when_blank() {
        let mut user = request().into_user(1, "hash".into(), "admin", chrono::Utc::now());
        user.role = "manager".into();
        let update = UpdateUser {
            first_name: Some(" Asha ".into()),
            last_name: Some("Menon".into()),
            phone: Some("  ".into()),
            role: Some(" ".into()),
        };
        update.validate().unwrap();
        update.apply_to(&mut user);
        assert_eq!((user.first_name.as_str(), user.last_name.as_str()), ("Asha", "Menon"));
        assert_eq!(user.phone, None);
        assert_eq!(user.role, "manager");
        assert_eq!(user.email, "asha@example.com");
    }
}
