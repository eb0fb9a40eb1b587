//! Password sign-in with attempt counting and account lockout, plus the two
//! flows that run without a session: email confirmation and password reset.
//!
//! Sign-in does not mint tokens; it checks the credentials, maintains the
//! lockout counters on the user row and returns who signed in under which
//! tenant. A reset is the only way out of a locked account.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::{client as client_msg, login as msg};
use bizhub_core::integrations::OutboundEmail;
use bizhub_core::types::{DbId, TenantContext};
use bizhub_db::models::client::Client;
use bizhub_db::models::user::{
    ConfirmEmailRequest, LoginRequest, ResetPasswordRequest, User, MAX_LOGIN_ATTEMPTS,
};
use bizhub_db::TenantEntity;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{record, sender_name};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// Tenant details shown to a user right after sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: DbId,
    pub name: String,
    pub support_email: String,
    pub website: String,
    pub logo_url: Option<String>,
}

impl From<Client> for ClientSummary {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.name,
            support_email: c.support_email,
            website: c.website,
            logo_url: c.logo_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user_id: DbId,
    pub login_name: String,
    pub role: String,
    pub client: ClientSummary,
}

pub async fn login(svc: &Services, req: LoginRequest, route: &str) -> AppResult<LoginResponse> {
    let (login_name, password) = req.validate()?;

    let mut user = svc
        .stores
        .accounts
        .find_by_login_name(login_name)
        .await?
        .ok_or_else(|| CoreError::not_found(msg::INVALID_EMAIL))?;

    if !user.email_confirmed {
        return Err(CoreError::unauthorized(msg::EMAIL_NOT_CONFIRMED).into());
    }
    if user.locked {
        return Err(CoreError::unauthorized(msg::ACCOUNT_LOCKED).into());
    }

    let matches = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    let now = Utc::now();
    let actor = user.login_name.clone();

    if !matches {
        user.login_attempts = (user.login_attempts - 1).max(0);
        user.locked = user.login_attempts == 0;
        user.touch(&actor, now);
        svc.stores.users.save(&user).await?;

        tracing::warn!(
            user_id = user.id,
            attempts_left = user.login_attempts,
            locked = user.locked,
            "Failed sign-in"
        );
        let message = if user.locked {
            msg::LOCKED_AFTER_ATTEMPTS
        } else {
            msg::INVALID_CREDENTIALS
        };
        return Err(CoreError::unauthorized(message).into());
    }

    let client = svc
        .stores
        .clients
        .find(user.client_id, user.client_id)
        .await?
        .ok_or_else(|| CoreError::not_found(client_msg::INVALID_ID))?;

    user.login_attempts = MAX_LOGIN_ATTEMPTS;
    user.last_login_at = Some(now);
    user.touch(&actor, now);
    let user = svc.stores.users.save(&user).await?;

    let signed_in = signed_in_as(&user, route);
    record(svc, &signed_in, action_types::LOGIN, audit::describe_plain(msg::SIGNED_IN, "")).await;
    tracing::info!(user_id = user.id, client_id = user.client_id, "User signed in");

    Ok(LoginResponse {
        user_id: user.id,
        login_name: user.login_name,
        role: user.role,
        client: client.into(),
    })
}

/// Mark the account's email as confirmed when `token` matches the one it was
/// created with. The token is single use.
pub async fn confirm_email(svc: &Services, req: ConfirmEmailRequest, route: &str) -> AppResult<User> {
    let user_id = req
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::validation(msg::INVALID_ID))?;
    let mut user = svc
        .stores
        .accounts
        .find_account(user_id)
        .await?
        .ok_or_else(|| CoreError::not_found(msg::INVALID_ID))?;

    let token = req.token.as_deref().map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Err(CoreError::not_found(msg::INVALID_TOKEN).into());
    }
    if user.confirmation_token.as_deref() != Some(token) {
        tracing::warn!(user_id, "Email confirmation with a wrong token");
        return Err(CoreError::unauthorized(msg::INVALID_TOKEN).into());
    }

    user.email_confirmed = true;
    user.confirmation_token = None;
    let actor = user.login_name.clone();
    user.touch(&actor, Utc::now());
    let user = svc.stores.users.save(&user).await?;

    let confirmed = signed_in_as(&user, route);
    record(svc, &confirmed, action_types::CONFIRM_EMAIL, audit::describe(msg::EMAIL_CONFIRMED, user.id)).await;
    tracing::info!(user_id = user.id, client_id = user.client_id, "Email confirmed");
    Ok(user)
}

/// Replace the password with a generated one, unlock the account and email
/// the new password. Nothing is saved when the email cannot be sent.
pub async fn reset_password(svc: &Services, req: ResetPasswordRequest, route: &str) -> AppResult<()> {
    let login_name = req.validate()?;
    let mut user = svc
        .stores
        .accounts
        .find_by_login_name(login_name)
        .await?
        .ok_or_else(|| CoreError::not_found(msg::INVALID_EMAIL))?;

    let password = Uuid::new_v4().simple().to_string();
    user.password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    user.locked = false;
    user.login_attempts = MAX_LOGIN_ATTEMPTS;

    let email = OutboundEmail {
        client_id: user.client_id,
        sender_name: sender_name(svc, user.client_id).await?,
        recipients: vec![user.email.clone()],
        subject: msg::RESET_SUBJECT.to_string(),
        html_body: format!(
            "<p>Hello {},</p><p>Your new password is <b>{password}</b>. Please change it after signing in.</p>",
            user.first_name
        ),
    };
    svc.email.send_now(email).await.map_err(|e| {
        tracing::error!(user_id = user.id, error = %e, "Reset password email failed");
        AppError::InternalError(msg::RESET_EMAIL_FAILED.to_string())
    })?;

    let actor = user.login_name.clone();
    user.touch(&actor, Utc::now());
    let user = svc.stores.users.save(&user).await?;

    let reset = signed_in_as(&user, route);
    record(svc, &reset, action_types::RESET_PASSWORD, audit::describe(msg::PASSWORD_RESET, user.id)).await;
    tracing::info!(user_id = user.id, client_id = user.client_id, "Password reset");
    Ok(())
}

fn signed_in_as(user: &User, route: &str) -> AuthUser {
    AuthUser {
        tenant: TenantContext::new(user.client_id, user.id, user.login_name.clone()),
        role: user.role.clone(),
        route: route.to_string(),
    }
}
