//! Tenant users. New accounts start unconfirmed and receive a confirmation
//! email carrying a one-time token.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::integrations::OutboundEmail;
use bizhub_core::messages::{login as login_msg, user as msg};
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::user::{CreateUser, UpdateUser, User, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;
use uuid::Uuid;

use super::{find_live, page, record, sender_name, toggle};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::Services;

pub async fn create(svc: &Services, user: &AuthUser, req: CreateUser) -> AppResult<User> {
    req.validate()?;

    let email = req.email.as_deref().unwrap_or_default().trim().to_lowercase();
    let query = PageQuery::matching(vec![Predicate::text_equals("email", email)]);
    if svc.stores.users.page(user.client_id(), &query).await?.total_data_count > 0 {
        return Err(CoreError::validation(msg::EMAIL_EXISTS).into());
    }

    let password = req.password.as_deref().unwrap_or_default();
    let hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let mut new_user = req.into_user(user.client_id(), hash, user.actor(), Utc::now());
    new_user.confirmation_token = Some(Uuid::new_v4().simple().to_string());
    let created = svc.stores.users.insert(&new_user).await?;

    tracing::info!(user_id = created.id, client_id = user.client_id(), "User created");
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    send_confirmation(svc, &created).await;
    Ok(created)
}

/// The account exists either way; a lost confirmation email is resent by
/// resetting the password.
async fn send_confirmation(svc: &Services, user: &User) {
    let Some(token) = user.confirmation_token.as_deref() else {
        return;
    };
    let sender = match sender_name(svc, user.client_id).await {
        Ok(sender) => sender,
        Err(e) => {
            tracing::warn!(user_id = user.id, error = %e, "Could not load sender name");
            None
        }
    };
    let email = OutboundEmail {
        client_id: user.client_id,
        sender_name: sender,
        recipients: vec![user.email.clone()],
        subject: login_msg::CONFIRMATION_SUBJECT.to_string(),
        html_body: format!(
            "<p>Hello {},</p><p>Confirm your account with user id <b>{}</b> and code <b>{token}</b>.</p>",
            user.first_name, user.id
        ),
    };
    if let Err(e) = svc.email.send_now(email).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to send confirmation email");
    }
}

/// Update name, phone and role. Login name and email stay as created.
pub async fn update(svc: &Services, user: &AuthUser, id: DbId, req: UpdateUser) -> AppResult<User> {
    req.validate()?;
    let mut existing = find_live(svc.stores.users.as_ref(), id, user, msg::INVALID_ID).await?;

    req.apply_to(&mut existing);
    existing.touch(user.actor(), Utc::now());
    let saved = svc.stores.users.save(&existing).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<User> {
    toggle(svc, svc.stores.users.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<User> {
    find_live(svc.stores.users.as_ref(), id, user, msg::INVALID_ID).await
}

/// Live user of the caller's tenant by email, compared case-insensitively.
pub async fn get_by_email(svc: &Services, user: &AuthUser, email: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();
    let query = PageQuery::matching(vec![Predicate::text_equals("email", email)]);
    svc.stores
        .users
        .page(user.client_id(), &query)
        .await?
        .data
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::not_found(msg::UNKNOWN_EMAIL).into())
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<User>> {
    page(svc.stores.users.as_ref(), user, req, FILTER_COLUMNS).await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::auth::password::verify_password;
    use crate::services::test_support::Harness;

    fn request(login: &str, email: &str) -> CreateUser {
        CreateUser {
            login_name: Some(login.into()),
            first_name: Some("Meera".into()),
            last_name: Some("Iyer".into()),
            email: Some(email.into()),
            password: Some("correct-horse".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;

        let created = create(&h.svc, &caller, request("meera", "meera@acme.test")).await.unwrap();

        assert_ne!(created.password_hash, "correct-horse");
        assert!(verify_password("correct-horse", &created.password_hash).unwrap());
        assert!(!created.email_confirmed);
    }

    #[tokio::test]
    async fn test_create_emails_confirmation_token() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;

        let created = create(&h.svc, &caller, request("meera", "meera@acme.test")).await.unwrap();

        let token = created.confirmation_token.clone().unwrap();
        let sent = h.email.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["meera@acme.test".to_string()]);
        assert_eq!(sent[0].subject, login_msg::CONFIRMATION_SUBJECT);
        assert_eq!(sent[0].sender_name.as_deref(), Some("Acme Team"));
        assert!(sent[0].html_body.contains(&token));
    }

    #[tokio::test]
    async fn test_update_leaves_email_alone() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        let created = create(&h.svc, &caller, request("meera", "meera@acme.test")).await.unwrap();

        let updated = update(
            &h.svc,
            &caller,
            created.id,
            UpdateUser {
                first_name: Some("Meera".into()),
                last_name: Some("Nair".into()),
                phone: Some("9876543210".into()),
                role: Some("manager".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.last_name, "Nair");
        assert_eq!(updated.role, "manager");
        assert_eq!(updated.email, "meera@acme.test");
        assert_eq!(updated.password_hash, created.password_hash);
        assert_eq!(
            h.logged_actions().await,
            vec![action_types::INSERT, action_types::UPDATE]
        );
    }

    #[tokio::test]
    async fn test_update_requires_names() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        let created = create(&h.svc, &caller, request("meera", "meera@acme.test")).await.unwrap();

        let err = update(&h.svc, &caller, created.id, UpdateUser::default())
            .await
            .unwrap_err();

        assert_matches!(
            err.as_core(),
            Some(CoreError::Validation(m)) if m == msg::FIRST_NAME_REQUIRED
        );
    }

    #[tokio::test]
    async fn test_get_by_email_is_tenant_scoped() {
        let h = Harness::new();
        let acme = h.tenant("Acme").await;
        let globex = h.tenant("Globex").await;
        let created = create(&h.svc, &acme, request("meera", "meera@acme.test")).await.unwrap();

        let found = get_by_email(&h.svc, &acme, " MEERA@acme.test ").await.unwrap();
        assert_eq!(found.id, created.id);

        let err = get_by_email(&h.svc, &globex, "meera@acme.test").await.unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::NotFound(m)) if m == msg::UNKNOWN_EMAIL);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_case_insensitively() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        create(&h.svc, &caller, request("meera", "meera@acme.test")).await.unwrap();

        let err = create(&h.svc, &caller, request("meera2", "Meera@ACME.test"))
            .await
            .unwrap_err();

        assert_matches!(err.as_core(), Some(CoreError::Validation(m)) if m == msg::EMAIL_EXISTS);
    }

    #[tokio::test]
    async fn test_same_email_allowed_in_another_tenant() {
        let h = Harness::new();
        let acme = h.tenant("Acme").await;
        let globex = h.tenant("Globex").await;
        create(&h.svc, &acme, request("meera", "meera@shared.test")).await.unwrap();

        assert!(create(&h.svc, &globex, request("meera", "meera@shared.test")).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;

        let err = get(&h.svc, &caller, 999).await.unwrap_err();

        assert_matches!(err.as_core(), Some(CoreError::NotFound(m)) if m == msg::INVALID_ID);
    }
}
