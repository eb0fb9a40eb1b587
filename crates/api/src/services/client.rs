use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::client as msg;
use bizhub_db::models::client::{Client, UpdateClient};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::record;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// The caller's own tenant row.
pub async fn get_current(svc: &Services, user: &AuthUser) -> AppResult<Client> {
    svc.stores
        .clients
        .find(user.client_id(), user.client_id())
        .await?
        .ok_or_else(|| CoreError::not_found(msg::INVALID_ID).into())
}

pub async fn update_current(
    svc: &Services,
    user: &AuthUser,
    req: UpdateClient,
) -> AppResult<Client> {
    req.validate()?;
    let mut client = get_current(svc, user).await?;
    req.apply_to(&mut client);
    client.touch(user.actor(), Utc::now());
    let saved = svc.stores.clients.save(&client).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, saved.id)).await;
    Ok(saved)
}
