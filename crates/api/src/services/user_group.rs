use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::user_group as msg;
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::user_group::{UserGroup, UserGroupRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, page, record, toggle};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// Names are unique per tenant among live groups; `except` skips the group
/// being updated.
async fn ensure_name_free(
    svc: &Services,
    user: &AuthUser,
    name: &str,
    except: Option<DbId>,
) -> AppResult<()> {
    let query = PageQuery::matching(vec![Predicate::text_equals("group_name", name)]);
    let taken = svc
        .stores
        .user_groups
        .page(user.client_id(), &query)
        .await?
        .data
        .iter()
        .any(|g| Some(g.id) != except);
    if taken {
        return Err(CoreError::validation(msg::NAME_EXISTS).into());
    }
    Ok(())
}

async fn ensure_members_exist(svc: &Services, user: &AuthUser, members: &[DbId]) -> AppResult<()> {
    let found = svc.stores.users.find_many(members, user.client_id()).await?;
    if found.len() != members.len() {
        return Err(CoreError::validation(msg::INVALID_MEMBER).into());
    }
    Ok(())
}

pub async fn create(
    svc: &Services,
    user: &AuthUser,
    req: UserGroupRequest,
) -> AppResult<UserGroup> {
    let (name, members) = req.validate()?;
    ensure_name_free(svc, user, &name, None).await?;
    ensure_members_exist(svc, user, &members).await?;

    let now = Utc::now();
    let group = UserGroup {
        id: 0,
        client_id: user.client_id(),
        group_name: name,
        description: req.description(),
        member_ids: members,
        is_deleted: false,
        created_at: now,
        updated_at: now,
        created_user: user.actor().to_string(),
        modified_user: user.actor().to_string(),
    };
    let created = svc.stores.user_groups.insert(&group).await?;

    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: UserGroupRequest,
) -> AppResult<UserGroup> {
    let (name, members) = req.validate()?;
    let mut group = find_live(svc.stores.user_groups.as_ref(), id, user, msg::INVALID_ID).await?;
    ensure_name_free(svc, user, &name, Some(id)).await?;
    ensure_members_exist(svc, user, &members).await?;

    group.group_name = name;
    group.description = req.description();
    group.member_ids = members;
    group.touch(user.actor(), Utc::now());
    let saved = svc.stores.user_groups.save(&group).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<UserGroup> {
    toggle(svc, svc.stores.user_groups.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<UserGroup> {
    find_live(svc.stores.user_groups.as_ref(), id, user, msg::INVALID_ID).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<UserGroup>> {
    page(svc.stores.user_groups.as_ref(), user, req, FILTER_COLUMNS).await
}
