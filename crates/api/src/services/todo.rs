//! Personal todo items. Each todo is visible only to the user who created it,
//! so lookups check ownership on top of the tenant scope.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::todo as msg;
use bizhub_core::pagination::{PageQuery, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::todo::{Todo, TodoRequest};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_any, find_live, record};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

fn owned(todo: Todo, user: &AuthUser) -> AppResult<Todo> {
    if todo.user_id != user.user_id() {
        return Err(CoreError::not_found(msg::INVALID_ID).into());
    }
    Ok(todo)
}

pub async fn create(svc: &Services, user: &AuthUser, req: TodoRequest) -> AppResult<Todo> {
    let task = req.validate()?;
    let todo = Todo::new(user.client_id(), user.user_id(), task, user.actor(), Utc::now());
    let created = svc.stores.todos.insert(&todo).await?;

    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: TodoRequest,
) -> AppResult<Todo> {
    let task = req.validate()?;
    let found = find_live(svc.stores.todos.as_ref(), id, user, msg::INVALID_ID).await?;
    let mut todo = owned(found, user)?;
    todo.task = task.to_string();
    todo.touch(user.actor(), Utc::now());
    let saved = svc.stores.todos.save(&todo).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

/// Flip the soft-delete flag.
pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Todo> {
    let found = find_any(svc.stores.todos.as_ref(), id, user, msg::INVALID_ID).await?;
    let mut todo = owned(found, user)?;
    todo.is_deleted = !todo.is_deleted;
    todo.touch(user.actor(), Utc::now());
    let saved = svc.stores.todos.save(&todo).await?;

    record(svc, user, action_types::TOGGLE, audit::describe(msg::TOGGLED, id)).await;
    Ok(saved)
}

/// Flip the completion flag.
pub async fn toggle_done(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Todo> {
    let found = find_live(svc.stores.todos.as_ref(), id, user, msg::INVALID_ID).await?;
    let mut todo = owned(found, user)?;
    todo.is_done = !todo.is_done;
    todo.touch(user.actor(), Utc::now());
    let saved = svc.stores.todos.save(&todo).await?;

    record(svc, user, action_types::TOGGLE, audit::describe(msg::TOGGLED, id)).await;
    Ok(saved)
}

/// Remove the row for good.
pub async fn delete(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<()> {
    let found = find_any(svc.stores.todos.as_ref(), id, user, msg::INVALID_ID).await?;
    owned(found, user)?;
    svc.stores.todos.delete(id, user.client_id()).await?;

    record(svc, user, action_types::DELETE, audit::describe(msg::DELETED, id)).await;
    Ok(())
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Todo> {
    let found = find_live(svc.stores.todos.as_ref(), id, user, msg::INVALID_ID).await?;
    owned(found, user)
}

/// The caller's live todos, newest first.
pub async fn list_mine(svc: &Services, user: &AuthUser) -> AppResult<Vec<Todo>> {
    let query = PageQuery::matching(vec![Predicate::number_equals(
        "user_id",
        user.user_id() as f64,
    )]);
    Ok(svc.stores.todos.page(user.client_id(), &query).await?.data)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::services::test_support::{caller, Harness};

    fn request(task: &str) -> TodoRequest {
        TodoRequest {
            task: Some(task.into()),
        }
    }

    #[tokio::test]
    async fn test_todos_are_private_to_their_owner() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let colleague = h.user(me.client_id(), "ravi").await;
        let colleague = caller(me.client_id(), colleague.id, &colleague.login_name);
        let todo = create(&h.svc, &me, request("call vendor")).await.unwrap();

        let err = get(&h.svc, &colleague, todo.id).await.unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::NotFound(m)) if m == msg::INVALID_ID);
        assert!(list_mine(&h.svc, &colleague).await.unwrap().is_empty());
        assert_eq!(list_mine(&h.svc, &me).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_done_flips_and_audits() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let todo = create(&h.svc, &me, request("ship samples")).await.unwrap();

        assert!(toggle_done(&h.svc, &me, todo.id).await.unwrap().is_done);
        assert!(!toggle_done(&h.svc, &me, todo.id).await.unwrap().is_done);
        assert_eq!(
            h.logged_actions().await,
            vec![action_types::INSERT, action_types::TOGGLE, action_types::TOGGLE]
        );
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let todo = create(&h.svc, &me, request("archive invoices")).await.unwrap();

        delete(&h.svc, &me, todo.id).await.unwrap();

        assert!(h.mem.todos.all().await.is_empty());
        let err = delete(&h.svc, &me, todo.id).await.unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;

        let err = update(&h.svc, &me, 42, request("  ")).await.unwrap_err();

        assert_matches!(err.as_core(), Some(CoreError::Validation(m)) if m == msg::TASK_REQUIRED);
    }
}
