//! In-process store implementations.
//!
//! Rows live in a `Vec` behind a tokio `RwLock`. Filters are evaluated on the
//! serialized row, so the same [`PageQuery`] yields the same rows as the
//! PostgreSQL store for the column names both share.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use bizhub_core::pagination::{PageQuery, PaginatedResponse};
use bizhub_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::models::message::Message;
use crate::models::user::User;
use crate::store::{AccountStore, ScheduleStore, StoreResult, TenantEntity, TenantStore};

pub struct MemoryStore<E> {
    rows: RwLock<Vec<E>>,
    next_id: AtomicI64,
    saves: AtomicUsize,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            saves: AtomicUsize::new(0),
        }
    }
}

impl<E: TenantEntity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Every row regardless of tenant or deletion.
    pub async fn all(&self) -> Vec<E> {
        self.rows.read().await.clone()
    }

    fn visible(row: &E, client_id: DbId, include_deleted: bool) -> bool {
        row.client_id() == client_id && (include_deleted || !row.is_deleted())
    }
}

#[async_trait]
impl<E: TenantEntity> TenantStore<E> for MemoryStore<E> {
    async fn find(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.id() == id && Self::visible(r, client_id, false))
            .cloned())
    }

    async fn find_including_deleted(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.id() == id && Self::visible(r, client_id, true))
            .cloned())
    }

    async fn find_many(&self, ids: &[DbId], client_id: DbId) -> StoreResult<Vec<E>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| ids.contains(&r.id()) && Self::visible(r, client_id, false))
            .cloned()
            .collect())
    }

    async fn page(&self, client_id: DbId, query: &PageQuery) -> StoreResult<PaginatedResponse<E>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<E> = rows
            .iter()
            .filter(|r| Self::visible(r, client_id, query.include_deleted))
            .filter(|r| {
                let value = serde_json::to_value(r).unwrap_or_default();
                query.matches_row(r.id(), &value)
            })
            .cloned()
            .collect();
        matched.sort_by_key(|r| std::cmp::Reverse(r.id()));

        let total = matched.len() as i64;
        let offset = query.offset.max(0) as usize;
        let data = match query.limit {
            Some(limit) => matched.into_iter().skip(offset).take(limit.max(0) as usize).collect(),
            None => matched.into_iter().skip(offset).collect(),
        };
        Ok(PaginatedResponse {
            data,
            total_data_count: total,
        })
    }

    async fn insert(&self, entity: &E) -> StoreResult<E> {
        let mut row = entity.clone();
        row.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn save(&self, entity: &E) -> StoreResult<E> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == entity.id() && r.client_id() == entity.client_id())
            .ok_or(sqlx::Error::RowNotFound)?;
        *slot = entity.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(entity.clone())
    }

    async fn delete(&self, id: DbId, client_id: DbId) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.id() == id && r.client_id() == client_id));
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl AccountStore for MemoryStore<User> {
    async fn find_by_login_name(&self, login_name: &str) -> StoreResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|u| !u.is_deleted && u.login_name.eq_ignore_ascii_case(login_name))
            .cloned())
    }

    async fn find_account(&self, user_id: DbId) -> StoreResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.id == user_id && !u.is_deleted).cloned())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore<Message> {
    async fn pending_scheduled(&self, now: Timestamp) -> StoreResult<Vec<Message>> {
        let rows = self.rows.read().await;
        let mut pending: Vec<Message> = rows
            .iter()
            .filter(|m| !m.is_deleted && m.send_as_email && m.batch_id.is_some())
            .filter(|m| m.publish_date.is_some_and(|at| at > now))
            .cloned()
            .collect();
        pending.sort_by_key(|m| m.publish_date);
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use bizhub_core::pagination::{LogicOperator, Predicate};
    use chrono::Utc;

    use super::*;
    use crate::models::todo::Todo;

    fn todo(client_id: DbId, task: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id: 0,
            client_id,
            task: task.to_string(),
            is_done: false,
            user_id: 1,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: "tester".into(),
            modified_user: "tester".into(),
        }
    }

    #[tokio::test]
    async fn test_find_is_tenant_scoped() {
        let store = MemoryStore::new();
        let row = store.insert(&todo(1, "call vendor")).await.unwrap();
        assert!(store.find(row.id, 1).await.unwrap().is_some());
        assert!(store.find(row.id, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleted_rows_need_explicit_lookup() {
        let store = MemoryStore::new();
        let mut row = store.insert(&todo(1, "archive")).await.unwrap();
        row.is_deleted = true;
        store.save(&row).await.unwrap();

        assert!(store.find(row.id, 1).await.unwrap().is_none());
        assert!(store.find_including_deleted(row.id, 1).await.unwrap().is_some());
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_page_orders_newest_first_and_counts_all_matches() {
        let store = MemoryStore::new();
        for task in ["a", "b", "c", "d"] {
            store.insert(&todo(1, task)).await.unwrap();
        }
        store.insert(&todo(2, "other tenant")).await.unwrap();

        let query = PageQuery {
            offset: 1,
            limit: Some(2),
            ..PageQuery::default()
        };
        let page = store.page(1, &query).await.unwrap();
        assert_eq!(page.total_data_count, 4);
        let tasks: Vec<_> = page.data.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(tasks, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_page_applies_predicates() {
        let store = MemoryStore::new();
        store.insert(&todo(1, "Call vendor")).await.unwrap();
        store.insert(&todo(1, "ship order")).await.unwrap();

        let query = PageQuery {
            predicates: vec![Predicate::text_equals("task", "call vendor")],
            logic: LogicOperator::And,
            ..PageQuery::default()
        };
        let page = store.page(1, &query).await.unwrap();
        assert_eq!(page.total_data_count, 1);
    }

    #[tokio::test]
    async fn test_pending_scheduled_skips_past_and_deleted() {
        let store = MemoryStore::<Message>::new();
        let now = Utc::now();
        let message = |title: &str, hours: i64, batch: Option<&str>, deleted: bool| Message {
            id: 0,
            client_id: 1,
            title: title.into(),
            description_html: "<p>x</p>".into(),
            send_as_email: true,
            publish_date: Some(now + chrono::Duration::hours(hours)),
            batch_id: batch.map(str::to_string),
            user_ids: vec![1],
            group_ids: vec![],
            read_by_user_ids: vec![],
            is_deleted: deleted,
            created_at: now,
            updated_at: now,
            created_user: "tester".into(),
            modified_user: "tester".into(),
        };
        store.insert(&message("later", 5, Some("b-2"), false)).await.unwrap();
        store.insert(&message("soon", 1, Some("b-1"), false)).await.unwrap();
        store.insert(&message("past", -1, Some("b-0"), false)).await.unwrap();
        store.insert(&message("deleted", 2, Some("b-3"), true)).await.unwrap();
        store.insert(&message("unbatched", 2, None, false)).await.unwrap();

        let pending = store.pending_scheduled(now).await.unwrap();
        let titles: Vec<_> = pending.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "later"]);
    }

    #[tokio::test]
    async fn test_save_of_foreign_row_fails() {
        let store = MemoryStore::new();
        let mut row = store.insert(&todo(1, "mine")).await.unwrap();
        row.client_id = 2;
        assert!(matches!(store.save(&row).await, Err(sqlx::Error::RowNotFound)));
    }
}
