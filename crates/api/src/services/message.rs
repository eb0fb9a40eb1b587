//! In-app messages with optional email delivery.
//!
//! A message addressed to users and groups can also go out as an email,
//! immediately or at a scheduled time within the provider's window. A
//! scheduled email is tracked by the batch id stored on the message; a saved
//! change that invalidates the pending delivery then cancels that batch.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::integrations::OutboundEmail;
use bizhub_core::messages::{common, message as msg, user as user_msg, user_group as group_msg};
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest};
use bizhub_core::types::DbId;
use bizhub_core::validation::message::{
    plan_for_create, plan_for_update, validate_content, validate_schedule_change, EmailPlan,
};
use bizhub_db::models::message::{Message, MessageRequest, FILTER_COLUMNS};
use bizhub_db::models::user::User;
use bizhub_db::models::user_group::UserGroup;
use bizhub_db::TenantEntity;
use chrono::Utc;
use serde::Serialize;

use super::{find_any, find_live, integration_failure, page, record, sender_name};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// A message as seen by one recipient.
#[derive(Debug, Clone, Serialize)]
pub struct InboxMessage {
    #[serde(flatten)]
    pub message: Message,
    pub is_read: bool,
}

// ---------------------------------------------------------------------------
// Recipients and delivery
// ---------------------------------------------------------------------------

/// Check that every recipient id resolves in the tenant and collect the
/// email addresses of direct recipients and group members.
async fn recipient_emails(
    svc: &Services,
    client_id: DbId,
    user_ids: &[DbId],
    group_ids: &[DbId],
) -> AppResult<Vec<String>> {
    let direct = svc.stores.users.find_many(user_ids, client_id).await?;
    if direct.len() != dedup_len(user_ids) {
        return Err(CoreError::validation(msg::INVALID_RECIPIENT).into());
    }

    let groups = svc.stores.user_groups.find_many(group_ids, client_id).await?;
    if groups.len() != dedup_len(group_ids) {
        return Err(CoreError::not_found(group_msg::INVALID_ID).into());
    }

    collect_emails(svc, client_id, direct, &groups).await
}

/// Addresses of the recipients that still exist. Used when re-arming stored
/// messages, where a recipient removed since then is simply skipped.
async fn surviving_emails(svc: &Services, message: &Message) -> AppResult<Vec<String>> {
    let client_id = message.client_id;
    let direct = svc.stores.users.find_many(&message.user_ids, client_id).await?;
    let groups = svc.stores.user_groups.find_many(&message.group_ids, client_id).await?;
    collect_emails(svc, client_id, direct, &groups).await
}

async fn collect_emails(
    svc: &Services,
    client_id: DbId,
    direct: Vec<User>,
    groups: &[UserGroup],
) -> AppResult<Vec<String>> {
    let member_ids: Vec<DbId> = groups.iter().flat_map(|g| g.member_ids.iter().copied()).collect();
    let members = svc.stores.users.find_many(&member_ids, client_id).await?;

    let mut emails: Vec<String> = direct
        .into_iter()
        .chain(members)
        .map(|u| u.email)
        .collect();
    emails.sort();
    emails.dedup();
    Ok(emails)
}

fn dedup_len(ids: &[DbId]) -> usize {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

async fn deliver(
    svc: &Services,
    message: &Message,
    plan: EmailPlan,
    recipients: Vec<String>,
) -> AppResult<()> {
    if plan == EmailPlan::Skip {
        return Ok(());
    }
    let email = OutboundEmail {
        client_id: message.client_id,
        sender_name: sender_name(svc, message.client_id).await?,
        recipients,
        subject: message.title.clone(),
        html_body: message.description_html.clone(),
    };

    let sent = match plan {
        EmailPlan::SendNow => svc.email.send_now(email).await,
        EmailPlan::Schedule(at) => {
            let batch_id = message.batch_id.as_deref().ok_or_else(|| {
                AppError::InternalError(format!("Message {} has no batch id", message.id))
            })?;
            svc.email.schedule(batch_id, email, at).await
        }
        EmailPlan::Skip => Ok(()),
    };
    sent.map_err(|e| integration_failure(common::INTEGRATION_FAILED_PREFIX, e))?;

    tracing::info!(
        message_id = message.id,
        batch_id = message.batch_id.as_deref().unwrap_or(""),
        "Message email handed to the scheduler"
    );
    Ok(())
}

/// Cancel the batch a saved change dropped. When the provider refuses,
/// `previous` is written back so the row still names the batch that is
/// pending with the provider.
async fn cancel_dropped_batch(
    svc: &Services,
    previous: &Message,
    batch_id: Option<String>,
) -> AppResult<()> {
    let Some(batch_id) = batch_id else {
        return Ok(());
    };
    if let Err(e) = svc.email.cancel(&batch_id).await {
        tracing::warn!(message_id = previous.id, batch_id = %batch_id, error = %e, "Cancel failed");
        svc.stores.messages.save(previous).await?;
        return Err(CoreError::validation(msg::CANCEL_FAILED).into());
    }
    tracing::info!(message_id = previous.id, batch_id = %batch_id, "Scheduled email cancelled");
    Ok(())
}

/// Hand every stored, still pending scheduled email back to the scheduler.
///
/// The scheduler keeps its timers in process, so they are lost on restart.
/// Returns how many messages were re-armed; a message that cannot be
/// re-armed is logged and skipped.
pub async fn reschedule_pending(svc: &Services) -> AppResult<usize> {
    let pending = svc.stores.scheduled_messages.pending_scheduled(Utc::now()).await?;
    let mut rescheduled = 0;
    for message in pending {
        let Some(at) = message.publish_date else {
            continue;
        };
        let recipients = surviving_emails(svc, &message).await?;
        if recipients.is_empty() {
            tracing::warn!(message_id = message.id, "Scheduled message has no recipients left");
            continue;
        }
        match deliver(svc, &message, EmailPlan::Schedule(at), recipients).await {
            Ok(()) => rescheduled += 1,
            Err(e) => {
                tracing::warn!(message_id = message.id, error = %e, "Failed to re-arm scheduled email");
            }
        }
    }
    Ok(rescheduled)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn create(svc: &Services, user: &AuthUser, req: MessageRequest) -> AppResult<Message> {
    let now = Utc::now();
    req.validate(now)?;
    let recipients = recipient_emails(svc, user.client_id(), &req.user_ids, &req.group_ids).await?;

    let mut message = Message::new(user.client_id(), user.actor(), now);
    req.apply_to(&mut message);
    let plan = plan_for_create(message.send_as_email, message.publish_date);
    if let EmailPlan::Schedule(_) = plan {
        message.batch_id = Some(svc.email.generate_batch_id());
    }
    let created = svc.stores.messages.insert(&message).await?;

    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    deliver(svc, &created, plan, recipients).await?;
    Ok(created)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: MessageRequest,
) -> AppResult<Message> {
    let now = Utc::now();
    validate_content(
        req.title.as_deref(),
        req.description_html.as_deref(),
        &req.user_ids,
        &req.group_ids,
    )?;
    let mut message = find_live(svc.stores.messages.as_ref(), id, user, msg::INVALID_ID).await?;
    let existing = message.email_state();
    validate_schedule_change(existing, req.send_as_email, req.publish_date, now)?;
    let recipients = recipient_emails(svc, user.client_id(), &req.user_ids, &req.group_ids).await?;

    let plan = plan_for_update(existing, req.send_as_email, req.publish_date);
    let previous = message.clone();
    let dropped = message.batch_id.take();
    req.apply_to(&mut message);
    if let EmailPlan::Schedule(_) = plan {
        message.batch_id = Some(svc.email.generate_batch_id());
    }
    message.touch(user.actor(), now);
    let saved = svc.stores.messages.save(&message).await?;
    cancel_dropped_batch(svc, &previous, dropped).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    deliver(svc, &saved, plan, recipients).await?;
    Ok(saved)
}

/// Soft-delete or restore. Deleting cancels a pending email; restoring a
/// message whose publish date is still ahead schedules it again.
pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Message> {
    let now = Utc::now();
    let mut message = find_any(svc.stores.messages.as_ref(), id, user, msg::INVALID_ID).await?;
    let previous = message.clone();

    let mut plan = EmailPlan::Skip;
    let mut dropped = None;
    if message.is_deleted {
        if let (true, Some(at)) = (message.send_as_email, message.publish_date) {
            if at > now {
                message.batch_id = Some(svc.email.generate_batch_id());
                plan = EmailPlan::Schedule(at);
            }
        }
    } else {
        dropped = message.batch_id.take();
    }
    let recipients = if plan == EmailPlan::Skip {
        Vec::new()
    } else {
        recipient_emails(svc, user.client_id(), &message.user_ids, &message.group_ids).await?
    };

    message.is_deleted = !message.is_deleted;
    message.touch(user.actor(), now);
    let saved = svc.stores.messages.save(&message).await?;
    cancel_dropped_batch(svc, &previous, dropped).await?;

    record(svc, user, action_types::TOGGLE, audit::describe(msg::TOGGLED, id)).await;
    deliver(svc, &saved, plan, recipients).await?;
    Ok(saved)
}

/// Record that the caller has read a message addressed to them.
pub async fn mark_read(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Message> {
    let mut message = find_live(svc.stores.messages.as_ref(), id, user, msg::INVALID_ID).await?;

    let groups = svc
        .stores
        .user_groups
        .find_many(&message.group_ids, user.client_id())
        .await?;
    let members: Vec<DbId> = groups.iter().flat_map(|g| g.member_ids.iter().copied()).collect();
    if !message.addresses(user.user_id(), &members) {
        return Err(CoreError::not_found(msg::INVALID_ID).into());
    }
    if message.is_read_by(user.user_id()) {
        return Ok(message);
    }

    message.read_by_user_ids.push(user.user_id());
    message.touch(user.actor(), Utc::now());
    let saved = svc.stores.messages.save(&message).await?;

    record(svc, user, action_types::MARK_READ, audit::describe(msg::MARKED_READ, id)).await;
    Ok(saved)
}

/// Live messages addressed to `user_id`, directly or through a group.
pub async fn list_for_user(
    svc: &Services,
    user: &AuthUser,
    user_id: DbId,
) -> AppResult<Vec<InboxMessage>> {
    let client_id = user.client_id();
    if svc.stores.users.find(user_id, client_id).await?.is_none() {
        return Err(CoreError::not_found(user_msg::INVALID_ID).into());
    }

    let all = PageQuery::matching(Vec::new());
    let groups: Vec<DbId> = svc
        .stores
        .user_groups
        .page(client_id, &all)
        .await?
        .data
        .into_iter()
        .filter(|g| g.member_ids.contains(&user_id))
        .map(|g| g.id)
        .collect();

    let inbox = svc
        .stores
        .messages
        .page(client_id, &all)
        .await?
        .data
        .into_iter()
        .filter(|m| m.user_ids.contains(&user_id) || m.group_ids.iter().any(|g| groups.contains(g)))
        .map(|m| InboxMessage {
            is_read: m.is_read_by(user_id),
            message: m,
        })
        .collect();
    Ok(inbox)
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Message> {
    find_live(svc.stores.messages.as_ref(), id, user, msg::INVALID_ID).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Message>> {
    page(svc.stores.messages.as_ref(), user, req, FILTER_COLUMNS).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use assert_matches::assert_matches;
    use bizhub_db::models::user_group::UserGroup;
    use bizhub_db::TenantStore;
    use chrono::Duration;

    use super::*;
    use crate::services::test_support::{caller, Harness};

    fn request(user_ids: Vec<DbId>) -> MessageRequest {
        MessageRequest {
            title: Some("Stock update".into()),
            description_html: Some("<p>New arrivals</p>".into()),
            user_ids,
            ..Default::default()
        }
    }

    fn scheduled(user_ids: Vec<DbId>, hours: i64) -> MessageRequest {
        MessageRequest {
            send_as_email: true,
            publish_date: Some(Utc::now() + Duration::hours(hours)),
            ..request(user_ids)
        }
    }

    async fn group(h: &Harness, client_id: DbId, members: Vec<DbId>) -> UserGroup {
        let now = Utc::now();
        let group = UserGroup {
            id: 0,
            client_id,
            group_name: "Warehouse".into(),
            description: None,
            member_ids: members,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: "seed".into(),
            modified_user: "seed".into(),
        };
        h.mem.user_groups.insert(&group).await.unwrap()
    }

    #[tokio::test]
    async fn test_plain_message_sends_nothing() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;

        let created = create(&h.svc, &me, request(vec![me.user_id()])).await.unwrap();

        assert_eq!(created.batch_id, None);
        assert!(h.email.sent.lock().unwrap().is_empty());
        assert!(h.email.scheduled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_immediate_email_has_no_batch() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let mut req = request(vec![me.user_id()]);
        req.send_as_email = true;

        let created = create(&h.svc, &me, req).await.unwrap();

        assert_eq!(created.batch_id, None);
        let sent = h.email.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["acme-admin@example.com".to_string()]);
        assert_eq!(sent[0].sender_name.as_deref(), Some("Acme Team"));
    }

    #[tokio::test]
    async fn test_scheduled_email_reaches_group_members_once() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let ravi = h.user(me.client_id(), "ravi").await;
        let team = group(&h, me.client_id(), vec![me.user_id(), ravi.id]).await;
        let mut req = scheduled(vec![me.user_id()], 2);
        req.group_ids = vec![team.id];

        let created = create(&h.svc, &me, req).await.unwrap();

        assert_eq!(created.batch_id.as_deref(), Some("batch-1"));
        let scheduled = h.email.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0, "batch-1");
        assert_eq!(scheduled[0].1.recipients.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_recipient_rejected_before_insert() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;

        let err = create(&h.svc, &me, request(vec![me.user_id(), 404])).await.unwrap_err();

        assert_matches!(
            err.as_core(),
            Some(CoreError::Validation(m)) if m == msg::INVALID_RECIPIENT
        );
        assert!(h.mem.messages.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_reschedules_under_new_batch() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let req = scheduled(vec![me.user_id()], 5);
        let publish_date = req.publish_date;
        let created = create(&h.svc, &me, req).await.unwrap();

        let mut edit = request(vec![me.user_id()]);
        edit.title = Some("Stock update (revised)".into());
        edit.send_as_email = true;
        edit.publish_date = publish_date;
        let updated = update(&h.svc, &me, created.id, edit).await.unwrap();

        assert_eq!(*h.email.cancelled.lock().unwrap(), vec!["batch-1".to_string()]);
        assert_eq!(updated.batch_id.as_deref(), Some("batch-2"));
        assert_eq!(h.email.scheduled_ids(), vec!["batch-1", "batch-2"]);
    }

    #[tokio::test]
    async fn test_update_cannot_move_scheduled_date() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let created = create(&h.svc, &me, scheduled(vec![me.user_id()], 5)).await.unwrap();

        let err = update(&h.svc, &me, created.id, scheduled(vec![me.user_id()], 6))
            .await
            .unwrap_err();

        assert_matches!(
            err.as_core(),
            Some(CoreError::Validation(m)) if m == msg::CANNOT_MODIFY_SCHEDULED_DATE
        );
        assert!(h.email.cancelled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_cancel_restores_saved_row() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let req = scheduled(vec![me.user_id()], 5);
        let mut edit = request(vec![me.user_id()]);
        edit.title = Some("Stock update (revised)".into());
        edit.send_as_email = true;
        edit.publish_date = req.publish_date;
        let created = create(&h.svc, &me, req).await.unwrap();
        h.email.fail_cancel.store(true, Ordering::SeqCst);

        let err = update(&h.svc, &me, created.id, edit).await.unwrap_err();

        assert_matches!(err.as_core(), Some(CoreError::Validation(m)) if m == msg::CANCEL_FAILED);
        // The edit was saved before the cancel ran, then rolled back.
        assert_eq!(h.mem.messages.save_count(), 2);
        let stored = h.mem.messages.all().await.remove(0);
        assert_eq!(stored, created);
        assert_eq!(h.email.scheduled_ids(), vec!["batch-1"]);
        assert!(h.logged_actions().await.iter().all(|a| a != action_types::UPDATE));
    }

    #[tokio::test]
    async fn test_failed_cancel_keeps_message_live() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let created = create(&h.svc, &me, scheduled(vec![me.user_id()], 5)).await.unwrap();
        h.email.fail_cancel.store(true, Ordering::SeqCst);

        let err = toggle_deleted(&h.svc, &me, created.id).await.unwrap_err();

        assert_matches!(err.as_core(), Some(CoreError::Validation(m)) if m == msg::CANCEL_FAILED);
        let stored = h.mem.messages.all().await.remove(0);
        assert!(!stored.is_deleted);
        assert_eq!(stored.batch_id.as_deref(), Some("batch-1"));
    }

    #[tokio::test]
    async fn test_reschedule_pending_rearms_future_batches() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let ravi = h.user(me.client_id(), "ravi").await;
        let future = create(&h.svc, &me, scheduled(vec![me.user_id(), ravi.id], 5)).await.unwrap();
        create(&h.svc, &me, request(vec![me.user_id()])).await.unwrap();
        let mut past = create(&h.svc, &me, scheduled(vec![me.user_id()], 2)).await.unwrap();
        past.publish_date = Some(Utc::now() - Duration::minutes(1));
        h.mem.messages.save(&past).await.unwrap();
        h.email.scheduled.lock().unwrap().clear();

        let count = reschedule_pending(&h.svc).await.unwrap();

        assert_eq!(count, 1);
        let scheduled = h.email.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(Some(scheduled[0].0.as_str()), future.batch_id.as_deref());
        assert_eq!(Some(scheduled[0].2), future.publish_date);
        assert_eq!(scheduled[0].1.recipients.len(), 2);
        assert_eq!(scheduled[0].1.sender_name.as_deref(), Some("Acme Team"));
    }

    #[tokio::test]
    async fn test_toggle_cancels_then_restores_schedule() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let created = create(&h.svc, &me, scheduled(vec![me.user_id()], 5)).await.unwrap();

        let deleted = toggle_deleted(&h.svc, &me, created.id).await.unwrap();
        assert!(deleted.is_deleted);
        assert_eq!(deleted.batch_id, None);
        assert_eq!(*h.email.cancelled.lock().unwrap(), vec!["batch-1".to_string()]);

        let restored = toggle_deleted(&h.svc, &me, created.id).await.unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(restored.batch_id.as_deref(), Some("batch-2"));
    }

    #[tokio::test]
    async fn test_mark_read_requires_recipient() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let ravi = h.user(me.client_id(), "ravi").await;
        let ravi = caller(me.client_id(), ravi.id, &ravi.login_name);
        let created = create(&h.svc, &me, request(vec![me.user_id()])).await.unwrap();

        let err = mark_read(&h.svc, &ravi, created.id).await.unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::NotFound(m)) if m == msg::INVALID_ID);

        let read = mark_read(&h.svc, &me, created.id).await.unwrap();
        assert!(read.is_read_by(me.user_id()));
        // A second read is a no-op.
        mark_read(&h.svc, &me, created.id).await.unwrap();
        assert_eq!(h.mem.messages.save_count(), 1);
    }

    #[tokio::test]
    async fn test_inbox_includes_group_messages() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let ravi = h.user(me.client_id(), "ravi").await;
        let team = group(&h, me.client_id(), vec![ravi.id]).await;
        let mut to_team = request(vec![]);
        to_team.group_ids = vec![team.id];
        create(&h.svc, &me, to_team).await.unwrap();
        create(&h.svc, &me, request(vec![me.user_id()])).await.unwrap();

        let inbox = list_for_user(&h.svc, &me, ravi.id).await.unwrap();

        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].is_read);
        assert_eq!(inbox[0].message.group_ids, vec![team.id]);
    }
}
