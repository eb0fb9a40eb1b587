//! Scheduled message email dispatcher.
//!
//! Each scheduled batch is a sleeping tokio task paired with a
//! [`CancellationToken`]. Cancelling the batch id wakes and ends the task
//! before delivery. Without a transport every delivery is logged and dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bizhub_core::integrations::{EmailScheduler, IntegrationError, OutboundEmail};
use bizhub_core::types::Timestamp;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::email::{EmailError, MailTransport};

#[derive(Clone, Default)]
pub struct ScheduledEmailDispatcher {
    transport: Option<Arc<dyn MailTransport>>,
    batches: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl ScheduledEmailDispatcher {
    pub fn new(transport: Option<Arc<dyn MailTransport>>) -> Self {
        Self {
            transport,
            batches: Arc::default(),
        }
    }

    /// Number of batches still waiting for their send time.
    pub async fn pending_batches(&self) -> usize {
        self.batches.lock().await.len()
    }

    async fn deliver(
        transport: Option<&Arc<dyn MailTransport>>,
        email: &OutboundEmail,
    ) -> Result<(), EmailError> {
        match transport {
            Some(transport) => transport.deliver(email).await,
            None => {
                tracing::info!(
                    client_id = email.client_id,
                    recipients = email.recipients.len(),
                    subject = %email.subject,
                    "SMTP not configured, dropping message email"
                );
                Ok(())
            }
        }
    }
}

fn delay_until(send_at: Timestamp) -> Duration {
    (send_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}

#[async_trait]
impl EmailScheduler for ScheduledEmailDispatcher {
    fn generate_batch_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    async fn schedule(
        &self,
        batch_id: &str,
        email: OutboundEmail,
        send_at: Timestamp,
    ) -> Result<(), IntegrationError> {
        let token = CancellationToken::new();
        if let Some(previous) = self
            .batches
            .lock()
            .await
            .insert(batch_id.to_string(), token.clone())
        {
            previous.cancel();
        }

        let batches = Arc::clone(&self.batches);
        let transport = self.transport.clone();
        let batch_id = batch_id.to_string();
        let delay = delay_until(send_at);
        tracing::debug!(batch_id = %batch_id, delay_secs = delay.as_secs(), "Email batch scheduled");

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(batch_id = %batch_id, "Email batch cancelled");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            {
                // A reschedule under the same id cancels this token and owns the entry.
                let mut batches = batches.lock().await;
                if token.is_cancelled() {
                    return;
                }
                batches.remove(&batch_id);
            }

            if let Err(e) = Self::deliver(transport.as_ref(), &email).await {
                tracing::error!(batch_id = %batch_id, error = %e, "Scheduled email delivery failed");
            }
        });

        Ok(())
    }

    async fn send_now(&self, email: OutboundEmail) -> Result<(), IntegrationError> {
        Self::deliver(self.transport.as_ref(), &email)
            .await
            .map_err(|e| IntegrationError::Transport(e.to_string()))
    }

    async fn cancel(&self, batch_id: &str) -> Result<(), IntegrationError> {
        if let Some(token) = self.batches.lock().await.remove(batch_id) {
            token.cancel();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;

    #[derive(Default)]
    struct RecordingTransport {
        sent: StdMutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, email: &OutboundEmail) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn email(subject: &str) -> OutboundEmail {
        OutboundEmail {
            client_id: 1,
            sender_name: None,
            recipients: vec!["asha@example.com".into()],
            subject: subject.into(),
            html_body: "<p>Hi</p>".into(),
        }
    }

    fn dispatcher() -> (ScheduledEmailDispatcher, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = ScheduledEmailDispatcher::new(Some(transport.clone()));
        (dispatcher, transport)
    }

    #[test]
    fn batch_ids_are_unique() {
        let (dispatcher, _) = dispatcher();
        assert_ne!(dispatcher.generate_batch_id(), dispatcher.generate_batch_id());
    }

    #[tokio::test]
    async fn send_now_delivers_immediately() {
        let (dispatcher, transport) = dispatcher();
        dispatcher.send_now(email("now")).await.unwrap();
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scheduled_batch_delivers_at_send_time() {
        let (dispatcher, transport) = dispatcher();
        let send_at = Utc::now() + chrono::Duration::milliseconds(50);
        dispatcher.schedule("b1", email("later"), send_at).await.unwrap();
        assert_eq!(dispatcher.pending_batches().await, 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(transport.sent.lock().unwrap()[0].subject, "later");
        assert_eq!(dispatcher.pending_batches().await, 0);
    }

    #[tokio::test]
    async fn cancelled_batch_never_delivers() {
        let (dispatcher, transport) = dispatcher();
        let send_at = Utc::now() + chrono::Duration::milliseconds(100);
        dispatcher.schedule("b2", email("cancel me"), send_at).await.unwrap();
        dispatcher.cancel("b2").await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(dispatcher.pending_batches().await, 0);
    }

    #[tokio::test]
    async fn cancel_unknown_batch_is_ok() {
        let (dispatcher, _) = dispatcher();
        assert!(dispatcher.cancel("missing").await.is_ok());
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_drops_deliveries() {
        let dispatcher = ScheduledEmailDispatcher::default();
        assert!(dispatcher.send_now(email("dropped")).await.is_ok());
    }
}
