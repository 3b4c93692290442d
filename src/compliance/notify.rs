//! Notification channel: fire-and-forget delivery.
//!
//! Delivery failure never rolls back a state transition. The engine logs a
//! warning and moves on; the audit trail records that notification was
//! attempted, not that it arrived.

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationRecipient {
    /// The party that filed the notice
    Claimant,
    /// The owner of the targeted content
    ContentOwner,
}

/// External delivery channel (email, in-app, webhook)
pub trait NotificationChannel: Send + Sync {
    /// Deliver a message; errors are advisory only
    fn notify(&self, recipient: NotificationRecipient, ticket_id: &str, message: &str);
}

/// Channel that only logs
#[derive(Debug, Default)]
pub struct LoggingNotifier;

impl NotificationChannel for LoggingNotifier {
    fn notify(&self, recipient: NotificationRecipient, ticket_id: &str, message: &str) {
        tracing::info!(
            "Notification for {:?} on {}: {}",
            recipient,
            ticket_id,
            message
        );
    }
}
