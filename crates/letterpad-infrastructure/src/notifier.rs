//! `Notifier` implementations.

use letterpad_core::{Notification, Notifier};
use tokio::sync::mpsc;

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            tracing::error!("[Notify] {}", notification.message);
        } else {
            tracing::info!("[Notify] {}: {}", notification.level, notification.message);
        }
    }
}

/// Forwards notifications to a channel for a front end to render.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }

    /// Creates a notifier together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterpad_core::NotificationLevel;

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(Notification::success("Letter saved successfully"));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.level, NotificationLevel::Success);
        assert_eq!(received.message, "Letter saved successfully");
    }

    #[test]
    fn test_channel_notifier_ignores_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(Notification::error("Failed to save letter"));
    }
}
