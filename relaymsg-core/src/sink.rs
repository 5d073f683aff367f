//! Delivery of a `Notification` back to the caller's context.
//!
//! A sink is consumed by its single delivery. None of the
//! implementations wait for the receiver: a closed or full channel
//! drops the notification with a log line.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::message::Notification;

/// Unbounded channel sender, the default sink type.
pub type StatusSender = mpsc::UnboundedSender<Notification>;
pub type StatusReceiver = mpsc::UnboundedReceiver<Notification>;

/// Create a sink/receiver pair. The receiver is polled from the
/// caller's own task or event loop.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    mpsc::unbounded_channel()
}

/// One-shot destination for a transmission result.
pub trait ResultSink: Send + 'static {
    fn deliver(self, notification: Notification);
}

impl ResultSink for mpsc::UnboundedSender<Notification> {
    fn deliver(self, notification: Notification) {
        if self.send(notification).is_err() {
            debug!("status receiver dropped; notification discarded");
        }
    }
}

impl ResultSink for mpsc::Sender<Notification> {
    fn deliver(self, notification: Notification) {
        if let Err(e) = self.try_send(notification) {
            debug!("status channel unavailable ({e}); notification discarded");
        }
    }
}

impl ResultSink for oneshot::Sender<Notification> {
    fn deliver(self, notification: Notification) {
        if self.send(notification).is_err() {
            debug!("status receiver dropped; notification discarded");
        }
    }
}

/// Adapts a plain closure into a `ResultSink`. The closure runs on the
/// worker task; the caller is responsible for any context hand-off.
pub struct Callback<F>(pub F);

impl<F> ResultSink for Callback<F>
where
    F: FnOnce(Notification) + Send + 'static,
{
    fn deliver(self, notification: Notification) {
        (self.0)(notification)
    }
}
