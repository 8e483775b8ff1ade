use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{BookingEvent, Notification};

/// Errors a delivery channel can raise
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Delivery failed on channel {channel}: {message}")]
    Delivery { channel: String, message: String },
}

/// A destination for booking notifications
///
/// Channels are attached to the notifier in order; delivery is synchronous
/// and at-most-once per channel per event, with no retry and no persistence
/// of missed notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    fn deliver(&self, notification: &Notification) -> Result<(), ChannelError>;
}

/// Renders the notification into the interactive session via the log
///
/// The only concrete channel; `channel` on the notification record stays
/// informational until an external channel exists.
pub struct SessionLogChannel;

impl NotificationChannel for SessionLogChannel {
    fn name(&self) -> &'static str {
        "session"
    }

    fn deliver(&self, notification: &Notification) -> Result<(), ChannelError> {
        info!(
            user_id = %notification.user_id,
            kind = %notification.kind,
            "Notification: {}",
            notification.message
        );
        Ok(())
    }
}

/// Fans booking events out to every attached channel, in attachment order
///
/// One channel failing never stops delivery to the rest: the failure is
/// logged and the loop continues.
#[derive(Default)]
pub struct Notifier {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a channel at the end of the delivery order
    pub fn attach(&mut self, channel: Arc<dyn NotificationChannel>) {
        self.channels.push(channel);
    }

    /// Detach the first channel with the given name; no-op when absent
    pub fn detach(&mut self, name: &str) {
        if let Some(position) = self.channels.iter().position(|c| c.name() == name) {
            self.channels.remove(position);
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Deliver one event to every attached channel.
    ///
    /// Returns the notifications that were actually delivered.
    pub fn dispatch(&self, event: &BookingEvent) -> Vec<Notification> {
        let mut delivered = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let notification = Notification::from_event(event, channel.name());
            match channel.deliver(&notification) {
                Ok(()) => delivered.push(notification),
                Err(err) => {
                    warn!(
                        channel = channel.name(),
                        booking_id = %event.booking_id,
                        error = %err,
                        "Notification delivery failed, continuing with remaining channels"
                    );
                }
            }
        }

        delivered
    }

    /// Deliver a batch of events in order
    pub fn dispatch_all(&self, events: &[BookingEvent]) -> Vec<Notification> {
        events.iter().flat_map(|event| self.dispatch(event)).collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records every delivered message, for asserting fan-out order
    pub struct RecordingChannel {
        name: &'static str,
        pub delivered: Mutex<Vec<Notification>>,
    }

    impl RecordingChannel {
        pub fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                delivered: Mutex::new(Vec::new()),
            })
        }

        pub fn messages(&self) -> Vec<String> {
            self.delivered
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.message.clone())
                .collect()
        }
    }

    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &'static str {
            self.name
        }

        fn deliver(&self, notification: &Notification) -> Result<(), ChannelError> {
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }
}
