use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::constants::events;
use crate::state_machine::CheckInStatus;

/// Change notifications emitted by the live board and metrics dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// A live list response was applied
    Refreshed { sequence: u64, count: usize },
    /// A refresh failed; stale data is still displayed
    RefreshFailed { sequence: u64, message: String },
    /// The backend accepted a status command
    StatusChanged {
        checkin_id: i64,
        target: CheckInStatus,
    },
    /// The backend rejected a status command
    CommandRejected { checkin_id: i64, message: String },
    /// The shared clock advanced
    Tick { now: DateTime<Utc> },
    /// A dashboard metrics payload was applied
    MetricsRefreshed { generated_at: Option<DateTime<Utc>> },
}

impl BoardEvent {
    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Refreshed { .. } => events::BOARD_REFRESHED,
            Self::RefreshFailed { .. } => events::BOARD_REFRESH_FAILED,
            Self::StatusChanged { .. } => events::CHECKIN_STATUS_CHANGED,
            Self::CommandRejected { .. } => events::CHECKIN_COMMAND_REJECTED,
            Self::Tick { .. } => events::BOARD_TICK,
            Self::MetricsRefreshed { .. } => events::METRICS_REFRESHED,
        }
    }
}

/// Event published to subscribers
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub event: BoardEvent,
    pub published_at: DateTime<Utc>,
}

/// Fan-out publisher for board events
#[derive(Debug, Clone)]
pub struct BoardEventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

impl BoardEventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: BoardEvent) {
        tracing::trace!(event = event.name(), "Publishing board event");
        let _ = self.sender.send(PublishedEvent {
            event,
            published_at: Utc::now(),
        });
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BoardEventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let publisher = BoardEventPublisher::default();
        publisher.publish(BoardEvent::Refreshed {
            sequence: 1,
            count: 0,
        });
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let publisher = BoardEventPublisher::default();
        let mut receiver = publisher.subscribe();

        publisher.publish(BoardEvent::CommandRejected {
            checkin_id: 3,
            message: "conflict".to_string(),
        });

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.event.name(), "checkin.command_rejected");
    }
}
