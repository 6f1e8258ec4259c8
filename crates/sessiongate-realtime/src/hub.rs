//! Per-user event fan-out with timeout-based eviction.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::mpsc;
use uuid::Uuid;

use sessiongate_core::config::events::EventsConfig;

use crate::subscriber::Subscriber;

/// Routes events to every live subscriber of a user.
///
/// Publishing fans out concurrently; a subscriber whose channel stays full
/// past the publish timeout is evicted rather than allowed to stall the
/// publisher. Subscription and teardown are synchronous so a stream handler
/// can unsubscribe from a `Drop` guard.
pub struct EventHub {
    subscribers: DashMap<String, Vec<Arc<Subscriber>>>,
    channel_buffer: usize,
    publish_timeout: Duration,
}

impl EventHub {
    /// Creates a hub with the configured channel size and publish timeout.
    pub fn new(config: &EventsConfig) -> Self {
        Self {
            subscribers: DashMap::new(),
            channel_buffer: config.channel_buffer_size,
            publish_timeout: Duration::from_millis(config.publish_timeout_ms),
        }
    }

    /// Registers a new subscriber for the user and returns it together with
    /// the consumer end of its event channel.
    pub fn subscribe(&self, user_id: &str) -> (Arc<Subscriber>, mpsc::Receiver<String>) {
        let (subscriber, receiver) = Subscriber::new(user_id, self.channel_buffer);
        let subscriber = Arc::new(subscriber);

        self.subscribers
            .entry(user_id.to_string())
            .or_default()
            .push(Arc::clone(&subscriber));

        tracing::debug!(
            user_id = %user_id,
            client_id = %subscriber.client_id,
            "event subscriber registered"
        );
        (subscriber, receiver)
    }

    /// Removes one subscriber of the user and fires its `closed` token.
    ///
    /// Idempotent: unknown IDs are ignored, so a stream handler's teardown
    /// guard and a concurrent eviction cannot conflict.
    pub fn unsubscribe(&self, user_id: &str, client_id: Uuid) {
        if let Some(mut entry) = self.subscribers.get_mut(user_id) {
            entry.retain(|subscriber| {
                if subscriber.client_id == client_id {
                    subscriber.closed.cancel();
                    false
                } else {
                    true
                }
            });
        }
        self.subscribers
            .remove_if(user_id, |_, subscribers| subscribers.is_empty());
    }

    /// Removes every subscriber of the user, firing each `closed` token, and
    /// returns how many were dropped.
    pub fn unsubscribe_all(&self, user_id: &str) -> usize {
        let Some((_, subscribers)) = self.subscribers.remove(user_id) else {
            return 0;
        };
        for subscriber in &subscribers {
            subscriber.closed.cancel();
        }
        tracing::debug!(
            user_id = %user_id,
            count = subscribers.len(),
            "event subscribers dropped"
        );
        subscribers.len()
    }

    /// Delivers `event` to every current subscriber of the user, returning
    /// the number of successful deliveries.
    ///
    /// Deliveries run concurrently. A subscriber that cannot accept the event
    /// within the publish timeout, or whose receiver is gone, is evicted and
    /// its `closed` token fired. No subscribers is a no-op.
    pub async fn publish(&self, user_id: &str, event: &str) -> usize {
        let targets: Vec<Arc<Subscriber>> = match self.subscribers.get(user_id) {
            Some(entry) => entry.clone(),
            None => return 0,
        };

        let sends = targets.iter().map(|subscriber| async {
            let outcome = tokio::time::timeout(
                self.publish_timeout,
                subscriber.sender.send(event.to_string()),
            )
            .await;
            match outcome {
                Ok(Ok(())) => Ok(()),
                Ok(Err(_)) | Err(_) => Err(subscriber.client_id),
            }
        });

        let mut delivered = 0;
        for outcome in join_all(sends).await {
            match outcome {
                Ok(()) => delivered += 1,
                Err(client_id) => {
                    tracing::warn!(
                        user_id = %user_id,
                        client_id = %client_id,
                        "event subscriber unresponsive, evicting"
                    );
                    self.unsubscribe(user_id, client_id);
                }
            }
        }
        delivered
    }

    /// Current number of subscribers for the user.
    pub fn subscriber_count(&self, user_id: &str) -> usize {
        self.subscribers
            .get(user_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("users", &self.subscribers.len())
            .field("publish_timeout", &self.publish_timeout)
            .finish_non_exhaustive()
    }
}
