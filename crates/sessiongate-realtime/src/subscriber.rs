//! A single live event-stream consumer.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One connected event-stream client for a user.
///
/// A user may hold several subscribers at once (multiple tabs). Each carries
/// its own bounded channel; the hub writes into `sender`, the transport
/// handler drains the matching receiver. `closed` fires exactly once, when the
/// hub evicts the subscriber or the handler tears it down, and tells the
/// handler to finish its stream.
#[derive(Debug)]
pub struct Subscriber {
    /// Unique identity of this connection, distinct from the user ID.
    pub client_id: Uuid,
    /// User the subscriber belongs to.
    pub user_id: String,
    /// Hub-side end of the event channel.
    pub sender: mpsc::Sender<String>,
    /// Fired when the subscriber is removed from the hub.
    pub closed: CancellationToken,
}

impl Subscriber {
    /// Creates a subscriber with a fresh client ID and a bounded channel of
    /// `buffer` events, returning the consumer end alongside it.
    pub fn new(user_id: &str, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer);
        let subscriber = Self {
            client_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            sender,
            closed: CancellationToken::new(),
        };
        (subscriber, receiver)
    }
}
