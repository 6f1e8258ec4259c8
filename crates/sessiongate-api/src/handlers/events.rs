//! Server-sent event stream of session events.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use sessiongate_realtime::{EventHub, Subscriber};

use crate::extractors::AuthenticatedBrowser;
use crate::state::AppState;

/// Unsubscribes when the stream is dropped, however it ends: peer disconnect,
/// hub-side cancellation, or channel close. Unsubscribing twice is harmless.
struct StreamGuard {
    hub: Arc<EventHub>,
    user_id: String,
    client_id: Uuid,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.hub.unsubscribe(&self.user_id, self.client_id);
    }
}

struct StreamState {
    subscriber: Arc<Subscriber>,
    receiver: mpsc::Receiver<String>,
    greeted: bool,
    _guard: StreamGuard,
}

/// `GET /api/events` — per-user event stream.
///
/// Emits `data: connected` first so the client knows the subscription is
/// live, then one `data:` frame per published event. The keep-alive layer
/// writes a `: keepalive` comment on the configured interval to defeat proxy
/// idle timeouts without touching the subscriber set.
pub async fn subscribe_events(
    State(state): State<AppState>,
    auth: AuthenticatedBrowser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (subscriber, receiver) = state.events.subscribe(&auth.user_id);
    let guard = StreamGuard {
        hub: Arc::clone(&state.events),
        user_id: auth.user_id.clone(),
        client_id: subscriber.client_id,
    };

    let stream = stream::unfold(
        StreamState {
            subscriber,
            receiver,
            greeted: false,
            _guard: guard,
        },
        |mut stream_state| async move {
            if !stream_state.greeted {
                stream_state.greeted = true;
                return Some((Ok(Event::default().data("connected")), stream_state));
            }
            tokio::select! {
                _ = stream_state.subscriber.closed.cancelled() => None,
                message = stream_state.receiver.recv() => {
                    message.map(|m| (Ok(Event::default().data(m)), stream_state))
                }
            }
        },
    );

    let heartbeat = Duration::from_secs(state.config.events.heartbeat_interval_seconds);
    Sse::new(stream).keep_alive(KeepAlive::new().interval(heartbeat).text("keepalive"))
}
