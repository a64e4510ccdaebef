//! Push channel for grocery list changes (Server-Sent Events).

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::Stream;
use indkob_core::events::ChangeEvent;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::{events::GROCERY_CHANGED, main_lib::AppState};

/// Turns a change subscription into an SSE stream.
///
/// The stream ends when the subscriber falls behind its buffer. The client
/// then reconnects and resyncs instead of silently missing events.
pub fn change_stream(
    receiver: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    let receiver = BroadcastStream::new(receiver);
    tokio_stream::StreamExt::map_while(receiver, |event| match event {
        Ok(evt) => match SseEvent::default().event(GROCERY_CHANGED).json_data(&evt) {
            Ok(sse_event) => Some(Ok(sse_event)),
            Err(err) => {
                tracing::error!(
                    "Failed to serialize grocery change {}: {}",
                    evt.kind.as_str(),
                    err
                );
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::warn!(
                "Hub client lagged behind by {} grocery change(s); closing its stream",
                missed
            );
            None
        }
    })
}

async fn grocery_hub(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = state.change_notifier.subscribe();
    tracing::debug!(
        "Hub client connected ({} total)",
        state.change_notifier.subscriber_count()
    );

    Sse::new(change_stream(receiver)).keep_alive(
        KeepAlive::new()
            .interval(state.hub_keep_alive)
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/hubs/grocery", get(grocery_hub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GroceryChangeBroadcaster;
    use futures::StreamExt;
    use indkob_core::events::GroceryChangeNotifier;

    #[tokio::test]
    async fn lagging_subscriber_stream_is_closed() {
        let broadcaster = GroceryChangeBroadcaster::new(2);
        let stream = change_stream(broadcaster.subscribe());
        futures::pin_mut!(stream);

        for id in 1..=5 {
            broadcaster.notify_created(id);
        }

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn stream_forwards_events_while_in_step() {
        let broadcaster = GroceryChangeBroadcaster::new(8);
        let stream = change_stream(broadcaster.subscribe());
        futures::pin_mut!(stream);

        broadcaster.notify_created(1);
        broadcaster.notify_cleared();

        assert!(matches!(stream.next().await, Some(Ok(_))));
        assert!(matches!(stream.next().await, Some(Ok(_))));
        drop(broadcaster);
        assert!(stream.next().await.is_none());
    }
}
