//! Push channel transport.
//!
//! The realtime client only sees the [`ChannelConnector`] and [`Channel`]
//! traits; [`SseConnector`] is the production transport over the grocery hub.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use indkob_core::events::{ChangeEvent, GROCERY_CHANGED};
use reqwest::header::{ACCEPT, CACHE_CONTROL};

use crate::config::DEFAULT_IDLE_TIMEOUT_SECS;
use crate::error::{RealtimeError, Result};
use crate::sse::{SseFrame, SseFrameParser};

/// Path of the grocery hub relative to the backend base URL.
pub const GROCERY_HUB_PATH: &str = "/api/hubs/grocery";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// An open push connection.
#[async_trait]
pub trait Channel: Send {
    /// Next event from the server.
    ///
    /// `None` means the server closed the channel. A `Json` error is a single
    /// malformed message; any other error means the connection is lost.
    async fn next_event(&mut self) -> Option<Result<ChangeEvent>>;

    /// Closes the channel from the client side.
    async fn close(&mut self);
}

/// Opens push channels.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Channel>>;
}

/// Connects to the grocery hub over Server-Sent Events.
#[derive(Debug, Clone)]
pub struct SseConnector {
    client: reqwest::Client,
    url: String,
    idle_timeout: Duration,
}

impl SseConnector {
    /// `base_url` is the backend origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self> {
        // No overall request timeout: the stream stays open indefinitely.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuses an existing client, e.g. one carrying the session cookie.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), GROCERY_HUB_PATH),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }

    /// Longest silence tolerated on an open channel before it counts as lost.
    ///
    /// Keep-alive comments count as traffic, so this should comfortably
    /// exceed the hub's keep-alive interval.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChannelConnector for SseConnector {
    async fn connect(&self) -> Result<Box<dyn Channel>> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| RealtimeError::connect(format!("Failed to reach {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RealtimeError::api(status.as_u16(), body));
        }

        log::info!("Connected to grocery hub at {}", self.url);
        let stream = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| RealtimeError::channel(format!("Stream error: {}", e)))
            })
            .boxed();

        Ok(Box::new(SseChannel::new(stream, self.idle_timeout)))
    }
}

struct SseChannel {
    stream: BoxStream<'static, Result<Vec<u8>>>,
    parser: SseFrameParser,
    pending: VecDeque<SseFrame>,
    idle_timeout: Duration,
}

impl SseChannel {
    fn new(stream: BoxStream<'static, Result<Vec<u8>>>, idle_timeout: Duration) -> Self {
        Self {
            stream,
            parser: SseFrameParser::new(),
            pending: VecDeque::new(),
            idle_timeout,
        }
    }
}

#[async_trait]
impl Channel for SseChannel {
    async fn next_event(&mut self) -> Option<Result<ChangeEvent>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                if frame.event != GROCERY_CHANGED {
                    log::trace!("Ignoring hub message '{}'", frame.event);
                    continue;
                }
                return Some(serde_json::from_str(&frame.data).map_err(RealtimeError::from));
            }
            let next = match tokio::time::timeout(self.idle_timeout, self.stream.next()).await {
                Ok(next) => next,
                Err(_) => {
                    return Some(Err(RealtimeError::channel(format!(
                        "No traffic for {:?}",
                        self.idle_timeout
                    ))))
                }
            };
            match next {
                Some(Ok(chunk)) => match self.parser.push(&chunk) {
                    Ok(frames) => self.pending.extend(frames),
                    Err(err) => return Some(Err(err)),
                },
                Some(Err(err)) => return Some(Err(err)),
                None => return None,
            }
        }
    }

    async fn close(&mut self) {
        self.stream = stream::empty().boxed();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indkob_core::events::ChangeKind;

    use tokio::time::Instant;

    const IDLE: Duration = Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS);

    fn chunk(text: &'static str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn channel_from(chunks: Vec<&'static str>) -> SseChannel {
        SseChannel::new(stream::iter(chunks.into_iter().map(chunk)).boxed(), IDLE)
    }

    #[test]
    fn hub_url_is_joined_to_base() {
        let connector = SseConnector::with_client(reqwest::Client::new(), "http://host:8080/");
        assert_eq!(connector.url(), "http://host:8080/api/hubs/grocery");
    }

    #[tokio::test]
    async fn channel_yields_only_grocery_changes() {
        let mut channel = channel_from(vec![
            ": keep-alive\n\n",
            "event: other\ndata: {}\n\n",
            "event: groceryChanged\ndata: {\"type\":\"deleted\",\"entryId\":4,",
            "\"atUtc\":\"2024-03-04T10:00:00Z\"}\n\n",
        ]);

        let event = channel.next_event().await.unwrap().unwrap();
        assert_eq!(event.kind, ChangeKind::Deleted);
        assert_eq!(event.entry_id, Some(4));
        assert!(channel.next_event().await.is_none());
    }

    #[tokio::test]
    async fn malformed_payload_is_a_json_error() {
        let mut channel = channel_from(vec!["event: groceryChanged\ndata: nope\n\n"]);
        let next = channel.next_event().await.unwrap();
        assert!(matches!(next, Err(RealtimeError::Json(_))));
    }

    #[tokio::test]
    async fn closed_channel_reports_end() {
        let mut channel = channel_from(vec!["event: groceryChanged\ndata: {}\n\n"]);
        channel.close().await;
        assert!(channel.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn silent_server_is_reported_as_lost() {
        let stream = stream::iter(vec![chunk(": keep-alive\n\n")])
            .chain(stream::pending())
            .boxed();
        let mut channel = SseChannel::new(stream, IDLE);
        let started = Instant::now();

        let next = channel.next_event().await;

        assert!(matches!(next, Some(Err(RealtimeError::Channel(_)))));
        assert!(started.elapsed() >= IDLE);
        assert!(started.elapsed() < IDLE * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn keep_alives_hold_the_channel_open() {
        // Keep-alives every 15 s for a minute, then a real event.
        let ticks = stream::unfold(0u32, |sent| async move {
            if sent == 4 {
                return None;
            }
            tokio::time::sleep(Duration::from_secs(15)).await;
            Some((chunk(": keep-alive\n\n"), sent + 1))
        });
        let event = stream::iter(vec![chunk(
            "event: groceryChanged\ndata: {\"type\":\"cleared\",\"entryId\":null}\n\n",
        )]);
        let stream = ticks.chain(event).chain(stream::pending()).boxed();
        let mut channel = SseChannel::new(stream, IDLE);
        let started = Instant::now();

        let event = channel.next_event().await.unwrap().unwrap();

        assert_eq!(event.kind, ChangeKind::Cleared);
        assert!(started.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn oversized_frame_fails_the_channel() {
        let big = "x".repeat(crate::sse::MAX_PENDING_BYTES + 1);
        let stream = stream::iter(vec![Ok(big.into_bytes())]).boxed();
        let mut channel = SseChannel::new(stream, IDLE);
        let next = channel.next_event().await;
        assert!(matches!(next, Some(Err(RealtimeError::Channel(_)))));
    }
}
