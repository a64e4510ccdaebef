//! Realtime client: owns the push channel and its connection state.
//!
//! At most one connect loop runs at a time. The loop retries with the
//! configured [`RetrySchedule`] until a channel opens, the client is stopped,
//! or the session loses authentication. Every successful (re)connect emits a
//! synthetic `resync` event ahead of any server event, because the client
//! cannot know what it missed while disconnected.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use indkob_core::events::ChangeEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot, watch, Mutex};
use tokio::task::JoinHandle;

use crate::auth::{AuthState, AuthUser};
use crate::backoff::RetrySchedule;
use crate::config::RealtimeConfig;
use crate::error::{RealtimeError, Result};
use crate::transport::{Channel, ChannelConnector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }
}

/// The connect loop currently in flight.
struct ConnectLoop {
    id: u64,
    done: Shared<BoxFuture<'static, ()>>,
}

/// The open channel and the task reading from it.
struct ActiveChannel {
    id: u64,
    close_tx: oneshot::Sender<()>,
    reader: JoinHandle<()>,
}

impl ActiveChannel {
    async fn close(self) {
        let _ = self.close_tx.send(());
        if let Err(err) = self.reader.await {
            log::error!("Channel reader ended abnormally: {}", err);
        }
    }
}

struct Inner {
    connector: Arc<dyn ChannelConnector>,
    auth: AuthState,
    retry: RetrySchedule,
    state_tx: watch::Sender<ConnectionState>,
    changes_tx: broadcast::Sender<ChangeEvent>,
    /// Manual-stop flag. Set by `stop`, cleared when `ensure_started` starts a loop.
    stop_tx: watch::Sender<bool>,
    destroyed: AtomicBool,
    next_id: AtomicU64,
    connect_loop: Mutex<Option<ConnectLoop>>,
    active: Mutex<Option<ActiveChannel>>,
    auth_watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn set_state(&self, next: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            log::debug!("Realtime state {} -> {}", current.as_str(), next.as_str());
            *current = next;
            true
        });
    }

    fn may_connect(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
            && !*self.stop_tx.borrow()
            && self.auth.is_authenticated()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Session-scoped client for the grocery hub.
///
/// Cloning shares the same connection. Call [`RealtimeClient::shutdown`] when
/// the session ends; it also ends the auth watcher task.
#[derive(Clone)]
pub struct RealtimeClient {
    inner: Arc<Inner>,
}

impl RealtimeClient {
    pub fn new(
        connector: Arc<dyn ChannelConnector>,
        auth: AuthState,
        config: RealtimeConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (changes_tx, _) = broadcast::channel(config.change_buffer.max(1));
        let (stop_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                connector,
                auth,
                retry: config.retry,
                state_tx,
                changes_tx,
                stop_tx,
                destroyed: AtomicBool::new(false),
                next_id: AtomicU64::new(1),
                connect_loop: Mutex::new(None),
                active: Mutex::new(None),
                auth_watcher: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Server events, each connect preceded by one `resync`.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.changes_tx.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Starts connecting unless there is nothing to do.
    ///
    /// Returns once the loop in flight (new or existing) has finished, that
    /// is when the channel is open or the attempt was cancelled.
    pub async fn ensure_started(&self) {
        let in_flight = {
            let mut slot = self.inner.connect_loop.lock().await;
            if self.is_shut_down() || !self.inner.auth.is_authenticated() {
                return;
            }
            if self.state() == ConnectionState::Connected {
                return;
            }
            match slot.as_ref() {
                Some(running) => running.done.clone(),
                None => {
                    self.inner.stop_tx.send_replace(false);
                    let started = spawn_connect_loop(&self.inner, false);
                    let done = started.done.clone();
                    *slot = Some(started);
                    done
                }
            }
        };
        in_flight.await;
    }

    /// Stops connecting and closes the channel. Safe to call repeatedly.
    pub async fn stop(&self) {
        self.inner.stop_tx.send_replace(true);

        let in_flight = self
            .inner
            .connect_loop
            .lock()
            .await
            .as_ref()
            .map(|running| running.done.clone());
        if let Some(done) = in_flight {
            done.await;
        }

        let active = self.inner.active.lock().await.take();
        if let Some(active) = active {
            active.close().await;
            log::info!("Realtime channel closed");
        }
        self.inner.set_state(ConnectionState::Disconnected);
    }

    /// Ends the session: no further connects are possible.
    pub async fn shutdown(&self) {
        self.inner.destroyed.store(true, Ordering::SeqCst);
        if let Some(watcher) = self.inner.auth_watcher.lock().await.take() {
            watcher.abort();
        }
        self.stop().await;
    }

    /// Follows the auth signal: signed in starts the client, signed out stops it.
    pub async fn spawn_auth_watcher(&self) {
        let mut slot = self.inner.auth_watcher.lock().await;
        if slot.is_some() || self.is_shut_down() {
            return;
        }
        let client = self.clone();
        let mut user_rx = self.inner.auth.subscribe();
        *slot = Some(tokio::spawn(async move {
            loop {
                let signed_in = user_rx.borrow_and_update().is_some();
                if signed_in {
                    client.ensure_started().await;
                } else {
                    client.stop().await;
                }
                if user_rx.changed().await.is_err() {
                    break;
                }
            }
        }));
    }
}

fn spawn_connect_loop(inner: &Arc<Inner>, recovering: bool) -> ConnectLoop {
    let id = inner.next_id();
    let task = tokio::spawn(run_connect_loop(inner.clone(), id, recovering));
    let done = async move {
        if let Err(err) = task.await {
            log::error!("Connect loop ended abnormally: {}", err);
        }
    }
    .boxed()
    .shared();
    ConnectLoop { id, done }
}

async fn run_connect_loop(inner: Arc<Inner>, id: u64, recovering: bool) {
    let opened = establish(&inner, recovering).await;

    // Leaving the slot and publishing the outcome happen under the same lock,
    // so `ensure_started` never sees a finished loop that is not yet connected.
    let mut slot = inner.connect_loop.lock().await;
    if slot.as_ref().map(|running| running.id) == Some(id) {
        *slot = None;
    }
    match opened {
        Some(channel) if inner.may_connect() => activate(&inner, channel).await,
        Some(mut channel) => {
            channel.close().await;
            inner.set_state(ConnectionState::Disconnected);
        }
        None => inner.set_state(ConnectionState::Disconnected),
    }
    drop(slot);
}

/// Retries until a channel opens. `None` when cancelled.
async fn establish(inner: &Inner, recovering: bool) -> Option<Box<dyn Channel>> {
    let mut stop_rx = inner.stop_tx.subscribe();
    let mut user_rx = inner.auth.subscribe();
    let mut failures: u32 = 0;

    while inner.may_connect() {
        if failures == 0 && !recovering {
            inner.set_state(ConnectionState::Connecting);
        } else {
            inner.set_state(ConnectionState::Reconnecting);
        }

        let attempt = tokio::select! {
            _ = cancelled(&mut stop_rx, &mut user_rx) => return None,
            result = inner.connector.connect() => result,
        };

        match attempt {
            Ok(channel) => return Some(channel),
            Err(err) => {
                failures = failures.saturating_add(1);
                let delay = inner.retry.delay_for(failures);
                log::warn!(
                    "Connect attempt {} failed: {}. Retrying in {:?}",
                    failures,
                    err,
                    delay
                );
                tokio::select! {
                    _ = cancelled(&mut stop_rx, &mut user_rx) => return None,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
    None
}

/// Resolves once the client is stopped or the session is no longer authenticated.
async fn cancelled(
    stop_rx: &mut watch::Receiver<bool>,
    user_rx: &mut watch::Receiver<Option<AuthUser>>,
) {
    tokio::select! {
        _ = stop_rx.wait_for(|stopped| *stopped) => {}
        _ = user_rx.wait_for(|user| user.is_none()) => {}
    }
}

async fn activate(inner: &Arc<Inner>, channel: Box<dyn Channel>) {
    let mut active = inner.active.lock().await;
    if let Some(previous) = active.take() {
        let _ = previous.close_tx.send(());
    }

    let id = inner.next_id();
    inner.set_state(ConnectionState::Connected);
    let _ = inner.changes_tx.send(ChangeEvent::resync());

    let (close_tx, close_rx) = oneshot::channel();
    let reader = tokio::spawn(read_channel(inner.clone(), id, channel, close_rx));
    *active = Some(ActiveChannel {
        id,
        close_tx,
        reader,
    });
    log::info!("Realtime channel connected");
}

enum ReaderStep {
    CloseRequested,
    Next(Option<Result<ChangeEvent>>),
}

async fn read_channel(
    inner: Arc<Inner>,
    id: u64,
    mut channel: Box<dyn Channel>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let reason = loop {
        let step = tokio::select! {
            _ = &mut close_rx => ReaderStep::CloseRequested,
            next = channel.next_event() => ReaderStep::Next(next),
        };
        match step {
            ReaderStep::CloseRequested => {
                channel.close().await;
                return;
            }
            ReaderStep::Next(Some(Ok(event))) => {
                let _ = inner.changes_tx.send(event);
            }
            ReaderStep::Next(Some(Err(RealtimeError::Json(err)))) => {
                log::warn!("Skipping malformed change event: {}", err);
            }
            ReaderStep::Next(Some(Err(err))) => break err.to_string(),
            ReaderStep::Next(None) => break "closed by server".to_string(),
        }
    };

    channel.close().await;
    {
        let mut active = inner.active.lock().await;
        if active.as_ref().map(|current| current.id) != Some(id) {
            // Already taken by `stop`.
            return;
        }
        *active = None;
    }

    log::warn!("Realtime channel lost: {}", reason);
    inner.set_state(ConnectionState::Disconnected);
    restart_after_loss(&inner).await;
}

async fn restart_after_loss(inner: &Arc<Inner>) {
    let mut slot = inner.connect_loop.lock().await;
    if !inner.may_connect() || slot.is_some() {
        return;
    }
    *slot = Some(spawn_connect_loop(inner, true));
}
