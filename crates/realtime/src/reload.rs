//! Keeps a local copy of the grocery list in step with the server.
//!
//! Change events never patch the list. They only schedule a full re-fetch:
//! a burst of events inside one coalescing window yields a single reload,
//! a reload requested while another is loading runs exactly once afterwards,
//! and a periodic poll bounds staleness when events are lost.

use std::sync::Arc;

use async_trait::async_trait;
use indkob_core::events::ChangeEvent;
use indkob_core::grocery::GroceryEntry;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::SyncConfig;
use crate::error::Result;

/// Authoritative source of the full grocery list.
#[async_trait]
pub trait EntriesSource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<GroceryEntry>>;
}

/// Transient, user-visible sync problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotice {
    /// The list could not be fetched; the previous list is still shown.
    ReloadFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReloadPhase {
    Idle,
    Loading { queued: bool },
}

struct SyncInner {
    source: Arc<dyn EntriesSource>,
    config: SyncConfig,
    entries_tx: watch::Sender<Vec<GroceryEntry>>,
    notices_tx: broadcast::Sender<SyncNotice>,
    phase: Mutex<ReloadPhase>,
}

/// Local grocery list plus the reload scheduler feeding it.
#[derive(Clone)]
pub struct GroceryListSync {
    inner: Arc<SyncInner>,
}

impl GroceryListSync {
    pub fn new(source: Arc<dyn EntriesSource>, config: SyncConfig) -> Self {
        let (entries_tx, _) = watch::channel(Vec::new());
        let (notices_tx, _) = broadcast::channel(config.notice_buffer.max(1));
        Self {
            inner: Arc::new(SyncInner {
                source,
                config,
                entries_tx,
                notices_tx,
                phase: Mutex::new(ReloadPhase::Idle),
            }),
        }
    }

    pub fn entries(&self) -> Vec<GroceryEntry> {
        self.inner.entries_tx.borrow().clone()
    }

    pub fn subscribe_entries(&self) -> watch::Receiver<Vec<GroceryEntry>> {
        self.inner.entries_tx.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<SyncNotice> {
        self.inner.notices_tx.subscribe()
    }

    /// Re-fetches the whole list.
    ///
    /// If a reload is already loading, marks it queued and returns at once;
    /// the running reload then loads one more time when it finishes.
    pub async fn reload(&self) {
        {
            let mut phase = self.inner.phase.lock().await;
            match *phase {
                ReloadPhase::Loading { .. } => {
                    *phase = ReloadPhase::Loading { queued: true };
                    return;
                }
                ReloadPhase::Idle => *phase = ReloadPhase::Loading { queued: false },
            }
        }

        loop {
            self.load_once().await;

            let mut phase = self.inner.phase.lock().await;
            if *phase == (ReloadPhase::Loading { queued: true }) {
                *phase = ReloadPhase::Loading { queued: false };
                continue;
            }
            *phase = ReloadPhase::Idle;
            break;
        }
    }

    async fn load_once(&self) {
        match self.inner.source.fetch_entries().await {
            Ok(entries) => {
                log::debug!("Grocery list reloaded ({} entries)", entries.len());
                self.inner.entries_tx.send_replace(entries);
            }
            Err(err) => {
                log::warn!("Grocery list reload failed: {}", err);
                let _ = self.inner.notices_tx.send(SyncNotice::ReloadFailed {
                    message: err.to_string(),
                });
            }
        }
    }

    fn spawn_reload(&self, reloads: &mut JoinSet<()>) {
        let sync = self.clone();
        reloads.spawn(async move { sync.reload().await });
    }

    /// Aborts reloads still in flight so nothing is applied after shutdown.
    async fn abort_reloads(&self, mut reloads: JoinSet<()>) {
        reloads.abort_all();
        let mut interrupted = false;
        while let Some(joined) = reloads.join_next().await {
            match joined {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => interrupted = true,
                Err(err) => log::error!("Grocery list reload ended abnormally: {}", err),
            }
        }
        if interrupted {
            // The aborted reload never reached the end of its loop.
            *self.inner.phase.lock().await = ReloadPhase::Idle;
        }
    }

    /// Starts the scheduler: an initial reload, coalesced reloads on change
    /// events, and the periodic fallback poll.
    pub fn start(&self, changes: broadcast::Receiver<ChangeEvent>) -> SyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.clone().run(changes, shutdown_rx));
        SyncHandle { shutdown_tx, task }
    }

    async fn run(
        self,
        mut changes: broadcast::Receiver<ChangeEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let window_len = self.inner.config.coalesce_window;
        let mut poll = tokio::time::interval(self.inner.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let window = tokio::time::sleep(window_len);
        tokio::pin!(window);
        let mut window_open = false;
        let mut changes_open = true;
        let mut reloads = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.wait_for(|stop| *stop) => break,
                received = changes.recv(), if changes_open => {
                    let trigger = match received {
                        Ok(_) => true,
                        Err(RecvError::Lagged(missed)) => {
                            log::debug!("Change subscription lagged by {} event(s)", missed);
                            true
                        }
                        Err(RecvError::Closed) => {
                            log::info!("Change feed closed; relying on periodic reload");
                            changes_open = false;
                            false
                        }
                    };
                    // Only the first event opens a window; later ones ride along.
                    if trigger && !window_open {
                        window.as_mut().reset(Instant::now() + window_len);
                        window_open = true;
                    }
                }
                _ = &mut window, if window_open => {
                    window_open = false;
                    self.spawn_reload(&mut reloads);
                }
                _ = poll.tick() => self.spawn_reload(&mut reloads),
                Some(joined) = reloads.join_next(), if !reloads.is_empty() => {
                    if let Err(err) = joined {
                        log::error!("Grocery list reload ended abnormally: {}", err);
                    }
                }
            }
        }
        self.abort_reloads(reloads).await;
        log::debug!("Grocery list sync stopped");
    }
}

/// Running scheduler returned by [`GroceryListSync::start`].
pub struct SyncHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stops the scheduler. Once this returns no reload is running and none
    /// will apply a list.
    pub async fn shutdown(self) {
        self.shutdown_tx.send_replace(true);
        if let Err(err) = self.task.await {
            log::error!("Grocery list sync ended abnormally: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RealtimeError;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        failures: std::sync::Mutex<VecDeque<bool>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EntriesSource for FakeSource {
        async fn fetch_entries(&self) -> Result<Vec<GroceryEntry>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            let fail = self.failures.lock().unwrap().pop_front().unwrap_or(false);
            if fail {
                return Err(RealtimeError::api(503, "unavailable"));
            }
            Ok(vec![entry(call as i64)])
        }
    }

    fn entry(id: i64) -> GroceryEntry {
        GroceryEntry {
            id,
            item_id: None,
            item_name: None,
            item_area: None,
            amount: None,
            note: Some(format!("note {}", id)),
            is_done: false,
            created_at: Utc::now(),
        }
    }

    fn sync_over(source: &Arc<FakeSource>) -> GroceryListSync {
        GroceryListSync::new(source.clone(), SyncConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_events_gives_one_reload() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);
        let (changes_tx, changes_rx) = broadcast::channel(64);
        let handle = sync.start(changes_rx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1, "initial reload");

        for id in 1..=5 {
            changes_tx.send(ChangeEvent::created(id)).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(source.calls(), 2);
        assert_eq!(sync.entries()[0].id, 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn separate_windows_give_separate_reloads() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);
        let (changes_tx, changes_rx) = broadcast::channel(64);
        let handle = sync.start(changes_rx);
        tokio::time::sleep(Duration::from_millis(10)).await;

        changes_tx.send(ChangeEvent::updated(1)).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        changes_tx.send(ChangeEvent::updated(1)).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(source.calls(), 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reload_during_load_runs_exactly_once_more() {
        let gate = Arc::new(Semaphore::new(0));
        let source = Arc::new(FakeSource {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let sync = sync_over(&source);

        let first = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.reload().await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);

        // Both return immediately: the running reload absorbs them.
        sync.reload().await;
        sync.reload().await;

        gate.add_permits(10);
        first.await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(sync.entries()[0].id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_without_contention_loads_once() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);

        sync.reload().await;

        assert_eq!(source.calls(), 1);
        assert_eq!(sync.entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reload_keeps_list_and_raises_notice() {
        let source = Arc::new(FakeSource::default());
        source
            .failures
            .lock()
            .unwrap()
            .extend([false, true]);
        let sync = sync_over(&source);
        let mut notices = sync.subscribe_notices();

        sync.reload().await;
        let before = sync.entries();
        sync.reload().await;

        assert_eq!(sync.entries(), before);
        match notices.try_recv().unwrap() {
            SyncNotice::ReloadFailed { message } => assert!(message.contains("503")),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_poll_runs_without_events() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);
        let (_changes_tx, changes_rx) = broadcast::channel(8);
        let handle = sync.start(changes_rx);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(source.calls(), 2);
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(source.calls(), 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn lagged_subscription_still_triggers_reload() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);
        let (changes_tx, changes_rx) = broadcast::channel(2);
        for id in 1..=10 {
            changes_tx.send(ChangeEvent::deleted(id)).unwrap();
        }
        let handle = sync.start(changes_rx);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(source.calls(), 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_discards_reload_in_flight() {
        let gate = Arc::new(Semaphore::new(0));
        let source = Arc::new(FakeSource {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let sync = sync_over(&source);
        let (changes_tx, changes_rx) = broadcast::channel(8);
        let handle = sync.start(changes_rx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1, "initial reload is waiting on the source");
        changes_tx.send(ChangeEvent::cleared()).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        handle.shutdown().await;
        gate.add_permits(10);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(sync.entries().is_empty());
        assert_eq!(source.calls(), 1);

        // A later manual reload is not blocked by the aborted one.
        sync.reload().await;
        assert_eq!(sync.entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_change_feed_falls_back_to_polling() {
        let source = Arc::new(FakeSource::default());
        let sync = sync_over(&source);
        let (changes_tx, changes_rx) = broadcast::channel::<ChangeEvent>(8);
        let handle = sync.start(changes_rx);
        drop(changes_tx);

        tokio::time::sleep(Duration::from_secs(46)).await;
        assert_eq!(source.calls(), 2);
        handle.shutdown().await;
    }
}
