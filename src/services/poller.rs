//! Poller - Interval-Driven Section Fetcher
//!
//! One tokio task per section: fetch immediately, then on every tick, and
//! publish the result through a `watch` channel.
//!
//! ```text
//!   interval tick ──┐
//!                   ├──► fetch() ──► SectionState ──► watch::Sender
//!   refresh() ──────┘       ▲
//!                           │ dropped on stop()
//!   CancellationToken ──────┘
//! ```
//!
//! Fetches are serialized inside the task, so a refresh never overlaps a
//! scheduled fetch; refresh requests made while a fetch runs collapse into
//! one follow-up fetch. Nothing is published once the token is cancelled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::i18n::{self, Locale};
use crate::state::SectionState;

pub struct Poller<T> {
    name: Arc<str>,
    state: watch::Receiver<SectionState<T>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    /// Start polling with English error messages
    pub fn spawn<F, Fut>(name: impl Into<Arc<str>>, interval: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self::spawn_with_locale(name, interval, Locale::EnUS, fetch)
    }

    /// Start polling; must be called within a tokio runtime
    pub fn spawn_with_locale<F, Fut>(
        name: impl Into<Arc<str>>,
        interval: Duration,
        locale: Locale,
        fetch: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let name = name.into();
        let (tx, rx) = watch::channel(SectionState::pending());
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run(
            Arc::clone(&name),
            interval,
            locale,
            fetch,
            tx,
            Arc::clone(&refresh),
            cancel.clone(),
        ));
        info!(poller = %name, ?interval, "Started poller");

        Self {
            name,
            state: rx,
            refresh,
            cancel,
            handle: Some(handle),
        }
    }
}

impl<T> Poller<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest published state (shares the data)
    pub fn current(&self) -> SectionState<T> {
        self.state.borrow().clone()
    }

    /// A receiver that observes every publish
    pub fn subscribe(&self) -> watch::Receiver<SectionState<T>> {
        self.state.clone()
    }

    /// Request an immediate fetch
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Shared handle that triggers the same re-fetch as `refresh`
    pub(crate) fn refresh_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.refresh)
    }

    /// Cancel the timer and any in-flight fetch
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!(poller = %self.name, "Stopping poller");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop and wait for the task to finish
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(poller = %self.name, error = %e, "Poller task ended abnormally");
            }
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<T> std::fmt::Debug for Poller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("name", &self.name)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

async fn run<T, F, Fut>(
    name: Arc<str>,
    interval: Duration,
    locale: Locale,
    fetch: F,
    tx: watch::Sender<SectionState<T>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => ticker.reset(),
        }

        tx.send_modify(|state| state.loading = true);
        debug!(poller = %name, "Fetching");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = fetch() => result,
        };

        // A fetch may finish in the same poll as cancellation
        if cancel.is_cancelled() {
            break;
        }

        match result {
            Ok(data) => {
                debug!(poller = %name, records = data.len(), "Fetched");
                tx.send_modify(|state| state.apply_data(data, Local::now()));
            }
            Err(e) => {
                warn!(poller = %name, error = %e, "Fetch failed");
                let message = i18n::error_message(locale, &e);
                tx.send_modify(|state| state.apply_error(message, Local::now()));
            }
        }
    }

    debug!(poller = %name, "Poller stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_on_interval() {
        let calls = counter();
        let calls_in = Arc::clone(&calls);
        let poller = Poller::spawn("devices", Duration::from_secs(30), move || {
            let n = calls_in.fetch_add(1, Ordering::SeqCst);
            async move { Ok(vec![n]) }
        });

        let mut rx = poller.subscribe();
        rx.wait_for(|s| s.generation == 1).await.expect("first fetch");
        assert_eq!(poller.current().data.as_slice(), &[0]);

        tokio::time::sleep(Duration::from_secs(31)).await;
        rx.wait_for(|s| s.generation == 2).await.expect("second fetch");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(poller.current().data.as_slice(), &[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_error_and_empty_data() {
        let poller: Poller<u32> = Poller::spawn("rules", Duration::from_secs(60), || async {
            Err(Error::Timeout {
                message: "GET /rules".to_string(),
            })
        });

        let mut rx = poller.subscribe();
        let state = rx.wait_for(|s| s.generation == 1).await.expect("result").clone();
        assert!(state.data.is_empty());
        assert!(!state.loading);
        let message = state.error.expect("error recorded");
        assert!(!message.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fetches_before_next_tick() {
        let calls = counter();
        let calls_in = Arc::clone(&calls);
        let poller = Poller::spawn("maintenance", Duration::from_secs(30), move || {
            calls_in.fetch_add(1, Ordering::SeqCst);
            async { Ok(Vec::<u8>::new()) }
        });

        let mut rx = poller.subscribe();
        rx.wait_for(|s| s.generation == 1).await.expect("first fetch");

        poller.refresh();
        rx.wait_for(|s| s.generation == 2).await.expect("refresh fetch");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_fetch() {
        let poller = Poller::spawn("users", Duration::from_secs(60), || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(vec![1u8, 2, 3])
        });
        let rx = poller.subscribe();

        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.stop();
        tokio::time::sleep(Duration::from_secs(20)).await;

        let state = rx.borrow().clone();
        assert_eq!(state.generation, 0);
        assert!(state.data.is_empty());
        assert!(poller.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_joins_task() {
        let mut poller = Poller::spawn("safety", Duration::from_secs(60), || async {
            Ok(Vec::<u8>::new())
        });
        poller.shutdown().await;
        assert!(poller.is_stopped());

        // Sender is gone once the task has exited
        assert!(poller.subscribe().has_changed().is_err());
    }
}
