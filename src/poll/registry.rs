//! Poll task loop and the registry of active polls

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{PollExit, PollKey, PollPolicy, PollState, PolledStatus};
use crate::error::{ApiError, Error, Result};
use crate::notify::{Notice, Notifier};
use crate::retry::{ErrorCategory, classify};

/// Sleep for `delay` unless cancelled first. Returns true when cancelled.
async fn sleep_or_cancel(cancel: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    if *cancel.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => *cancel.borrow(),
        changed = cancel.changed() => changed.is_err() || *cancel.borrow(),
    }
}

fn into_api_error(err: Error) -> ApiError {
    match err {
        Error::Api(api) => api,
        other => ApiError::InvalidResponse(other.to_string()),
    }
}

/// Drive one poll to completion.
///
/// Fetches are strictly sequential: the next one is scheduled only after the
/// previous result was observed. Cancellation is checked before every fetch
/// and again after it returns, so a result that arrives after `stop` is
/// dropped without notifying.
pub async fn run_poll<T, F, Fut, O>(
    policy: PollPolicy,
    mut cancel: watch::Receiver<bool>,
    notifier: Arc<dyn Notifier>,
    mut fetch: F,
    mut observe: O,
) -> PollExit<T>
where
    T: PolledStatus,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    O: FnMut(&T),
{
    let mut state = PollState::new(policy);
    let mut delay = policy.initial_delay;

    loop {
        if sleep_or_cancel(&mut cancel, delay).await {
            return PollExit::Cancelled;
        }

        let outcome = fetch().await;
        if *cancel.borrow() {
            return PollExit::Cancelled;
        }

        match outcome {
            Ok(status) => {
                observe(&status);
                match state.on_success(status.is_terminal()) {
                    Some(next) => {
                        log::debug!(
                            "Poll status '{}', next fetch in {:?}",
                            status.status_label(),
                            next
                        );
                        delay = next;
                    }
                    None => {
                        let notice = status.terminal_notice();
                        log::info!("Poll finished with status '{}'", status.status_label());
                        notifier.notify(notice);
                        return PollExit::Finished(status);
                    }
                }
            }
            Err(err) => {
                let err = into_api_error(err);
                let category = classify(&err);

                let transient = category.is_retryable()
                    || (category == ErrorCategory::NotFound && policy.retry_not_found);
                if !transient {
                    log::warn!("Poll giving up on {:?} error: {}", category, err);
                    notifier.notify(Notice::error(err.to_string()));
                    return PollExit::GaveUp(err);
                }

                match state.on_failure() {
                    Some(next) => {
                        log::warn!(
                            "Poll fetch failed ({} in a row), retrying in {:.1}s: {}",
                            state.failure_count(),
                            next.as_secs_f64(),
                            err
                        );
                        delay = next;
                    }
                    None => {
                        log::warn!(
                            "Poll giving up after {} failures: {}",
                            state.failure_count(),
                            err
                        );
                        notifier.notify(Notice::error(format!("Stopped polling: {}", err)));
                        return PollExit::GaveUp(err);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Active key → generation of the poll holding it
    active: HashMap<PollKey, u64>,
    next_generation: u64,
}

/// Tracks active polls so a key is never polled twice concurrently.
///
/// Cheap to clone; clones share the same set of active polls.
#[derive(Debug, Clone, Default)]
pub struct PollRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn is_active(&self, key: &PollKey) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.active.contains_key(key))
            .unwrap_or(false)
    }

    #[allow(dead_code)]
    pub fn active_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.active.len())
            .unwrap_or(0)
    }

    /// Claim `key`, returning the new generation, or `None` if already taken
    fn claim(&self, key: &PollKey) -> Option<u64> {
        let mut inner = self.inner.lock().ok()?;
        if inner.active.contains_key(key) {
            return None;
        }
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner.active.insert(key.clone(), generation);
        Some(generation)
    }

    /// Release `key` only if it still belongs to `generation`
    fn release(&self, key: &PollKey, generation: u64) {
        if let Ok(mut inner) = self.inner.lock()
            && inner.active.get(key) == Some(&generation)
        {
            inner.active.remove(key);
        }
    }

    /// Start polling `key` on a new task.
    ///
    /// Returns `None` without doing anything when a poll for `key` is
    /// already active.
    pub fn start<T, F, Fut, O>(
        &self,
        key: PollKey,
        policy: PollPolicy,
        notifier: Arc<dyn Notifier>,
        fetch: F,
        observe: O,
    ) -> Option<PollHandle<T>>
    where
        T: PolledStatus + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        O: FnMut(&T) + Send + 'static,
    {
        let Some(generation) = self.claim(&key) else {
            log::debug!("Poll for {} already active", key);
            return None;
        };

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let registry = self.clone();
        let task_key = key.clone();

        log::debug!("Starting poll for {}", key);
        let task = tokio::spawn(async move {
            let exit = run_poll(policy, cancel_rx, notifier, fetch, observe).await;
            registry.release(&task_key, generation);
            exit
        });

        Some(PollHandle {
            key,
            generation,
            cancel: cancel_tx,
            task: Some(task),
            registry: self.clone(),
        })
    }
}

/// Owner's handle on a running poll.
///
/// Dropping the handle stops the poll.
pub struct PollHandle<T> {
    key: PollKey,
    generation: u64,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<PollExit<T>>>,
    registry: PollRegistry,
}

impl<T> PollHandle<T> {
    pub fn key(&self) -> &PollKey {
        &self.key
    }

    /// Stop scheduling fetches and release the key.
    ///
    /// A request already in flight completes, but its result is discarded.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
        self.registry.release(&self.key, self.generation);
    }

    /// Wait for the poll to end
    pub async fn wait(mut self) -> PollExit<T> {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(PollExit::Cancelled),
            None => PollExit::Cancelled,
        }
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
