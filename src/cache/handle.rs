//! Cache Handle
//!
//! The async public face of a cache instance. A handle owns the worker task
//! and the two maintenance timers; clones share the same instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::worker::{self, Command};
use crate::cache::{CacheOptions, CacheSettings, CacheStats, CacheStore, SettingsUpdate, Ttl};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_maintenance_timer, MaintenanceTask};

// == Cache Handle ==
/// Cloneable handle to a running cache.
///
/// Every call is queued to the instance's worker and resolves once the worker
/// has applied it. After [`CacheHandle::dispose`] every call fails with
/// [`CacheError::Disposed`].
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<Inner>,
}

struct Inner {
    commands: mpsc::Sender<Command>,
    disposed: AtomicBool,
    timers: Mutex<Vec<JoinHandle<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CacheHandle {
    // == Constructor ==
    /// Starts a cache instance: an empty table, its worker and both timers.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn start(options: CacheOptions) -> Self {
        let (commands, queue) = mpsc::channel(options.queue_capacity());

        let worker = tokio::spawn(worker::run(CacheStore::new(options.settings()), queue));
        let timers = vec![
            spawn_maintenance_timer(
                commands.clone(),
                MaintenanceTask::ExpirySweep,
                options.clear_expired_values_period(),
            ),
            spawn_maintenance_timer(
                commands.clone(),
                MaintenanceTask::PopularityDecay,
                options.decrease_popularity_period(),
            ),
        ];

        info!(
            "Cache started: max_key_count={}, default_ttl={}, sweep every {:?}, decay every {:?}",
            options.settings().max_key_count,
            options.settings().default_ttl,
            options.clear_expired_values_period(),
            options.decrease_popularity_period()
        );

        Self {
            inner: Arc::new(Inner {
                commands,
                disposed: AtomicBool::new(false),
                timers: Mutex::new(timers),
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    // == Set ==
    /// Stores `value` under `key`; a `None` value deletes the key.
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: Option<String>,
        ttl: Option<Ttl>,
    ) -> Result<()> {
        let key = key.into();
        self.request(|reply| Command::Set {
            key,
            value,
            ttl,
            reply,
        })
        .await?
    }

    // == Get ==
    /// Returns the value for `key`, or None if absent or expired.
    pub async fn get(&self, key: impl Into<String>) -> Result<Option<String>> {
        let key = key.into();
        self.request(|reply| Command::Get { key, reply }).await
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub async fn delete(&self, key: impl Into<String>) -> Result<bool> {
        let key = key.into();
        self.request(|reply| Command::Delete { key, reply }).await
    }

    // == Keys ==
    /// Lists current keys; may include expired keys not yet swept.
    pub async fn keys(&self) -> Result<Vec<String>> {
        self.request(|reply| Command::Keys { reply }).await
    }

    // == Settings ==
    pub async fn settings(&self) -> Result<CacheSettings> {
        self.request(|reply| Command::Settings { reply }).await
    }

    /// Applies a partial settings update, serialized with other operations.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<()> {
        self.request(|reply| Command::UpdateSettings { update, reply })
            .await?
    }

    // == Stats ==
    pub async fn stats(&self) -> Result<CacheStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    // == Dispose ==
    /// Stops both timers, then clears the table and stops the worker.
    ///
    /// Idempotent: only the first call does any work.
    pub async fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let timers = std::mem::take(&mut *self.inner.timers.lock().await);
        for timer in timers {
            timer.abort();
            // Wait until the timer can no longer submit anything
            let _ = timer.await;
        }

        let (reply, stopped) = oneshot::channel();
        if self
            .inner
            .commands
            .send(Command::Shutdown { reply })
            .await
            .is_ok()
        {
            let _ = stopped.await;
        }

        if let Some(worker) = self.inner.worker.lock().await.take() {
            if let Err(e) = worker.await {
                warn!("Cache worker ended abnormally: {}", e);
            }
        }

        info!("Cache disposed");
    }

    #[cfg(test)]
    async fn timer_abort_handles(&self) -> Vec<tokio::task::AbortHandle> {
        self.inner
            .timers
            .lock()
            .await
            .iter()
            .map(JoinHandle::abort_handle)
            .collect()
    }

    /// Queues a command and waits for its reply.
    ///
    /// A closed queue or a dropped reply both mean the worker has shut down.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        if self.is_disposed() {
            return Err(CacheError::Disposed);
        }

        let (reply, response) = oneshot::channel();
        self.inner
            .commands
            .send(command(reply))
            .await
            .map_err(|_| CacheError::Disposed)?;

        response.await.map_err(|_| CacheError::Disposed)
    }
}

impl Drop for Inner {
    // Without the timers holding senders, the worker sees the queue close
    // and clears the table on its own.
    fn drop(&mut self) {
        for timer in self.timers.get_mut().drain(..) {
            timer.abort();
        }
    }
}
