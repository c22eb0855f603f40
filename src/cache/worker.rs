//! Cache Worker
//!
//! The single consumer of the command queue. Every foreground operation and
//! every maintenance pass is applied here, one at a time, in queue order.

use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cache::{CacheSettings, CacheStats, CacheStore, SettingsUpdate, Ttl};
use crate::error::Result;

/// Work item submitted to the worker.
#[derive(Debug)]
pub(crate) enum Command {
    Set {
        key: String,
        value: Option<String>,
        ttl: Option<Ttl>,
        reply: oneshot::Sender<Result<()>>,
    },
    Get {
        key: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Delete {
        key: String,
        reply: oneshot::Sender<bool>,
    },
    Keys {
        reply: oneshot::Sender<Vec<String>>,
    },
    Settings {
        reply: oneshot::Sender<CacheSettings>,
    },
    UpdateSettings {
        update: SettingsUpdate,
        reply: oneshot::Sender<Result<()>>,
    },
    Stats {
        reply: oneshot::Sender<CacheStats>,
    },
    ExpirySweep,
    PopularityDecay,
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Runs until a `Shutdown` command arrives or every sender is gone, then
/// clears the table.
///
/// Commands still queued when the loop exits are dropped with the receiver,
/// so their callers observe a closed reply channel.
pub(crate) async fn run(mut store: CacheStore, mut commands: mpsc::Receiver<Command>) {
    debug!("Cache worker started");

    let mut shutdown_reply = None;
    while let Some(command) = commands.recv().await {
        match command {
            Command::Shutdown { reply } => {
                shutdown_reply = Some(reply);
                break;
            }
            command => apply(&mut store, command),
        }
    }

    let dropped = store.len();
    store.clear();
    info!("Cache worker stopped, cleared {} entries", dropped);

    if let Some(reply) = shutdown_reply {
        let _ = reply.send(());
    }
}

// Reply send failures mean the caller stopped waiting; the effect still stands.
fn apply(store: &mut CacheStore, command: Command) {
    match command {
        Command::Set {
            key,
            value,
            ttl,
            reply,
        } => {
            let _ = reply.send(store.set(key, value, ttl, Instant::now()));
        }
        Command::Get { key, reply } => {
            let _ = reply.send(store.get(&key, Instant::now()));
        }
        Command::Delete { key, reply } => {
            let _ = reply.send(store.delete(&key));
        }
        Command::Keys { reply } => {
            let _ = reply.send(store.keys());
        }
        Command::Settings { reply } => {
            let _ = reply.send(store.settings());
        }
        Command::UpdateSettings { update, reply } => {
            let result = store.update_settings(update);
            match &result {
                Ok(()) => info!("Cache settings updated: {:?}", store.settings()),
                Err(e) => warn!("Rejected settings update {:?}: {}", update, e),
            }
            let _ = reply.send(result);
        }
        Command::Stats { reply } => {
            let _ = reply.send(store.stats());
        }
        Command::ExpirySweep => {
            let removed = store.sweep_expired(Instant::now());
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
        Command::PopularityDecay => {
            let visited = store.decay_popularity();
            debug!("Popularity decay: visited {} entries", visited);
        }
        Command::Shutdown { reply } => {
            // Handled by the run loop; answer anyway if one slips through.
            let _ = reply.send(());
        }
    }
}
