//! Maintenance Timers
//!
//! Periodic tasks that submit expiry sweeps and popularity decay passes into
//! the cache's command queue. They never touch the table themselves.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Command;

/// Kind of maintenance pass a timer submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceTask {
    /// Remove entries past their expiry
    ExpirySweep,
    /// Decrement every entry's popularity
    PopularityDecay,
}

impl MaintenanceTask {
    fn command(self) -> Command {
        match self {
            MaintenanceTask::ExpirySweep => Command::ExpirySweep,
            MaintenanceTask::PopularityDecay => Command::PopularityDecay,
        }
    }
}

impl fmt::Display for MaintenanceTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceTask::ExpirySweep => f.write_str("expiry sweep"),
            MaintenanceTask::PopularityDecay => f.write_str("popularity decay"),
        }
    }
}

/// Spawns a timer that submits `task` every `period`.
///
/// The first submission happens one full period after start. Ticks missed
/// while the queue is full are delayed rather than bunched up. The timer
/// exits on its own once the worker has gone away; otherwise it runs until
/// the returned handle is aborted.
pub(crate) fn spawn_maintenance_timer(
    commands: mpsc::Sender<Command>,
    task: MaintenanceTask,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting {} timer with period of {:?}", task, period);

        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if commands.send(task.command()).await.is_err() {
                debug!("Stopping {} timer: cache worker is gone", task);
                break;
            }
        }
    })
}
