//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of a
//! cache instance.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries at a configured interval
//! - Popularity decay: lowers every entry's popularity at a configured interval

mod maintenance;

pub use maintenance::MaintenanceTask;
pub(crate) use maintenance::spawn_maintenance_timer;
