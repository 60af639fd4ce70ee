use std::net::IpAddr;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Upper bound on process observations kept per snapshot.
pub const MAX_TRACKED_PROCESSES: usize = 10;

/// Upper bound on environment entries captured per snapshot.
pub const MAX_ENVIRONMENT_ENTRIES: usize = 5;

/// A single process as seen at one sampling instant.
///
/// Pids are OS-assigned and may be reused once a process exits, so two
/// observations with the same pid are treated as the same entity only for
/// the duration of one collection run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessObservation {
    pub pid: u32,
    pub name: String,
    pub memory_percent: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DiskPartition {
    pub name: String,
    pub mount_point: String,
    pub file_system: String,
    pub total_gb: f64,
    pub available_gb: f64,
}

/// Host descriptor gathered alongside each snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct HostInfo {
    pub os_name: String,
    pub os_version: String,
    pub processor: String,
    pub architecture: String,
    pub total_memory_gb: f64,
    pub user: String,
    pub primary_ip: IpAddr,
    pub uptime_secs: u64,
    pub partitions: Vec<DiskPartition>,
    pub environment: Vec<(String, String)>,
}

/// Everything the probe reads from the host at a single instant.
///
/// `processes` holds the first `MAX_TRACKED_PROCESSES` observations in host
/// iteration order, not sorted. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct HostSnapshot {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f32,
    pub free_disk_gb: f64,
    pub processes: Vec<ProcessObservation>,
    pub host: HostInfo,
}
