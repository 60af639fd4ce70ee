use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::system::probe::ProbeError;
use crate::system::snapshot::{HostSnapshot, MAX_TRACKED_PROCESSES, ProcessObservation};

/// Fixed wait between samples. Not configurable; the collection duration is
/// the only tunable.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Anything the collector can draw snapshots from. Implemented by
/// [`Probe`](crate::system::probe::Probe) for the live host and by scripted
/// fakes in tests.
#[async_trait]
pub trait SnapshotSource {
    async fn read_snapshot(&mut self) -> Result<HostSnapshot, ProbeError>;
}

/// One aggregated record per sampling interval.
#[derive(Clone, Debug)]
pub struct SampleRecord {
    pub timestamp: DateTime<Local>,
    pub cpu_usage: f32,
    /// Sum of `memory_percent` across this record's process list.
    pub total_memory_usage: f32,
    pub free_disk_gb: f64,
    pub processes: Vec<ProcessObservation>,
    /// Mean `memory_percent` per pid over this record's own process list.
    /// Pids are unique within one snapshot, so each mean is over a single
    /// reading.
    pub per_process_avg_memory: HashMap<u32, f32>,
}

impl SampleRecord {
    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let mut processes = snapshot.processes;
        processes.truncate(MAX_TRACKED_PROCESSES);

        let total_memory_usage = processes.iter().map(|p| p.memory_percent).sum();

        let mut sums: HashMap<u32, (f32, u32)> = HashMap::new();
        for observation in &processes {
            let entry = sums.entry(observation.pid).or_insert((0.0, 0));
            entry.0 += observation.memory_percent;
            entry.1 += 1;
        }
        let per_process_avg_memory = sums
            .into_iter()
            .map(|(pid, (sum, count))| (pid, sum / count as f32))
            .collect();

        SampleRecord {
            timestamp: snapshot.timestamp,
            cpu_usage: snapshot.cpu_percent,
            total_memory_usage,
            free_disk_gb: snapshot.free_disk_gb,
            processes,
            per_process_avg_memory,
        }
    }
}

/// Drives a [`SnapshotSource`] at a fixed cadence for a bounded wall-clock
/// duration.
///
/// Snapshot failures are logged and skipped; the loop itself never fails.
/// Sampling is strictly sequential: each snapshot completes (including its
/// embedded CPU window) before the inter-sample wait starts.
pub struct Collector<S> {
    source: S,
    interval: Duration,
}

impl<S: SnapshotSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Collector {
            source,
            interval: SAMPLE_INTERVAL,
        }
    }

    pub async fn collect(&mut self, duration: Duration) -> Vec<SampleRecord> {
        let deadline = Instant::now() + duration;
        let mut series = Vec::new();

        while Instant::now() < deadline {
            match self.source.read_snapshot().await {
                Ok(snapshot) => {
                    let host = &snapshot.host;
                    debug!(
                        os = %host.os_name,
                        version = %host.os_version,
                        user = %host.user,
                        ip = %host.primary_ip,
                        uptime_secs = host.uptime_secs,
                        "snapshot captured"
                    );
                    trace!(
                        processor = %host.processor,
                        arch = %host.architecture,
                        total_memory_gb = host.total_memory_gb,
                        partitions = host.partitions.len(),
                        environment = host.environment.len(),
                        "host detail"
                    );
                    series.push(SampleRecord::from_snapshot(snapshot));
                }
                Err(error) => warn!(%error, "snapshot failed, skipping sample"),
            }
            tokio::time::sleep(self.interval).await;
        }

        series
    }
}
