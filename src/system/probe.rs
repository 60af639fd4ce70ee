use std::env;
use std::io;
use std::net::{IpAddr, UdpSocket};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use sysinfo::{Disk, Disks, Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System};
use thiserror::Error;

use crate::format::bytes_to_gb;
use crate::system::collector::SnapshotSource;
use crate::system::snapshot::{
    DiskPartition, HostInfo, HostSnapshot, MAX_ENVIRONMENT_ENTRIES, MAX_TRACKED_PROCESSES,
    ProcessObservation,
};

/// Window over which the instantaneous CPU figure is sampled. The probe
/// blocks for this long on every snapshot.
pub const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("permission denied during {context}: {source}")]
    Permission {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("host query failed: {0}")]
    Query(String),
}

/// Reads a full [`HostSnapshot`] from the live host.
///
/// Any sub-query failure fails the whole snapshot; there are no partial
/// snapshots. Individual processes that cannot be observed are omitted and
/// enumeration continues.
pub struct Probe {
    sys: System,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        Probe { sys }
    }
}

#[async_trait]
impl SnapshotSource for Probe {
    async fn read_snapshot(&mut self) -> Result<HostSnapshot, ProbeError> {
        let os_name = System::name().unwrap_or_else(|| "unknown".into());
        let os_version = System::os_version().unwrap_or_else(|| "unknown".into());
        let architecture = System::cpu_arch();
        let uptime_secs = System::uptime();

        self.sys.refresh_memory();
        let total_memory = self.sys.total_memory();

        let user = current_user()?;
        let primary_ip = primary_ip()?;

        // Two refreshes bracketing a fixed wait give sysinfo a usable delta.
        self.sys.refresh_cpu_all();
        tokio::time::sleep(CPU_SAMPLE_WINDOW).await;
        self.sys.refresh_cpu_all();
        let cpu_percent = self.sys.global_cpu_usage();
        let processor = self
            .sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_default();

        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let processes: Vec<ProcessObservation> = self
            .sys
            .processes()
            .iter()
            .filter_map(|(pid, process)| observe_process(*pid, process, total_memory))
            .take(MAX_TRACKED_PROCESSES)
            .collect();

        let disks = Disks::new_with_refreshed_list();
        let partitions: Vec<DiskPartition> = disks.list().iter().map(describe_partition).collect();
        let free_disk_gb = free_space_gb(&partitions)
            .ok_or_else(|| ProbeError::Query("no disk partitions enumerated".into()))?;

        let environment: Vec<(String, String)> =
            env::vars().take(MAX_ENVIRONMENT_ENTRIES).collect();

        Ok(HostSnapshot {
            timestamp: Local::now(),
            cpu_percent,
            free_disk_gb,
            processes,
            host: HostInfo {
                os_name,
                os_version,
                processor,
                architecture,
                total_memory_gb: bytes_to_gb(total_memory),
                user,
                primary_ip,
                uptime_secs,
                partitions,
                environment,
            },
        })
    }
}

/// Best-effort observation of a single process. Returns `None` when the
/// process cannot be described (vanished mid-enumeration, nameless kernel
/// entry, or a host with no reported memory).
fn observe_process(pid: Pid, process: &Process, total_memory: u64) -> Option<ProcessObservation> {
    if total_memory == 0 {
        return None;
    }
    let name = process.name().to_string_lossy();
    if name.is_empty() {
        return None;
    }
    Some(ProcessObservation {
        pid: pid.as_u32(),
        name: name.into_owned(),
        memory_percent: (process.memory() as f32 / total_memory as f32) * 100.0,
    })
}

fn describe_partition(disk: &Disk) -> DiskPartition {
    DiskPartition {
        name: disk.name().to_string_lossy().into_owned(),
        mount_point: disk.mount_point().to_string_lossy().into_owned(),
        file_system: disk.file_system().to_string_lossy().into_owned(),
        total_gb: bytes_to_gb(disk.total_space()),
        available_gb: bytes_to_gb(disk.available_space()),
    }
}

/// Free space on the root mount point, falling back to the largest
/// partition when no root mount is listed.
fn free_space_gb(partitions: &[DiskPartition]) -> Option<f64> {
    partitions
        .iter()
        .find(|p| p.mount_point == "/")
        .or_else(|| {
            partitions
                .iter()
                .max_by(|a, b| a.total_gb.total_cmp(&b.total_gb))
        })
        .map(|p| p.available_gb)
}

fn current_user() -> Result<String, ProbeError> {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .map_err(|_| ProbeError::Query("current user not present in environment".into()))
}

/// Primary outbound address via the connected-UDP trick; no packets are sent.
fn primary_ip() -> Result<IpAddr, ProbeError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(|e| classify_io("bind udp socket", e))?;
    socket
        .connect(("8.8.8.8", 80))
        .map_err(|e| classify_io("resolve primary ip", e))?;
    let addr = socket
        .local_addr()
        .map_err(|e| classify_io("resolve primary ip", e))?;
    Ok(addr.ip())
}

fn classify_io(context: &'static str, source: io::Error) -> ProbeError {
    if source.kind() == io::ErrorKind::PermissionDenied {
        ProbeError::Permission { context, source }
    } else {
        ProbeError::Query(format!("{context}: {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(mount_point: &str, total_gb: f64, available_gb: f64) -> DiskPartition {
        DiskPartition {
            name: format!("disk-{mount_point}"),
            mount_point: mount_point.to_string(),
            file_system: "ext4".to_string(),
            total_gb,
            available_gb,
        }
    }

    #[test]
    fn root_mount_wins_over_larger_partition() {
        let partitions = vec![partition("/data", 500.0, 321.0), partition("/", 100.0, 42.5)];
        assert_eq!(free_space_gb(&partitions), Some(42.5));
    }

    #[test]
    fn falls_back_to_largest_partition_without_root() {
        let partitions = vec![
            partition("C:\\", 256.0, 100.0),
            partition("D:\\", 512.0, 333.0),
        ];
        assert_eq!(free_space_gb(&partitions), Some(333.0));
    }

    #[test]
    fn no_partitions_yields_none() {
        assert_eq!(free_space_gb(&[]), None);
    }

    #[test]
    fn permission_errors_are_classified() {
        let denied = classify_io("test query", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, ProbeError::Permission { .. }));

        let other = classify_io("test query", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(other, ProbeError::Query(_)));
    }

    #[test]
    fn user_and_ip_lookups_are_best_effort() {
        // Either outcome is fine; neither lookup may panic.
        let _ = current_user();
        let _ = primary_ip();
    }
}
