use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

use crate::system::collector::SampleRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("cannot analyze an empty sample series")]
    EmptySeries,
    #[error("sample series contains no process observations")]
    NoProcesses,
}

/// Cross-sample summary produced from one full collection run.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    pub peak_cpu: f32,
    pub top_memory_pid: u32,
    pub top_memory_name: String,
    pub top_memory_avg: f32,
    pub avg_free_disk_gb: f64,
    pub cpu_series: Vec<(DateTime<Local>, f64)>,
    pub disk_series: Vec<(DateTime<Local>, f64)>,
}

struct MemoryAccum {
    name: String,
    sum: f64,
    count: u32,
}

/// Reduces a collected series to its summary statistics.
///
/// The top memory consumer is the pid with the highest mean `memory_percent`
/// across every record it appears in; ties go to the pid encountered first in
/// record order. The name is whichever one was first seen for that pid, which
/// holds only as long as the OS does not recycle the pid mid-run.
pub fn analyze(series: &[SampleRecord]) -> Result<AnalysisResult, AnalyzeError> {
    if series.is_empty() {
        return Err(AnalyzeError::EmptySeries);
    }

    let cpu_series: Vec<(DateTime<Local>, f64)> = series
        .iter()
        .map(|r| (r.timestamp, f64::from(r.cpu_usage)))
        .collect();
    let disk_series: Vec<(DateTime<Local>, f64)> =
        series.iter().map(|r| (r.timestamp, r.free_disk_gb)).collect();

    let peak_cpu = series
        .iter()
        .map(|r| r.cpu_usage)
        .fold(f32::NEG_INFINITY, f32::max);

    // Insertion order doubles as the tie-break order.
    let mut first_seen: Vec<u32> = Vec::new();
    let mut accum: HashMap<u32, MemoryAccum> = HashMap::new();
    for record in series {
        for observation in &record.processes {
            match accum.entry(observation.pid) {
                Entry::Occupied(mut entry) => {
                    let acc = entry.get_mut();
                    acc.sum += f64::from(observation.memory_percent);
                    acc.count += 1;
                }
                Entry::Vacant(entry) => {
                    first_seen.push(observation.pid);
                    entry.insert(MemoryAccum {
                        name: observation.name.clone(),
                        sum: f64::from(observation.memory_percent),
                        count: 1,
                    });
                }
            }
        }
    }

    let mut top: Option<(u32, f64)> = None;
    for pid in &first_seen {
        let mean = {
            let acc = &accum[pid];
            acc.sum / f64::from(acc.count)
        };
        // Strict comparison keeps the first-encountered pid on ties.
        if top.is_none_or(|(_, best)| mean > best) {
            top = Some((*pid, mean));
        }
    }
    let (top_memory_pid, top_memory_avg) = top.ok_or(AnalyzeError::NoProcesses)?;
    let top_memory_name = accum
        .remove(&top_memory_pid)
        .map(|acc| acc.name)
        .unwrap_or_default();

    let avg_free_disk_gb =
        series.iter().map(|r| r.free_disk_gb).sum::<f64>() / series.len() as f64;

    Ok(AnalysisResult {
        peak_cpu,
        top_memory_pid,
        top_memory_name,
        top_memory_avg: top_memory_avg as f32,
        avg_free_disk_gb,
        cpu_series,
        disk_series,
    })
}
