use crate::analyze::AnalysisResult;
use crate::format::truncate_unicode;

const NAME_WIDTH: usize = 48;

/// Fixed-format textual summary printed after the charts.
pub fn summary_block(result: &AnalysisResult) -> String {
    let name = truncate_unicode(&result.top_memory_name, NAME_WIDTH);
    format!(
        "Analysis Results:\n\
         ==============================\n\
         Peak CPU Usage: {peak:.1}%\n\
         Process with Highest Average Memory Usage: {name} (PID: {pid})\n\
         Average Available Disk Space: {disk:.2} GB",
        peak = result.peak_cpu,
        pid = result.top_memory_pid,
        disk = result.avg_free_disk_gb,
    )
}
