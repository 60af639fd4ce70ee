pub mod chart;
pub mod summary;

use crate::analyze::AnalysisResult;

pub const DEFAULT_CHART_WIDTH: u16 = 100;
pub const MAX_CHART_WIDTH: u16 = 160;

/// Chart width from the attached terminal, clamped to something readable.
pub fn terminal_chart_width() -> u16 {
    crossterm::terminal::size()
        .map(|(width, _)| width.clamp(chart::MIN_CHART_WIDTH, MAX_CHART_WIDTH))
        .unwrap_or(DEFAULT_CHART_WIDTH)
}

/// Full report text: both time-series charts followed by the summary block.
pub fn render_report(result: &AnalysisResult, width: u16, chart_height: u16) -> String {
    let mut out = String::new();
    out.push_str(&chart::cpu_chart_text(&result.cpu_series, width, chart_height));
    out.push('\n');
    out.push_str(&chart::disk_chart_text(&result.disk_series, width, chart_height));
    out.push('\n');
    out.push_str(&summary::summary_block(result));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    #[test]
    fn report_renders_charts_then_summary() {
        let ts = |minute| Local.with_ymd_and_hms(2026, 8, 6, 12, minute, 0).unwrap();
        let result = AnalysisResult {
            peak_cpu: 55.0,
            top_memory_pid: 1,
            top_memory_name: "init".to_string(),
            top_memory_avg: 4.0,
            avg_free_disk_gb: 99.0,
            cpu_series: vec![(ts(0), 10.0), (ts(1), 55.0), (ts(2), 30.0)],
            disk_series: vec![(ts(0), 100.0), (ts(1), 98.0), (ts(2), 99.0)],
        };
        let text = render_report(&result, 60, 10);
        let cpu_at = text.find("CPU Usage Over Time").unwrap();
        let disk_at = text.find("Available Disk Space Over Time").unwrap();
        let summary_at = text.find("Analysis Results:").unwrap();
        assert!(cpu_at < disk_at);
        assert!(disk_at < summary_at);
        assert!(text.ends_with("GB\n"));
    }
}
