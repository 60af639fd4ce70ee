use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

pub const MIN_CHART_WIDTH: u16 = 40;

/// CPU series rendered as a fixed 0-100% line chart.
pub fn cpu_chart_text(series: &[(DateTime<Local>, f64)], width: u16, height: u16) -> String {
    render_series(
        "CPU Usage Over Time",
        "CPU (%)",
        series,
        [0.0, 100.0],
        width,
        height,
    )
}

/// Disk series rendered against padded data bounds so small fluctuations
/// stay visible.
pub fn disk_chart_text(series: &[(DateTime<Local>, f64)], width: u16, height: u16) -> String {
    render_series(
        "Available Disk Space Over Time",
        "Disk (GB)",
        series,
        padded_bounds(series),
        width,
        height,
    )
}

fn render_series(
    title: &str,
    y_title: &str,
    series: &[(DateTime<Local>, f64)],
    y_bounds: [f64; 2],
    width: u16,
    height: u16,
) -> String {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, &(_, value))| (i as f64, value))
        .collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::bordered().title(title))
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(time_labels(series)),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(Color::DarkGray))
                .bounds(y_bounds)
                .labels(value_labels(y_bounds)),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_text(&buf)
}

/// Compact first/middle/last tick labels; the terminal stand-in for rotated
/// timestamp labels.
fn time_labels(series: &[(DateTime<Local>, f64)]) -> Vec<String> {
    let fmt = |ts: &DateTime<Local>| ts.format("%H:%M:%S").to_string();
    match series {
        [] => Vec::new(),
        [only] => vec![fmt(&only.0)],
        [first, .., last] if series.len() == 2 => vec![fmt(&first.0), fmt(&last.0)],
        [first, .., last] => {
            let mid = &series[series.len() / 2];
            vec![fmt(&first.0), fmt(&mid.0), fmt(&last.0)]
        }
    }
}

fn value_labels([lo, hi]: [f64; 2]) -> Vec<String> {
    let mid = (lo + hi) / 2.0;
    vec![
        format!("{lo:.1}"),
        format!("{mid:.1}"),
        format!("{hi:.1}"),
    ]
}

fn padded_bounds(series: &[(DateTime<Local>, f64)]) -> [f64; 2] {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(_, value) in series {
        lo = lo.min(value);
        hi = hi.max(value);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    [lo - pad, hi + pad]
}

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        let mut line = String::new();
        for x in 0..area.width {
            if let Some(cell) = buf.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
