//! Plain-text rendering of dashboard views

use crate::dashboard::{DashboardView, ForecastOutcome, SeriesPanel};
use metal_forecast::{CorrelationMatrix, ForecastResult};
use std::fmt::Write;

/// Summary of every panel in a view
pub fn render_view(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} from {} to {} ({}-day moving average)",
        view.metal,
        view.field,
        view.range.start(),
        view.range.end(),
        view.window
    );

    for panel in &view.panels {
        out.push('\n');
        out.push_str(&render_panel(panel));
    }

    if let Some(matrix) = &view.correlation {
        out.push('\n');
        out.push_str(&render_correlation(matrix));
    }

    out.push('\n');
    out.push_str(&render_outcome(&view.forecast));
    let _ = writeln!(out, "\n{} rows in the data table", view.table.len());
    out
}

fn render_panel(panel: &SeriesPanel) -> String {
    let mut out = String::new();
    let series = &panel.series;
    let _ = writeln!(out, "== {} ==", series.instrument());

    let Some(stats) = &panel.description else {
        let _ = writeln!(out, "  no observations in range");
        return out;
    };

    let _ = writeln!(
        out,
        "  {} points, mean {:.2}, std {}, min {:.2}, max {:.2}",
        stats.count,
        stats.mean,
        stats
            .std_dev
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "n/a".to_string()),
        stats.min,
        stats.max
    );

    if let Some(summary) = &panel.box_summary {
        let _ = writeln!(
            out,
            "  quartiles {:.2} / {:.2} / {:.2}, whiskers {:.2}..{:.2}, {} outliers",
            summary.q1,
            summary.median,
            summary.q3,
            summary.lower_whisker,
            summary.upper_whisker,
            summary.outliers.len()
        );
    }

    let latest = panel.smoothed.values().into_iter().flatten().last();
    match latest {
        Some(value) => {
            let _ = writeln!(out, "  latest moving average {:.2}", value);
        }
        None => {
            let _ = writeln!(
                out,
                "  moving average needs {} points",
                panel.smoothed.window
            );
        }
    }

    let peak = panel
        .histogram
        .counts
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count);
    if let Some((bin, count)) = peak {
        let _ = writeln!(
            out,
            "  busiest histogram bin {:.2}..{:.2} with {} values",
            panel.histogram.edges[bin],
            panel.histogram.edges[bin + 1],
            count
        );
    }

    out
}

/// Correlation matrix as an aligned grid
pub fn render_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Correlation over {} shared dates", matrix.overlap);
    if matrix.sparse {
        let _ = writeln!(out, "  (few shared dates; coefficients may be unreliable)");
    }

    let width = matrix
        .instruments
        .iter()
        .map(|i| i.len())
        .max()
        .unwrap_or(0)
        .max(6);

    let _ = write!(out, "{:width$}", "", width = width);
    for name in &matrix.instruments {
        let _ = write!(out, " {:>width$}", name, width = width);
    }
    out.push('\n');

    for (name, row) in matrix.instruments.iter().zip(&matrix.coefficients) {
        let _ = write!(out, "{:width$}", name, width = width);
        for value in row {
            let cell = value
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " {:>width$}", cell, width = width);
        }
        out.push('\n');
    }

    out
}

/// Forecast table with interval bounds when present
pub fn render_forecast(result: &ForecastResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} forecast of {} {} for {} days",
        result.model,
        result.instrument,
        result.field,
        result.horizon()
    );

    for point in &result.points {
        let _ = match (point.lower, point.upper) {
            (Some(lower), Some(upper)) => writeln!(
                out,
                "  {}  {:>10.2}  [{:.2}, {:.2}]",
                point.date, point.value, lower, upper
            ),
            _ => writeln!(out, "  {}  {:>10.2}", point.date, point.value),
        };
    }

    out
}

/// Forecast panel text for any outcome
pub fn render_outcome(outcome: &ForecastOutcome) -> String {
    match outcome {
        ForecastOutcome::Forecast { result } => render_forecast(result),
        ForecastOutcome::Notice { message } => format!("Forecast unavailable: {}\n", message),
        ForecastOutcome::Unavailable { message } => format!("{}\n", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_correlation_marks_missing() {
        let matrix = CorrelationMatrix {
            instruments: vec!["Gold".to_string(), "Silver".to_string()],
            coefficients: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
            overlap: 3,
            sparse: true,
        };

        let text = render_correlation(&matrix);
        assert!(text.starts_with("Correlation over 3 shared dates\n"));
        assert!(text.contains("few shared dates"));
        assert!(text.contains("  1.000      -"));
    }

    #[test]
    fn test_render_notice() {
        let outcome = ForecastOutcome::Notice {
            message: "not enough data".to_string(),
        };
        assert_eq!(
            render_outcome(&outcome),
            "Forecast unavailable: not enough data\n"
        );
    }
}
