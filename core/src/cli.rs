use crate::fit::OverlayCurve;
use crate::types::WindowOutcome;

/// Tekstlinjer for ett vindu: ett bånd per linje, stigende.
pub fn format_window_report(outcome: &WindowOutcome) -> Vec<String> {
    match outcome {
        WindowOutcome::NoData { label, .. } => {
            vec![format!("--- {label} ---"), "no data available".to_string()]
        }
        WindowOutcome::Summary(r) => {
            let mut lines = Vec::with_capacity(r.grouped_data.len() + 2);
            lines.push(format!("--- {} ---", r.label));
            lines.push(format!("total: {} min", r.total_time_minutes));
            for (key, secs) in &r.grouped_data {
                let pct = r.percentages.get(key).copied().unwrap_or(0.0);
                lines.push(format!("{key} bpm: {:>6} s  {:>5.1}%", secs, pct));
            }
            lines
        }
    }
}

pub fn print_window_report(outcome: &WindowOutcome) {
    for line in format_window_report(outcome) {
        println!("{line}");
    }
}

pub fn print_overlay_summary(curve: &OverlayCurve) {
    println!("--- Lognormal fit ---");
    println!("mean(ln hr): {:.4}", curve.params.mean_of_log);
    println!("std(ln hr):  {:.4}", curve.params.std_of_log);
    for (c, h) in curve.bin_centers.iter().zip(&curve.histogram) {
        if *h > 0.0 {
            println!("{c:>6.1}: {h:.1}");
        }
    }
}
