// core/src/fit.rs
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{HrError, Result};

/// Parametre for lognormal-fit: snitt og populasjons-std av ln(verdi).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LognormalParams {
    pub mean_of_log: f64,
    pub std_of_log: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramMode {
    /// Antall målinger per bin.
    #[default]
    Count,
    /// Andel (%) av alle målinger per bin.
    Percent,
}

/// Alt som trengs for å tegne søyler + kurve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayCurve {
    pub params: LognormalParams,
    pub bin_centers: Vec<f64>,
    pub histogram: Vec<f64>,
    pub curve_x: Vec<f64>,
    pub curve_y: Vec<f64>,
}

fn max_of(xs: &[f64]) -> Option<f64> {
    xs.iter().copied().map(OrderedFloat).max().map(|m| m.0)
}

fn min_of(xs: &[f64]) -> Option<f64> {
    xs.iter().copied().map(OrderedFloat).min().map(|m| m.0)
}

/// Estimerer lognormal-parametre. Hver måling teller én gang (ingen varighetsvekting).
pub fn fit_lognormal(values: &[f64]) -> Result<LognormalParams> {
    if values.is_empty() {
        return Err(HrError::NoData);
    }
    if let Some(&bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(HrError::InvalidSample(bad));
    }
    if values.iter().all(|v| *v == values[0]) {
        return Ok(LognormalParams { mean_of_log: values[0].ln(), std_of_log: 0.0 });
    }
    let n = values.len() as f64;
    let logs: Vec<f64> = values.iter().map(|v| v.ln()).collect();
    let mean = logs.iter().sum::<f64>() / n;
    let var = logs.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    Ok(LognormalParams { mean_of_log: mean, std_of_log: var.sqrt() })
}

/// `n` jevnt fordelte punkter i `[start, end]`, begge endepunkter med.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Lognormal tetthet i `x` (0 for x <= 0).
pub fn lognormal_pdf(x: f64, p: &LognormalParams) -> f64 {
    if x <= 0.0 || p.std_of_log <= 0.0 {
        return 0.0;
    }
    let z = x.ln() - p.mean_of_log;
    let norm = x * p.std_of_log * (2.0 * std::f64::consts::PI).sqrt();
    (-(z * z) / (2.0 * p.std_of_log * p.std_of_log)).exp() / norm
}

/// Histogram over fast domene `[min, max]` med bredde `step`.
/// Bin i dekker `[min + i*step, min + (i+1)*step)`, siste bin er lukket til høyre.
/// Går ikke domenet opp i `step`, blir siste bin bredere enn `max` (verdier over `max` telles ikke).
/// Verdier utenfor domenet telles ikke, men inngår i nevneren for `Percent`.
pub fn histogram(
    values: &[f64],
    min: f64,
    max: f64,
    step: f64,
    mode: HistogramMode,
) -> (Vec<f64>, Vec<f64>) {
    // Liten slakk så 160/10 ikke blir 17 bins pga. avrunding
    let bins = ((max - min) / step - 1e-9).ceil().max(1.0) as usize;
    let centers: Vec<f64> = (0..bins).map(|i| min + step * (i as f64 + 0.5)).collect();
    let mut counts = vec![0.0f64; bins];

    for &v in values {
        if !(v >= min && v <= max) {
            continue;
        }
        let idx = (((v - min) / step).floor() as usize).min(bins - 1);
        counts[idx] += 1.0;
    }

    if mode == HistogramMode::Percent && !values.is_empty() {
        let n = values.len() as f64;
        for c in counts.iter_mut() {
            *c = *c / n * 100.0;
        }
    }
    (centers, counts)
}

/// Fit + histogram + kurve skalert til histogrammets topp.
///
/// Skaleringen `pdf * max(hist) / max(pdf)` matcher topphøyden visuelt.
/// Det er IKKE en normalisering: arealet under kurven er ikke lik histogrammets areal.
pub fn fit_overlay(values: &[f64], cfg: &EngineConfig, mode: HistogramMode) -> Result<OverlayCurve> {
    let params = fit_lognormal(values)?;
    let (lo, hi) = match (min_of(values), max_of(values)) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Err(HrError::NoData),
    };

    let (bin_centers, hist) = histogram(
        values,
        cfg.histogram_min,
        cfg.histogram_max,
        cfg.histogram_step,
        mode,
    );
    let hist_peak = max_of(&hist).unwrap_or(0.0);

    let curve_x = linspace(lo, hi, cfg.fit_grid_points);
    let curve_y = if params.std_of_log == 0.0 {
        // Alle verdier like: punktmasse, kurven blir en strek i toppens høyde
        vec![hist_peak; curve_x.len()]
    } else {
        let pdf: Vec<f64> = curve_x.iter().map(|&x| lognormal_pdf(x, &params)).collect();
        let pdf_peak = max_of(&pdf).unwrap_or(0.0);
        if pdf_peak > 0.0 && pdf_peak.is_finite() {
            pdf.iter().map(|y| y * hist_peak / pdf_peak).collect()
        } else {
            vec![0.0; pdf.len()]
        }
    };

    Ok(OverlayCurve { params, bin_centers, histogram: hist, curve_x, curve_y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_of_log() {
        let v = [60.0, 60.0, 60.0, 120.0, 120.0];
        let p = fit_lognormal(&v).unwrap();
        let expected = (3.0 * 60f64.ln() + 2.0 * 120f64.ln()) / 5.0;
        assert!((p.mean_of_log - expected).abs() < 1e-12);
        // populasjons-std: ln2 * sqrt(0.6*0.4)
        let expected_std = std::f64::consts::LN_2 * (0.24f64).sqrt();
        assert!((p.std_of_log - expected_std).abs() < 1e-12);
    }

    #[test]
    fn empty_and_non_positive_inputs() {
        assert!(matches!(fit_lognormal(&[]), Err(HrError::NoData)));
        assert!(matches!(fit_lognormal(&[70.0, 0.0]), Err(HrError::InvalidSample(v)) if v == 0.0));
        assert!(matches!(fit_lognormal(&[-3.0]), Err(HrError::InvalidSample(_))));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let g = linspace(60.0, 120.0, 500);
        assert_eq!(g.len(), 500);
        assert_eq!(g[0], 60.0);
        assert_eq!(g[499], 120.0);
        assert!(g.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn histogram_counts_and_edges() {
        let (centers, h) = histogram(&[40.0, 49.9, 50.0, 200.0, 201.0, 10.0], 40.0, 200.0, 10.0, HistogramMode::Count);
        assert_eq!(centers.len(), 16);
        assert_eq!(centers[0], 45.0);
        assert_eq!(centers[15], 195.0);
        assert_eq!(h[0], 2.0);
        assert_eq!(h[1], 1.0);
        assert_eq!(h[15], 1.0); // 200 i siste (lukkede) bin
        assert_eq!(h.iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn domain_not_multiple_of_step_gets_extra_bin() {
        let (centers, h) =
            histogram(&[195.0, 202.0, 204.0, 205.0], 40.0, 204.0, 10.0, HistogramMode::Count);
        assert_eq!(centers.len(), 17);
        assert_eq!(centers[16], 205.0);
        assert_eq!(h[15], 1.0); // 195 i [190, 200)
        assert_eq!(h[16], 2.0); // 202 og 204 i [200, 210), 205 utenfor domenet
    }

    #[test]
    fn histogram_percent_uses_all_values() {
        let (_, h) = histogram(&[60.0, 60.0, 70.0, 75.0], 40.0, 200.0, 10.0, HistogramMode::Percent);
        assert!((h[2] - 50.0).abs() < 1e-12);
        assert!((h[3] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn curve_peak_matches_histogram_peak() {
        let v = [60.0, 60.0, 60.0, 120.0, 120.0];
        let cfg = EngineConfig::default();
        for mode in [HistogramMode::Count, HistogramMode::Percent] {
            let o = fit_overlay(&v, &cfg, mode).unwrap();
            let hist_peak = max_of(&o.histogram).unwrap();
            let curve_peak = max_of(&o.curve_y).unwrap();
            assert!((hist_peak - curve_peak).abs() < 1e-9, "{mode:?}");
            assert_eq!(o.curve_x.len(), 500);
            assert_eq!(o.curve_x[0], 60.0);
            assert_eq!(o.curve_x[499], 120.0);
        }
    }

    #[test]
    fn identical_values_give_flat_curve_at_peak() {
        let cfg = EngineConfig::default();
        let o = fit_overlay(&[72.0, 72.0, 72.0], &cfg, HistogramMode::Count).unwrap();
        assert_eq!(o.params.std_of_log, 0.0);
        assert!(o.curve_y.iter().all(|&y| y == 3.0));
    }
}
