// Python-binding (feature = "python"). Tynn innpakning rundt api.rs.
use chrono::{Local, NaiveDate};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api::{overlay_json, summarize_request_json};
use crate::config::EngineConfig;
use crate::engine::HeartRateEngine;
use crate::fetch::StaticDayFetcher;
use crate::fit::HistogramMode;
use crate::planner::parse_date;

fn engine_from(config_json: Option<&str>) -> PyResult<HeartRateEngine<'static>> {
    let cfg: EngineConfig = match config_json {
        Some(s) => serde_json::from_str(s)
            .map_err(|e| PyValueError::new_err(format!("config parse error: {e}")))?,
        None => EngineConfig::default(),
    };
    HeartRateEngine::new(cfg).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn today_from(today: Option<&str>) -> PyResult<NaiveDate> {
    match today {
        Some(s) => parse_date(s).map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// `days_json`: `{"YYYY-MM-DD": <dag-payload>}` hentet av Python-siden.
#[pyfunction]
#[pyo3(signature = (days_json, request_json, today=None, config_json=None))]
fn summarize_json(
    days_json: &str,
    request_json: &str,
    today: Option<&str>,
    config_json: Option<&str>,
) -> PyResult<String> {
    let engine = engine_from(config_json)?;
    let fetcher =
        StaticDayFetcher::from_json(days_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let today = today_from(today)?;
    Ok(summarize_request_json(&engine, &fetcher, request_json, today))
}

#[pyfunction]
#[pyo3(signature = (values, mode="count", config_json=None))]
fn fit_overlay_json(values: Vec<f64>, mode: &str, config_json: Option<&str>) -> PyResult<String> {
    let engine = engine_from(config_json)?;
    let mode = match mode {
        "count" => HistogramMode::Count,
        "percent" => HistogramMode::Percent,
        other => {
            return Err(PyValueError::new_err(format!(
                "mode must be 'count' or 'percent', got {other:?}"
            )))
        }
    };
    Ok(overlay_json(&engine, &values, mode))
}

#[pyfunction]
fn metrics_text() -> String {
    crate::metrics::global().render()
}

#[pymodule]
fn hrdist_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(summarize_json, m)?)?;
    m.add_function(wrap_pyfunction!(fit_overlay_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
