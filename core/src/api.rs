// core/src/api.rs
use anyhow::Context;
use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::HeartRateEngine;
use crate::error::HrError;
use crate::fetch::DayFetcher;
use crate::fit::{fit_overlay, HistogramMode};
use crate::planner::PlanRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    Weeks,
    Range,
}

/// Forespørsel slik den kommer over JSON.
/// Uten `mode`: `weeks` satt ⇒ uker bakover, ellers eksplisitt vindu.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub mode: Option<RequestMode>,
    #[serde(default)]
    pub weeks: Option<u32>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
}

impl SummaryRequest {
    pub fn into_plan(self, default_weeks: u32) -> PlanRequest {
        let mode = self.mode.unwrap_or(if self.weeks.is_some() {
            RequestMode::Weeks
        } else {
            RequestMode::Range
        });
        match mode {
            RequestMode::Weeks => PlanRequest::Weeks {
                weeks: self.weeks.unwrap_or(default_weeks),
            },
            RequestMode::Range => PlanRequest::Range {
                from_date: self.from_date,
                to_date: self.to_date,
            },
        }
    }
}

/// Gjør om en feil til svar. Valideringsfeil vises med melding, `NoData` som eget
/// utfall; alt annet logges og rapporteres generisk uten detaljer.
pub fn error_response(err: &anyhow::Error) -> Value {
    match err.downcast_ref::<HrError>() {
        Some(HrError::NoData) => json!({ "no_data": true }),
        Some(e) if e.is_validation() || matches!(e, HrError::InvalidSample(_)) => {
            json!({ "error": e.to_string() })
        }
        _ => {
            if let Some(e) = err.downcast_ref::<serde_json::Error>() {
                return json!({ "error": format!("invalid request: {e}") });
            }
            error!("unexpected error: {:#}", err);
            json!({ "error": "unexpected error" })
        }
    }
}

fn summarize_inner<F: DayFetcher + Sync + ?Sized>(
    engine: &HeartRateEngine<'_>,
    fetcher: &F,
    request_json: &str,
    today: NaiveDate,
) -> anyhow::Result<Value> {
    let req: SummaryRequest = if request_json.trim().is_empty() {
        SummaryRequest::default()
    } else {
        serde_json::from_str(request_json)?
    };
    let plan = req.into_plan(engine.config().default_weeks);
    let windows = engine.run(fetcher, &plan, today)?;
    let out = serde_json::to_value(&windows).context("serializing window outcomes")?;
    Ok(json!({ "windows": out }))
}

/// Forespørselsgrensen: JSON inn, JSON ut. Returnerer alltid et JSON-objekt.
pub fn summarize_request_json<F: DayFetcher + Sync + ?Sized>(
    engine: &HeartRateEngine<'_>,
    fetcher: &F,
    request_json: &str,
    today: NaiveDate,
) -> String {
    let v = summarize_inner(engine, fetcher, request_json, today)
        .unwrap_or_else(|e| error_response(&e));
    v.to_string()
}

/// Overlay-kurve for en liste pulsverdier, som JSON.
pub fn overlay_json(engine: &HeartRateEngine<'_>, values: &[f64], mode: HistogramMode) -> String {
    let res = fit_overlay(values, engine.config(), mode)
        .map_err(anyhow::Error::from)
        .and_then(|o| serde_json::to_value(o).context("serializing overlay"));
    match res {
        Ok(v) => v.to_string(),
        Err(e) => error_response(&e).to_string(),
    }
}
