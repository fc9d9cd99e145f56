// core/src/fetch.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use serde_path_to_error as spte;

use crate::error::{HrError, Result};
use crate::planner::parse_date;
use crate::types::RawReading;

/// Kilde for rå pulsdata per kalenderdag (prod: HttpDayFetcher, test: StaticDayFetcher).
pub trait DayFetcher {
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<RawReading>>;
}

impl<F: DayFetcher + ?Sized> DayFetcher for &F {
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<RawReading>> {
        (**self).fetch_day(date)
    }
}

/// Dagsformat fra tjenesten: `{"heartRateValues": [[ts_ms, bpm|null], ...]}`.
#[derive(Debug, Deserialize)]
struct ServiceDay {
    #[serde(default, rename = "heartRateValues", alias = "heart_rate_values")]
    heart_rate_values: Option<Vec<(i64, Option<u32>)>>,
}

/// Tolker én dags payload. To former aksepteres:
/// en liste med målinger, eller tjenestens dagsobjekt med `heartRateValues`.
/// `null`/manglende `heartRateValues` betyr "ingen data", ikke feil.
pub fn parse_day_payload_value(payload: Value) -> Result<Vec<RawReading>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        v @ Value::Array(_) => {
            let readings: Vec<RawReading> = spte::deserialize(v)
                .map_err(|e| HrError::Payload(format!("{} at {}", e.inner(), e.path())))?;
            Ok(readings)
        }
        v @ Value::Object(_) => {
            let day: ServiceDay = spte::deserialize(v)
                .map_err(|e| HrError::Payload(format!("{} at {}", e.inner(), e.path())))?;
            Ok(day
                .heart_rate_values
                .unwrap_or_default()
                .into_iter()
                .map(|(timestamp, heart_rate)| RawReading::Point { timestamp, heart_rate })
                .collect())
        }
        other => Err(HrError::Payload(format!(
            "expected array or object, got {}",
            kind_of(&other)
        ))),
    }
}

pub fn parse_day_payload(json: &str) -> Result<Vec<RawReading>> {
    let v: Value = serde_json::from_str(json).map_err(|e| HrError::Payload(e.to_string()))?;
    parse_day_payload_value(v)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Statisk kilde i minnet. Dager uten oppføring gir tom liste.
#[derive(Debug, Clone, Default)]
pub struct StaticDayFetcher {
    days: BTreeMap<NaiveDate, Vec<RawReading>>,
    failures: BTreeMap<NaiveDate, String>,
}

impl StaticDayFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, date: NaiveDate, readings: Vec<RawReading>) -> Self {
        self.days.insert(date, readings);
        self
    }

    /// Simulerer at hentingen for `date` feiler.
    pub fn with_failure(mut self, date: NaiveDate, reason: impl Into<String>) -> Self {
        self.failures.insert(date, reason.into());
        self
    }

    /// Bygger fra `{"YYYY-MM-DD": <dag-payload>, ...}`.
    /// Ugyldig dato-nøkkel avviser hele input; en ugyldig dag-payload blir en dagsfeil.
    pub fn from_json(days_json: &str) -> Result<Self> {
        let map: BTreeMap<String, Value> =
            serde_json::from_str(days_json).map_err(|e| HrError::Payload(e.to_string()))?;
        let mut out = Self::new();
        for (key, payload) in map {
            let date = parse_date(&key)?;
            match parse_day_payload_value(payload) {
                Ok(readings) => {
                    out.days.insert(date, readings);
                }
                Err(e) => {
                    out.failures.insert(date, e.to_string());
                }
            }
        }
        Ok(out)
    }
}

impl DayFetcher for StaticDayFetcher {
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<RawReading>> {
        if let Some(reason) = self.failures.get(&date) {
            return Err(HrError::Retrieval { date, reason: reason.clone() });
        }
        Ok(self.days.get(&date).cloned().unwrap_or_default())
    }
}
