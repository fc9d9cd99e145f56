// core/src/fetch_api.rs
use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use ureq::Agent;

use crate::error::{HrError, Result};
use crate::fetch::{parse_day_payload, DayFetcher};
use crate::types::RawReading;

/// HTTP-kilde: GET `{base_url}/{YYYY-MM-DD}` som returnerer én dags payload.
/// Innlogging/OAuth håndteres av verten (f.eks. en proxy foran tjenesten).
pub struct HttpDayFetcher {
    agent: Agent,
    base_url: String,
}

impl HttpDayFetcher {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        // Timeout dekker hele kallet; timeout blir en vanlig dagsfeil
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.base_url, date.format("%Y-%m-%d"))
    }
}

impl DayFetcher for HttpDayFetcher {
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<RawReading>> {
        let url = self.url_for(date);
        let retrieval = |reason: String| HrError::Retrieval { date, reason };

        let resp = self.agent.get(&url).call().map_err(|e| retrieval(e.to_string()))?;
        let body = resp.into_string().map_err(|e| retrieval(e.to_string()))?;
        debug!("[fetch] {} => {} bytes", url, body.len());

        parse_day_payload(&body)
    }
}
