// core/src/collector.rs
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fetch::DayFetcher;
use crate::metrics::Metrics;
use crate::types::{DateWindow, Observation, RawReading};

/// Dag som ble hoppet over fordi hentingen feilet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDay {
    pub date: NaiveDate,
    pub reason: String,
}

/// Alle gyldige målinger i et vindu, i datorekkefølge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedWindow {
    pub observations: Vec<Observation>,
    pub days_with_data: Vec<NaiveDate>,
    pub empty_days: Vec<NaiveDate>,
    pub failed_days: Vec<FailedDay>,
}

impl CollectedWindow {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Rå pulsverdier (én per måling, uvektet) til distribusjons-fit.
    pub fn heart_rates(&self) -> Vec<f64> {
        self.observations.iter().map(|o| f64::from(o.heart_rate)).collect()
    }

    /// Legger til én dags resultat. Kalles i datorekkefølge.
    fn absorb(
        &mut self,
        date: NaiveDate,
        fetched: Result<Vec<RawReading>>,
        point_sample_secs: u32,
        metrics: &Metrics,
    ) {
        match fetched {
            Ok(readings) => {
                let before = self.observations.len();
                self.observations.extend(
                    readings
                        .iter()
                        .filter_map(|r| r.to_observation(point_sample_secs)),
                );
                let added = self.observations.len() - before;
                if added == 0 {
                    info!("no heart-rate data for {}", date);
                    metrics.days_empty.inc();
                    self.empty_days.push(date);
                } else {
                    debug!("{}: {} readings, {} valid", date, readings.len(), added);
                    metrics.days_fetched.inc();
                    self.days_with_data.push(date);
                }
            }
            Err(e) => {
                warn!("skipping {}: {}", date, e);
                metrics.days_failed.inc();
                self.failed_days.push(FailedDay { date, reason: e.to_string() });
            }
        }
    }
}

/// Henter dag for dag (sekvensielt). Én feilende dag stopper ikke resten.
pub fn collect_window<F: DayFetcher + ?Sized>(
    fetcher: &F,
    window: &DateWindow,
    point_sample_secs: u32,
    metrics: &Metrics,
) -> CollectedWindow {
    let mut out = CollectedWindow::default();
    for date in window.days() {
        let fetched = fetcher.fetch_day(date);
        out.absorb(date, fetched, point_sample_secs, metrics);
    }
    out
}

/// Som `collect_window`, men med inntil `max_in_flight` dager hentet samtidig.
/// Resultatet settes sammen i datorekkefølge uansett hvilken dag som blir ferdig først.
pub fn collect_window_concurrent<F: DayFetcher + Sync + ?Sized>(
    fetcher: &F,
    window: &DateWindow,
    point_sample_secs: u32,
    max_in_flight: usize,
    metrics: &Metrics,
) -> CollectedWindow {
    let days: Vec<NaiveDate> = window.days().collect();
    let mut fetched: Vec<(NaiveDate, Result<Vec<RawReading>>)> = Vec::with_capacity(days.len());

    for chunk in days.chunks(max_in_flight.max(1)) {
        std::thread::scope(|s| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|&date| (date, s.spawn(move || fetcher.fetch_day(date))))
                .collect();
            for (date, h) in handles {
                let res = h.join().unwrap_or_else(|_| {
                    Err(crate::error::HrError::Retrieval {
                        date,
                        reason: "fetch thread panicked".into(),
                    })
                });
                fetched.push((date, res));
            }
        });
    }

    let mut out = CollectedWindow::default();
    for (date, res) in fetched {
        out.absorb(date, res, point_sample_secs, metrics);
    }
    out
}
