// core/src/engine.rs
use chrono::NaiveDate;
use log::info;

use crate::bucketing::group_observations;
use crate::collector::{collect_window, collect_window_concurrent, CollectedWindow};
use crate::config::EngineConfig;
use crate::error::{HrError, Result};
use crate::fetch::DayFetcher;
use crate::fit::{fit_overlay, HistogramMode, OverlayCurve};
use crate::metrics::{self, Metrics};
use crate::percentages::summarize;
use crate::planner::{plan, PlanRequest};
use crate::types::{DateWindow, Observation, WindowOutcome};

/// Én motor for alle varianter: modus (uker bakover / eksplisitt vindu) kommer
/// fra `PlanRequest`, konstanter fra `EngineConfig`.
pub struct HeartRateEngine<'m> {
    cfg: EngineConfig,
    metrics: &'m Metrics,
}

impl HeartRateEngine<'static> {
    /// Motor som teller i den prosess-globale `Metrics`.
    pub fn new(cfg: EngineConfig) -> Result<Self> {
        Self::with_metrics(cfg, metrics::global())
    }
}

impl<'m> HeartRateEngine<'m> {
    pub fn with_metrics(cfg: EngineConfig, metrics: &'m Metrics) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg, metrics })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn metrics(&self) -> &Metrics {
        self.metrics
    }

    pub fn plan(&self, request: &PlanRequest, today: NaiveDate) -> Result<Vec<DateWindow>> {
        plan(request, today, &self.cfg)
    }

    /// Henter og samler alle dager i vinduet (sekvensielt eller samtidig, etter konfig).
    pub fn collect<F: DayFetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        window: &DateWindow,
    ) -> CollectedWindow {
        if self.cfg.concurrent_fetch {
            collect_window_concurrent(
                fetcher,
                window,
                self.cfg.point_sample_secs,
                self.cfg.max_concurrent_days,
                self.metrics,
            )
        } else {
            collect_window(fetcher, window, self.cfg.point_sample_secs, self.metrics)
        }
    }

    /// Bucketing + prosent for ferdig innsamlede målinger.
    pub fn summarize_observations(
        &self,
        window: &DateWindow,
        observations: &[Observation],
    ) -> WindowOutcome {
        let grouped = group_observations(observations, self.cfg.bucket_step);
        match summarize(window, grouped) {
            Ok(result) => {
                info!(
                    "{}: {} bands, {} min",
                    result.label,
                    result.grouped_data.len(),
                    result.total_time_minutes
                );
                WindowOutcome::Summary(result)
            }
            Err(_) => {
                info!("no data available for {}", window.label());
                self.metrics.windows_no_data.inc();
                WindowOutcome::no_data(window)
            }
        }
    }

    pub fn summarize_window<F: DayFetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        window: &DateWindow,
    ) -> WindowOutcome {
        let collected = self.collect(fetcher, window);
        self.summarize_observations(window, &collected.observations)
    }

    /// Lognormal-overlay for innsamlede målinger. Tomt vindu gir `NoData`.
    pub fn overlay_collected(
        &self,
        collected: &CollectedWindow,
        mode: HistogramMode,
    ) -> Result<OverlayCurve> {
        if collected.is_empty() {
            return Err(HrError::NoData);
        }
        fit_overlay(&collected.heart_rates(), &self.cfg, mode)
    }

    pub fn overlay_window<F: DayFetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        window: &DateWindow,
        mode: HistogramMode,
    ) -> Result<OverlayCurve> {
        let collected = self.collect(fetcher, window);
        self.overlay_collected(&collected, mode)
    }

    /// Sammendrag og overlay fra én og samme innhenting.
    pub fn analyze_window<F: DayFetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        window: &DateWindow,
        mode: HistogramMode,
    ) -> (WindowOutcome, Result<OverlayCurve>) {
        let collected = self.collect(fetcher, window);
        let outcome = self.summarize_observations(window, &collected.observations);
        let overlay = self.overlay_collected(&collected, mode);
        (outcome, overlay)
    }

    /// Hele forespørselen: planlegg (feiler tidlig ved ugyldig input), så ett utfall per vindu.
    pub fn run<F: DayFetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        request: &PlanRequest,
        today: NaiveDate,
    ) -> Result<Vec<WindowOutcome>> {
        let windows = self.plan(request, today)?;
        info!("planned {} window(s) for {:?}", windows.len(), request);
        Ok(windows
            .iter()
            .map(|w| self.summarize_window(fetcher, w))
            .collect())
    }
}
