// core/src/config.rs
use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{HrError, Result};

pub const DEFAULT_BUCKET_STEP: u32 = 10;
pub const DEFAULT_POINT_SAMPLE_SECS: u32 = 120;
pub const DEFAULT_WEEKS: u32 = 20;
pub const DEFAULT_RANGE_DAYS: i64 = 7;
pub const DEFAULT_FIT_GRID_POINTS: usize = 500;
pub const DEFAULT_MAX_WEEKS: u32 = 520;
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 3660;

/// Konfigurasjon for motoren. Sendes inn ved konstruksjon, ingen globale konstanter.
///
/// Alle felt har default, så en delvis JSON-fil (f.eks. bare `bucket_step`) er gyldig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bredde på pulsbåndene (bpm).
    pub bucket_step: u32,
    /// Varighet (sek) som tildeles hver punktmåling uten egen varighet.
    pub point_sample_secs: u32,
    /// Antall uker når forespørselen ikke oppgir noe.
    pub default_weeks: u32,
    /// Lengde på standard-vinduet i eksplisitt modus (to_date - N dager).
    pub default_range_days: i64,
    /// Øvre grense for `weeks` i en forespørsel.
    pub max_weeks: u32,
    /// Øvre grense for antall dager i et eksplisitt vindu.
    pub max_range_days: i64,
    pub fit_grid_points: usize,
    pub histogram_min: f64,
    pub histogram_max: f64,
    pub histogram_step: f64,
    /// Timeout per dag-henting (sek). Timeout behandles som hentefeil.
    pub fetch_timeout_secs: u64,
    /// Hent dagene i et vindu samtidig (false = sekvensielt).
    pub concurrent_fetch: bool,
    /// Maks antall dager som hentes samtidig når `concurrent_fetch` er på.
    pub max_concurrent_days: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_step: DEFAULT_BUCKET_STEP,
            point_sample_secs: DEFAULT_POINT_SAMPLE_SECS,
            default_weeks: DEFAULT_WEEKS,
            default_range_days: DEFAULT_RANGE_DAYS,
            max_weeks: DEFAULT_MAX_WEEKS,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            fit_grid_points: DEFAULT_FIT_GRID_POINTS,
            histogram_min: 40.0,
            histogram_max: 200.0,
            histogram_step: 10.0,
            fetch_timeout_secs: 10,
            concurrent_fetch: false,
            max_concurrent_days: 4,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bucket_step == 0 {
            return Err(HrError::Config("bucket_step must be > 0".into()));
        }
        if self.default_weeks == 0 {
            return Err(HrError::Config("default_weeks must be > 0".into()));
        }
        if self.default_range_days < 0 {
            return Err(HrError::Config("default_range_days must be >= 0".into()));
        }
        if self.default_weeks > self.max_weeks {
            return Err(HrError::Config("default_weeks exceeds max_weeks".into()));
        }
        if self.max_range_days < 1 || self.default_range_days >= self.max_range_days {
            return Err(HrError::Config(
                "max_range_days must be > default_range_days and >= 1".into(),
            ));
        }
        if self.fit_grid_points < 2 {
            return Err(HrError::Config("fit_grid_points must be >= 2".into()));
        }
        let finite = self.histogram_min.is_finite()
            && self.histogram_max.is_finite()
            && self.histogram_step.is_finite();
        if !finite || self.histogram_step <= 0.0 || self.histogram_max <= self.histogram_min {
            return Err(HrError::Config(format!(
                "histogram domain [{}, {}] step {} is empty",
                self.histogram_min, self.histogram_max, self.histogram_step
            )));
        }
        if self.max_concurrent_days == 0 {
            return Err(HrError::Config("max_concurrent_days must be > 0".into()));
        }
        Ok(())
    }
}

/// Leser inn konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: &str) -> anyhow::Result<EngineConfig> {
    if Path::new(path).exists() {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let cfg: EngineConfig =
            serde_json::from_str(&contents).with_context(|| format!("parsing config {path}"))?;
        cfg.validate()?;
        info!("config loaded from {} (bucket_step={})", path, cfg.bucket_step);
        Ok(cfg)
    } else {
        warn!("no config at {}, using defaults", path);
        Ok(EngineConfig::default())
    }
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config(cfg: &EngineConfig, path: &str) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("writing config {path}"))?;
    info!("config saved to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bucket_step, 10);
        assert_eq!(cfg.point_sample_secs, 120);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"bucket_step": 5}"#).unwrap();
        assert_eq!(cfg.bucket_step, 5);
        assert_eq!(cfg.point_sample_secs, DEFAULT_POINT_SAMPLE_SECS);
        assert_eq!(cfg.fit_grid_points, DEFAULT_FIT_GRID_POINTS);
    }

    #[test]
    fn zero_step_rejected() {
        let cfg = EngineConfig { bucket_step: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(HrError::Config(_))));
    }

    #[test]
    fn empty_histogram_domain_rejected() {
        let cfg = EngineConfig { histogram_min: 200.0, histogram_max: 40.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn request_caps_must_cover_defaults() {
        let cfg = EngineConfig { max_weeks: 10, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(HrError::Config(_))));
        let cfg = EngineConfig { max_range_days: 7, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(HrError::Config(_))));
    }
}
