use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HrError, Result};

/// Én pulsmåling med varigheten den representerer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub heart_rate: u32, // bpm
    pub duration: u32,   // sekunder
}

/// Rå måling slik den kommer fra tjenesten, enten med varighet eller som punktmåling.
///
/// `heart_rate` er `None` når kilden rapporterer `null` (klokka av håndleddet e.l.);
/// slike målinger er ugyldige og droppes av collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    Duration {
        #[serde(alias = "heartRate")]
        heart_rate: Option<u32>,
        duration: u32,
    },
    Point {
        timestamp: i64,
        #[serde(alias = "heartRate")]
        heart_rate: Option<u32>,
    },
}

impl RawReading {
    pub fn heart_rate(&self) -> Option<u32> {
        match self {
            RawReading::Duration { heart_rate, .. } | RawReading::Point { heart_rate, .. } => {
                *heart_rate
            }
        }
    }

    /// Gjør om til `Observation`. Punktmålinger får `point_sample_secs` som varighet.
    pub fn to_observation(&self, point_sample_secs: u32) -> Option<Observation> {
        match *self {
            RawReading::Duration { heart_rate: Some(hr), duration } => Some(Observation {
                heart_rate: hr,
                duration,
            }),
            RawReading::Point { heart_rate: Some(hr), .. } => Some(Observation {
                heart_rate: hr,
                duration: point_sample_secs,
            }),
            _ => None,
        }
    }
}

/// Pulsbånd `[lower, upper]` (begge inklusive, `upper = lower + step - 1`, kappet ved `u32::MAX`).
///
/// Sorteres numerisk på `lower`; strengformen er null-paddet `"LLL-UUU"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub lower: u32,
    pub upper: u32,
}

impl BucketKey {
    pub fn contains(&self, hr: u32) -> bool {
        self.lower <= hr && hr <= self.upper
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}-{:03}", self.lower, self.upper)
    }
}

impl FromStr for BucketKey {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || HrError::Payload(format!("bad bucket key {s:?}"));
        let (lo, hi) = s.split_once('-').ok_or_else(bad)?;
        let lower: u32 = lo.trim().parse().map_err(|_| bad())?;
        let upper: u32 = hi.trim().parse().map_err(|_| bad())?;
        if upper < lower {
            return Err(bad());
        }
        Ok(BucketKey { lower, upper })
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BucketKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Bånd → akkumulert varighet (sek). Kun bånd med minst én måling.
pub type GroupedData = BTreeMap<BucketKey, u64>;

/// Bånd → prosentandel av vinduets totale tid.
pub type Percentages = BTreeMap<BucketKey, f64>;

/// Inklusivt datovindu uten klokkeslett. Invariant: `start_date <= end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if start_date > end_date {
            return Err(HrError::InvalidRange { from: start_date, to: end_date });
        }
        Ok(Self { start_date, end_date })
    }

    /// Alle kalenderdager i vinduet, stigende.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Resultat for ett vindu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    pub label: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub grouped_data: GroupedData,
    pub total_time_minutes: u64,
    pub percentages: Percentages,
}

/// Utfall per vindu: enten et sammendrag, eller "ingen data" (ikke en feil).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowOutcome {
    Summary(WindowResult),
    NoData {
        label: String,
        from_date: NaiveDate,
        to_date: NaiveDate,
    },
}

impl WindowOutcome {
    pub fn no_data(window: &DateWindow) -> Self {
        WindowOutcome::NoData {
            label: window.label(),
            from_date: window.start_date,
            to_date: window.end_date,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WindowOutcome::Summary(r) => &r.label,
            WindowOutcome::NoData { label, .. } => label,
        }
    }

    pub fn summary(&self) -> Option<&WindowResult> {
        match self {
            WindowOutcome::Summary(r) => Some(r),
            WindowOutcome::NoData { .. } => None,
        }
    }
}
