// core/src/planner.rs
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{HrError, Result};
use crate::types::DateWindow;

/// Hvordan vinduene skal bygges. JSON: `{"weeks": 20}` eller `{"from_date": .., "to_date": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanRequest {
    Weeks {
        weeks: u32,
    },
    Range {
        #[serde(default)]
        from_date: Option<String>,
        #[serde(default)]
        to_date: Option<String>,
    },
}

impl Default for PlanRequest {
    fn default() -> Self {
        PlanRequest::Range { from_date: None, to_date: None }
    }
}

/// `weeks` vinduer à 7 dager bakover fra `today`, nærmeste uke først.
/// Vindu i slutter på `today - 7*i` og starter 6 dager før.
/// Går vinduene utenfor datoområdet til chrono, avvises forespørselen.
pub fn weeks_back(today: NaiveDate, weeks: u32) -> Result<Vec<DateWindow>> {
    if weeks == 0 {
        return Err(HrError::InvalidWeeks(weeks));
    }
    // Eldste startdato først, så vi avviser før noe bygges
    today
        .checked_sub_days(Days::new(7 * (u64::from(weeks) - 1) + 6))
        .ok_or(HrError::InvalidWeeks(weeks))?;
    let mut windows = Vec::new();
    for i in 0..u64::from(weeks) {
        let end = today
            .checked_sub_days(Days::new(7 * i))
            .ok_or(HrError::InvalidWeeks(weeks))?;
        let start = end
            .checked_sub_days(Days::new(6))
            .ok_or(HrError::InvalidWeeks(weeks))?;
        windows.push(DateWindow { start_date: start, end_date: end });
    }
    Ok(windows)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| HrError::InvalidDateFormat(s.to_string()))
}

fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_sub_days(Days::new(d)))
        .ok_or_else(|| HrError::DateOutOfRange(format!("{date} minus {days} days")))
}

/// Eksplisitt vindu. Default: `to_date` = i går, `from_date` = `to_date - range_days`.
pub fn explicit_range(
    from_date: Option<&str>,
    to_date: Option<&str>,
    today: NaiveDate,
    range_days: i64,
) -> Result<DateWindow> {
    let to = match to_date {
        Some(s) => parse_date(s)?,
        None => days_before(today, 1)?,
    };
    let from = match from_date {
        Some(s) => parse_date(s)?,
        None => days_before(to, range_days)?,
    };
    DateWindow::new(from, to)
}

/// Bygger vinduene for en forespørsel. Valideringsfeil kommer her, før noe hentes.
pub fn plan(request: &PlanRequest, today: NaiveDate, cfg: &EngineConfig) -> Result<Vec<DateWindow>> {
    match request {
        PlanRequest::Weeks { weeks } => {
            if *weeks > cfg.max_weeks {
                return Err(HrError::InvalidWeeks(*weeks));
            }
            weeks_back(today, *weeks)
        }
        PlanRequest::Range { from_date, to_date } => {
            let w = explicit_range(
                from_date.as_deref(),
                to_date.as_deref(),
                today,
                cfg.default_range_days,
            )?;
            if w.num_days() > cfg.max_range_days {
                return Err(HrError::RangeTooLong { days: w.num_days(), max: cfg.max_range_days });
            }
            Ok(vec![w])
        }
    }
}
