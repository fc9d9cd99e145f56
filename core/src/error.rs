// core/src/error.rs
use chrono::NaiveDate;
use thiserror::Error;

/// Felles feiltype for hele motoren.
#[derive(Debug, Error)]
pub enum HrError {
    /// Dato-streng som ikke følger `YYYY-MM-DD`.
    #[error("invalid date format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("invalid range: from_date {from} is after to_date {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("weeks must be a positive integer within the configured maximum, got {0}")]
    InvalidWeeks(u32),

    /// Dato-aritmetikk som havner utenfor det representerbare datoområdet.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    #[error("range of {days} days exceeds the maximum of {max} days")]
    RangeTooLong { days: i64, max: i64 },

    /// Tomt vindu / tom fit-input. Et eget utfall, ikke en "ekte" feil.
    #[error("no data available for the requested period")]
    NoData,

    #[error("invalid sample {0}: heart rate must be > 0")]
    InvalidSample(f64),

    /// Feil fra henting av én enkelt dag. Håndteres lokalt av collector.
    #[error("retrieval failed for {date}: {reason}")]
    Retrieval { date: NaiveDate, reason: String },

    #[error("malformed day payload: {0}")]
    Payload(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HrError {
    /// Valideringsfeil som skal avvise forespørselen før noe hentes.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HrError::InvalidDateFormat(_)
                | HrError::InvalidRange { .. }
                | HrError::InvalidWeeks(_)
                | HrError::DateOutOfRange(_)
                | HrError::RangeTooLong { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HrError>;
