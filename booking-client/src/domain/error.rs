//! Domain error types.
//!
//! These errors mean the site sent data our model cannot represent. They are
//! distinct from transport and protocol errors, and are never skipped: an
//! unknown code means the code table is out of date.

/// Failure to decode a site payload into domain types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    /// Coach type letter not present in the code table
    #[error("unknown coach type code: {0:?}")]
    UnknownCoachType(String),

    /// Coach service letter not present in the code table
    #[error("unknown coach service code: {0:?}")]
    UnknownService(String),

    /// Seat number that is not a positive integer
    #[error("invalid seat number: {0:?}")]
    InvalidSeat(String),

    /// Price category listed in the coach summary but absent from the detail
    #[error("price category {0:?} has no seat list")]
    MissingPriceCategory(String),

    /// Epoch seconds outside the representable range
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Error returned when a departure date string is in neither accepted format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure date {input:?}: expected MM.DD.YYYY or YYYY-MM-DD")]
pub struct InvalidDate {
    pub(crate) input: String,
}
