//! Departure date handling.
//!
//! Callers have been seen passing both `MM.DD.YYYY` and ISO `YYYY-MM-DD`.
//! Both are accepted here; the search endpoint always receives `MM.DD.YYYY`.

use std::fmt;

use chrono::NaiveDate;

use super::error::InvalidDate;

const WIRE_FORMAT: &str = "%m.%d.%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Byte layouts of the two formats; `9` marks an ASCII digit.
const WIRE_SHAPE: &[u8; 10] = b"99.99.9999";
const ISO_SHAPE: &[u8; 10] = b"9999-99-99";

fn has_shape(s: &str, shape: &[u8; 10]) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.iter()).all(|(b, &expected)| match expected {
            b'9' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

/// A validated departure date.
///
/// # Examples
///
/// ```
/// use booking_client::domain::DepartureDate;
///
/// let a = DepartureDate::parse("05.20.2015").unwrap();
/// let b = DepartureDate::parse("2015-05-20").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_wire(), "05.20.2015");
///
/// assert!(DepartureDate::parse("20.05.2015").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureDate(NaiveDate);

impl DepartureDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse either `MM.DD.YYYY` or `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self, InvalidDate> {
        let s = s.trim();
        let invalid = || InvalidDate { input: s.to_string() };

        // chrono also takes signs, short years and single-digit fields
        let format = if has_shape(s, WIRE_SHAPE) {
            WIRE_FORMAT
        } else if has_shape(s, ISO_SHAPE) {
            ISO_FORMAT
        } else {
            return Err(invalid());
        };

        NaiveDate::parse_from_str(s, format)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The `MM.DD.YYYY` form sent in the search payload.
    pub fn to_wire(&self) -> String {
        self.0.format(WIRE_FORMAT).to_string()
    }
}

impl From<NaiveDate> for DepartureDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DepartureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}
