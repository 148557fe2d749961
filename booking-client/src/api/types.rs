//! Booking site response DTOs.
//!
//! These types map directly to the site's JSON. Identifiers arrive as
//! strings on some endpoints and numbers on others, so they go through
//! [`Id`]. Every response is wrapped in an [`Envelope`].

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::BookingError;

/// `{error, value}` wrapper around every endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: Value,

    #[serde(default)]
    pub value: Value,
}

impl Envelope {
    /// Whether the server flagged this response as an error.
    ///
    /// Uses script truthiness: `null`, `false`, `0`, `""` and empty
    /// containers all mean success.
    pub fn is_error(&self) -> bool {
        is_truthy(&self.error)
    }

    /// Unwrap the payload, or turn a flagged response into
    /// [`BookingError::BadResponse`] carrying the server's message.
    pub fn into_value(self, endpoint: &str) -> Result<Value, BookingError> {
        if !self.is_error() {
            return Ok(self.value);
        }

        let message = match self.value {
            Value::String(message) => message,
            Value::Null => match self.error {
                Value::String(message) => message,
                other => other.to_string(),
            },
            other => other.to_string(),
        };

        Err(BookingError::BadResponse {
            endpoint: endpoint.to_string(),
            message,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Identifier sent either as a JSON string or a JSON integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Text(String),
    Number(i64),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Text(s) => f.write_str(s),
            Id::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Entry of the station search (`purchase/station/{query}`).
#[derive(Debug, Clone, Deserialize)]
pub struct StationItem {
    pub station_id: Id,
    pub title: String,
}

/// Entry of the train search (`purchase/search/`).
#[derive(Debug, Clone, Deserialize)]
pub struct TrainItem {
    /// Train number, e.g. "743К".
    pub num: String,

    pub from: TrainStop,

    pub till: TrainStop,

    /// Coach types with free seats. Absent when the train is sold out.
    #[serde(default)]
    pub types: Vec<SeatTypeItem>,
}

/// Departure or arrival end of a train search entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainStop {
    pub station: String,

    pub station_id: Id,

    /// Epoch seconds.
    pub date: i64,
}

/// Free seat count for one coach type.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatTypeItem {
    /// One-letter coach type code.
    pub letter: String,

    pub title: Option<String>,

    pub places: u32,
}

/// One coach as listed by the coach-types endpoint (`purchase/coaches/`).
#[derive(Debug, Clone, Deserialize)]
pub struct CoachSummary {
    pub num: Id,

    #[serde(default)]
    pub has_bedding: bool,

    /// Reservation fee.
    pub reserve_price: f64,

    /// One-letter service codes.
    #[serde(default)]
    pub services: Vec<String>,

    /// Price per seat category, in the order the site lists them.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub prices: Vec<(String, f64)>,

    pub coach_class: String,

    pub coach_type_id: Id,

    pub places_cnt: Option<u32>,
}

/// Payload of the coach-types endpoint.
///
/// The site has served both a bare list and an object with a `coaches`
/// field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoachList {
    Bare(Vec<CoachSummary>),
    Wrapped { coaches: Vec<CoachSummary> },
}

impl CoachList {
    pub fn into_vec(self) -> Vec<CoachSummary> {
        match self {
            CoachList::Bare(coaches) => coaches,
            CoachList::Wrapped { coaches } => coaches,
        }
    }
}

/// Payload of the coach endpoint (`purchase/coach/`).
#[derive(Debug, Clone, Deserialize)]
pub struct CoachDetail {
    /// Free seat numbers per price category.
    #[serde(default)]
    pub places: HashMap<String, Vec<Id>>,
}

/// Deserialize a JSON object into key/value pairs, keeping document order.
///
/// The order survives the round trip through `serde_json::Value` only
/// because serde_json is built with `preserve_order`.
fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}
