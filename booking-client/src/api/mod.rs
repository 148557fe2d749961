//! Booking site API client.
//!
//! This module talks to the site's undocumented `purchase/*` endpoints.
//!
//! Key characteristics of the API:
//! - Every call needs the session cookie and anti-bot token from
//!   [`crate::session`]; there is no way to renew them
//! - Every response is a `{error, value}` envelope; a truthy `error` means
//!   the request was rejected and `value` holds the message
//! - Coach types and services are single Cyrillic letters
//! - Times are epoch seconds; search dates are `MM.DD.YYYY`

mod client;
mod convert;
#[cfg(test)]
pub(crate) mod mock;
mod request;
mod types;

pub use client::{BookingApi, BookingClient, BookingConfig, Endpoint, decode_envelope};
pub use convert::{convert_coach, convert_stations, convert_train, convert_trains};
pub use request::{Form, coach_form, coaches_form, search_form};
pub use types::{
    CoachDetail, CoachList, CoachSummary, Envelope, Id, SeatTypeItem, StationItem, TrainItem,
    TrainStop,
};
