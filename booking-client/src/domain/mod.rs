//! Domain types for the booking client.
//!
//! Immutable value types decoded from the booking site's payloads. Site
//! codes are resolved at construction, so code holding these types never
//! sees a raw letter.

mod coach;
mod date;
mod error;
mod station;
mod train;

pub use coach::{CoachInfo, CoachService, CoachType, SeatBlock};
pub use date::DepartureDate;
pub use error::{DecodingError, InvalidDate};
pub use station::Station;
pub use train::{FreeSeats, Train, timestamp_from_epoch};
