//! Client for the Ukrzaliznytsia ticket booking site.
//!
//! Establishes a scraped session (cookie plus anti-bot token), searches for
//! trains between two stations on a date, and enriches a train with its
//! coaches and per-seat prices.
//!
//! ```no_run
//! use booking_client::api::{BookingClient, BookingConfig};
//! use booking_client::domain::DepartureDate;
//!
//! # async fn run() -> Result<(), booking_client::BookingError> {
//! let client = BookingClient::connect(BookingConfig::new()).await?;
//! let date = DepartureDate::parse("05.20.2015")?;
//! let trains = client.find_trains("2200001", "2218000", date).await?;
//! if let Some(train) = trains.first() {
//!     let report = client.coaches_info_for_train(train).await?;
//!     println!("{} coaches, complete: {}", report.coach_count(), report.is_complete());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod session;

#[cfg(test)]
mod test_server;

pub use error::BookingError;
