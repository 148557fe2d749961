//! Request payload builders.
//!
//! Pure functions producing the form fields each endpoint expects. Field
//! names and order match what the site's own pages send.

use crate::domain::{CoachType, DepartureDate, Train};

use super::types::CoachSummary;

/// Form-encoded request body.
pub type Form = Vec<(&'static str, String)>;

/// Start of the departure time window sent with every search.
const SEARCH_TIME_FROM: &str = "00:00";

/// Payload for `purchase/search/`.
pub fn search_form(from_id: &str, till_id: &str, date: DepartureDate) -> Form {
    vec![
        ("station_id_from", from_id.to_string()),
        ("station_id_till", till_id.to_string()),
        ("date_dep", date.to_wire()),
        ("time_dep", SEARCH_TIME_FROM.to_string()),
    ]
}

/// Payload for `purchase/coaches/`: all coaches of one type on a train.
pub fn coaches_form(train: &Train, coach_type: CoachType) -> Form {
    vec![
        ("station_id_from", train.from_station.id.clone()),
        ("station_id_till", train.till_station.id.clone()),
        ("train", train.name.clone()),
        ("coach_type", coach_type.code().to_string()),
        ("date_dep", train.departure_epoch().to_string()),
    ]
}

/// Payload for `purchase/coach/`: seat detail of one coach.
pub fn coach_form(train: &Train, coach: &CoachSummary) -> Form {
    vec![
        ("station_id_from", train.from_station.id.clone()),
        ("station_id_till", train.till_station.id.clone()),
        ("train", train.name.clone()),
        ("date_dep", train.departure_epoch().to_string()),
        ("coach_num", coach.num.to_string()),
        ("coach_class", coach.coach_class.clone()),
        ("coach_type_id", coach.coach_type_id.to_string()),
    ]
}
