//! Conversion from booking site DTOs to domain types.
//!
//! Unknown coach type or service codes fail the whole conversion.

use std::collections::BTreeSet;

use crate::domain::{
    CoachInfo, CoachService, CoachType, DecodingError, FreeSeats, SeatBlock, Station, Train,
    timestamp_from_epoch,
};

use super::types::{CoachDetail, CoachSummary, Id, StationItem, TrainItem, TrainStop};

/// Convert station search entries.
pub fn convert_stations(items: &[StationItem]) -> Vec<Station> {
    items
        .iter()
        .map(|item| Station::new(item.station_id.to_string(), item.title.clone()))
        .collect()
}

/// Convert train search entries, preserving order.
pub fn convert_trains(items: &[TrainItem]) -> Result<Vec<Train>, DecodingError> {
    items.iter().map(convert_train).collect()
}

/// Convert a single train search entry.
pub fn convert_train(item: &TrainItem) -> Result<Train, DecodingError> {
    let free_seats = item
        .types
        .iter()
        .map(|t| CoachType::parse_code(&t.letter).map(|coach_type| (coach_type, t.places)))
        .collect::<Result<FreeSeats, _>>()?;

    Ok(Train {
        name: item.num.clone(),
        from_station: stop_station(&item.from),
        till_station: stop_station(&item.till),
        from_time: timestamp_from_epoch(item.from.date)?,
        till_time: timestamp_from_epoch(item.till.date)?,
        free_seats,
    })
}

fn stop_station(stop: &TrainStop) -> Station {
    Station::new(stop.station_id.to_string(), stop.station.clone())
}

/// Combine a coach summary with its seat detail.
///
/// Produces one [`SeatBlock`] per price category of the summary, in the
/// summary's order, with seats taken from the detail's list for the same
/// category.
pub fn convert_coach(summary: &CoachSummary, detail: &CoachDetail) -> Result<CoachInfo, DecodingError> {
    let free_places = summary
        .prices
        .iter()
        .map(|(category, price)| -> Result<SeatBlock, DecodingError> {
            let seats = detail
                .places
                .get(category)
                .ok_or_else(|| DecodingError::MissingPriceCategory(category.clone()))?
                .iter()
                .map(parse_seat)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SeatBlock::new(seats, *price))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let services = summary
        .services
        .iter()
        .map(|code| CoachService::parse_code(code))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(CoachInfo {
        number: summary.num.to_string(),
        has_bedding: summary.has_bedding,
        free_places,
        book_price: summary.reserve_price,
        services,
        class: summary.coach_class.clone(),
        type_id: summary.coach_type_id.to_string(),
    })
}

fn parse_seat(id: &Id) -> Result<u32, DecodingError> {
    let seat = match id {
        Id::Number(n) => u32::try_from(*n).ok(),
        Id::Text(s) => s.trim().parse::<u32>().ok(),
    };

    seat.filter(|n| *n > 0)
        .ok_or_else(|| DecodingError::InvalidSeat(id.to_string()))
}
