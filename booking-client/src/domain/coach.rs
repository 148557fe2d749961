//! Coach classes, on-board services and per-coach availability.
//!
//! The site identifies coach types and services by single Cyrillic letters.
//! Each enum below carries its code table in `code()`; decoding goes through
//! the same table, so the mapping is a bijection by construction. A letter
//! missing from the table is a [`DecodingError`], never a default variant.

use std::collections::BTreeSet;
use std::fmt;

use super::error::DecodingError;

/// Class of coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoachType {
    /// Two-berth sleeper ("люкс")
    Suite,
    /// Four-berth compartment
    Coupe,
    /// Open-plan sleeper ("плацкарт")
    Berth,
    /// Unreserved seating
    Common,
    /// First class seating
    Seating1,
    /// Second class seating
    Seating2,
}

impl CoachType {
    /// Every coach type, in code table order.
    pub const ALL: [CoachType; 6] = [
        CoachType::Suite,
        CoachType::Coupe,
        CoachType::Berth,
        CoachType::Common,
        CoachType::Seating1,
        CoachType::Seating2,
    ];

    /// The one-letter code the site uses for this coach type.
    pub fn code(self) -> char {
        match self {
            CoachType::Suite => 'Л',
            CoachType::Coupe => 'К',
            CoachType::Berth => 'П',
            CoachType::Common => 'О',
            CoachType::Seating1 => 'С',
            CoachType::Seating2 => 'Д',
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CoachType::Suite => "Suite",
            CoachType::Coupe => "Coupe",
            CoachType::Berth => "Berth",
            CoachType::Common => "Common",
            CoachType::Seating1 => "Seating, 1st class",
            CoachType::Seating2 => "Seating, 2nd class",
        }
    }

    /// Look up a coach type by its code letter.
    pub fn from_code(code: char) -> Result<Self, DecodingError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| DecodingError::UnknownCoachType(code.to_string()))
    }

    /// Parse a coach type from the string form found in JSON payloads.
    ///
    /// The string must hold exactly one character.
    pub fn parse_code(s: &str) -> Result<Self, DecodingError> {
        single_char(s)
            .ok_or_else(|| DecodingError::UnknownCoachType(s.to_string()))
            .and_then(Self::from_code)
    }
}

impl fmt::Display for CoachType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Paid on-board service offered in a coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoachService {
    Tea,
    DoubleTea,
    Foodset,
}

impl CoachService {
    /// Every service, in code table order.
    pub const ALL: [CoachService; 3] = [
        CoachService::Tea,
        CoachService::DoubleTea,
        CoachService::Foodset,
    ];

    /// The one-letter code the site uses for this service.
    pub fn code(self) -> char {
        match self {
            CoachService::Tea => 'Ч',
            CoachService::DoubleTea => 'Ш',
            CoachService::Foodset => 'Н',
        }
    }

    /// Look up a service by its code letter.
    pub fn from_code(code: char) -> Result<Self, DecodingError> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| DecodingError::UnknownService(code.to_string()))
    }

    /// Parse a service from the string form found in JSON payloads.
    pub fn parse_code(s: &str) -> Result<Self, DecodingError> {
        single_char(s)
            .ok_or_else(|| DecodingError::UnknownService(s.to_string()))
            .and_then(Self::from_code)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// One price tier's worth of bookable seats within a coach.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatBlock {
    pub seats: BTreeSet<u32>,
    pub price: f64,
}

impl SeatBlock {
    pub fn new(seats: impl IntoIterator<Item = u32>, price: f64) -> Self {
        Self {
            seats: seats.into_iter().collect(),
            price,
        }
    }
}

/// One physical coach on one train run.
///
/// Built from the coach summary (coach-types endpoint) and the coach detail
/// (coach endpoint); never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachInfo {
    /// Coach number as printed on the car
    pub number: String,
    pub has_bedding: bool,
    /// Free seats grouped by price tier, in the summary's category order
    pub free_places: Vec<SeatBlock>,
    /// Reservation fee
    pub book_price: f64,
    pub services: BTreeSet<CoachService>,
    /// Site coach class (e.g. "Б")
    pub class: String,
    /// Site coach type id, needed to request the detail again
    pub type_id: String,
}

impl CoachInfo {
    /// Total free seats across all price tiers.
    pub fn free_seat_count(&self) -> usize {
        self.free_places.iter().map(|block| block.seats.len()).sum()
    }
}
