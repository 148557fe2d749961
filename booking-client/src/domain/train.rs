//! Train search results.

use chrono::{DateTime, Utc};

use super::coach::CoachType;
use super::error::DecodingError;
use super::station::Station;

/// Free seat counts per coach type, in the order the search reported them.
///
/// Keys are unique. Iteration order is the order the enrichment pipeline
/// walks coach types in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeSeats(Vec<(CoachType, u32)>);

impl FreeSeats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the count for a coach type.
    ///
    /// A repeated coach type keeps its first position and takes the new count.
    pub fn insert(&mut self, coach_type: CoachType, count: u32) {
        match self.0.iter_mut().find(|(t, _)| *t == coach_type) {
            Some(entry) => entry.1 = count,
            None => self.0.push((coach_type, count)),
        }
    }

    pub fn get(&self, coach_type: CoachType) -> Option<u32> {
        self.0
            .iter()
            .find(|(t, _)| *t == coach_type)
            .map(|(_, count)| *count)
    }

    pub fn contains(&self, coach_type: CoachType) -> bool {
        self.get(coach_type).is_some()
    }

    /// Coach types in insertion order.
    pub fn types(&self) -> impl Iterator<Item = CoachType> + '_ {
        self.0.iter().map(|(t, _)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CoachType, u32)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CoachType, u32)> for FreeSeats {
    fn from_iter<I: IntoIterator<Item = (CoachType, u32)>>(iter: I) -> Self {
        let mut seats = FreeSeats::new();
        for (coach_type, count) in iter {
            seats.insert(coach_type, count);
        }
        seats
    }
}

/// A train run between two stations, as returned by the train search.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    /// Train number, e.g. "743К"
    pub name: String,
    pub from_station: Station,
    pub till_station: Station,
    pub from_time: DateTime<Utc>,
    pub till_time: DateTime<Utc>,
    pub free_seats: FreeSeats,
}

impl Train {
    /// Departure as epoch seconds, the form the coach endpoints expect.
    pub fn departure_epoch(&self) -> i64 {
        self.from_time.timestamp()
    }

    /// Free seats summed over all coach types.
    pub fn total_free_seats(&self) -> u32 {
        self.free_seats.iter().map(|(_, count)| count).sum()
    }
}

/// Convert site epoch seconds to a UTC timestamp.
pub fn timestamp_from_epoch(secs: i64) -> Result<DateTime<Utc>, DecodingError> {
    DateTime::from_timestamp(secs, 0).ok_or(DecodingError::InvalidTimestamp(secs))
}
