//! In-memory [`BookingApi`] for tests.
//!
//! Serves canned envelope bodies keyed by coach type and coach number, and
//! decodes them through the same path as the live client.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{CoachType, Train};
use crate::error::BookingError;

use super::client::{BookingApi, decode_envelope};
use super::types::{CoachDetail, CoachList, CoachSummary};

/// Mock booking API that replays envelope bodies.
#[derive(Default)]
pub struct MockBookingApi {
    /// `purchase/coaches/` bodies, keyed by coach type.
    coaches: HashMap<CoachType, String>,
    /// `purchase/coach/` bodies, keyed by coach number.
    details: HashMap<String, String>,
    /// Requests served, in order, as `"coaches:К"` / `"coach:5"`.
    calls: Mutex<Vec<String>>,
}

impl MockBookingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coaches(mut self, coach_type: CoachType, body: impl Into<String>) -> Self {
        self.coaches.insert(coach_type, body.into());
        self
    }

    pub fn with_detail(mut self, coach_num: impl Into<String>, body: impl Into<String>) -> Self {
        self.details.insert(coach_num.into(), body.into());
        self
    }

    /// Requests served so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl BookingApi for MockBookingApi {
    async fn coaches(
        &self,
        _train: &Train,
        coach_type: CoachType,
    ) -> Result<Vec<CoachSummary>, BookingError> {
        self.record(format!("coaches:{}", coach_type.code()));

        let body = self.coaches.get(&coach_type).ok_or_else(|| BookingError::Status {
            status: 404,
            message: format!("no mock coaches for {coach_type}"),
        })?;

        let list: CoachList = decode_envelope("purchase/coaches/", body)?;
        Ok(list.into_vec())
    }

    async fn coach_detail(
        &self,
        _train: &Train,
        coach: &CoachSummary,
    ) -> Result<CoachDetail, BookingError> {
        let num = coach.num.to_string();
        self.record(format!("coach:{num}"));

        let body = self.details.get(&num).ok_or_else(|| BookingError::Status {
            status: 404,
            message: format!("no mock detail for coach {num}"),
        })?;

        decode_envelope("purchase/coach/", body)
    }
}
