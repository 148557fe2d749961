//! Coach enrichment for a train.
//!
//! A train search only reports free seat counts per coach type. Getting
//! actual coaches and seats takes a cascade of dependent requests:
//!
//! 1. for each coach type on the train, list its coaches
//! 2. for each coach, fetch its seat and price detail
//! 3. combine summary and detail into a [`CoachInfo`]
//!
//! Requests are issued one at a time in exactly this order.
//!
//! # Failure policy
//!
//! Skip and continue. When the site rejects a single request with a
//! `{error: truthy}` envelope, that coach type or coach is left out and the
//! rejection is recorded in [`CoachReport::failures`]. Every other error
//! (transport, expired session, undecodable payload) aborts the whole call.
//! A report with failures is partial; check [`CoachReport::is_complete`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::api::{BookingApi, convert_coach};
use crate::domain::{CoachInfo, CoachType, Train};
use crate::error::BookingError;

/// Pipeline stage a skipped request belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Listing the coaches of one type
    Coaches,
    /// Fetching one coach's seat detail
    CoachDetail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Coaches => f.write_str("coaches"),
            Stage::CoachDetail => f.write_str("coach detail"),
        }
    }
}

/// A request the pipeline skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub stage: Stage,
    pub coach_type: CoachType,
    /// Coach number, for [`Stage::CoachDetail`] failures
    pub coach: Option<String>,
    /// Server-supplied message
    pub message: String,
}

/// Coaches of a train grouped by type, plus anything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoachReport {
    /// Only types with at least one decoded coach have an entry.
    pub coaches: BTreeMap<CoachType, Vec<CoachInfo>>,
    pub failures: Vec<EnrichmentFailure>,
}

impl CoachReport {
    /// True when no request was skipped.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn get(&self, coach_type: CoachType) -> Option<&[CoachInfo]> {
        self.coaches.get(&coach_type).map(Vec::as_slice)
    }

    /// Number of coaches across all types.
    pub fn coach_count(&self) -> usize {
        self.coaches.values().map(Vec::len).sum()
    }

    fn push(&mut self, coach_type: CoachType, info: CoachInfo) {
        self.coaches.entry(coach_type).or_default().push(info);
    }

    fn skip(
        &mut self,
        stage: Stage,
        coach_type: CoachType,
        coach: Option<String>,
        message: String,
    ) {
        warn!(%stage, %coach_type, coach = coach.as_deref(), %message, "skipping rejected request");
        self.failures.push(EnrichmentFailure {
            stage,
            coach_type,
            coach,
            message,
        });
    }
}

/// Fetch coach and seat detail for every coach type on `train`.
///
/// Coach types are walked in the order of `train.free_seats`, coaches in
/// the order the site lists them.
#[instrument(skip(api, train), fields(train = %train.name))]
pub async fn coaches_info_for_train<A>(api: &A, train: &Train) -> Result<CoachReport, BookingError>
where
    A: BookingApi + ?Sized,
{
    let mut report = CoachReport::default();

    for coach_type in train.free_seats.types() {
        let summaries = match api.coaches(train, coach_type).await {
            Ok(summaries) => summaries,
            Err(BookingError::BadResponse { message, .. }) => {
                report.skip(Stage::Coaches, coach_type, None, message);
                continue;
            }
            Err(e) => return Err(e),
        };
        debug!(%coach_type, count = summaries.len(), "coaches listed");

        for summary in &summaries {
            let detail = match api.coach_detail(train, summary).await {
                Ok(detail) => detail,
                Err(BookingError::BadResponse { message, .. }) => {
                    report.skip(
                        Stage::CoachDetail,
                        coach_type,
                        Some(summary.num.to_string()),
                        message,
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            report.push(coach_type, convert_coach(summary, &detail)?);
        }
    }

    info!(
        coaches = report.coach_count(),
        skipped = report.failures.len(),
        "enrichment finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBookingApi;
    use crate::domain::{DecodingError, SeatBlock, Station, timestamp_from_epoch};

    fn train(types: &[(CoachType, u32)]) -> Train {
        Train {
            name: "091К".into(),
            from_station: Station::new("2200001", "Київ"),
            till_station: Station::new("2218000", "Львів"),
            from_time: timestamp_from_epoch(1_432_101_600).unwrap(),
            till_time: timestamp_from_epoch(1_432_140_000).unwrap(),
            free_seats: types.iter().copied().collect(),
        }
    }

    fn coach(num: u32, prices: &str) -> String {
        format!(
            r#"{{"num": {num}, "has_bedding": true, "reserve_price": 17, "services": ["Ч"],
                "prices": {prices}, "coach_class": "Б", "coach_type_id": 3}}"#
        )
    }

    fn ok(value: &str) -> String {
        format!(r#"{{"error": null, "value": {value}}}"#)
    }

    fn rejected(message: &str) -> String {
        format!(r#"{{"error": true, "value": "{message}"}}"#)
    }

    #[tokio::test]
    async fn walks_types_then_coaches_in_order() {
        let api = MockBookingApi::new()
            .with_coaches(
                CoachType::Coupe,
                ok(&format!("[{}, {}]", coach(5, r#"{"A": 250}"#), coach(6, r#"{"A": 250}"#))),
            )
            .with_coaches(
                CoachType::Berth,
                ok(&format!(r#"{{"coaches": [{}]}}"#, coach(9, r#"{"A": 120, "B": 110}"#))),
            )
            .with_detail("5", ok(r#"{"places": {"A": ["1", "2"]}}"#))
            .with_detail("6", ok(r#"{"places": {"A": ["14"]}}"#))
            .with_detail("9", ok(r#"{"places": {"A": ["1", "3"], "B": ["54"]}}"#));

        let report = coaches_info_for_train(
            &api,
            &train(&[(CoachType::Coupe, 3), (CoachType::Berth, 3)]),
        )
        .await
        .unwrap();

        assert_eq!(
            api.calls(),
            vec!["coaches:К", "coach:5", "coach:6", "coaches:П", "coach:9"]
        );
        assert!(report.is_complete());
        assert_eq!(report.coach_count(), 3);

        let coupe = report.get(CoachType::Coupe).unwrap();
        assert_eq!(
            coupe.iter().map(|c| c.number.as_str()).collect::<Vec<_>>(),
            vec!["5", "6"]
        );

        let berth = report.get(CoachType::Berth).unwrap();
        assert_eq!(
            berth[0].free_places,
            vec![SeatBlock::new([1, 3], 120.0), SeatBlock::new([54], 110.0)]
        );
        assert!(berth[0].book_price > 0.0);
    }

    #[tokio::test]
    async fn rejected_coach_type_is_skipped() {
        let api = MockBookingApi::new()
            .with_coaches(CoachType::Suite, rejected("Місць немає"))
            .with_coaches(CoachType::Coupe, ok(&format!("[{}]", coach(5, r#"{"A": 250}"#))))
            .with_detail("5", ok(r#"{"places": {"A": ["7"]}}"#));

        let report = coaches_info_for_train(
            &api,
            &train(&[(CoachType::Suite, 1), (CoachType::Coupe, 1)]),
        )
        .await
        .unwrap();

        assert!(!report.is_complete());
        assert!(report.get(CoachType::Suite).is_none());
        assert_eq!(report.get(CoachType::Coupe).unwrap().len(), 1);
        assert_eq!(
            report.failures,
            vec![EnrichmentFailure {
                stage: Stage::Coaches,
                coach_type: CoachType::Suite,
                coach: None,
                message: "Місць немає".into(),
            }]
        );
    }

    #[tokio::test]
    async fn rejected_coach_is_skipped() {
        let api = MockBookingApi::new()
            .with_coaches(
                CoachType::Berth,
                ok(&format!("[{}, {}]", coach(1, r#"{"A": 90}"#), coach(2, r#"{"A": 90}"#))),
            )
            .with_detail("1", rejected("Вагон недоступний"))
            .with_detail("2", ok(r#"{"places": {"A": ["33"]}}"#));

        let report = coaches_info_for_train(&api, &train(&[(CoachType::Berth, 2)]))
            .await
            .unwrap();

        let berth = report.get(CoachType::Berth).unwrap();
        assert_eq!(berth.len(), 1);
        assert_eq!(berth[0].number, "2");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, Stage::CoachDetail);
        assert_eq!(report.failures[0].coach.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn type_with_every_coach_rejected_has_no_key() {
        let api = MockBookingApi::new()
            .with_coaches(CoachType::Common, ok(&format!("[{}]", coach(3, r#"{"A": 40}"#))))
            .with_detail("3", rejected("no"));

        let report = coaches_info_for_train(&api, &train(&[(CoachType::Common, 10)]))
            .await
            .unwrap();

        assert!(report.coaches.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn non_rejection_errors_abort() {
        // No canned body for Berth: the mock answers with a 404 status error
        let api = MockBookingApi::new()
            .with_coaches(CoachType::Coupe, ok("[]"));

        let err = coaches_info_for_train(
            &api,
            &train(&[(CoachType::Coupe, 1), (CoachType::Berth, 1)]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BookingError::Status { status: 404, .. }));
        assert_eq!(api.calls(), vec!["coaches:К", "coaches:П"]);
    }

    #[tokio::test]
    async fn unknown_service_code_aborts() {
        let api = MockBookingApi::new()
            .with_coaches(
                CoachType::Coupe,
                ok(r#"[{"num": 5, "reserve_price": 17, "services": ["Z"], "prices": {"A": 1},
                       "coach_class": "К", "coach_type_id": 1}]"#),
            )
            .with_detail("5", ok(r#"{"places": {"A": ["1"]}}"#));

        let err = coaches_info_for_train(&api, &train(&[(CoachType::Coupe, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Decoding(DecodingError::UnknownService(_))
        ));
    }

    #[tokio::test]
    async fn train_without_free_seats_makes_no_requests() {
        let api = MockBookingApi::new();
        let report = coaches_info_for_train(&api, &train(&[])).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.coach_count(), 0);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn keys_are_subset_of_free_seats() {
        let api = MockBookingApi::new()
            .with_coaches(CoachType::Seating1, ok(&format!("[{}]", coach(1, r#"{"A": 300}"#))))
            .with_coaches(CoachType::Seating2, ok("[]"))
            .with_detail("1", ok(r#"{"places": {"A": ["11", "12"]}}"#));

        let t = train(&[(CoachType::Seating1, 2), (CoachType::Seating2, 0)]);
        let report = coaches_info_for_train(&api, &t).await.unwrap();

        assert!(report.coaches.keys().all(|k| t.free_seats.contains(*k)));
        assert!(report.coaches.values().all(|coaches| !coaches.is_empty()));
        assert_eq!(report.get(CoachType::Seating1).unwrap()[0].free_seat_count(), 2);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Coaches.to_string(), "coaches");
        assert_eq!(Stage::CoachDetail.to_string(), "coach detail");
    }
}
