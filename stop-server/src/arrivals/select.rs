//! Upcoming arrival selection.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::domain::{MalformedTime, NormalizedArrival, ScheduleEntry, normalize};

/// Pick the next `limit` arrivals after `reference`.
///
/// `entries` must already be in ascending arrival-time order, as the data
/// store returns them; they are not re-sorted. Every entry is resolved
/// against the calendar date of `reference`. Arrivals strictly after
/// `reference` come first. If fewer than `limit` of those exist, every entry
/// shifted forward by one day is appended (again keeping only those after
/// `reference`), and the combined list is cut to `limit`.
///
/// The two halves are concatenated rather than merged, so output is not
/// guaranteed to be globally time-ordered when entries list hours past 24.
///
/// Fails if any entry's arrival time is malformed; no partial result is
/// returned.
pub fn select_arrivals(
    entries: &[ScheduleEntry],
    reference: NaiveDateTime,
    limit: usize,
) -> Result<Vec<NormalizedArrival>, MalformedTime> {
    let service_day = reference.date();

    let candidates = entries
        .iter()
        .map(|entry| {
            Ok(NormalizedArrival {
                trip_name: entry.trip_name.clone(),
                arrival: normalize(&entry.arrival_time, service_day)?,
            })
        })
        .collect::<Result<Vec<_>, MalformedTime>>()?;

    let mut selected: Vec<NormalizedArrival> = candidates
        .iter()
        .filter(|a| a.arrival > reference)
        .cloned()
        .collect();

    if selected.len() < limit {
        let before = selected.len();
        selected.extend(candidates.iter().filter_map(|a| {
            let arrival = a.arrival.checked_add_signed(Duration::days(1))?;
            (arrival > reference).then(|| NormalizedArrival {
                trip_name: a.trip_name.clone(),
                arrival,
            })
        }));
        debug!(
            today = before,
            rolled_over = selected.len() - before,
            limit,
            "too few arrivals left today, added next-day arrivals"
        );
    }

    selected.truncate(limit);
    Ok(selected)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{RouteId, StopId};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    prop_compose! {
        fn sorted_entries()(mut hours in prop::collection::vec((0u32..48, 0u32..60), 0..15))
            -> Vec<ScheduleEntry>
        {
            hours.sort();
            hours
                .into_iter()
                .map(|(h, m)| ScheduleEntry {
                    trip_id: String::new(),
                    trip_name: "T".into(),
                    route_id: RouteId("1".into()),
                    stop_id: StopId(1),
                    arrival_time: format!("{h:02}:{m:02}:00"),
                })
                .collect()
        }
    }

    proptest! {
        /// Never more than `limit`, and every arrival is after the reference
        #[test]
        fn bounded_and_upcoming(
            entries in sorted_entries(),
            hour in 0u32..24,
            minute in 0u32..60,
            limit in 0usize..8
        ) {
            let reference = NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap();
            let result = select_arrivals(&entries, reference, limit).unwrap();

            prop_assert!(result.len() <= limit);
            for a in &result {
                prop_assert!(a.arrival > reference);
            }
        }

        /// Any non-empty schedule yields at least one arrival within two days
        #[test]
        fn nonempty_schedule_yields_arrival(
            entries in sorted_entries().prop_filter("non-empty", |e| !e.is_empty()),
            hour in 0u32..24
        ) {
            let reference = NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap();
            let result = select_arrivals(&entries, reference, 5).unwrap();
            prop_assert!(!result.is_empty());
        }
    }
}
