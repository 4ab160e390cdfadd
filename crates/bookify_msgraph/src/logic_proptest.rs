#[cfg(test)]
mod tests {
    use crate::logic::{
        compute_offers, group_busy_by_day, within_booking_window, WorkHoursPolicy,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    const TZ: Tz = Tz::America__Los_Angeles;

    fn parse_datetime(datetime_str: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(datetime_str)
            .expect("Failed to parse RFC3339 datetime")
            .with_timezone(&Utc)
    }

    // Arbitrary busy periods scattered over the look-ahead window.
    fn busy_periods(
        now: DateTime<Utc>,
        offsets_hours: &[i64],
        duration_minutes: i64,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        offsets_hours
            .iter()
            .map(|&offset| {
                let start = now + Duration::hours(offset);
                (start, start + Duration::minutes(duration_minutes.max(15)))
            })
            .collect()
    }

    proptest! {
        // Every produced slot honors the acceptance window, regardless of
        // the clock time the request arrives at or the busy layout.
        #[test]
        fn test_all_slots_within_acceptance_window(
            now_hour in 0..24u32,
            day_of_month in 1..28u32,
            busy_offsets in prop::collection::vec(1..336i64, 0..8),
            busy_duration_minutes in 15..240i64,
        ) {
            let now = Utc.with_ymd_and_hms(2025, 5, day_of_month, now_hour, 0, 0).unwrap();
            let busy = busy_periods(now, &busy_offsets, busy_duration_minutes);
            let busy_by_day = group_busy_by_day(&busy, TZ);

            let response = compute_offers(
                now,
                TZ,
                &WorkHoursPolicy::default(),
                Duration::minutes(60),
                Duration::minutes(30),
                &busy_by_day,
            );

            for slot in response.offers.iter().chain(&response.busy_slots) {
                let start = parse_datetime(&slot.start);
                let end = parse_datetime(&slot.end);
                prop_assert_eq!(end - start, Duration::minutes(60));
                prop_assert!(within_booking_window(start, end, TZ),
                    "slot escapes the acceptance window: {} - {}", slot.start, slot.end);
            }
        }

        // No offered slot, once padded by the buffer, overlaps a busy period.
        #[test]
        fn test_offers_clear_busy_periods_with_buffer(
            busy_offsets in prop::collection::vec(1..336i64, 1..8),
            busy_duration_minutes in 15..240i64,
            buffer_minutes in 0..60i64,
        ) {
            let now = Utc.with_ymd_and_hms(2025, 5, 6, 19, 0, 0).unwrap();
            let buffer = Duration::minutes(buffer_minutes);
            let busy = busy_periods(now, &busy_offsets, busy_duration_minutes);
            let busy_by_day = group_busy_by_day(&busy, TZ);

            let response = compute_offers(
                now,
                TZ,
                &WorkHoursPolicy::default(),
                Duration::minutes(60),
                buffer,
                &busy_by_day,
            );

            for offer in &response.offers {
                let padded_start = parse_datetime(&offer.start) - buffer;
                let padded_end = parse_datetime(&offer.end) + buffer;
                for &(busy_start, busy_end) in &busy {
                    // Offers may legitimately collide with a busy period
                    // grouped under a different local day; only same-day
                    // periods are screened.
                    let same_day = busy_start.with_timezone(&TZ).date_naive()
                        == parse_datetime(&offer.start).with_timezone(&TZ).date_naive();
                    if same_day {
                        prop_assert!(
                            !(padded_start < busy_end && padded_end > busy_start),
                            "offer {} - {} collides with busy {} - {}",
                            offer.start, offer.end, busy_start, busy_end
                        );
                    }
                }
            }
        }

        // The available/busy partition is exhaustive and consistent: every
        // candidate appears exactly once and carries the matching flag.
        #[test]
        fn test_partition_is_consistent(
            busy_offsets in prop::collection::vec(1..336i64, 0..8),
        ) {
            let now = Utc.with_ymd_and_hms(2025, 5, 6, 19, 0, 0).unwrap();
            let busy = busy_periods(now, &busy_offsets, 60);
            let busy_by_day = group_busy_by_day(&busy, TZ);

            let response = compute_offers(
                now,
                TZ,
                &WorkHoursPolicy::default(),
                Duration::minutes(60),
                Duration::minutes(30),
                &busy_by_day,
            );

            let empty = compute_offers(
                now,
                TZ,
                &WorkHoursPolicy::default(),
                Duration::minutes(60),
                Duration::minutes(30),
                &Default::default(),
            );

            prop_assert_eq!(
                response.offers.len() + response.busy_slots.len(),
                empty.offers.len()
            );
            prop_assert!(response.offers.iter().all(|slot| slot.available));
            prop_assert!(response.busy_slots.iter().all(|slot| !slot.available));
        }
    }
}
