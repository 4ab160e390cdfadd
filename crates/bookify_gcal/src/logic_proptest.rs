#[cfg(test)]
mod tests {
    use crate::logic::compute_google_offers;
    use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    const TZ: Tz = Tz::America__Los_Angeles;

    fn fixed_now(hour_offset: i64) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-06T19:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
            + Duration::hours(hour_offset)
    }

    fn parse_datetime(datetime_str: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(datetime_str)
            .expect("offer timestamps are RFC 3339")
            .with_timezone(&Utc)
    }

    // Busy periods scattered across the look-ahead window.
    fn busy_periods(
        now: DateTime<Utc>,
        seeds: &[(i64, i64)],
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        seeds
            .iter()
            .map(|&(day, hour)| {
                let start = now + Duration::days(1 + day.rem_euclid(14)) + Duration::hours(hour);
                (start, start + Duration::hours(1))
            })
            .collect()
    }

    proptest! {
        // Every offer starts on the hour, inside 8:00-17:00, on a weekday.
        #[test]
        fn test_offers_on_hourly_weekday_grid(
            hour_offset in 0..24i64,
            slot_minutes in 30..=60i64,
        ) {
            let now = fixed_now(hour_offset);
            let offers =
                compute_google_offers(now, TZ, Duration::minutes(slot_minutes), &[]);

            prop_assert!(!offers.is_empty());
            for offer in &offers {
                let local = parse_datetime(&offer.start).with_timezone(&TZ);
                prop_assert_eq!(local.minute(), 0);
                prop_assert!(local.hour() >= 8 && local.hour() < 17);
                prop_assert!(!matches!(
                    local.weekday(),
                    Weekday::Sat | Weekday::Sun
                ));
                prop_assert!(offer.available);
            }
        }

        // No offer overlaps any busy period.
        #[test]
        fn test_offers_clear_busy_periods(
            hour_offset in 0..24i64,
            seeds in proptest::collection::vec((0..14i64, 8..16i64), 1..8),
        ) {
            let now = fixed_now(hour_offset);
            let busy = busy_periods(now, &seeds);
            let offers = compute_google_offers(now, TZ, Duration::minutes(60), &busy);

            for offer in &offers {
                let start = parse_datetime(&offer.start);
                let end = parse_datetime(&offer.end);
                for &(busy_start, busy_end) in &busy {
                    prop_assert!(
                        start >= busy_end || end <= busy_start,
                        "offer {} - {} overlaps busy {} - {}",
                        start, end, busy_start, busy_end
                    );
                }
            }
        }

        // Adding busy periods only ever removes offers, never adds or moves
        // them.
        #[test]
        fn test_busy_periods_only_remove_offers(
            hour_offset in 0..24i64,
            seeds in proptest::collection::vec((0..14i64, 8..16i64), 0..6),
        ) {
            let now = fixed_now(hour_offset);
            let busy = busy_periods(now, &seeds);
            let unconstrained = compute_google_offers(now, TZ, Duration::minutes(60), &[]);
            let constrained = compute_google_offers(now, TZ, Duration::minutes(60), &busy);

            prop_assert!(constrained.len() <= unconstrained.len());
            let all_starts: Vec<_> = unconstrained.iter().map(|o| o.start.clone()).collect();
            for offer in &constrained {
                prop_assert!(all_starts.contains(&offer.start));
            }
        }
    }
}
