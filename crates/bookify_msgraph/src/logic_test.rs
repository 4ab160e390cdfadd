#[cfg(test)]
mod tests {
    use crate::logic::{
        compute_offers, evaluate_conflict_probe, group_busy_by_day, local_at,
        within_booking_window, BusyByDay, WorkHoursPolicy, HORIZON_DAYS,
    };
    use crate::service::{GraphError, GraphEvent};
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::Tz;

    const TZ: Tz = Tz::America__Los_Angeles;

    fn parse(datetime_str: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(datetime_str)
            .expect("Failed to parse RFC3339 datetime")
            .with_timezone(&Utc)
    }

    // --- WorkHoursPolicy ---

    #[test]
    fn test_parse_work_hours() {
        let policy = WorkHoursPolicy::parse("Mon-Fri 09:00-18:00");
        assert_eq!(
            policy.days,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
        assert_eq!(policy.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(policy.end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_work_hours_wraps_week() {
        let policy = WorkHoursPolicy::parse("Fri-Mon 08:00-17:00");
        assert_eq!(
            policy.days,
            vec![Weekday::Fri, Weekday::Sat, Weekday::Sun, Weekday::Mon]
        );
    }

    #[test]
    fn test_parse_work_hours_malformed_falls_back() {
        assert_eq!(WorkHoursPolicy::parse("garbage"), WorkHoursPolicy::default());
        assert_eq!(
            WorkHoursPolicy::parse("Mon-Fri 17:00-08:00"),
            WorkHoursPolicy::default()
        );
        assert_eq!(WorkHoursPolicy::parse(""), WorkHoursPolicy::default());
    }

    // --- Booking window ---

    #[test]
    fn test_booking_window_accepts_business_hours() {
        // 10:00-11:00 Pacific on a Thursday.
        let start = parse("2025-05-15T10:00:00-07:00");
        let end = parse("2025-05-15T11:00:00-07:00");
        assert!(within_booking_window(start, end, TZ));
    }

    #[test]
    fn test_booking_window_rejects_early_start() {
        let start = parse("2025-05-15T07:00:00-07:00");
        let end = parse("2025-05-15T08:00:00-07:00");
        assert!(!within_booking_window(start, end, TZ));
    }

    #[test]
    fn test_booking_window_rejects_late_end() {
        let start = parse("2025-05-15T17:30:00-07:00");
        let end = parse("2025-05-15T18:30:00-07:00");
        assert!(!within_booking_window(start, end, TZ));
    }

    #[test]
    fn test_booking_window_rejects_cross_day() {
        let start = parse("2025-05-15T16:00:00-07:00");
        let end = parse("2025-05-16T10:00:00-07:00");
        assert!(!within_booking_window(start, end, TZ));
    }

    #[test]
    fn test_booking_window_rejects_inverted_range() {
        let start = parse("2025-05-15T11:00:00-07:00");
        let end = parse("2025-05-15T10:00:00-07:00");
        assert!(!within_booking_window(start, end, TZ));
    }

    // --- Grouping ---

    #[test]
    fn test_group_busy_by_local_day() {
        // 23:00 Pacific on May 14 is 06:00 UTC on May 15; grouping must use
        // the local date, not the UTC one.
        let busy = vec![(
            parse("2025-05-14T23:00:00-07:00"),
            parse("2025-05-14T23:30:00-07:00"),
        )];
        let by_day = group_busy_by_day(&busy, TZ);
        let day = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        assert_eq!(by_day.get(&day).map(Vec::len), Some(1));
        assert_eq!(by_day.len(), 1);
    }

    // --- Offer computation ---

    /// Tuesday noon Pacific, so the window covers Wed May 7 through Tue May 20.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 19, 0, 0).unwrap()
    }

    #[test]
    fn test_compute_offers_no_busy_periods() {
        let response = compute_offers(
            fixed_now(),
            TZ,
            &WorkHoursPolicy::default(),
            Duration::minutes(60),
            Duration::minutes(30),
            &BusyByDay::new(),
        );

        assert!(response.busy_slots.is_empty());
        // 10 business days in the window, 17 hour-long slots per day at a
        // 30-minute step (08:00 through 16:00 starts).
        assert_eq!(response.offers.len(), 10 * 17);
        for offer in &response.offers {
            assert!(offer.available);
            assert_eq!(offer.tz, "America/Los_Angeles");
            let start = parse(&offer.start);
            let end = parse(&offer.end);
            assert_eq!(end - start, Duration::minutes(60));
            assert!(within_booking_window(start, end, TZ));
        }
    }

    #[test]
    fn test_compute_offers_starts_tomorrow() {
        let response = compute_offers(
            fixed_now(),
            TZ,
            &WorkHoursPolicy::default(),
            Duration::minutes(60),
            Duration::minutes(30),
            &BusyByDay::new(),
        );

        let today = fixed_now().with_timezone(&TZ).date_naive();
        for offer in response.offers.iter().chain(&response.busy_slots) {
            let local_date = parse(&offer.start).with_timezone(&TZ).date_naive();
            assert!(local_date > today, "no same-day offers: {}", offer.start);
            assert!(local_date <= today + Duration::days(HORIZON_DAYS));
            assert!(
                WorkHoursPolicy::default().includes(chrono::Datelike::weekday(&local_date)),
                "no weekend offers: {}",
                offer.start
            );
        }
    }

    #[test]
    fn test_compute_offers_buffer_marks_adjacent_slots_busy() {
        // Busy 10:00-11:00 Pacific on Wed May 7. With a 30-minute buffer the
        // 09:00, 09:30, 10:00, 10:30 and 11:00 starts all collide.
        let busy = vec![(
            parse("2025-05-07T10:00:00-07:00"),
            parse("2025-05-07T11:00:00-07:00"),
        )];
        let busy_by_day = group_busy_by_day(&busy, TZ);

        let response = compute_offers(
            fixed_now(),
            TZ,
            &WorkHoursPolicy::default(),
            Duration::minutes(60),
            Duration::minutes(30),
            &busy_by_day,
        );

        let busy_starts: Vec<String> = response
            .busy_slots
            .iter()
            .map(|slot| {
                parse(&slot.start)
                    .with_timezone(&TZ)
                    .format("%H:%M")
                    .to_string()
            })
            .collect();
        assert_eq!(busy_starts, vec!["09:00", "09:30", "10:00", "10:30", "11:00"]);
        for slot in &response.busy_slots {
            assert!(!slot.available);
        }
        assert_eq!(response.offers.len(), 10 * 17 - 5);
    }

    #[test]
    fn test_compute_offers_zero_buffer_keeps_adjacent_slots() {
        let busy = vec![(
            parse("2025-05-07T10:00:00-07:00"),
            parse("2025-05-07T11:00:00-07:00"),
        )];
        let busy_by_day = group_busy_by_day(&busy, TZ);

        let response = compute_offers(
            fixed_now(),
            TZ,
            &WorkHoursPolicy::default(),
            Duration::minutes(60),
            Duration::minutes(0),
            &busy_by_day,
        );

        // Only the three starts that truly overlap collide; 09:00 and 11:00
        // touch the busy block without overlapping it.
        assert_eq!(response.busy_slots.len(), 3);
    }

    #[test]
    fn test_compute_offers_chronological() {
        let response = compute_offers(
            fixed_now(),
            TZ,
            &WorkHoursPolicy::default(),
            Duration::minutes(60),
            Duration::minutes(30),
            &BusyByDay::new(),
        );
        for pair in response.offers.windows(2) {
            assert!(parse(&pair[0].start) < parse(&pair[1].start));
        }
    }

    // --- DST ---

    #[test]
    fn test_local_at_spring_forward_gap() {
        // 02:30 on 2025-03-09 does not exist in Pacific time.
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        assert!(local_at(TZ, date, time).is_none());

        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(local_at(TZ, date, nine).is_some());
    }

    // --- Conflict probe ---

    #[test]
    fn test_conflict_probe_event_found() {
        let event = GraphEvent {
            id: Some("abc".to_string()),
            subject: Some("Existing".to_string()),
            online_meeting: None,
        };
        assert!(evaluate_conflict_probe(Ok(vec![event])));
    }

    #[test]
    fn test_conflict_probe_empty_view() {
        assert!(!evaluate_conflict_probe(Ok(Vec::new())));
    }

    #[test]
    fn test_conflict_probe_error_proceeds() {
        let err = GraphError::Api {
            status: 503,
            body: "throttled".to_string(),
        };
        assert!(!evaluate_conflict_probe(Err(err)));
    }
}
