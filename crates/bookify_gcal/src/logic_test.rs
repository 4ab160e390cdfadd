#[cfg(test)]
mod tests {
    use crate::logic::{
        compute_google_offers, freebusy_window, parse_local_date_time, MeetingRequest,
        DEFAULT_DURATION_MIN,
    };
    use bookify_common::BookifyError;
    use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
    use chrono_tz::Tz;

    const TZ: Tz = Tz::America__Los_Angeles;

    fn parse(datetime_str: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(datetime_str)
            .expect("Failed to parse RFC3339 datetime")
            .with_timezone(&Utc)
    }

    // --- Request validation ---

    #[test]
    fn test_validate_with_start_iso() {
        let request = MeetingRequest {
            full_name: Some("Jamie Prospect".to_string()),
            email: Some("jamie@example.com".to_string()),
            start_iso: Some("2025-05-15T10:00:00-07:00".to_string()),
            ..Default::default()
        };
        let meeting = request.validate(TZ).unwrap();
        assert_eq!(meeting.start, parse("2025-05-15T10:00:00-07:00"));
        assert_eq!(
            meeting.end - meeting.start,
            Duration::minutes(DEFAULT_DURATION_MIN)
        );
        assert_eq!(meeting.reason, "Demo consultation");
    }

    #[test]
    fn test_tool_validate_with_date_time_pair() {
        let request = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            date: Some("2025-05-15".to_string()),
            time: Some("14:00".to_string()),
            duration_min: Some(45),
            ..Default::default()
        };
        let meeting = request.validate_for_tool(TZ).unwrap();
        // 14:00 Pacific is 21:00 UTC in May.
        assert_eq!(meeting.start, parse("2025-05-15T21:00:00Z"));
        assert_eq!(meeting.end - meeting.start, Duration::minutes(45));
    }

    #[test]
    fn test_tool_validate_twelve_hour_time() {
        let request = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            date: Some("2025-05-15".to_string()),
            time: Some("2:00 PM".to_string()),
            ..Default::default()
        };
        let meeting = request.validate_for_tool(TZ).unwrap();
        assert_eq!(meeting.start, parse("2025-05-15T21:00:00Z"));
    }

    #[test]
    fn test_tool_validate_unparseable_pair_falls_back_to_iso() {
        let request = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            date: Some("May 15, 2025".to_string()),
            time: Some("afternoon".to_string()),
            start_iso: Some("2025-05-15T10:00:00-07:00".to_string()),
            ..Default::default()
        };
        let meeting = request.validate_for_tool(TZ).unwrap();
        assert_eq!(meeting.start, parse("2025-05-15T10:00:00-07:00"));
    }

    #[test]
    fn test_date_time_pair_only_honored_by_tool_validation() {
        // The public booking endpoints take start_iso only; the pair is a
        // tool-endpoint affordance.
        let request = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            date: Some("2025-05-15".to_string()),
            time: Some("14:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(TZ),
            Err(BookifyError::ValidationError(_))
        ));
        assert!(request.validate_for_tool(TZ).is_ok());
    }

    #[test]
    fn test_validate_ignores_pair_when_iso_present() {
        let request = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            date: Some("2025-05-16".to_string()),
            time: Some("09:00".to_string()),
            start_iso: Some("2025-05-15T10:00:00-07:00".to_string()),
            ..Default::default()
        };
        let meeting = request.validate(TZ).unwrap();
        assert_eq!(meeting.start, parse("2025-05-15T10:00:00-07:00"));
    }

    #[test]
    fn test_validate_missing_fields() {
        let missing_name = MeetingRequest {
            email: Some("jamie@example.com".to_string()),
            start_iso: Some("2025-05-15T10:00:00-07:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing_name.validate(TZ),
            Err(BookifyError::ValidationError(_))
        ));

        let missing_start = MeetingRequest {
            full_name: Some("Jamie".to_string()),
            email: Some("jamie@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing_start.validate(TZ),
            Err(BookifyError::ValidationError(_))
        ));
    }

    #[test]
    fn test_name_alias() {
        let json = r#"{"name":"Jamie","email":"jamie@example.com","start_iso":"2025-05-15T10:00:00-07:00"}"#;
        let request: MeetingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.full_name.as_deref(), Some("Jamie"));
    }

    // --- Date/time parsing ---

    #[test]
    fn test_parse_local_date_time_formats() {
        let expected = parse("2025-05-15T21:00:00Z");
        assert_eq!(parse_local_date_time("2025-05-15", "14:00", TZ), Some(expected));
        assert_eq!(
            parse_local_date_time("2025-05-15", "2:00 pm", TZ),
            Some(expected)
        );
        assert_eq!(parse_local_date_time("2025-05-15", "later", TZ), None);
        assert_eq!(parse_local_date_time("tomorrow", "14:00", TZ), None);
    }

    // --- Offer enumeration ---

    /// Tuesday noon Pacific.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 19, 0, 0).unwrap()
    }

    #[test]
    fn test_freebusy_window_covers_every_enumerated_slot() {
        let (window_start, window_end) = freebusy_window(fixed_now(), TZ).unwrap();

        // Local midnight tomorrow through the end of local day 14.
        assert_eq!(window_start, parse("2025-05-07T00:00:00-07:00"));
        assert_eq!(window_end, parse("2025-05-20T23:59:59-07:00"));

        let offers = compute_google_offers(fixed_now(), TZ, Duration::minutes(60), &[]);
        for offer in &offers {
            assert!(parse(&offer.start) >= window_start);
            assert!(parse(&offer.end) <= window_end);
        }
    }

    #[test]
    fn test_offers_hourly_on_business_days() {
        let offers = compute_google_offers(fixed_now(), TZ, Duration::minutes(30), &[]);

        // 10 business days in the window, 9 hourly starts per day.
        assert_eq!(offers.len(), 10 * 9);
        for offer in &offers {
            assert!(offer.available);
            let start = parse(&offer.start).with_timezone(&TZ);
            assert_eq!(start.minute(), 0);
            assert!((8..17).contains(&start.hour()));
        }
    }

    #[test]
    fn test_offers_drop_busy_overlaps() {
        // Busy 10:00-11:00 Pacific on Wed May 7: removes only the 10:00 start
        // for 30-minute slots.
        let busy = vec![(
            parse("2025-05-07T10:00:00-07:00"),
            parse("2025-05-07T11:00:00-07:00"),
        )];
        let offers = compute_google_offers(fixed_now(), TZ, Duration::minutes(30), &busy);

        assert_eq!(offers.len(), 10 * 9 - 1);
        assert!(!offers
            .iter()
            .any(|offer| offer.start == parse("2025-05-07T10:00:00-07:00").to_rfc3339()));
    }

    #[test]
    fn test_busy_candidates_are_dropped_not_flagged() {
        let busy = vec![(
            parse("2025-05-07T08:00:00-07:00"),
            parse("2025-05-07T17:00:00-07:00"),
        )];
        let offers = compute_google_offers(fixed_now(), TZ, Duration::minutes(30), &busy);

        let wednesday = "2025-05-07";
        assert!(offers.iter().all(|offer| {
            !parse(&offer.start)
                .with_timezone(&TZ)
                .date_naive()
                .to_string()
                .starts_with(wednesday)
        }));
    }
}
