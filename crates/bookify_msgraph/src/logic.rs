// --- File: crates/bookify_msgraph/src/logic.rs ---
use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::service::{GraphError, GraphEvent};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Fixed look-ahead over which availability is computed, in days.
pub const HORIZON_DAYS: i64 = 14;

/// Enumeration step between candidate slots, in minutes.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Hardcoded acceptance window applied on top of the configured work hours:
/// a slot must start at local hour >= 8 and end at local hour <= 17, on the
/// same local calendar day. Applied in addition to the policy, not instead
/// of it.
pub const ACCEPT_START_HOUR: u32 = 8;
pub const ACCEPT_END_HOUR: u32 = 17;

/// A busy period on the remote calendar, compared only by overlap.
pub type BusyInterval = (DateTime<Utc>, DateTime<Utc>);

/// Busy intervals grouped by the local calendar date their start falls on.
pub type BusyByDay = HashMap<NaiveDate, Vec<BusyInterval>>;

// --- Data Structures ---

/// Work-hours policy parsed once from configuration, interpreted in the
/// configured timezone. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkHoursPolicy {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkHoursPolicy {
    /// Parses a policy string such as `"Mon-Fri 09:00-17:00"`.
    ///
    /// The day range may wrap the week (`"Fri-Mon"`). Malformed input falls
    /// back to Mon-Fri 08:00-17:00.
    pub fn parse(input: &str) -> Self {
        match Self::try_parse(input) {
            Some(policy) => policy,
            None => {
                warn!("unparseable work hours {:?}, using default", input);
                Self::default()
            }
        }
    }

    fn try_parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let day_range = parts.next()?;
        let time_range = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let (first_day, last_day) = day_range.split_once('-')?;
        let first = parse_weekday(first_day)?;
        let last = parse_weekday(last_day)?;

        let mut days = Vec::new();
        let mut day = first;
        loop {
            days.push(day);
            if day == last {
                break;
            }
            day = day.succ();
            // A full lap means the range never closed.
            if day == first {
                return None;
            }
        }

        let (start_str, end_str) = time_range.split_once('-')?;
        let start = NaiveTime::parse_from_str(start_str, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end_str, "%H:%M").ok()?;
        if end <= start {
            return None;
        }

        Some(WorkHoursPolicy { days, start, end })
    }

    pub fn includes(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }
}

impl Default for WorkHoursPolicy {
    fn default() -> Self {
        WorkHoursPolicy {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// A candidate bookable time range, tagged available or busy.
/// Derived per request, never persisted.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotOffer {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T17:00:00Z"))]
    pub start: String, // RFC3339, UTC
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T18:00:00Z"))]
    pub end: String, // RFC3339, UTC
    #[cfg_attr(feature = "openapi", schema(example = "America/Los_Angeles"))]
    pub tz: String,
    pub available: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FreeBusyResponse {
    pub offers: Vec<SlotOffer>,
    #[serde(rename = "busySlots")]
    pub busy_slots: Vec<SlotOffer>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    #[serde(rename = "startIso")]
    pub start_iso: String,
    #[serde(rename = "endIso")]
    pub end_iso: String,
    pub subject: Option<String>,
    #[serde(rename = "attendeeEmail")]
    pub attendee_email: Option<String>,
    #[serde(rename = "attendeeName")]
    pub attendee_name: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub ok: bool,
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
    #[serde(rename = "joinUrl")]
    pub join_url: Option<String>,
}

// --- Time helpers ---

/// Resolves a wall-clock time on a local date to an absolute instant.
///
/// All local-hour arithmetic goes through here so DST transitions are
/// handled by the zone database rather than a fixed offset. A time skipped
/// by a spring-forward gap yields `None`; an ambiguous fall-back time
/// resolves to the earlier instant.
pub fn local_at(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// The hardcoded 08:00-17:00 same-local-day acceptance window.
pub fn within_booking_window(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> bool {
    let s = start.with_timezone(&tz);
    let e = end.with_timezone(&tz);
    s.date_naive() == e.date_naive()
        && s.hour() >= ACCEPT_START_HOUR
        && e.hour() <= ACCEPT_END_HOUR
        && e > s
}

/// Groups busy intervals by the local calendar date of their start.
pub fn group_busy_by_day(busy: &[BusyInterval], tz: Tz) -> BusyByDay {
    let mut by_day: BusyByDay = HashMap::new();
    for &(start, end) in busy {
        let day = start.with_timezone(&tz).date_naive();
        by_day.entry(day).or_default().push((start, end));
    }
    by_day
}

// --- Availability Window Builder ---

/// Enumerates every candidate slot over the 14-day look-ahead and classifies
/// it against the (possibly synthetically topped-up) busy intervals.
///
/// The window always begins tomorrow in the configured timezone, never
/// same-day. Output is chronological per construction, partitioned into
/// available offers and busy slots.
pub fn compute_offers(
    now: DateTime<Utc>,
    tz: Tz,
    policy: &WorkHoursPolicy,
    slot_length: Duration,
    buffer: Duration,
    busy_by_day: &BusyByDay,
) -> FreeBusyResponse {
    let today = now.with_timezone(&tz).date_naive();

    let mut offers = Vec::new();
    let mut busy_slots = Vec::new();

    for offset in 1..=HORIZON_DAYS {
        let date = today + Duration::days(offset);
        if !policy.includes(date.weekday()) {
            continue;
        }
        let (Some(day_start), Some(day_end)) = (
            local_at(tz, date, policy.start),
            local_at(tz, date, policy.end),
        ) else {
            // Work-hour boundary fell into a DST gap; skip the day rather
            // than guess at an offset.
            warn!("work hours unresolvable on {} in {}", date, tz);
            continue;
        };
        let day_end = day_end.with_timezone(&Utc);
        let empty = Vec::new();
        let day_busy = busy_by_day.get(&date).unwrap_or(&empty);

        let mut cursor = day_start.with_timezone(&Utc);
        while cursor + slot_length <= day_end {
            let slot_end = cursor + slot_length;
            if within_booking_window(cursor, slot_end, tz) {
                let padded_start = cursor - buffer;
                let padded_end = slot_end + buffer;
                let overlaps = day_busy
                    .iter()
                    .any(|&(busy_start, busy_end)| padded_start < busy_end && padded_end > busy_start);

                let slot = SlotOffer {
                    start: cursor.to_rfc3339_opts(SecondsFormat::Secs, true),
                    end: slot_end.to_rfc3339_opts(SecondsFormat::Secs, true),
                    tz: tz.name().to_string(),
                    available: !overlaps,
                };
                if overlaps {
                    busy_slots.push(slot);
                } else {
                    offers.push(slot);
                }
            }
            cursor += Duration::minutes(SLOT_STEP_MINUTES);
        }
    }

    FreeBusyResponse { offers, busy_slots }
}

// --- Booking guard ---

/// Evaluates the pre-booking conflict probe.
///
/// Returns `true` when an overlapping event was found. A *failed* probe is
/// treated as no conflict: completing a booking is preferred over strict
/// consistency, so a network or remote error degrades to assume-available.
pub fn evaluate_conflict_probe(view: Result<Vec<GraphEvent>, GraphError>) -> bool {
    match view {
        Ok(events) => !events.is_empty(),
        Err(err) => {
            warn!("conflict check failed, proceeding to create event: {}", err);
            false
        }
    }
}
