// --- File: crates/bookify_gcal/src/logic.rs ---
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use bookify_common::{validation_error, BookifyError};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Look-ahead matching the Microsoft path, in days.
pub const HORIZON_DAYS: i64 = 14;

/// Fallback meeting length when the request carries none, in minutes.
pub const DEFAULT_DURATION_MIN: i64 = 30;

// --- Data Structures ---

/// One bookable slot on the Google path. This enumeration is deliberately
/// coarser than the Microsoft one: hourly starts only, no synthetic
/// injection, and only available slots are offered.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GoogleSlotOffer {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T15:00:00+00:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T15:30:00+00:00"))]
    pub end: String,
    #[cfg_attr(feature = "openapi", schema(example = "America/Los_Angeles"))]
    pub tz: String,
    pub available: bool,
}

/// Raw busy period echoed back to the caller alongside the offers.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BusyPeriod {
    pub start: String,
    pub end: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GoogleFreeBusyResponse {
    pub offers: Vec<GoogleSlotOffer>,
    #[serde(rename = "busySlots")]
    pub busy_slots: Vec<BusyPeriod>,
}

/// Booking request accepted by `/google/book`, `/api/book` and the
/// voice-agent tool endpoint. The tool sends `name` instead of `full_name`
/// and may send a separate `{date, time}` pair instead of `start_iso`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MeetingRequest {
    #[serde(alias = "name")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub start_iso: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_min: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MeetingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_url: Option<String>,
    pub meeting_link: String,
    pub calendar_link: String,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub message: String,
    pub attendee_email: String,
    pub attendee_name: String,
}

/// Validated form of a [`MeetingRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMeeting {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub reason: String,
    pub notes: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MeetingRequest {
    /// Validates required fields and resolves the requested start time from
    /// `start_iso` only. Used by the public booking endpoints.
    pub fn validate(&self, tz: Tz) -> Result<ValidatedMeeting, BookifyError> {
        self.validate_inner(tz, false)
    }

    /// Tool-endpoint variant that additionally accepts a `{date, time}`
    /// pair: the pair wins when present and parseable, interpreted as
    /// wall-clock time in the booking timezone (both 24-hour and `2:00 PM`
    /// styles), with `start_iso` as the fallback.
    pub fn validate_for_tool(&self, tz: Tz) -> Result<ValidatedMeeting, BookifyError> {
        self.validate_inner(tz, true)
    }

    fn validate_inner(&self, tz: Tz, allow_date_time_pair: bool) -> Result<ValidatedMeeting, BookifyError> {
        let full_name = self
            .full_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| validation_error("full_name is required"))?
            .trim()
            .to_string();
        let email = self
            .email
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| validation_error("email is required"))?
            .trim()
            .to_string();

        let start = self
            .resolve_start(tz, allow_date_time_pair)
            .ok_or_else(|| {
                if allow_date_time_pair {
                    validation_error("date/time or start_iso is required")
                } else {
                    validation_error("start_iso is required")
                }
            })?;
        let duration = Duration::minutes(self.duration_min.unwrap_or(DEFAULT_DURATION_MIN).max(1));

        Ok(ValidatedMeeting {
            full_name,
            email,
            phone: self.phone.clone(),
            reason: self
                .reason
                .clone()
                .unwrap_or_else(|| "Demo consultation".to_string()),
            notes: self.notes.clone().unwrap_or_default(),
            end: start + duration,
            start,
        })
    }

    fn resolve_start(&self, tz: Tz, allow_date_time_pair: bool) -> Option<DateTime<Utc>> {
        if allow_date_time_pair {
            if let (Some(date), Some(time)) = (self.date.as_deref(), self.time.as_deref()) {
                if let Some(start) = parse_local_date_time(date, time, tz) {
                    return Some(start);
                }
                // Fall through to start_iso when the pair is unparseable.
            }
        }
        let iso = self.start_iso.as_deref()?;
        DateTime::parse_from_rfc3339(iso)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Parses a `{date, time}` pair such as `("2025-05-15", "14:00")` or
/// `("2025-05-15", "2:00 PM")` as wall-clock time in the booking timezone.
pub fn parse_local_date_time(date: &str, time: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = parse_time(time.trim())?;
    NaiveDateTime::new(date, time)
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(&time.to_uppercase(), "%I:%M %p"))
        .ok()
}

// --- Availability ---

/// The busy-query window matching the slot enumeration: local midnight
/// tomorrow through the end of local day 14, so every enumerated slot has
/// its busy data fetched. `None` when a boundary is unresolvable in the
/// zone.
pub fn freebusy_window(now: DateTime<Utc>, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.with_timezone(&tz).date_naive();
    let start = (today + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .earliest()?;
    let end = (today + Duration::days(HORIZON_DAYS))
        .and_time(NaiveTime::from_hms_opt(23, 59, 59)?)
        .and_local_timezone(tz)
        .earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Enumerates hourly slots over the next two weeks of business days and
/// keeps those that clear the busy periods. Simpler than the Microsoft
/// enumeration on purpose: on-the-hour starts, no buffer padding, busy
/// candidates dropped instead of classified.
pub fn compute_google_offers(
    now: DateTime<Utc>,
    tz: Tz,
    slot_length: Duration,
    busy_periods: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<GoogleSlotOffer> {
    const WORK_START_HOUR: u32 = 8;
    const WORK_END_HOUR: u32 = 17;
    const WORK_DAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    let today = now.with_timezone(&tz).date_naive();
    let mut offers = Vec::new();

    for offset in 1..=HORIZON_DAYS {
        let date = today + Duration::days(offset);
        if !WORK_DAYS.contains(&date.weekday()) {
            continue;
        }
        for hour in WORK_START_HOUR..WORK_END_HOUR {
            let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                continue;
            };
            let Some(local_start) = date.and_time(time).and_local_timezone(tz).earliest() else {
                continue;
            };
            let start = local_start.with_timezone(&Utc);
            let end = start + slot_length;

            let is_busy = busy_periods
                .iter()
                .any(|&(busy_start, busy_end)| start < busy_end && end > busy_start);
            if !is_busy {
                offers.push(GoogleSlotOffer {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                    tz: tz.name().to_string(),
                    available: true,
                });
            }
        }
    }

    offers
}
