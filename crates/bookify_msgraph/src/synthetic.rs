// --- File: crates/bookify_msgraph/src/synthetic.rs ---
//! Synthetic busy injection.
//!
//! The first three business days of the look-ahead are topped up with
//! randomly placed one-hour busy blocks so early days always look partially
//! booked. Placement is randomized; which days and how many blocks is fixed
//! policy. Every generated block is also mirrored to the remote calendar by
//! the freebusy handler so the calendar's visible state matches what the
//! user was shown.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use rand::Rng;

use crate::logic::{local_at, BusyByDay, WorkHoursPolicy, HORIZON_DAYS};

/// Subject of mirrored synthetic events on the remote calendar.
pub const SYNTHETIC_SUBJECT: &str = "Busy - Internal";

/// One-hour busy blocks required per business-day offset from today.
/// Offsets past the third business day are left untouched.
pub fn required_busy_hours(day_offset: i64) -> usize {
    match day_offset {
        1 => 4,
        2 => 3,
        3 => 2,
        _ => 0,
    }
}

/// A generated one-hour busy block, queued for best-effort mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub date: NaiveDate,
}

/// Tops up `busy_by_day` so each of the next three business days carries at
/// least its required number of busy hours, counting each existing interval
/// as one hour-equivalent. Offsets are counted over business days only, so
/// a weekend between today and the third qualifying day shifts the whole
/// ladder forward rather than dropping its quota. Days already at or above
/// their requirement are left as-is. Returns the newly generated intervals
/// in generation order.
///
/// Placement samples without replacement from the pool of 1-hour slots
/// stepped 30 minutes across the work-hour window, so duplicate starts are
/// impossible by construction. The random source is injected for
/// deterministic tests.
pub fn inject_synthetic_busy<R: Rng>(
    busy_by_day: &mut BusyByDay,
    today: NaiveDate,
    tz: Tz,
    policy: &WorkHoursPolicy,
    rng: &mut R,
) -> Vec<SyntheticSlot> {
    let mut added = Vec::new();

    let mut business_offset = 0;
    for calendar_offset in 1..=HORIZON_DAYS {
        if business_offset >= 3 {
            break;
        }
        let date = today + Duration::days(calendar_offset);
        if !policy.includes(date.weekday()) {
            continue;
        }
        business_offset += 1;

        let existing = busy_by_day.get(&date).map_or(0, Vec::len);
        let required = required_busy_hours(business_offset);
        if existing >= required {
            continue;
        }

        let mut pool = candidate_starts(date, tz, policy);
        for _ in existing..required {
            if pool.is_empty() {
                break;
            }
            let index = rng.gen_range(0..pool.len());
            let start = pool.remove(index);
            let end = start + Duration::hours(1);
            busy_by_day.entry(date).or_default().push((start, end));
            added.push(SyntheticSlot { start, end, date });
        }
    }

    added
}

/// All possible 1-hour block starts within the day's work hours, stepped 30
/// minutes.
fn candidate_starts(date: NaiveDate, tz: Tz, policy: &WorkHoursPolicy) -> Vec<DateTime<Utc>> {
    let (Some(day_start), Some(day_end)) = (
        local_at(tz, date, policy.start),
        local_at(tz, date, policy.end),
    ) else {
        return Vec::new();
    };
    let day_end = day_end.with_timezone(&Utc);

    let mut starts = Vec::new();
    let mut cursor = day_start.with_timezone(&Utc);
    while cursor + Duration::hours(1) <= day_end {
        starts.push(cursor);
        cursor += Duration::minutes(30);
    }
    starts
}
