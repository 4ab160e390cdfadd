// --- File: crates/bookify_msgraph/src/handlers.rs ---
use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use chrono::{Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use bookify_common::{
    config_error, conflict, remote_service_error, validation_error, BookifyError,
};
use bookify_config::AppConfig;

use crate::auth::{authorize_url, exchange_code, TokenStore};
use crate::logic::{
    compute_offers, evaluate_conflict_probe, group_busy_by_day, local_at, BookSlotRequest,
    BookingResponse, FreeBusyResponse, WorkHoursPolicy, HORIZON_DAYS,
};
use crate::service::{GraphAttendee, GraphClient, GraphEmailAddress, NewGraphEvent};
use crate::synthetic::{inject_synthetic_busy, SyntheticSlot, SYNTHETIC_SUBJECT};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Subject used when a booking request carries none and configuration sets
/// no override.
pub const DEFAULT_BOOKING_SUBJECT: &str = "Bookify Demo";

// Shared state for the Microsoft Graph handlers.
#[derive(Clone)]
pub struct MsState {
    pub config: Arc<AppConfig>,
    pub token_store: Arc<TokenStore>,
    pub graph: GraphClient,
}

fn booking_tz(config: &AppConfig) -> Tz {
    Tz::from_str(&config.booking.time_zone).unwrap_or(Tz::America__Los_Angeles)
}

fn booking_subject(config: &AppConfig) -> String {
    config
        .booking
        .default_subject
        .clone()
        .unwrap_or_else(|| DEFAULT_BOOKING_SUBJECT.to_string())
}

// --- OAuth ---

/// Redirects the browser to the Microsoft identity consent page.
pub async fn oauth_start_handler(
    State(state): State<Arc<MsState>>,
) -> Result<Redirect, BookifyError> {
    let ms_config = state
        .config
        .msgraph
        .as_ref()
        .ok_or_else(|| config_error("Microsoft Graph is not configured"))?;
    let url = authorize_url(ms_config);
    info!("redirecting to Microsoft consent");
    Ok(Redirect::temporary(&url))
}

#[derive(Deserialize, Debug)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
}

/// Exchanges the authorization code and stores the token in memory.
pub async fn oauth_callback_handler(
    State(state): State<Arc<MsState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<String, BookifyError> {
    let ms_config = state
        .config
        .msgraph
        .as_ref()
        .ok_or_else(|| config_error("Microsoft Graph is not configured"))?;
    let code = query
        .code
        .ok_or_else(|| validation_error("missing authorization code"))?;

    let token = exchange_code(ms_config, &code)
        .await
        .map_err(|e| remote_service_error("msgraph", format!("token exchange failed: {e}")))?;
    state
        .token_store
        .store(token.access_token, token.expires_in, Utc::now());

    Ok("Microsoft authorization complete. You can close this tab.".to_string())
}

// --- Availability ---

/// Handler for GET /ms/freebusy.
///
/// Fetches real busy intervals, tops them up with synthetic ones for the
/// first three business days, mirrors the synthetic blocks to the calendar
/// best-effort, then enumerates and classifies every candidate slot.
#[axum::debug_handler]
pub async fn freebusy_handler(
    State(state): State<Arc<MsState>>,
) -> Result<Json<FreeBusyResponse>, BookifyError> {
    let token = state.token_store.access_token(Utc::now())?;
    let booking = &state.config.booking;
    let tz = booking_tz(&state.config);
    let policy = WorkHoursPolicy::parse(&booking.work_hours);

    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();

    // Query window: tomorrow 00:00 through today+14 end-of-day, local time.
    let window_start = local_at(tz, today + Duration::days(1), NaiveTime::MIN)
        .ok_or_else(|| config_error("window start unresolvable in configured timezone"))?;
    let window_end = local_at(
        tz,
        today + Duration::days(HORIZON_DAYS),
        NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    )
    .ok_or_else(|| config_error("window end unresolvable in configured timezone"))?;

    let busy = state
        .graph
        .get_schedule(
            &token,
            &booking.booking_email,
            window_start.with_timezone(&Utc),
            window_end.with_timezone(&Utc),
        )
        .await
        .map_err(|e| remote_service_error("msgraph", e))?;

    let mut busy_by_day = group_busy_by_day(&busy, tz);
    let added = inject_synthetic_busy(
        &mut busy_by_day,
        today,
        tz,
        &policy,
        &mut rand::thread_rng(),
    );
    if !added.is_empty() {
        info!("injecting {} synthetic busy blocks", added.len());
        mirror_synthetic_slots(&state, &token, &added).await;
    }

    let response = compute_offers(
        now,
        tz,
        &policy,
        Duration::minutes(booking.slot_length_minutes),
        Duration::minutes(booking.buffer_minutes),
        &busy_by_day,
    );
    Ok(Json(response))
}

/// Writes each generated block back to the calendar as a "Busy - Internal"
/// event so the remote state matches what the user was shown. Best-effort:
/// a failed write is logged and never fails the request.
async fn mirror_synthetic_slots(state: &MsState, token: &str, slots: &[SyntheticSlot]) {
    let tz_name = state.config.booking.time_zone.clone();
    for slot in slots {
        let event =
            NewGraphEvent::busy_block(SYNTHETIC_SUBJECT.to_string(), slot.start, slot.end, &tz_name);
        if let Err(e) = state.graph.create_event(token, &event).await {
            warn!("failed to mirror synthetic slot at {}: {}", slot.start, e);
        }
    }
}

// --- Booking ---

/// Handler for POST /ms/book.
#[axum::debug_handler]
pub async fn book_handler(
    State(state): State<Arc<MsState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, BookifyError> {
    let token = state.token_store.access_token(Utc::now())?;
    let tz_name = state.config.booking.time_zone.clone();

    let start = chrono::DateTime::parse_from_rfc3339(&payload.start_iso)
        .map_err(|_| validation_error("invalid startIso format"))?
        .with_timezone(&Utc);
    let end = chrono::DateTime::parse_from_rfc3339(&payload.end_iso)
        .map_err(|_| validation_error("invalid endIso format"))?
        .with_timezone(&Utc);
    if end <= start {
        return Err(validation_error("endIso must be after startIso"));
    }

    // Double-booking guard. A failed probe does not block the booking.
    let probe = state
        .graph
        .calendar_view(&token, &tz_name, &payload.start_iso, &payload.end_iso, 1)
        .await;
    if evaluate_conflict_probe(probe) {
        return Err(conflict("Selected time is no longer available."));
    }

    let subject = payload
        .subject
        .clone()
        .unwrap_or_else(|| booking_subject(&state.config));
    let attendee = payload.attendee_email.as_ref().map(|email| GraphAttendee {
        email_address: GraphEmailAddress {
            address: email.clone(),
            name: payload
                .attendee_name
                .clone()
                .unwrap_or_else(|| email.clone()),
        },
        attendee_type: "required".to_string(),
    });

    let event = NewGraphEvent::booking(
        subject,
        start,
        end,
        &tz_name,
        attendee,
        "Scheduled by Bookify.".to_string(),
    );
    let created = state
        .graph
        .create_event(&token, &event)
        .await
        .map_err(|e| remote_service_error("msgraph", e))?;

    let join_url = created
        .online_meeting
        .as_ref()
        .and_then(|meeting| meeting.join_url.clone());

    // Embed the join link in the event body. Best-effort; the booking
    // already succeeded.
    if let (Some(event_id), Some(url)) = (created.id.as_deref(), join_url.as_deref()) {
        let html = join_notice_html(url);
        if let Err(e) = state.graph.patch_event_body(&token, event_id, &html).await {
            warn!("failed to patch join link into event {}: {}", event_id, e);
        }
    }

    info!("booked event {:?}", created.id);
    Ok(Json(BookingResponse {
        ok: true,
        event_id: created.id,
        join_url,
    }))
}

fn join_notice_html(join_url: &str) -> String {
    format!(
        "<div style=\"font-family:Inter,Segoe UI,Arial,sans-serif;color:#0f172a\">\
           <h2 style=\"margin:0 0 12px\">Your meeting is confirmed</h2>\
           <p>Click the button below to join on Microsoft Teams.</p>\
           <p><a href=\"{join_url}\" style=\"display:inline-block;background:#1a73e8;\
color:#fff;padding:10px 16px;border-radius:8px;text-decoration:none\">Join Microsoft Teams</a></p>\
           <p style=\"margin-top:16px;font-size:12px;color:#475569\">\
If the button doesn't work, copy this link: {join_url}</p>\
         </div>"
    )
}

// --- Clearing helper (destructive) ---

#[derive(Deserialize, Debug, Default)]
pub struct ClearQuery {
    pub scope: Option<String>,
    pub subject: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClearResponse {
    pub ok: bool,
    pub total: usize,
    pub deleted: usize,
    pub failed: usize,
    pub scope: String,
    pub start_iso: String,
    pub end_iso: String,
    pub filtered_by: String,
}

/// Handler for POST /ms/clear. Deletes matching events in a date range.
///
/// Defaults to removing only events created by this app (synthetic blocks
/// and demo bookings); `scope=all` removes everything in the window.
#[axum::debug_handler]
pub async fn clear_handler(
    State(state): State<Arc<MsState>>,
    Query(query): Query<ClearQuery>,
) -> Result<Json<ClearResponse>, BookifyError> {
    let token = state.token_store.access_token(Utc::now())?;
    let tz_name = state.config.booking.time_zone.clone();

    let now = Utc::now();
    let scope = query.scope.unwrap_or_else(|| "ours".to_string());
    let subject_filter = query.subject.unwrap_or_default();
    let start_iso = query
        .start
        .unwrap_or_else(|| (now - Duration::days(30)).to_rfc3339());
    let end_iso = query
        .end
        .unwrap_or_else(|| (now + Duration::days(60)).to_rfc3339());

    let start = chrono::DateTime::parse_from_rfc3339(&start_iso)
        .map_err(|_| validation_error("invalid start range"))?
        .with_timezone(&Utc);
    let end = chrono::DateTime::parse_from_rfc3339(&end_iso)
        .map_err(|_| validation_error("invalid end range"))?
        .with_timezone(&Utc);
    if start >= end {
        return Err(validation_error("invalid start/end range"));
    }

    // Fetch in 30-day chunks; Graph rejects calendarView spans past that.
    let mut events = Vec::new();
    let mut window_start = start;
    while window_start < end {
        let window_end = (window_start + Duration::days(30)).min(end);
        let chunk = state
            .graph
            .calendar_view(
                &token,
                &tz_name,
                &window_start.to_rfc3339(),
                &window_end.to_rfc3339(),
                1000,
            )
            .await
            .map_err(|e| {
                remote_service_error(
                    "msgraph",
                    format!("fetch failed for window {window_start} - {window_end}: {e}"),
                )
            })?;
        events.extend(chunk);
        window_start = window_end + Duration::seconds(1);
    }

    let app_subjects = [
        SYNTHETIC_SUBJECT.to_lowercase(),
        booking_subject(&state.config).to_lowercase(),
    ];
    let to_delete: Vec<_> = events
        .iter()
        .filter(|event| {
            if scope == "all" {
                return true;
            }
            let subject = event.subject.as_deref().unwrap_or_default().to_lowercase();
            if !subject_filter.is_empty() {
                return subject.contains(&subject_filter.to_lowercase());
            }
            app_subjects.iter().any(|needle| subject.contains(needle))
        })
        .collect();

    let mut deleted = 0;
    let mut failed = 0;
    for event in &to_delete {
        let Some(event_id) = event.id.as_deref() else {
            failed += 1;
            continue;
        };
        match state.graph.delete_event(&token, event_id).await {
            Ok(()) => deleted += 1,
            Err(e) => {
                warn!("failed to delete event {}: {}", event_id, e);
                failed += 1;
            }
        }
    }

    Ok(Json(ClearResponse {
        ok: true,
        total: events.len(),
        deleted,
        failed,
        scope,
        start_iso,
        end_iso,
        filtered_by: if subject_filter.is_empty() {
            "default_app_subjects".to_string()
        } else {
            subject_filter
        },
    }))
}
