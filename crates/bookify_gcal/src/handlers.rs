// --- File: crates/bookify_gcal/src/handlers.rs ---
use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use constant_time_eq::constant_time_eq;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use bookify_common::services::{CalendarEvent, CalendarService, NotificationService};
use bookify_common::{auth_required, config_error, remote_service_error, BookifyError};
use bookify_config::AppConfig;

use crate::logic::{
    compute_google_offers, freebusy_window, BusyPeriod, GoogleFreeBusyResponse, MeetingRequest,
    MeetingResponse, ValidatedMeeting,
};
use crate::service::GoogleCalendarService;

/// Shared state for the Google booking handlers.
pub struct GcalState<N: NotificationService> {
    pub config: Arc<AppConfig>,
    pub service: Arc<GoogleCalendarService>,
    pub notifier: Arc<N>,
}

// Manual impl: N itself need not be Clone behind the Arc.
impl<N: NotificationService> Clone for GcalState<N> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            service: self.service.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

fn booking_tz(config: &AppConfig) -> Tz {
    Tz::from_str(&config.booking.time_zone).unwrap_or(Tz::America__Los_Angeles)
}

fn base_subject(config: &AppConfig) -> String {
    config
        .booking
        .default_subject
        .clone()
        .unwrap_or_else(|| "Bookify Demo".to_string())
}

fn calendar_id(config: &AppConfig) -> Result<String, BookifyError> {
    config
        .gcal
        .as_ref()
        .and_then(|gcal| gcal.calendar_id.clone())
        .ok_or_else(|| config_error("Google Calendar is not configured"))
}

// --- Availability ---

/// Handler for GET /google/freebusy. Public, no auth.
pub async fn google_freebusy_handler<N: NotificationService + 'static>(
    State(state): State<Arc<GcalState<N>>>,
) -> Result<Json<GoogleFreeBusyResponse>, BookifyError> {
    let calendar_id = calendar_id(&state.config)?;
    let tz = booking_tz(&state.config);
    let now = Utc::now();
    let (window_start, window_end) = freebusy_window(now, tz)
        .ok_or_else(|| config_error("availability window unresolvable in configured timezone"))?;

    let busy = state
        .service
        .get_busy_times(&calendar_id, window_start, window_end)
        .await
        .map_err(|e| remote_service_error("gcal", e))?;

    let offers = compute_google_offers(
        now,
        tz,
        Duration::minutes(state.config.booking.slot_length_minutes),
        &busy,
    );
    let busy_slots = busy
        .iter()
        .map(|&(start, end)| BusyPeriod {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        })
        .collect();

    Ok(Json(GoogleFreeBusyResponse { offers, busy_slots }))
}

// --- Booking ---

fn demo_subject(config: &AppConfig, full_name: &str) -> String {
    format!("{} - {}", base_subject(config), full_name)
}

fn consultation_description(meeting: &ValidatedMeeting) -> String {
    format!(
        "Demo consultation with {}\nReason: {}\nPhone: {}\nNotes: {}",
        meeting.full_name,
        meeting.reason,
        meeting.phone.as_deref().unwrap_or("Not provided"),
        if meeting.notes.is_empty() {
            "None"
        } else {
            &meeting.notes
        },
    )
}

/// Description for the attendee-less path, where the invite has to be sent
/// manually.
fn manual_invite_description(meeting: &ValidatedMeeting) -> String {
    format!(
        "Demo consultation with {}\nEmail: {}\nPhone: {}\nReason: {}\nNotes: {}\n\nPlease manually send calendar invite to: {}",
        meeting.full_name,
        meeting.email,
        meeting.phone.as_deref().unwrap_or("Not provided"),
        meeting.reason,
        if meeting.notes.is_empty() {
            "None"
        } else {
            &meeting.notes
        },
        meeting.email,
    )
}

fn booking_message(meeting: &ValidatedMeeting, tz: Tz, has_link: bool) -> String {
    let local = meeting.start.with_timezone(&tz);
    format!(
        "Meeting booked successfully for {} at {}. {}",
        meeting.full_name,
        local.format("%B %e, %Y, %l:%M %p"),
        if has_link {
            "A meeting link has been provided."
        } else {
            "You will receive a confirmation email shortly."
        }
    )
}

fn meeting_response(
    meeting: &ValidatedMeeting,
    subject: String,
    message: String,
    meeting_link: String,
    calendar_link: String,
    include_join_url: bool,
) -> MeetingResponse {
    MeetingResponse {
        success: true,
        join_url: include_join_url.then(|| meeting_link.clone()),
        meeting_link,
        calendar_link,
        start_time: meeting.start.to_rfc3339(),
        end_time: meeting.end.to_rfc3339(),
        subject,
        message,
        attendee_email: meeting.email.clone(),
        attendee_name: meeting.full_name.clone(),
    }
}

fn queue_confirmation<N: NotificationService + 'static>(
    state: &Arc<GcalState<N>>,
    meeting: &ValidatedMeeting,
    subject: &str,
    meeting_link: &str,
) {
    let notifier = state.notifier.clone();
    let to = meeting.email.clone();
    let subject = format!("Confirmation - {}", subject);
    let body = format!(
        "Your consultation is confirmed for {} - {}.\n{}",
        meeting.start.to_rfc3339(),
        meeting.end.to_rfc3339(),
        if meeting_link.is_empty() {
            String::new()
        } else {
            format!("Join: {}", meeting_link)
        }
    );
    tokio::spawn(async move {
        if let Err(e) = notifier.send_email(&to, &subject, &body).await {
            warn!("confirmation notification failed: {}", e);
        }
    });
}

/// Handler for POST /api/book: full event with attendee and Meet link.
///
/// Calendar failure degrades to a successful response without links; the
/// confirmation flow still runs so the prospect is contacted either way.
pub async fn api_book_handler<N: NotificationService + 'static>(
    State(state): State<Arc<GcalState<N>>>,
    Json(payload): Json<MeetingRequest>,
) -> Result<Json<MeetingResponse>, BookifyError> {
    let tz = booking_tz(&state.config);
    let meeting = payload.validate(tz)?;
    book_demo_meeting(&state, meeting).await
}

/// The shared /api/book flow, after request validation.
async fn book_demo_meeting<N: NotificationService + 'static>(
    state: &Arc<GcalState<N>>,
    meeting: ValidatedMeeting,
) -> Result<Json<MeetingResponse>, BookifyError> {
    let tz = booking_tz(&state.config);
    let calendar_id = calendar_id(&state.config)?;
    let subject = demo_subject(&state.config, &meeting.full_name);

    let event = CalendarEvent {
        start_time: meeting.start.to_rfc3339(),
        end_time: meeting.end.to_rfc3339(),
        summary: subject.clone(),
        description: Some(consultation_description(&meeting)),
        attendee_email: Some(meeting.email.clone()),
        attendee_name: Some(meeting.full_name.clone()),
        with_conference: true,
    };

    let (meeting_link, calendar_link) = match state.service.create_event(&calendar_id, event).await
    {
        Ok(result) => {
            info!("Google Calendar event created: {:?}", result.event_id);
            (
                result.join_url.unwrap_or_default(),
                result.html_link.unwrap_or_default(),
            )
        }
        Err(e) => {
            error!("failed to create Google Calendar event: {}", e);
            (String::new(), String::new())
        }
    };

    queue_confirmation(state, &meeting, &subject, &meeting_link);

    let message = booking_message(&meeting, tz, !meeting_link.is_empty());
    Ok(Json(meeting_response(
        &meeting,
        subject,
        message,
        meeting_link,
        calendar_link,
        false,
    )))
}

/// Handler for POST /google/book: attendee-less event, no conference data.
///
/// Service accounts without domain-wide delegation cannot invite attendees,
/// so this variant records the prospect in the description instead and
/// fails hard when the calendar write fails.
pub async fn google_book_handler<N: NotificationService + 'static>(
    State(state): State<Arc<GcalState<N>>>,
    Json(payload): Json<MeetingRequest>,
) -> Result<Json<MeetingResponse>, BookifyError> {
    let tz = booking_tz(&state.config);
    let meeting = payload.validate(tz)?;
    let calendar_id = calendar_id(&state.config)?;
    let subject = demo_subject(&state.config, &meeting.full_name);

    let event = CalendarEvent {
        start_time: meeting.start.to_rfc3339(),
        end_time: meeting.end.to_rfc3339(),
        summary: subject.clone(),
        description: Some(manual_invite_description(&meeting)),
        attendee_email: None,
        attendee_name: None,
        with_conference: false,
    };

    let result = state
        .service
        .create_event(&calendar_id, event)
        .await
        .map_err(|e| remote_service_error("gcal", e))?;
    info!(
        "Google Calendar event created via /google/book: {:?}",
        result.event_id
    );

    let calendar_link = result.html_link.unwrap_or_default();
    let message = format!("Meeting booked successfully for {}", meeting.full_name);
    Ok(Json(meeting_response(
        &meeting,
        subject,
        message,
        String::new(),
        calendar_link,
        true,
    )))
}

// --- Voice-agent tool endpoint ---

/// Verifies the static bearer token carried by the voice-agent tool.
pub fn require_tool_token(config: &AppConfig, headers: &HeaderMap) -> Result<(), BookifyError> {
    let expected = config
        .tools
        .as_ref()
        .and_then(|tools| tools.bearer_token.as_deref())
        .ok_or_else(|| config_error("tool bearer token not configured"))?;

    let provided = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| auth_required("Invalid or missing tool token"))?;

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(auth_required("Invalid or missing tool token"))
    }
}

/// Handler for POST /api/tools/create_meeting, the bearer-gated variant of
/// /api/book used by the voice agent. Alone among the booking endpoints it
/// accepts `{date, time}` in place of `start_iso`.
pub async fn create_meeting_handler<N: NotificationService + 'static>(
    State(state): State<Arc<GcalState<N>>>,
    headers: HeaderMap,
    Json(payload): Json<MeetingRequest>,
) -> Result<Json<MeetingResponse>, BookifyError> {
    require_tool_token(&state.config, &headers)?;
    let meeting = payload.validate_for_tool(booking_tz(&state.config))?;
    book_demo_meeting(&state, meeting).await
}
