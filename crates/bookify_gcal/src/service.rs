// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Implements the shared [`CalendarService`] trait over a service-account
//! authenticated hub. Unlike the Microsoft path, event creation here does
//! not probe for conflicts first; the free/busy data shown to the prospect
//! is the only guard.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use bookify_common::services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};
use google_calendar3::api::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event, EventAttendee,
    EventDateTime, EventReminder, EventReminders, FreeBusyRequest, FreeBusyRequestItem,
};

use crate::auth::HubType;

/// Errors raised by the Google calendar path.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

/// Organizer identity attached to events that carry attendees.
#[derive(Debug, Clone)]
pub struct Organizer {
    pub email: String,
    pub display_name: String,
}

/// Google Calendar service over a shared hub.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    time_zone: String,
    organizer: Option<Organizer>,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>, time_zone: String) -> Self {
        Self {
            calendar_hub,
            time_zone,
            organizer: None,
        }
    }

    /// Sets the organizer copied onto events booked with attendees.
    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// 24h email reminder plus a 10 minute popup, overriding calendar
    /// defaults.
    fn reminder_overrides() -> EventReminders {
        EventReminders {
            use_default: Some(false),
            overrides: Some(vec![
                EventReminder {
                    method: Some("email".to_string()),
                    minutes: Some(24 * 60),
                },
                EventReminder {
                    method: Some("popup".to_string()),
                    minutes: Some(10),
                },
            ]),
        }
    }

    fn build_event(&self, details: &CalendarEvent) -> Result<Event, GcalServiceError> {
        let start_dt = DateTime::parse_from_rfc3339(&details.start_time)
            .map_err(|e| GcalServiceError::TimeParseError(format!("Invalid start_time: {}", e)))?
            .with_timezone(&Utc);
        let end_dt = DateTime::parse_from_rfc3339(&details.end_time)
            .map_err(|e| GcalServiceError::TimeParseError(format!("Invalid end_time: {}", e)))?
            .with_timezone(&Utc);
        if end_dt <= start_dt {
            return Err(GcalServiceError::InvalidEvent(
                "End time must be after start time".to_string(),
            ));
        }

        let mut attendees = Vec::new();
        if let Some(email) = &details.attendee_email {
            attendees.push(EventAttendee {
                email: Some(email.clone()),
                display_name: details.attendee_name.clone(),
                ..Default::default()
            });
            if let Some(organizer) = &self.organizer {
                attendees.push(EventAttendee {
                    email: Some(organizer.email.clone()),
                    display_name: Some(organizer.display_name.clone()),
                    ..Default::default()
                });
            }
        }

        let conference_data = details.with_conference.then(|| ConferenceData {
            create_request: Some(CreateConferenceRequest {
                request_id: Some(format!("bookify-{}", uuid::Uuid::new_v4())),
                conference_solution_key: Some(ConferenceSolutionKey {
                    type_: Some("hangoutsMeet".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        });

        Ok(Event {
            summary: Some(details.summary.clone()),
            description: details.description.clone(),
            start: Some(EventDateTime {
                date_time: Some(start_dt),
                time_zone: Some(self.time_zone.clone()),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(end_dt),
                time_zone: Some(self.time_zone.clone()),
                ..Default::default()
            }),
            attendees: (!attendees.is_empty()).then_some(attendees),
            conference_data,
            reminders: Some(Self::reminder_overrides()),
            ..Default::default()
        })
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Fetches busy intervals via the free/busy query, sorted by start.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let time_zone = self.time_zone.clone();

        Box::pin(async move {
            let request = FreeBusyRequest {
                time_min: Some(start_time),
                time_max: Some(end_time),
                time_zone: Some(time_zone),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_response, freebusy) = calendar_hub.freebusy().query(request).doit().await?;

            let mut busy_periods = Vec::new();
            if let Some(calendars) = freebusy.calendars {
                if let Some(info) = calendars.get(&calendar_id) {
                    for period in info.busy.iter().flatten() {
                        if let (Some(start), Some(end)) = (period.start, period.end) {
                            busy_periods.push((start, end));
                        } else {
                            debug!("skipping busy period with missing bounds: {:?}", period);
                        }
                    }
                }
            }
            busy_periods.sort_by_key(|&(start, _)| start);
            Ok(busy_periods)
        })
    }

    /// Inserts the event. No conflict probe happens on this path.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let built = self.build_event(&event);
        let wants_conference = event.with_conference;

        Box::pin(async move {
            let new_event = built?;

            let mut insert = calendar_hub.events().insert(new_event, &calendar_id);
            if wants_conference {
                insert = insert.conference_data_version(1);
            }
            let (_response, created) = insert.doit().await?;

            let join_url = created
                .conference_data
                .as_ref()
                .and_then(|data| data.entry_points.as_ref())
                .and_then(|points| points.first())
                .and_then(|point| point.uri.clone());

            Ok(CalendarEventResult {
                event_id: created.id,
                status: created
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
                join_url,
                html_link: created.html_link,
            })
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let result = calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .doit()
                .await;
            match result {
                Ok(_) => Ok(()),
                // An already-missing event counts as deleted.
                Err(e) if e.to_string().contains("404") => Ok(()),
                Err(e) => Err(GcalServiceError::ApiError(e)),
            }
        })
    }
}
