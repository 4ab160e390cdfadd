// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for the external calendar and notification services.
//!
//! These traits decouple the HTTP handlers from concrete provider clients so
//! the booking flows can be exercised against in-memory implementations in
//! tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A trait for calendar service operations.
///
/// The Google path implements this directly; the Microsoft Graph client has a
/// wider inherent API (calendar-view queries, body patches) on top of the
/// same shapes.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get busy time intervals within a specified time range.
    #[allow(clippy::type_complexity)]
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, Self::Error>;

    /// Create a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Delete a calendar event.
    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// A trait for notification service operations.
///
/// Confirmation mail is fire-and-forget: callers never await delivery
/// guarantees and swallow errors after logging them.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email notification.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// Event payload handed to a calendar service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// RFC3339 start of the event.
    pub start_time: String,
    /// RFC3339 end of the event.
    pub end_time: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Attendee to invite, if any.
    pub attendee_email: Option<String>,
    pub attendee_name: Option<String>,
    /// Whether to request a conferencing identity (Meet/Teams link).
    pub with_conference: bool,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
    /// Conferencing join link, when the provider issued one.
    pub join_url: Option<String>,
    /// Provider-hosted link to the event itself.
    pub html_link: Option<String>,
}

/// Notification implementation that only records the intent.
///
/// Actual delivery is owned by the frontend mail integration; the backend
/// logs what it would have sent so support can trace confirmations.
pub struct LogNotifier;

#[derive(Debug, thiserror::Error)]
#[error("notification logging failed")]
pub struct LogNotifierError;

impl NotificationService for LogNotifier {
    type Error = LogNotifierError;

    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        let to = to.to_string();
        let subject = subject.to_string();
        let body_len = body.len();
        Box::pin(async move {
            tracing::info!(%to, %subject, body_len, "confirmation email queued");
            Ok(())
        })
    }
}
