// --- File: crates/bookify_msgraph/src/service.rs ---
//! Thin Microsoft Graph REST client.
//!
//! Every method takes the delegated access token explicitly; token lifetime
//! is owned by [`crate::auth::TokenStore`].

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bookify_common::HTTP_CLIENT;

use crate::logic::BusyInterval;

pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Free/busy granularity requested from getSchedule, in minutes.
const AVAILABILITY_VIEW_INTERVAL: u32 = 30;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Graph API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse time: {0}")]
    TimeParse(String),
}

// --- Wire types (Graph JSON is camelCase throughout) ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphDateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

impl GraphDateTimeTimeZone {
    pub fn utc(instant: DateTime<Utc>) -> Self {
        GraphDateTimeTimeZone {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC".to_string(),
        }
    }

    /// Graph emits zone-less timestamps like `2025-01-02T08:00:00.0000000`
    /// in the requested timezone; we always request UTC.
    pub fn parse_utc(&self) -> Result<DateTime<Utc>, GraphError> {
        let naive = NaiveDateTime::parse_from_str(&self.date_time, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| {
                DateTime::parse_from_rfc3339(&self.date_time).map(|dt| dt.naive_utc())
            })
            .map_err(|e| GraphError::TimeParse(format!("{}: {}", self.date_time, e)))?;
        Ok(naive.and_utc())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    schedules: Vec<String>,
    start_time: GraphDateTimeTimeZone,
    end_time: GraphDateTimeTimeZone,
    availability_view_interval: u32,
}

#[derive(Deserialize, Debug)]
struct ScheduleResponse {
    #[serde(default)]
    value: Vec<ScheduleInfo>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScheduleInfo {
    #[serde(default)]
    schedule_items: Vec<ScheduleItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScheduleItem {
    start: GraphDateTimeTimeZone,
    end: GraphDateTimeTimeZone,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphItemBody {
    pub content_type: String,
    pub content: String,
}

impl GraphItemBody {
    pub fn html(content: impl Into<String>) -> Self {
        GraphItemBody {
            content_type: "HTML".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphEmailAddress {
    pub address: String,
    pub name: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct GraphAttendee {
    #[serde(rename = "emailAddress")]
    pub email_address: GraphEmailAddress,
    #[serde(rename = "type")]
    pub attendee_type: String,
}

/// Outgoing event payload for POST /me/events.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGraphEvent {
    pub subject: String,
    pub start: GraphDateTimeTimeZone,
    pub end: GraphDateTimeTimeZone,
    pub attendees: Vec<GraphAttendee>,
    pub allow_new_time_proposals: bool,
    pub is_online_meeting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_meeting_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<GraphItemBody>,
    pub is_all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_as: Option<String>,
}

impl NewGraphEvent {
    /// A booked meeting: online (Teams), attendee optional, open to new time
    /// proposals.
    pub fn booking(
        subject: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz_name: &str,
        attendee: Option<GraphAttendee>,
        body_html: String,
    ) -> Self {
        NewGraphEvent {
            subject,
            start: local_datetimetimezone(start, tz_name),
            end: local_datetimetimezone(end, tz_name),
            attendees: attendee.into_iter().collect(),
            allow_new_time_proposals: true,
            is_online_meeting: true,
            online_meeting_provider: Some("teamsForBusiness".to_string()),
            body: Some(GraphItemBody::html(body_html)),
            is_all_day: false,
            show_as: None,
        }
    }

    /// A mirrored synthetic busy block: no attendees, shows as busy.
    pub fn busy_block(
        subject: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz_name: &str,
    ) -> Self {
        NewGraphEvent {
            subject,
            start: local_datetimetimezone(start, tz_name),
            end: local_datetimetimezone(end, tz_name),
            attendees: Vec::new(),
            allow_new_time_proposals: false,
            is_online_meeting: false,
            online_meeting_provider: None,
            body: None,
            is_all_day: false,
            show_as: Some("busy".to_string()),
        }
    }
}

fn local_datetimetimezone(instant: DateTime<Utc>, tz_name: &str) -> GraphDateTimeTimeZone {
    GraphDateTimeTimeZone {
        date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        time_zone: tz_name.to_string(),
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphOnlineMeeting {
    pub join_url: Option<String>,
}

/// Event as returned by Graph; only the fields the booking flow reads.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub online_meeting: Option<GraphOnlineMeeting>,
}

#[derive(Deserialize, Debug)]
struct CalendarViewResponse {
    #[serde(default)]
    value: Vec<GraphEvent>,
}

// --- Client ---

/// Microsoft Graph calendar client over the shared HTTP connection pool.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GraphClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphClient {
    pub fn new() -> Self {
        GraphClient {
            http: HTTP_CLIENT.clone(),
            base_url: GRAPH_BASE_URL.to_string(),
        }
    }

    /// Client against a non-default base URL (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        GraphClient {
            http: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
        }
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, GraphError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GraphError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetches busy intervals for the booking mailbox via getSchedule,
    /// sorted chronologically.
    pub async fn get_schedule(
        &self,
        access_token: &str,
        mailbox: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, GraphError> {
        let request = ScheduleRequest {
            schedules: vec![mailbox.to_string()],
            start_time: GraphDateTimeTimeZone::utc(start),
            end_time: GraphDateTimeTimeZone::utc(end),
            availability_view_interval: AVAILABILITY_VIEW_INTERVAL,
        };

        let response = self
            .http
            .post(format!("{}/me/calendar/getSchedule", self.base_url))
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?;
        let schedule: ScheduleResponse = Self::checked(response).await?.json().await?;

        let mut busy = Vec::new();
        for info in schedule.value {
            for item in info.schedule_items {
                busy.push((item.start.parse_utc()?, item.end.parse_utc()?));
            }
        }
        busy.sort_by_key(|&(start, _)| start);
        debug!("getSchedule returned {} busy intervals", busy.len());
        Ok(busy)
    }

    /// Lists events overlapping `[start, end]` via calendarView.
    pub async fn calendar_view(
        &self,
        access_token: &str,
        tz_name: &str,
        start_iso: &str,
        end_iso: &str,
        top: u32,
    ) -> Result<Vec<GraphEvent>, GraphError> {
        let url = format!(
            "{}/me/calendarView?startDateTime={}&endDateTime={}&$top={}",
            self.base_url,
            urlencoding::encode(start_iso),
            urlencoding::encode(end_iso),
            top
        );
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header("Prefer", format!("outlook.timezone=\"{}\"", tz_name))
            .send()
            .await?;
        let view: CalendarViewResponse = Self::checked(response).await?.json().await?;
        Ok(view.value)
    }

    /// Creates an event on the booking mailbox's default calendar.
    pub async fn create_event(
        &self,
        access_token: &str,
        event: &NewGraphEvent,
    ) -> Result<GraphEvent, GraphError> {
        let response = self
            .http
            .post(format!("{}/me/events", self.base_url))
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?;
        let created = Self::checked(response).await?.json().await?;
        Ok(created)
    }

    /// Replaces an event's body. Used for the post-creation join-link patch.
    pub async fn patch_event_body(
        &self,
        access_token: &str,
        event_id: &str,
        html: &str,
    ) -> Result<(), GraphError> {
        let payload = serde_json::json!({ "body": { "contentType": "HTML", "content": html } });
        let response = self
            .http
            .patch(format!("{}/me/events/{}", self.base_url, event_id))
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    pub async fn delete_event(
        &self,
        access_token: &str,
        event_id: &str,
    ) -> Result<(), GraphError> {
        let response = self
            .http
            .delete(format!("{}/me/events/{}", self.base_url, event_id))
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}
