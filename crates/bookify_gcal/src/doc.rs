// File: crates/bookify_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa;
use utoipa::OpenApi;

use crate::logic::{
    BusyPeriod, GoogleFreeBusyResponse, GoogleSlotOffer, MeetingRequest, MeetingResponse,
};

#[utoipa::path(
    get,
    path = "/google/freebusy",
    responses(
        (status = 200, description = "Available slots over the next two weeks", body = GoogleFreeBusyResponse),
        (status = 500, description = "Calendar not configured or upstream error")
    )
)]
fn doc_google_freebusy_handler() {}

#[utoipa::path(
    post,
    path = "/api/book",
    request_body(content = MeetingRequest, example = json!({
        "full_name": "Jamie Prospect",
        "email": "jamie@example.com",
        "phone": "+1 555 0100",
        "reason": "Product walkthrough",
        "start_iso": "2025-05-15T10:00:00-07:00",
        "duration_min": 30
    })),
    responses(
        (status = 200, description = "Booking result; calendar failure degrades to empty links", body = MeetingResponse),
        (status = 400, description = "Missing full_name, email, or start time"),
        (status = 500, description = "Calendar not configured")
    )
)]
fn doc_api_book_handler() {}

#[utoipa::path(
    post,
    path = "/google/book",
    request_body(content = MeetingRequest),
    responses(
        (status = 200, description = "Booking result", body = MeetingResponse),
        (status = 400, description = "Missing full_name, email, or start time"),
        (status = 500, description = "Calendar write failed")
    )
)]
fn doc_google_book_handler() {}

#[utoipa::path(
    post,
    path = "/api/tools/create_meeting",
    request_body(content = MeetingRequest, example = json!({
        "name": "Jamie Prospect",
        "email": "jamie@example.com",
        "date": "2025-05-15",
        "time": "2:00 PM",
        "duration_min": 30
    })),
    responses(
        (status = 200, description = "Booking result", body = MeetingResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Invalid or missing bearer token")
    )
)]
fn doc_create_meeting_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_google_freebusy_handler,
        doc_api_book_handler,
        doc_google_book_handler,
        doc_create_meeting_handler
    ),
    components(
        schemas(
            GoogleFreeBusyResponse,
            GoogleSlotOffer,
            BusyPeriod,
            MeetingRequest,
            MeetingResponse
        )
    ),
    tags(
        (name = "gcal", description = "Google Calendar Booking API")
    )
)]
pub struct GcalApiDoc;
