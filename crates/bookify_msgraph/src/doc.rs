// File: crates/bookify_msgraph/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa;
use utoipa::OpenApi;

use crate::handlers::ClearResponse;
use crate::logic::{BookSlotRequest, BookingResponse, FreeBusyResponse, SlotOffer};

#[utoipa::path(
    get,
    path = "/ms/freebusy",
    responses(
        (status = 200, description = "Bookable and busy slots for the next two weeks", body = FreeBusyResponse),
        (status = 401, description = "Microsoft authorization required"),
        (status = 500, description = "Upstream calendar error")
    )
)]
fn doc_freebusy_handler() {}

#[utoipa::path(
    post,
    path = "/ms/book",
    request_body(content = BookSlotRequest, example = json!({
        "startIso": "2025-05-15T10:00:00-07:00",
        "endIso": "2025-05-15T11:00:00-07:00",
        "subject": "Intro call",
        "attendeeEmail": "client@example.com",
        "attendeeName": "Client"
    })),
    responses(
        (status = 200, description = "Booking result", body = BookingResponse,
         example = json!({
             "ok": true,
             "eventId": "AAMkAGI1...",
             "joinUrl": "https://teams.microsoft.com/l/meetup-join/..."
         })
        ),
        (status = 401, description = "Microsoft authorization required"),
        (status = 409, description = "Slot already booked",
         example = json!({
             "error": { "message": "Selected time is no longer available.", "code": 409 }
         })
        ),
        (status = 500, description = "Booking failed")
    )
)]
fn doc_book_handler() {}

#[utoipa::path(
    post,
    path = "/ms/clear",
    params(
        ("scope" = Option<String>, Query, description = "\"ours\" (default) or \"all\""),
        ("subject" = Option<String>, Query, description = "Case-insensitive subject substring filter"),
        ("start" = Option<String>, Query, description = "Range start, RFC 3339. Defaults to 30 days ago"),
        ("end" = Option<String>, Query, description = "Range end, RFC 3339. Defaults to 60 days ahead")
    ),
    responses(
        (status = 200, description = "Deletion summary", body = ClearResponse),
        (status = 401, description = "Microsoft authorization required"),
        (status = 500, description = "Upstream calendar error")
    )
)]
fn doc_clear_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_freebusy_handler, doc_book_handler, doc_clear_handler),
    components(
        schemas(
            FreeBusyResponse,
            SlotOffer,
            BookSlotRequest,
            BookingResponse,
            ClearResponse
        )
    ),
    tags(
        (name = "msgraph", description = "Microsoft 365 Booking API")
    )
)]
pub struct MsGraphApiDoc;
