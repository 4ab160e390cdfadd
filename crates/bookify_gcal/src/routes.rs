// --- File: crates/bookify_gcal/src/routes.rs ---

use crate::auth::create_calendar_hub;
use crate::handlers::{
    api_book_handler, create_meeting_handler, google_book_handler, google_freebusy_handler,
    GcalState,
};
use crate::service::{GoogleCalendarService, Organizer};
use axum::{
    routing::{get, post},
    Router,
};
use bookify_common::services::LogNotifier;
use bookify_config::AppConfig;
use std::error::Error;
use std::sync::Arc;

/// Creates a router for the Google-backed booking surface: the public
/// freebusy and booking endpoints plus the bearer-gated tool endpoint.
/// Paths are absolute, so merge this router at the application root.
pub async fn routes(config: Arc<AppConfig>) -> Result<Router, Box<dyn Error + Send + Sync>> {
    let gcal_config = config.gcal.as_ref().ok_or("GCal config missing")?;
    let hub = create_calendar_hub(gcal_config).await?;

    let service = GoogleCalendarService::new(Arc::new(hub), config.booking.time_zone.clone())
        .with_organizer(Organizer {
            email: config.booking.booking_email.clone(),
            display_name: "Bookify".to_string(),
        });
    let state = Arc::new(GcalState {
        config,
        service: Arc::new(service),
        notifier: Arc::new(LogNotifier),
    });

    Ok(Router::new()
        .route("/google/freebusy", get(google_freebusy_handler::<LogNotifier>))
        .route("/google/book", post(google_book_handler::<LogNotifier>))
        .route("/api/book", post(api_book_handler::<LogNotifier>))
        .route(
            "/api/tools/create_meeting",
            post(create_meeting_handler::<LogNotifier>),
        )
        .with_state(state))
}
