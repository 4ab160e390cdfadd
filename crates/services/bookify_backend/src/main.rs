// File: services/bookify_backend/src/main.rs
use axum::{http::HeaderValue, routing::get, Router};
use bookify_common::{is_gcal_enabled, is_msgraph_enabled};
use bookify_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    bookify_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    let mut app = Router::new()
        .route("/", get(|| async { "Bookify API" }))
        .merge(bookify_common::routes());

    #[cfg(feature = "msgraph")]
    {
        if is_msgraph_enabled(&config) {
            info!("mounting Microsoft Graph routes at /ms");
            app = app.nest("/ms", bookify_msgraph::routes::routes(config.clone()));
        } else {
            info!("Microsoft Graph path disabled");
        }
    }

    #[cfg(feature = "gcal")]
    {
        if is_gcal_enabled(&config) {
            match bookify_gcal::routes::routes(config.clone()).await {
                Ok(router) => {
                    info!("mounting Google Calendar routes at /google and /api");
                    app = app.merge(router);
                }
                Err(e) => warn!("Google Calendar path unavailable: {}", e),
            }
        } else {
            info!("Google Calendar path disabled");
        }
    }

    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Booking backend for the marketing website",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "Bookify", description = "Core booking endpoints")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)]
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "msgraph")]
        openapi_doc.merge(bookify_msgraph::doc::MsGraphApiDoc::openapi());
        #[cfg(feature = "gcal")]
        openapi_doc.merge(bookify_gcal::doc::GcalApiDoc::openapi());
        info!("adding Swagger UI at /docs");

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    // CORS: locked to the marketing site when configured, open otherwise.
    let cors = match config
        .server
        .frontend_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    app = app.layer(cors);

    // Serve the built frontend in dev mode so the booking widget can be
    // exercised against a local backend.
    if cfg!(debug_assertions) {
        info!("running in development mode, serving static files from ../../dist");
        app = app.fallback_service(ServeDir::new("../../dist"));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
