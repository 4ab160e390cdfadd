// File: crates/bookify_gcal/src/auth.rs
use bookify_config::GcalConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use std::{error::Error, path::Path};

pub type HubType = CalendarHub<hyper_rustls::HttpsConnector<HttpConnector>>;

/// Builds an authenticated calendar hub from the configured service-account
/// key file. The service account writes to the booking calendar directly;
/// no interactive consent is involved on the Google path.
pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in GcalConfig")?;
    let service_account_key = read_service_account_key(Path::new(key_path)).await?;
    let authenticator = ServiceAccountAuthenticator::builder(service_account_key)
        .build()
        .await?;

    let connector = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();
    let http_client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

    Ok(CalendarHub::new(http_client, authenticator))
}
