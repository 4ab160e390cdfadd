// --- File: crates/bookify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS layer (the marketing site).
    #[serde(default)]
    pub frontend_origin: Option<String>,
}

fn default_slot_length() -> i64 {
    60
}

fn default_buffer() -> i64 {
    30
}

fn default_work_hours() -> String {
    "Mon-Fri 08:00-17:00".to_string()
}

fn default_time_zone() -> String {
    "America/Los_Angeles".to_string()
}

// --- Booking policy shared by both calendar paths ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Mailbox identity events are booked against (also the organizer shown
    /// in confirmation notices).
    pub booking_email: String,
    /// IANA timezone name all wall-clock policy values are interpreted in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_slot_length")]
    pub slot_length_minutes: i64,
    #[serde(default = "default_buffer")]
    pub buffer_minutes: i64,
    /// e.g. "Mon-Fri 08:00-17:00"
    #[serde(default = "default_work_hours")]
    pub work_hours: String,
    /// Event subject used when a booking request carries none.
    #[serde(default)]
    pub default_subject: Option<String>,
}

// --- Microsoft Graph Config ---
// Holds the delegated-auth application registration. The client secret is
// optional because the auth-code flow for a public client does not need one.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MsGraphConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub tenant_id: String,
    pub redirect_uri: String,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    /// Path to the service-account JSON key.
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
}

// --- Voice-agent tool Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ToolsConfig {
    /// Static bearer token expected on /api/tools/* requests.
    pub bearer_token: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub booking: BookingConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_msgraph: bool,
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub msgraph: Option<MsGraphConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub tools: Option<ToolsConfig>,
}
