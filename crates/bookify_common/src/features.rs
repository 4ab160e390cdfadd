//! Runtime feature flag handling.
//!
//! Provider integrations are switched on by a `use_*` flag plus a populated
//! config section; both must be present for the router to be mounted.

use bookify_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Is the Microsoft Graph path enabled?
pub fn is_msgraph_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_msgraph, config.msgraph.as_ref())
}

/// Is the Google Calendar path enabled?
pub fn is_gcal_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}
