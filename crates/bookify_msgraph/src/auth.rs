// --- File: crates/bookify_msgraph/src/auth.rs ---
//! Delegated OAuth against the Microsoft identity platform.
//!
//! The access token lives in process memory only: written by the OAuth
//! callback, read by every authenticated request, never refreshed. An
//! expired token surfaces as 401 and requires re-authorization via
//! /ms/oauth/start.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::RwLock;

use bookify_common::{auth_required, BookifyError, HTTP_CLIENT};
use bookify_config::MsGraphConfig;

use crate::service::GraphError;

pub const OAUTH_SCOPES: &[&str] = &[
    "openid",
    "profile",
    "offline_access",
    "User.Read",
    "Calendars.ReadWrite",
];

/// Margin subtracted from the provider-reported lifetime so a token is never
/// used in its final seconds.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A delegated Graph access token with its absolute expiry.
#[derive(Debug, Clone)]
pub struct MsToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Expiry as a pure function of (token, now).
pub fn is_expired(token: &MsToken, now: DateTime<Utc>) -> bool {
    now >= token.expires_at
}

/// In-memory token holder shared across request handlers.
///
/// Reads may observe a stale or absent token under concurrent callbacks;
/// that surfaces as an authorization failure, never corrupted state.
#[derive(Default)]
pub struct TokenStore {
    inner: RwLock<Option<MsToken>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly exchanged token, applying the expiry safety margin.
    pub fn store(&self, access_token: String, expires_in_secs: i64, now: DateTime<Utc>) {
        let token = MsToken {
            access_token,
            expires_at: now + Duration::seconds(expires_in_secs - EXPIRY_MARGIN_SECS),
        };
        *self.inner.write().expect("token store lock poisoned") = Some(token);
    }

    /// Returns the current access token, or AuthRequired when absent or
    /// expired.
    pub fn access_token(&self, now: DateTime<Utc>) -> Result<String, BookifyError> {
        let guard = self.inner.read().expect("token store lock poisoned");
        match guard.as_ref() {
            Some(token) if !is_expired(token, now) => Ok(token.access_token.clone()),
            _ => Err(auth_required(
                "Microsoft auth required. Visit /ms/oauth/start",
            )),
        }
    }
}

/// Builds the tenant-scoped consent URL the browser is redirected to.
pub fn authorize_url(config: &MsGraphConfig) -> String {
    format!(
        "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize\
         ?client_id={}&response_type=code&redirect_uri={}&scope={}&prompt=select_account",
        config.tenant_id,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&OAUTH_SCOPES.join(" ")),
    )
}

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Exchanges an authorization code for an access token.
pub async fn exchange_code(
    config: &MsGraphConfig,
    code: &str,
) -> Result<TokenResponse, GraphError> {
    let scope = OAUTH_SCOPES.join(" ");
    let mut params = vec![
        ("client_id", config.client_id.as_str()),
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("scope", scope.as_str()),
    ];
    if let Some(secret) = config.client_secret.as_deref() {
        params.push(("client_secret", secret));
    }

    let response = HTTP_CLIENT
        .post(format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            config.tenant_id
        ))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GraphError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<TokenResponse>().await?)
}
