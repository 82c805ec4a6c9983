//! Environment-driven client configuration.

use std::env;

use crate::constants::DEFAULT_API_URL;
use crate::models::AccessToken;

/// Client configuration read from the environment.
///
/// The access token may legitimately be absent; token-less sessions resolve
/// to the unauthorized view rather than failing at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: AccessToken,
    /// Display identity attached to uploads. Stored client-side only; the
    /// backend shows "anonymous" for files finished without one.
    pub email: Option<String>,
}

impl ClientConfig {
    /// Read PRINTQUEUE_API_URL, PRINTQUEUE_ACCESS_TOKEN, and PRINTQUEUE_EMAIL.
    pub fn from_env() -> Self {
        let api_url = env::var("PRINTQUEUE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = AccessToken::new(env::var("PRINTQUEUE_ACCESS_TOKEN").unwrap_or_default());
        let email = env::var("PRINTQUEUE_EMAIL").ok().filter(|e| !e.is_empty());

        ClientConfig {
            api_url,
            token,
            email,
        }
    }
}
