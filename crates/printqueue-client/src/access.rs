//! Access verification and route resolution.
//!
//! Runs once at startup and decides which view the session gets: upload,
//! lab, or unauthorized. The decision is a one-shot state machine with a
//! single irreversible transition out of `Loading`; a failed verification is
//! terminal for the session (a restart re-runs it).

use printqueue_core::{AccountKind, Route, View};

use crate::api::ApiClient;
use crate::transport::Transport;

/// Verification state. Exactly one transition out of `Loading` ever happens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Loading,
    Authorized(Route),
    /// Unauthorized, optionally with the verification failure for display.
    Unauthorized(Option<String>),
}

impl AccessState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AccessState::Loading)
    }
}

/// Pure routing rule.
///
/// The lab view admits only `down` tokens and the upload view only `up`
/// tokens; any mismatch is unauthorized. A session without a token is
/// unauthorized even if the backend answered the verification call.
pub fn resolve_route(kind: AccountKind, view: View, token_present: bool) -> Option<Route> {
    if !token_present {
        return None;
    }

    match (view, kind) {
        (View::Lab, AccountKind::Down) => Some(Route::Lab),
        (View::Upload, AccountKind::Up) => Some(Route::Upload),
        _ => None,
    }
}

/// One-shot access controller.
#[derive(Debug, Default)]
pub struct AccessController {
    state: AccessState,
}

impl AccessController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AccessState {
        &self.state
    }

    /// Verify the client's token against the identity endpoint and resolve
    /// the route for the requested view.
    ///
    /// The verification call is issued even for token-less sessions (the
    /// result is forced to unauthorized afterwards). Calling again after the
    /// state has resolved does nothing.
    pub async fn verify<T: Transport>(&mut self, api: &ApiClient<T>, view: View) -> &AccessState {
        if self.state.is_resolved() {
            return &self.state;
        }

        self.state = match api.verify_identity().await {
            Ok(kind) => match resolve_route(kind, view, api.token().is_present()) {
                Some(route) => {
                    tracing::info!(?route, "access granted");
                    AccessState::Authorized(route)
                }
                None => AccessState::Unauthorized(None),
            },
            Err(err) => {
                tracing::warn!(error = %err, "access verification failed");
                AccessState::Unauthorized(Some(err.to_string()))
            }
        };

        &self.state
    }
}
