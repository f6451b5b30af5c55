//! Live-reload token endpoint.
//!
//! A browser-side script polls `/_liveReload` and reloads the page once the
//! returned token changes, which happens whenever the process restarts.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::handler::{page, PageHandler};

/// Path of the live-reload endpoint
pub const LIVE_RELOAD_PATH: &str = "/_liveReload";

/// Single-writer token cell: armed once when the server fires, read by every
/// request to the endpoint afterwards
#[derive(Debug, Clone, Default)]
pub struct LiveReload {
    token: Arc<OnceCell<i64>>,
}

impl LiveReload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token to the current time in epoch milliseconds
    ///
    /// Returns the token in effect; arming twice keeps the first value.
    pub fn arm(&self) -> i64 {
        *self.token.get_or_init(|| chrono::Utc::now().timestamp_millis())
    }

    pub fn token(&self) -> Option<i64> {
        self.token.get().copied()
    }

    /// Handler for `ANY /_liveReload`
    ///
    /// `500 "0"` until armed, then `200` with the decimal token.
    pub fn endpoint(&self) -> PageHandler {
        let token = self.token.clone();
        page(move |_ctx| {
            let current = token.get().copied();
            async move {
                Ok(match current {
                    Some(token) => (StatusCode::OK, token.to_string()).into_response(),
                    None => (StatusCode::INTERNAL_SERVER_ERROR, "0").into_response(),
                })
            }
        })
    }
}
