//! HTTP routes
//!
//! | Method | Path                     | Handler               |
//! |--------|--------------------------|-----------------------|
//! | POST   | `/api/email/send`        | [`email::send`]       |
//! | POST   | `/api/email/bulk`        | [`email::bulk`]       |
//! | POST   | `/api/email/quick`       | [`email::quick`]      |
//! | POST   | `/api/email/quick/bulk`  | [`email::quick_bulk`] |
//! | POST   | `/api/email/schedule`    | [`email::schedule`]   |
//! | GET    | `/api/email/history`     | [`email::history`]    |
//! | GET    | `/api/email/health`      | [`health_check`]      |

pub mod email;
pub mod form;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::health::health_check;
use crate::state::MailerState;

/// Build the application router
///
/// Requests are traced and bodies are capped at
/// `server.max_body_bytes`.
pub fn router(state: MailerState) -> Router {
    let max_body_bytes = state.config().server.max_body_bytes;

    Router::new()
        .route("/api/email/send", post(email::send))
        .route("/api/email/bulk", post(email::bulk))
        .route("/api/email/quick", post(email::quick))
        .route("/api/email/quick/bulk", post(email::quick_bulk))
        .route("/api/email/schedule", post(email::schedule))
        .route("/api/email/history", get(email::history))
        .route("/api/email/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}
