//! Health check endpoint
//!
//! Reports the service as healthy while it can serve requests. The history
//! log is checked as a component: a missing log directory degrades the
//! report but keeps the status code at 200, since sends still go out.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SERVICE_NAME;
use crate::state::MailerState;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy and ready
    Healthy,
    /// Service is degraded but operational
    Degraded,
}

/// Individual component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: HealthStatus,
    /// Optional message with details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    /// Create a healthy component
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    /// Create a degraded component
    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall status
    pub status: HealthStatus,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Individual component healths
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthCheckResponse {
    /// Healthy response with no components
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: Utc::now(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            components: HashMap::new(),
        }
    }

    /// Add component health
    pub fn add_component(&mut self, name: impl Into<String>, health: ComponentHealth) {
        self.components.insert(name.into(), health);
        self.recalculate_status();
    }

    fn recalculate_status(&mut self) {
        self.status = if self.components.values().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
    }
}

impl Default for HealthCheckResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Always 200: a degraded component never stops sends.
impl IntoResponse for HealthCheckResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// GET /api/email/health
#[allow(clippy::unused_async)]
pub async fn health_check(State(state): State<MailerState>) -> HealthCheckResponse {
    let mut response = HealthCheckResponse::new();

    let history_path = state.dispatcher().history().path();
    let directory_ready = history_path
        .parent()
        .is_none_or(|dir| dir.as_os_str().is_empty() || dir.is_dir());
    let history = if directory_ready {
        ComponentHealth::healthy()
    } else {
        ComponentHealth::degraded(format!(
            "History directory for {} does not exist yet",
            history_path.display()
        ))
    };
    response.add_component("history", history);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response_is_healthy() {
        let response = HealthCheckResponse::new();

        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.service, "acton-mailer");
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_degraded_component_keeps_200() {
        let mut response = HealthCheckResponse::new();
        response.add_component("history", ComponentHealth::degraded("missing"));

        assert_eq!(response.status, HealthStatus::Degraded);
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_healthy_components_keep_status_healthy() {
        let mut response = HealthCheckResponse::new();
        response.add_component("history", ComponentHealth::healthy());

        assert_eq!(response.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(HealthCheckResponse::new()).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "acton-mailer");
        assert!(json["timestamp"].is_string());
        assert!(json["version"].is_string());
        assert!(json.get("components").is_none());
    }
}
