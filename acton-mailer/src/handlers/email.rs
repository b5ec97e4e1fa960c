//! Email API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Deserialize;
use tracing::info;

use super::form::SendForm;
use crate::dispatch::{validate_schedule, BulkOutcome, MessageContent, SendOutcome};
use crate::error::MailerError;
use crate::history::HistorySummary;
use crate::state::MailerState;

/// Quick send request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSendRequest {
    /// Recipient
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    #[serde(default)]
    pub body: String,
    /// CC recipients
    #[serde(default)]
    pub cc: Vec<String>,
    /// BCC recipients
    #[serde(default)]
    pub bcc: Vec<String>,
}

/// Quick bulk send request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickBulkRequest {
    /// Recipients, one message each
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Plain text body
    #[serde(default)]
    pub body: String,
    /// CC recipients
    #[serde(default)]
    pub cc: Vec<String>,
    /// BCC recipients
    #[serde(default)]
    pub bcc: Vec<String>,
}

/// Schedule request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Recipient
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    #[serde(default)]
    pub body: String,
    /// Requested delivery time
    pub send_at: DateTime<Utc>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MailerError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| MailerError::validation(format!("Invalid request body: {}", e.body_text())))
}

fn require(value: &str, name: &str) -> Result<(), MailerError> {
    if value.trim().is_empty() {
        return Err(MailerError::validation(format!("Missing required field: {name}")));
    }
    Ok(())
}

fn send_response(outcome: SendOutcome) -> Response {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(outcome)).into_response()
}

fn bulk_response(outcome: BulkOutcome) -> Response {
    let status = if outcome.overall_success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(outcome)).into_response()
}

/// POST /api/email/send
///
/// # Errors
///
/// Returns `MailerError::Validation` for a missing or malformed form field.
pub async fn send(
    State(state): State<MailerState>,
    mut form: SendForm,
) -> Result<Response, MailerError> {
    let credentials = form.credentials()?;
    let to = form.single_recipient()?;
    let content = form.content()?;

    info!(%to, attachments = content.attachments.len(), "Send requested");
    let outcome = state.dispatcher().send_single(&credentials, &to, &content).await;
    Ok(send_response(outcome))
}

/// POST /api/email/bulk
///
/// # Errors
///
/// Returns `MailerError::Validation` for a missing form field or an empty
/// recipient list.
pub async fn bulk(
    State(state): State<MailerState>,
    mut form: SendForm,
) -> Result<Response, MailerError> {
    let credentials = form.credentials()?;
    let content = form.content()?;
    let recipients = std::mem::take(&mut form.recipients);

    info!(recipients = recipients.len(), "Bulk send requested");
    let outcome = state
        .dispatcher()
        .send_bulk(&credentials, &recipients, &content)
        .await?;
    Ok(bulk_response(outcome))
}

/// POST /api/email/quick
///
/// # Errors
///
/// Returns `MailerError::Validation` for a malformed body and
/// `MailerError::Config` when no default account is configured.
pub async fn quick(
    State(state): State<MailerState>,
    payload: Result<Json<QuickSendRequest>, JsonRejection>,
) -> Result<Response, MailerError> {
    let request = json_body(payload)?;
    require(&request.to, "to")?;
    require(&request.subject, "subject")?;

    let content = MessageContent::new(request.subject, request.body)
        .with_cc(request.cc)
        .with_bcc(request.bcc);
    let outcome = state
        .dispatcher()
        .quick_send(state.resolver(), request.to.trim(), content)
        .await?;
    Ok(send_response(outcome))
}

/// POST /api/email/quick/bulk
///
/// # Errors
///
/// Returns `MailerError::Validation` for a malformed body or empty recipient
/// list and `MailerError::Config` when no default account is configured.
pub async fn quick_bulk(
    State(state): State<MailerState>,
    payload: Result<Json<QuickBulkRequest>, JsonRejection>,
) -> Result<Response, MailerError> {
    let request = json_body(payload)?;
    require(&request.subject, "subject")?;

    let content = MessageContent::new(request.subject, request.body)
        .with_cc(request.cc)
        .with_bcc(request.bcc);
    let outcome = state
        .dispatcher()
        .quick_send_bulk(state.resolver(), &request.recipients, content)
        .await?;
    Ok(bulk_response(outcome))
}

/// POST /api/email/schedule
///
/// Validates the request; delivery is never actually scheduled.
///
/// # Errors
///
/// Always: `MailerError::Validation` for an invalid request, otherwise
/// `MailerError::NotImplemented`.
#[allow(clippy::unused_async)]
pub async fn schedule(
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Response, MailerError> {
    let request = json_body(payload)?;
    require(&request.to, "to")?;
    require(&request.subject, "subject")?;

    match validate_schedule(request.send_at, Utc::now())? {}
}

/// GET /api/email/history
pub async fn history(State(state): State<MailerState>) -> Json<HistorySummary> {
    Json(state.dispatcher().history().list().await)
}
