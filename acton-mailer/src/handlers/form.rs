//! Multipart send forms
//!
//! Both the single and the bulk endpoint accept the same form. Text fields
//! are matched by name without regard to case; `cc`, `bcc`, `recipients`
//! and `attachments` may repeat.

use axum::extract::{multipart::MultipartError, FromRequest, Multipart, Request};
use http::StatusCode;

use crate::dispatch::MessageContent;
use crate::email::{Attachment, SmtpCredentials};
use crate::error::MailerError;

/// Parsed multipart send form
#[derive(Debug, Default)]
pub struct SendForm {
    /// SMTP host
    pub smtp_host: Option<String>,
    /// SMTP port, unparsed
    pub smtp_port: Option<String>,
    /// SMTP user
    pub smtp_user: Option<String>,
    /// SMTP password
    pub smtp_pass: Option<String>,
    /// Sender address
    pub from: Option<String>,
    /// Recipient of a single send
    pub to: Option<String>,
    /// Recipients of a bulk send
    pub recipients: Vec<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Plain text body
    pub body: Option<String>,
    /// CC recipients
    pub cc: Vec<String>,
    /// BCC recipients
    pub bcc: Vec<String>,
    /// Uploaded files
    pub attachments: Vec<Attachment>,
}

impl SendForm {
    /// Connection parameters from the form
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` for a missing field or a port that
    /// is not a number between 1 and 65535.
    pub fn credentials(&self) -> Result<SmtpCredentials, MailerError> {
        let port = required(self.smtp_port.as_ref(), "smtpPort")?;
        let port = port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| MailerError::validation(format!("Invalid smtpPort: {port}")))?;

        Ok(SmtpCredentials::new(
            required(self.smtp_host.as_ref(), "smtpHost")?.trim(),
            port,
            required(self.smtp_user.as_ref(), "smtpUser")?.trim(),
            required(self.smtp_pass.as_ref(), "smtpPass")?,
        ))
    }

    /// Recipient of a single send
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` when `to` is missing or blank.
    pub fn single_recipient(&self) -> Result<String, MailerError> {
        Ok(required(self.to.as_ref(), "to")?.trim().to_string())
    }

    /// Message content, consuming the attachments
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` when `from` or `subject` is missing.
    pub fn content(&mut self) -> Result<MessageContent, MailerError> {
        let from = required(self.from.as_ref(), "from")?.trim().to_string();
        let subject = required(self.subject.as_ref(), "subject")?.clone();

        Ok(MessageContent::new(subject, self.body.clone().unwrap_or_default())
            .with_from(from)
            .with_cc(std::mem::take(&mut self.cc))
            .with_bcc(std::mem::take(&mut self.bcc))
            .with_attachments(std::mem::take(&mut self.attachments)))
    }
}

fn required<'a>(value: Option<&'a String>, name: &str) -> Result<&'a String, MailerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MailerError::validation(format!("Missing required field: {name}")))
}

fn rejection(error: &MultipartError) -> MailerError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MailerError::PayloadTooLarge(error.body_text())
    } else {
        MailerError::validation(format!("Invalid form data: {}", error.body_text()))
    }
}

impl<S> FromRequest<S> for SendForm
where
    S: Send + Sync,
{
    type Rejection = MailerError;

    #[allow(clippy::manual_async_fn)]
    fn from_request(
        req: Request,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| MailerError::validation(format!("Expected multipart form data: {}", e.body_text())))?;

            let mut form = Self::default();

            while let Some(field) = multipart.next_field().await.map_err(|e| rejection(&e))? {
                let name = field.name().unwrap_or_default().to_ascii_lowercase();

                if name == "attachments" || field.file_name().is_some() {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(|e| rejection(&e))?;

                    // Browsers send an empty part for an untouched file input.
                    if filename.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.attachments
                        .push(Attachment::new(filename, content_type, data.to_vec()));
                    continue;
                }

                let value = field.text().await.map_err(|e| rejection(&e))?;
                match name.as_str() {
                    "smtphost" => form.smtp_host = Some(value),
                    "smtpport" => form.smtp_port = Some(value),
                    "smtpuser" => form.smtp_user = Some(value),
                    "smtppass" => form.smtp_pass = Some(value),
                    "from" => form.from = Some(value),
                    "to" => form.to = Some(value),
                    "recipients" => form.recipients.push(value),
                    "subject" => form.subject = Some(value),
                    "body" => form.body = Some(value),
                    "cc" => form.cc.push(value),
                    "bcc" => form.bcc.push(value),
                    _ => {}
                }
            }

            Ok(form)
        }
    }
}
