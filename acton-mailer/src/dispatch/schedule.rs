//! Deferred delivery.
//!
//! Only the request is validated; nothing is ever queued.

use std::convert::Infallible;

use chrono::{DateTime, Utc};

use crate::error::MailerError;

/// Message for a send time that is not in the future
pub const SCHEDULE_IN_PAST: &str = "Send time must be in the future";

/// Message returned for every valid schedule request
pub const SCHEDULE_NOT_IMPLEMENTED: &str = "Scheduled delivery is not implemented";

/// Check a schedule request against `now`
///
/// Never succeeds: a valid request is answered with
/// `MailerError::NotImplemented`.
///
/// # Errors
///
/// `MailerError::Validation` when `send_at` is not after `now`, otherwise
/// `MailerError::NotImplemented`.
pub fn validate_schedule(
    send_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Infallible, MailerError> {
    if send_at <= now {
        return Err(MailerError::validation(SCHEDULE_IN_PAST));
    }

    Err(MailerError::NotImplemented(SCHEDULE_NOT_IMPLEMENTED.to_string()))
}
