//! Email backend implementations
//!
//! - **SMTP**: Send emails via an SMTP server chosen per delivery

pub mod smtp;
