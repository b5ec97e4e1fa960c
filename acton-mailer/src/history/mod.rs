//! Durable send history
//!
//! Every dispatch operation produces exactly one [`SendAttemptRecord`],
//! appended to a JSON log by the [`HistoryStore`]. Reads return the whole log
//! newest-first as a [`HistorySummary`].

mod record;
mod store;

pub use record::{summarize_recipients, HistorySummary, SendAttemptRecord, SUMMARY_RECIPIENTS};
pub use store::{HistoryError, HistoryStore};
