//! CLI command implementations

pub mod account;
pub mod history;
pub mod send;

use console::Emoji;

pub use account::AccountCommand;
pub use history::HistoryArgs;
pub use send::{BulkArgs, SendArgs};

static SUCCESS: Emoji = Emoji("✓ ", "√ ");
static FAILURE: Emoji = Emoji("✗ ", "x ");
static INFO: Emoji = Emoji("ℹ ", "i ");
