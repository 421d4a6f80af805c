//! Application layer for the Thankly journal.
//!
//! Use cases that tie the domain core to a directory client and a runtime:
//! opening pages, entry flows, profile edits with directory publishing, and
//! debounced user search.

pub mod directory_sync;
pub mod journal_app;
pub mod user_search;

pub use directory_sync::DirectorySync;
pub use journal_app::{JournalApp, JournalPage, PageOutcome};
pub use user_search::{SearchOutcome, UserSearch};
