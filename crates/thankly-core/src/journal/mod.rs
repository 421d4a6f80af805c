//! Journal domain module: appreciations and their store.

mod model;
mod store;

pub use model::{Appreciation, MAX_TEXT_CHARS, MAX_TITLE_CHARS};
pub use store::{JournalExport, JournalStore};
