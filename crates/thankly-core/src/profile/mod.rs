//! Profile domain module: nickname and avatar of one journal.

mod model;
mod service;

pub use model::{Avatar, MAX_NICKNAME_CHARS, Profile, default_nickname};
pub use service::ProfileService;
