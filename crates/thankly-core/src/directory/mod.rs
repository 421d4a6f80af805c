//! Remote user directory seam.

mod client;
mod model;

pub use client::{DirectoryClient, NullDirectoryClient};
pub use model::{DirectoryEntry, filter_results};
