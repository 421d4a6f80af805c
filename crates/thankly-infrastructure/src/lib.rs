//! Infrastructure adapters for the Thankly journal: file storage, paths,
//! configuration loading and the HTTP directory client.

pub mod config_service;
pub mod directory;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::directory::{HttpDirectoryClient, directory_client};
pub use crate::paths::{PathError, ThanklyPaths};
pub use crate::storage::FileKeyValueStore;
