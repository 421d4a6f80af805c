//! Domain core of the Thankly appreciation journal.
//!
//! Identifiers, the identity state machine, profiles and the journal store,
//! together with the seams (storage, clock, directory) that infrastructure
//! plugs into.

pub mod clock;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod identity;
pub mod journal;
pub mod profile;
pub mod storage;
pub mod tier;

// Re-export common types
pub use context::SessionContext;
pub use error::{Result, ThanklyError};
pub use identity::{Identifier, IdentityState, ViewState};
pub use tier::{AccountTier, FeatureLimits};
