//! Identity domain module.
//!
//! # Module Structure
//!
//! - `identifier`: identifier type and generator
//! - `record`: durable identity flags
//! - `state`: the pure page-load state machine
//! - `session`: state machine applied to storage, plus entry flows

pub mod identifier;
mod record;
mod session;
pub mod state;

pub use identifier::{Identifier, IdentifierStyle, generate, slugify};
pub use record::IdentityRecord;
pub use session::IdentitySession;
pub use state::{IdentityState, Resolution, ViewState, resolve};
