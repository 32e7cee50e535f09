//! Email verification engine.
//!
//! Business rules layered over the store: the only component that mints
//! confirmation codes or derives an entry's status. The flow is
//! submit → out-of-band code delivery → validate; moderation can veto any
//! entry with the spam flag at any point.
//!
//! The engine never sends email itself and never calls upward into the
//! contact mediator; it is a leaf service.

pub mod code;
pub mod engine;
pub mod error;
pub mod status;

pub use code::mint_code;
pub use engine::{SubmittedEntry, VerificationEngine};
pub use error::VerificationError;
pub use status::VerificationStatus;
