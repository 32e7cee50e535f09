//! Contact mediator.
//!
//! Orchestrates the three contact situations between visitors and members:
//! decides which message template applies, whether the sender's email must
//! be verified first, dispatches through the mail collaborator, and records
//! usage on the sender's verification entry.
//!
//! The mediator calls down into the verification engine; the engine never
//! calls back up.

pub mod directory;
pub mod error;
pub mod mailer;
pub mod mediator;
pub mod sanitize;
pub mod situation;
pub mod templates;

pub use directory::{Member, MemberDirectory, StaticDirectory};
pub use error::MediatorError;
pub use mailer::{LogMailer, Mailer, OutboundEmail, RecordingMailer};
pub use mediator::{ContactMediator, ContactOutcome, ContactRequest};
pub use situation::ContactSituation;
