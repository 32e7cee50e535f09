//! Fundamental types for the Foyer contact gateway.

pub mod email;
pub mod identity;
pub mod site;
pub mod time;

pub use email::{EmailAddress, EmailHash, EmailParseError};
pub use identity::{Actor, MemberId};
pub use site::SiteContext;
pub use time::Timestamp;
