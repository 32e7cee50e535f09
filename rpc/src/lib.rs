//! HTTP API surface.
//!
//! Thin handlers over the verification engine and contact mediator:
//! deserialize, authorize through the policy, call the domain, project the
//! result. All routes live under `/foyer/v1`. Caller identity arrives as
//! trusted proxy headers; see [`auth`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod params;
pub mod projection;
pub mod server;

pub use auth::{AuthorizationPolicy, CapabilityPolicy, RequestIdentity};
pub use error::ApiError;
pub use handlers::AppState;
pub use projection::EntryView;
pub use server::{router, ApiServer};
