//! Shared utilities for the Foyer contact gateway.

pub mod logging;
pub mod time;

pub use logging::init_tracing;
pub use time::format_iso8601;
