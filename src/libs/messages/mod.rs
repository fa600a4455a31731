//! User-facing messages.
//!
//! All text is centralized in the [`Message`] enum; the macros in
//! [`macros`] print it to the console or, in debug mode, route it through
//! `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
