//! Application-level orchestration utilities.
//!
//! Owns the wizard session task lifecycle. UI/CLI layers go through the
//! [`SessionHandle`] instead of spawning the session themselves, so startup
//! and shutdown behave the same in every mode.

mod controller;

pub use controller::{spawn_session, SessionHandle};
