//! Session-stored types for the admin dashboard.

pub mod session;

pub use session::{AdminSession, session_keys};
