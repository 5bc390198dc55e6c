//! Core types for Mediarch.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod badge;
pub mod email;
pub mod id;
pub mod record;
pub mod status;

pub use badge::{StatusBadge, Tone, status_badge};
pub use email::{Email, EmailError};
pub use id::*;
pub use record::{Contact, NewContact, NewSubscription, NewsletterSubscription};
pub use status::*;
