//! Mediarch Core - Shared types library.
//!
//! This crate provides common types used across all Mediarch components:
//! - `site` - Public marketing site (footer, newsletter signup, contact form)
//! - `admin` - Moderation dashboard for contact enquiries and subscriptions
//! - `backend` - Supabase client and the view models driving both surfaces
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and IDs, record statuses, the
//!   two record kinds, and the status badge lookup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
