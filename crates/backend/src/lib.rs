//! Mediarch backend library.
//!
//! Everything both binaries need to talk to the hosted backend and to drive
//! their surfaces:
//!
//! - [`store`] / [`auth`] - The data-store and authentication seams
//! - [`supabase`] - `PostgREST` + `GoTrue` implementation of those seams
//! - [`memory`] - In-process implementation used by tests
//! - [`newsletter`] / [`contact_form`] - Public form workflows
//! - [`dashboard`] - Admin moderation view model
//! - [`config`] - Environment loading helpers shared by the binaries
//!
//! # Control Flow
//!
//! Every user action is: validate locally, issue one remote call, then update
//! local view state from the result. Nothing is retried.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod contact_form;
pub mod dashboard;
pub mod error;
pub mod memory;
pub mod newsletter;
pub mod notice;
pub mod store;
pub mod supabase;

pub use auth::{AdminIdentity, AuthContext, AuthProvider, AuthSession};
pub use error::{AuthError, StoreError};
pub use memory::MemoryBackend;
pub use notice::{Notice, NoticeVariant};
pub use store::{DataStore, StoreProvider};
pub use supabase::SupabaseClient;
