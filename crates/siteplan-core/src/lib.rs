//! Siteplan Core - Domain models, configuration, and format readers
//!
//! This crate contains the domain types shared by every siteplan crate: the
//! feature collection loaded from disk, the drawn selection shape, the chat
//! transcript, and the per-session context that ties them together.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{Result, SiteplanError};
