//! Siteplan Store - Geometry and session storage
//!
//! This crate holds the process-wide footprint layer, loaded once and
//! shared, and the per-session state store behind the session port.

pub mod geometry;
pub mod memory;
pub mod ports;

pub use geometry::GeometryStore;
pub use memory::MemorySessionStore;
pub use ports::{SessionHandle, SessionStore};
