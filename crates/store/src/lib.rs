//! Glasspane record store.
//!
//! Implements the repository and session ports of the [`domain`] crate over
//! process memory. A store is either built empty (tests) or seeded from a JSON
//! document on startup; see [`SeedDocument`] for the file layout.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Views, forms, owner profiles and sessions are owned by
//! the management application that writes them. This crate only needs to read
//! them back, plus the owner-scoped form writes behind the form-management
//! routes.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{ProfileRecord, SeedDocument, SeedError, SessionRecord};
