//! Glasspane issue tracker adapter.
//!
//! Implements [`domain::IssueSource`] with [`LinearClient`], which talks to
//! Linear's GraphQL API using the view owner's decrypted API key:
//!
//! - `fetch_items` pages through `issues` with a project or team filter and the
//!   optional state-name filter;
//! - `fetch_metadata` reads a team's workflow states, triage settings, members
//!   and labels (a project resolves to its first team);
//! - `create_item` runs `issueCreate`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. GraphQL
//! documents, pagination and error decoding are handled here; the [`domain`]
//! crate never sees them.

mod client;
mod graphql;
mod wire;

pub use client::{LinearClient, TrackerSettings};
