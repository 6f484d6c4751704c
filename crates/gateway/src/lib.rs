//! Glasspane orchestration layer.
//!
//! Sequences the domain's decision functions ([`domain::AccessGate`],
//! [`domain::visibility`], [`domain::registry`], [`domain::submission`]) with
//! calls to the injected collaborators:
//!
//! - [`ViewGateway`] serves anonymous visitors: reading a view, listing its
//!   forms, reading scope metadata and submitting new items.
//! - [`FormAdmin`] serves authenticated owners: form CRUD, question-builder
//!   steps and diagnostics for stale form references.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Every collaborator arrives as a trait object at
//! construction time; nothing here knows about HTTP, bcrypt or GraphQL.

mod admin;
mod views;

#[cfg(test)]
mod testing;

pub use admin::{FormAdmin, FormDiagnostics, FormPatch, NewForm, QuestionEdit};
pub use views::{GatewayPorts, SubmitRequest, ViewGateway, ViewPage};
