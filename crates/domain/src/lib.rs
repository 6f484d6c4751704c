//! Core domain for Glasspane.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type and error type used throughout the gateway, together with the pure
//! decision logic: the access gate, the visibility filter, the form registry
//! and the submission builder. Infrastructure crates implement the port traits
//! defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ViewSlug`, `FormId`, `StateId`, etc.) |
//! | [`types`] | Shared value types (`Timestamp`, `Scope`, `Priority`, `StatusSet`, secrets) |
//! | [`errors`] | `GatewayError`, `FailureClass` and collaborator error types |
//! | [`view`] | Published views and their visitor-facing projection |
//! | [`form`] | Forms, questions and the question-builder operations |
//! | [`item`] | Tracker projections and the item-creation payload |
//! | [`ports`] | Collaborator traits |
//! | [`access`] | The access gate |
//! | [`visibility`] | Hidden-status filtering |
//! | [`registry`] | Enabled-form resolution |
//! | [`submission`] | Submission validation and payload assembly |

pub mod access;
pub mod errors;
pub mod form;
pub mod identifiers;
pub mod item;
pub mod ports;
pub mod registry;
pub mod submission;
pub mod types;
pub mod view;
pub mod visibility;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use access::{AccessDecision, AccessGate};
pub use errors::{FailureClass, GatewayError, StoreError, TrackerError, VaultError};
pub use form::{Form, FormSummary, Question, QuestionKind, QuestionUpdate};
pub use identifiers::{
    FormId, ItemId, LabelId, OwnerId, ProjectId, QuestionId, RequestId, StateId, TeamId, UserId,
    ViewId, ViewSlug,
};
pub use item::{
    sort_states_by_position, CreatedItem, ExternalItem, ItemPayload, ItemQuery, ItemStatus, Label,
    Person, ScopeMetadata, StateKind, WorkflowState,
};
pub use ports::{
    CredentialVault, FormRepository, IssueSource, PasswordVerifier, ProfileRepository,
    SessionVerifier, ViewRepository,
};
pub use registry::Resolution;
pub use submission::Submission;
pub use types::{
    Credential, EncryptedCredential, PasswordHash, Priority, Scope, StatusSet, Timestamp,
};
pub use view::{DisplaySettings, PublicView, View};
