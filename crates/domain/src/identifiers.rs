//! Newtype domain identifiers.
//!
//! Every record that has an identity is represented as a distinct newtype
//! wrapping a string. This prevents accidentally interchanging, for example, a
//! [`FormId`] with a [`QuestionId`] even though both are strings on the wire.
//!
//! Identifiers minted by Glasspane itself (forms, questions) are UUID v4 values
//! rendered as strings so that they round-trip through the store unchanged.
//! Identifiers minted by the tracker (items, states, users, labels) are opaque.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for identifiers Glasspane generates itself.
// Adds generate() on top of string_id!.
// ---------------------------------------------------------------------------
macro_rules! generated_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        string_id! {
            $(#[$attr])*
            $name
        }

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: Glasspane records
// ---------------------------------------------------------------------------

string_id! {
    /// Public, owner-chosen, unique identifier of a published view.
    ///
    /// Slugs are immutable once a view exists; they form the stable link handed
    /// to visitors (`/view/{slug}`).
    ViewSlug
}

generated_id! {
    /// Internal identifier of a published view record.
    ViewId
}

string_id! {
    /// Identifies the workspace owner who created a view or form.
    ///
    /// Issued by the owner's authentication system; Glasspane never mints one.
    OwnerId
}

generated_id! {
    /// Identifies an owner-authored submission form.
    FormId
}

generated_id! {
    /// Identifies one question within a form.
    QuestionId
}

// ---------------------------------------------------------------------------
// Identifiers: tracker-assigned
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a project in the tracker.
    ProjectId
}

string_id! {
    /// Identifies a team in the tracker.
    TeamId
}

string_id! {
    /// Identifies an item (issue) in the tracker.
    ItemId
}

string_id! {
    /// Identifies a workflow state (board column) in the tracker.
    StateId
}

string_id! {
    /// Identifies a tracker user that an item can be assigned to.
    UserId
}

string_id! {
    /// Identifies a tracker label.
    LabelId
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single inbound request.
///
/// Generated fresh for every request handled by the gateway and attached to its
/// tracing span so all activity from one request can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
