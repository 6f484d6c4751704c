//! Error taxonomy for the Glasspane domain.
//!
//! [`GatewayError`] is the single error type returned by every gateway
//! operation. Gate outcomes (`NotFound`, `Expired`, `PasswordRequired`,
//! `InvalidPassword`) are variants of it so that the HTTP boundary can map each
//! to a distinct, stable response shape without parsing text.
//!
//! Collaborator errors ([`StoreError`], [`VaultError`], [`TrackerError`]) are
//! produced by the adapter crates and folded into [`GatewayError`] by the
//! orchestration layer. None of them is retried automatically.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// The originating class of a failure, reported to callers alongside the
/// message so they can branch without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// The view is missing, expired, or needs (a correct) password.
    Access,
    /// The caller's input was rejected before anything was sent upstream.
    Validation,
    /// The tracker, the credential vault, or the store could not serve the request.
    Upstream,
    /// An inconsistency inside Glasspane's own records.
    Internal,
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Every way a gateway operation can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// No active view matches the slug.
    ///
    /// Inactive views produce this too; their existence is never revealed.
    #[error("Public view not found or inactive")]
    NotFound,

    /// The view's expiry time has passed.
    #[error("This public view has expired")]
    Expired,

    /// The view is password protected and no password was supplied.
    #[error("Password required")]
    PasswordRequired,

    /// The supplied password does not match the view's hash.
    #[error("Invalid password")]
    InvalidPassword,

    /// The caller's input was rejected (missing title, unanswered required
    /// question, submissions disabled, unknown form).
    #[error("{message}")]
    Validation {
        /// Human-readable description, safe to show to the visitor.
        message: String,
    },

    /// A collaborator needed to serve the request failed: the owner's
    /// credential is missing or undecryptable, the store is unreachable, or the
    /// tracker rejected a read.
    ///
    /// `reason` is for logs only; the boundary shows a generic message.
    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable {
        /// Internal detail. Never echoed to visitors.
        reason: String,
    },

    /// The tracker rejected a well-formed submission.
    #[error("{message}")]
    SubmissionFailed {
        /// The adapter's error message, verbatim.
        message: String,
    },

    /// A stored record violates an invariant the store is meant to uphold
    /// (e.g. a password-protected view without a hash).
    #[error("Store integrity fault: {detail}")]
    StoreIntegrity {
        /// Description of the violated invariant.
        detail: String,
    },

    /// The owner has no form with the requested id.
    #[error("Not found")]
    FormNotFound,

    /// An owner-facing call was made without a valid session.
    #[error("Unauthorised")]
    Unauthorized,
}

impl GatewayError {
    /// Convenience constructor for [`GatewayError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`GatewayError::UpstreamUnavailable`].
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns the originating class of this failure.
    pub fn class(&self) -> FailureClass {
        match self {
            GatewayError::NotFound
            | GatewayError::Expired
            | GatewayError::PasswordRequired
            | GatewayError::InvalidPassword
            | GatewayError::FormNotFound
            | GatewayError::Unauthorized => FailureClass::Access,
            GatewayError::Validation { .. } => FailureClass::Validation,
            GatewayError::UpstreamUnavailable { .. } | GatewayError::SubmissionFailed { .. } => {
                FailureClass::Upstream
            }
            GatewayError::StoreIntegrity { .. } => FailureClass::Internal,
        }
    }

    /// Returns `true` if the visitor should be prompted for a password.
    pub fn requires_password(&self) -> bool {
        matches!(
            self,
            GatewayError::PasswordRequired | GatewayError::InvalidPassword
        )
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failures reported by a repository implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached or returned an error.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write would overwrite a record belonging to someone else, or reuse a
    /// unique key.
    #[error("conflicting record: {0}")]
    Conflict(String),

    /// A record could not be decoded.
    #[error("malformed record '{id}': {detail}")]
    Malformed {
        /// Identifier of the offending record.
        id: String,
        /// Decoder message.
        detail: String,
    },
}

/// Failures reported by a credential vault or password verifier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VaultError {
    /// The ciphertext is not in the expected encoding or failed authentication.
    #[error("credential could not be decrypted")]
    Decryption,

    /// The vault key is missing or has the wrong length.
    #[error("vault key invalid: {0}")]
    Key(String),

    /// A stored password hash could not be parsed.
    #[error("password hash malformed: {0}")]
    MalformedHash(String),

    /// A blocking worker failed before returning a result.
    #[error("vault worker failed: {0}")]
    Worker(String),
}

/// Failures reported by the issue source adapter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    /// Transport failure (DNS, TLS, connection reset, non-2xx status).
    #[error("tracker request failed: {0}")]
    Transport(String),

    /// The tracker answered with GraphQL errors or `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The tracker answered with a payload that could not be decoded.
    #[error("unexpected tracker response: {0}")]
    Decode(String),

    /// The requested project or team does not exist (or the credential cannot see it).
    #[error("scope not found: {0}")]
    ScopeNotFound(String),
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        GatewayError::upstream(err.to_string())
    }
}

impl From<VaultError> for GatewayError {
    fn from(err: VaultError) -> Self {
        GatewayError::upstream(err.to_string())
    }
}
