//! Port traits implemented by infrastructure crates.
//!
//! Every collaborator the gateway talks to is reached through one of these
//! traits and injected explicitly at the composition root. There is no
//! process-wide store client: each repository is a trait object handed to the
//! operation that needs it, and owner-facing repositories take the owner id on
//! every call so that one owner can never see another's records.
//!
//! | Trait | Implemented in |
//! |-------|----------------|
//! | [`ViewRepository`], [`FormRepository`], [`ProfileRepository`], [`SessionVerifier`] | `store` |
//! | [`CredentialVault`], [`PasswordVerifier`] | `vault` |
//! | [`IssueSource`] | `tracker` |

use async_trait::async_trait;

use crate::{
    CreatedItem, Credential, EncryptedCredential, ExternalItem, Form, FormId, ItemPayload,
    ItemQuery, OwnerId, PasswordHash, Scope, ScopeMetadata, StoreError, TrackerError, VaultError,
    View, ViewSlug,
};

// ---------------------------------------------------------------------------
// Persistent store
// ---------------------------------------------------------------------------

/// Point lookups of published views.
#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Finds a view by slug, regardless of whether it is active.
    async fn find_by_slug(&self, slug: &ViewSlug) -> Result<Option<View>, StoreError>;
}

/// Owner-scoped access to submission forms.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Lists all forms of `owner`, newest first.
    async fn list_forms(&self, owner: &OwnerId) -> Result<Vec<Form>, StoreError>;

    /// Fetches one form of `owner`.
    async fn get_form(&self, owner: &OwnerId, id: &FormId) -> Result<Option<Form>, StoreError>;

    /// Inserts or replaces a form. The form's `owner` field scopes the write.
    async fn save_form(&self, form: Form) -> Result<(), StoreError>;

    /// Deletes one form of `owner`. Returns `false` if it did not exist.
    async fn delete_form(&self, owner: &OwnerId, id: &FormId) -> Result<bool, StoreError>;
}

/// Access to owner profile records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the owner's encrypted tracker credential, if one is stored.
    async fn tracker_credential(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<EncryptedCredential>, StoreError>;
}

/// Resolves owner session tokens issued by the external authentication system.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Returns the owner a bearer token belongs to, or `None` if it is unknown.
    async fn owner_for_token(&self, token: &str) -> Result<Option<OwnerId>, StoreError>;
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// Reverses the at-rest protection of owner credentials.
#[async_trait]
pub trait CredentialVault: Send + Sync {
    async fn decrypt(&self, ciphertext: &EncryptedCredential) -> Result<Credential, VaultError>;
}

/// Compares a visitor-supplied password with a stored salted hash.
///
/// Implementations are expected to be deliberately slow and must not block the
/// async executor.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, VaultError>;
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Read/write access to the external issue tracker.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches the items of a scope, optionally filtered upstream by status name.
    async fn fetch_items(
        &self,
        credential: &Credential,
        query: &ItemQuery,
    ) -> Result<Vec<ExternalItem>, TrackerError>;

    /// Fetches the workflow configuration of the team a scope resolves to.
    async fn fetch_metadata(
        &self,
        credential: &Credential,
        scope: &Scope,
    ) -> Result<ScopeMetadata, TrackerError>;

    /// Creates one item.
    async fn create_item(
        &self,
        credential: &Credential,
        payload: &ItemPayload,
    ) -> Result<CreatedItem, TrackerError>;
}
