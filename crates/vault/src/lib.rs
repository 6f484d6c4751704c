//! Glasspane secret handling.
//!
//! Implements two port traits from the [`domain`] crate:
//!
//! - [`domain::CredentialVault`] with [`AesGcmVault`]: owners' tracker API
//!   credentials are stored encrypted under one AES-256-GCM master key and
//!   decrypted per request.
//! - [`domain::PasswordVerifier`] with [`BcryptVerifier`]: view passwords are
//!   stored as salted bcrypt hashes and compared on the blocking pool.
//!
//! The encrypt and hash halves are used by the `cli` crate's owner commands
//! (`encrypt-credential`, `hash-password`); the gateway only ever decrypts and
//! verifies.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Key handling, nonce generation and encodings live here.
//! The [`domain`] crate sees only the traits.

mod credentials;
mod passwords;

pub use credentials::AesGcmVault;
pub use passwords::{hash_password, BcryptVerifier, DEFAULT_COST};
