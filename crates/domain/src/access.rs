//! The access gate: may an anonymous request see a view?
//!
//! The gate is a decision function over a store lookup result, an optional
//! visitor password and the current time. It has no side effects. Checks run
//! in one canonical order for every entry point:
//!
//! 1. missing or inactive view → [`AccessDecision::NotFound`]
//! 2. expiry strictly in the past → [`AccessDecision::Expired`]
//! 3. password protection → [`AccessDecision::PasswordRequired`] /
//!    [`AccessDecision::InvalidPassword`]
//! 4. otherwise [`AccessDecision::Granted`]

use std::sync::Arc;

use tracing::debug;

use crate::{GatewayError, PasswordVerifier, Timestamp, VaultError, View};

/// Outcome of evaluating a request against a view.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Granted(Box<View>),
    NotFound,
    Expired,
    PasswordRequired,
    InvalidPassword,
}

impl AccessDecision {
    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Granted(_) => "granted",
            AccessDecision::NotFound => "not_found",
            AccessDecision::Expired => "expired",
            AccessDecision::PasswordRequired => "password_required",
            AccessDecision::InvalidPassword => "invalid_password",
        }
    }

    /// Converts the decision into the granted view or the matching error.
    pub fn into_view(self) -> Result<View, GatewayError> {
        match self {
            AccessDecision::Granted(view) => Ok(*view),
            AccessDecision::NotFound => Err(GatewayError::NotFound),
            AccessDecision::Expired => Err(GatewayError::Expired),
            AccessDecision::PasswordRequired => Err(GatewayError::PasswordRequired),
            AccessDecision::InvalidPassword => Err(GatewayError::InvalidPassword),
        }
    }
}

/// Evaluates access to views.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn PasswordVerifier>,
}

impl AccessGate {
    pub fn new(verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self { verifier }
    }

    /// Decides whether a request carrying `password` may see `lookup` at `now`.
    ///
    /// An empty password counts as no password.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::StoreIntegrity`] if a protected view has no usable hash.
    /// - [`GatewayError::UpstreamUnavailable`] if the verifier itself fails.
    pub async fn evaluate(
        &self,
        lookup: Option<View>,
        password: Option<&str>,
        now: Timestamp,
    ) -> Result<AccessDecision, GatewayError> {
        let Some(view) = lookup.filter(|v| v.is_active) else {
            return Ok(AccessDecision::NotFound);
        };

        if view.is_expired_at(now) {
            return Ok(AccessDecision::Expired);
        }

        if view.password_protected {
            let Some(hash) = view.password_hash.as_ref() else {
                return Err(GatewayError::StoreIntegrity {
                    detail: format!("view '{}' is password protected but has no hash", view.slug),
                });
            };
            let Some(password) = password.filter(|p| !p.is_empty()) else {
                return Ok(AccessDecision::PasswordRequired);
            };
            let matches = self
                .verifier
                .verify(password, hash)
                .await
                .map_err(|err| match err {
                    VaultError::MalformedHash(detail) => GatewayError::StoreIntegrity {
                        detail: format!("view '{}' has a malformed password hash: {detail}", view.slug),
                    },
                    other => GatewayError::upstream(other.to_string()),
                })?;
            if !matches {
                debug!(slug = %view.slug, "password mismatch");
                return Ok(AccessDecision::InvalidPassword);
            }
        } else if view.password_hash.is_some() {
            return Err(GatewayError::StoreIntegrity {
                detail: format!("view '{}' has a password hash but is not protected", view.slug),
            });
        }

        Ok(AccessDecision::Granted(Box::new(view)))
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use rstest::rstest;

    use super::testing::{plain_hash, PlainVerifier};
    use super::*;
    use crate::view::fixtures::open_view;

    fn gate() -> AccessGate {
        AccessGate::new(Arc::new(PlainVerifier))
    }

    fn protected(slug: &str, password: &str) -> View {
        let mut view = open_view(slug);
        view.password_protected = true;
        view.password_hash = Some(plain_hash(password));
        view
    }

    fn yesterday(now: Timestamp) -> Timestamp {
        Timestamp::from_utc(now.as_datetime() - Duration::days(1))
    }

    #[rstest]
    #[case(None)]
    #[case(Some("secret123"))]
    #[case(Some("anything"))]
    #[tokio::test]
    async fn missing_views_are_not_found_whatever_the_password(#[case] password: Option<&str>) {
        let decision = gate().evaluate(None, password, Timestamp::now()).await.unwrap();
        assert_eq!(decision, AccessDecision::NotFound);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("secret123"))]
    #[tokio::test]
    async fn inactive_views_look_missing(#[case] password: Option<&str>) {
        let mut view = protected("v0", "secret123");
        view.is_active = false;
        let decision = gate().evaluate(Some(view), password, Timestamp::now()).await.unwrap();
        assert_eq!(decision, AccessDecision::NotFound);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("wrong"))]
    #[case(Some("secret123"))]
    #[tokio::test]
    async fn expiry_wins_over_any_password(#[case] password: Option<&str>) {
        let now = Timestamp::now();
        let mut view = protected("v3", "secret123");
        view.expires_at = Some(yesterday(now));
        let decision = gate().evaluate(Some(view), password, now).await.unwrap();
        assert_eq!(decision, AccessDecision::Expired);
    }

    #[tokio::test]
    async fn protected_view_requires_the_right_password() {
        let now = Timestamp::now();
        let view = protected("v2", "secret123");

        let without = gate().evaluate(Some(view.clone()), None, now).await.unwrap();
        assert_eq!(without, AccessDecision::PasswordRequired);

        let empty = gate().evaluate(Some(view.clone()), Some(""), now).await.unwrap();
        assert_eq!(empty, AccessDecision::PasswordRequired);

        let wrong = gate().evaluate(Some(view.clone()), Some("wrong"), now).await.unwrap();
        assert_eq!(wrong, AccessDecision::InvalidPassword);

        let right = gate().evaluate(Some(view.clone()), Some("secret123"), now).await.unwrap();
        assert_eq!(right, AccessDecision::Granted(Box::new(view)));
    }

    #[tokio::test]
    async fn open_view_is_granted_and_ignores_passwords() {
        let view = open_view("v1");
        let decision = gate()
            .evaluate(Some(view.clone()), Some("whatever"), Timestamp::now())
            .await
            .unwrap();
        assert_eq!(decision.into_view().unwrap(), view);
    }

    #[tokio::test]
    async fn future_expiry_does_not_block() {
        let now = Timestamp::now();
        let mut view = open_view("v4");
        view.expires_at = Some(Timestamp::from_utc(now.as_datetime() + Duration::days(1)));
        let decision = gate().evaluate(Some(view), None, now).await.unwrap();
        assert_eq!(decision.as_str(), "granted");
    }

    #[tokio::test]
    async fn protected_view_without_hash_is_an_integrity_fault() {
        let mut view = open_view("broken");
        view.password_protected = true;
        let err = gate()
            .evaluate(Some(view), Some("x"), Timestamp::now())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::StoreIntegrity { .. }));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_integrity_fault() {
        let mut view = protected("bad-hash", "x");
        view.password_hash = Some(crate::PasswordHash::new("not-a-hash"));
        let err = gate()
            .evaluate(Some(view), Some("x"), Timestamp::now())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::StoreIntegrity { .. }));
    }
}
