//! Visitor-facing operations on published views.

use std::sync::Arc;

use domain::{
    registry, submission, visibility, AccessGate, CreatedItem, Credential, CredentialVault,
    ExternalItem, FormId, FormRepository, FormSummary, GatewayError, IssueSource, ItemQuery,
    OwnerId, ProfileRepository, PublicView, ScopeMetadata, Submission, Timestamp, TrackerError,
    View, ViewRepository, ViewSlug,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// The collaborators a [`ViewGateway`] is composed from.
#[derive(Clone)]
pub struct GatewayPorts {
    pub views: Arc<dyn ViewRepository>,
    pub forms: Arc<dyn FormRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub vault: Arc<dyn CredentialVault>,
    pub source: Arc<dyn IssueSource>,
    pub gate: AccessGate,
}

/// A granted view and its visible items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPage {
    pub view: PublicView,
    pub items: Vec<ExternalItem>,
}

/// A visitor's request to create an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitRequest {
    pub submission: Submission,
    pub form_id: Option<FormId>,
    pub password: Option<String>,
}

/// Orchestrates anonymous access to views.
///
/// Every operation resolves the slug, runs the access gate and only then
/// touches the owner's credential or the tracker.
#[derive(Clone)]
pub struct ViewGateway {
    ports: GatewayPorts,
}

impl ViewGateway {
    pub fn new(ports: GatewayPorts) -> Self {
        Self { ports }
    }

    /// Looks up a view by its raw slug. Slugs that cannot be valid are simply
    /// absent.
    async fn lookup(&self, slug: &str) -> Result<Option<View>, GatewayError> {
        match ViewSlug::new(slug) {
            Some(slug) => Ok(self.ports.views.find_by_slug(&slug).await?),
            None => Ok(None),
        }
    }

    async fn granted(&self, slug: &str, password: Option<&str>) -> Result<View, GatewayError> {
        let lookup = self.lookup(slug).await?;
        let decision = self
            .ports
            .gate
            .evaluate(lookup, password, Timestamp::now())
            .await?;
        debug!(decision = decision.as_str(), "access evaluated");
        decision.into_view()
    }

    async fn credential_for(&self, owner: &OwnerId) -> Result<Credential, GatewayError> {
        let sealed = self
            .ports
            .profiles
            .tracker_credential(owner)
            .await?
            .ok_or_else(|| GatewayError::upstream(format!("owner '{owner}' has no tracker credential")))?;
        Ok(self.ports.vault.decrypt(&sealed).await?)
    }

    /// Returns the view's public summary and its items minus hidden statuses.
    ///
    /// # Errors
    ///
    /// Gate outcomes as their [`GatewayError`] variants;
    /// [`GatewayError::UpstreamUnavailable`] if the credential or the tracker
    /// fails.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn read_view(
        &self,
        slug: &str,
        password: Option<&str>,
    ) -> Result<ViewPage, GatewayError> {
        let view = self.granted(slug, password).await?;
        let credential = self.credential_for(&view.owner).await?;

        let query = ItemQuery::new(view.scope.clone(), &view.allowed_statuses);
        let items = self
            .ports
            .source
            .fetch_items(&credential, &query)
            .await
            .map_err(|err| {
                warn!(error = %err, "tracker read failed");
                GatewayError::upstream(err.to_string())
            })?;
        let fetched = items.len();
        let items = visibility::apply(items, &view.hidden_statuses);
        debug!(fetched, visible = items.len(), "items filtered");

        Ok(ViewPage {
            view: view.public_summary(),
            items,
        })
    }

    /// Lists the forms a view offers, in the owner's order.
    ///
    /// Only existence and activity are checked here; the form schema is not
    /// considered sensitive. Views that do not accept submissions offer none.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn list_forms(&self, slug: &str) -> Result<Vec<FormSummary>, GatewayError> {
        let view = self
            .lookup(slug)
            .await?
            .filter(|v| v.is_active)
            .ok_or(GatewayError::NotFound)?;

        if !view.allow_submission || view.enabled_form_ids.is_empty() {
            return Ok(Vec::new());
        }

        let owner_forms = self.ports.forms.list_forms(&view.owner).await?;
        let resolution = registry::resolve(&view.enabled_form_ids, &owner_forms);
        if !resolution.dropped.is_empty() {
            debug!(dropped = resolution.dropped.len(), "stale form references skipped");
        }
        Ok(resolution.forms)
    }

    /// Returns the workflow configuration used to render the submission form.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn scope_metadata(
        &self,
        slug: &str,
        password: Option<&str>,
    ) -> Result<ScopeMetadata, GatewayError> {
        let view = self.granted(slug, password).await?;
        let credential = self.credential_for(&view.owner).await?;
        self.ports
            .source
            .fetch_metadata(&credential, &view.scope)
            .await
            .map_err(|err| {
                warn!(error = %err, "tracker metadata read failed");
                GatewayError::upstream(err.to_string())
            })
    }

    /// Validates a visitor submission and creates the item upstream.
    ///
    /// # Errors
    ///
    /// - Gate outcomes as their [`GatewayError`] variants.
    /// - [`GatewayError::Validation`] if the view does not accept submissions,
    ///   the form is not offered by the view, or the answers are incomplete.
    /// - [`GatewayError::UpstreamUnavailable`] if the credential or metadata
    ///   cannot be obtained, or the create call fails in transport.
    /// - [`GatewayError::SubmissionFailed`] if the tracker rejects the item.
    #[instrument(skip_all, fields(slug = %slug, form = ?request.form_id))]
    pub async fn submit(
        &self,
        slug: &str,
        request: SubmitRequest,
    ) -> Result<CreatedItem, GatewayError> {
        let view = self.granted(slug, request.password.as_deref()).await?;
        if !view.allow_submission {
            return Err(GatewayError::validation(
                "Issue creation is not enabled for this view",
            ));
        }

        let form = match &request.form_id {
            Some(form_id) => {
                let owner_forms = self.ports.forms.list_forms(&view.owner).await?;
                let resolution = registry::resolve(&view.enabled_form_ids, &owner_forms);
                let form = resolution
                    .find(form_id)
                    .cloned()
                    .ok_or_else(|| GatewayError::validation("Selected form is not available"))?;
                Some(form)
            }
            None => None,
        };
        let draft = submission::validate(&request.submission, form.as_ref())?;

        let credential = self.credential_for(&view.owner).await?;
        let metadata = self
            .ports
            .source
            .fetch_metadata(&credential, &view.scope)
            .await
            .map_err(|err| {
                warn!(error = %err, "tracker metadata read failed");
                GatewayError::upstream(err.to_string())
            })?;

        let payload = submission::assemble(&request.submission, draft, &view.scope, &metadata);

        let created = self
            .ports
            .source
            .create_item(&credential, &payload)
            .await
            .map_err(|err| match err {
                TrackerError::Rejected(message) => {
                    warn!(error = %message, "tracker rejected submission");
                    GatewayError::SubmissionFailed { message }
                }
                other => {
                    warn!(error = %other, "tracker create failed");
                    GatewayError::upstream(other.to_string())
                }
            })?;
        info!(identifier = %created.identifier, "item created");
        Ok(created)
    }
}
