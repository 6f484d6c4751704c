//! Owner-facing form management.
//!
//! Every call carries the owner id obtained from [`FormAdmin::authenticate`];
//! the repository is queried with it so owners only ever touch their own forms.

use std::sync::Arc;

use domain::{
    registry, Form, FormId, FormRepository, GatewayError, OwnerId, Question, QuestionId,
    QuestionKind, QuestionUpdate, SessionVerifier, Timestamp, ViewRepository, ViewSlug,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A new form as submitted by its owner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
}

/// One step of the question builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuestionEdit {
    /// Appends a new optional question.
    Add {
        #[serde(default)]
        kind: QuestionKind,
        #[serde(default)]
        label: String,
    },
    Remove { id: QuestionId },
    MoveUp { id: QuestionId },
    MoveDown { id: QuestionId },
    Update {
        id: QuestionId,
        #[serde(flatten)]
        update: QuestionUpdate,
    },
}

/// Enabled-form references of a view that no longer resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDiagnostics {
    pub slug: ViewSlug,
    pub enabled: usize,
    pub resolved: usize,
    pub dropped: Vec<FormId>,
}

/// Owner operations on submission forms.
#[derive(Clone)]
pub struct FormAdmin {
    forms: Arc<dyn FormRepository>,
    views: Arc<dyn ViewRepository>,
    sessions: Arc<dyn SessionVerifier>,
}

impl FormAdmin {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        views: Arc<dyn ViewRepository>,
        sessions: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            forms,
            views,
            sessions,
        }
    }

    /// Resolves a bearer token to its owner.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unauthorized`] for a missing, blank or unknown token.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<OwnerId, GatewayError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(GatewayError::Unauthorized);
        };
        self.sessions
            .owner_for_token(token)
            .await?
            .ok_or(GatewayError::Unauthorized)
    }

    /// All forms of `owner`, newest first.
    #[instrument(skip_all, fields(owner = %owner))]
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<Form>, GatewayError> {
        Ok(self.forms.list_forms(owner).await?)
    }

    #[instrument(skip_all, fields(owner = %owner, form = %id))]
    pub async fn get(&self, owner: &OwnerId, id: &FormId) -> Result<Form, GatewayError> {
        self.forms
            .get_form(owner, id)
            .await?
            .ok_or(GatewayError::FormNotFound)
    }

    /// Creates a form. The name is required and stored trimmed.
    #[instrument(skip_all, fields(owner = %owner))]
    pub async fn create(&self, owner: &OwnerId, new: NewForm) -> Result<Form, GatewayError> {
        let mut form = Form::new(owner.clone(), &new.name)?;
        form.replace_questions(new.questions);
        self.forms.save_form(form.clone()).await?;
        info!(form = %form.id, "form created");
        Ok(form)
    }

    /// Applies a partial update.
    #[instrument(skip_all, fields(owner = %owner, form = %id))]
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: &FormId,
        patch: FormPatch,
    ) -> Result<Form, GatewayError> {
        let mut form = self.get(owner, id).await?;
        if let Some(name) = patch.name {
            form.rename(&name)?;
        }
        if let Some(questions) = patch.questions {
            form.replace_questions(questions);
        }
        self.store(form).await
    }

    /// Applies one question-builder step. Steps naming an unknown question
    /// leave the form unchanged.
    #[instrument(skip_all, fields(owner = %owner, form = %id))]
    pub async fn edit_question(
        &self,
        owner: &OwnerId,
        id: &FormId,
        edit: QuestionEdit,
    ) -> Result<Form, GatewayError> {
        let mut form = self.get(owner, id).await?;
        let changed = match edit {
            QuestionEdit::Add { kind, label } => {
                form.add_question(Question::new(kind, label));
                true
            }
            QuestionEdit::Remove { id } => form.remove_question(&id),
            QuestionEdit::MoveUp { id } => form.move_question_up(&id),
            QuestionEdit::MoveDown { id } => form.move_question_down(&id),
            QuestionEdit::Update { id, update } => form.update_question(&id, update),
        };
        if changed {
            self.store(form).await
        } else {
            Ok(form)
        }
    }

    /// Deletes a form. Deleting an absent form is not an error.
    #[instrument(skip_all, fields(owner = %owner, form = %id))]
    pub async fn delete(&self, owner: &OwnerId, id: &FormId) -> Result<bool, GatewayError> {
        let deleted = self.forms.delete_form(owner, id).await?;
        if deleted {
            info!("form deleted");
        }
        Ok(deleted)
    }

    /// Reports which of a view's enabled form ids no longer resolve.
    ///
    /// Views belonging to someone else are reported as not found.
    #[instrument(skip_all, fields(owner = %owner, slug = %slug))]
    pub async fn form_diagnostics(
        &self,
        owner: &OwnerId,
        slug: &str,
    ) -> Result<FormDiagnostics, GatewayError> {
        let view = match ViewSlug::new(slug) {
            Some(slug) => self.views.find_by_slug(&slug).await?,
            None => None,
        }
        .filter(|v| &v.owner == owner)
        .ok_or(GatewayError::NotFound)?;

        let owner_forms = self.forms.list_forms(owner).await?;
        let resolution = registry::resolve(&view.enabled_form_ids, &owner_forms);
        Ok(FormDiagnostics {
            slug: view.slug,
            enabled: view.enabled_form_ids.len(),
            resolved: resolution.forms.len(),
            dropped: resolution.dropped,
        })
    }

    async fn store(&self, mut form: Form) -> Result<Form, GatewayError> {
        form.updated_at = Timestamp::now();
        self.forms.save_form(form.clone()).await?;
        Ok(form)
    }
}
