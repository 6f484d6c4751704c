//! In-memory repositories.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    EncryptedCredential, Form, FormId, FormRepository, OwnerId, ProfileRepository,
    SessionVerifier, StoreError, View, ViewRepository, ViewSlug,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::seed::{SeedDocument, SeedError};

/// Holds views, forms, profiles and sessions in process memory.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    views: Arc<RwLock<HashMap<ViewSlug, View>>>,
    forms: Arc<RwLock<HashMap<FormId, Form>>>,
    credentials: Arc<RwLock<HashMap<OwnerId, EncryptedCredential>>>,
    sessions: Arc<RwLock<HashMap<String, OwnerId>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the records of `seed`.
    ///
    /// Form question order is normalised on the way in.
    pub fn from_seed(seed: SeedDocument) -> Result<Self, SeedError> {
        let mut views = HashMap::with_capacity(seed.views.len());
        for view in seed.views {
            let slug = view.slug.clone();
            if views.insert(slug.clone(), view).is_some() {
                return Err(SeedError::DuplicateSlug(slug.to_string()));
            }
        }

        let forms = seed
            .forms
            .into_iter()
            .map(|mut form| {
                form.normalize_order();
                (form.id.clone(), form)
            })
            .collect();

        let credentials = seed
            .profiles
            .into_iter()
            .filter_map(|p| p.tracker_credential.map(|c| (p.owner, c)))
            .collect();

        let sessions = seed
            .sessions
            .into_iter()
            .map(|s| (s.token, s.owner))
            .collect();

        Ok(Self {
            views: Arc::new(RwLock::new(views)),
            forms: Arc::new(RwLock::new(forms)),
            credentials: Arc::new(RwLock::new(credentials)),
            sessions: Arc::new(RwLock::new(sessions)),
        })
    }

    /// Loads a seed file and builds a store from it.
    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let store = Self::from_seed(SeedDocument::load(path).await?)?;
        info!(
            path = %path.display(),
            views = store.views.read().await.len(),
            forms = store.forms.read().await.len(),
            "record store seeded"
        );
        Ok(store)
    }

    /// Inserts or replaces a view.
    pub async fn put_view(&self, view: View) {
        self.views.write().await.insert(view.slug.clone(), view);
    }

    /// Stores an owner's encrypted tracker credential.
    pub async fn put_credential(&self, owner: OwnerId, credential: EncryptedCredential) {
        self.credentials.write().await.insert(owner, credential);
    }

    /// Registers a session token for an owner.
    pub async fn put_session(&self, token: impl Into<String>, owner: OwnerId) {
        self.sessions.write().await.insert(token.into(), owner);
    }
}

#[async_trait]
impl ViewRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &ViewSlug) -> Result<Option<View>, StoreError> {
        Ok(self.views.read().await.get(slug).cloned())
    }
}

#[async_trait]
impl FormRepository for MemoryStore {
    async fn list_forms(&self, owner: &OwnerId) -> Result<Vec<Form>, StoreError> {
        let forms = self.forms.read().await;
        let mut owned: Vec<Form> = forms.values().filter(|f| &f.owner == owner).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get_form(&self, owner: &OwnerId, id: &FormId) -> Result<Option<Form>, StoreError> {
        let forms = self.forms.read().await;
        Ok(forms.get(id).filter(|f| &f.owner == owner).cloned())
    }

    async fn save_form(&self, mut form: Form) -> Result<(), StoreError> {
        let mut forms = self.forms.write().await;
        if let Some(existing) = forms.get(&form.id) {
            if existing.owner != form.owner {
                return Err(StoreError::Conflict(format!(
                    "form '{}' belongs to another owner",
                    form.id
                )));
            }
        }
        form.normalize_order();
        forms.insert(form.id.clone(), form);
        Ok(())
    }

    async fn delete_form(&self, owner: &OwnerId, id: &FormId) -> Result<bool, StoreError> {
        let mut forms = self.forms.write().await;
        match forms.get(id) {
            Some(form) if &form.owner == owner => {
                forms.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn tracker_credential(
        &self,
        owner: &OwnerId,
    ) -> Result<Option<EncryptedCredential>, StoreError> {
        Ok(self.credentials.read().await.get(owner).cloned())
    }
}

#[async_trait]
impl SessionVerifier for MemoryStore {
    async fn owner_for_token(&self, token: &str) -> Result<Option<OwnerId>, StoreError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }
}
