//! Fakes for the gateway's tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{
    AccessGate, CreatedItem, Credential, CredentialVault, DisplaySettings, EncryptedCredential,
    ExternalItem, Form, FormId, FormRepository, IssueSource, ItemId, ItemPayload, ItemQuery,
    ItemStatus, OwnerId, PasswordHash, PasswordVerifier, Priority, Question, Scope, ScopeMetadata,
    StateId, StateKind, StatusSet, TeamId, Timestamp, TrackerError, VaultError, View, ViewId,
    ViewSlug, WorkflowState,
};
use store::{MemoryStore, ProfileRecord, SeedDocument, SessionRecord};

use crate::{FormAdmin, GatewayPorts, ViewGateway};

pub const OWNER: &str = "owner-1";
pub const TOKEN: &str = "session-token";

/// An active, unprotected, non-expiring view on `team-1` owned by [`OWNER`].
pub fn open_view(slug: &str) -> View {
    View {
        id: ViewId::generate(),
        slug: ViewSlug::new(slug).unwrap(),
        owner: OwnerId::new(OWNER).unwrap(),
        name: format!("{slug} view"),
        title: "Roadmap".into(),
        description: None,
        is_active: true,
        expires_at: None,
        password_protected: false,
        password_hash: None,
        hidden_statuses: StatusSet::new(),
        allowed_statuses: StatusSet::new(),
        allow_submission: false,
        enabled_form_ids: Vec::new(),
        scope: Scope::Team(TeamId::new("team-1").unwrap()),
        scope_name: Some("Platform".into()),
        display: DisplaySettings::default(),
        created_at: Timestamp::now(),
    }
}

/// `plain:<password>` is the hash of `<password>` for [`PlainVerifier`].
pub fn plain_hash(password: &str) -> PasswordHash {
    PasswordHash::new(format!("plain:{password}"))
}

pub struct PlainVerifier;

#[async_trait]
impl PasswordVerifier for PlainVerifier {
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, VaultError> {
        hash.as_str()
            .strip_prefix("plain:")
            .map(|expected| expected == password)
            .ok_or_else(|| VaultError::MalformedHash("missing plain: prefix".into()))
    }
}

/// Stores credentials in the clear.
pub struct OpenVault;

#[async_trait]
impl CredentialVault for OpenVault {
    async fn decrypt(&self, ciphertext: &EncryptedCredential) -> Result<Credential, VaultError> {
        Ok(Credential::new(ciphertext.as_str()))
    }
}

#[derive(Default)]
struct SourceState {
    items: Vec<ExternalItem>,
    read_error: Option<TrackerError>,
    create_error: Option<TrackerError>,
    created: Vec<ItemPayload>,
    reads: usize,
    last_filter: Option<Option<StatusSet>>,
}

/// Records what it is asked and answers from canned data.
#[derive(Default)]
pub struct FakeSource {
    state: Mutex<SourceState>,
}

impl FakeSource {
    /// Replaces the canned items with one item per status name.
    pub fn set_items(&self, statuses: &[&str]) {
        let now = Timestamp::now();
        self.state.lock().unwrap().items = statuses
            .iter()
            .enumerate()
            .map(|(n, status)| ExternalItem {
                id: ItemId::new(format!("item-{n}")).unwrap(),
                identifier: format!("ENG-{n}"),
                title: format!("Item {n}"),
                description: None,
                status: ItemStatus {
                    id: StateId::new(format!("s-{status}")).unwrap(),
                    name: (*status).to_string(),
                    kind: StateKind::Started,
                    color: None,
                },
                assignee: None,
                labels: Vec::new(),
                priority: Priority::NONE,
                url: None,
                created_at: now,
                updated_at: now,
            })
            .collect();
    }

    pub fn fail_reads(&self, err: TrackerError) {
        self.state.lock().unwrap().read_error = Some(err);
    }

    pub fn fail_creates(&self, err: TrackerError) {
        self.state.lock().unwrap().create_error = Some(err);
    }

    pub fn created(&self) -> Vec<ItemPayload> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub fn last_filter(&self) -> Option<Option<StatusSet>> {
        self.state.lock().unwrap().last_filter.clone()
    }

    fn metadata(team: TeamId) -> ScopeMetadata {
        let triage = WorkflowState {
            id: StateId::new("s-triage").unwrap(),
            name: "Triage".into(),
            kind: StateKind::Triage,
            color: None,
            position: 0.0,
        };
        let todo = WorkflowState {
            id: StateId::new("s-todo").unwrap(),
            name: "Todo".into(),
            kind: StateKind::Unstarted,
            color: None,
            position: 1.0,
        };
        ScopeMetadata {
            team_id: team,
            states: vec![triage.clone(), todo],
            triage_enabled: true,
            triage_state: Some(triage),
            members: Vec::new(),
            labels: Vec::new(),
        }
    }
}

#[async_trait]
impl IssueSource for FakeSource {
    async fn fetch_items(
        &self,
        _credential: &Credential,
        query: &ItemQuery,
    ) -> Result<Vec<ExternalItem>, TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        state.last_filter = Some(query.status_filter.clone());
        match &state.read_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.items.clone()),
        }
    }

    async fn fetch_metadata(
        &self,
        _credential: &Credential,
        scope: &Scope,
    ) -> Result<ScopeMetadata, TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if let Some(err) = &state.read_error {
            return Err(err.clone());
        }
        let team = match scope {
            Scope::Team(team) => team.clone(),
            Scope::Project(_) => TeamId::new("team-of-project").unwrap(),
        };
        Ok(Self::metadata(team))
    }

    async fn create_item(
        &self,
        _credential: &Credential,
        payload: &ItemPayload,
    ) -> Result<CreatedItem, TrackerError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.create_error {
            return Err(err.clone());
        }
        state.created.push(payload.clone());
        let number = 99 + state.created.len();
        Ok(CreatedItem {
            id: ItemId::new(format!("created-{number}")).unwrap(),
            identifier: format!("ENG-{number}"),
            url: None,
        })
    }
}

/// A store, a tracker fake and the wiring between them.
pub struct Harness {
    pub store: MemoryStore,
    pub source: Arc<FakeSource>,
}

impl Harness {
    /// [`OWNER`] has a credential and a session under [`TOKEN`].
    pub fn new() -> Self {
        Self::with_profiles(vec![ProfileRecord {
            owner: OwnerId::new(OWNER).unwrap(),
            tracker_credential: Some(EncryptedCredential::new("lin_api_test")),
        }])
    }

    pub fn without_credential() -> Self {
        Self::with_profiles(Vec::new())
    }

    fn with_profiles(profiles: Vec<ProfileRecord>) -> Self {
        let seed = SeedDocument {
            profiles,
            sessions: vec![SessionRecord {
                token: TOKEN.into(),
                owner: OwnerId::new(OWNER).unwrap(),
            }],
            ..SeedDocument::default()
        };
        Self {
            store: MemoryStore::from_seed(seed).unwrap(),
            source: Arc::new(FakeSource::default()),
        }
    }

    pub fn gateway(&self) -> ViewGateway {
        let store = Arc::new(self.store.clone());
        ViewGateway::new(GatewayPorts {
            views: store.clone(),
            forms: store.clone(),
            profiles: store,
            vault: Arc::new(OpenVault),
            source: self.source.clone(),
            gate: AccessGate::new(Arc::new(PlainVerifier)),
        })
    }

    pub fn admin(&self) -> FormAdmin {
        let store = Arc::new(self.store.clone());
        FormAdmin::new(store.clone(), store.clone(), store)
    }

    /// Saves a form of [`OWNER`] and returns its id.
    pub async fn save_form(&self, name: &str, questions: Vec<Question>) -> FormId {
        let mut form = Form::new(OwnerId::new(OWNER).unwrap(), name).unwrap();
        form.replace_questions(questions);
        let id = form.id.clone();
        self.store.save_form(form).await.unwrap();
        id
    }
}
