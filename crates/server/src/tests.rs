//! Route tests over the full stack with an in-memory store and a fake tracker.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain::{
    AccessGate, CreatedItem, Credential, DisplaySettings, ExternalItem, Form, FormRepository,
    IssueSource, ItemId, ItemPayload, ItemQuery, ItemStatus, OwnerId, Priority, Question,
    QuestionKind, Scope, ScopeMetadata, StateId, StateKind, StatusSet, TeamId, Timestamp,
    TrackerError, View, ViewId, ViewSlug, WorkflowState,
};
use gateway::{FormAdmin, GatewayPorts, ViewGateway};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use store::MemoryStore;
use tower::ServiceExt;
use vault::{hash_password, AesGcmVault, BcryptVerifier};

use crate::{create_router, AppState};

const OWNER: &str = "owner-1";
const TOKEN: &str = "owner-session";
const API_KEY: &str = "lin_api_test";

#[derive(Default)]
struct RecordingTracker {
    seen_credentials: Mutex<Vec<String>>,
    created: Mutex<Vec<ItemPayload>>,
}

#[async_trait]
impl IssueSource for RecordingTracker {
    async fn fetch_items(
        &self,
        credential: &Credential,
        _query: &ItemQuery,
    ) -> Result<Vec<ExternalItem>, TrackerError> {
        self.seen_credentials
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        let now = Timestamp::now();
        Ok(["Todo", "Done", "In Progress"]
            .iter()
            .enumerate()
            .map(|(n, status)| ExternalItem {
                id: ItemId::new(format!("i{n}")).unwrap(),
                identifier: format!("ENG-{n}"),
                title: format!("Item {n}"),
                description: None,
                status: ItemStatus {
                    id: StateId::new(format!("s{n}")).unwrap(),
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
            .collect())
    }

    async fn fetch_metadata(
        &self,
        _credential: &Credential,
        _scope: &Scope,
    ) -> Result<ScopeMetadata, TrackerError> {
        Ok(ScopeMetadata {
            team_id: TeamId::new("team-1").unwrap(),
            states: vec![WorkflowState {
                id: StateId::new("s-todo").unwrap(),
                name: "Todo".into(),
                kind: StateKind::Unstarted,
                color: None,
                position: 0.0,
            }],
            triage_enabled: false,
            triage_state: None,
            members: Vec::new(),
            labels: Vec::new(),
        })
    }

    async fn create_item(
        &self,
        _credential: &Credential,
        payload: &ItemPayload,
    ) -> Result<CreatedItem, TrackerError> {
        self.created.lock().unwrap().push(payload.clone());
        Ok(CreatedItem {
            id: ItemId::new("new-1").unwrap(),
            identifier: "ENG-42".into(),
            url: Some("https://linear.app/acme/issue/ENG-42".into()),
        })
    }
}

fn view(slug: &str) -> View {
    View {
        id: ViewId::generate(),
        slug: ViewSlug::new(slug).unwrap(),
        owner: OwnerId::new(OWNER).unwrap(),
        name: "Public roadmap".into(),
        title: "Roadmap".into(),
        description: None,
        is_active: true,
        expires_at: None,
        password_protected: false,
        password_hash: None,
        hidden_statuses: vec!["Done".to_string()].into(),
        allowed_statuses: StatusSet::new(),
        allow_submission: true,
        enabled_form_ids: Vec::new(),
        scope: Scope::Team(TeamId::new("team-1").unwrap()),
        scope_name: None,
        display: DisplaySettings::default(),
        created_at: Timestamp::now(),
    }
}

struct TestApp {
    router: Router,
    store: MemoryStore,
    tracker: Arc<RecordingTracker>,
}

impl TestApp {
    async fn new() -> Self {
        let key = AesGcmVault::generate_key();
        let vault = AesGcmVault::from_base64_key(&key).unwrap();
        let store = MemoryStore::new();
        store
            .put_credential(OwnerId::new(OWNER).unwrap(), vault.encrypt(API_KEY).unwrap())
            .await;
        store.put_session(TOKEN, OwnerId::new(OWNER).unwrap()).await;
        store.put_view(view("open")).await;

        let mut locked = view("locked");
        locked.password_protected = true;
        locked.password_hash = Some(hash_password("secret123", 4).await.unwrap());
        store.put_view(locked).await;

        let tracker = Arc::new(RecordingTracker::default());
        let shared = Arc::new(store.clone());
        let gateway = ViewGateway::new(GatewayPorts {
            views: shared.clone(),
            forms: shared.clone(),
            profiles: shared.clone(),
            vault: Arc::new(vault),
            source: tracker.clone(),
            gate: AccessGate::new(Arc::new(BcryptVerifier)),
        });
        let admin = FormAdmin::new(shared.clone(), shared.clone(), shared);
        Self {
            router: create_router(AppState::new(gateway, admin)),
            store,
            tracker,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn owner_request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {TOKEN}"));
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn open_view_returns_visible_issues_only() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/public-view/open").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["view"]["title"], "Roadmap");
    let statuses: Vec<&str> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["state"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["Todo", "In Progress"]);
    assert_eq!(
        app.tracker.seen_credentials.lock().unwrap().as_slice(),
        &[API_KEY.to_string()]
    );
    assert!(!body.to_string().contains(OWNER));
}

#[tokio::test]
async fn missing_view_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/public-view/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "Public view not found or inactive", "kind": "access" })
    );
}

#[tokio::test]
async fn locked_view_asks_for_a_password() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/public-view/locked").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "error": "Password required", "kind": "access", "requiresPassword": true })
    );

    let (status, body) = app
        .post("/api/public-view/locked", json!({ "password": "nope" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "error": "Invalid password", "kind": "access", "requiresPassword": true })
    );

    let (status, body) = app
        .post("/api/public-view/locked", json!({ "password": "secret123" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn metadata_reads_password_from_header() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/public-view/locked/metadata").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/public-view/locked/metadata")
                .header("x-view-password", "secret123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["states"][0]["name"], "Todo");
}

#[tokio::test]
async fn submission_with_form_creates_issue() {
    let app = TestApp::new().await;
    let mut form = Form::new(OwnerId::new(OWNER).unwrap(), "Bug report").unwrap();
    let severity = form.add_question(
        Question::new(QuestionKind::Choice, "Severity")
            .required()
            .with_options(["Low", "High"]),
    );
    let form_id = form.id.clone();
    app.store.save_form(form).await.unwrap();
    let mut open = view("open");
    open.enabled_form_ids = vec![form_id.clone()];
    app.store.put_view(open).await;

    let (status, body) = app.get("/api/public-view/open/issue-forms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forms"][0]["name"], "Bug report");

    let (status, body) = app
        .post(
            "/api/public-view/open/create-issue",
            json!({ "title": "Login broken", "formId": form_id, "priority": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Please answer required question: \"Severity\"",
            "kind": "validation"
        })
    );

    let mut answers = serde_json::Map::new();
    answers.insert(severity.to_string(), json!("High"));
    let (status, body) = app
        .post(
            "/api/public-view/open/create-issue",
            json!({
                "title": "Login broken",
                "formId": form_id,
                "answers": answers,
                "priority": 2,
                "stateId": "",
                "labelIds": []
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issue"]["identifier"], "ENG-42");

    let created = app.tracker.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].description, "**Severity**\nHigh");
    assert_eq!(created[0].state.as_ref().map(|s| s.as_str()), Some("s-todo"));
}

#[tokio::test]
async fn malformed_submission_body_is_400() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post("/api/public-view/open/create-issue", json!({ "priority": 9 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn owner_routes_require_a_session() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/issue-forms").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorised", "kind": "access" }));
}

#[tokio::test]
async fn owner_can_build_a_form() {
    let app = TestApp::new().await;
    let (status, body) = app
        .owner_request("POST", "/api/issue-forms", Some(json!({ "name": " Feedback " })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issueForm"]["name"], "Feedback");
    let id = body["issueForm"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .owner_request(
            "POST",
            &format!("/api/issue-forms/{id}/questions"),
            Some(json!({ "op": "add", "kind": "long_text", "label": "Details" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issueForm"]["questions"][0]["type"], "long_text");
    assert_eq!(body["issueForm"]["questions"][0]["order"], 0);

    let (status, body) = app
        .owner_request(
            "PATCH",
            &format!("/api/issue-forms/{id}"),
            Some(json!({ "name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name cannot be empty");

    let (status, body) = app.owner_request("GET", "/api/issue-forms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issueForms"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .owner_request("DELETE", &format!("/api/issue-forms/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deleted": true }));

    let (status, body) = app
        .owner_request("GET", &format!("/api/issue-forms/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found", "kind": "access" }));
}

#[tokio::test]
async fn diagnostics_list_dropped_form_ids() {
    let app = TestApp::new().await;
    let mut open = view("open");
    open.enabled_form_ids = vec![domain::FormId::new("gone").unwrap()];
    app.store.put_view(open).await;

    let (status, body) = app
        .owner_request("GET", "/api/views/open/form-diagnostics", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnostics"]["dropped"], json!(["gone"]));
}
