use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use eventum_api::app::{AppServices, build_app, build_services};
use eventum_auth::Role;
use eventum_core::{OrganizationId, UserId};
use eventum_infra::SessionRecord;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = Arc::new(build_services());
        let app = build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    /// Mint an opaque session token for a fresh user in `org`.
    fn seed_session(&self, org: OrganizationId, role: Role) -> (String, UserId) {
        let user = UserId::new();
        let token = format!("tok-{}", Uuid::now_v7());
        self.services.sessions.insert(
            token.clone(),
            SessionRecord {
                organization_id: org,
                user_id: user,
                role,
            },
        );
        (token, user)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    // Redirects stay visible: the navigation gate is under test.
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn cookie(token: &str) -> String {
    format!("session={token}")
}

#[tokio::test]
async fn session_identity_wins_over_api_key_header() {
    let server = TestServer::spawn().await;
    let session_org = OrganizationId::new();
    let (token, user) = server.seed_session(session_org, Role::Admin);

    let key_org = OrganizationId::new();
    let issued = server.services.api_keys.create(key_org, "ci", None).await.unwrap();

    let res = client()
        .get(server.url("/whoami"))
        .header("Cookie", cookie(&token))
        .header("x-api-key", &issued.key)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["organization_id"], json!(session_org));
    assert_eq!(body["user_id"], json!(user));
    assert_eq!(body["auth_method"], "session");
}

#[tokio::test]
async fn api_key_context_is_tenant_scoped_and_roleless() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let issued = server.services.api_keys.create(org, "sdk", None).await.unwrap();

    // Bearer scheme, deliberately odd-cased.
    let res = client()
        .get(server.url("/whoami"))
        .header("Authorization", format!("BEARER {}", issued.key))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["organization_id"], json!(org));
    assert_eq!(body["user_id"], Value::Null);
    assert_eq!(body["role"], Value::Null);
    assert_eq!(body["auth_method"], "api_key");
}

#[tokio::test]
async fn authentication_failures_are_uniform() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let expired = server
        .services
        .api_keys
        .create(org, "old", Some(Utc::now() - ChronoDuration::hours(1)))
        .await
        .unwrap();

    let requests = [
        client().get(server.url("/whoami")),
        client().get(server.url("/whoami")).header("Cookie", "session=no-such-token"),
        client().get(server.url("/whoami")).header("x-api-key", "evk_0000000000"),
        client().get(server.url("/whoami")).header("x-api-key", &expired.key),
    ];

    let mut bodies = Vec::new();
    for request in requests {
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        bodies.push(res.json::<Value>().await.unwrap());
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn api_key_lifecycle_over_http() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let (token, _) = server.seed_session(org, Role::Admin);
    let http = client();

    // Create: the plaintext is returned exactly once.
    let res = http
        .post(server.url("/api-keys"))
        .header("Cookie", cookie(&token))
        .json(&json!({ "label": "deploy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let key = created["key"].as_str().unwrap().to_string();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(key.starts_with("evk_"));
    assert!(key.starts_with(created["prefix"].as_str().unwrap()));

    // The key authenticates.
    let res = http
        .get(server.url("/whoami"))
        .header("x-api-key", &key)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Listing never exposes the plaintext or the digest.
    let res = http
        .get(server.url("/api-keys"))
        .header("Cookie", cookie(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing: Value = res.json().await.unwrap();
    let item = &listing["items"][0];
    assert_eq!(item["id"].as_str(), Some(id.as_str()));
    assert!(item.get("key").is_none());
    assert!(item.get("key_hash").is_none());
    assert_eq!(item["prefix"], created["prefix"]);

    // Revoke, then the key is indistinguishable from an unknown one.
    let res = http
        .delete(server.url(&format!("/api-keys/{id}")))
        .header("Cookie", cookie(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = http
        .get(server.url("/whoami"))
        .header("x-api-key", &key)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_key_callers_cannot_manage_keys() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let issued = server.services.api_keys.create(org, "ci", None).await.unwrap();
    let http = client();

    let res = http
        .post(server.url("/api-keys"))
        .header("x-api-key", &issued.key)
        .json(&json!({ "label": "escalation" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = http
        .get(server.url("/api-keys"))
        .header("x-api-key", &issued.key)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reviewer_navigation_is_confined_to_abstracts() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let (reviewer, _) = server.seed_session(org, Role::Reviewer);
    let (admin, _) = server.seed_session(org, Role::Admin);
    let http = client();

    let redirects = [
        ("/events/abc123/sessions", "/events/abc123/abstracts"),
        ("/events/new", "/events"),
        ("/dashboard", "/events"),
        ("/settings/billing", "/events"),
    ];
    for (path, target) in redirects {
        let res = http
            .get(server.url(path))
            .header("Cookie", cookie(&reviewer))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(res.headers()["location"].to_str().unwrap(), target, "path {path}");

        // The same paths pass through for an admin (no page handlers exist
        // here, so pass-through surfaces as a plain 404, not a redirect).
        let res = http
            .get(server.url(path))
            .header("Cookie", cookie(&admin))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
    }

    // Abstracts sub-paths pass through for the reviewer.
    let res = http
        .get(server.url("/events/abc123/abstracts/42"))
        .header("Cookie", cookie(&reviewer))
        .send()
        .await
        .unwrap();
    assert_ne!(res.status(), StatusCode::SEE_OTHER);

    // So does the events list itself.
    let res = http
        .get(server.url("/events"))
        .header("Cookie", cookie(&reviewer))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn reviewer_sees_only_acl_listed_events() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let (admin, _) = server.seed_session(org, Role::Admin);
    let (reviewer, reviewer_user) = server.seed_session(org, Role::Reviewer);
    let http = client();

    let mut event_ids = Vec::new();
    for name in ["RustConf", "RustFest"] {
        let res = http
            .post(server.url("/events"))
            .header("Cookie", cookie(&admin))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        event_ids.push(body["id"].as_str().unwrap().to_string());
    }
    let (listed, unlisted) = (event_ids[0].clone(), event_ids[1].clone());

    let res = http
        .post(server.url(&format!("/events/{listed}/reviewers")))
        .header("Cookie", cookie(&admin))
        .json(&json!({ "user_id": reviewer_user }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The events list shows only the granted event.
    let res = http
        .get(server.url("/events"))
        .header("Cookie", cookie(&reviewer))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_str(), Some(listed.as_str()));

    // Granted event: the abstracts view loads.
    let res = http
        .get(server.url(&format!("/events/{listed}/abstracts")))
        .header("Cookie", cookie(&reviewer))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Unlisted event: same organization, still structurally not found.
    let res = http
        .get(server.url(&format!("/events/{unlisted}/abstracts")))
        .header("Cookie", cookie(&reviewer))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Wrong tenant collapses into the same response.
    let (outsider, _) = server.seed_session(OrganizationId::new(), Role::Admin);
    let res = http
        .get(server.url(&format!("/events/{listed}")))
        .header("Cookie", cookie(&outsider))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviewer_mutations_are_forbidden() {
    let server = TestServer::spawn().await;
    let org = OrganizationId::new();
    let (reviewer, _) = server.seed_session(org, Role::Reviewer);
    let (submitter, _) = server.seed_session(org, Role::Submitter);
    let http = client();

    let res = http
        .post(server.url("/events"))
        .header("Cookie", cookie(&reviewer))
        .json(&json!({ "name": "Sneaky Summit" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = http
        .post(server.url("/api-keys"))
        .header("Cookie", cookie(&reviewer))
        .json(&json!({ "label": "sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The mutation policy restricts only the reviewer role.
    let res = http
        .post(server.url("/events"))
        .header("Cookie", cookie(&submitter))
        .json(&json!({ "name": "Lightning Talks" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn password_reset_requests_are_throttled_per_email() {
    let server = TestServer::spawn().await;
    let http = client();

    for _ in 0..5 {
        let res = http
            .post(server.url("/auth/password-reset/request"))
            .json(&json!({ "email": "user@example.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    // Sixth request trips the limit; normalization folds case and spacing.
    let res = http
        .post(server.url("/auth/password-reset/request"))
        .json(&json!({ "email": "  USER@Example.com " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = res.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(retry_after >= 1);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "rate_limited");

    // Other keys are unaffected.
    let res = http
        .post(server.url("/auth/password-reset/request"))
        .json(&json!({ "email": "other@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let res = client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
