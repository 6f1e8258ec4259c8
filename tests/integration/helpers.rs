//! Shared test helpers for integration tests.
//!
//! Spins up an in-process mock identity provider (discovery, token, JWKS,
//! and logout endpoints backed by a fixture RSA keypair) and builds the full
//! SessionGate router against it. Requests go through `tower::ServiceExt`
//! without binding the service itself to a port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use http::{Request, StatusCode, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use sessiongate_api::browser_session::BrowserSessionStore;
use sessiongate_auth::provider::client::IdentityProviderClient;
use sessiongate_auth::provider::discovery::ProviderMetadata;
use sessiongate_auth::provider::verifier::IdentityTokenVerifier;
use sessiongate_core::config::AppConfig;
use sessiongate_core::config::provider::ProviderConfig;
use sessiongate_realtime::{EventHub, SessionRegistry};
use sessiongate_service::AuthOrchestrator;

const RSA_KEY_PEM: &str = include_str!("../fixtures/test_rsa_key.pem");
const JWKS_JSON: &str = include_str!("../fixtures/test_jwks.json");

pub const CLIENT_ID: &str = "sessiongate";
pub const COOKIE_NAME: &str = "sessiongate_sid";

/// In-process identity provider double.
#[derive(Clone)]
pub struct MockProvider {
    /// Issuer URL of the spawned provider (`http://127.0.0.1:{port}/realms/demo`).
    pub issuer: String,
    next_claims: Arc<Mutex<Value>>,
}

impl MockProvider {
    /// Sets the claims the next token exchange will sign into the ID token.
    /// Registered claims (`iss`, `aud`, `exp`, `iat`) are filled in at
    /// signing time.
    pub fn set_claims(&self, claims: Value) {
        *self.next_claims.lock().unwrap() = claims;
    }

    fn sign_id_token(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let mut claims = self.next_claims.lock().unwrap().clone();
        let object = claims.as_object_mut().expect("claims must be an object");
        object.insert("iss".to_string(), Value::from(self.issuer.clone()));
        object.insert("aud".to_string(), Value::from(CLIENT_ID));
        object.insert("iat".to_string(), Value::from(now));
        object.insert("exp".to_string(), Value::from(now + 300));

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some("test-key".to_string());
        let key = EncodingKey::from_rsa_pem(RSA_KEY_PEM.as_bytes()).expect("fixture RSA key");
        jsonwebtoken::encode(&header, &claims, &key).expect("sign id token")
    }
}

async fn discovery_document(State(provider): State<MockProvider>) -> Json<Value> {
    Json(serde_json::json!({
        "issuer": provider.issuer,
        "authorization_endpoint": format!("{}/protocol/openid-connect/auth", provider.issuer),
        "token_endpoint": format!("{}/protocol/openid-connect/token", provider.issuer),
        "jwks_uri": format!("{}/protocol/openid-connect/certs", provider.issuer),
        "end_session_endpoint": format!("{}/protocol/openid-connect/logout", provider.issuer),
    }))
}

async fn token_exchange(State(provider): State<MockProvider>) -> Json<Value> {
    Json(serde_json::json!({
        "access_token": "test-access-token",
        "expires_in": 300,
        "id_token": provider.sign_id_token(),
    }))
}

async fn jwks_document() -> Json<Value> {
    Json(serde_json::from_str(JWKS_JSON).expect("fixture JWKS"))
}

/// Binds the mock provider on an ephemeral port and serves it in the
/// background for the rest of the test process.
async fn spawn_mock_provider() -> MockProvider {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock provider");
    let port = listener.local_addr().expect("local addr").port();

    let provider = MockProvider {
        issuer: format!("http://127.0.0.1:{port}/realms/demo"),
        next_claims: Arc::new(Mutex::new(serde_json::json!({"sub": "user-1"}))),
    };

    let router = axum::Router::new()
        .route(
            "/realms/demo/.well-known/openid-configuration",
            get(discovery_document),
        )
        .route(
            "/realms/demo/protocol/openid-connect/token",
            post(token_exchange),
        )
        .route(
            "/realms/demo/protocol/openid-connect/certs",
            get(jwks_document),
        )
        .with_state(provider.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock provider");
    });

    provider
}

/// Test application context.
pub struct TestApp {
    /// The axum router for making test requests.
    pub router: axum::Router,
    /// Shared state, for publishing events and inspecting sessions directly.
    pub state: sessiongate_api::AppState,
    /// Handle on the mock identity provider.
    pub idp: MockProvider,
}

impl TestApp {
    /// Create a new test application wired to a fresh mock provider.
    pub async fn new() -> Self {
        let idp = spawn_mock_provider().await;

        let (base_url, _) = idp
            .issuer
            .rsplit_once("/realms/")
            .expect("issuer carries realm path");

        let mut config = AppConfig {
            provider: ProviderConfig {
                base_url: base_url.to_string(),
                realm: "demo".to_string(),
                client_id: CLIENT_ID.to_string(),
                client_secret: "test-secret".to_string(),
                redirect_uri: "http://localhost:3001/auth/callback".to_string(),
                http_timeout_seconds: 5,
                jwks_ttl_seconds: 60,
            },
            server: Default::default(),
            events: Default::default(),
            session_cookie: Default::default(),
            logging: Default::default(),
        };
        // Short publish timeout keeps eviction tests fast.
        config.events.publish_timeout_ms = 200;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider.http_timeout_seconds))
            .build()
            .expect("http client");

        let metadata = ProviderMetadata::discover(&http, &config.provider)
            .await
            .expect("mock provider discovery");

        let verifier = Arc::new(IdentityTokenVerifier::new(
            http.clone(),
            metadata.jwks_uri.clone(),
            metadata.issuer.clone(),
            config.provider.client_id.clone(),
            Duration::from_secs(config.provider.jwks_ttl_seconds),
        ));
        let provider = Arc::new(IdentityProviderClient::new(
            http,
            config.provider.clone(),
            metadata,
        ));

        let sessions = Arc::new(SessionRegistry::new());
        let events = Arc::new(EventHub::new(&config.events));
        let browser_sessions = Arc::new(BrowserSessionStore::new(&config.session_cookie));

        let orchestrator = Arc::new(AuthOrchestrator::new(
            provider,
            verifier,
            Arc::clone(&sessions),
            Arc::clone(&events),
            config.server.frontend_url.clone(),
        ));

        let state = sessiongate_api::AppState {
            config: Arc::new(config),
            orchestrator,
            sessions,
            events,
            browser_sessions,
        };

        let router = sessiongate_api::build_router(state.clone());

        Self { router, state, idp }
    }

    /// Runs the full login flow for the given claims and returns the
    /// authenticated session cookie value.
    pub async fn login_as(&self, claims: Value) -> String {
        self.idp.set_claims(claims);

        let login = self.get("/auth/login", None).await;
        assert!(login.status.is_redirection(), "login: {:?}", login.status);
        let cookie = login.session_cookie().expect("login sets session cookie");
        let state = login.location_query_param("state").expect("state in URL");

        let callback = self
            .get(
                &format!("/auth/callback?code=test-code&state={state}"),
                Some(&cookie),
            )
            .await;
        assert!(
            callback.status.is_redirection(),
            "callback: {:?} {:?}",
            callback.status,
            callback.body
        );
        cookie
    }

    /// GET a path, optionally with the session cookie attached.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request("GET", path, None, cookie).await
    }

    /// POST a urlencoded form body.
    pub async fn post_form(&self, path: &str, form: &str, cookie: Option<&str>) -> TestResponse {
        self.request("POST", path, Some(form.to_string()), cookie).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        form_body: Option<String>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if form_body.is_some() {
            request = request.header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            );
        }
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, format!("{COOKIE_NAME}={cookie}"));
        }
        let request = request
            .body(Body::from(form_body.unwrap_or_default()))
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Parsed JSON body (`Null` for non-JSON responses).
    pub body: Value,
}

impl TestResponse {
    /// Value of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|raw| {
                let (name, rest) = raw.split_once('=')?;
                if name != COOKIE_NAME {
                    return None;
                }
                let value = rest.split(';').next()?;
                (!value.is_empty()).then(|| value.to_string())
            })
    }

    /// Value of a query parameter in the `Location` redirect target.
    pub fn location_query_param(&self, name: &str) -> Option<String> {
        let location = self.headers.get(header::LOCATION)?.to_str().ok()?;
        let (_, query) = location.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }

    /// Full `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }
}

/// An unsigned backchannel logout token for the subject.
pub fn make_logout_token(sub: &str) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&serde_json::json!({
            "sub": sub,
            "events": {"http://schemas.openid.net/event/backchannel-logout": {}}
        }))
        .unwrap(),
    );
    format!("{header}.{payload}.sig")
}
