//! # Integration Tests for legitech-api
//!
//! Exercises the credential flow, the membership lifecycle with lazy
//! expiry, the entitlement gate around laws and advisory endpoints, the
//! derived law views, advisor degradation (503 without a client, fallback
//! payloads with a mocked one), and OpenAPI generation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use legitech_advisor::{GeminiClient, GeminiConfig};
use legitech_api::state::{AppConfig, AppState};
use legitech_auth::{issue_session, SecretKey};
use legitech_core::{Email, Role, UserId};
use legitech_entitlement::{Membership, MembershipStatus};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_SECRET: &str = "clave-de-firma-para-pruebas-0123456789abcdef";

fn test_state() -> AppState {
    AppState::new(AppConfig {
        port: 8080,
        jwt_secret: SecretKey::new(TEST_SECRET).unwrap(),
    })
}

fn test_app(state: &AppState) -> axum::Router {
    legitech_api::app(state.clone())
}

/// Helper: POST a JSON body, optionally with a bearer token.
fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: register an account and return (token, user id).
async fn register(state: &AppState, email: &str) -> (String, String) {
    let response = test_app(state)
        .oneshot(post_json(
            "/v1/auth/register",
            json!({ "name": "Ana López", "email": email, "password": "hunter2!" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(get("/health/liveness", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Registration -------------------------------------------------------------

#[tokio::test]
async fn test_register_returns_token_and_user_without_hash() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(post_json(
            "/v1/auth/register",
            json!({ "name": "Ana", "email": "ana@empresa.mx", "password": "hunter2!" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["token"].as_str().unwrap().contains('.'));
    assert_eq!(body["user"]["email"], "ana@empresa.mx");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn test_register_grants_active_trial_membership() {
    let state = test_state();
    let (token, _) = register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(get("/v1/membership/status", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_member"], true);
    assert_eq!(body["membership"]["type"], "free");
    assert_eq!(body["membership"]["status"], "active");
}

#[tokio::test]
async fn test_register_duplicate_email_is_400() {
    let state = test_state();
    register(&state, "ana@empresa.mx").await;

    // Different case, same canonical address.
    let response = test_app(&state)
        .oneshot(post_json(
            "/v1/auth/register",
            json!({ "name": "Otra Ana", "email": "ANA@Empresa.MX", "password": "x1234!" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("registrado"));
}

#[tokio::test]
async fn test_register_rejects_malformed_email_and_empty_fields() {
    let state = test_state();
    for payload in [
        json!({ "name": "Ana", "email": "no-es-correo", "password": "x" }),
        json!({ "name": "", "email": "ana@empresa.mx", "password": "x" }),
        json!({ "name": "Ana", "email": "ana@empresa.mx", "password": "" }),
    ] {
        let response = test_app(&state)
            .oneshot(post_json("/v1/auth/register", payload, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// -- Login --------------------------------------------------------------------

#[tokio::test]
async fn test_login_roundtrip() {
    let state = test_state();
    register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(post_json(
            "/v1/auth/login",
            json!({ "email": "Ana@Empresa.mx", "password": "hunter2!" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "ana@empresa.mx");
    assert!(body["token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let state = test_state();
    register(&state, "ana@empresa.mx").await;

    let wrong_password = test_app(&state)
        .oneshot(post_json(
            "/v1/auth/login",
            json!({ "email": "ana@empresa.mx", "password": "incorrecta" }),
            None,
        ))
        .await
        .unwrap();
    let unknown_email = test_app(&state)
        .oneshot(post_json(
            "/v1/auth/login",
            json!({ "email": "nadie@empresa.mx", "password": "hunter2!" }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["error"], "Credenciales inválidas");
}

// -- Entitlement Gate ---------------------------------------------------------

#[tokio::test]
async fn test_laws_require_a_session() {
    let state = test_state();
    let response = test_app(&state).oneshot(get("/v1/laws", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let garbage = test_app(&state)
        .oneshot(get("/v1/laws", Some("ni.siquiera.jwt")))
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_membership_is_denied_with_pricing_redirect() {
    let state = test_state();
    let (token, user_id) = register(&state, "ana@empresa.mx").await;

    // Backdate the membership past its end without flipping the status.
    let user_id: UserId = user_id.parse().unwrap();
    let mut membership = Membership::trial(user_id, Utc::now() - Duration::days(60));
    assert_eq!(membership.status, MembershipStatus::Active);
    state.memberships.upsert(membership.clone());

    let response = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Tu membresía ha expirado");
    assert_eq!(body["redirect"], "/pricing");

    // The denial persisted the lazy expiry flip.
    membership = state.memberships.get(&user_id).unwrap();
    assert_eq!(membership.status, MembershipStatus::Expired);
}

#[tokio::test]
async fn test_missing_membership_is_denied_with_pricing_redirect() {
    let state = test_state();
    // Valid session for an externally provisioned user with no membership row.
    let token = issue_session(
        &SecretKey::new(TEST_SECRET).unwrap(),
        UserId::new(),
        &Email::new("externa@empresa.mx").unwrap(),
        Role::User,
    )
    .unwrap();

    let response = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Se requiere una membresía activa");
    assert_eq!(body["redirect"], "/pricing");
}

#[tokio::test]
async fn test_status_reports_lazy_expiry() {
    let state = test_state();
    let (token, user_id) = register(&state, "ana@empresa.mx").await;
    let user_id: UserId = user_id.parse().unwrap();
    state
        .memberships
        .upsert(Membership::trial(user_id, Utc::now() - Duration::days(60)));

    let response = test_app(&state)
        .oneshot(get("/v1/membership/status", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_member"], false);
    assert_eq!(body["membership"]["status"], "expired");
}

#[tokio::test]
async fn test_activation_restores_access() {
    let state = test_state();
    let (token, user_id) = register(&state, "ana@empresa.mx").await;
    let user_id: UserId = user_id.parse().unwrap();
    state
        .memberships
        .upsert(Membership::trial(user_id, Utc::now() - Duration::days(60)));

    // Denied while expired.
    let denied = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    // Activation stays reachable for expired members.
    let activated = test_app(&state)
        .oneshot(post_json(
            "/v1/membership/activate",
            json!({ "type": "annual" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(activated.status(), StatusCode::OK);
    let body = body_json(activated).await;
    assert_eq!(body["membership"]["type"], "annual");
    assert_eq!(body["membership"]["status"], "active");

    let granted = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    assert_eq!(granted.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_bypasses_membership_gate() {
    let state = test_state();
    // Admin token without any membership record at all.
    let token = issue_session(
        &SecretKey::new(TEST_SECRET).unwrap(),
        UserId::new(),
        &Email::new("admin@legitech.mx").unwrap(),
        Role::Admin,
    )
    .unwrap();

    let response = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Law Views ----------------------------------------------------------------

#[tokio::test]
async fn test_seeded_law_view_and_figures() {
    let state = test_state();
    let (token, _) = register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(get("/v1/laws", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    // Seeded progress values 25 and 60 average to 42.5, rounded to 43.
    assert_eq!(body["compliance_pct"], 43);
    assert!(body["laws"][0]["title"]
        .as_str()
        .unwrap()
        .contains("NOM-141"));
}

#[tokio::test]
async fn test_tab_filter_and_search() {
    let state = test_state();
    let (token, _) = register(&state, "ana@empresa.mx").await;
    let app = test_app(&state);

    let safety = app
        .clone()
        .oneshot(get("/v1/laws?tab=Matriz%20ISO%2045001", Some(&token)))
        .await
        .unwrap();
    let body = body_json(safety).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["laws"][0]["category"], "Seguridad");
    assert_eq!(body["compliance_pct"], 60);

    let search = app
        .clone()
        .oneshot(get("/v1/laws?q=jales", Some(&token)))
        .await
        .unwrap();
    let body = body_json(search).await;
    assert_eq!(body["total"], 1);
    assert!(body["laws"][0]["title"].as_str().unwrap().contains("Jales"));

    // Empty view reports zero compliance rather than a division error.
    let empty = app
        .clone()
        .oneshot(get("/v1/laws?q=inexistente", Some(&token)))
        .await
        .unwrap();
    let body = body_json(empty).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["compliance_pct"], 0);

    // Unknown tab falls back to the unfiltered monitor view.
    let unknown = app
        .clone()
        .oneshot(get("/v1/laws?tab=Desconocida", Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(unknown).await["total"], 2);
}

// -- Advisor (unconfigured) ---------------------------------------------------

#[tokio::test]
async fn test_ai_endpoints_return_503_without_advisor() {
    let state = test_state();
    let (token, _) = register(&state, "ana@empresa.mx").await;
    let app = test_app(&state);

    let generate = app
        .clone()
        .oneshot(post_json("/v1/generate", json!({ "prompt": "hola" }), None))
        .await
        .unwrap();
    assert_eq!(generate.status(), StatusCode::SERVICE_UNAVAILABLE);

    let chat = app
        .clone()
        .oneshot(post_json(
            "/v1/chat",
            json!({ "history": [], "message": "hola" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(chat.status(), StatusCode::SERVICE_UNAVAILABLE);

    let discover = app
        .clone()
        .oneshot(post_json(
            "/v1/laws/discover",
            json!({ "industry": "Minería" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(discover.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_generate_requires_a_prompt() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(post_json("/v1/generate", json!({ "prompt": "  " }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Advisor (mocked) ---------------------------------------------------------

async fn state_with_mock_advisor(server: &MockServer) -> AppState {
    let advisor = GeminiClient::new(
        GeminiConfig::new("clave-de-prueba").with_base_url(server.uri()),
    )
    .unwrap();
    test_state().with_advisor(Some(advisor))
}

fn structured_response(payload: Value) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": payload.to_string() }] }
        }]
    })
}

#[tokio::test]
async fn test_discover_prepends_new_law() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(structured_response(json!({
            "title": "NOM-035-STPS-2018",
            "description": "Factores de riesgo psicosocial.",
            "category": "Seguridad",
            "impact_level": "Medio",
            "action_steps": ["Aplicar cuestionarios"],
            "estimated_fine": "500 UMAS",
            "deadline": "90 días"
        }))))
        .mount(&server)
        .await;

    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;
    let app = test_app(&state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/laws/discover",
            json!({ "industry": "Minería" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["law"]["title"], "NOM-035-STPS-2018");
    assert_eq!(body["law"]["status"], "Pendiente");

    // The new law leads the listing.
    let listing = app.clone().oneshot(get("/v1/laws", Some(&token))).await.unwrap();
    let body = body_json(listing).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["laws"][0]["title"], "NOM-035-STPS-2018");
}

#[tokio::test]
async fn test_failed_discovery_leaves_book_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;
    let app = test_app(&state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/laws/discover",
            json!({ "industry": "Fintech" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["law"], Value::Null);

    let listing = app.clone().oneshot(get("/v1/laws", Some(&token))).await.unwrap();
    assert_eq!(body_json(listing).await["total"], 2);
}

#[tokio::test]
async fn test_enrich_applies_fallback_when_upstream_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;
    let app = test_app(&state);

    let listing = app.clone().oneshot(get("/v1/laws", Some(&token))).await.unwrap();
    let law_id = body_json(listing).await["laws"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/laws/{law_id}/enrich"),
            json!({}),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["law"]["ai_summary"],
        "Análisis no disponible en este momento."
    );
}

#[tokio::test]
async fn test_enrich_unknown_law_is_404() {
    let server = MockServer::start().await;
    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(post_json(
            &format!("/v1/laws/{}/enrich", uuid::Uuid::new_v4()),
            json!({}),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_returns_fallback_reply_on_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(post_json(
            "/v1/chat",
            json!({ "history": [{ "role": "user", "text": "hola" }], "message": "¿multas?" }),
            Some(&token),
        ))
        .await
        .unwrap();
    // Degraded, not failed.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["reply"],
        "Error de conexión con el servicio de IA."
    );
}

#[tokio::test]
async fn test_audit_returns_failed_verdict_on_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = state_with_mock_advisor(&server).await;
    let (token, _) = register(&state, "ana@empresa.mx").await;

    let response = test_app(&state)
        .oneshot(post_json(
            "/v1/audit",
            json!({ "text": "Constancia de capacitación 2023" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["compliant"], false);
    assert_eq!(body["verdict_title"], "Error de Análisis");
    assert_eq!(body["confidence"], 0.0);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(get("/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "LegiTech API");
    assert!(body["paths"].get("/v1/auth/register").is_some());
}
