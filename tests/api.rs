//! End-to-end tests over the full router backed by the in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use http_body_util::BodyExt;
use produtos_pessoas::repository::HealthCheck;
use produtos_pessoas::routes::BODY_LIMIT;
use produtos_pessoas::{app, AppError, AppState, Config};
use std::sync::Arc;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn config(env: &str, credentials: bool) -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "postgres://localhost/unused",
            "APP_ENV" => env,
            "JWT_VALID_ISSUER" => "produtos-pessoas",
            "JWT_VALID_AUDIENCE" => "produtos-pessoas-clients",
            "JWT_SECRET" => SECRET,
            "AUTH_USERNAME" if credentials => "admin",
            "AUTH_PASSWORD" if credentials => "s3cret",
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

struct DatabaseDown;

#[async_trait]
impl HealthCheck for DatabaseDown {
    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Internal("connection refused".into()))
    }
}

struct TestApp {
    router: Router,
    token: Option<String>,
}

impl TestApp {
    fn new() -> Self {
        Self::from_state(AppState::in_memory(config("development", true)))
    }

    fn with_env(env: &str) -> Self {
        Self::from_state(AppState::in_memory(config(env, true)))
    }

    fn from_state(state: AppState) -> Self {
        TestApp {
            router: app(state),
            token: None,
        }
    }

    async fn authenticated() -> Self {
        let mut app = Self::new();
        let (status, body) = app
            .send("POST", "/api/auth/login", Some(json!({"username": "admin", "password": "s3cret"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        app.token = Some(body["data"]["token"].as_str().unwrap().to_string());
        app
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(body) => {
                self.send_raw(method, uri, Some("application/json"), body.to_string())
                    .await
            }
            None => self.dispatch(self.request(method, uri).body(Body::empty()).unwrap()).await,
        }
    }

    async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = self.request(method, uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.dispatch(builder.body(Body::from(body)).unwrap()).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, body) = self.send("POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }
}

#[tokio::test]
async fn health_and_ready_are_public() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.send("GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let mut app = TestApp::new();
    app.token = Some("not-a-jwt".into());
    let (status, _) = app.send("GET", "/api/brands", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new();
    let (status, body) = app
        .send("POST", "/api/auth/login", Some(json!({"username": "admin", "password": "nope"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn me_returns_token_claims() {
    let app = TestApp::authenticated().await;
    let (status, body) = app.send("GET", "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sub"], "admin");
    assert_eq!(body["data"]["iss"], "produtos-pessoas");
}

#[tokio::test]
async fn brand_crud_flow() {
    let app = TestApp::authenticated().await;

    let brand = app.create("/api/brands", json!({"description": "Tramontina"})).await;
    let id = brand["id"].as_i64().unwrap();
    assert_eq!(brand["description"], "Tramontina");
    assert!(brand["createdAt"].is_string());

    let (status, body) = app.send("GET", &format!("/api/brands/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = app
        .send("PUT", &format!("/api/brands/{}", id), Some(json!({"description": "Tramontina S.A."})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Tramontina S.A.");

    let (status, body) = app.send("GET", "/api/brands", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);

    let (status, body) = app.send("DELETE", &format!("/api/brands/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (status, _) = app.send("GET", &format!("/api/brands/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_rows_report_entity_and_id() {
    let app = TestApp::authenticated().await;

    let (status, body) = app
        .send("PUT", "/api/products/99", Some(json!({"description": "Faca", "stock": 1, "brandId": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"]["message"],
        "Product for ID: 99 was not found in the database."
    );

    let (status, body) = app.send("DELETE", "/api/cities/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "City for ID: 7 was not found in the database.");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = TestApp::authenticated().await;
    let (status, body) = app.send("GET", "/api/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn validation_failures_are_unprocessable() {
    let app = TestApp::authenticated().await;

    let (status, body) = app.send("POST", "/api/brands", Some(json!({"description": "  "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = app
        .send("POST", "/api/cities", Some(json!({"name": "Curitiba", "state": "parana"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn product_requires_existing_brand() {
    let app = TestApp::authenticated().await;
    let (status, body) = app
        .send("POST", "/api/products", Some(json!({"description": "Panela", "stock": 3, "brandId": 42})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn referenced_brand_cannot_be_deleted() {
    let app = TestApp::authenticated().await;
    let brand = app.create("/api/brands", json!({"description": "Tramontina"})).await;
    app.create(
        "/api/products",
        json!({"description": "Panela", "stock": 3, "brandId": brand["id"]}),
    )
    .await;

    let (status, _) = app
        .send("DELETE", &format!("/api/brands/{}", brand["id"]), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn products_filter_by_brand() {
    let app = TestApp::authenticated().await;
    let tramontina = app.create("/api/brands", json!({"description": "Tramontina"})).await;
    let oxford = app.create("/api/brands", json!({"description": "Oxford"})).await;
    app.create(
        "/api/products",
        json!({"description": "Faca", "stock": 10, "brandId": tramontina["id"]}),
    )
    .await;
    app.create(
        "/api/products",
        json!({"description": "Prato", "stock": 4, "brandId": oxford["id"]}),
    )
    .await;

    let (status, body) = app
        .send("GET", &format!("/api/products?brandId={}", oxford["id"]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["description"], "Prato");

    let (_, body) = app.send("GET", "/api/products?brandDescription=tramon", None).await;
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["description"], "Faca");

    let (_, body) = app.send("GET", "/api/products", None).await;
    assert_eq!(body["meta"]["count"], 2);
}

#[tokio::test]
async fn people_and_dependents_flow() {
    let app = TestApp::authenticated().await;
    let city = app.create("/api/cities", json!({"name": "Curitiba", "state": "PR"})).await;
    let person = app
        .create(
            "/api/people",
            json!({"name": "Maria", "cpf": "12345678901", "cityId": city["id"]}),
        )
        .await;
    app.create(
        "/api/dependents",
        json!({"name": "Joana", "birthDate": "2015-03-21", "personId": person["id"]}),
    )
    .await;

    let (status, _) = app
        .send(
            "POST",
            "/api/people",
            Some(json!({"name": "Outra", "cpf": "12345678901", "cityId": city["id"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app
        .send("GET", &format!("/api/dependents?personId={}", person["id"]), None)
        .await;
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["birthDate"], "2015-03-21");

    let (_, body) = app.send("GET", "/api/cities?state=PR", None).await;
    assert_eq!(body["meta"]["count"], 1);
}

#[tokio::test]
async fn openapi_document_is_served_in_development() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/swagger/v1/swagger.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Produtos e Pessoas API");
    assert!(body["paths"].get("/api/products/{id}").is_some());
}

#[tokio::test]
async fn openapi_document_is_hidden_in_production() {
    let app = TestApp::with_env("production");
    let (status, _) = app.send("GET", "/swagger/v1/swagger.json", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ready_reports_unavailable_store() {
    let mut state = AppState::in_memory(config("production", true));
    state.health = Arc::new(DatabaseDown);
    let app = TestApp::from_state(state);
    let (status, body) = app.send("GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn login_is_closed_without_configured_credentials() {
    let app = TestApp::from_state(AppState::in_memory(config("production", false)));
    let (status, body) = app
        .send("POST", "/api/auth/login", Some(json!({"username": "admin", "password": "s3cret"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn extractor_rejections_use_error_envelope() {
    let app = TestApp::authenticated().await;

    let (status, body) = app.send("GET", "/api/products?brandId=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = app
        .send_raw("POST", "/api/brands", Some("application/json"), "{\"description\":".into())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let anonymous = TestApp::new();
    let (status, body) = anonymous
        .send_raw(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "admin", "password": "s3cret"}).to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::authenticated().await;
    let payload = json!({"description": "a".repeat(BODY_LIMIT + 1)}).to_string();
    let request = app
        .request("POST", "/api/brands")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let (status, _) = app.dispatch(request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn update_of_missing_row_is_not_found_even_when_invalid() {
    let app = TestApp::authenticated().await;
    let (status, body) = app
        .send("PUT", "/api/brands/41", Some(json!({"description": ""})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Brand for ID: 41 was not found in the database.");
}

#[tokio::test]
async fn brand_id_takes_precedence_over_brand_description() {
    let app = TestApp::authenticated().await;
    let tramontina = app.create("/api/brands", json!({"description": "Tramontina"})).await;
    let oxford = app.create("/api/brands", json!({"description": "Oxford"})).await;
    app.create(
        "/api/products",
        json!({"description": "Faca", "stock": 10, "brandId": tramontina["id"]}),
    )
    .await;
    app.create(
        "/api/products",
        json!({"description": "Prato", "stock": 4, "brandId": oxford["id"]}),
    )
    .await;

    let (status, body) = app
        .send(
            "GET",
            &format!("/api/products?brandId={}&brandDescription=tramontina", oxford["id"]),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["description"], "Prato");
}

#[tokio::test]
async fn brands_filter_by_description() {
    let app = TestApp::authenticated().await;
    app.create("/api/brands", json!({"description": "Tramontina"})).await;
    app.create("/api/brands", json!({"description": "Oxford"})).await;

    let (status, body) = app.send("GET", "/api/brands?description=OXF", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["description"], "Oxford");
}

#[tokio::test]
async fn people_filter_by_city() {
    let app = TestApp::authenticated().await;
    let curitiba = app.create("/api/cities", json!({"name": "Curitiba", "state": "PR"})).await;
    let recife = app.create("/api/cities", json!({"name": "Recife", "state": "PE"})).await;
    app.create("/api/people", json!({"name": "Maria", "cityId": curitiba["id"]})).await;
    app.create("/api/people", json!({"name": "João", "cityId": recife["id"]})).await;

    let (status, body) = app
        .send("GET", &format!("/api/people?cityId={}", recife["id"]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["name"], "João");
}
