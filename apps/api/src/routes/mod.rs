//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CorsLayer (CORS_ORIGINS)                                               │
//! │  └── {api_prefix}                                                       │
//! │      ├── /product/...   product mutations and analytics   (product.rs) │
//! │      ├── /user/...      account and profile               (user.rs)    │
//! │      └── /health        liveness + database check         (health.rs)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod health;
pub mod product;
pub mod user;

use axum::http::HeaderValue;
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::AppState;

/// Builds the application router, nested under the configured prefix.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/product", product::routes())
        .nest("/user", user::routes())
        .route("/health", get(health::health));

    let prefix = state.config.api_prefix.clone();
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    app.layer(cors_layer(&state.config.cors_origins)).with_state(state)
}

/// Browser access for the listed origins, any method and header, no
/// credentials. A `*` entry opens the API to every origin.
fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Route registration that also answers on the slash-suffixed path.
///
/// The browser clients call some endpoints as `/user/change-email/`.
pub(crate) trait RouterExt<S> {
    fn route_with_slash(self, path: &str, method_router: MethodRouter<S>) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn route_with_slash(self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.route(path, method_router.clone())
            .route(&format!("{}/", path), method_router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{token_for, AUDIENCE, ISSUER, SECRET};
    use crate::ApiConfig;
    use chrono::Utc;
    use reqwest::{Client, Method, StatusCode};
    use serde_json::{json, Value};
    use stockroom_db::{Database, DbConfig};
    use tokio::net::TcpListener;

    struct TestServer {
        base: String,
        client: Client,
        token: String,
    }

    impl TestServer {
        async fn start(prefix: &str) -> Self {
            let db = Database::new(DbConfig::in_memory()).await.unwrap();
            let user = db
                .users()
                .insert("owner@example.com", "unused", Utc::now())
                .await
                .unwrap();

            let prefix = prefix.to_string();
            let config = ApiConfig::load_from(|key| match key {
                "JWT_SECRET" => Some(SECRET.to_string()),
                "JWT_ISSUER" => Some(ISSUER.to_string()),
                "JWT_AUDIENCE" => Some(AUDIENCE.to_string()),
                "API_PREFIX" => Some(prefix.clone()),
                _ => None,
            })
            .unwrap();

            let api_prefix = config.api_prefix.clone();
            let app = router(AppState::new(db, config));
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            TestServer {
                base: format!("http://{}{}", addr, api_prefix),
                client: Client::new(),
                token: token_for(user.id),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
            let mut request = self
                .client
                .request(method, self.url(path))
                .bearer_auth(&self.token);
            if let Some(body) = body {
                request = request.json(&body);
            }
            let response = request.send().await.unwrap();
            let status = response.status();
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            (status, body)
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = TestServer::start("").await;
        let response = server.client.get(server.url("/health")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], true);
        assert_eq!(body["schema_current"], true);
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let server = TestServer::start("").await;

        let response = server
            .client
            .get(server.url("/product/my-products"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "UNAUTHORIZED");

        let response = server
            .client
            .get(server.url("/product/my-products"))
            .bearer_auth("not.a.token")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let server = TestServer::start("/api/v1").await;

        let (status, created) = server
            .send(
                Method::POST,
                "/product/add-product",
                Some(json!({
                    "name": "Desk Lamp",
                    "available_stock": 3,
                    "price": "10.00",
                    "cost": "12.50",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["price_cents"], 1000);
        assert_eq!(created["inactive"], false);
        let id = created["id"].as_i64().unwrap();

        let (status, body) = server
            .send(
                Method::POST,
                "/product/add-product",
                Some(json!({ "name": "Desk Lamp", "available_stock": 1, "price": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, body) = server
            .send(Method::PATCH, &format!("/product/update-product/{}", id), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_INPUT");

        let (status, body) = server
            .send(
                Method::PATCH,
                &format!("/product/update-product/{}", id),
                Some(json!({ "available_stock": "many" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, toggled) = server
            .send(Method::PUT, &format!("/product/inactive-product/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["inactive"], true);

        let (status, report) = server.send(Method::GET, "/product/estimated-profit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["losing_products"][0]["loss_per_unit_cents"], 250);

        let (status, low) = server.send(Method::GET, "/product/low-stock-items/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(low["status"], "restock");
        assert_eq!(low["items"][0]["name"], "Desk Lamp");

        let (status, deleted) = server
            .send(Method::DELETE, &format!("/product/delete-product/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["name"], "Desk Lamp");
        assert!(deleted["deleted_at"].is_string());

        let (status, body) = server
            .send(Method::DELETE, &format!("/product/delete-product/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, listed) = server.send(Method::GET, "/product/my-products?order=asc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_bad_path_and_query() {
        let server = TestServer::start("").await;

        let (status, body) = server
            .send(Method::PUT, "/product/inactive-product/abc", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = server
            .send(Method::GET, "/product/my-products?order=sideways", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = server
            .send(
                Method::POST,
                "/product/add-product",
                Some(json!({ "name": "Desk Lamp", "available_stock": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "price is required");
    }

    #[tokio::test]
    async fn test_user_info() {
        let server = TestServer::start("").await;

        let (status, body) = server.send(Method::GET, "/user/user", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "owner@example.com");
        assert!(body.get("username").is_none());

        let (status, _) = server
            .send(Method::PATCH, "/user/update-user", Some(json!({ "username": "owner_1" })))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = server.send(Method::GET, "/user/user", None).await;
        assert_eq!(body["username"], "owner_1");
    }

    #[tokio::test]
    async fn test_trailing_slash_paths() {
        let server = TestServer::start("").await;

        let (status, body) = server
            .send(
                Method::PUT,
                "/user/change-email/",
                Some(json!({ "email": "new@example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "new@example.com");

        let (status, _) = server.send(Method::GET, "/product/estimated-profit/", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = server.send(Method::GET, "/product/estimated-profit", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let server = TestServer::start("").await;

        let response = server
            .client
            .request(Method::OPTIONS, server.url("/product/my-products"))
            .header("Origin", "http://localhost:5174")
            .header("Access-Control-Request-Method", "GET")
            .header("Access-Control-Request-Headers", "authorization")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5174"
        );

        let response = server
            .client
            .request(Method::OPTIONS, server.url("/product/my-products"))
            .header("Origin", "http://evil.example")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_on_regular_response() {
        let server = TestServer::start("").await;

        let response = server
            .client
            .get(server.url("/health"))
            .header("Origin", "http://127.0.0.1:5174")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://127.0.0.1:5174"
        );
    }

    #[test]
    fn test_cors_wildcard_origin() {
        // Must not panic: a wildcard is not a valid list entry
        let _ = cors_layer(&[HeaderValue::from_static("*")]);
        let _ = cors_layer(&[]);
    }
}
