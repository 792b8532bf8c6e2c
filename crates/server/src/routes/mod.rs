//! HTTP route handlers for the form backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness + uptime
//! GET  /api/ping                 - Configurable ping message
//!
//! # Forms (JSON in, JSON out)
//! POST /api/forms/newsletter     - Newsletter subscription
//! POST /api/forms/contact        - Contact message
//! POST /api/forms/login-attempt  - Login attempt (logged only)
//! POST /api/forms/register       - Account registration
//! POST /api/forms/order          - Order placement, returns an order id
//!
//! # Anything else
//! *                              - 404 `{ "error" }`
//! ```

pub mod forms;
pub mod health;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the form routes router.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter", post(forms::newsletter))
        .route("/contact", post(forms::contact))
        .route("/login-attempt", post(forms::login_attempt))
        .route("/register", post(forms::register))
        .route("/order", post(forms::order))
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/ping", get(health::ping))
        .nest("/api/forms", form_routes())
        .fallback(not_found)
}

/// Unknown paths get the same JSON error shape as every other failure.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;

    fn app() -> Router {
        let config = ServerConfig {
            ping_message: "pong from the tea shop".to_string(),
            ..ServerConfig::default()
        };
        routes().with_state(AppState::new(config))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(uri: &str, body: &Value) -> (StatusCode, Value) {
        send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_ping_uses_configured_message() {
        let (status, body) = send(Request::get("/api/ping").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "pong from the tea shop");
    }

    #[tokio::test]
    async fn test_newsletter_ok() {
        let (status, body) =
            post_json("/api/forms/newsletter", &json!({ "email": "Tea@Example.com" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "tea@example.com");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_newsletter_missing_email() {
        let (status, body) = post_json("/api/forms/newsletter", &json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email is required");
    }

    #[tokio::test]
    async fn test_newsletter_invalid_email() {
        let (status, body) =
            post_json("/api/forms/newsletter", &json!({ "email": "not-an-email" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide a valid email address");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_json() {
        let (status, body) = send(
            Request::post("/api/forms/contact")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_contact_echoes_data() {
        let (status, body) = post_json(
            "/api/forms/contact",
            &json!({
                "name": "Mei",
                "email": "mei@example.com",
                "subject": "Wholesale",
                "message": "Do you sell by the kilo?"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Mei");
        assert_eq!(body["data"]["subject"], "Wholesale");
    }

    #[tokio::test]
    async fn test_contact_missing_name() {
        let (status, body) = post_json(
            "/api/forms/contact",
            &json!({ "email": "mei@example.com", "message": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name is required");
    }

    #[tokio::test]
    async fn test_login_attempt() {
        let (status, _) =
            post_json("/api/forms/login-attempt", &json!({ "email": "a@b.co" })).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json("/api/forms/login-attempt", &json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email is required");
    }

    #[tokio::test]
    async fn test_register() {
        let (status, body) = post_json(
            "/api/forms/register",
            &json!({ "firstName": "Lin", "lastName": "Wei", "email": "lin@example.cn" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["firstName"], "Lin");

        let (status, _) = post_json(
            "/api/forms/register",
            &json!({ "firstName": "Lin", "email": "lin@example.cn" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_order_returns_id() {
        let (status, body) = post_json(
            "/api/forms/order",
            &json!({
                "shippingInfo": {
                    "firstName": "Anna",
                    "lastName": "Petrova",
                    "email": "anna@example.com",
                    "address": "Tverskaya 1",
                    "city": "Moscow"
                },
                "cartItems": [{ "id": 1, "name": "Sencha", "price": 1000, "quantity": 2 }],
                "paymentMethod": "card",
                "orderTotal": 2300,
                "subtotal": 2000,
                "shipping": 300,
                "tax": 0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["orderId"].as_str().unwrap().starts_with("ORD-"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) =
            send(Request::get("/api/teapot").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: /api/teapot");
    }

    #[tokio::test]
    async fn test_order_without_items() {
        let (status, body) = post_json(
            "/api/forms/order",
            &json!({ "paymentMethod": "card", "orderTotal": 10 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Shipping information is required");
    }
}
