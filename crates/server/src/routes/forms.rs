//! Form submission handlers.
//!
//! Each handler validates the body and logs the submission. Nothing is
//! stored and no mail or payment is dispatched.

use axum::{Json, extract::rejection::JsonRejection};
use chrono::Utc;
use teahouse_core::forms::{
    ContactData, ContactRequest, ContactResponse, LoginAttemptRequest, MessageResponse,
    NewsletterRequest, NewsletterResponse, OrderRequest, OrderResponse, RegisterRequest,
    RegisterResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};

/// Unwrap a JSON body, turning axum's rejection into our error shape.
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// `POST /api/forms/newsletter`
#[instrument(skip_all)]
pub async fn newsletter(
    payload: std::result::Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<Json<NewsletterResponse>> {
    let email = body(payload)?.validate()?;

    tracing::info!(email = %email, "Newsletter subscription");
    add_breadcrumb("forms", "newsletter subscription");

    Ok(Json(NewsletterResponse {
        message: "Successfully subscribed to the newsletter".to_string(),
        email: email.into_inner(),
    }))
}

/// `POST /api/forms/contact`
#[instrument(skip_all)]
pub async fn contact(
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>> {
    let submission = body(payload)?.validate()?;

    tracing::info!(
        name = %submission.name,
        email = %submission.email,
        subject = submission.subject.as_deref().unwrap_or("(none)"),
        message_len = submission.message.len(),
        "Contact form submission"
    );
    add_breadcrumb("forms", "contact message");

    Ok(Json(ContactResponse {
        message: "Message sent successfully".to_string(),
        data: ContactData {
            name: submission.name,
            email: submission.email.into_inner(),
            subject: submission.subject,
        },
    }))
}

/// `POST /api/forms/login-attempt`
#[instrument(skip_all)]
pub async fn login_attempt(
    payload: std::result::Result<Json<LoginAttemptRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let email = body(payload)?.validate()?;

    tracing::info!(email = %email, "Login attempt");

    Ok(Json(MessageResponse {
        message: "Login attempt recorded".to_string(),
    }))
}

/// `POST /api/forms/register`
#[instrument(skip_all)]
pub async fn register(
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>> {
    let registration = body(payload)?.validate()?;

    tracing::info!(
        first_name = %registration.first_name,
        last_name = %registration.last_name,
        email = %registration.email,
        "Registration"
    );
    add_breadcrumb("forms", "registration");

    Ok(Json(RegisterResponse {
        message: "Registration successful".to_string(),
        data: registration,
    }))
}

/// `POST /api/forms/order`
#[instrument(skip_all, fields(order_id))]
pub async fn order(
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>> {
    let submission = body(payload)?.validate()?;
    let order_id = generate_order_id();
    tracing::Span::current().record("order_id", &order_id);

    tracing::info!(
        customer = %submission.customer_name,
        email = %submission.email,
        city = %submission.city,
        items = submission.item_count(),
        lines = submission.lines.len(),
        payment_method = %submission.payment_method,
        subtotal = %submission.subtotal,
        shipping = %submission.shipping,
        tax = %submission.tax,
        total = %submission.order_total,
        "Order received"
    );
    add_breadcrumb("forms", "order placed");

    Ok(Json(OrderResponse {
        message: "Order placed successfully".to_string(),
        order_id,
    }))
}

/// `ORD-<unix millis>-<8 hex>`; the random suffix keeps simultaneous
/// orders distinct.
fn generate_order_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("ORD-{}-{suffix}", Utc::now().timestamp_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_order_id_shape() {
        let id = generate_order_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.first().copied(), Some("ORD"));
        assert!(parts.get(1).unwrap().parse::<i64>().is_ok());
        let suffix = parts.get(2).unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_order_ids_unique_within_same_millisecond() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_order_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
