//! Form payloads exchanged with the backend.
//!
//! Request bodies are deserialized with every field optional so that a
//! missing field becomes a [`FormError`] (HTTP 400 with a readable message)
//! instead of a framework-level rejection. `validate()` turns a raw body into
//! a typed submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::LineItem;
use crate::types::{Email, EmailError, ProductId};

/// Validation failures, reported to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is absent or blank.
    #[error("{0} is required")]
    Missing(&'static str),

    /// The email field does not look like an address.
    #[error("Please provide a valid email address")]
    InvalidEmail(#[source] EmailError),

    /// An order was submitted with no lines.
    #[error("Order must contain at least one item")]
    EmptyCart,

    /// A monetary amount was negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// A line quantity was zero.
    #[error("Item quantities must be at least 1")]
    InvalidQuantity,
}

/// Trimmed, non-empty value of a required text field.
fn required(value: Option<&str>, field: &'static str) -> Result<String, FormError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(FormError::Missing(field))
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

fn email(value: Option<&str>) -> Result<Email, FormError> {
    let raw = required(value, "Email")?;
    Email::parse(&raw).map_err(FormError::InvalidEmail)
}

fn non_negative(value: Option<Decimal>, field: &'static str) -> Result<Decimal, FormError> {
    let value = value.ok_or(FormError::Missing(field))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FormError::NegativeAmount(field));
    }
    Ok(value)
}

// =============================================================================
// Newsletter
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

impl NewsletterRequest {
    /// # Errors
    ///
    /// Returns [`FormError`] if the email is missing or malformed.
    pub fn validate(&self) -> Result<Email, FormError> {
        email(self.email.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterResponse {
    pub message: String,
    pub email: String,
}

// =============================================================================
// Contact
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: Email,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactRequest {
    /// # Errors
    ///
    /// Returns [`FormError`] if name, email or message is missing.
    pub fn validate(&self) -> Result<ContactSubmission, FormError> {
        Ok(ContactSubmission {
            name: required(self.name.as_deref(), "Name")?,
            email: email(self.email.as_deref())?,
            subject: optional(self.subject.as_deref()),
            message: required(self.message.as_deref(), "Message")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub message: String,
    pub data: ContactData,
}

// =============================================================================
// Login attempt / registration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginAttemptRequest {
    pub email: Option<String>,
}

impl LoginAttemptRequest {
    /// # Errors
    ///
    /// Returns [`FormError`] if the email is missing or malformed.
    pub fn validate(&self) -> Result<Email, FormError> {
        email(self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

impl RegisterRequest {
    /// # Errors
    ///
    /// Returns [`FormError`] if any field is missing or the email is malformed.
    pub fn validate(&self) -> Result<Registration, FormError> {
        Ok(Registration {
            first_name: required(self.first_name.as_deref(), "First name")?,
            last_name: required(self.last_name.as_deref(), "Last name")?,
            email: email(self.email.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: Registration,
}

/// Body of responses that carry only a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// One ordered product, as sent by the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.product.id,
            name: item.product.name.clone(),
            price: item.product.price(),
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub shipping_info: Option<ShippingInfo>,
    pub cart_items: Option<Vec<OrderLine>>,
    pub payment_method: Option<String>,
    pub order_total: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
}

/// A validated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub customer_name: String,
    pub email: Email,
    pub city: String,
    pub lines: Vec<OrderLine>,
    pub payment_method: String,
    pub order_total: Decimal,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
}

impl OrderSubmission {
    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

impl OrderRequest {
    /// # Errors
    ///
    /// Returns [`FormError`] if shipping details, items, payment method or
    /// the order total are missing, or any amount is negative.
    pub fn validate(&self) -> Result<OrderSubmission, FormError> {
        let shipping_info = self
            .shipping_info
            .as_ref()
            .ok_or(FormError::Missing("Shipping information"))?;
        let lines = self
            .cart_items
            .as_ref()
            .ok_or(FormError::Missing("Cart items"))?;
        if lines.is_empty() {
            return Err(FormError::EmptyCart);
        }
        if lines.iter().any(|line| line.quantity == 0) {
            return Err(FormError::InvalidQuantity);
        }
        if lines
            .iter()
            .any(|line| line.price.is_sign_negative() && !line.price.is_zero())
        {
            return Err(FormError::NegativeAmount("Item price"));
        }

        let first_name = required(shipping_info.first_name.as_deref(), "First name")?;
        let last_name = required(shipping_info.last_name.as_deref(), "Last name")?;
        let email = email(shipping_info.email.as_deref())?;
        required(shipping_info.address.as_deref(), "Address")?;
        let city = required(shipping_info.city.as_deref(), "City")?;

        Ok(OrderSubmission {
            customer_name: format!("{first_name} {last_name}"),
            email,
            city,
            lines: lines.clone(),
            payment_method: required(self.payment_method.as_deref(), "Payment method")?,
            order_total: non_negative(self.order_total, "Order total")?,
            subtotal: non_negative(self.subtotal.or(Some(Decimal::ZERO)), "Subtotal")?,
            shipping: non_negative(self.shipping.or(Some(Decimal::ZERO)), "Shipping")?,
            tax: non_negative(self.tax.or(Some(Decimal::ZERO)), "Tax")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub message: String,
    pub order_id: String,
}

// =============================================================================
// Health / errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since the server started.
    pub uptime: f64,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: Some("Anna".into()),
            last_name: Some("Petrova".into()),
            email: Some("anna@example.com".into()),
            address: Some("Tverskaya 1".into()),
            city: Some("Moscow".into()),
            ..ShippingInfo::default()
        }
    }

    fn order() -> OrderRequest {
        OrderRequest {
            shipping_info: Some(shipping()),
            cart_items: Some(vec![OrderLine {
                id: ProductId::new(1),
                name: "Da Hong Pao".into(),
                price: Decimal::new(1000, 0),
                quantity: 2,
            }]),
            payment_method: Some("card".into()),
            order_total: Some(Decimal::new(2300, 0)),
            subtotal: Some(Decimal::new(2000, 0)),
            shipping: Some(Decimal::new(300, 0)),
            tax: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn test_newsletter_requires_valid_email() {
        assert_eq!(
            NewsletterRequest { email: None }.validate(),
            Err(FormError::Missing("Email"))
        );
        assert!(matches!(
            NewsletterRequest {
                email: Some("nope".into())
            }
            .validate(),
            Err(FormError::InvalidEmail(_))
        ));
        assert_eq!(
            NewsletterRequest {
                email: Some("Tea@Example.com".into())
            }
            .validate()
            .unwrap()
            .as_str(),
            "tea@example.com"
        );
    }

    #[test]
    fn test_contact_subject_is_optional() {
        let request = ContactRequest {
            name: Some(" Ivan ".into()),
            email: Some("ivan@example.com".into()),
            subject: Some("   ".into()),
            message: Some("Do you ship to Kazan?".into()),
        };
        let submission = request.validate().unwrap();
        assert_eq!(submission.name, "Ivan");
        assert_eq!(submission.subject, None);
    }

    #[test]
    fn test_contact_missing_message() {
        let request = ContactRequest {
            name: Some("Ivan".into()),
            email: Some("ivan@example.com".into()),
            ..ContactRequest::default()
        };
        assert_eq!(request.validate(), Err(FormError::Missing("Message")));
        assert_eq!(
            FormError::Missing("Message").to_string(),
            "Message is required"
        );
    }

    #[test]
    fn test_register_fields() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Lin","lastName":"Wei","email":"lin@example.cn"}"#,
        )
        .unwrap();
        let registration = request.validate().unwrap();
        assert_eq!(registration.first_name, "Lin");

        let request: RegisterRequest =
            serde_json::from_str(r#"{"firstName":"Lin","email":"lin@example.cn"}"#).unwrap();
        assert_eq!(request.validate(), Err(FormError::Missing("Last name")));
    }

    #[test]
    fn test_order_valid() {
        let submission = order().validate().unwrap();
        assert_eq!(submission.customer_name, "Anna Petrova");
        assert_eq!(submission.item_count(), 2);
    }

    #[test]
    fn test_order_missing_details() {
        let mut request = order();
        request.shipping_info = None;
        assert_eq!(
            request.validate(),
            Err(FormError::Missing("Shipping information"))
        );

        let mut request = order();
        request.cart_items = Some(Vec::new());
        assert_eq!(request.validate(), Err(FormError::EmptyCart));

        let mut request = order();
        request.order_total = None;
        assert_eq!(request.validate(), Err(FormError::Missing("Order total")));

        let mut request = order();
        request.tax = Some(Decimal::new(-1, 0));
        assert_eq!(request.validate(), Err(FormError::NegativeAmount("Tax")));
    }

    #[test]
    fn test_order_accepts_numeric_json_amounts() {
        let json = r#"{
            "shippingInfo": {"firstName":"A","lastName":"B","email":"a@b.co","address":"x","city":"y"},
            "cartItems": [{"id": 7, "name": "Oolong", "price": 850.5, "quantity": 1}],
            "paymentMethod": "cash",
            "orderTotal": 850.5
        }"#;
        let request: OrderRequest = serde_json::from_str(json).unwrap();
        let submission = request.validate().unwrap();
        assert_eq!(submission.order_total, Decimal::new(8505, 1));
        assert_eq!(submission.shipping, Decimal::ZERO);
    }
}
