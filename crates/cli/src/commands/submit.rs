//! Form submission commands.

use clap::Args;
use rust_decimal::Decimal;
use teahouse_client::{ClientError, Session};
use teahouse_core::forms::{
    ContactRequest, LoginAttemptRequest, NewsletterRequest, OrderLine, OrderRequest,
    RegisterRequest, ShippingInfo,
};

#[derive(Args)]
pub struct OrderArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long, default_value = "card")]
    payment_method: String,
    /// Shipping cost in the base currency
    #[arg(long, default_value_t = Decimal::ZERO)]
    shipping: Decimal,
    /// Tax in the base currency
    #[arg(long, default_value_t = Decimal::ZERO)]
    tax: Decimal,
}

pub async fn newsletter(session: &Session, email: String) -> Result<(), ClientError> {
    let response = session
        .forms
        .newsletter(&NewsletterRequest { email: Some(email) })
        .await?;
    tracing::info!("{} ({})", response.message, response.email);
    Ok(())
}

pub async fn contact(
    session: &Session,
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
) -> Result<(), ClientError> {
    let response = session
        .forms
        .contact(&ContactRequest {
            name: Some(name),
            email: Some(email),
            subject,
            message: Some(message),
        })
        .await?;
    tracing::info!("{}", response.message);
    Ok(())
}

pub async fn login_attempt(session: &Session, email: String) -> Result<(), ClientError> {
    let response = session
        .forms
        .login_attempt(&LoginAttemptRequest { email: Some(email) })
        .await?;
    tracing::info!("{}", response.message);
    Ok(())
}

pub async fn register(
    session: &Session,
    first_name: String,
    last_name: String,
    email: String,
) -> Result<(), ClientError> {
    let response = session
        .forms
        .register(&RegisterRequest {
            first_name: Some(first_name),
            last_name: Some(last_name),
            email: Some(email),
        })
        .await?;
    tracing::info!("{} ({})", response.message, response.data.email);
    Ok(())
}

/// Order everything in the cart, then empty it.
pub async fn order(session: &mut Session, args: OrderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cart = session.shop.cart();
    let subtotal = cart.total_price();
    let request = OrderRequest {
        shipping_info: Some(ShippingInfo {
            first_name: Some(args.first_name),
            last_name: Some(args.last_name),
            email: Some(args.email),
            phone: args.phone,
            address: Some(args.address),
            city: Some(args.city),
            postal_code: args.postal_code,
            country: args.country,
        }),
        cart_items: Some(cart.items().iter().map(OrderLine::from).collect()),
        payment_method: Some(args.payment_method),
        order_total: Some(subtotal + args.shipping + args.tax),
        subtotal: Some(subtotal),
        shipping: Some(args.shipping),
        tax: Some(args.tax),
    };

    // Catch an empty cart or missing details before going over the network.
    request.validate()?;

    let response = session.forms.order(&request).await?;
    tracing::info!("{} - order id {}", response.message, response.order_id);
    session.shop.cart_mut().clear_cart();
    Ok(())
}

pub async fn health(session: &Session) -> Result<(), ClientError> {
    let health = session.forms.health().await?;
    tracing::info!(
        "{} at {} (up {:.0}s)",
        health.status,
        health.timestamp,
        health.uptime
    );
    Ok(())
}
