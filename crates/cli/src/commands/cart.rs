//! Cart commands.

use rust_decimal::Decimal;
use teahouse_client::Session;
use teahouse_core::store::LineKey;
use teahouse_core::types::{ProductError, ProductId, ProductSnapshot};

/// A product snapshot as given on the command line.
pub struct NewLine {
    pub id: ProductId,
    pub variant: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub quantity: i64,
}

fn line_key(id: ProductId, variant: Option<String>) -> LineKey {
    LineKey {
        product_id: id,
        variant,
    }
}

pub fn add(session: &mut Session, line: NewLine) -> Result<(), ProductError> {
    let mut product = ProductSnapshot::new(line.id, line.name, line.price)?;
    if let Some(category) = line.category {
        product = product.with_category(category);
    }

    let quantity = session
        .shop
        .cart_mut()
        .add_variant(product, line.variant, line.quantity);
    tracing::info!("Line quantity is now {quantity}");
    Ok(())
}

pub fn remove(session: &mut Session, id: ProductId, variant: Option<String>) {
    if !session.shop.cart_mut().remove_item(line_key(id, variant)) {
        tracing::warn!("Product {id} is not in the cart");
    }
}

pub fn update(session: &mut Session, id: ProductId, variant: Option<String>, quantity: i64) {
    if !session
        .shop
        .cart_mut()
        .update_quantity(line_key(id, variant), quantity)
    {
        tracing::warn!("Product {id} is not in the cart");
    }
}

pub fn clear(session: &mut Session) {
    session.shop.cart_mut().clear_cart();
}

pub fn show(session: &Session) {
    let cart = session.shop.cart();
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    let regional = session.shop.regional_formatter();
    for item in cart.items() {
        let variant = item
            .selected_variant
            .as_deref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();
        tracing::info!(
            "#{} {}{} x{} @ {}",
            item.product.id,
            item.product.name,
            variant,
            item.quantity,
            regional.format(item.product.price())
        );
    }
    tracing::info!(
        "{} items, total {} ({})",
        cart.total_items(),
        session.shop.formatted_cart_total(),
        regional.tax_label()
    );
}
