//! Client session: file persistence across reopen and checkout against the
//! spawned backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use teahouse_core::currency::CurrencyCode;
use teahouse_core::forms::{OrderLine, OrderRequest, ShippingInfo};
use teahouse_core::region::DetectionSource;
use teahouse_core::types::{ProductId, ProductSnapshot};
use teahouse_integration_tests::TestServer;
use teahouse_server::ServerConfig;

fn sencha() -> ProductSnapshot {
    ProductSnapshot::new(ProductId::new(1), "Sencha", Decimal::new(1000, 0)).unwrap()
}

#[tokio::test]
async fn test_stores_survive_reopen() {
    let server = TestServer::spawn(ServerConfig::default()).await;
    let data = tempfile::tempdir().unwrap();

    {
        let mut session = server.session(&data);
        session.shop.cart_mut().add_item(sencha(), 2);
        session.shop.wishlist_mut().add_item(ProductId::new(5));
        session.shop.wishlist_mut().add_item(ProductId::new(5));
        session.shop.comparison_mut().add_item(ProductId::new(7));
        session.shop.view_product(ProductId::new(3));
        session.shop.set_currency(CurrencyCode::USD);
    }

    let session = server.session(&data);
    assert_eq!(session.shop.cart().total_items(), 2);
    assert_eq!(session.shop.cart().total_price(), Decimal::new(2000, 0));
    assert_eq!(session.shop.wishlist().ids(), vec![ProductId::new(5)]);
    assert!(session.shop.comparison().is_in_comparison(ProductId::new(7)));
    assert_eq!(
        session.shop.recently_viewed().recent_first(),
        vec![ProductId::new(3)]
    );
    assert_eq!(session.shop.formatted_cart_total(), "$22.00");
    // Notifications are ephemeral and never persisted.
    assert!(session.shop.notifications().is_empty());
}

#[tokio::test]
async fn test_update_to_zero_empties_persisted_cart() {
    let server = TestServer::spawn(ServerConfig::default()).await;
    let data = tempfile::tempdir().unwrap();

    {
        let mut session = server.session(&data);
        session.shop.cart_mut().add_item(sencha(), 2);
        session.shop.cart_mut().update_quantity(ProductId::new(1), 0);
    }

    assert!(server.session(&data).shop.cart().is_empty());
}

#[tokio::test]
async fn test_detection_without_ip_lookup_uses_timezone() {
    let server = TestServer::spawn(ServerConfig::default()).await;
    let data = tempfile::tempdir().unwrap();

    let mut session = server.session(&data);
    let detection = session.detect_region().await;
    assert_eq!(detection.source, DetectionSource::Timezone);
    assert_eq!(detection.currency, CurrencyCode::RUB);
    assert_eq!(session.shop.preferences().language(), "ru");
}

#[tokio::test]
async fn test_checkout_cart() {
    let server = TestServer::spawn(ServerConfig::default()).await;
    let data = tempfile::tempdir().unwrap();
    let mut session = server.session(&data);
    session.shop.cart_mut().add_item(sencha(), 3);

    let cart = session.shop.cart();
    let request = OrderRequest {
        shipping_info: Some(ShippingInfo {
            first_name: Some("Ivan".to_string()),
            last_name: Some("Sokolov".to_string()),
            email: Some("ivan@example.ru".to_string()),
            address: Some("Nevsky 10".to_string()),
            city: Some("Saint Petersburg".to_string()),
            ..ShippingInfo::default()
        }),
        cart_items: Some(cart.items().iter().map(OrderLine::from).collect()),
        payment_method: Some("cash".to_string()),
        order_total: Some(cart.total_price()),
        subtotal: Some(cart.total_price()),
        shipping: None,
        tax: None,
    };

    let response = session.forms.order(&request).await.unwrap();
    assert!(response.order_id.starts_with("ORD-"));
}
