//! Session-scoped container for every store.

use std::sync::Arc;

use super::cart::CartStore;
use super::lists::{ComparisonStore, RecentlyViewedStore, WishlistStore};
use super::notify::{Notification, Notifier};
use super::persist::Storage;
use super::preferences::PreferencesStore;
use crate::currency::{CurrencyCode, PriceFormatter, RegionalFormatter};
use crate::region::Detection;
use crate::types::ProductId;

/// All commerce state for one shopping session.
///
/// Built once at startup and passed to whatever needs it. Tests build a
/// fresh context over [`super::MemoryStorage`] instead of sharing globals.
#[derive(Debug)]
pub struct ShopContext {
    notifier: Notifier,
    cart: CartStore,
    wishlist: WishlistStore,
    comparison: ComparisonStore,
    recently_viewed: RecentlyViewedStore,
    preferences: PreferencesStore,
}

impl ShopContext {
    /// Open every store over the same storage backend.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let notifier = Notifier::new();
        Self {
            cart: CartStore::open(Arc::clone(&storage), notifier.clone()),
            wishlist: WishlistStore::open(Arc::clone(&storage), notifier.clone()),
            comparison: ComparisonStore::open(Arc::clone(&storage), notifier.clone()),
            recently_viewed: RecentlyViewedStore::open(Arc::clone(&storage)),
            preferences: PreferencesStore::open(storage),
            notifier,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn comparison(&self) -> &ComparisonStore {
        &self.comparison
    }

    pub const fn comparison_mut(&mut self) -> &mut ComparisonStore {
        &mut self.comparison
    }

    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewedStore {
        &self.recently_viewed
    }

    pub const fn recently_viewed_mut(&mut self) -> &mut RecentlyViewedStore {
        &mut self.recently_viewed
    }

    #[must_use]
    pub const fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Notifications still on screen.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.active()
    }

    /// Seed display preferences from a region detection.
    pub fn apply_detection(&mut self, detection: &Detection) -> bool {
        self.preferences.apply_detection(detection)
    }

    /// Explicitly switch display currency.
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.preferences.set_currency(currency);
    }

    /// Explicitly switch language.
    pub fn set_language(&mut self, language: &str) {
        self.preferences.set_language(language);
    }

    /// Record a product page view.
    pub fn view_product(&mut self, id: ProductId) {
        self.recently_viewed.add_item(id);
    }

    /// Formatter for the current display currency.
    #[must_use]
    pub fn price_formatter(&self) -> PriceFormatter {
        self.preferences.price_formatter()
    }

    /// Regional formatter for the current preferences.
    #[must_use]
    pub fn regional_formatter(&self) -> RegionalFormatter {
        self.preferences.regional_formatter()
    }

    /// Cart total rendered in the display currency.
    #[must_use]
    pub fn formatted_cart_total(&self) -> String {
        self.regional_formatter().format(self.cart.total_price())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::region::{ClientEnvironment, fallback};
    use crate::store::persist::MemoryStorage;
    use crate::types::ProductSnapshot;

    #[test]
    fn test_context_shares_notifier_across_stores() {
        let mut shop = ShopContext::open(Arc::new(MemoryStorage::new()));
        let sencha = ProductSnapshot::new(ProductId::new(1), "Sencha", Decimal::new(1200, 0)).unwrap();

        shop.cart_mut().add_item(sencha, 1);
        shop.wishlist_mut().add_item(ProductId::new(1));
        shop.comparison_mut().add_item(ProductId::new(1));

        assert_eq!(shop.notifications().len(), 3);
    }

    #[test]
    fn test_fresh_contexts_are_isolated() {
        let mut first = ShopContext::open(Arc::new(MemoryStorage::new()));
        first.wishlist_mut().add_item(ProductId::new(3));

        let second = ShopContext::open(Arc::new(MemoryStorage::new()));
        assert!(second.wishlist().is_empty());
    }

    #[test]
    fn test_formatted_total_follows_currency() {
        let mut shop = ShopContext::open(Arc::new(MemoryStorage::new()));
        let puer = ProductSnapshot::new(ProductId::new(2), "Puer", Decimal::new(1000, 0)).unwrap();
        shop.cart_mut().add_item(puer, 2);
        assert_eq!(shop.formatted_cart_total(), "2 000 ₽");

        shop.set_currency(CurrencyCode::USD);
        assert_eq!(shop.formatted_cart_total(), "$22.00");
    }

    #[test]
    fn test_fallback_detection_keeps_base_currency() {
        let mut shop = ShopContext::open(Arc::new(MemoryStorage::new()));
        let detection = fallback(&ClientEnvironment {
            timezone: None,
            locale: Some("ru-RU".to_string()),
        });
        assert!(shop.apply_detection(&detection));
        assert_eq!(shop.price_formatter().currency(), CurrencyCode::RUB);
        assert_eq!(shop.preferences().language(), "ru");
    }

    #[test]
    fn test_view_product() {
        let mut shop = ShopContext::open(Arc::new(MemoryStorage::new()));
        shop.view_product(ProductId::new(4));
        shop.view_product(ProductId::new(5));
        assert_eq!(
            shop.recently_viewed().recent_first(),
            vec![ProductId::new(5), ProductId::new(4)]
        );
    }
}
