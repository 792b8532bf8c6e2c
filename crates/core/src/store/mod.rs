//! Client-side commerce stores.
//!
//! # Stores
//!
//! | Store | Storage key | Notifies |
//! |---|---|---|
//! | [`CartStore`] | `teahouse-cart` | add / remove / clear |
//! | [`WishlistStore`] | `teahouse-wishlist` | add / remove |
//! | [`ComparisonStore`] | `teahouse-comparison` | add / remove / full |
//! | [`RecentlyViewedStore`] | `teahouse-recently-viewed` | never |
//! | [`PreferencesStore`] | `teahouse-preferences` | never |
//!
//! Mutations are synchronous and applied in call order. Each one saves the
//! whole store through [`Persisted`] before returning.

pub mod cart;
pub mod context;
pub mod lists;
pub mod notify;
pub mod persist;
pub mod preferences;
pub mod totals;

pub use cart::{CartState, CartStore, LineItem, LineKey, MAX_LINE_QUANTITY};
pub use context::ShopContext;
pub use lists::{AddOutcome, ComparisonStore, IdList, RecentlyViewedStore, TrackedId, WishlistStore};
pub use notify::{Notification, NotificationKind, Notifier};
pub use persist::{MemoryStorage, Persisted, Storage, StorageError, StoreKey};
pub use preferences::{PreferencesState, PreferencesStore};
