//! Wishlist, comparison tray and recently-viewed list.
//!
//! All three are ordered sets of product ids with insertion timestamps and
//! share [`IdList`]. They differ only in their [`ListPolicy`]:
//!
//! | Store | Capacity | Re-adding an id |
//! |---|---|---|
//! | wishlist | unbounded | no-op |
//! | comparison | 4, further adds rejected | no-op |
//! | recently viewed | 20, oldest evicted | moves to front |

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::notify::Notifier;
use super::persist::{Persisted, Storage, StoreKey};
use crate::types::ProductId;

pub const WISHLIST_KEY: StoreKey = StoreKey::new("wishlist", 1);
pub const COMPARISON_KEY: StoreKey = StoreKey::new("comparison", 1);
pub const RECENTLY_VIEWED_KEY: StoreKey = StoreKey::new("recently-viewed", 1);

/// Size of the comparison tray.
pub const COMPARISON_CAPACITY: usize = 4;

/// Number of recently viewed products remembered.
pub const RECENTLY_VIEWED_CAPACITY: usize = 20;

/// What happens when a list is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Unbounded,
    /// Refuse new ids once the list holds this many.
    Reject(usize),
    /// Drop the oldest id to make room.
    EvictOldest(usize),
}

/// Behaviour of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    pub capacity: Capacity,
    /// Re-adding an id refreshes it to the most-recent position.
    pub refresh_on_readd: bool,
}

impl ListPolicy {
    pub const WISHLIST: Self = Self {
        capacity: Capacity::Unbounded,
        refresh_on_readd: false,
    };

    pub const COMPARISON: Self = Self {
        capacity: Capacity::Reject(COMPARISON_CAPACITY),
        refresh_on_readd: false,
    };

    pub const RECENTLY_VIEWED: Self = Self {
        capacity: Capacity::EvictOldest(RECENTLY_VIEWED_CAPACITY),
        refresh_on_readd: true,
    };
}

/// Result of [`IdList::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Already present and left where it was.
    AlreadyPresent,
    /// Already present and moved to the most-recent position.
    Refreshed,
    /// Added after evicting the given oldest id.
    Evicted(ProductId),
    /// List is full; nothing changed.
    Rejected,
}

impl AddOutcome {
    /// Whether the id is in the list afterwards.
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// One entry of an [`IdList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedId {
    pub id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Ordered id set, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdList {
    items: Vec<TrackedId>,
}

impl IdList {
    /// Insert `id` according to `policy`.
    pub fn insert(&mut self, id: ProductId, policy: ListPolicy, now: DateTime<Utc>) -> AddOutcome {
        if let Some(index) = self.position(id) {
            if !policy.refresh_on_readd {
                return AddOutcome::AlreadyPresent;
            }
            self.items.remove(index);
            self.items.push(TrackedId { id, added_at: now });
            return AddOutcome::Refreshed;
        }

        let mut outcome = AddOutcome::Added;
        match policy.capacity {
            Capacity::Unbounded => {}
            Capacity::Reject(max) => {
                if self.items.len() >= max {
                    return AddOutcome::Rejected;
                }
            }
            Capacity::EvictOldest(max) => {
                if max == 0 {
                    return AddOutcome::Rejected;
                }
                while self.items.len() >= max {
                    let evicted = self.items.remove(0);
                    outcome = AddOutcome::Evicted(evicted.id);
                }
            }
        }

        self.items.push(TrackedId { id, added_at: now });
        outcome
    }

    /// Remove `id`. Returns whether it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    /// Entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[TrackedId] {
        &self.items
    }

    /// Ids, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|t| t.id).collect()
    }

    /// Ids, most recent first.
    #[must_use]
    pub fn recent_first(&self) -> Vec<ProductId> {
        self.items.iter().rev().map(|t| t.id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Restore `policy`'s invariants on loaded state.
    ///
    /// Duplicate ids collapse to one entry (the newest when re-adding
    /// refreshes, otherwise the oldest). An over-full list keeps its oldest
    /// entries under [`Capacity::Reject`] and its newest under
    /// [`Capacity::EvictOldest`]. Returns whether anything changed.
    pub fn normalize(&mut self, policy: ListPolicy) -> bool {
        let before = self.items.len();

        let mut seen = HashSet::new();
        if policy.refresh_on_readd {
            let mut kept: Vec<TrackedId> = self
                .items
                .iter()
                .rev()
                .filter(|t| seen.insert(t.id))
                .copied()
                .collect();
            kept.reverse();
            self.items = kept;
        } else {
            self.items.retain(|t| seen.insert(t.id));
        }
        let mut changed = self.items.len() != before;

        match policy.capacity {
            Capacity::Unbounded => {}
            Capacity::Reject(max) => {
                if self.items.len() > max {
                    self.items.truncate(max);
                    changed = true;
                }
            }
            Capacity::EvictOldest(max) => {
                if self.items.len() > max {
                    let excess = self.items.len() - max;
                    self.items.drain(..excess);
                    changed = true;
                }
            }
        }
        changed
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|t| t.id == id)
    }
}

/// Persisted [`IdList`] with a fixed policy.
#[derive(Debug)]
struct ListStore {
    inner: Persisted<IdList>,
    policy: ListPolicy,
}

impl ListStore {
    fn open(storage: Arc<dyn Storage>, key: StoreKey, policy: ListPolicy) -> Self {
        Self {
            inner: Persisted::open_with(storage, key, |list: &mut IdList| list.normalize(policy)),
            policy,
        }
    }

    fn add(&mut self, id: ProductId) -> AddOutcome {
        let policy = self.policy;
        // Idempotent and rejected adds change nothing; skip the write.
        if !policy.refresh_on_readd && self.inner.state().contains(id) {
            return AddOutcome::AlreadyPresent;
        }
        if let Capacity::Reject(max) = policy.capacity
            && self.inner.state().len() >= max
        {
            return AddOutcome::Rejected;
        }
        self.inner.mutate(|list| list.insert(id, policy, Utc::now()))
    }

    fn remove(&mut self, id: ProductId) -> bool {
        if !self.inner.state().contains(id) {
            return false;
        }
        self.inner.mutate(|list| list.remove(id))
    }

    fn clear(&mut self) {
        self.inner.mutate(IdList::clear);
    }

    fn list(&self) -> &IdList {
        self.inner.state()
    }
}

macro_rules! list_accessors {
    ($subscribe_doc:literal) => {
        /// Ids, oldest first.
        #[must_use]
        pub fn ids(&self) -> Vec<ProductId> {
            self.store.list().ids()
        }

        /// Underlying list.
        #[must_use]
        pub fn list(&self) -> &IdList {
            self.store.list()
        }

        #[must_use]
        pub fn len(&self) -> usize {
            self.store.list().len()
        }

        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.store.list().is_empty()
        }

        #[doc = $subscribe_doc]
        pub fn subscribe(&mut self, subscriber: impl Fn(&IdList) + Send + Sync + 'static) {
            self.store.inner.subscribe(subscriber);
        }
    };
}

/// Products the shopper saved for later.
#[derive(Debug)]
pub struct WishlistStore {
    store: ListStore,
    notifier: Notifier,
}

impl WishlistStore {
    pub fn open(storage: Arc<dyn Storage>, notifier: Notifier) -> Self {
        Self {
            store: ListStore::open(storage, WISHLIST_KEY, ListPolicy::WISHLIST),
            notifier,
        }
    }

    /// Save a product. Adding one already saved does nothing.
    pub fn add_item(&mut self, id: ProductId) -> AddOutcome {
        let outcome = self.store.add(id);
        if outcome == AddOutcome::Added {
            self.notifier.success("Added to wishlist");
        }
        outcome
    }

    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.notifier.info("Removed from wishlist");
        }
        removed
    }

    /// Add if absent, remove if present. Returns whether it is now saved.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.is_in_wishlist(id) {
            self.remove_item(id);
            false
        } else {
            self.add_item(id).is_present()
        }
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.store.list().contains(id)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    list_accessors!("Register a callback run after every wishlist mutation.");
}

/// Fixed-size tray of products staged for side-by-side comparison.
#[derive(Debug)]
pub struct ComparisonStore {
    store: ListStore,
    notifier: Notifier,
}

impl ComparisonStore {
    pub fn open(storage: Arc<dyn Storage>, notifier: Notifier) -> Self {
        Self {
            store: ListStore::open(storage, COMPARISON_KEY, ListPolicy::COMPARISON),
            notifier,
        }
    }

    /// Stage a product. A full tray rejects the add with a warning.
    pub fn add_item(&mut self, id: ProductId) -> AddOutcome {
        let outcome = self.store.add(id);
        match outcome {
            AddOutcome::Added => {
                self.notifier.success("Added to comparison");
            }
            AddOutcome::Rejected => {
                self.notifier.warning(format!(
                    "You can compare up to {COMPARISON_CAPACITY} products"
                ));
            }
            _ => {}
        }
        outcome
    }

    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.notifier.info("Removed from comparison");
        }
        removed
    }

    #[must_use]
    pub fn is_in_comparison(&self, id: ProductId) -> bool {
        self.store.list().contains(id)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.store.list().len() >= COMPARISON_CAPACITY
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.notifier.info("Comparison cleared");
    }

    list_accessors!("Register a callback run after every comparison mutation.");
}

/// Most recently viewed products.
#[derive(Debug)]
pub struct RecentlyViewedStore {
    store: ListStore,
}

impl RecentlyViewedStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self {
            store: ListStore::open(storage, RECENTLY_VIEWED_KEY, ListPolicy::RECENTLY_VIEWED),
        }
    }

    /// Record a view, moving an already-seen product to the front.
    pub fn add_item(&mut self, id: ProductId) -> AddOutcome {
        self.store.add(id)
    }

    pub fn remove_item(&mut self, id: ProductId) -> bool {
        self.store.remove(id)
    }

    #[must_use]
    pub fn is_recently_viewed(&self, id: ProductId) -> bool {
        self.store.list().contains(id)
    }

    /// Ids, most recent first.
    #[must_use]
    pub fn recent_first(&self) -> Vec<ProductId> {
        self.store.list().recent_first()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    list_accessors!("Register a callback run after every recently-viewed mutation.");
}
