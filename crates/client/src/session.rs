//! Session bootstrap: open the stores, detect the region, seed preferences.

use std::sync::Arc;

use teahouse_core::ShopContext;
use teahouse_core::region::{Detection, RegionDetector};
use teahouse_core::store::{Storage, StorageError};

use crate::config::ClientConfig;
use crate::forms::FormsClient;
use crate::geo::{IpApiLookup, SessionLookup};
use crate::storage::FileStorage;

/// Everything a client needs for one shopping session.
#[derive(Debug)]
pub struct Session {
    pub shop: ShopContext,
    pub forms: FormsClient,
    detector: RegionDetector<SessionLookup>,
}

impl Session {
    /// Open file-backed stores and build the network adapters.
    ///
    /// Region detection is not run here; call [`Session::detect_region`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the data directory cannot be created.
    pub fn open(config: &ClientConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
        Ok(Self::with_storage(config, storage))
    }

    /// Build a session over an arbitrary storage backend.
    #[must_use]
    pub fn with_storage(config: &ClientConfig, storage: Arc<dyn Storage>) -> Self {
        let http = reqwest::Client::new();
        let lookup = if config.geo_disabled {
            SessionLookup::Disabled
        } else {
            SessionLookup::Http(IpApiLookup::new(http.clone(), config.geo_url.clone()))
        };

        Self {
            shop: ShopContext::open(storage),
            forms: FormsClient::new(http, config.api_url.clone()),
            detector: RegionDetector::new(lookup, config.environment.clone())
                .with_timeout(config.geo_timeout),
        }
    }

    /// Detect the region once and seed preferences from it.
    ///
    /// Explicit shopper choices are kept. Never fails.
    pub async fn detect_region(&mut self) -> Detection {
        let detection = self.detector.detect().await;
        if self.shop.apply_detection(&detection) {
            tracing::debug!(currency = %detection.currency, language = %detection.language, "Seeded preferences");
        }
        detection
    }
}
