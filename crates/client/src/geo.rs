//! HTTP IP geolocation lookup (ipapi-compatible JSON).

use teahouse_core::region::{IpLocation, IpLookup, LookupError};
use url::Url;

/// Looks up the caller's location with a single GET request.
#[derive(Debug, Clone)]
pub struct IpApiLookup {
    client: reqwest::Client,
    url: Url,
}

impl IpApiLookup {
    #[must_use]
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl IpLookup for IpApiLookup {
    async fn lookup(&self) -> Result<IpLocation, LookupError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json::<IpLocation>()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

/// Either a real lookup or none at all, chosen at runtime.
#[derive(Debug, Clone)]
pub enum SessionLookup {
    Http(IpApiLookup),
    Disabled,
}

impl IpLookup for SessionLookup {
    async fn lookup(&self) -> Result<IpLocation, LookupError> {
        match self {
            Self::Http(lookup) => lookup.lookup().await,
            Self::Disabled => Err(LookupError::Disabled),
        }
    }
}
