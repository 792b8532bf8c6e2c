//! HTTP client for the forms backend.

use serde::Serialize;
use serde::de::DeserializeOwned;
use teahouse_core::forms::{
    ContactRequest, ContactResponse, ErrorResponse, HealthResponse, LoginAttemptRequest,
    MessageResponse, NewsletterRequest, NewsletterResponse, OrderRequest, OrderResponse,
    RegisterRequest, RegisterResponse,
};
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the forms backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the submission.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of a rejection, if the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(_) | Self::Url(_) => None,
        }
    }
}

/// Submits forms to the backend and reads its health.
#[derive(Debug, Clone)]
pub struct FormsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl FormsClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Subscribe an email to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn newsletter(&self, body: &NewsletterRequest) -> Result<NewsletterResponse, ClientError> {
        self.post("api/forms/newsletter", body).await
    }

    /// Send a contact message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn contact(&self, body: &ContactRequest) -> Result<ContactResponse, ClientError> {
        self.post("api/forms/contact", body).await
    }

    /// Record a login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn login_attempt(&self, body: &LoginAttemptRequest) -> Result<MessageResponse, ClientError> {
        self.post("api/forms/login-attempt", body).await
    }

    /// Register an account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn register(&self, body: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.post("api/forms/register", body).await
    }

    /// Place an order. The response carries the generated order id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn order(&self, body: &OrderRequest) -> Result<OrderResponse, ClientError> {
        self.post("api/forms/order", body).await
    }

    /// Backend liveness.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx answer.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(self.base_url.join("health")?).send().await?;
        read(response).await
    }

    #[tracing::instrument(skip(self, body), fields(base = %self.base_url))]
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let response = self.client.post(url).json(body).send().await?;
        read(response).await
    }
}

async fn read<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    tracing::warn!(status = status.as_u16(), %message, "Form submission rejected");
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
