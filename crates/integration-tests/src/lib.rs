//! End-to-end test harness for Teahouse.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p teahouse-integration-tests
//! ```
//!
//! No external services are needed: [`TestServer::spawn`] starts the form
//! backend on an ephemeral local port and [`TestServer::session`] builds a
//! client session over a temporary data directory with IP lookup disabled.

use std::net::SocketAddr;
use std::time::Duration;

use teahouse_client::{ClientConfig, FormsClient, Session};
use teahouse_core::region::ClientEnvironment;
use teahouse_server::{AppState, ServerConfig};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

/// A form backend running in the background of the current runtime.
pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: Url,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve the full application.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = teahouse_server::app(AppState::new(config));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            handle,
        }
    }

    /// A forms client pointed at this server.
    #[must_use]
    pub fn forms(&self) -> FormsClient {
        FormsClient::new(reqwest::Client::new(), self.base_url.clone())
    }

    /// A client configuration pointed at this server, storing state in `data`.
    #[must_use]
    pub fn client_config(&self, data: &TempDir) -> ClientConfig {
        ClientConfig {
            api_url: self.base_url.clone(),
            data_dir: data.path().to_path_buf(),
            geo_url: self.base_url.join("no-geo").unwrap_or_else(|_| self.base_url.clone()),
            geo_timeout: Duration::from_millis(200),
            geo_disabled: true,
            environment: ClientEnvironment {
                timezone: Some("Europe/Moscow".to_string()),
                locale: Some("ru-RU".to_string()),
            },
        }
    }

    /// Open a client session backed by files in `data`.
    ///
    /// # Panics
    ///
    /// Panics if the data directory cannot be used.
    #[allow(clippy::unwrap_used)]
    pub fn session(&self, data: &TempDir) -> Session {
        Session::open(&self.client_config(data)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
