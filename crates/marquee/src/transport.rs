//! Shared HTTP plumbing for the remote clients

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Once;
use std::time::Duration;

use marquee_core::{Error, Result};

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring provider for rustls once per process
pub(crate) fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Another component may have installed one already
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build a client with pooled connections and a request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    ensure_crypto_provider();
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
}

/// Send a GET and decode a JSON body
///
/// Transport failures carry no status; non-success responses carry theirs.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| Error::transport(format!("{what}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::remote_status(
            status.as_u16(),
            format!("{what}: {status}"),
        ));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::transport(format!("{what}: {e}")))?;
    serde_json::from_slice(&body).map_err(|e| Error::Deserialization(format!("{what}: {e}")))
}
