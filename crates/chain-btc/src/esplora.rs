//! Minimal blocking client for an Esplora-compatible block explorer.

use std::time::Duration;

use crate::error::BtcError;
use crate::utxo::Utxo;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The explorer operations the wallet depends on.
pub trait EsploraApi {
    /// Unspent outputs currently paying to `address`.
    fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, BtcError>;

    /// Submit a hex-encoded transaction. Returns the txid the service echoes.
    fn broadcast(&self, raw_tx_hex: &str) -> Result<String, BtcError>;
}

pub struct EsploraClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl EsploraClient {
    /// `service_url` is the explorer root; `/api` is appended unless the URL
    /// already ends with it.
    pub fn new(service_url: &str, proxy_url: Option<&str>) -> Result<Self, BtcError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| BtcError::Request(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| BtcError::Request(format!("http client: {e}")))?;

        Ok(Self {
            base_url: api_base(service_url),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn read_body(resp: reqwest::blocking::Response) -> Result<String, BtcError> {
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| BtcError::Request(format!("reading response body: {e}")))?;
        check_status(status, body)
    }
}

impl EsploraApi for EsploraClient {
    fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, BtcError> {
        let url = format!("{}/address/{address}/utxo", self.base_url);
        tracing::debug!(%url, "fetching utxos");

        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| BtcError::Request(e.to_string()))?;
        let body = Self::read_body(resp)?;

        serde_json::from_str(&body).map_err(|e| BtcError::Decode(format!("utxo list: {e}")))
    }

    fn broadcast(&self, raw_tx_hex: &str) -> Result<String, BtcError> {
        let url = format!("{}/tx", self.base_url);
        tracing::debug!(%url, bytes = raw_tx_hex.len() / 2, "broadcasting transaction");

        let resp = self
            .http
            .post(&url)
            .body(raw_tx_hex.to_owned())
            .send()
            .map_err(|e| BtcError::Request(e.to_string()))?;
        let body = Self::read_body(resp)?;

        Ok(body.trim().to_owned())
    }
}

/// A non-success status turns the body, verbatim, into the error.
fn check_status(status: reqwest::StatusCode, body: String) -> Result<String, BtcError> {
    if !status.is_success() {
        return Err(BtcError::Request(body));
    }
    Ok(body)
}

fn api_base(service_url: &str) -> String {
    let trimmed = service_url.trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/api")
    }
}
