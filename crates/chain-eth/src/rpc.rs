//! Ethereum JSON-RPC access.
//!
//! [`EthRpc`] is the set of node queries a send or balance lookup needs.
//! [`HttpRpcClient`] implements it with JSON-RPC 2.0 over blocking HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::EthError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A message call used for `eth_call` and `eth_estimateGas`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<[u8; 20]>,
    pub to: [u8; 20],
    pub data: Vec<u8>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl CallRequest {
    pub fn new(to: [u8; 20], data: Vec<u8>) -> Self {
        Self {
            to,
            data,
            ..Self::default()
        }
    }

    fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        if let Some(from) = &self.from {
            obj.insert("from".into(), json!(format!("0x{}", hex::encode(from))));
        }
        obj.insert("to".into(), json!(format!("0x{}", hex::encode(self.to))));
        obj.insert("data".into(), json!(format!("0x{}", hex::encode(&self.data))));
        if let Some(cap) = self.max_fee_per_gas {
            obj.insert("maxFeePerGas".into(), json!(format!("{cap:#x}")));
        }
        if let Some(tip) = self.max_priority_fee_per_gas {
            obj.insert("maxPriorityFeePerGas".into(), json!(format!("{tip:#x}")));
        }
        Value::Object(obj)
    }
}

/// Node operations used by the Ethereum providers.
pub trait EthRpc {
    /// Balance in wei at the latest block.
    fn balance(&self, address: &[u8; 20]) -> Result<U256, EthError>;

    /// Transaction count including pending transactions.
    fn pending_nonce(&self, address: &[u8; 20]) -> Result<u64, EthError>;

    fn chain_id(&self) -> Result<u64, EthError>;

    /// Suggested priority fee per gas, in wei.
    fn max_priority_fee(&self) -> Result<u128, EthError>;

    /// Base fee of the latest block, in wei.
    fn base_fee(&self) -> Result<u128, EthError>;

    fn estimate_gas(&self, call: &CallRequest) -> Result<u64, EthError>;

    /// Executes a read-only call at the latest block and returns the output.
    fn call(&self, call: &CallRequest) -> Result<Vec<u8>, EthError>;

    /// Submits a signed transaction; returns the hash the node reports.
    fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, EthError>;
}

pub struct HttpRpcClient {
    url: String,
    http: reqwest::blocking::Client,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(url: &str, proxy_url: Option<&str>) -> Result<Self, EthError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| EthError::Request(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| EthError::Request(format!("http client: {e}")))?;

        Ok(Self {
            url: url.to_owned(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    fn request<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, EthError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        tracing::debug!(method, id, url = %self.url, "rpc request");

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| EthError::Request(format!("{method}: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| EthError::Request(format!("{method}: reading body: {e}")))?;
        let text = check_status(status, text)?;

        decode_response(method, &text)
    }
}

impl EthRpc for HttpRpcClient {
    fn balance(&self, address: &[u8; 20]) -> Result<U256, EthError> {
        let hex: String = self.request("eth_getBalance", vec![hex_address(address), json!("latest")])?;
        parse_u256(&hex)
    }

    fn pending_nonce(&self, address: &[u8; 20]) -> Result<u64, EthError> {
        let hex: String =
            self.request("eth_getTransactionCount", vec![hex_address(address), json!("pending")])?;
        parse_u64(&hex)
    }

    fn chain_id(&self) -> Result<u64, EthError> {
        let hex: String = self.request("eth_chainId", vec![])?;
        parse_u64(&hex)
    }

    fn max_priority_fee(&self) -> Result<u128, EthError> {
        let hex: String = self.request("eth_maxPriorityFeePerGas", vec![])?;
        parse_u128(&hex)
    }

    fn base_fee(&self) -> Result<u128, EthError> {
        let block: Option<BlockHeader> =
            self.request("eth_getBlockByNumber", vec![json!("latest"), json!(false)])?;
        let block = block.ok_or_else(|| EthError::Decode("latest block not found".into()))?;
        let base_fee = block
            .base_fee_per_gas
            .ok_or_else(|| EthError::Decode("latest block has no baseFeePerGas".into()))?;
        parse_u128(&base_fee)
    }

    fn estimate_gas(&self, call: &CallRequest) -> Result<u64, EthError> {
        let hex: String = self.request("eth_estimateGas", vec![call.to_json()])?;
        parse_u64(&hex)
    }

    fn call(&self, call: &CallRequest) -> Result<Vec<u8>, EthError> {
        let hex: String = self.request("eth_call", vec![call.to_json(), json!("latest")])?;
        parse_data(&hex)
    }

    fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, EthError> {
        let raw = format!("0x{}", hex::encode(raw_tx));
        self.request("eth_sendRawTransaction", vec![json!(raw)])
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockHeader {
    base_fee_per_gas: Option<String>,
}

/// A non-success status turns the body, verbatim, into the error.
fn check_status(status: reqwest::StatusCode, body: String) -> Result<String, EthError> {
    if !status.is_success() {
        return Err(EthError::Request(body));
    }
    Ok(body)
}

fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, EthError> {
    let resp: JsonRpcResponse = serde_json::from_str(body)
        .map_err(|e| EthError::Decode(format!("{method}: {e}")))?;

    if let Some(err) = resp.error {
        return Err(EthError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    // `null` is a legitimate result for some methods, e.g. an unknown block.
    let result = resp.result.unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| EthError::Decode(format!("{method}: {e}")))
}

fn hex_address(address: &[u8; 20]) -> Value {
    json!(format!("0x{}", hex::encode(address)))
}

fn quantity_digits(hex: &str) -> Result<&str, EthError> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| EthError::Decode(format!("quantity without 0x prefix: {hex}")))?;
    if digits.is_empty() {
        return Err(EthError::Decode("empty quantity".into()));
    }
    Ok(digits)
}

fn parse_u64(hex: &str) -> Result<u64, EthError> {
    u64::from_str_radix(quantity_digits(hex)?, 16)
        .map_err(|e| EthError::Decode(format!("quantity {hex}: {e}")))
}

fn parse_u128(hex: &str) -> Result<u128, EthError> {
    u128::from_str_radix(quantity_digits(hex)?, 16)
        .map_err(|e| EthError::Decode(format!("quantity {hex}: {e}")))
}

fn parse_u256(hex: &str) -> Result<U256, EthError> {
    U256::from_str_radix(quantity_digits(hex)?, 16)
        .map_err(|e| EthError::Decode(format!("quantity {hex}: {e}")))
}

fn parse_data(hex: &str) -> Result<Vec<u8>, EthError> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| EthError::Decode(format!("data without 0x prefix: {hex}")))?;
    hex::decode(digits).map_err(|e| EthError::Decode(format!("data {hex}: {e}")))
}
