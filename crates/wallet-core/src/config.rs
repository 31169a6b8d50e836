//! YAML wallet configuration.
//!
//! ```yaml
//! network: testnet
//! proxy_url: socks5h://127.0.0.1:9050   # optional
//! providers:
//!   - currency: BTC
//!     provider_type: BTC
//!     service_url: https://mempool.space/signet
//!     derivation_path: m/84'/1'/0'/0/0
//!   - currency: USDC
//!     provider_type: ERC20
//!     service_url: https://ethereum-sepolia-rpc.publicnode.com
//!     token_address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"
//!     derivation_path: m/44'/60'/0'/0/0
//! fees:                                   # optional, per field
//!   btc_sat_per_vbyte: 3
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use chain_btc::fee::FeePolicy;
use chain_btc::network::BtcNetwork;
use chain_eth::fee::EthFeePolicy;
use serde::Deserialize;

use crate::error::WalletError;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub network: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
    #[serde(default)]
    pub fees: FeeOverrides,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderInfo {
    pub currency: String,
    pub provider_type: ProviderType,
    pub service_url: String,
    #[serde(default)]
    pub token_address: Option<String>,
    pub derivation_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "BTC", alias = "BtcProvider")]
    Bitcoin,
    #[serde(rename = "ETH", alias = "EthProvider")]
    Ethereum,
    #[serde(rename = "ERC20", alias = "EthTokenProvider")]
    Erc20,
}

/// Optional replacements for the built-in fee policy constants.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FeeOverrides {
    pub btc_sat_per_vbyte: Option<u64>,
    pub eth_transfer_gas_limit: Option<u64>,
    pub erc20_fallback_gas_limit: Option<u64>,
    pub erc20_gas_buffer_percent: Option<u64>,
    pub erc20_fee_cap_buffer_percent: Option<u128>,
}

impl FeeOverrides {
    pub fn btc_policy(&self) -> FeePolicy {
        let mut policy = FeePolicy::default();
        if let Some(rate) = self.btc_sat_per_vbyte {
            policy.sat_per_vbyte = rate;
        }
        policy
    }

    pub fn eth_policy(&self) -> EthFeePolicy {
        let defaults = EthFeePolicy::default();
        EthFeePolicy {
            transfer_gas_limit: self
                .eth_transfer_gas_limit
                .unwrap_or(defaults.transfer_gas_limit),
            erc20_fallback_gas_limit: self
                .erc20_fallback_gas_limit
                .unwrap_or(defaults.erc20_fallback_gas_limit),
            erc20_gas_buffer_percent: self
                .erc20_gas_buffer_percent
                .unwrap_or(defaults.erc20_gas_buffer_percent),
            erc20_fee_cap_buffer_percent: self
                .erc20_fee_cap_buffer_percent
                .unwrap_or(defaults.erc20_fee_cap_buffer_percent),
        }
    }
}

/// Wallet-wide network selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn parse(label: &str) -> Result<Self, WalletError> {
        match label {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(WalletError::UnknownNetwork(other.to_owned())),
        }
    }

    /// Bitcoin parameters. `testnet` means signet.
    pub fn bitcoin(self) -> BtcNetwork {
        match self {
            Network::Mainnet => BtcNetwork::Mainnet,
            Network::Testnet => BtcNetwork::Signet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WalletError> {
        serde_yaml::from_str(yaml).map_err(|e| WalletError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .map_err(|e| WalletError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks that need no seed or network access.
    pub fn validate(&self) -> Result<Network, WalletError> {
        let network = Network::parse(&self.network)?;

        let mut seen = HashSet::new();
        for info in &self.providers {
            if !seen.insert(info.currency.as_str()) {
                return Err(WalletError::InvalidConfig(format!(
                    "duplicate currency {:?}",
                    info.currency
                )));
            }
            if info.provider_type == ProviderType::Erc20 && info.token_address.is_none() {
                return Err(WalletError::InvalidConfig(format!(
                    "{}: ERC20 provider requires token_address",
                    info.currency
                )));
            }
        }

        Ok(network)
    }
}
