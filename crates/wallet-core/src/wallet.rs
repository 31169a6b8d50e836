use std::collections::BTreeMap;

use chain_btc::esplora::{EsploraApi, EsploraClient};
use chain_eth::rpc::{EthRpc, HttpRpcClient};
use rust_decimal::Decimal;
use secrecy::SecretString;

use crate::amount::Balance;
use crate::config::{Config, Network, ProviderType};
use crate::error::WalletError;
use crate::hd_derivation::{derive, master_key, DerivationPath};
use crate::provider::{BitcoinProvider, ChainProvider, EthereumProvider, TokenProvider};
use crate::vault::SeedVault;

/// Builds the network collaborators for each configured provider.
pub trait Connector {
    fn esplora(
        &self,
        service_url: &str,
        proxy_url: Option<&str>,
    ) -> Result<Box<dyn EsploraApi>, WalletError>;

    fn eth_rpc(
        &self,
        service_url: &str,
        proxy_url: Option<&str>,
    ) -> Result<Box<dyn EthRpc>, WalletError>;
}

/// Blocking HTTP clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn esplora(
        &self,
        service_url: &str,
        proxy_url: Option<&str>,
    ) -> Result<Box<dyn EsploraApi>, WalletError> {
        Ok(Box::new(EsploraClient::new(service_url, proxy_url)?))
    }

    fn eth_rpc(
        &self,
        service_url: &str,
        proxy_url: Option<&str>,
    ) -> Result<Box<dyn EthRpc>, WalletError> {
        Ok(Box::new(HttpRpcClient::new(service_url, proxy_url)?))
    }
}

/// Routes address, balance and send requests to the provider configured
/// for each currency label.
pub struct MultiWallet {
    network: Network,
    providers: BTreeMap<String, ChainProvider>,
}

impl MultiWallet {
    /// Validate `config`, unlock the vault and connect over HTTP.
    pub fn open(
        config: &Config,
        vault: &SeedVault,
        password: &SecretString,
    ) -> Result<Self, WalletError> {
        config.validate()?;
        let seed = vault.unlock(password)?;
        Self::from_seed_with(config, &seed, &HttpConnector)
    }

    /// Derive every provider's key from `seed` and wire it to collaborators
    /// built by `connector`. Performs no network I/O itself.
    pub fn from_seed_with(
        config: &Config,
        seed: &[u8],
        connector: &dyn Connector,
    ) -> Result<Self, WalletError> {
        let network = config.validate()?;
        let master = master_key(seed)?;
        let proxy = config.proxy_url.as_deref();

        let mut providers = BTreeMap::new();
        for info in &config.providers {
            let path = DerivationPath::parse(&info.derivation_path)?;
            let key = derive(&master, &path)?;

            let provider = match info.provider_type {
                ProviderType::Bitcoin => ChainProvider::bitcoin(BitcoinProvider::new(
                    key,
                    network.bitcoin(),
                    config.fees.btc_policy(),
                    connector.esplora(&info.service_url, proxy)?,
                )?),
                ProviderType::Ethereum => ChainProvider::EthereumNative(EthereumProvider::new(
                    key,
                    config.fees.eth_policy(),
                    connector.eth_rpc(&info.service_url, proxy)?,
                )?),
                ProviderType::Erc20 => {
                    let token = info.token_address.as_deref().ok_or_else(|| {
                        WalletError::InvalidConfig(format!(
                            "{}: ERC20 provider requires token_address",
                            info.currency
                        ))
                    })?;
                    let inner = EthereumProvider::new(
                        key,
                        config.fees.eth_policy(),
                        connector.eth_rpc(&info.service_url, proxy)?,
                    )?;
                    ChainProvider::EthereumToken(TokenProvider::new(inner, token)?)
                }
            };

            tracing::debug!(
                currency = %info.currency,
                provider_type = ?info.provider_type,
                path = %info.derivation_path,
                address = %provider.address(),
                "provider ready"
            );
            providers.insert(info.currency.clone(), provider);
        }

        Ok(Self { network, providers })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Configured currency labels, sorted.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn address(&self, currency: &str) -> Result<String, WalletError> {
        Ok(self.provider(currency)?.address().to_owned())
    }

    pub fn balance(&mut self, currency: &str) -> Result<Balance, WalletError> {
        self.provider_mut(currency)?.balance()
    }

    pub fn send(
        &mut self,
        currency: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<String, WalletError> {
        self.provider_mut(currency)?.send(recipient, amount)
    }

    fn provider(&self, currency: &str) -> Result<&ChainProvider, WalletError> {
        self.providers
            .get(currency)
            .ok_or_else(|| WalletError::UnknownCurrency(currency.to_owned()))
    }

    fn provider_mut(&mut self, currency: &str) -> Result<&mut ChainProvider, WalletError> {
        self.providers
            .get_mut(currency)
            .ok_or_else(|| WalletError::UnknownCurrency(currency.to_owned()))
    }
}
