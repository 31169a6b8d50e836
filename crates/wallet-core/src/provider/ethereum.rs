use alloy_primitives::U256;
use chain_eth::address::{parse_address, pubkey_bytes_to_eth_address};
use chain_eth::erc20;
use chain_eth::fee::{EthFeePolicy, FeeQuote};
use chain_eth::rpc::{CallRequest, EthRpc};
use chain_eth::transaction::{build_erc20_transfer, build_transfer, sign_transaction, EthTransaction};
use rust_decimal::Decimal;

use crate::amount::{to_base_units, Balance, ETH_DECIMALS};
use crate::error::WalletError;
use crate::hd_derivation::LeafKey;

/// Account state fetched before every send.
struct SendContext {
    nonce: u64,
    chain_id: u64,
    base_fee: u128,
    tip: u128,
}

/// Native ETH on any EIP-1559 chain. The chain id comes from the node.
pub struct EthereumProvider {
    key: LeafKey,
    address: String,
    raw_address: [u8; 20],
    fees: EthFeePolicy,
    rpc: Box<dyn EthRpc>,
}

impl EthereumProvider {
    pub fn new(key: LeafKey, fees: EthFeePolicy, rpc: Box<dyn EthRpc>) -> Result<Self, WalletError> {
        let address = pubkey_bytes_to_eth_address(key.public_key_compressed())?;
        let raw_address = parse_address(&address)?;
        Ok(Self {
            key,
            address,
            raw_address,
            fees,
            rpc,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn balance(&self) -> Result<Balance, WalletError> {
        let wei = self.rpc.balance(&self.raw_address)?;
        Ok(Balance::new(wei, ETH_DECIMALS))
    }

    pub fn send(&self, recipient: &str, amount: Decimal) -> Result<String, WalletError> {
        let to = parse_address(recipient)?;
        let value = to_base_units(amount, ETH_DECIMALS)?;

        let ctx = self.send_context()?;
        let fees = self.fees.native_fee(ctx.base_fee, ctx.tip);
        let tx = build_transfer(
            ctx.chain_id,
            ctx.nonce,
            to,
            value,
            fees,
            self.fees.transfer_gas_limit,
        );
        self.sign_and_broadcast(&tx)
    }

    fn send_context(&self) -> Result<SendContext, WalletError> {
        let nonce = self.rpc.pending_nonce(&self.raw_address)?;
        let chain_id = self.rpc.chain_id()?;
        let tip = self.rpc.max_priority_fee()?;
        let base_fee = self.rpc.base_fee()?;
        tracing::debug!(nonce, chain_id, base_fee, tip, "fee market state");
        Ok(SendContext {
            nonce,
            chain_id,
            base_fee,
            tip,
        })
    }

    fn sign_and_broadcast(&self, tx: &EthTransaction) -> Result<String, WalletError> {
        let signed = sign_transaction(tx, self.key.private_key())?;
        let reported = self.rpc.send_raw_transaction(&signed.raw_tx)?;
        tracing::info!(
            tx_hash = %signed.tx_hash,
            chain_id = tx.chain_id,
            nonce = tx.nonce,
            gas_limit = tx.gas_limit,
            max_fee_per_gas = tx.max_fee_per_gas,
            "ethereum transaction broadcast"
        );
        if !reported.eq_ignore_ascii_case(&signed.tx_hash) {
            tracing::debug!(%reported, "node reported a different transaction hash");
        }
        Ok(signed.tx_hash)
    }
}

/// ERC-20 token held by the same account type as [`EthereumProvider`].
pub struct TokenProvider {
    inner: EthereumProvider,
    token: [u8; 20],
}

impl TokenProvider {
    pub fn new(inner: EthereumProvider, token_address: &str) -> Result<Self, WalletError> {
        let token = parse_address(token_address).map_err(|e| {
            WalletError::InvalidConfig(format!("token_address {token_address:?}: {e}"))
        })?;
        Ok(Self { inner, token })
    }

    pub fn address(&self) -> &str {
        self.inner.address()
    }

    pub fn balance(&self) -> Result<Balance, WalletError> {
        let data = self.inner.rpc.call(&CallRequest::new(
            self.token,
            erc20::encode_balance_of(&self.inner.raw_address),
        ))?;
        let units = erc20::decode_balance(&data)?;
        Ok(Balance::new(units, self.decimals()?))
    }

    pub fn send(&self, recipient: &str, amount: Decimal) -> Result<String, WalletError> {
        let to = parse_address(recipient)?;
        let decimals = self.decimals()?;
        let units = to_base_units(amount, decimals)?;

        let ctx = self.inner.send_context()?;
        let fees = self.inner.fees.token_fee(ctx.base_fee, ctx.tip);
        let gas_limit = self.gas_limit(&to, units, fees);

        let tx = build_erc20_transfer(
            ctx.chain_id,
            ctx.nonce,
            self.token,
            &to,
            units,
            fees,
            gas_limit,
        );
        self.inner.sign_and_broadcast(&tx)
    }

    fn decimals(&self) -> Result<u8, WalletError> {
        let data = self
            .inner
            .rpc
            .call(&CallRequest::new(self.token, erc20::encode_decimals()))?;
        Ok(erc20::decode_decimals(&data)?)
    }

    /// Estimated transfer gas, buffered. Falls back to the fixed limit if
    /// the node cannot simulate the call.
    fn gas_limit(&self, to: &[u8; 20], units: U256, fees: FeeQuote) -> u64 {
        let call = CallRequest {
            from: Some(self.inner.raw_address),
            to: self.token,
            data: erc20::encode_transfer(to, units),
            max_fee_per_gas: Some(fees.max_fee_per_gas),
            max_priority_fee_per_gas: Some(fees.max_priority_fee_per_gas),
        };

        let estimate = match self.inner.rpc.estimate_gas(&call) {
            Ok(gas) => Some(gas),
            Err(e) => {
                let err = WalletError::GasEstimationFailed(e.to_string());
                tracing::warn!(
                    error = %err,
                    fallback = self.inner.fees.erc20_fallback_gas_limit,
                    "using fallback gas limit"
                );
                None
            }
        };
        self.inner.fees.token_gas_limit(estimate)
    }
}
