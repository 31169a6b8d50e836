use chain_btc::address::pubkey_to_p2wpkh_address;
use chain_btc::esplora::EsploraApi;
use chain_btc::fee::FeePolicy;
use chain_btc::network::BtcNetwork;
use chain_btc::transaction::{build_p2wpkh_transaction, sign_transaction};
use chain_btc::utxo::{select_largest_first, UtxoSet};
use rust_decimal::Decimal;

use crate::amount::{to_satoshis, Balance};
use crate::error::WalletError;
use crate::hd_derivation::LeafKey;

/// Native SegWit wallet for a single derived key. Change returns to the
/// same address.
pub struct BitcoinProvider {
    key: LeafKey,
    address: String,
    network: BtcNetwork,
    fees: FeePolicy,
    api: Box<dyn EsploraApi>,
}

impl BitcoinProvider {
    pub fn new(
        key: LeafKey,
        network: BtcNetwork,
        fees: FeePolicy,
        api: Box<dyn EsploraApi>,
    ) -> Result<Self, WalletError> {
        let address = pubkey_to_p2wpkh_address(key.public_key_compressed(), network)?;
        Ok(Self {
            key,
            address,
            network,
            fees,
            api,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Re-fetch the address's UTXOs into `utxos` and sum them.
    pub fn balance(&self, utxos: &mut UtxoSet) -> Result<Balance, WalletError> {
        let fetched = self.api.fetch_utxos(&self.address)?;
        tracing::debug!(address = %self.address, count = fetched.len(), "utxos refreshed");
        utxos.replace(fetched);
        Ok(Balance::from_satoshis(utxos.total_sat()))
    }

    pub fn send(
        &self,
        utxos: &mut UtxoSet,
        recipient: &str,
        amount: Decimal,
    ) -> Result<String, WalletError> {
        let amount_sat = to_satoshis(amount)?;

        if utxos.is_empty() {
            self.balance(utxos)?;
        }

        let selection = select_largest_first(utxos.as_slice(), amount_sat);
        let unsigned = build_p2wpkh_transaction(
            &selection,
            recipient,
            amount_sat,
            &self.address,
            self.fees,
            self.network,
        )?;
        let signed = sign_transaction(&unsigned, self.key.private_key())?;

        // Stale after any broadcast attempt; the next send re-fetches.
        let broadcast = self.api.broadcast(&signed.to_hex());
        utxos.clear();
        let response = broadcast?;
        tracing::info!(
            txid = %signed.txid,
            inputs = selection.selected.len(),
            amount_sat,
            fee_sat = unsigned.fee_sat,
            "bitcoin transaction broadcast"
        );
        if response != signed.txid.to_string() {
            tracing::debug!(%response, "broadcast response differs from local txid");
        }

        Ok(response)
    }
}
