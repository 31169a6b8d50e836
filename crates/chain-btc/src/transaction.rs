use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::script::ScriptBuf;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{Amount, CompressedPublicKey, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use zeroize::Zeroize;

use crate::address::parse_address;
use crate::error::BtcError;
use crate::fee::{FeePolicy, OUTPUTS_PER_SEND};
use crate::network::BtcNetwork;
use crate::utxo::CoinSelection;

/// An unsigned Bitcoin transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedBtcTx {
    /// The transaction with empty witnesses.
    pub tx: Transaction,
    /// Value of each spent output, in input order. BIP-143 commits to it.
    pub input_values: Vec<Amount>,
    /// Fee paid by this transaction, in satoshis.
    pub fee_sat: u64,
}

/// A fully signed transaction in canonical wire encoding.
#[derive(Debug, Clone)]
pub struct SignedBtcTx {
    pub raw: Vec<u8>,
    pub txid: Txid,
}

impl SignedBtcTx {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.raw)
    }
}

/// Build an unsigned P2WPKH spend of `selection`.
///
/// Outputs are always `[recipient: amount_sat, change: total - amount - fee]`
/// with the fee computed for `selection.len()` inputs and two outputs. Fails
/// with [`BtcError::AmountTooSmall`] unless the change is strictly positive.
/// Any undecodable address or txid aborts the whole build.
pub fn build_p2wpkh_transaction(
    selection: &CoinSelection,
    recipient: &str,
    amount_sat: u64,
    change_address: &str,
    policy: FeePolicy,
    network: BtcNetwork,
) -> Result<UnsignedBtcTx, BtcError> {
    let fee_sat = policy.fee_for(selection.selected.len(), OUTPUTS_PER_SEND);

    let change_sat = match selection.total_sat.checked_sub(fee_sat) {
        Some(spendable) if amount_sat < spendable => spendable - amount_sat,
        _ => {
            return Err(BtcError::AmountTooSmall {
                requested_sat: amount_sat,
                selected_sat: selection.total_sat,
                fee_sat,
            })
        }
    };

    let recipient_addr = parse_address(recipient, network)?;
    let change_addr = parse_address(change_address, network)?;

    let mut inputs = Vec::with_capacity(selection.selected.len());
    let mut input_values = Vec::with_capacity(selection.selected.len());

    for utxo in &selection.selected {
        let txid: Txid = utxo
            .txid
            .parse()
            .map_err(|e| BtcError::InvalidPrevout(format!("txid {:?}: {e}", utxo.txid)))?;

        inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::default(),
        });
        input_values.push(Amount::from_sat(utxo.value));
    }

    let outputs = vec![
        TxOut {
            value: Amount::from_sat(amount_sat),
            script_pubkey: recipient_addr.script_pubkey(),
        },
        TxOut {
            value: Amount::from_sat(change_sat),
            script_pubkey: change_addr.script_pubkey(),
        },
    ];

    let tx = Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    };

    Ok(UnsignedBtcTx {
        tx,
        input_values,
        fee_sat,
    })
}

/// Sign every input of `unsigned` with one private key.
///
/// All inputs are assumed to pay to the P2WPKH address of that key. Each
/// witness is `[DER signature || SIGHASH_ALL, compressed pubkey]` over the
/// BIP-143 digest.
pub fn sign_transaction(
    unsigned: &UnsignedBtcTx,
    private_key: &[u8; 32],
) -> Result<SignedBtcTx, BtcError> {
    if unsigned.input_values.len() != unsigned.tx.input.len() {
        return Err(BtcError::SigningError(format!(
            "{} inputs but {} input values",
            unsigned.tx.input.len(),
            unsigned.input_values.len()
        )));
    }

    let secp = Secp256k1::new();
    let mut key_bytes = *private_key;
    let secret_key = SecretKey::from_slice(&key_bytes)
        .map_err(|e| BtcError::InvalidPrivateKey(format!("invalid secret key: {e}")));
    key_bytes.zeroize();
    let secret_key = secret_key?;

    let public_key = PublicKey::from_secret_key(&secp, &secret_key);
    let script_pubkey = ScriptBuf::new_p2wpkh(&CompressedPublicKey(public_key).wpubkey_hash());

    let mut sighash_cache = SighashCache::new(&unsigned.tx);
    let mut witnesses = Vec::with_capacity(unsigned.tx.input.len());

    for (input_index, value) in unsigned.input_values.iter().enumerate() {
        let sighash = sighash_cache
            .p2wpkh_signature_hash(input_index, &script_pubkey, *value, EcdsaSighashType::All)
            .map_err(|e| BtcError::SigningError(format!("sighash for input {input_index}: {e}")))?;

        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = secp.sign_ecdsa(&msg, &secret_key);

        let mut sig_bytes = signature.serialize_der().to_vec();
        sig_bytes.push(EcdsaSighashType::All as u8);

        let mut witness = Witness::new();
        witness.push(&sig_bytes);
        witness.push(public_key.serialize());
        witnesses.push(witness);
    }

    let mut signed_tx = unsigned.tx.clone();
    for (input, witness) in signed_tx.input.iter_mut().zip(witnesses) {
        input.witness = witness;
    }

    Ok(SignedBtcTx {
        raw: bitcoin::consensus::serialize(&signed_tx),
        txid: signed_tx.compute_txid(),
    })
}
