//! Analytic fee estimation for transactions made only of P2WPKH inputs and
//! outputs. The size is computed from fixed per-component byte counts rather
//! than by serializing a draft transaction.

/// Outpoint (36) + empty scriptSig length (1) + sequence (4).
pub const P2WPKH_INPUT_BASE_SIZE: u64 = 41;

/// Value (8) + script length (1) + `OP_0 <20-byte hash>` (22).
pub const P2WPKH_OUTPUT_SIZE: u64 = 31;

/// Item count (1) + signature (1 + 72) + compressed pubkey (1 + 33).
pub const P2WPKH_WITNESS_SIZE: u64 = 108;

/// Segwit marker and flag bytes.
const SEGWIT_MARKER_SIZE: u64 = 2;

/// Default fee rate in satoshis per virtual byte.
pub const DEFAULT_SAT_PER_VBYTE: u64 = 2;

/// Every send pays the recipient and returns change to the wallet.
pub const OUTPUTS_PER_SEND: usize = 2;

/// Serialized size of a Bitcoin CompactSize integer.
pub fn varint_size(n: u64) -> u64 {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Virtual size of a transaction with `num_inputs` P2WPKH inputs and
/// `num_outputs` P2WPKH outputs.
///
/// `weight = 4 * non_witness + witness`, `vsize = ceil(weight / 4)`.
pub fn estimate_vsize(num_inputs: usize, num_outputs: usize) -> u64 {
    let inputs = num_inputs as u64;
    let outputs = num_outputs as u64;

    let non_witness = 4 // version
        + varint_size(inputs)
        + inputs * P2WPKH_INPUT_BASE_SIZE
        + varint_size(outputs)
        + outputs * P2WPKH_OUTPUT_SIZE
        + 4; // locktime

    let marker = if inputs > 0 { SEGWIT_MARKER_SIZE } else { 0 };
    let witness = marker + inputs * P2WPKH_WITNESS_SIZE;

    let weight = 4 * non_witness + witness;
    weight.div_ceil(4)
}

/// Static fee policy: a fixed rate, never fetched from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub sat_per_vbyte: u64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            sat_per_vbyte: DEFAULT_SAT_PER_VBYTE,
        }
    }
}

impl FeePolicy {
    /// Fee in satoshis for the given transaction shape.
    pub fn fee_for(&self, num_inputs: usize, num_outputs: usize) -> u64 {
        estimate_vsize(num_inputs, num_outputs) * self.sat_per_vbyte
    }
}
