//! Fee-market policy for EIP-1559 sends.
//!
//! Native transfers pay `base + tip` with a fixed gas limit. Token transfers
//! pad both the fee cap and the gas limit by a percentage, using integer
//! arithmetic that multiplies first and truncates on the divide.

/// Gas used by a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Gas limit used when estimating a token transfer fails.
pub const ERC20_FALLBACK_GAS_LIMIT: u64 = 65_000;

/// Applied to the token transfer gas limit (percent).
pub const ERC20_GAS_BUFFER_PERCENT: u64 = 120;

/// Applied to the token transfer fee cap (percent).
pub const ERC20_FEE_CAP_BUFFER_PERCENT: u128 = 125;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthFeePolicy {
    pub transfer_gas_limit: u64,
    pub erc20_fallback_gas_limit: u64,
    pub erc20_gas_buffer_percent: u64,
    pub erc20_fee_cap_buffer_percent: u128,
}

impl Default for EthFeePolicy {
    fn default() -> Self {
        Self {
            transfer_gas_limit: TRANSFER_GAS_LIMIT,
            erc20_fallback_gas_limit: ERC20_FALLBACK_GAS_LIMIT,
            erc20_gas_buffer_percent: ERC20_GAS_BUFFER_PERCENT,
            erc20_fee_cap_buffer_percent: ERC20_FEE_CAP_BUFFER_PERCENT,
        }
    }
}

/// Tip and cap, in wei per gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
}

impl EthFeePolicy {
    /// `cap = base + tip`, no buffer.
    pub fn native_fee(&self, base_fee: u128, tip: u128) -> FeeQuote {
        FeeQuote {
            max_priority_fee_per_gas: tip,
            max_fee_per_gas: base_fee.saturating_add(tip),
        }
    }

    /// `cap = (base + tip) * buffer / 100`.
    pub fn token_fee(&self, base_fee: u128, tip: u128) -> FeeQuote {
        let cap = base_fee
            .saturating_add(tip)
            .saturating_mul(self.erc20_fee_cap_buffer_percent)
            / 100;
        FeeQuote {
            max_priority_fee_per_gas: tip,
            max_fee_per_gas: cap,
        }
    }

    /// Buffered gas limit for a token transfer. `None` means estimation
    /// failed and the fallback limit is buffered instead.
    pub fn token_gas_limit(&self, estimate: Option<u64>) -> u64 {
        estimate
            .unwrap_or(self.erc20_fallback_gas_limit)
            .saturating_mul(self.erc20_gas_buffer_percent)
            / 100
    }
}
