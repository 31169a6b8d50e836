use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::WalletError;

pub const BTC_DECIMALS: u8 = 8;
pub const ETH_DECIMALS: u8 = 18;

/// Parse a user-entered decimal amount.
pub fn parse_amount(input: &str) -> Result<Decimal, WalletError> {
    Decimal::from_str(input.trim())
        .map_err(|e| WalletError::InvalidAmount(format!("{input:?}: {e}")))
}

/// Scale a human amount to integer base units (`amount * 10^decimals`).
///
/// Digits below the smallest unit are truncated. Zero, negative and
/// sub-unit amounts are rejected.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::InvalidAmount(format!("{amount} is not positive")));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let decimals = u32::from(decimals);

    let units = if decimals >= scale {
        pow10(decimals - scale).and_then(|factor| mantissa.checked_mul(factor))
    } else {
        pow10(scale - decimals).map(|divisor| mantissa / divisor)
    }
    .ok_or_else(|| WalletError::InvalidAmount(format!("{amount} overflows 256 bits")))?;

    if units.is_zero() {
        return Err(WalletError::InvalidAmount(format!(
            "{amount} is below the smallest unit (10^-{decimals})"
        )));
    }
    Ok(units)
}

/// Satoshi amount for a send.
pub fn to_satoshis(amount: Decimal) -> Result<u64, WalletError> {
    let units = to_base_units(amount, BTC_DECIMALS)?;
    u64::try_from(units).map_err(|_| WalletError::InvalidAmount(format!("{amount} BTC is too large")))
}

fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

/// An on-chain balance in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub base_units: U256,
    pub decimals: u8,
}

impl Balance {
    pub fn new(base_units: U256, decimals: u8) -> Self {
        Self {
            base_units,
            decimals,
        }
    }

    pub fn from_satoshis(sat: u64) -> Self {
        Self::new(U256::from(sat), BTC_DECIMALS)
    }

    /// Whole-unit value for display. Lossy; never feed it back into a send.
    pub fn as_f64(&self) -> f64 {
        let units: f64 = self.base_units.to_string().parse().unwrap_or(f64::INFINITY);
        units / 10f64.powi(i32::from(self.decimals))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}
