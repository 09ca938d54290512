//! Fixed-point conversion between canonical and native token precision.
//!
//! Every amount the ledger stores is *canonical*: an integer carrying 18
//! fractional digits. Tokens move in their *native* precision (0–18 digits).
//! Conversions toward native precision truncate; nothing ever rounds up.

use crate::ContractError;

/// Fractional digits of the canonical representation.
pub const CANONICAL_DECIMALS: u32 = 18;

/// One whole unit in canonical form.
pub const CANONICAL_ONE: i128 = 1_000_000_000_000_000_000;

/// `10^(18 - decimals)`: the canonical value of one native unit.
fn native_step(decimals: u32) -> Result<i128, ContractError> {
    if decimals > CANONICAL_DECIMALS {
        return Err(ContractError::InvalidDecimals);
    }
    Ok(10i128.pow(CANONICAL_DECIMALS - decimals))
}

/// Scale a native amount up to canonical precision.
pub fn to_canonical(amount: i128, decimals: u32) -> Result<i128, ContractError> {
    amount
        .checked_mul(native_step(decimals)?)
        .ok_or(ContractError::MathOverflow)
}

/// Scale a canonical amount down to native precision, dropping whatever the
/// token cannot represent.
pub fn to_native(amount: i128, decimals: u32) -> Result<i128, ContractError> {
    Ok(amount.div_euclid(native_step(decimals)?))
}

/// Round a canonical amount down to the nearest value representable in
/// `decimals`, still expressed canonically.
pub fn truncate_to_native(amount: i128, decimals: u32) -> Result<i128, ContractError> {
    to_canonical(to_native(amount, decimals)?, decimals)
}
