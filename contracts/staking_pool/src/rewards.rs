use soroban_sdk::{Env, I256};

use crate::units::{self, CANONICAL_ONE};
use crate::ContractError;

/// Seconds in one staking day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Day count convention for APR.
pub const DAYS_PER_YEAR: i128 = 365;

/// 100% expressed as a canonical percentage. An APR of 50% is stored as
/// `50 * CANONICAL_ONE`.
pub const ONE_HUNDRED_PERCENT: i128 = 100 * CANONICAL_ONE;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Reward earned by `principal` held for `duration_days` at `apr`.
///
/// ```text
/// reward = principal × apr × duration_days / (365 × 100%)
/// ```
///
/// The product is formed in 256 bits (two canonical operands already sit at
/// 10^36), divided once, and the result truncated to what the reward token
/// can represent.
pub fn reward_at_maturity(
    env: &Env,
    principal: i128,
    apr: i128,
    duration_days: u32,
    reward_decimals: u32,
) -> Result<i128, ContractError> {
    if principal < 0 || apr < 0 {
        return Err(ContractError::InvalidInput);
    }

    let numerator = I256::from_i128(env, principal)
        .mul(&I256::from_i128(env, apr))
        .mul(&I256::from_i128(env, i128::from(duration_days)));
    let denominator = I256::from_i128(env, DAYS_PER_YEAR * ONE_HUNDRED_PERCENT);

    let reward = numerator
        .div(&denominator)
        .to_i128()
        .ok_or(ContractError::MathOverflow)?;

    units::truncate_to_native(reward, reward_decimals)
}

/// Reward owed after topping up a position to `new_principal`.
///
/// A top-up restarts the term: the position is repriced as a fresh stake of
/// the combined principal, computed once on the total, and its claim history
/// starts over. `outstanding` is the reward the position is still owed; it is
/// already committed, so only the rest is drawn from the pool budget.
/// Returns the new `reward_at_maturity` and that extra draw.
pub fn top_up(
    env: &Env,
    outstanding: i128,
    new_principal: i128,
    apr: i128,
    duration_days: u32,
    reward_decimals: u32,
) -> Result<(i128, i128), ContractError> {
    let repriced = reward_at_maturity(env, new_principal, apr, duration_days, reward_decimals)?;
    if outstanding < 0 || outstanding > repriced {
        return Err(ContractError::InvalidInput);
    }
    Ok((repriced, repriced - outstanding))
}

/// Unix timestamp at which a term opened at `opened_at` ends.
pub fn maturity(opened_at: u64, duration_days: u32) -> Result<u64, ContractError> {
    u64::from(duration_days)
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|term| opened_at.checked_add(term))
        .ok_or(ContractError::MathOverflow)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
