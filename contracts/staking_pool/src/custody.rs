//! Token movements in and out of the contract's custody.
//!
//! The ledger works in canonical amounts; this module converts to the
//! token's native precision at the boundary and calls the standard token
//! interface.

use soroban_sdk::{token, Address, Env};

use crate::pool::Asset;
use crate::units;
use crate::ContractError;

fn native_amount(asset: &Asset, amount: i128) -> Result<i128, ContractError> {
    let native = units::to_native(amount, asset.decimals)?;
    if native <= 0 {
        return Err(ContractError::InvalidInput);
    }
    Ok(native)
}

/// Move `amount` of `asset` from `from` into the contract.
pub fn pull(env: &Env, asset: &Asset, from: &Address, amount: i128) -> Result<(), ContractError> {
    let native = native_amount(asset, amount)?;
    token::Client::new(env, &asset.token).transfer(
        from,
        &env.current_contract_address(),
        &native,
    );
    Ok(())
}

/// Move `amount` of `asset` from the contract to `to`.
pub fn push(env: &Env, asset: &Asset, to: &Address, amount: i128) -> Result<(), ContractError> {
    let native = native_amount(asset, amount)?;
    token::Client::new(env, &asset.token).transfer(&env.current_contract_address(), to, &native);
    Ok(())
}

/// Pay out principal and reward together.
///
/// When both legs are the same token they go out as one transfer. Zero legs
/// are skipped.
pub fn push_payout(
    env: &Env,
    stake: &Asset,
    principal: i128,
    reward: &Asset,
    reward_amount: i128,
    to: &Address,
) -> Result<(), ContractError> {
    if stake.token == reward.token {
        let total = principal
            .checked_add(reward_amount)
            .ok_or(ContractError::MathOverflow)?;
        return push(env, stake, to, total);
    }

    if principal > 0 {
        push(env, stake, to, principal)?;
    }
    if reward_amount > 0 {
        push(env, reward, to, reward_amount)?;
    }
    Ok(())
}
