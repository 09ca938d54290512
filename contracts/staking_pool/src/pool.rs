//! Pool registry: the static parameters of each staking pool and its
//! open/active switches.

use soroban_sdk::{contracttype, symbol_short, token, Address, Env, Symbol};

use crate::units::CANONICAL_DECIMALS;
use crate::ContractError;

const POOL: Symbol = symbol_short!("POOL");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// A token together with the precision the ledger converts it at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
    pub token: Address,
    pub decimals: u32,
}

/// Static configuration of a pool plus its two administrative switches.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParams {
    pub duration_days: u32,
    pub stake_token: Address,
    pub stake_decimals: u32,
    pub reward_token: Address,
    pub reward_decimals: u32,
    /// Canonical percentage; 50% is `50 * 10^18`.
    pub apr: i128,
    /// Accepts new positions.
    pub is_open: bool,
    /// Not suspended. A suspended pool freezes stake, top-up, claim and
    /// unstake but stays queryable.
    pub is_active: bool,
}

impl PoolParams {
    pub fn stake_asset(&self) -> Asset {
        Asset {
            token: self.stake_token.clone(),
            decimals: self.stake_decimals,
        }
    }

    pub fn reward_asset(&self) -> Asset {
        Asset {
            token: self.reward_token.clone(),
            decimals: self.reward_decimals,
        }
    }
}

fn pool_key(pool_id: &Symbol) -> (Symbol, Symbol) {
    (POOL, pool_id.clone())
}

fn store(env: &Env, pool_id: &Symbol, params: &PoolParams) {
    let key = pool_key(pool_id);
    env.storage().persistent().set(&key, params);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn exists(env: &Env, pool_id: &Symbol) -> bool {
    env.storage().persistent().has(&pool_key(pool_id))
}

/// Fetch a pool, failing with `PoolNotFound` if it was never created.
pub fn load(env: &Env, pool_id: &Symbol) -> Result<PoolParams, ContractError> {
    let key = pool_key(pool_id);
    let params: PoolParams = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(params)
}

/// Register a new pool. Token precisions are read from the token contracts.
///
/// The pool starts closed and active; it takes no stakes until opened.
pub fn create(
    env: &Env,
    pool_id: &Symbol,
    duration_days: u32,
    stake_token: Address,
    reward_token: Address,
    apr: i128,
) -> Result<PoolParams, ContractError> {
    if exists(env, pool_id) {
        return Err(ContractError::PoolAlreadyExists);
    }
    if duration_days == 0 || apr <= 0 {
        return Err(ContractError::InvalidInput);
    }

    let stake_decimals = token::Client::new(env, &stake_token).decimals();
    let reward_decimals = token::Client::new(env, &reward_token).decimals();
    if stake_decimals > CANONICAL_DECIMALS || reward_decimals > CANONICAL_DECIMALS {
        return Err(ContractError::InvalidDecimals);
    }

    let params = PoolParams {
        duration_days,
        stake_token,
        stake_decimals,
        reward_token,
        reward_decimals,
        apr,
        is_open: false,
        is_active: true,
    };
    store(env, pool_id, &params);
    Ok(params)
}

pub fn open(env: &Env, pool_id: &Symbol) -> Result<PoolParams, ContractError> {
    let mut params = load(env, pool_id)?;
    if params.is_open {
        return Err(ContractError::PoolAlreadyOpen);
    }
    params.is_open = true;
    store(env, pool_id, &params);
    Ok(params)
}

pub fn close(env: &Env, pool_id: &Symbol) -> Result<PoolParams, ContractError> {
    let mut params = load(env, pool_id)?;
    if !params.is_open {
        return Err(ContractError::PoolAlreadyClosed);
    }
    params.is_open = false;
    store(env, pool_id, &params);
    Ok(params)
}

pub fn suspend(env: &Env, pool_id: &Symbol) -> Result<PoolParams, ContractError> {
    let mut params = load(env, pool_id)?;
    if !params.is_active {
        return Err(ContractError::PoolAlreadySuspended);
    }
    params.is_active = false;
    store(env, pool_id, &params);
    Ok(params)
}

pub fn resume(env: &Env, pool_id: &Symbol) -> Result<PoolParams, ContractError> {
    let mut params = load(env, pool_id)?;
    if params.is_active {
        return Err(ContractError::PoolAlreadyActive);
    }
    params.is_active = true;
    store(env, pool_id, &params);
    Ok(params)
}
