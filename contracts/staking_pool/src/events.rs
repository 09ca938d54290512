#![allow(deprecated)] // events().publish migration tracked separately

use common::PauseScope;
use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Fired when a pool is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreatedEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub duration_days: u32,
    pub apr: i128,
    pub timestamp: u64,
}

/// Fired when a pool is opened, closed, suspended or resumed. The topic
/// tells which; the payload carries the resulting switches.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolStatusEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub is_open: bool,
    pub is_active: bool,
    pub timestamp: u64,
}

/// Fired on a first stake and on every top-up.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub pool_id: Symbol,
    pub staker: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    /// Principal added by this call, after truncation.
    pub amount: i128,
    pub principal: i128,
    pub reward_at_maturity: i128,
    pub opened_at: u64,
    pub matures_at: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeStatusEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub account: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeRevokedEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub account: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub principal: i128,
    pub forfeited_reward: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub pool_id: Symbol,
    pub staker: Address,
    pub reward_token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakedEvent {
    pub pool_id: Symbol,
    pub staker: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub principal: i128,
    pub reward: i128,
    pub timestamp: u64,
}

/// Reward budget moved in (`RWD_ADD`) or unallocated reward moved out
/// (`RWD_RMV`).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRewardEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub reward_token: Address,
    pub amount: i128,
    pub total_reward: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevokedStakesRemovedEvent {
    pub pool_id: Symbol,
    pub caller: Address,
    pub stake_token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub caller: Address,
    pub scope: PauseScope,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_created(
    env: &Env,
    pool_id: Symbol,
    caller: Address,
    stake_token: Address,
    reward_token: Address,
    duration_days: u32,
    apr: i128,
) {
    env.events().publish(
        (symbol_short!("POOL_NEW"), pool_id.clone()),
        PoolCreatedEvent {
            pool_id,
            caller,
            stake_token,
            reward_token,
            duration_days,
            apr,
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn publish_pool_status(
    env: &Env,
    topic: Symbol,
    pool_id: Symbol,
    caller: Address,
    is_open: bool,
    is_active: bool,
) {
    env.events().publish(
        (topic, pool_id.clone()),
        PoolStatusEvent {
            pool_id,
            caller,
            is_open,
            is_active,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_opened(env: &Env, pool_id: Symbol, caller: Address, is_active: bool) {
    publish_pool_status(env, symbol_short!("POOL_OPN"), pool_id, caller, true, is_active);
}

pub fn publish_pool_closed(env: &Env, pool_id: Symbol, caller: Address, is_active: bool) {
    publish_pool_status(env, symbol_short!("POOL_CLS"), pool_id, caller, false, is_active);
}

pub fn publish_pool_suspended(env: &Env, pool_id: Symbol, caller: Address, is_open: bool) {
    publish_pool_status(env, symbol_short!("POOL_SUSP"), pool_id, caller, is_open, false);
}

pub fn publish_pool_resumed(env: &Env, pool_id: Symbol, caller: Address, is_open: bool) {
    publish_pool_status(env, symbol_short!("POOL_RSM"), pool_id, caller, is_open, true);
}

pub fn publish_staked(env: &Env, event: StakedEvent) {
    env.events().publish(
        (symbol_short!("STAKED"), event.pool_id.clone(), event.staker.clone()),
        event,
    );
}

pub fn publish_stake_suspended(env: &Env, pool_id: Symbol, caller: Address, account: Address) {
    env.events().publish(
        (symbol_short!("STK_SUSP"), pool_id.clone(), account.clone()),
        StakeStatusEvent {
            pool_id,
            caller,
            account,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_resumed(env: &Env, pool_id: Symbol, caller: Address, account: Address) {
    env.events().publish(
        (symbol_short!("STK_RSM"), pool_id.clone(), account.clone()),
        StakeStatusEvent {
            pool_id,
            caller,
            account,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_revoked(env: &Env, event: StakeRevokedEvent) {
    env.events().publish(
        (symbol_short!("STK_RVK"), event.pool_id.clone(), event.account.clone()),
        event,
    );
}

pub fn publish_reward_claimed(
    env: &Env,
    pool_id: Symbol,
    staker: Address,
    reward_token: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("CLAIMED"), pool_id.clone(), staker.clone()),
        RewardClaimedEvent {
            pool_id,
            staker,
            reward_token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstaked(env: &Env, event: UnstakedEvent) {
    env.events().publish(
        (symbol_short!("UNSTAKED"), event.pool_id.clone(), event.staker.clone()),
        event,
    );
}

pub fn publish_reward_added(
    env: &Env,
    pool_id: Symbol,
    caller: Address,
    reward_token: Address,
    amount: i128,
    total_reward: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), pool_id.clone()),
        PoolRewardEvent {
            pool_id,
            caller,
            reward_token,
            amount,
            total_reward,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_removed(
    env: &Env,
    pool_id: Symbol,
    caller: Address,
    reward_token: Address,
    amount: i128,
    total_reward: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_RMV"), pool_id.clone()),
        PoolRewardEvent {
            pool_id,
            caller,
            reward_token,
            amount,
            total_reward,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_revoked_stakes_removed(
    env: &Env,
    pool_id: Symbol,
    caller: Address,
    stake_token: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("RVK_RMV"), pool_id.clone()),
        RevokedStakesRemovedEvent {
            pool_id,
            caller,
            stake_token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_contract_paused(env: &Env, caller: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("PAUSED"), caller.clone()),
        PauseEvent {
            caller,
            scope,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_contract_resumed(env: &Env, caller: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("RESUMED"), caller.clone()),
        PauseEvent {
            caller,
            scope,
            timestamp: env.ledger().timestamp(),
        },
    );
}
