//! Staking ledger: per-position records, per-pool aggregates, and every
//! operation that moves value between them.
//!
//! Each operation runs all of its checks before the first write or token
//! transfer, so a rejected call leaves storage and balances untouched even
//! before the host rolls the invocation back.
//!
//! Aggregate bookkeeping, for every pool:
//!
//! ```text
//! total_staked            = Σ live principal
//! reward_committed        = Σ live (reward_at_maturity − reward_claimed)
//! reward_committed + reward_distributed <= total_reward
//! stake custody           = total_staked + total_revoked_principal
//! reward custody          = total_reward − reward_distributed
//! ```

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::events::{self, StakeRevokedEvent, StakedEvent, UnstakedEvent};
use crate::pool::{self, PoolParams};
use crate::{custody, rewards, units, ContractError};

const POSITION: Symbol = symbol_short!("STAKE");
const AGGREGATE: Symbol = symbol_short!("POOL_AGG");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// One account's stake in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub principal: i128,
    pub opened_at: u64,
    pub matures_at: u64,
    pub reward_at_maturity: i128,
    pub reward_claimed: i128,
    pub is_active: bool,
}

impl Position {
    /// Reward still owed to the position, regardless of maturity.
    pub fn outstanding_reward(&self) -> i128 {
        self.reward_at_maturity - self.reward_claimed
    }
}

/// Running totals of a pool. See the module docs for how they reconcile.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolAggregate {
    pub total_staked: i128,
    pub total_reward: i128,
    pub reward_committed: i128,
    pub reward_distributed: i128,
    pub total_revoked_principal: i128,
}

impl PoolAggregate {
    /// Budget supplied to the pool that no position has a claim on.
    pub fn unallocated_reward(&self) -> i128 {
        self.total_reward - self.reward_distributed - self.reward_committed
    }

    /// Earmark `amount` of the budget for a position, or fail without
    /// changing anything if the pool cannot cover it.
    fn commit_reward(&mut self, amount: i128) -> Result<(), ContractError> {
        let committed = self
            .reward_committed
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        let exposure = committed
            .checked_add(self.reward_distributed)
            .ok_or(ContractError::MathOverflow)?;
        if exposure > self.total_reward {
            return Err(ContractError::InsufficientPoolReward);
        }
        self.reward_committed = committed;
        Ok(())
    }

    /// Release `amount` of committed reward, either paid out or forfeited.
    fn release_reward(&mut self, amount: i128, paid: bool) -> Result<(), ContractError> {
        self.reward_committed = self
            .reward_committed
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        if paid {
            self.reward_distributed = self
                .reward_distributed
                .checked_add(amount)
                .ok_or(ContractError::MathOverflow)?;
        }
        Ok(())
    }

    fn add_staked(&mut self, amount: i128) -> Result<(), ContractError> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        Ok(())
    }

    fn remove_staked(&mut self, amount: i128) -> Result<(), ContractError> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        Ok(())
    }
}

/// Amounts returned to a staker by `unstake`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub principal: i128,
    pub reward: i128,
}

// ── Storage ─────────────────────────────────────────────────────────────────

fn position_key(pool_id: &Symbol, account: &Address) -> (Symbol, Symbol, Address) {
    (POSITION, pool_id.clone(), account.clone())
}

fn aggregate_key(pool_id: &Symbol) -> (Symbol, Symbol) {
    (AGGREGATE, pool_id.clone())
}

fn find_position(env: &Env, pool_id: &Symbol, account: &Address) -> Option<Position> {
    let key = position_key(pool_id, account);
    let position: Option<Position> = env.storage().persistent().get(&key);
    if position.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    position
}

fn load_position(env: &Env, pool_id: &Symbol, account: &Address) -> Result<Position, ContractError> {
    find_position(env, pool_id, account).ok_or(ContractError::StakeNotFound)
}

fn store_position(env: &Env, pool_id: &Symbol, account: &Address, position: &Position) {
    let key = position_key(pool_id, account);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn remove_position(env: &Env, pool_id: &Symbol, account: &Address) {
    env.storage()
        .persistent()
        .remove(&position_key(pool_id, account));
}

/// Aggregates are created lazily; a pool nobody has touched reads as zeros.
fn load_aggregate(env: &Env, pool_id: &Symbol) -> PoolAggregate {
    env.storage()
        .persistent()
        .get(&aggregate_key(pool_id))
        .unwrap_or_default()
}

fn store_aggregate(env: &Env, pool_id: &Symbol, aggregate: &PoolAggregate) {
    let key = aggregate_key(pool_id);
    env.storage().persistent().set(&key, aggregate);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Guards ──────────────────────────────────────────────────────────────────

/// The contract itself can never hold a position or be queried as one.
fn require_valid_account(env: &Env, account: &Address) -> Result<(), ContractError> {
    if *account == env.current_contract_address() {
        return Err(ContractError::InvalidAccount);
    }
    Ok(())
}

/// Truncate a requested stake to what the staking token can carry.
fn principal_from(amount: i128, pool: &PoolParams) -> Result<i128, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidInput);
    }
    let principal = units::truncate_to_native(amount, pool.stake_decimals)?;
    if principal == 0 {
        return Err(ContractError::TruncatedZero);
    }
    Ok(principal)
}

/// Shared preconditions of claim and unstake.
fn require_claimable(env: &Env, pool: &PoolParams, position: &Position) -> Result<(), ContractError> {
    if !position.is_active {
        return Err(ContractError::StakeSuspended);
    }
    if !pool.is_active {
        return Err(ContractError::PoolSuspended);
    }
    if env.ledger().timestamp() < position.matures_at {
        return Err(ContractError::StakeNotMatured);
    }
    Ok(())
}

// ── Staking ─────────────────────────────────────────────────────────────────

/// Open a new position of `amount` (canonical) in `pool_id`.
pub fn stake(
    env: &Env,
    pool_id: &Symbol,
    staker: &Address,
    amount: i128,
) -> Result<Position, ContractError> {
    require_valid_account(env, staker)?;
    let pool = pool::load(env, pool_id)?;
    if find_position(env, pool_id, staker).is_some() {
        return Err(ContractError::StakeAlreadyExists);
    }

    let principal = principal_from(amount, &pool)?;
    let reward = rewards::reward_at_maturity(
        env,
        principal,
        pool.apr,
        pool.duration_days,
        pool.reward_decimals,
    )?;
    if reward == 0 {
        return Err(ContractError::ZeroReward);
    }

    if !pool.is_open {
        return Err(ContractError::PoolClosed);
    }
    if !pool.is_active {
        return Err(ContractError::PoolSuspended);
    }

    let mut aggregate = load_aggregate(env, pool_id);
    if let Err(err) = aggregate.commit_reward(reward) {
        log!(env, "stake rejected: reward budget exhausted", pool_id.clone(), reward);
        return Err(err);
    }
    aggregate.add_staked(principal)?;

    let opened_at = env.ledger().timestamp();
    let position = Position {
        principal,
        opened_at,
        matures_at: rewards::maturity(opened_at, pool.duration_days)?,
        reward_at_maturity: reward,
        reward_claimed: 0,
        is_active: true,
    };

    custody::pull(env, &pool.stake_asset(), staker, principal)?;
    store_position(env, pool_id, staker, &position);
    store_aggregate(env, pool_id, &aggregate);

    events::publish_staked(env, staked_event(pool_id, staker, &pool, principal, &position));

    Ok(position)
}

/// Top up a live position.
///
/// The position is repriced as if the combined principal had been staked
/// now: the term restarts, `reward_at_maturity` becomes the reward of the
/// new total and `reward_claimed` goes back to zero. Reward the position was
/// still owed stays committed; only the difference is drawn from the budget.
pub fn add_stake(
    env: &Env,
    pool_id: &Symbol,
    staker: &Address,
    amount: i128,
) -> Result<Position, ContractError> {
    require_valid_account(env, staker)?;
    let pool = pool::load(env, pool_id)?;
    let mut position = load_position(env, pool_id, staker)?;

    let added = principal_from(amount, &pool)?;

    if !pool.is_active {
        return Err(ContractError::PoolSuspended);
    }
    if !position.is_active {
        return Err(ContractError::StakeSuspended);
    }

    let principal = position
        .principal
        .checked_add(added)
        .ok_or(ContractError::MathOverflow)?;
    let (reward, delta) = rewards::top_up(
        env,
        position.outstanding_reward(),
        principal,
        pool.apr,
        pool.duration_days,
        pool.reward_decimals,
    )?;
    if reward == 0 {
        return Err(ContractError::ZeroReward);
    }

    let mut aggregate = load_aggregate(env, pool_id);
    if let Err(err) = aggregate.commit_reward(delta) {
        log!(env, "top-up rejected: reward budget exhausted", pool_id.clone(), delta);
        return Err(err);
    }
    aggregate.add_staked(added)?;

    let opened_at = env.ledger().timestamp();
    position.principal = principal;
    position.opened_at = opened_at;
    position.matures_at = rewards::maturity(opened_at, pool.duration_days)?;
    position.reward_at_maturity = reward;
    position.reward_claimed = 0;

    custody::pull(env, &pool.stake_asset(), staker, added)?;
    store_position(env, pool_id, staker, &position);
    store_aggregate(env, pool_id, &aggregate);

    events::publish_staked(env, staked_event(pool_id, staker, &pool, added, &position));

    Ok(position)
}

fn staked_event(
    pool_id: &Symbol,
    staker: &Address,
    pool: &PoolParams,
    amount: i128,
    position: &Position,
) -> StakedEvent {
    StakedEvent {
        pool_id: pool_id.clone(),
        staker: staker.clone(),
        stake_token: pool.stake_token.clone(),
        reward_token: pool.reward_token.clone(),
        amount,
        principal: position.principal,
        reward_at_maturity: position.reward_at_maturity,
        opened_at: position.opened_at,
        matures_at: position.matures_at,
    }
}

// ── Claim & unstake ─────────────────────────────────────────────────────────

/// Pay out the matured, unclaimed reward of a position. The position stays
/// open.
pub fn claim_reward(env: &Env, pool_id: &Symbol, staker: &Address) -> Result<i128, ContractError> {
    require_valid_account(env, staker)?;
    let pool = pool::load(env, pool_id)?;
    let mut position = load_position(env, pool_id, staker)?;

    require_claimable(env, &pool, &position)?;
    let amount = position.outstanding_reward();
    if amount <= 0 {
        return Err(ContractError::ZeroReward);
    }

    let mut aggregate = load_aggregate(env, pool_id);
    aggregate.release_reward(amount, true)?;
    position.reward_claimed = position.reward_at_maturity;

    custody::push(env, &pool.reward_asset(), staker, amount)?;
    store_position(env, pool_id, staker, &position);
    store_aggregate(env, pool_id, &aggregate);

    events::publish_reward_claimed(
        env,
        pool_id.clone(),
        staker.clone(),
        pool.reward_token.clone(),
        amount,
    );

    Ok(amount)
}

/// Close a matured position, returning its principal and any unclaimed
/// reward in one go. The `(pool, account)` slot is free again afterwards.
pub fn unstake(env: &Env, pool_id: &Symbol, staker: &Address) -> Result<Payout, ContractError> {
    require_valid_account(env, staker)?;
    let pool = pool::load(env, pool_id)?;
    let position = load_position(env, pool_id, staker)?;

    require_claimable(env, &pool, &position)?;
    let payout = Payout {
        principal: position.principal,
        reward: position.outstanding_reward(),
    };

    let mut aggregate = load_aggregate(env, pool_id);
    aggregate.remove_staked(payout.principal)?;
    aggregate.release_reward(payout.reward, true)?;

    custody::push_payout(
        env,
        &pool.stake_asset(),
        payout.principal,
        &pool.reward_asset(),
        payout.reward,
        staker,
    )?;
    remove_position(env, pool_id, staker);
    store_aggregate(env, pool_id, &aggregate);

    events::publish_unstaked(
        env,
        UnstakedEvent {
            pool_id: pool_id.clone(),
            staker: staker.clone(),
            stake_token: pool.stake_token.clone(),
            reward_token: pool.reward_token.clone(),
            principal: payout.principal,
            reward: payout.reward,
            timestamp: env.ledger().timestamp(),
        },
    );

    Ok(payout)
}

// ── Administrative overrides ────────────────────────────────────────────────

pub fn suspend_stake(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
    account: &Address,
) -> Result<(), ContractError> {
    require_valid_account(env, account)?;
    pool::load(env, pool_id)?;
    let mut position = load_position(env, pool_id, account)?;
    if !position.is_active {
        return Err(ContractError::StakeAlreadySuspended);
    }

    position.is_active = false;
    store_position(env, pool_id, account, &position);

    events::publish_stake_suspended(env, pool_id.clone(), caller.clone(), account.clone());
    Ok(())
}

pub fn resume_stake(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
    account: &Address,
) -> Result<(), ContractError> {
    require_valid_account(env, account)?;
    pool::load(env, pool_id)?;
    let mut position = load_position(env, pool_id, account)?;
    if position.is_active {
        return Err(ContractError::StakeAlreadyActive);
    }

    position.is_active = true;
    store_position(env, pool_id, account, &position);

    events::publish_stake_resumed(env, pool_id.clone(), caller.clone(), account.clone());
    Ok(())
}

/// Terminate a position by force.
///
/// The principal stays in custody, earmarked for [`remove_revoked_stakes`];
/// the unclaimed reward goes back to the unallocated part of the budget.
/// Returns the revoked principal and the forfeited reward.
pub fn revoke_stake(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
    account: &Address,
) -> Result<(i128, i128), ContractError> {
    require_valid_account(env, account)?;
    let pool = pool::load(env, pool_id)?;
    let position = load_position(env, pool_id, account)?;
    let forfeited = position.outstanding_reward();

    let mut aggregate = load_aggregate(env, pool_id);
    aggregate.remove_staked(position.principal)?;
    aggregate.total_revoked_principal = aggregate
        .total_revoked_principal
        .checked_add(position.principal)
        .ok_or(ContractError::MathOverflow)?;
    aggregate.release_reward(forfeited, false)?;

    remove_position(env, pool_id, account);
    store_aggregate(env, pool_id, &aggregate);

    log!(env, "stake revoked", pool_id.clone(), account.clone(), position.principal, forfeited);
    events::publish_stake_revoked(
        env,
        StakeRevokedEvent {
            pool_id: pool_id.clone(),
            caller: caller.clone(),
            account: account.clone(),
            stake_token: pool.stake_token,
            reward_token: pool.reward_token,
            principal: position.principal,
            forfeited_reward: forfeited,
            timestamp: env.ledger().timestamp(),
        },
    );

    Ok((position.principal, forfeited))
}

// ── Reward budget ───────────────────────────────────────────────────────────

/// Fund a pool's reward budget from `caller`. Returns the amount actually
/// recorded, which is `amount` truncated to the reward token's precision.
pub fn add_reward(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
    amount: i128,
) -> Result<i128, ContractError> {
    let pool = pool::load(env, pool_id)?;
    if amount <= 0 {
        return Err(ContractError::InvalidInput);
    }
    let recorded = units::truncate_to_native(amount, pool.reward_decimals)?;
    if recorded == 0 {
        return Err(ContractError::TruncatedZero);
    }

    let mut aggregate = load_aggregate(env, pool_id);
    aggregate.total_reward = aggregate
        .total_reward
        .checked_add(recorded)
        .ok_or(ContractError::MathOverflow)?;

    custody::pull(env, &pool.reward_asset(), caller, recorded)?;
    store_aggregate(env, pool_id, &aggregate);

    events::publish_reward_added(
        env,
        pool_id.clone(),
        caller.clone(),
        pool.reward_token,
        recorded,
        aggregate.total_reward,
    );

    Ok(recorded)
}

/// Send the part of the budget no position can claim back to `caller`.
pub fn remove_unallocated_reward(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
) -> Result<i128, ContractError> {
    let pool = pool::load(env, pool_id)?;
    let mut aggregate = load_aggregate(env, pool_id);

    let unallocated = aggregate.unallocated_reward();
    if unallocated <= 0 {
        return Err(ContractError::NoUnallocatedReward);
    }
    aggregate.total_reward -= unallocated;

    custody::push(env, &pool.reward_asset(), caller, unallocated)?;
    store_aggregate(env, pool_id, &aggregate);

    events::publish_reward_removed(
        env,
        pool_id.clone(),
        caller.clone(),
        pool.reward_token,
        unallocated,
        aggregate.total_reward,
    );

    Ok(unallocated)
}

/// Sweep all revoked principal of a pool to `caller`.
pub fn remove_revoked_stakes(
    env: &Env,
    pool_id: &Symbol,
    caller: &Address,
) -> Result<i128, ContractError> {
    let pool = pool::load(env, pool_id)?;
    let mut aggregate = load_aggregate(env, pool_id);

    let revoked = aggregate.total_revoked_principal;
    if revoked <= 0 {
        return Err(ContractError::NoRevokedStakes);
    }
    aggregate.total_revoked_principal = 0;

    custody::push(env, &pool.stake_asset(), caller, revoked)?;
    store_aggregate(env, pool_id, &aggregate);

    events::publish_revoked_stakes_removed(
        env,
        pool_id.clone(),
        caller.clone(),
        pool.stake_token,
        revoked,
    );

    Ok(revoked)
}

// ── Queries ─────────────────────────────────────────────────────────────────

pub fn position(env: &Env, pool_id: &Symbol, account: &Address) -> Result<Position, ContractError> {
    require_valid_account(env, account)?;
    pool::load(env, pool_id)?;
    load_position(env, pool_id, account)
}

/// Reward the account could claim right now; zero while the position or the
/// pool is suspended or before maturity.
pub fn claimable_reward(
    env: &Env,
    pool_id: &Symbol,
    account: &Address,
) -> Result<i128, ContractError> {
    require_valid_account(env, account)?;
    let pool = pool::load(env, pool_id)?;
    let position = load_position(env, pool_id, account)?;

    if require_claimable(env, &pool, &position).is_err() {
        return Ok(0);
    }
    Ok(position.outstanding_reward())
}

pub fn aggregate(env: &Env, pool_id: &Symbol) -> Result<PoolAggregate, ContractError> {
    pool::load(env, pool_id)?;
    Ok(load_aggregate(env, pool_id))
}
