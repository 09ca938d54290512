//! Fixed-term, fixed-rate staking pools.
//!
//! Stakers deposit a token into a named pool for the pool's duration and are
//! promised, at deposit time, a reward in a second token. Administrators
//! manage pools and the reward budget; governance can revoke positions and
//! recover unallocated reward or revoked principal.
//!
//! All ledger amounts are canonical (18 fractional digits); see [`units`].

#![no_std]

pub mod custody;
pub mod events;
pub mod ledger;
pub mod pool;
pub mod rewards;
pub mod units;

use common::admin_tiers::{self, AdminTier};
use common::pause::{self, PauseScope};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

pub use ledger::{Payout, PoolAggregate, Position};
pub use pool::PoolParams;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

// Operation names, also usable as `PauseScope::Operation` targets.
const OP_STAKE: Symbol = symbol_short!("stake");
const OP_ADD_STAKE: Symbol = symbol_short!("add_stake");
const OP_CLAIM: Symbol = symbol_short!("claim");
const OP_UNSTAKE: Symbol = symbol_short!("unstake");
const OP_SUSPEND: Symbol = symbol_short!("suspend");
const OP_RESUME: Symbol = symbol_short!("resume");
const OP_REVOKE: Symbol = symbol_short!("revoke");
const OP_ADD_REWARD: Symbol = symbol_short!("add_rwd");
const OP_REMOVE_REWARD: Symbol = symbol_short!("rmv_rwd");
const OP_REMOVE_REVOKED: Symbol = symbol_short!("rmv_rvk");

// ── Contract errors ──────────────────────────────────────────────────────────

/// Error codes, grouped by class:
///
/// | Range | Class               |
/// |-------|---------------------|
/// | 1–9   | lifecycle, auth, gate |
/// | 10–19 | not found           |
/// | 20–29 | invalid argument    |
/// | 30–49 | state conflict      |
/// | 50–59 | resource exhaustion |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    Paused = 4,

    PoolNotFound = 10,
    StakeNotFound = 11,

    InvalidInput = 20,
    InvalidDecimals = 21,
    TruncatedZero = 22,
    ZeroReward = 23,
    InvalidAccount = 24,
    MathOverflow = 25,

    PoolAlreadyExists = 30,
    PoolClosed = 31,
    PoolSuspended = 32,
    PoolAlreadyOpen = 33,
    PoolAlreadyClosed = 34,
    PoolAlreadySuspended = 35,
    PoolAlreadyActive = 36,
    StakeAlreadyExists = 37,
    StakeSuspended = 38,
    StakeAlreadySuspended = 39,
    StakeAlreadyActive = 40,
    StakeNotMatured = 41,

    InsufficientPoolReward = 50,
    NoUnallocatedReward = 51,
    NoRevokedStakes = 52,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPoolContract;

#[contractimpl]
impl StakingPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract. `admin` becomes the primary governor.
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        admin_tiers::bootstrap(&env, &admin);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Register a pool. It starts closed; call `open_pool` to take stakes.
    ///
    /// * `duration_days` – term of every position, in days.
    /// * `apr`           – canonical percentage, `50 * 10^18` for 50%.
    ///
    /// Requires at least `Admin` tier.
    pub fn create_pool(
        env: Env,
        caller: Address,
        pool_id: Symbol,
        duration_days: u32,
        stake_token: Address,
        reward_token: Address,
        apr: i128,
    ) -> Result<PoolParams, ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;

        let params = pool::create(
            &env,
            &pool_id,
            duration_days,
            stake_token.clone(),
            reward_token.clone(),
            apr,
        )?;

        events::publish_pool_created(
            &env,
            pool_id,
            caller,
            stake_token,
            reward_token,
            duration_days,
            apr,
        );

        Ok(params)
    }

    pub fn open_pool(env: Env, caller: Address, pool_id: Symbol) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        let params = pool::open(&env, &pool_id)?;
        events::publish_pool_opened(&env, pool_id, caller, params.is_active);
        Ok(())
    }

    pub fn close_pool(env: Env, caller: Address, pool_id: Symbol) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        let params = pool::close(&env, &pool_id)?;
        events::publish_pool_closed(&env, pool_id, caller, params.is_active);
        Ok(())
    }

    /// Freeze stake, top-up, claim and unstake for every position in the
    /// pool. Positions keep maturing.
    pub fn suspend_pool(env: Env, caller: Address, pool_id: Symbol) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        let params = pool::suspend(&env, &pool_id)?;
        events::publish_pool_suspended(&env, pool_id, caller, params.is_open);
        Ok(())
    }

    pub fn resume_pool(env: Env, caller: Address, pool_id: Symbol) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        let params = pool::resume(&env, &pool_id)?;
        events::publish_pool_resumed(&env, pool_id, caller, params.is_open);
        Ok(())
    }

    pub fn get_pool(env: Env, pool_id: Symbol) -> Result<PoolParams, ContractError> {
        pool::load(&env, &pool_id)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Open a position of `amount` (canonical units) in an open pool.
    ///
    /// The amount is truncated to the staking token's precision and the
    /// reward for the full term is reserved from the pool budget up front.
    pub fn stake(
        env: Env,
        staker: Address,
        pool_id: Symbol,
        amount: i128,
    ) -> Result<Position, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env, &OP_STAKE)?;

        ledger::stake(&env, &pool_id, &staker, amount)
    }

    /// Add `amount` to an existing position. The term restarts now and the
    /// reward is recomputed on the combined principal.
    pub fn add_stake(
        env: Env,
        staker: Address,
        pool_id: Symbol,
        amount: i128,
    ) -> Result<Position, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env, &OP_ADD_STAKE)?;

        ledger::add_stake(&env, &pool_id, &staker, amount)
    }

    /// Claim the full reward of a matured position. Fails with `ZeroReward`
    /// once it has been paid.
    pub fn claim_reward(env: Env, staker: Address, pool_id: Symbol) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env, &OP_CLAIM)?;

        ledger::claim_reward(&env, &pool_id, &staker)
    }

    /// Close a matured position, returning principal and unclaimed reward.
    pub fn unstake(env: Env, staker: Address, pool_id: Symbol) -> Result<Payout, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env, &OP_UNSTAKE)?;

        ledger::unstake(&env, &pool_id, &staker)
    }

    // ── Position overrides ──────────────────────────────────────────────────

    /// Requires at least `Admin` tier.
    pub fn suspend_stake(
        env: Env,
        caller: Address,
        pool_id: Symbol,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        Self::require_not_paused(&env, &OP_SUSPEND)?;

        ledger::suspend_stake(&env, &pool_id, &caller, &account)
    }

    /// Requires at least `Admin` tier.
    pub fn resume_stake(
        env: Env,
        caller: Address,
        pool_id: Symbol,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        Self::require_not_paused(&env, &OP_RESUME)?;

        ledger::resume_stake(&env, &pool_id, &caller, &account)
    }

    /// Forcibly close a position. Principal is held for
    /// `remove_revoked_stakes`; unclaimed reward becomes unallocated.
    ///
    /// Requires `Governance` tier.
    pub fn revoke_stake(
        env: Env,
        caller: Address,
        pool_id: Symbol,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Governance)?;
        Self::require_not_paused(&env, &OP_REVOKE)?;

        ledger::revoke_stake(&env, &pool_id, &caller, &account)?;
        Ok(())
    }

    // ── Reward budget ───────────────────────────────────────────────────────

    /// Fund the pool's reward budget from `caller`. Returns the amount
    /// recorded after truncation to the reward token's precision.
    ///
    /// Requires at least `Admin` tier.
    pub fn add_reward(
        env: Env,
        caller: Address,
        pool_id: Symbol,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Admin)?;
        Self::require_not_paused(&env, &OP_ADD_REWARD)?;

        ledger::add_reward(&env, &pool_id, &caller, amount)
    }

    /// Requires `Governance` tier. Funds go to `caller`.
    pub fn remove_unallocated_reward(
        env: Env,
        caller: Address,
        pool_id: Symbol,
    ) -> Result<i128, ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Governance)?;
        Self::require_not_paused(&env, &OP_REMOVE_REWARD)?;

        ledger::remove_unallocated_reward(&env, &pool_id, &caller)
    }

    /// Requires `Governance` tier. Funds go to `caller`.
    pub fn remove_revoked_stakes(
        env: Env,
        caller: Address,
        pool_id: Symbol,
    ) -> Result<i128, ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Governance)?;
        Self::require_not_paused(&env, &OP_REMOVE_REVOKED)?;

        ledger::remove_revoked_stakes(&env, &pool_id, &caller)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_position(
        env: Env,
        pool_id: Symbol,
        account: Address,
    ) -> Result<Position, ContractError> {
        ledger::position(&env, &pool_id, &account)
    }

    pub fn get_claimable_reward(
        env: Env,
        pool_id: Symbol,
        account: Address,
    ) -> Result<i128, ContractError> {
        ledger::claimable_reward(&env, &pool_id, &account)
    }

    pub fn get_pool_aggregate(env: Env, pool_id: Symbol) -> Result<PoolAggregate, ContractError> {
        ledger::aggregate(&env, &pool_id)
    }

    pub fn get_unallocated_reward(env: Env, pool_id: Symbol) -> Result<i128, ContractError> {
        Ok(ledger::aggregate(&env, &pool_id)?.unallocated_reward())
    }

    // ── Pause gate ──────────────────────────────────────────────────────────

    /// Requires at least `Operator` tier.
    pub fn pause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Operator)?;
        pause::set_paused(&env, &scope, true);
        events::publish_contract_paused(&env, caller, scope);
        Ok(())
    }

    /// Requires at least `Operator` tier.
    pub fn unpause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        Self::require_tier(&env, &caller, &AdminTier::Operator)?;
        pause::set_paused(&env, &scope, false);
        events::publish_contract_resumed(&env, caller, scope);
        Ok(())
    }

    pub fn is_paused(env: Env, scope: PauseScope) -> bool {
        pause::scope_paused(&env, &scope)
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Grant `tier` to `target`. Only `Governance` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Remove any tier from `target`. Only `Governance` may call this, and
    /// the primary governor cannot be demoted.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::tier_of(&env, &admin)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: initialized, `caller` authenticated and holding `min_tier`.
    fn require_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        if !admin_tiers::has_tier(env, caller, min_tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn require_not_paused(env: &Env, operation: &Symbol) -> Result<(), ContractError> {
        if pause::is_paused(env, operation) {
            return Err(ContractError::Paused);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin_tiers;
