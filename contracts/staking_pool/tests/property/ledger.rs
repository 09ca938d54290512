#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the staking ledger.
//!
//! Random sequences of staking, top-up, claim, unstake, suspension,
//! revocation and budget operations, interleaved with opening, closing,
//! suspending and resuming the pool itself, are replayed against the
//! contract with real token contracts. After every step:
//!
//! - Stake-token custody equals live principal plus revoked principal
//! - Reward-token custody equals supplied reward minus distributed reward
//! - Committed plus distributed reward never exceeds the supplied reward
//! - `total_staked` and `reward_committed` match the live positions
//! - Stakers have received exactly the distributed reward, never more
//!
//! Per operation:
//! - A successful claim cannot be repeated
//! - A revoke moves the forfeited reward to the unallocated budget intact
//! - Pool switches never touch balances, positions or the aggregate

use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{symbol_short, Address, Env, Symbol};
use staking_pool::rewards::SECONDS_PER_DAY;
use staking_pool::units::CANONICAL_ONE;
use staking_pool::{ContractError, StakingPoolContract, StakingPoolContractClient};

const ACTORS: usize = 3;
const POOL: Symbol = symbol_short!("POOL");
/// Stellar asset contracts carry 7 decimals.
const NATIVE_STEP: i128 = 100_000_000_000;

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Stake { actor: usize, amount: i128 },
    AddStake { actor: usize, amount: i128 },
    Claim { actor: usize },
    Unstake { actor: usize },
    Suspend { actor: usize },
    Resume { actor: usize },
    Revoke { actor: usize },
    AddReward { amount: i128 },
    RemoveUnallocated,
    RemoveRevoked,
    OpenPool,
    ClosePool,
    SuspendPool,
    ResumePool,
    Advance { days: u64 },
}

/// Whole tokens plus an arbitrary canonical fraction, so truncation is
/// exercised on most calls.
fn amount() -> impl Strategy<Value = i128> {
    (0i128..2_000i128, 0i128..CANONICAL_ONE).prop_map(|(whole, frac)| whole * CANONICAL_ONE + frac)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..ACTORS, amount()).prop_map(|(actor, amount)| Op::Stake { actor, amount }),
        2 => (0..ACTORS, amount()).prop_map(|(actor, amount)| Op::AddStake { actor, amount }),
        2 => (0..ACTORS).prop_map(|actor| Op::Claim { actor }),
        2 => (0..ACTORS).prop_map(|actor| Op::Unstake { actor }),
        1 => (0..ACTORS).prop_map(|actor| Op::Suspend { actor }),
        1 => (0..ACTORS).prop_map(|actor| Op::Resume { actor }),
        1 => (0..ACTORS).prop_map(|actor| Op::Revoke { actor }),
        2 => amount().prop_map(|amount| Op::AddReward { amount }),
        1 => Just(Op::RemoveUnallocated),
        1 => Just(Op::RemoveRevoked),
        1 => Just(Op::OpenPool),
        1 => Just(Op::ClosePool),
        1 => Just(Op::SuspendPool),
        1 => Just(Op::ResumePool),
        3 => (1u64..120u64).prop_map(|days| Op::Advance { days }),
    ]
}

// ── Harness ───────────────────────────────────────────────────────────────────

struct World {
    env: Env,
    client: StakingPoolContractClient<'static>,
    contract: Address,
    governor: Address,
    stake_token: Address,
    reward_token: Address,
    stakers: Vec<Address>,
}

impl World {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let stake_token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let reward_token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();

        let contract = env.register(StakingPoolContract, ());
        let client = StakingPoolContractClient::new(&env, &contract);

        let governor = Address::generate(&env);
        client.initialize(&governor);
        client.create_pool(
            &governor,
            &POOL,
            &90,
            &stake_token,
            &reward_token,
            &(40 * CANONICAL_ONE),
        );
        client.open_pool(&governor, &POOL);

        // 10^6 whole tokens each, in native units.
        let plenty = 1_000_000 * 10_000_000;
        StellarAssetClient::new(&env, &reward_token).mint(&governor, &plenty);
        client.add_reward(&governor, &POOL, &(500 * CANONICAL_ONE));

        let stakers = (0..ACTORS)
            .map(|_| {
                let staker = Address::generate(&env);
                StellarAssetClient::new(&env, &stake_token).mint(&staker, &plenty);
                staker
            })
            .collect();

        env.ledger().set_timestamp(1_000);

        World {
            env,
            client,
            contract,
            governor,
            stake_token,
            reward_token,
            stakers,
        }
    }

    fn balance(&self, token: &Address, who: &Address) -> i128 {
        TokenClient::new(&self.env, token).balance(who) * NATIVE_STEP
    }

    fn apply(&self, op: &Op) -> Result<(), TestCaseError> {
        match *op {
            Op::Stake { actor, amount } => {
                let _ = self.client.try_stake(&self.stakers[actor], &POOL, &amount);
            }
            Op::AddStake { actor, amount } => {
                let _ = self.client.try_add_stake(&self.stakers[actor], &POOL, &amount);
            }
            Op::Claim { actor } => {
                let staker = &self.stakers[actor];
                if let Ok(Ok(paid)) = self.client.try_claim_reward(staker, &POOL) {
                    prop_assert!(paid > 0);
                    match self.client.try_claim_reward(staker, &POOL) {
                        Err(Ok(e)) => prop_assert_eq!(e, ContractError::ZeroReward),
                        _ => prop_assert!(false, "second claim must fail"),
                    }
                }
            }
            Op::Unstake { actor } => {
                let _ = self.client.try_unstake(&self.stakers[actor], &POOL);
            }
            Op::Suspend { actor } => {
                let _ = self
                    .client
                    .try_suspend_stake(&self.governor, &POOL, &self.stakers[actor]);
            }
            Op::Resume { actor } => {
                let _ = self
                    .client
                    .try_resume_stake(&self.governor, &POOL, &self.stakers[actor]);
            }
            Op::Revoke { actor } => {
                let staker = &self.stakers[actor];
                let before = self.client.get_unallocated_reward(&POOL);
                let position = self.client.try_get_position(&POOL, staker);
                if let Ok(Ok(position)) = position {
                    self.client.revoke_stake(&self.governor, &POOL, staker);
                    let forfeited = position.reward_at_maturity - position.reward_claimed;
                    prop_assert_eq!(self.client.get_unallocated_reward(&POOL), before + forfeited);
                }
            }
            Op::AddReward { amount } => {
                let _ = self.client.try_add_reward(&self.governor, &POOL, &amount);
            }
            Op::RemoveUnallocated => {
                let _ = self.client.try_remove_unallocated_reward(&self.governor, &POOL);
            }
            Op::RemoveRevoked => {
                let _ = self.client.try_remove_revoked_stakes(&self.governor, &POOL);
            }
            Op::OpenPool | Op::ClosePool | Op::SuspendPool | Op::ResumePool => {
                let before = self.client.get_pool_aggregate(&POOL);
                let _ = match *op {
                    Op::OpenPool => self.client.try_open_pool(&self.governor, &POOL),
                    Op::ClosePool => self.client.try_close_pool(&self.governor, &POOL),
                    Op::SuspendPool => self.client.try_suspend_pool(&self.governor, &POOL),
                    _ => self.client.try_resume_pool(&self.governor, &POOL),
                };
                prop_assert_eq!(self.client.get_pool_aggregate(&POOL), before);
            }
            Op::Advance { days } => {
                let now = self.env.ledger().timestamp();
                self.env.ledger().set_timestamp(now + days * SECONDS_PER_DAY);
            }
        }
        Ok(())
    }

    fn check_invariants(&self) -> Result<(), TestCaseError> {
        let aggregate = self.client.get_pool_aggregate(&POOL);

        prop_assert_eq!(
            self.balance(&self.stake_token, &self.contract),
            aggregate.total_staked + aggregate.total_revoked_principal
        );
        prop_assert_eq!(
            self.balance(&self.reward_token, &self.contract),
            aggregate.total_reward - aggregate.reward_distributed
        );
        prop_assert!(
            aggregate.reward_committed + aggregate.reward_distributed <= aggregate.total_reward
        );
        prop_assert!(aggregate.unallocated_reward() >= 0);

        let mut live_principal = 0;
        let mut live_outstanding = 0;
        let mut received = 0;
        for staker in self.stakers.iter() {
            if let Ok(Ok(position)) = self.client.try_get_position(&POOL, staker) {
                prop_assert!(position.principal > 0);
                prop_assert!(position.reward_claimed <= position.reward_at_maturity);
                live_principal += position.principal;
                live_outstanding += position.reward_at_maturity - position.reward_claimed;
            }
            received += self.balance(&self.reward_token, staker);
        }
        prop_assert_eq!(aggregate.total_staked, live_principal);
        prop_assert_eq!(aggregate.reward_committed, live_outstanding);
        prop_assert_eq!(received, aggregate.reward_distributed);

        Ok(())
    }
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_ledger_stays_reconciled(ops in proptest::collection::vec(op(), 1..40)) {
        let world = World::new();
        for op in ops.iter() {
            world.apply(op)?;
            world.check_invariants()?;
        }
    }
}
