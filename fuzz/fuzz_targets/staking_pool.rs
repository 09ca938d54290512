#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{symbol_short, Address, Env};
use staking_pool::rewards::SECONDS_PER_DAY;
use staking_pool::units::CANONICAL_ONE;
use staking_pool::{StakingPoolContract, StakingPoolContractClient};

/// Stellar asset contracts carry 7 decimals.
const NATIVE_STEP: i128 = 100_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { who: u8, amount: u64 },
    AddStake { who: u8, amount: u64 },
    Claim { who: u8 },
    Unstake { who: u8 },
    Suspend { who: u8 },
    Resume { who: u8 },
    Revoke { who: u8 },
    AddReward { amount: u64 },
    RemoveUnallocated,
    RemoveRevoked,
    SuspendPool,
    ResumePool,
    Advance { days: u16 },
}

// Raw fuzz amounts are read as canonical units scaled by 10^9, so both
// sub-native dust and whole-token amounts are reachable.
fn canonical(amount: u64) -> i128 {
    i128::from(amount) * 1_000_000_000
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingPoolContract, ());
    let client = StakingPoolContractClient::new(&env, &contract_id);

    let governor = Address::generate(&env);
    let pool = symbol_short!("FUZZ");
    client.initialize(&governor);
    client.create_pool(
        &governor,
        &pool,
        &30,
        &stake_token,
        &reward_token,
        &(25 * CANONICAL_ONE),
    );
    client.open_pool(&governor, &pool);

    let plenty: i128 = 1_000_000_000_000_000;
    StellarAssetClient::new(&env, &reward_token).mint(&governor, &plenty);

    let mut users = vec![];
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &plenty);
        users.push(user);
    }

    for action in actions.into_iter() {
        match action {
            FuzzAction::Stake { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_stake(user, &pool, &canonical(amount));
            }
            FuzzAction::AddStake { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_add_stake(user, &pool, &canonical(amount));
            }
            FuzzAction::Claim { who } => {
                let _ = client.try_claim_reward(&users[who as usize % users.len()], &pool);
            }
            FuzzAction::Unstake { who } => {
                let _ = client.try_unstake(&users[who as usize % users.len()], &pool);
            }
            FuzzAction::Suspend { who } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_suspend_stake(&governor, &pool, user);
            }
            FuzzAction::Resume { who } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_resume_stake(&governor, &pool, user);
            }
            FuzzAction::Revoke { who } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_revoke_stake(&governor, &pool, user);
            }
            FuzzAction::AddReward { amount } => {
                let _ = client.try_add_reward(&governor, &pool, &canonical(amount));
            }
            FuzzAction::RemoveUnallocated => {
                let _ = client.try_remove_unallocated_reward(&governor, &pool);
            }
            FuzzAction::RemoveRevoked => {
                let _ = client.try_remove_revoked_stakes(&governor, &pool);
            }
            FuzzAction::SuspendPool => {
                let _ = client.try_suspend_pool(&governor, &pool);
            }
            FuzzAction::ResumePool => {
                let _ = client.try_resume_pool(&governor, &pool);
            }
            FuzzAction::Advance { days } => {
                let now = env.ledger().timestamp();
                env.ledger()
                    .set_timestamp(now + u64::from(days) * SECONDS_PER_DAY);
            }
        }

        let aggregate = client.get_pool_aggregate(&pool);
        let stake_held = TokenClient::new(&env, &stake_token).balance(&contract_id) * NATIVE_STEP;
        let reward_held = TokenClient::new(&env, &reward_token).balance(&contract_id) * NATIVE_STEP;

        assert_eq!(
            stake_held,
            aggregate.total_staked + aggregate.total_revoked_principal
        );
        assert_eq!(reward_held, aggregate.total_reward - aggregate.reward_distributed);
        assert!(aggregate.reward_committed >= 0);
        assert!(aggregate.reward_committed + aggregate.reward_distributed <= aggregate.total_reward);
    }
});
