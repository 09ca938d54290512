extern crate std;

use common::admin_tiers::AdminTier;
use common::pause::PauseScope;
use soroban_sdk::{
    symbol_short,
    testutils::Address as _,
    token::StellarAssetClient,
    Address, Env, InvokeError, Symbol,
};

use crate::units::CANONICAL_ONE;
use crate::{ContractError, StakingPoolContract, StakingPoolContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("MONTHLY");

struct Setup {
    env: Env,
    client: StakingPoolContractClient<'static>,
    governor: Address,
    stake_token: Address,
    reward_token: Address,
}

fn setup() -> Setup {
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
    client.initialize(&governor);
    client.create_pool(
        &governor,
        &POOL,
        &30,
        &stake_token,
        &reward_token,
        &(10 * CANONICAL_ONE),
    );
    client.open_pool(&governor, &POOL);

    Setup {
        env,
        client,
        governor,
        stake_token,
        reward_token,
    }
}

impl Setup {
    fn member(&self, tier: AdminTier) -> Address {
        let who = Address::generate(&self.env);
        self.client.promote_admin(&self.governor, &who, &tier);
        who
    }

    fn stake_something(&self) -> Address {
        // 100 reward tokens and a 1000-token stake, in native 7-decimal units.
        StellarAssetClient::new(&self.env, &self.reward_token)
            .mint(&self.governor, &1_000_000_000);
        self.client
            .add_reward(&self.governor, &POOL, &(100 * CANONICAL_ONE));

        let staker = Address::generate(&self.env);
        StellarAssetClient::new(&self.env, &self.stake_token).mint(&staker, &10_000_000_000);
        self.client.stake(&staker, &POOL, &(1_000 * CANONICAL_ONE));
        staker
    }
}

fn expect_unauthorized<T, E>(result: Result<Result<T, E>, Result<ContractError, InvokeError>>) {
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("expected Unauthorized"),
    }
}

// ── Bootstrap ────────────────────────────────────────────────────────────────

#[test]
fn test_initializer_is_governance() {
    let s = setup();
    assert_eq!(s.client.get_admin_tier(&s.governor), Some(AdminTier::Governance));
}

#[test]
fn test_unknown_address_has_no_tier() {
    let s = setup();
    assert_eq!(s.client.get_admin_tier(&Address::generate(&s.env)), None);
}

#[test]
fn test_calls_before_initialize_fail() {
    let env = Env::default();
    env.mock_all_auths();
    let client = StakingPoolContractClient::new(&env, &env.register(StakingPoolContract, ()));
    let someone = Address::generate(&env);

    assert!(!client.is_initialized());
    match client.try_get_admin() {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("expected NotInitialized"),
    }
    match client.try_pause(&someone, &PauseScope::Global) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("expected NotInitialized"),
    }
}

// ── Promotion & demotion ─────────────────────────────────────────────────────

#[test]
fn test_governance_promotes_each_tier() {
    let s = setup();

    for tier in [AdminTier::Operator, AdminTier::Admin, AdminTier::Governance] {
        let who = s.member(tier.clone());
        assert_eq!(s.client.get_admin_tier(&who), Some(tier));
    }
}

#[test]
fn test_promotion_replaces_previous_tier() {
    let s = setup();
    let who = s.member(AdminTier::Operator);

    s.client.promote_admin(&s.governor, &who, &AdminTier::Admin);
    assert_eq!(s.client.get_admin_tier(&who), Some(AdminTier::Admin));
}

#[test]
fn test_admin_cannot_promote() {
    let s = setup();
    let admin = s.member(AdminTier::Admin);
    let target = Address::generate(&s.env);

    expect_unauthorized(s.client.try_promote_admin(&admin, &target, &AdminTier::Operator));
    assert_eq!(s.client.get_admin_tier(&target), None);
}

#[test]
fn test_governance_demotes() {
    let s = setup();
    let admin = s.member(AdminTier::Admin);

    s.client.demote_admin(&s.governor, &admin);
    assert_eq!(s.client.get_admin_tier(&admin), None);
    expect_unauthorized(s.client.try_open_pool(&admin, &POOL));
}

#[test]
fn test_primary_governor_cannot_be_demoted() {
    let s = setup();
    let second = s.member(AdminTier::Governance);

    expect_unauthorized(s.client.try_demote_admin(&second, &s.governor));
    assert_eq!(s.client.get_admin_tier(&s.governor), Some(AdminTier::Governance));

    // The primary governor can still remove other governors.
    s.client.demote_admin(&s.governor, &second);
    assert_eq!(s.client.get_admin_tier(&second), None);
}

#[test]
fn test_operator_cannot_demote() {
    let s = setup();
    let operator = s.member(AdminTier::Operator);
    let admin = s.member(AdminTier::Admin);

    expect_unauthorized(s.client.try_demote_admin(&operator, &admin));
    assert_eq!(s.client.get_admin_tier(&admin), Some(AdminTier::Admin));
}

// ── Tier gates on entry points ───────────────────────────────────────────────

#[test]
fn test_outsider_cannot_manage_pools() {
    let s = setup();
    let outsider = Address::generate(&s.env);

    expect_unauthorized(s.client.try_create_pool(
        &outsider,
        &symbol_short!("ROGUE"),
        &30,
        &s.stake_token,
        &s.reward_token,
        &CANONICAL_ONE,
    ));
    expect_unauthorized(s.client.try_close_pool(&outsider, &POOL));
    expect_unauthorized(s.client.try_suspend_pool(&outsider, &POOL));
}

#[test]
fn test_operator_pauses_but_cannot_manage_pools() {
    let s = setup();
    let operator = s.member(AdminTier::Operator);

    s.client.pause(&operator, &PauseScope::Global);
    assert!(s.client.is_paused(&PauseScope::Global));
    s.client.unpause(&operator, &PauseScope::Global);

    expect_unauthorized(s.client.try_close_pool(&operator, &POOL));
    expect_unauthorized(s.client.try_add_reward(&operator, &POOL, &CANONICAL_ONE));
}

#[test]
fn test_admin_manages_pools_and_positions() {
    let s = setup();
    let admin = s.member(AdminTier::Admin);
    let staker = s.stake_something();

    s.client.close_pool(&admin, &POOL);
    s.client.open_pool(&admin, &POOL);
    s.client.suspend_stake(&admin, &POOL, &staker);
    s.client.resume_stake(&admin, &POOL, &staker);

    StellarAssetClient::new(&s.env, &s.reward_token).mint(&admin, &10_000_000);
    assert_eq!(s.client.add_reward(&admin, &POOL, &CANONICAL_ONE), CANONICAL_ONE);

    // Pause switches are covered by the lower tier.
    s.client.pause(&admin, &PauseScope::Operation(symbol_short!("stake")));
}

#[test]
fn test_admin_cannot_revoke_or_recover() {
    let s = setup();
    let admin = s.member(AdminTier::Admin);
    let staker = s.stake_something();

    expect_unauthorized(s.client.try_revoke_stake(&admin, &POOL, &staker));
    expect_unauthorized(s.client.try_remove_unallocated_reward(&admin, &POOL));
    expect_unauthorized(s.client.try_remove_revoked_stakes(&admin, &POOL));
    assert!(s.client.get_position(&POOL, &staker).is_active);
}

#[test]
fn test_operator_cannot_suspend_positions() {
    let s = setup();
    let operator = s.member(AdminTier::Operator);
    let staker = s.stake_something();

    expect_unauthorized(s.client.try_suspend_stake(&operator, &POOL, &staker));
}

#[test]
fn test_promoted_governor_revokes_and_recovers() {
    let s = setup();
    let governor = s.member(AdminTier::Governance);
    let staker = s.stake_something();

    s.client.revoke_stake(&governor, &POOL, &staker);
    let swept = s.client.remove_revoked_stakes(&governor, &POOL);
    let reclaimed = s.client.remove_unallocated_reward(&governor, &POOL);

    assert_eq!(swept, 1_000 * CANONICAL_ONE);
    assert_eq!(reclaimed, 100 * CANONICAL_ONE);
}
