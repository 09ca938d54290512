use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const TIER_PREFIX: Symbol = symbol_short!("ACC_TIER");
const GOVERNOR: Symbol = symbol_short!("GOVERNOR");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Admin Tier Enum ──────────────────────────────────────────────────────────

/// Three-tier privilege ladder used by the staking contracts.
///
/// - `Operator`   – may only engage or release pause switches.
/// - `Admin`      – manages pools, supplies rewards, suspends and resumes
///                  individual positions.
/// - `Governance` – may override positions (revoke), recover unallocated
///                  reward and revoked principal, and grant or remove tiers.
///
/// A higher tier implies every permission of the lower ones.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    Operator = 1,
    Admin = 2,
    Governance = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::Operator => 1,
            AdminTier::Admin => 2,
            AdminTier::Governance => 3,
        }
    }

    /// True if holding `self` satisfies a requirement of `required`.
    pub fn covers(&self, required: &AdminTier) -> bool {
        self.rank() >= required.rank()
    }
}

// ── Storage Helpers ──────────────────────────────────────────────────────────

fn tier_key(who: &Address) -> (Symbol, Address) {
    (TIER_PREFIX, who.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn tier_of(env: &Env, who: &Address) -> Option<AdminTier> {
    let key = tier_key(who);
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        extend_ttl(env, &key);
    }
    tier
}

/// Returns `true` if `who` holds `required` or any tier above it.
pub fn has_tier(env: &Env, who: &Address, required: &AdminTier) -> bool {
    tier_of(env, who).is_some_and(|tier| tier.covers(required))
}

/// The address installed by [`bootstrap`]. It can never be demoted.
pub fn primary_governor(env: &Env) -> Option<Address> {
    env.storage().instance().get(&GOVERNOR)
}

// ── Mutations ────────────────────────────────────────────────────────────────

/// Installs the first governor. Callers must make sure this runs once, from
/// their own initialisation path.
pub fn bootstrap(env: &Env, governor: &Address) {
    env.storage().instance().set(&GOVERNOR, governor);
    set_tier(env, governor, AdminTier::Governance);
}

fn set_tier(env: &Env, who: &Address, tier: AdminTier) {
    let key = tier_key(who);
    env.storage().persistent().set(&key, &tier);
    extend_ttl(env, &key);
}

/// Grants `tier` to `target` on behalf of `caller`.
///
/// `caller` must already be authenticated and hold `Governance`. Returns
/// `false` without touching storage otherwise.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !has_tier(env, caller, &AdminTier::Governance) {
        return false;
    }
    set_tier(env, target, tier);
    true
}

/// Removes any tier held by `target`.
///
/// Fails (returns `false`) when `caller` is not `Governance` or when `target`
/// is the primary governor.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !has_tier(env, caller, &AdminTier::Governance) {
        return false;
    }
    if primary_governor(env).as_ref() == Some(target) {
        return false;
    }
    env.storage().persistent().remove(&tier_key(target));
    true
}
