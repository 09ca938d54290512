use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

// ── Types ─────────────────────────────────────────────────────

/// What a pause switch covers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PauseScope {
    /// Every gated entry point.
    Global,
    /// One named entry point, e.g. `stake` or `claim`.
    Operation(Symbol),
}

// ── Storage Keys ─────────────────────────────────────────────

fn global_key() -> Symbol {
    symbol_short!("PAUSE_ALL")
}

fn operation_key(operation: &Symbol) -> (Symbol, Symbol) {
    (symbol_short!("PAUSE_OP"), operation.clone())
}

// ── Gate ─────────────────────────────────────────────────────

/// True if `operation` may not run, either because of a global pause or a
/// switch on that operation alone.
pub fn is_paused(env: &Env, operation: &Symbol) -> bool {
    let storage = env.storage().instance();
    storage.get(&global_key()).unwrap_or(false)
        || storage.get(&operation_key(operation)).unwrap_or(false)
}

/// Reads a single switch without folding in the global one.
pub fn scope_paused(env: &Env, scope: &PauseScope) -> bool {
    let storage = env.storage().instance();
    match scope {
        PauseScope::Global => storage.get(&global_key()).unwrap_or(false),
        PauseScope::Operation(op) => storage.get(&operation_key(op)).unwrap_or(false),
    }
}

/// Flips the switch for `scope`. Authorisation is the caller's job.
pub fn set_paused(env: &Env, scope: &PauseScope, paused: bool) {
    let storage = env.storage().instance();
    match scope {
        PauseScope::Global => storage.set(&global_key(), &paused),
        PauseScope::Operation(op) => storage.set(&operation_key(op), &paused),
    }
}
