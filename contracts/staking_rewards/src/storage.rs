use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::distribution::DistributionPeriod;
use crate::positions::Position;
use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const PERIOD: Symbol = symbol_short!("PERIOD");

// Per-participant persistent storage uses tuple keys: (prefix, participant)
const POSITION: Symbol = symbol_short!("POS");

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_EXTEND_TO - DAY_IN_LEDGERS;
const POSITION_TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;
const POSITION_TTL_THRESHOLD: u32 = POSITION_TTL_EXTEND_TO - 7 * DAY_IN_LEDGERS;

fn position_key(participant: &Address) -> (Symbol, Address) {
    (POSITION, participant.clone())
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
}

/// Load the distribution period, failing if `initialize` never ran.
pub fn load_period(env: &Env) -> Result<DistributionPeriod, ContractError> {
    env.storage()
        .instance()
        .get(&PERIOD)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_period(env: &Env, period: &DistributionPeriod) {
    env.storage().instance().set(&PERIOD, period);
}

/// Load a participant's position; participants never seen before read as a
/// zeroed position.
pub fn load_position(env: &Env, participant: &Address) -> Position {
    let key = position_key(participant);
    let position: Option<Position> = env.storage().persistent().get(&key);
    match position {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, POSITION_TTL_THRESHOLD, POSITION_TTL_EXTEND_TO);
            position
        }
        None => Position::empty(env),
    }
}

pub fn save_position(env: &Env, participant: &Address, position: &Position) {
    let key = position_key(participant);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, POSITION_TTL_THRESHOLD, POSITION_TTL_EXTEND_TO);
}
