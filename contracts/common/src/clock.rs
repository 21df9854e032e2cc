//! Injectable time source.
//!
//! Contracts never read the ledger timestamp directly. They ask [`now`],
//! which dispatches to the [`Clock`] implementation chosen by the
//! [`ClockMode`] stored at setup:
//!
//! * [`LedgerClock`] follows the ledger close time.
//! * [`FixedClock`] returns an explicitly stored value that only moves when
//!   [`fix_time`] is called. Used for deterministic test networks.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

const CLK_MODE: Symbol = symbol_short!("CLK_MODE");
const FIXED_TIME: Symbol = symbol_short!("FIXED_TS");

/// Which clock implementation a contract reads.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClockMode {
    Ledger,
    Fixed,
}

/// Reasons a fixed-time override can be refused.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClockError {
    /// The contract runs on the ledger clock.
    NotFixed,
    /// The new time is earlier than the current one.
    Regression,
}

/// A source of monotonically non-decreasing unix time in seconds.
pub trait Clock {
    fn now(&self) -> u64;
}

pub struct LedgerClock<'a> {
    env: &'a Env,
}

impl<'a> LedgerClock<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl Clock for LedgerClock<'_> {
    fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }
}

pub struct FixedClock {
    time: u64,
}

impl FixedClock {
    /// Loads the stored override; an unset override reads as zero.
    pub fn load(env: &Env) -> Self {
        Self {
            time: env.storage().instance().get(&FIXED_TIME).unwrap_or(0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.time
    }
}

pub fn set_mode(env: &Env, mode: ClockMode) {
    env.storage().instance().set(&CLK_MODE, &mode);
}

/// Returns the configured mode, defaulting to the ledger clock.
pub fn mode(env: &Env) -> ClockMode {
    env.storage()
        .instance()
        .get(&CLK_MODE)
        .unwrap_or(ClockMode::Ledger)
}

/// Current time according to the configured clock.
pub fn now(env: &Env) -> u64 {
    match mode(env) {
        ClockMode::Ledger => LedgerClock::new(env).now(),
        ClockMode::Fixed => FixedClock::load(env).now(),
    }
}

/// Overrides the fixed clock, returning the previous reading.
///
/// Time may stand still but never run backwards.
pub fn fix_time(env: &Env, time: u64) -> Result<u64, ClockError> {
    if mode(env) != ClockMode::Fixed {
        return Err(ClockError::NotFixed);
    }

    let previous = FixedClock::load(env).now();
    if time < previous {
        return Err(ClockError::Regression);
    }

    env.storage().instance().set(&FIXED_TIME, &time);
    Ok(previous)
}
