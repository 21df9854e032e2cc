use soroban_sdk::{contracttype, Address, Env, U256};

use crate::distribution::DistributionPeriod;
use crate::rewards;
use crate::ContractError;

/// A participant's stake and reward bookkeeping.
///
/// Created implicitly on first stake and never removed, only zeroed, so a
/// participant who comes back later resumes from a consistent snapshot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub staked: i128,
    /// Accumulator value at this position's last checkpoint.
    pub reward_per_token_paid: U256,
    /// Settled but not yet paid out.
    pub rewards: i128,
}

impl Position {
    /// An untouched position: nothing staked, snapshot at zero.
    pub fn empty(env: &Env) -> Self {
        Self {
            staked: 0,
            reward_per_token_paid: U256::from_u32(env, 0),
            rewards: 0,
        }
    }

    /// Rewards owed if the accumulator stood at `reward_per_token`.
    pub fn earned(&self, env: &Env, reward_per_token: &U256) -> Result<i128, ContractError> {
        rewards::earned(
            env,
            self.staked,
            reward_per_token,
            &self.reward_per_token_paid,
            self.rewards,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Moves everything accrued since the last snapshot into `rewards`.
    pub fn settle(&mut self, env: &Env, reward_per_token: &U256) -> Result<(), ContractError> {
        self.rewards = self.earned(env, reward_per_token)?;
        self.reward_per_token_paid = reward_per_token.clone();
        Ok(())
    }

    /// Zeroes and returns the settled rewards.
    pub fn take_rewards(&mut self) -> i128 {
        core::mem::take(&mut self.rewards)
    }
}

// ── Argument validation ─────────────────────────────────────────────────────

pub fn validate_amount(amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(())
}

/// Soroban has no zero address; the contract's own address plays that part.
/// Staking on its behalf would mix stake accounting with the reward pot.
pub fn validate_participant(env: &Env, participant: &Address) -> Result<(), ContractError> {
    if *participant == env.current_contract_address() {
        return Err(ContractError::InvalidParticipant);
    }
    Ok(())
}

// ── Ledger operations ───────────────────────────────────────────────────────
// Each operation checkpoints first, then mutates. Nothing is written to
// storage here; the caller persists both halves only after success.

/// Adds `amount` to the participant's stake.
pub fn stake(
    env: &Env,
    period: &mut DistributionPeriod,
    position: &mut Position,
    now: u64,
    amount: i128,
) -> Result<(), ContractError> {
    validate_amount(amount)?;

    period.checkpoint(env, now, Some(&mut *position))?;

    period.add_stake(amount)?;
    position.staked = position
        .staked
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok(())
}

/// Removes `amount` from the participant's stake and settles their rewards.
///
/// Returns the reward that must be paid out alongside the withdrawal.
pub fn withdraw(
    env: &Env,
    period: &mut DistributionPeriod,
    position: &mut Position,
    now: u64,
    amount: i128,
) -> Result<i128, ContractError> {
    validate_amount(amount)?;
    if amount > position.staked {
        return Err(ContractError::InsufficientBalance);
    }

    period.checkpoint(env, now, Some(&mut *position))?;

    period.remove_stake(amount)?;
    position.staked -= amount;

    claim(env, period, position, now)
}

/// Settles the participant and hands back whatever is owed, zeroing it.
///
/// Returns zero when nothing is owed.
pub fn claim(
    env: &Env,
    period: &mut DistributionPeriod,
    position: &mut Position,
    now: u64,
) -> Result<i128, ContractError> {
    period.checkpoint(env, now, Some(&mut *position))?;
    Ok(position.take_rewards())
}
