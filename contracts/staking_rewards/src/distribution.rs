use soroban_sdk::{contracttype, Address, Env, U256};

use crate::positions::Position;
use crate::rewards;
use crate::ContractError;

/// The single reward window and its global accumulator.
///
/// Created unstarted by `initialize`. `start` turns it on exactly once; from
/// then on accrual self-limits at `period_finish`, after which the
/// accumulator no longer moves.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionPeriod {
    /// Token paid out as rewards.
    pub reward_token: Address,
    /// Length of the window in seconds.
    pub duration: u64,
    /// Earliest time `start` may run.
    pub start_date: u64,
    /// Reward emitted per second across all stakers. Zero until started.
    pub reward_rate: i128,
    /// End of accrual. Zero until started.
    pub period_finish: u64,
    /// Time the accumulator was last advanced.
    pub last_update_time: u64,
    /// Reward per staked unit since inception, scaled by `PRECISION`.
    /// Kept in 256 bits: a dust-sized pool pushes it far past `i128`.
    pub reward_per_token_stored: U256,
    /// Sum of every position's stake.
    pub total_staked: i128,
    pub started: bool,
}

impl DistributionPeriod {
    pub fn new(env: &Env, reward_token: Address, duration: u64, start_date: u64) -> Self {
        Self {
            reward_token,
            duration,
            start_date,
            reward_rate: 0,
            period_finish: 0,
            last_update_time: 0,
            reward_per_token_stored: U256::from_u32(env, 0),
            total_staked: 0,
            started: false,
        }
    }

    /// `min(now, period_finish)`. Zero before `start` since `period_finish`
    /// is still unset.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    /// Accumulator value as of `now`, without writing anything back.
    pub fn reward_per_token(&self, env: &Env, now: u64) -> Result<U256, ContractError> {
        // The clock never runs backwards, so this only saturates after
        // `period_finish` has been reached by an earlier checkpoint.
        let elapsed = self
            .last_time_reward_applicable(now)
            .saturating_sub(self.last_update_time);

        rewards::compute_reward_per_token(
            env,
            &self.reward_per_token_stored,
            self.reward_rate,
            elapsed,
            self.total_staked,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Freezes accrual up to `now` into stored state.
    ///
    /// Must run before any change to `total_staked` or to a position's stake,
    /// so that reward accrued under the old share composition is attributed
    /// before the composition changes. When `position` is given it is settled
    /// against the fresh accumulator as well.
    pub fn checkpoint(
        &mut self,
        env: &Env,
        now: u64,
        position: Option<&mut Position>,
    ) -> Result<(), ContractError> {
        let reward_per_token = self.reward_per_token(env, now)?;
        let last_update_time = self.last_time_reward_applicable(now);

        if let Some(position) = position {
            position.settle(env, &reward_per_token)?;
        }

        self.reward_per_token_stored = reward_per_token;
        self.last_update_time = self.last_update_time.max(last_update_time);
        Ok(())
    }

    /// Activates distribution of `held_balance` over `duration` seconds.
    ///
    /// The rate is truncated by integer division; the remainder (at most
    /// `duration - 1` base units) stays in the contract forever.
    pub fn start(&mut self, now: u64, held_balance: i128) -> Result<(), ContractError> {
        if self.started {
            return Err(ContractError::AlreadyStarted);
        }
        if now < self.start_date {
            return Err(ContractError::StartDateNotReached);
        }
        if held_balance <= 0 {
            return Err(ContractError::NotFunded);
        }

        let period_finish = now
            .checked_add(self.duration)
            .ok_or(ContractError::ArithmeticOverflow)?;

        self.reward_rate = held_balance / i128::from(self.duration);
        self.last_update_time = now;
        self.period_finish = period_finish;
        self.started = true;
        Ok(())
    }

    /// Nominal reward obligation of the whole window: `reward_rate × duration`.
    pub fn reward_for_duration(&self) -> Result<i128, ContractError> {
        self.reward_rate
            .checked_mul(i128::from(self.duration))
            .ok_or(ContractError::ArithmeticOverflow)
    }

    pub fn add_stake(&mut self, amount: i128) -> Result<(), ContractError> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: i128) -> Result<(), ContractError> {
        if amount > self.total_staked {
            return Err(ContractError::InsufficientBalance);
        }
        self.total_staked -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use soroban_sdk::testutils::Address as _;

    const DAY: u64 = 86_400;
    const TOKEN: i128 = rewards::PRECISION;

    fn period(env: &Env) -> DistributionPeriod {
        DistributionPeriod::new(env, Address::generate(env), 10 * DAY, 5)
    }

    #[test]
    fn nothing_applies_before_start() {
        let env = Env::default();
        let p = period(&env);
        assert_eq!(p.last_time_reward_applicable(1_000_000), 0);
        assert_eq!(p.reward_per_token(&env, 1_000_000), Ok(U256::from_u32(&env, 0)));
    }

    #[test]
    fn start_checks_run_in_order() {
        let env = Env::default();
        let mut p = period(&env);

        assert_eq!(p.start(4, 1_000), Err(ContractError::StartDateNotReached));
        assert_eq!(p.start(5, 0), Err(ContractError::NotFunded));
        assert!(!p.started);

        p.start(5, 1_000 * TOKEN).unwrap();
        assert_eq!(p.start(6, 1_000 * TOKEN), Err(ContractError::AlreadyStarted));
    }

    #[test]
    fn start_truncates_rate_and_sets_window() {
        let env = Env::default();
        let mut p = period(&env);
        p.start(5, 1_000 * TOKEN).unwrap();

        assert!(p.started);
        assert_eq!(p.reward_rate, 1_157_407_407_407_407);
        assert_eq!(p.last_update_time, 5);
        assert_eq!(p.period_finish, 5 + 10 * DAY);

        let nominal = p.reward_for_duration().unwrap();
        assert_eq!(nominal, 999_999_999_999_999_648_000);
        assert!(1_000 * TOKEN - nominal < i128::from(p.duration));
    }

    #[test]
    fn accrual_clamps_at_period_finish() {
        let env = Env::default();
        let mut p = period(&env);
        p.start(5, 1_000 * TOKEN).unwrap();
        p.add_stake(10 * TOKEN).unwrap();

        let at_finish = p.reward_per_token(&env, p.period_finish).unwrap();
        let long_after = p.reward_per_token(&env, p.period_finish + 365 * DAY).unwrap();
        assert_eq!(at_finish, long_after);
        assert_eq!(p.last_time_reward_applicable(u64::MAX), p.period_finish);
    }

    #[test]
    fn checkpoint_freezes_accrual_while_empty() {
        let env = Env::default();
        let mut p = period(&env);
        p.start(5, 1_000 * TOKEN).unwrap();

        p.checkpoint(&env, 5 + DAY, None).unwrap();
        assert_eq!(p.reward_per_token_stored, U256::from_u32(&env, 0));
        assert_eq!(p.last_update_time, 5 + DAY);
    }

    #[test]
    fn checkpoint_settles_the_named_position() {
        let env = Env::default();
        let mut p = period(&env);
        p.start(5, 1_000 * TOKEN).unwrap();

        let mut position = Position::empty(&env);
        p.checkpoint(&env, 5, Some(&mut position)).unwrap();
        position.staked = 10 * TOKEN;
        p.add_stake(10 * TOKEN).unwrap();

        let predicted = position
            .earned(&env, &p.reward_per_token(&env, 5 + DAY).unwrap())
            .unwrap();
        p.checkpoint(&env, 5 + DAY, Some(&mut position)).unwrap();

        assert_eq!(position.rewards, predicted);
        assert_eq!(position.rewards, 99_999_999_999_999_964_800);
        assert_eq!(position.reward_per_token_paid, p.reward_per_token_stored);
    }

    #[test]
    fn single_unit_pool_keeps_checkpointing_past_i128() {
        let env = Env::default();
        let mut p = period(&env);
        p.start(5, 1_000 * TOKEN).unwrap();

        let mut position = Position::empty(&env);
        p.checkpoint(&env, 5, Some(&mut position)).unwrap();
        position.staked = 1;
        p.add_stake(1).unwrap();

        // two idle days with one base unit staked overflow any i128 accumulator
        p.checkpoint(&env, 5 + 2 * DAY, None).unwrap();
        assert_eq!(rewards::narrow(&p.reward_per_token_stored), None);

        p.checkpoint(&env, p.period_finish + DAY, Some(&mut position)).unwrap();
        assert_eq!(position.rewards, p.reward_for_duration().unwrap());
    }

    #[test]
    fn remove_stake_refuses_to_go_negative() {
        let env = Env::default();
        let mut p = period(&env);
        p.add_stake(3).unwrap();
        assert_eq!(p.remove_stake(4), Err(ContractError::InsufficientBalance));
        assert_eq!(p.total_staked, 3);
    }
}
