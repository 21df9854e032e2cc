#![no_std]

pub mod distribution;
pub mod events;
pub mod positions;
pub mod rewards;
mod storage;

use common::access::{self, Role};
use common::clock::{self, ClockError, ClockMode};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, U256};

pub use distribution::DistributionPeriod;
pub use positions::Position;

// ── Contract errors ──────────────────────────────────────────────────────────

/// Codes are grouped by class; see [`ContractError::kind`].
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 10,
    InvalidAmount = 20,
    InvalidParticipant = 21,
    InvalidConfig = 22,
    /// A fixed-clock override tried to move time backwards.
    InvalidTime = 23,
    InsufficientBalance = 30,
    /// `start` found no reward tokens held by the contract.
    NotFunded = 31,
    StartDateNotReached = 32,
    AlreadyStarted = 33,
    /// `fix_time` on a contract running on the ledger clock.
    FixedClockDisabled = 34,
    ArithmeticOverflow = 40,
}

/// Failure classes callers can branch on without matching every code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Lifecycle,
    Authorization,
    InvalidArgument,
    InsufficientState,
    Arithmetic,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            0..=9 => ErrorKind::Lifecycle,
            10..=19 => ErrorKind::Authorization,
            20..=29 => ErrorKind::InvalidArgument,
            30..=39 => ErrorKind::InsufficientState,
            _ => ErrorKind::Arithmetic,
        }
    }
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Time-weighted reward distribution over a controller-managed stake ledger.
///
/// Staking is pure bookkeeping: the controller custodies the staked asset and
/// reports stake changes here. The only token that ever leaves this contract
/// is the reward token, paid out on claim.
#[contract]
pub struct StakingRewardsContract;

#[contractimpl]
impl StakingRewardsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token` – token distributed as rewards; fund the contract with
    ///   it before calling `start`.
    /// * `controller`   – the only address allowed to `stake` / `withdraw`.
    /// * `duration`     – length of the distribution window in seconds.
    /// * `start_date`   – earliest timestamp at which `start` succeeds.
    /// * `clock_mode`   – `Ledger` for real deployments, `Fixed` for
    ///   deterministic environments driven through `fix_time`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        controller: Address,
        duration: u64,
        start_date: u64,
        clock_mode: ClockMode,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        let this = env.current_contract_address();
        if duration == 0
            || start_date == 0
            || reward_token == this
            || controller == this
            || controller == reward_token
            || admin == reward_token
        {
            return Err(ContractError::InvalidConfig);
        }

        access::assign_role(&env, Role::Admin, &admin);
        access::assign_role(&env, Role::Controller, &controller);
        clock::set_mode(&env, clock_mode);
        storage::save_period(
            &env,
            &DistributionPeriod::new(&env, reward_token.clone(), duration, start_date),
        );
        storage::mark_initialized(&env);
        storage::extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, controller, reward_token, duration, start_date);

        Ok(())
    }

    /// Activate distribution of everything the contract currently holds.
    ///
    /// Admin only, once, and not before `start_date`. The reward rate is the
    /// held balance divided by the duration, rounded down.
    pub fn start(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_role(&env, Role::Admin, &caller)?;

        let mut period = storage::load_period(&env)?;
        let now = clock::now(&env);
        let held = token::Client::new(&env, &period.reward_token)
            .balance(&env.current_contract_address());

        period.start(now, held)?;

        storage::save_period(&env, &period);
        storage::extend_instance_ttl(&env);

        log!(&env, "distribution started", held, period.reward_rate, period.period_finish);
        events::publish_started(&env, held, period.reward_rate, period.period_finish);

        Ok(())
    }

    // ── Controller gateway ──────────────────────────────────────────────────

    /// Record `amount` of stake for `participant`. Controller only.
    pub fn stake(
        env: Env,
        caller: Address,
        participant: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_role(&env, Role::Controller, &caller)?;
        positions::validate_participant(&env, &participant)?;

        let now = clock::now(&env);
        let mut period = storage::load_period(&env)?;
        let mut position = storage::load_position(&env, &participant);

        positions::stake(&env, &mut period, &mut position, now, amount)?;

        storage::save_period(&env, &period);
        storage::save_position(&env, &participant, &position);
        storage::extend_instance_ttl(&env);

        events::publish_staked(&env, participant, amount, period.total_staked);

        Ok(())
    }

    /// Remove `amount` of `participant`'s stake and pay out their rewards.
    /// Controller only.
    pub fn withdraw(
        env: Env,
        caller: Address,
        participant: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_role(&env, Role::Controller, &caller)?;
        positions::validate_participant(&env, &participant)?;

        Self::withdraw_and_settle(&env, &participant, amount)
    }

    /// Withdraw the participant's whole stake and pay out their rewards.
    /// Controller only.
    pub fn exit(env: Env, caller: Address, participant: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_role(&env, Role::Controller, &caller)?;
        positions::validate_participant(&env, &participant)?;

        let staked = storage::load_position(&env, &participant).staked;
        Self::withdraw_and_settle(&env, &participant, staked)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay `participant` everything they have earned so far.
    ///
    /// Returns the amount paid; zero (not an error) when nothing is owed.
    pub fn get_reward(env: Env, participant: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        participant.require_auth();

        let now = clock::now(&env);
        let mut period = storage::load_period(&env)?;
        let mut position = storage::load_position(&env, &participant);

        let reward = positions::claim(&env, &mut period, &mut position, now)?;

        storage::save_period(&env, &period);
        storage::save_position(&env, &participant, &position);
        storage::extend_instance_ttl(&env);

        Self::pay_reward(&env, &period, &participant, reward);

        Ok(reward)
    }

    // ── Clock ───────────────────────────────────────────────────────────────

    /// Override the clock. Admin only, fixed-clock contracts only; time may
    /// not move backwards.
    pub fn fix_time(env: Env, caller: Address, time: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_role(&env, Role::Admin, &caller)?;

        let previous = clock::fix_time(&env, time).map_err(|err| match err {
            ClockError::NotFixed => ContractError::FixedClockDisabled,
            ClockError::Regression => ContractError::InvalidTime,
        })?;

        events::publish_time_fixed(&env, previous, time);

        Ok(())
    }

    /// Current reading of the configured clock.
    pub fn get_now(env: Env) -> u64 {
        clock::now(&env)
    }

    pub fn get_clock_mode(env: Env) -> ClockMode {
        clock::mode(&env)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn last_time_reward_applicable(env: Env) -> Result<u64, ContractError> {
        let period = storage::load_period(&env)?;
        Ok(period.last_time_reward_applicable(clock::now(&env)))
    }

    /// Accumulated reward per staked unit as of now, scaled by 10^18.
    pub fn reward_per_token(env: Env) -> Result<U256, ContractError> {
        let period = storage::load_period(&env)?;
        period.reward_per_token(&env, clock::now(&env))
    }

    /// Nominal reward of the whole window. Never more than was funded.
    pub fn get_reward_for_duration(env: Env) -> Result<i128, ContractError> {
        storage::load_period(&env)?.reward_for_duration()
    }

    /// Rewards `participant` could claim right now.
    pub fn earned(env: Env, participant: Address) -> Result<i128, ContractError> {
        let period = storage::load_period(&env)?;
        let reward_per_token = period.reward_per_token(&env, clock::now(&env))?;
        storage::load_position(&env, &participant).earned(&env, &reward_per_token)
    }

    pub fn balance_of(env: Env, participant: Address) -> i128 {
        storage::load_position(&env, &participant).staked
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::load_period(&env)
            .map(|period| period.total_staked)
            .unwrap_or(0)
    }

    pub fn get_position(env: Env, participant: Address) -> Position {
        storage::load_position(&env, &participant)
    }

    pub fn user_reward_per_token_paid(env: Env, participant: Address) -> U256 {
        storage::load_position(&env, &participant).reward_per_token_paid
    }

    /// Rewards settled at the participant's last checkpoint, not yet paid.
    pub fn rewards(env: Env, participant: Address) -> i128 {
        storage::load_position(&env, &participant).rewards
    }

    pub fn get_distribution(env: Env) -> Result<DistributionPeriod, ContractError> {
        storage::load_period(&env)
    }

    pub fn rewards_token(env: Env) -> Result<Address, ContractError> {
        Ok(storage::load_period(&env)?.reward_token)
    }

    pub fn rewards_duration(env: Env) -> Result<u64, ContractError> {
        Ok(storage::load_period(&env)?.duration)
    }

    pub fn reward_rate(env: Env) -> Result<i128, ContractError> {
        Ok(storage::load_period(&env)?.reward_rate)
    }

    pub fn period_finish(env: Env) -> Result<u64, ContractError> {
        Ok(storage::load_period(&env)?.period_finish)
    }

    pub fn last_update_time(env: Env) -> Result<u64, ContractError> {
        Ok(storage::load_period(&env)?.last_update_time)
    }

    pub fn reward_per_token_stored(env: Env) -> Result<U256, ContractError> {
        Ok(storage::load_period(&env)?.reward_per_token_stored)
    }

    pub fn start_date(env: Env) -> Result<u64, ContractError> {
        Ok(storage::load_period(&env)?.start_date)
    }

    pub fn is_started(env: Env) -> bool {
        storage::load_period(&env)
            .map(|period| period.started)
            .unwrap_or(false)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::role_holder(&env, Role::Admin).ok_or(ContractError::NotInitialized)
    }

    pub fn get_controller(env: Env) -> Result<Address, ContractError> {
        access::role_holder(&env, Role::Controller).ok_or(ContractError::NotInitialized)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: authenticate `caller` and check it holds `role`.
    fn require_role(env: &Env, role: Role, caller: &Address) -> Result<(), ContractError> {
        if !access::require_role(env, role, caller) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn withdraw_and_settle(
        env: &Env,
        participant: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let now = clock::now(env);
        let mut period = storage::load_period(env)?;
        let mut position = storage::load_position(env, participant);

        let reward = positions::withdraw(env, &mut period, &mut position, now, amount)?;

        storage::save_period(env, &period);
        storage::save_position(env, participant, &position);
        storage::extend_instance_ttl(env);

        events::publish_withdrawn(env, participant.clone(), amount, period.total_staked);
        Self::pay_reward(env, &period, participant, reward);

        Ok(())
    }

    /// Transfer a settled reward out. State must already be persisted.
    fn pay_reward(env: &Env, period: &DistributionPeriod, participant: &Address, reward: i128) {
        if reward <= 0 {
            return;
        }

        token::Client::new(env, &period.reward_token).transfer(
            &env.current_contract_address(),
            participant,
            &reward,
        );

        events::publish_reward_paid(env, participant.clone(), reward);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
