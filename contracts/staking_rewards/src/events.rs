use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub controller: Address,
    pub reward_token: Address,
    pub duration: u64,
    pub start_date: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartedEvent {
    pub funded: i128,
    pub reward_rate: i128,
    pub period_finish: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub user: Address,
    pub amount: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub user: Address,
    pub amount: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub user: Address,
    pub reward: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeFixedEvent {
    pub previous: u64,
    pub time: u64,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    controller: Address,
    reward_token: Address,
    duration: u64,
    start_date: u64,
) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        controller,
        reward_token,
        duration,
        start_date,
    };
    env.events().publish(topics, data);
}

pub fn publish_started(env: &Env, funded: i128, reward_rate: i128, period_finish: u64) {
    let topics = (symbol_short!("STARTED"),);
    let data = StartedEvent {
        funded,
        reward_rate,
        period_finish,
    };
    env.events().publish(topics, data);
}

pub fn publish_staked(env: &Env, user: Address, amount: i128, total_staked: i128) {
    let topics = (symbol_short!("STAKED"), user.clone());
    let data = StakedEvent {
        user,
        amount,
        total_staked,
    };
    env.events().publish(topics, data);
}

pub fn publish_withdrawn(env: &Env, user: Address, amount: i128, total_staked: i128) {
    let topics = (symbol_short!("WITHDRAWN"), user.clone());
    let data = WithdrawnEvent {
        user,
        amount,
        total_staked,
    };
    env.events().publish(topics, data);
}

pub fn publish_reward_paid(env: &Env, user: Address, reward: i128) {
    let topics = (symbol_short!("RWD_PAID"), user.clone());
    let data = RewardPaidEvent { user, reward };
    env.events().publish(topics, data);
}

pub fn publish_time_fixed(env: &Env, previous: u64, time: u64) {
    let topics = (symbol_short!("TIME_FIX"),);
    let data = TimeFixedEvent { previous, time };
    env.events().publish(topics, data);
}
