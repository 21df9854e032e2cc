#![no_main]

use arbitrary::Arbitrary;
use common::clock::ClockMode;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env};
use staking_rewards::{ContractError, StakingRewardsContract, StakingRewardsContractClient};

const DURATION: u64 = 10 * 86_400;
const START_DATE: u64 = 5;
const FUNDING: i128 = 1_000_000_000_000_000_000_000;

#[derive(Arbitrary, Debug)]
enum Action {
    Stake { who: u8, amount: u64 },
    Withdraw { who: u8, amount: u64 },
    Exit { who: u8 },
    Claim { who: u8 },
    Advance { seconds: u32 },
}

fuzz_target!(|actions: Vec<Action>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let controller = Address::generate(&env);
    let users = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];

    let token_id = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let reward_token = token::Client::new(&env, &token_id);
    let contract_id = env.register(StakingRewardsContract, ());
    let client = StakingRewardsContractClient::new(&env, &contract_id);

    client.initialize(
        &admin,
        &token_id,
        &controller,
        &DURATION,
        &START_DATE,
        &ClockMode::Fixed,
    );
    token::StellarAssetClient::new(&env, &token_id).mint(&contract_id, &FUNDING);
    client.fix_time(&admin, &START_DATE);
    client.start(&admin);

    let mut now = START_DATE;
    let mut last_rpt = client.reward_per_token_stored();

    for action in actions.iter().take(64) {
        match *action {
            Action::Stake { who, amount } => {
                let user = &users[usize::from(who) % users.len()];
                let result = client.try_stake(&controller, user, &i128::from(amount));
                if amount == 0 {
                    assert_eq!(result, Err(Ok(ContractError::InvalidAmount)));
                } else {
                    assert!(result.is_ok());
                }
            }
            Action::Withdraw { who, amount } => {
                let user = &users[usize::from(who) % users.len()];
                let staked = client.balance_of(user);
                let amount = i128::from(amount);
                let result = client.try_withdraw(&controller, user, &amount);
                if amount == 0 {
                    assert_eq!(result, Err(Ok(ContractError::InvalidAmount)));
                } else if amount > staked {
                    assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));
                    assert_eq!(client.balance_of(user), staked);
                } else {
                    assert!(result.is_ok());
                }
            }
            Action::Exit { who } => {
                let user = &users[usize::from(who) % users.len()];
                let _ = client.try_exit(&controller, user);
                assert_eq!(client.balance_of(user), 0);
            }
            Action::Claim { who } => {
                let user = &users[usize::from(who) % users.len()];
                client.get_reward(user);
                assert_eq!(client.get_reward(user), 0);
            }
            Action::Advance { seconds } => {
                now += u64::from(seconds);
                client.fix_time(&admin, &now);
            }
        }

        let staked: i128 = users.iter().map(|u| client.balance_of(u)).sum();
        assert_eq!(client.total_supply(), staked);

        let rpt = client.reward_per_token_stored();
        assert!(rpt >= last_rpt);
        last_rpt = rpt;

        let paid: i128 = users.iter().map(|u| reward_token.balance(u)).sum();
        assert!(paid <= client.get_reward_for_duration());
    }
});
