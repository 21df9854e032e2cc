extern crate std;

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contractimpl, Address, Env};

use crate::access::{self, Role};
use crate::clock::{self, ClockError, ClockMode};

/// Minimal contract giving the helpers an instance storage to work against.
#[contract]
pub struct Harness;

#[contractimpl]
impl Harness {
    pub fn version() -> u32 {
        1
    }
}

fn harness(env: &Env) -> Address {
    env.register(Harness, ())
}

#[test]
fn unassigned_role_is_held_by_nobody() {
    let env = Env::default();
    let id = harness(&env);
    let someone = Address::generate(&env);

    env.as_contract(&id, || {
        assert_eq!(access::role_holder(&env, Role::Admin), None);
        assert!(!access::has_role(&env, Role::Admin, &someone));
    });
}

#[test]
fn roles_are_tracked_independently() {
    let env = Env::default();
    let id = harness(&env);
    let admin = Address::generate(&env);
    let controller = Address::generate(&env);

    env.as_contract(&id, || {
        access::assign_role(&env, Role::Admin, &admin);
        access::assign_role(&env, Role::Controller, &controller);

        assert!(access::has_role(&env, Role::Admin, &admin));
        assert!(!access::has_role(&env, Role::Admin, &controller));
        assert!(access::has_role(&env, Role::Controller, &controller));
        assert!(!access::has_role(&env, Role::Controller, &admin));
    });
}

#[test]
fn require_role_rejects_other_callers() {
    let env = Env::default();
    env.mock_all_auths();
    let id = harness(&env);
    let admin = Address::generate(&env);
    let intruder = Address::generate(&env);

    env.as_contract(&id, || {
        access::assign_role(&env, Role::Admin, &admin);
        assert!(access::require_role(&env, Role::Admin, &admin));
        assert!(!access::require_role(&env, Role::Admin, &intruder));
    });
}

#[test]
fn ledger_clock_follows_ledger_timestamp() {
    let env = Env::default();
    let id = harness(&env);
    env.ledger().set_timestamp(1_700_000_000);

    env.as_contract(&id, || {
        assert_eq!(clock::mode(&env), ClockMode::Ledger);
        assert_eq!(clock::now(&env), 1_700_000_000);
        assert_eq!(clock::fix_time(&env, 5), Err(ClockError::NotFixed));
    });
}

#[test]
fn fixed_clock_ignores_ledger_and_never_regresses() {
    let env = Env::default();
    let id = harness(&env);
    env.ledger().set_timestamp(1_700_000_000);

    env.as_contract(&id, || {
        clock::set_mode(&env, ClockMode::Fixed);
        assert_eq!(clock::now(&env), 0);

        assert_eq!(clock::fix_time(&env, 5), Ok(0));
        assert_eq!(clock::now(&env), 5);

        // standing still is allowed
        assert_eq!(clock::fix_time(&env, 5), Ok(5));
        assert_eq!(clock::fix_time(&env, 4), Err(ClockError::Regression));
        assert_eq!(clock::now(&env), 5);
    });
}
