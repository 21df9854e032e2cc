use soroban_sdk::{Env, U256};

/// Fixed-point scaling factor.
///
/// All reward-per-token values are multiplied by this constant before storage
/// to preserve sub-unit precision without floating-point arithmetic.
/// 10^18 matches the 18-decimal base unit of the reward asset, so one whole
/// token of reward per whole token of stake is stored as `PRECISION`.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

// ── Wide arithmetic ─────────────────────────────────────────────────────────
//
// The accumulator lives in 256 bits. A tiny total stake makes each per-token
// step as large as `emitted × PRECISION`, far beyond `i128`. It stays bounded
// by `funded × PRECISION` (< 2^190), so the 256-bit sums never wrap. Only
// per-staker amounts, which never exceed the funding, come back to `i128`.

/// Widen a non-negative `i128`; `None` for negative input.
pub fn widen(env: &Env, value: i128) -> Option<U256> {
    u128::try_from(value)
        .ok()
        .map(|value| U256::from_u128(env, value))
}

/// Narrow back to `i128`; `None` if the value does not fit.
pub fn narrow(value: &U256) -> Option<i128> {
    i128::try_from(value.to_u128()?).ok()
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Recompute the global `reward_per_token_stored` value.
///
/// This is the fundamental O(1) accumulation step:
///
/// ```text
/// Δrpt = reward_rate × elapsed_seconds × PRECISION / total_staked
/// new_rpt = stored_rpt + Δrpt
/// ```
///
/// When `total_staked` is zero we return `stored` unchanged. Nothing is
/// attributed while the pool is empty, which also avoids division by zero.
///
/// # Arguments
/// * `stored`       – current `reward_per_token_stored` (scaled by PRECISION)
/// * `reward_rate`  – tokens emitted per second across *all* stakers
/// * `elapsed`      – seconds since the last update
/// * `total_staked` – sum of all active stakes
pub fn compute_reward_per_token(
    env: &Env,
    stored: &U256,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> Option<U256> {
    if total_staked <= 0 {
        return Some(stored.clone());
    }

    let emitted = reward_rate.checked_mul(i128::from(elapsed))?;
    let delta = widen(env, emitted)?
        .mul(&widen(env, PRECISION)?)
        .div(&widen(env, total_staked)?);

    Some(stored.add(&delta))
}

/// Calculate the total rewards earned by a single staker.
///
/// ```text
/// earned = staked × (current_rpt − user_rpt_paid) / PRECISION + user_earned
/// ```
///
/// The subtraction `current_rpt − user_rpt_paid` isolates only the
/// accumulation that happened *since the user's last snapshot*, so prior
/// claims/snapshots are never double-counted.
///
/// # Arguments
/// * `staked`        – user's current staked balance
/// * `current_rpt`   – latest global `reward_per_token_stored`
/// * `user_rpt_paid` – the snapshot taken at the user's last interaction
/// * `user_earned`   – already-accumulated rewards not yet claimed
pub fn earned(
    env: &Env,
    staked: i128,
    current_rpt: &U256,
    user_rpt_paid: &U256,
    user_earned: i128,
) -> Option<i128> {
    if current_rpt < user_rpt_paid {
        return None;
    }

    let rpt_delta = current_rpt.sub(user_rpt_paid);
    let new_rewards = widen(env, staked)?
        .mul(&rpt_delta)
        .div(&widen(env, PRECISION)?);

    user_earned.checked_add(narrow(&new_rewards)?)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests; the environment is only needed for 256-bit host integers.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    const TOKEN: i128 = PRECISION;
    const DAY: u64 = 86_400;

    fn u256(env: &Env, value: u128) -> U256 {
        U256::from_u128(env, value)
    }

    #[test]
    fn rpt_zero_when_no_stakers() {
        let env = Env::default();
        let rpt = compute_reward_per_token(&env, &u256(&env, 500), 100, 60, 0);
        assert_eq!(
            rpt,
            Some(u256(&env, 500)),
            "RPT must not change when total_staked is zero"
        );
    }

    #[test]
    fn rpt_accumulates_correctly() {
        let env = Env::default();
        // reward_rate=10 tokens/s, elapsed=100s, total_staked=1_000 tokens
        // Δrpt = 10 × 100 × PRECISION / 1_000 = PRECISION
        let rpt = compute_reward_per_token(&env, &u256(&env, 0), 10, 100, 1_000);
        assert_eq!(rpt, Some(u256(&env, PRECISION as u128)));
    }

    #[test]
    fn rpt_survives_a_full_period_without_checkpoints() {
        let env = Env::default();
        // 1_000 tokens over 10 days against 10 staked tokens: the intermediate
        // product (~10^39) exceeds i128 and must go through 256 bits.
        let rate = 1_000 * TOKEN / i128::from(10 * DAY);
        let rpt = compute_reward_per_token(&env, &u256(&env, 0), rate, 10 * DAY, 10 * TOKEN);
        assert_eq!(rpt, Some(u256(&env, (rate * i128::from(10 * DAY) / 10) as u128)));
    }

    #[test]
    fn single_unit_stake_accumulator_exceeds_i128_and_still_pays() {
        let env = Env::default();
        let rate = 1_000 * TOKEN / i128::from(10 * DAY);
        let zero = u256(&env, 0);

        // one base unit staked for the whole window: Δrpt = emitted × 10^18
        let rpt = compute_reward_per_token(&env, &zero, rate, 10 * DAY, 1).unwrap();
        assert_eq!(narrow(&rpt), None);

        let paid = earned(&env, 1, &rpt, &zero, 0);
        assert_eq!(paid, Some(rate * i128::from(10 * DAY)));
    }

    #[test]
    fn earned_zero_when_no_new_accumulation() {
        let env = Env::default();
        // If user's snapshot equals current RPT, no new rewards.
        let rpt = u256(&env, 100);
        assert_eq!(earned(&env, 500, &rpt, &rpt, 50), Some(50));
    }

    #[test]
    fn earned_proportional_to_stake() {
        let env = Env::default();
        // RPT increased by PRECISION since last snapshot.
        // staked=1_000 → earned_new = 1_000 × PRECISION / PRECISION = 1_000
        let rpt = u256(&env, PRECISION as u128);
        assert_eq!(earned(&env, 1_000, &rpt, &u256(&env, 0), 0), Some(1_000));
    }

    #[test]
    fn one_day_of_a_ten_day_budget_loses_only_dust() {
        let env = Env::default();
        let rate = 1_000 * TOKEN / i128::from(10 * DAY);
        let rpt = compute_reward_per_token(&env, &u256(&env, 0), rate, DAY, 10 * TOKEN).unwrap();
        assert_eq!(rpt, u256(&env, 9_999_999_999_999_996_480));
        assert_eq!(
            earned(&env, 10 * TOKEN, &rpt, &u256(&env, 0), 0),
            Some(99_999_999_999_999_964_800)
        );
    }

    #[test]
    fn earned_rejects_a_snapshot_ahead_of_the_accumulator() {
        let env = Env::default();
        assert_eq!(earned(&env, 1_000, &u256(&env, 10), &u256(&env, 20), 0), None);
    }

    #[test]
    fn earned_reports_overflow_instead_of_wrapping() {
        let env = Env::default();
        let huge = u256(&env, u128::MAX);
        assert_eq!(earned(&env, i128::MAX, &huge, &u256(&env, 0), 0), None);
        assert_eq!(earned(&env, -1, &huge, &u256(&env, 0), 0), None);
    }

    #[test]
    fn widen_and_narrow_respect_i128_range() {
        let env = Env::default();
        assert_eq!(widen(&env, -1), None);
        assert_eq!(narrow(&widen(&env, i128::MAX).unwrap()), Some(i128::MAX));
        assert_eq!(narrow(&u256(&env, u128::MAX)), None);
    }
}
