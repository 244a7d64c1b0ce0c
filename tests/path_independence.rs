//! Property tests for the sizing recurrence.
//!
//! The load-bearing property: whenever a run reaches its win target, the
//! account has been multiplied by the plan factor, no matter which order
//! the wins and losses arrived in.

use compound_planner::{PlanConfig, PositionSizer};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Walk a plan over the given outcomes with pure f64 arithmetic, staking
/// the engine's fraction of the running balance each step.
fn walk(config: &PlanConfig, outcomes: &[bool]) -> (f64, u32) {
    let mut sizer = PositionSizer::new(config).unwrap();
    let multiplier = config.multiplier();
    let mut balance = 1.0f64;
    let mut index = 0u32;
    let mut wins = 0u32;

    for &win in outcomes {
        if wins >= config.target_wins {
            break;
        }
        if config.target_wins - wins > config.total_trades - index {
            break;
        }
        let fraction = sizer.stake_fraction(index, wins).unwrap();
        assert!(
            (0.0..=1.0).contains(&fraction),
            "fraction {fraction} out of range at ({index}, {wins})"
        );
        let stake = fraction * balance;
        if win {
            balance += stake * (multiplier - 1.0);
            wins += 1;
        } else {
            balance -= stake;
        }
        index += 1;
    }

    (balance, wins)
}

proptest! {
    #[test]
    fn achieved_plans_compound_by_the_plan_factor(
        total_trades in 2u32..=14,
        target_seed in 1u32..=14,
        payout in 10.0f64..=250.0,
        outcome_seed in proptest::collection::vec(any::<bool>(), 14),
    ) {
        let target_wins = target_seed.min(total_trades);
        let config = PlanConfig::new(total_trades, target_wins, payout);
        let mut sizer = PositionSizer::new(&config).unwrap();
        let expected = sizer.plan_factor();

        let outcomes = &outcome_seed[..total_trades as usize];
        let (final_balance, wins) = walk(&config, outcomes);

        prop_assert!(final_balance >= -1e-12);
        if wins == target_wins {
            prop_assert!(
                (final_balance - expected).abs() <= expected * 1e-9,
                "got {}, plan factor {}", final_balance, expected
            );
        }
    }

    #[test]
    fn repeated_factor_queries_are_bit_identical(
        total_trades in 1u32..=14,
        target_seed in 1u32..=14,
        payout in 10.0f64..=250.0,
        index_seed in 0u32..=14,
        wins_seed in 0u32..=14,
    ) {
        let target_wins = target_seed.min(total_trades);
        let config = PlanConfig::new(total_trades, target_wins, payout);
        let mut sizer = PositionSizer::new(&config).unwrap();

        let index = index_seed.min(total_trades);
        let wins = wins_seed.min(target_wins);
        let first = sizer.factor(index, wins).unwrap();
        let second = sizer.factor(index, wins).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn stakes_never_exceed_a_cent_balance(
        total_trades in 1u32..=14,
        target_seed in 1u32..=14,
        payout in 10.0f64..=250.0,
        index_seed in 0u32..=14,
        wins_seed in 0u32..=14,
        cents in 1i64..=10_000_000,
    ) {
        let target_wins = target_seed.min(total_trades);
        let config = PlanConfig::new(total_trades, target_wins, payout);
        let mut sizer = PositionSizer::new(&config).unwrap();

        let index = index_seed.min(total_trades);
        let wins = wins_seed.min(target_wins);
        let balance = Decimal::new(cents, 2);
        let stake = sizer.stake_amount(index, wins, balance).unwrap();

        prop_assert!(stake >= Decimal::ZERO);
        prop_assert!(stake <= balance, "stake {} over balance {}", stake, balance);
    }
}
