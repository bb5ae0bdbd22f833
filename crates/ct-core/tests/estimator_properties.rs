//! Property-based tests for streaming estimator invariants.

use ct_common::Alphabet;
use ct_core::inference::{estimate, PastTable, StreamingEstimator};
use ct_core::sampling::{generate, seeded_rng};
use ct_core::tree::{to_finite_markov, ContextModel, ContextTree, FiniteMarkov};
use proptest::prelude::*;

const BUDGET: usize = 1 << 16;

/// Full order-`h` model over `m` symbols with uniform rows.
fn full_model(m: usize, h: usize) -> ContextModel {
    let table = PastTable::build(m, h, BUDGET).expect("table");
    let contexts: Vec<Vec<usize>> = table.iter().map(|(_, t)| t).collect();
    let rows = vec![vec![1.0 / m as f64; m]; contexts.len()];
    let tree = ContextTree::new(contexts, m).expect("tree");
    ContextModel::new(Alphabet::numeric(m).expect("alphabet"), tree, rows).expect("model")
}

fn markov(m: usize, h: usize) -> FiniteMarkov {
    to_finite_markov(&full_model(m, h), BUDGET).expect("finite markov")
}

/// Alphabet size, height and a sequence at least `height` long.
fn case_strategy() -> impl Strategy<Value = (usize, usize, Vec<usize>)> {
    (2usize..=4, 1usize..=3).prop_flat_map(|(m, h)| {
        (
            Just(m),
            Just(h),
            prop::collection::vec(0..m, h..200),
        )
    })
}

fn window_index(window: &[usize], m: usize) -> usize {
    window.iter().fold(0, |acc, &s| acc * m + s)
}

proptest! {
    #[test]
    fn occurrence_vectors_sum_to_one((m, h, seq) in case_strategy()) {
        let est = estimate(&markov(m, h), seq.iter().copied(), BUDGET).unwrap();
        for depth in 1..=h {
            let probs = est.occurrence_at(depth).unwrap();
            prop_assert_eq!(probs.len(), m.pow(depth as u32));
            let sum: f64 = probs.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "depth {} sums to {}", depth, sum);
        }
    }

    #[test]
    fn occurrence_matches_naive_window_count((m, h, seq) in case_strategy()) {
        let est = estimate(&markov(m, h), seq.iter().copied(), BUDGET).unwrap();
        let n = seq.len();
        for depth in 1..=h {
            let mut counts = vec![0u64; m.pow(depth as u32)];
            for window in seq.windows(depth) {
                counts[window_index(window, m)] += 1;
            }
            let windows = (n - depth + 1) as f64;
            for (p, c) in est.occurrence_at(depth).unwrap().iter().zip(&counts) {
                prop_assert!((p - *c as f64 / windows).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn transition_rows_sum_to_one_or_zero((m, h, seq) in case_strategy()) {
        let est = estimate(&markov(m, h), seq.iter().copied(), BUDGET).unwrap();
        prop_assert_eq!(est.transition.len(), m.pow(h as u32));
        let mut zero_rows = 0;
        for row in &est.transition {
            prop_assert_eq!(row.len(), m);
            let sum: f64 = row.iter().sum();
            if sum == 0.0 {
                zero_rows += 1;
            } else {
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
        }
        prop_assert_eq!(zero_rows, est.unobserved_pasts);
    }

    #[test]
    fn entropy_is_bounded((m, h, seq) in case_strategy()) {
        let est = estimate(&markov(m, h), seq.iter().copied(), BUDGET).unwrap();
        let upper = (m as f64).log2();
        prop_assert_eq!(est.entropy_trajectory.len(), seq.len());
        for (i, value) in est.entropy_trajectory.iter().enumerate() {
            if i < h {
                prop_assert!(value.is_none(), "warm-up position {} has a value", i + 1);
            } else {
                let v = value.unwrap();
                prop_assert!((0.0..=upper).contains(&v), "entropy {} outside [0, {}]", v, upper);
            }
        }
    }

    #[test]
    fn estimation_is_deterministic((m, h, seq) in case_strategy()) {
        let fm = markov(m, h);
        let a = estimate(&fm, seq.iter().copied(), BUDGET).unwrap();
        let b = estimate(&fm, seq.iter().copied(), BUDGET).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn warm_up_seed_agrees_with_longer_sequence((m, h, seq) in case_strategy()) {
        let fm = markov(m, h);

        // A sequence of exactly `height` symbols puts all mass on its own past.
        let prefix = &seq[..h];
        let short = estimate(&fm, prefix.iter().copied(), BUDGET).unwrap();
        let seeded = fm.pasts.index_of(prefix).unwrap();
        let top = short.occurrence_at(h).unwrap();
        prop_assert_eq!(top[seeded], 1.0);
        prop_assert_eq!(top.iter().filter(|&&p| p > 0.0).count(), 1);

        // The longer pass starts from the same seeded past and the same
        // trajectory prefix.
        let mut streaming = StreamingEstimator::new(&fm, BUDGET).unwrap();
        let mut trajectory = Vec::new();
        for &s in &seq {
            trajectory.push(streaming.push(s).unwrap());
        }
        let long = streaming.finish().unwrap();
        prop_assert_eq!(&long.entropy_trajectory[..h], &short.entropy_trajectory[..]);
        prop_assert_eq!(&long.entropy_trajectory, &trajectory);
        let first_window = seq.windows(h).next().unwrap();
        prop_assert_eq!(window_index(first_window, m), seeded);
        prop_assert!(long.occurrence_at(h).unwrap()[seeded] > 0.0);
    }

    #[test]
    fn shift_table_round_trip(m in 1usize..=4, k in 1usize..=4) {
        let table = PastTable::build(m, k, BUDGET).unwrap();
        prop_assert_eq!(table.len(), m.pow(k as u32));
        for (i, past) in table.iter() {
            prop_assert_eq!(table.index_of(&past), Some(i));
            for a in 0..m {
                let mut shifted = past[1..].to_vec();
                shifted.push(a);
                prop_assert_eq!(table.tuple(table.shift(i, a)), shifted);
            }
        }
    }

    #[test]
    fn seeded_generation_is_deterministic(seed in any::<u64>()) {
        let model = full_model(3, 2);
        let fm = to_finite_markov(&model, BUDGET).unwrap();
        let a = generate(&model, Some(&fm), 300, seeded_rng(Some(seed))).unwrap();
        let b = generate(&model, Some(&fm), 300, seeded_rng(Some(seed))).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn estimates_converge_to_model_transitions() {
    // Binary tree {0, 01, 11}, contexts oldest first.
    let alphabet = Alphabet::numeric(2).unwrap();
    let tree = ContextTree::new(vec![vec![0], vec![0, 1], vec![1, 1]], 2).unwrap();
    let rows = vec![vec![0.2, 0.8], vec![0.6, 0.4], vec![0.9, 0.1]];
    let model = ContextModel::new(alphabet, tree, rows.clone()).unwrap();
    let fm = to_finite_markov(&model, BUDGET).unwrap();

    let seq = generate(&model, Some(&fm), 200_000, seeded_rng(Some(2024))).unwrap();
    let est = estimate(&fm, seq, BUDGET).unwrap();

    for (past, row) in est.transition.iter().enumerate() {
        let expected = &rows[fm.context_of_past[past]];
        for (p, q) in row.iter().zip(expected) {
            assert!((p - q).abs() < 0.02, "past {}: {:?} vs {:?}", past, row, expected);
        }
    }

    let theoretical = fm.entropy_rate_bits().unwrap();
    let empirical = est.final_entropy_rate().unwrap();
    assert!(
        (theoretical - empirical).abs() < 0.02,
        "entropy {} vs {}",
        empirical,
        theoretical
    );
}

#[test]
fn oversized_tables_are_rejected() {
    let model = full_model(2, 2);
    assert!(to_finite_markov(&model, 3).is_err());
    let fm = markov(4, 3);
    // Depth tables below the height are built against the same budget.
    assert!(StreamingEstimator::new(&fm, 4).is_err());
}
