//! Integration tests for the relocation policy family
//!
//! Every one of the 18 policies is exercised on seeded boards to verify:
//! - Population conservation across steps
//! - Pool consistency after every external step
//! - One frame per successful step
//! - Deterministic trajectories for a fixed seed

use schelling_sim::board::Board;
use schelling_sim::core::types::CellType;
use schelling_sim::policy::{apply, Granularity, RelocationPolicy, Search, StepOutcome};
use schelling_sim::simulation::run_policy;
use schelling_sim::{run, SchellingError, Termination};

fn seeded_board(seed: u64, stopping_floor: usize) -> Board {
    Board::new(12, 0.15, 0.5, 0.5, stopping_floor, seed).unwrap()
}

fn pools_consistent(board: &Board) -> bool {
    board.cells().iter().enumerate().all(|(idx, cell)| {
        let in_unsatisfied = board.unsatisfied().contains(&idx);
        let in_empty = board.empty_cells().contains(&idx);
        let should_be_unsatisfied = cell.is_occupied() && cell.satisfaction < board.threshold();
        !(in_unsatisfied && in_empty)
            && in_empty == (cell.cell_type == CellType::Empty)
            && in_unsatisfied == should_be_unsatisfied
    })
}

#[test]
fn test_every_policy_conserves_population() {
    for policy in RelocationPolicy::all() {
        let mut board = seeded_board(17, 1);
        let before = board.type_counts();

        let report = run_policy(&mut board, 30, policy).unwrap();

        assert_eq!(board.type_counts(), before, "{} changed the population", policy);
        assert!(pools_consistent(&board), "{} left inconsistent pools", policy);
        assert!(report.steps_executed <= 30);
    }
}

#[test]
fn test_every_policy_keeps_pools_consistent_each_step() {
    for policy in RelocationPolicy::all() {
        let mut board = seeded_board(5, 1);
        for _ in 0..10 {
            if board.is_converged() {
                break;
            }
            match apply(&mut board, policy) {
                Ok(outcome) => {
                    assert!(pools_consistent(&board), "{} after {:?}", policy, outcome);
                    if !outcome.keep_running() {
                        break;
                    }
                }
                Err(SchellingError::NoQualifyingDestination { .. }) => {
                    assert!(pools_consistent(&board), "{} after failure", policy);
                    break;
                }
                Err(e) => panic!("{} failed unexpectedly: {}", policy, e),
            }
        }
    }
}

#[test]
fn test_every_policy_is_deterministic() {
    for policy in RelocationPolicy::all() {
        let mut first = seeded_board(99, 1);
        let mut second = seeded_board(99, 1);

        let report_a = run_policy(&mut first, 15, policy).unwrap();
        let report_b = run_policy(&mut second, 15, policy).unwrap();

        assert_eq!(report_a, report_b, "{} diverged", policy);
        assert_eq!(first.snapshots(), second.snapshots(), "{} frames diverged", policy);
    }
}

#[test]
fn test_frames_track_successful_steps() {
    let mut board = seeded_board(3, 1);
    let report = run(&mut board, 12, "singleRandom").unwrap();

    // singleRandom never halts early, so every executed step captured a frame
    assert_eq!(board.snapshots().len(), report.steps_executed);
    assert_eq!(report.total_moves(), report.steps_executed);
    if let Some(last) = board.snapshots().last() {
        assert_eq!(last, &board.color_codes());
    }
}

#[test]
fn test_batch_single_vacancy_use_vs_whitebatch_recycling() {
    let batch: RelocationPolicy = "batchRandom".parse().unwrap();
    let white: RelocationPolicy = "whitebatchRandom".parse().unwrap();
    assert_eq!(batch.granularity, Granularity::Batch);
    assert_eq!(white.granularity, Granularity::WhiteBatch);

    let mut board = seeded_board(21, 1);
    let vacancies = board.empty_count();
    let unsatisfied = board.unsatisfied_count();
    let outcome = apply(&mut board, batch).unwrap();
    assert_eq!(outcome.moved(), vacancies.min(unsatisfied));

    let mut board = seeded_board(21, 1);
    let outcome = apply(&mut board, white).unwrap();
    assert_eq!(outcome.moved(), unsatisfied);
}

#[test]
fn test_stopping_floor_halts_single_closest_satisfy_stop() {
    let mut board = seeded_board(8, 1);
    let floor = board.unsatisfied_count() + 1;
    let mut board = seeded_board(8, floor);
    let before = board.color_codes();

    let report = run(&mut board, 100, "singleClosestSatisfyStop").unwrap();

    assert_eq!(report.termination, Termination::StoppingFloor);
    assert_eq!(report.steps_executed, 1);
    assert_eq!(report.records[0].moved, 0);
    assert_eq!(board.color_codes(), before);
    assert!(board.snapshots().is_empty());
}

#[test]
fn test_stopping_floor_reached_during_run() {
    let mut board = Board::new(10, 0.1, 0.5, 0.5, 5, 4).unwrap();
    let report = run(&mut board, 5000, "singleClosestSatisfyStop").unwrap();

    assert_eq!(report.termination, Termination::StoppingFloor);
    let last = report.records.last().unwrap();
    assert!(last.unsatisfied_remaining < 5);
    assert_eq!(last.moved, 0);
    // The halting call records no frame
    assert_eq!(board.snapshots().len(), report.steps_executed - 1);

    // Further calls keep refusing without touching the board
    let before = board.color_codes();
    let policy: RelocationPolicy = "singleClosestSatisfyStop".parse().unwrap();
    let outcome = apply(&mut board, policy).unwrap();
    assert_eq!(outcome, StepOutcome::FloorReached { moved: 0 });
    assert_eq!(board.color_codes(), before);
}

#[test]
fn test_floor_interrupts_closest_drain() {
    let policy: RelocationPolicy = "batchClosest".parse().unwrap();

    for seed in 0..10 {
        let unsatisfied = seeded_board(seed, 1).unsatisfied_count();
        assert!(unsatisfied >= 4, "seed {} starts nearly settled", seed);
        let mut board = seeded_board(seed, unsatisfied - 3);
        let before = board.type_counts();

        let outcome = apply(&mut board, policy).unwrap();

        // The pool shrinks by one per micro-move; the fourth move takes it below the floor
        assert_eq!(outcome, StepOutcome::FloorReached { moved: 4 }, "seed {}", seed);
        assert_eq!(board.snapshots().len(), 1);
        assert_eq!(board.snapshots()[0], board.color_codes());
        assert_eq!(board.type_counts(), before);
        assert!(pools_consistent(&board), "seed {} left stale pools", seed);
    }
}

#[test]
fn test_floor_interrupted_drain_ends_run() {
    let unsatisfied = seeded_board(13, 1).unsatisfied_count();
    let mut board = seeded_board(13, unsatisfied - 3);

    let report = run(&mut board, 100, "batchClosestSatisfyContinue").unwrap();

    assert_eq!(report.termination, Termination::StoppingFloor);
    assert_eq!(report.steps_executed, 1);
    assert_eq!(report.records[0].moved, 4);
    assert_eq!(board.snapshots().last(), Some(&board.color_codes()));
}

#[test]
fn test_random_search_ignores_floor() {
    let policy: RelocationPolicy = "singleRandomSatisfyContinue".parse().unwrap();
    assert_eq!(policy.search, Search::Random);

    let mut board = seeded_board(8, 10_000);
    let outcome = apply(&mut board, policy).unwrap();
    assert_eq!(outcome, StepOutcome::Moved { moved: 1 });
}

#[test]
fn test_satisfy_stop_exhaustion_halts_run() {
    use schelling_sim::core::types::CellType::{Empty as E, TypeA as A, TypeB as B};
    // The lone vacancy borders two reds and a blue; nobody can reach 0.9 there
    #[rustfmt::skip]
    let layout = vec![
        E, A, B,
        B, A, B,
        A, B, A,
    ];

    for name in ["singleRandomSatisfyStop", "batchClosestSatisfyStop", "whitebatchRandomSatisfyStop"] {
        let mut board = Board::from_layout(3, layout.clone(), 0.9, 1, 12).unwrap();
        let before = board.color_codes();

        let report = run(&mut board, 50, name).unwrap();

        assert!(
            matches!(report.termination, Termination::NoQualifyingDestination { .. }),
            "{} ended with {:?}",
            name,
            report.termination
        );
        assert!(!report.termination.is_normal());
        assert_eq!(report.steps_executed, 1);
        assert_eq!(board.color_codes(), before);
    }
}

#[test]
fn test_satisfy_continue_moves_anyway() {
    use schelling_sim::core::types::CellType::{Empty as E, TypeA as A, TypeB as B};
    #[rustfmt::skip]
    let layout = vec![
        E, A, B,
        B, A, B,
        A, B, A,
    ];
    let mut board = Board::from_layout(3, layout, 0.9, 1, 12).unwrap();

    let report = run(&mut board, 1, "singleClosestSatisfyContinue").unwrap();

    assert_eq!(report.steps_executed, 1);
    assert_eq!(report.records[0].moved, 1);
    assert_ne!(board.cell_at(0).cell_type, CellType::Empty);
}

#[test]
fn test_satisfy_stop_drain_keeps_earlier_moves() {
    use schelling_sim::core::types::CellType::{Empty as E, TypeA as A, TypeB as B};
    // (1,1) suits reds only; (3,2) suits nobody at 0.9
    #[rustfmt::skip]
    let layout = vec![
        A, A, A, B,
        A, E, A, B,
        A, A, A, B,
        B, B, E, B,
    ];

    for name in ["batchRandomSatisfyStop", "batchClosestSatisfyStop", "whitebatchRandomSatisfyStop"] {
        let mut board = Board::from_layout(4, layout.clone(), 0.9, 1, 21).unwrap();
        let before = board.type_counts();
        let policy: RelocationPolicy = name.parse().unwrap();

        let err = apply(&mut board, policy).unwrap_err();

        assert!(
            matches!(err, SchellingError::NoQualifyingDestination { moved: 1, .. }),
            "{} failed with {:?}",
            name,
            err
        );
        assert_eq!(board.cell_at(5).cell_type, CellType::TypeA);
        assert_eq!(board.cell_at(14).cell_type, CellType::Empty);
        assert_eq!(board.type_counts(), before);
        assert_eq!(board.snapshots().len(), 1, "{}", name);
        assert_eq!(board.snapshots()[0], board.color_codes());
        assert!(pools_consistent(&board), "{} left stale pools", name);
    }
}

#[test]
fn test_partial_satisfy_stop_drain_reported_by_run() {
    use schelling_sim::core::types::CellType::{Empty as E, TypeA as A, TypeB as B};
    #[rustfmt::skip]
    let layout = vec![
        A, A, A, B,
        A, E, A, B,
        A, A, A, B,
        B, B, E, B,
    ];
    let mut board = Board::from_layout(4, layout, 0.9, 1, 21).unwrap();

    let report = run(&mut board, 50, "batchRandomSatisfyStop").unwrap();

    assert!(matches!(report.termination, Termination::NoQualifyingDestination { .. }));
    assert_eq!(report.steps_executed, 1);
    assert_eq!(report.records[0].moved, 1);
    assert_eq!(report.records[0].unsatisfied_remaining, board.unsatisfied_count());
    assert_eq!(board.snapshots().last(), Some(&board.color_codes()));
}
