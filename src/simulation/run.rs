//! Run driver - steps a policy until convergence, the budget, or a halt
//!
//! One external step is one call to [`policy::apply`]: a single relocation
//! for `single*` policies, an entire drain for `batch*`/`whitebatch*`.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::board::state::Board;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SchellingError};
use crate::core::types::CellType;
use crate::policy::{self, RelocationPolicy, StepOutcome};
use crate::simulation::output::SimulationOutput;

/// Per-step progress record streamed to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based index of the external step
    pub step: usize,
    /// Relocations applied during the step
    pub moved: usize,
    pub unsatisfied_remaining: usize,
    pub empty_remaining: usize,
}

/// Why the run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Unsatisfied pool is empty
    Converged,
    /// Step budget used up with agents still unsatisfied
    IterationLimit,
    /// Closest-search policy reached the stopping floor
    StoppingFloor,
    /// Board has no empty cell to move into
    NoVacancy,
    /// Satisfy-stop policy found no satisfying vacancy for either type
    NoQualifyingDestination { mover: CellType },
}

impl Termination {
    /// Normal terminations; NoQualifyingDestination is the unrecoverable one
    pub fn is_normal(&self) -> bool {
        !matches!(self, Termination::NoQualifyingDestination { .. })
    }
}

/// Result of one driver run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub policy: RelocationPolicy,
    pub steps_executed: usize,
    pub termination: Termination,
    pub records: Vec<StepRecord>,
}

impl RunReport {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn total_moves(&self) -> usize {
        self.records.iter().map(|r| r.moved).sum()
    }
}

/// Run `policy_name` for at most `max_iterations` external steps.
///
/// Unknown names fail with `InvalidPolicy` before the board is touched.
pub fn run(board: &mut Board, max_iterations: usize, policy_name: &str) -> Result<RunReport> {
    let policy: RelocationPolicy = policy_name.parse()?;
    run_policy(board, max_iterations, policy)
}

pub fn run_policy(board: &mut Board, max_iterations: usize, policy: RelocationPolicy) -> Result<RunReport> {
    run_with_observer(board, max_iterations, policy, |_| {})
}

/// Driver loop; `observer` sees every step record as it is produced
pub fn run_with_observer<F>(
    board: &mut Board,
    max_iterations: usize,
    policy: RelocationPolicy,
    mut observer: F,
) -> Result<RunReport>
where
    F: FnMut(&StepRecord),
{
    let mut records = Vec::new();
    let mut step = 0;
    let mut halted = None;

    while step < max_iterations {
        if board.is_converged() {
            break;
        }

        let result = policy::apply(board, policy);
        step += 1;

        let (moved, stop) = match result {
            Ok(StepOutcome::Moved { moved }) => (moved, None),
            Ok(StepOutcome::FloorReached { moved }) => {
                tracing::warn!(
                    "{} reached stopping floor ({} unsatisfied < {})",
                    policy,
                    board.unsatisfied_count(),
                    board.stopping_floor()
                );
                (moved, Some(Termination::StoppingFloor))
            }
            Ok(StepOutcome::NoVacancy) => {
                tracing::warn!("{} cannot move anyone: board has no empty cells", policy);
                (0, Some(Termination::NoVacancy))
            }
            Err(SchellingError::NoQualifyingDestination { mover, moved }) => {
                tracing::warn!(
                    "{} halted: no satisfying vacancy for {} or the opposite type",
                    policy,
                    mover
                );
                (moved, Some(Termination::NoQualifyingDestination { mover }))
            }
            Err(e) => return Err(e),
        };

        let record = StepRecord {
            step,
            moved,
            unsatisfied_remaining: board.unsatisfied_count(),
            empty_remaining: board.empty_count(),
        };
        tracing::debug!(
            "step {}: moved {}, {} unsatisfied, {} empty",
            record.step,
            record.moved,
            record.unsatisfied_remaining,
            record.empty_remaining
        );
        observer(&record);
        records.push(record);

        if stop.is_some() {
            halted = stop;
            break;
        }
    }

    let termination = match halted {
        Some(termination) => termination,
        None if board.is_converged() => Termination::Converged,
        None => Termination::IterationLimit,
    };

    match termination {
        Termination::Converged => tracing::info!(
            "Converged to stable position with {} at threshold {} after {} steps",
            policy,
            board.threshold(),
            step
        ),
        other => tracing::info!("{} stopped after {} steps: {:?}", policy, step, other),
    }

    Ok(RunReport {
        policy,
        steps_executed: step,
        termination,
        records,
    })
}

/// Build a board from `config`, run it, and package the results
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput> {
    config.validate()?;
    let policy = config.relocation_policy()?;

    let start = Instant::now();
    let mut board = Board::from_config(config)?;
    let initial_satisfaction = board.average_satisfaction();

    let report = run_policy(&mut board, config.max_iterations, policy)?;

    Ok(SimulationOutput::new(
        config.clone(),
        &board,
        report,
        initial_satisfaction,
        start.elapsed(),
    ))
}
