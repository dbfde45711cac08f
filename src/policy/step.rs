//! One external policy step: a single move or a full drain

use crate::board::state::Board;
use crate::core::error::{Result, SchellingError};
use crate::policy::selection::{resolve_move, Relocation};
use crate::policy::{Granularity, RelocationPolicy};

/// What a step accomplished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Relocations were applied (zero only if nobody was unsatisfied)
    Moved { moved: usize },
    /// Closest-search policy stopped at the board's stopping floor
    FloorReached { moved: usize },
    /// No empty cell exists, so nobody can move
    NoVacancy,
}

impl StepOutcome {
    /// Whether the driver should keep stepping
    pub fn keep_running(&self) -> bool {
        matches!(self, StepOutcome::Moved { .. })
    }

    pub fn moved(&self) -> usize {
        match self {
            StepOutcome::Moved { moved } | StepOutcome::FloorReached { moved } => *moved,
            StepOutcome::NoVacancy => 0,
        }
    }
}

/// Apply one external step of `policy` to the board.
///
/// Successful steps end with a full refresh and a captured frame. A
/// satisfy-stop policy that finds no qualifying vacancy for either type
/// returns `NoQualifyingDestination`; moves already applied in the same
/// drain stay applied and are reflected in the refreshed board.
pub fn apply(board: &mut Board, policy: RelocationPolicy) -> Result<StepOutcome> {
    if board.unsatisfied.is_empty() {
        return Ok(StepOutcome::Moved { moved: 0 });
    }
    if below_floor(board, policy) {
        return Ok(StepOutcome::FloorReached { moved: 0 });
    }
    if board.empty.is_empty() {
        return Ok(StepOutcome::NoVacancy);
    }

    if policy.is_drain() {
        drain(board, policy)
    } else {
        single_move(board, policy)
    }
}

fn below_floor(board: &Board, policy: RelocationPolicy) -> bool {
    policy.uses_stopping_floor() && board.unsatisfied.len() < board.stopping_floor()
}

fn single_move(board: &mut Board, policy: RelocationPolicy) -> Result<StepOutcome> {
    let Relocation { mover, dest } = resolve_move(board, policy.search, policy.acceptance)?;
    board.relocate(mover, dest);
    board.refresh_sets();
    board.capture_snapshot();
    Ok(StepOutcome::Moved { moved: 1 })
}

/// Work through the unsatisfied pool without rescanning between moves.
///
/// Each mover leaves the pool once moved and each filled vacancy leaves the
/// empty pool. `WhiteBatch` pushes the vacated cell onto the empty pool so
/// later movers in the same drain may take it.
fn drain(board: &mut Board, policy: RelocationPolicy) -> Result<StepOutcome> {
    let recycle_vacated = policy.granularity == Granularity::WhiteBatch;
    let mut moved = 0;

    while !board.unsatisfied.is_empty() && !board.empty.is_empty() {
        if below_floor(board, policy) {
            finish_drain(board, moved);
            return Ok(StepOutcome::FloorReached { moved });
        }

        let Relocation { mover, dest } = match resolve_move(board, policy.search, policy.acceptance) {
            Ok(relocation) => relocation,
            Err(SchellingError::NoQualifyingDestination { mover, .. }) => {
                finish_drain(board, moved);
                return Err(SchellingError::NoQualifyingDestination { mover, moved });
            }
            Err(e) => return Err(e),
        };

        board.empty.retain(|&idx| idx != dest);
        board.unsatisfied.retain(|&idx| idx != mover);
        if recycle_vacated {
            board.empty.push(mover);
        }
        board.relocate(mover, dest);
        moved += 1;
    }

    board.refresh_sets();
    board.capture_snapshot();
    Ok(StepOutcome::Moved { moved })
}

/// Restore the pools after an early exit; record a frame only if cells changed
fn finish_drain(board: &mut Board, moved: usize) {
    board.refresh_sets();
    if moved > 0 {
        board.capture_snapshot();
    }
}
