//! Mover and destination resolution
//!
//! Resolution works directly on the board's ordered pools. Shuffles and
//! distance sorts reorder the empty pool in place and that order carries
//! over to later draws until the next full refresh rebuilds it.
//!
//! Qualification reads each vacancy's cached fractions. Inside a drain those
//! caches are not refreshed between micro-moves, so later decisions may see
//! neighborhood statistics from before earlier moves of the same drain.

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::cell::Cell;
use crate::board::state::Board;
use crate::core::error::{Result, SchellingError};
use crate::core::types::{CellType, GridPos};
use crate::policy::{Acceptance, Search};
use crate::spatial::grid::Grid;

/// A resolved move: the mover's cell and the vacancy it will occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub mover: usize,
    pub dest: usize,
}

/// Pick a mover and a destination. Both pools must be non-empty.
pub(crate) fn resolve_move(board: &mut Board, search: Search, acceptance: Acceptance) -> Result<Relocation> {
    let mover = draw_mover(board);
    if search == Search::Closest {
        let from = board.cells[mover].pos;
        order_by_distance(&board.cells, &mut board.empty, from);
    }

    if acceptance == Acceptance::Any {
        let dest = unconditional_destination(board, search);
        return Ok(Relocation { mover, dest });
    }

    if search == Search::Random {
        board.empty.shuffle(&mut board.rng);
    }

    let mover_type = board.cells[mover].cell_type;
    if let Some(dest) = first_qualifying(&board.cells, &board.empty, mover_type, board.threshold()) {
        return Ok(Relocation { mover, dest });
    }

    match acceptance {
        Acceptance::SatisfyContinue => {
            let dest = unconditional_destination(board, search);
            Ok(Relocation { mover, dest })
        }
        _ => substitute_mover(board, search, mover_type),
    }
}

/// Uniform draw from the unsatisfied pool
fn draw_mover(board: &mut Board) -> usize {
    let i = board.rng.gen_range(0..board.unsatisfied.len());
    board.unsatisfied[i]
}

/// Random search draws uniformly; closest search takes the head of the
/// distance-ordered pool
fn unconditional_destination(board: &mut Board, search: Search) -> usize {
    match search {
        Search::Random => {
            let i = board.rng.gen_range(0..board.empty.len());
            board.empty[i]
        }
        Search::Closest => board.empty[0],
    }
}

/// Stable sort of the pool by distance to `from`; ties keep their current order
fn order_by_distance(cells: &Grid<Cell>, pool: &mut [usize], from: GridPos) {
    pool.sort_by_key(|&idx| OrderedFloat(cells[idx].pos.distance(&from)));
}

fn first_qualifying(cells: &Grid<Cell>, pool: &[usize], mover: CellType, threshold: f64) -> Option<usize> {
    pool.iter()
        .copied()
        .find(|&idx| cells[idx].qualifies_for(mover, threshold))
}

/// Satisfy-stop fallback: hand the move to the first opposite-type cell in
/// the unsatisfied pool, if some vacancy would satisfy it.
fn substitute_mover(board: &mut Board, search: Search, mover_type: CellType) -> Result<Relocation> {
    let exhausted = || SchellingError::NoQualifyingDestination {
        mover: mover_type,
        moved: 0,
    };

    let other = board
        .unsatisfied
        .iter()
        .copied()
        .find(|&idx| board.cells[idx].cell_type != mover_type)
        .ok_or_else(exhausted)?;

    if search == Search::Closest {
        let from = board.cells[other].pos;
        order_by_distance(&board.cells, &mut board.empty, from);
    }

    let other_type = board.cells[other].cell_type;
    first_qualifying(&board.cells, &board.empty, other_type, board.threshold())
        .map(|dest| Relocation { mover: other, dest })
        .ok_or_else(exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CellType::{Empty as E, TypeA as A, TypeB as B};

    #[test]
    fn test_closest_any_picks_nearest_vacancy() {
        // Single unsatisfied red at (0,0); vacancies at (0,1) and (2,2)
        #[rustfmt::skip]
        let layout = vec![
            A, E, B,
            B, B, B,
            B, B, E,
        ];
        let mut board = Board::from_layout(3, layout, 0.5, 1, 0).unwrap();
        assert_eq!(board.unsatisfied(), &[0]);

        let relocation = resolve_move(&mut board, Search::Closest, Acceptance::Any).unwrap();
        assert_eq!(relocation, Relocation { mover: 0, dest: 1 });
        // Pool is left in distance order
        assert_eq!(board.empty_cells(), &[1, 8]);
    }

    #[test]
    fn test_satisfy_picks_qualifying_vacancy() {
        // Red at (0,0) surrounded by blues. Vacancy (0,3) borders reds only.
        #[rustfmt::skip]
        let layout = vec![
            A, B, A, E,
            B, B, A, A,
            B, B, B, B,
            E, B, B, B,
        ];
        let mut board = Board::from_layout(4, layout, 0.6, 1, 0).unwrap();
        assert!(board.unsatisfied().contains(&0));

        // Vacancy (3,0) borders blues only
        for _ in 0..20 {
            let relocation = resolve_move(&mut board, Search::Closest, Acceptance::SatisfyStop).unwrap();
            let mover_type = board.cell_at(relocation.mover).cell_type;
            let expected = if mover_type == A { 3 } else { 12 };
            assert_eq!(relocation.dest, expected);
        }
    }

    #[test]
    fn test_satisfy_stop_substitutes_opposite_type() {
        // Single vacancy at (1,1) with 3 blue / 5 red neighbors, threshold 0.6.
        // Reds qualify there, blues do not.
        #[rustfmt::skip]
        let layout = vec![
            A, A, B,
            A, E, B,
            A, B, A,
        ];
        let mut board = Board::from_layout(3, layout, 0.6, 1, 0).unwrap();
        let unsatisfied_blue = board
            .unsatisfied()
            .iter()
            .copied()
            .any(|idx| board.cell_at(idx).cell_type == B);
        assert!(unsatisfied_blue);

        for _ in 0..20 {
            let relocation = resolve_move(&mut board, Search::Random, Acceptance::SatisfyStop).unwrap();
            assert_eq!(board.cell_at(relocation.mover).cell_type, A);
            assert_eq!(relocation.dest, 4);
        }
    }

    #[test]
    fn test_satisfy_stop_fails_when_nobody_qualifies() {
        // Vacancy (0,0) borders two reds and one blue; at threshold 0.9 nobody qualifies
        #[rustfmt::skip]
        let layout = vec![
            E, A, B,
            B, A, B,
            A, B, A,
        ];
        let mut board = Board::from_layout(3, layout, 0.9, 1, 5).unwrap();
        assert!(!board.unsatisfied().is_empty());

        let err = resolve_move(&mut board, Search::Random, Acceptance::SatisfyStop).unwrap_err();
        assert!(matches!(err, SchellingError::NoQualifyingDestination { moved: 0, .. }));

        // Continue falls back to the only vacancy instead
        let relocation = resolve_move(&mut board, Search::Random, Acceptance::SatisfyContinue).unwrap();
        assert_eq!(relocation.dest, 0);
    }
}
