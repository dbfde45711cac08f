//! Initial population: target counts and the draw-without-replacement pool

use rand::Rng;

use crate::core::error::{Result, SchellingError};
use crate::core::types::{CellType, TypeCounts};

/// Derive exact type counts for a `side x side` board.
///
/// Empty and TypeA targets are rounded to the nearest integer and TypeB takes
/// the remainder, so the three counts always sum to the board area. Inputs
/// whose rounded targets overshoot the area are rejected.
pub fn derive_counts(side: usize, empty_fraction: f64, type_a_fraction: f64) -> Result<TypeCounts> {
    if side == 0 {
        return Err(SchellingError::DegenerateConfiguration(
            "side length must be positive".into(),
        ));
    }
    for (name, value) in [("empty_fraction", empty_fraction), ("type_a_fraction", type_a_fraction)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SchellingError::DegenerateConfiguration(format!(
                "{} ({}) must lie in [0, 1]",
                name, value
            )));
        }
    }

    let area = side * side;
    let area_f = area as f64;
    let empty = (area_f * empty_fraction).round() as usize;
    let type_a = (area_f * type_a_fraction * (1.0 - empty_fraction)).round() as usize;

    if empty + type_a > area {
        return Err(SchellingError::DegenerateConfiguration(format!(
            "{} empty + {} typeA cells exceed the {}-cell board",
            empty, type_a, area
        )));
    }

    Ok(TypeCounts::new(empty, type_a, area - empty - type_a))
}

/// Finite multiset of cell types still to be placed
///
/// Each draw picks uniformly among the remaining items and removes it,
/// so the pool is exhausted exactly after `total()` draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePool {
    remaining: TypeCounts,
}

impl TypePool {
    pub fn new(counts: TypeCounts) -> Self {
        Self { remaining: counts }
    }

    /// Draw one type, weighted by the remaining counts. None once exhausted.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<CellType> {
        let total = self.remaining.total();
        if total == 0 {
            return None;
        }

        let mut pick = rng.gen_range(0..total);
        if pick < self.remaining.empty {
            self.remaining.empty -= 1;
            return Some(CellType::Empty);
        }
        pick -= self.remaining.empty;
        if pick < self.remaining.type_a {
            self.remaining.type_a -= 1;
            return Some(CellType::TypeA);
        }
        self.remaining.type_b -= 1;
        Some(CellType::TypeB)
    }
}
