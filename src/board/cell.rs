//! A single board position and its cached neighborhood statistics

use crate::core::types::{CellType, GridPos};

/// Occupied-neighbor counts by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborTally {
    pub type_a: u32,
    pub type_b: u32,
}

impl NeighborTally {
    pub fn add(&mut self, cell_type: CellType) {
        match cell_type {
            CellType::TypeA => self.type_a += 1,
            CellType::TypeB => self.type_b += 1,
            CellType::Empty => {}
        }
    }

    pub fn occupied(&self) -> u32 {
        self.type_a + self.type_b
    }
}

/// One grid cell
///
/// `fraction_a`, `fraction_b` and `satisfaction` are caches: they describe
/// the neighborhood as of the last refresh and are never patched in place.
/// Policies read these cached values when qualifying destinations.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub cell_type: CellType,
    pub pos: GridPos,
    /// Flat indices of adjacent cells (symmetric)
    pub neighbors: Vec<usize>,
    pub satisfaction: f64,
    pub fraction_a: f64,
    pub fraction_b: f64,
}

impl Cell {
    pub fn new(cell_type: CellType, pos: GridPos) -> Self {
        Self {
            cell_type,
            pos,
            neighbors: Vec::new(),
            satisfaction: 1.0,
            fraction_a: 1.0,
            fraction_b: 1.0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.cell_type.is_occupied()
    }

    /// Record an adjacency. Duplicate links are ignored.
    pub fn link(&mut self, other: usize) {
        if !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }

    /// Recompute cached fractions and satisfaction from a neighbor tally.
    ///
    /// With no occupied neighbors both fractions and satisfaction are 1.
    /// Empty cells are always fully satisfied.
    pub fn apply_tally(&mut self, tally: NeighborTally) -> f64 {
        let occupied = tally.occupied();
        if occupied == 0 {
            self.fraction_a = 1.0;
            self.fraction_b = 1.0;
            self.satisfaction = 1.0;
            return self.satisfaction;
        }

        let total = occupied as f64;
        self.fraction_a = tally.type_a as f64 / total;
        self.fraction_b = tally.type_b as f64 / total;

        self.satisfaction = match self.cell_type {
            CellType::Empty => 1.0,
            CellType::TypeA => self.fraction_a,
            CellType::TypeB => self.fraction_b,
        };
        self.satisfaction
    }

    /// Cached share of occupied neighbors of the given type
    pub fn fraction_of(&self, cell_type: CellType) -> f64 {
        match cell_type {
            CellType::TypeA => self.fraction_a,
            CellType::TypeB => self.fraction_b,
            CellType::Empty => 1.0,
        }
    }

    /// Whether a mover of `mover` type landing here would meet `threshold`,
    /// judged from the cached fractions
    pub fn qualifies_for(&self, mover: CellType, threshold: f64) -> bool {
        match mover {
            CellType::Empty => false,
            occupied => self.fraction_of(occupied) >= threshold,
        }
    }
}
