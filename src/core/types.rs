//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// What currently occupies a grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    TypeA,
    TypeB,
}

impl CellType {
    /// Frame code consumed by renderers: 100 for TypeA, -100 for TypeB, 0 for empty
    pub fn color_code(&self) -> i32 {
        match self {
            CellType::Empty => 0,
            CellType::TypeA => 100,
            CellType::TypeB => -100,
        }
    }

    pub fn is_occupied(&self) -> bool {
        !matches!(self, CellType::Empty)
    }

    /// The other occupied type. Empty has no opposite.
    pub fn opposite(&self) -> Option<CellType> {
        match self {
            CellType::Empty => None,
            CellType::TypeA => Some(CellType::TypeB),
            CellType::TypeB => Some(CellType::TypeA),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Empty => "empty",
            CellType::TypeA => "red",
            CellType::TypeB => "blue",
        };
        f.write_str(name)
    }
}

/// Integer grid coordinate (row-major: row is the outer index)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance between two cell coordinates
    pub fn distance(&self, other: &Self) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

/// Exact number of cells of each type on a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub empty: usize,
    pub type_a: usize,
    pub type_b: usize,
}

impl TypeCounts {
    pub fn new(empty: usize, type_a: usize, type_b: usize) -> Self {
        Self { empty, type_a, type_b }
    }

    pub fn total(&self) -> usize {
        self.empty + self.type_a + self.type_b
    }

    pub fn occupied(&self) -> usize {
        self.type_a + self.type_b
    }

    pub fn get(&self, cell_type: CellType) -> usize {
        match cell_type {
            CellType::Empty => self.empty,
            CellType::TypeA => self.type_a,
            CellType::TypeB => self.type_b,
        }
    }
}
