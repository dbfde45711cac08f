//! Board model
//!
//! Cells live in an arena owned by [`Board`] and refer to their neighbors by
//! flat index. Only cell types change during a run; adjacency is fixed once
//! the board is assembled.

pub mod cell;
pub mod population;
pub mod state;

pub use cell::{Cell, NeighborTally};
pub use population::{derive_counts, TypePool};
pub use state::{Board, ColorFrame};
