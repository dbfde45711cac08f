//! Schelling Sim - residential segregation on a bounded 2D grid
//!
//! Agents of two types share a square board with empty cells. Each agent
//! is satisfied when enough of its occupied king-move neighbors share its
//! type; unsatisfied agents relocate under one of 18 relocation policies
//! until the board converges or the step budget runs out.

pub mod board;
pub mod core;
pub mod policy;
pub mod simulation;
pub mod spatial;

pub use crate::board::Board;
pub use crate::core::{CellType, Result, SchellingError, SimulationConfig};
pub use crate::policy::RelocationPolicy;
pub use crate::simulation::{run, simulate, RunReport, Termination};
