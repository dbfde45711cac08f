pub mod grid;
pub mod neighbors;

pub use grid::Grid;
pub use neighbors::backward_neighbors;
