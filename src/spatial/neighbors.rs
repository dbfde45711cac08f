//! King-move adjacency on a bounded square board
//!
//! Adjacency is fixed at construction. Cells are bound in build order:
//! the first row links each cell to its left neighbor, every later row
//! links a new cell to its left, above-left, above-right and above
//! neighbors when they exist. The result is the full 8-neighborhood
//! (5 on edges, 3 in corners) with every edge recorded on both ends.

use crate::core::types::GridPos;

/// Previously built cells a new cell binds to, in binding order
pub fn backward_neighbors(pos: GridPos, side: usize) -> Vec<GridPos> {
    let mut bound = Vec::with_capacity(4);
    if pos.col > 0 {
        bound.push(GridPos::new(pos.row, pos.col - 1));
    }
    if pos.row > 0 {
        let above = pos.row - 1;
        if pos.col > 0 {
            bound.push(GridPos::new(above, pos.col - 1));
        }
        if pos.col + 1 < side {
            bound.push(GridPos::new(above, pos.col + 1));
        }
        bound.push(GridPos::new(above, pos.col));
    }
    bound
}

/// Full 8-neighborhood of a cell, clipped to the board
#[cfg(test)]
pub(crate) fn king_neighbors(pos: GridPos, side: usize) -> impl Iterator<Item = GridPos> {
    const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < side && col < side).then(|| GridPos::new(row, col))
    })
}
