//! Board - the cell arena, its membership pools and frame history

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::cell::{Cell, NeighborTally};
use crate::board::population::{derive_counts, TypePool};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SchellingError};
use crate::core::types::{CellType, GridPos, TypeCounts};
use crate::spatial::grid::Grid;
use crate::spatial::neighbors::backward_neighbors;

/// Frame of color codes (100 TypeA, -100 TypeB, 0 empty)
pub type ColorFrame = Grid<i32>;

/// The simulation board
///
/// Owns every cell (addressed by flat row-major index), the two membership
/// pools derived from cell types, and the sequence of frames captured after
/// each successful policy step.
#[derive(Debug)]
pub struct Board {
    side: usize,
    threshold: f64,
    stopping_floor: usize,
    pub(crate) cells: Grid<Cell>,
    /// Occupied cells below threshold, row-major after each refresh
    pub(crate) unsatisfied: Vec<usize>,
    /// Empty cells, row-major after each refresh
    pub(crate) empty: Vec<usize>,
    snapshots: Vec<ColorFrame>,
    /// Single random stream shared by construction and all policies
    pub(crate) rng: ChaCha8Rng,
}

impl Board {
    /// Build a board from fractional population targets
    pub fn new(
        side: usize,
        empty_fraction: f64,
        type_a_fraction: f64,
        threshold: f64,
        stopping_floor: usize,
        seed: u64,
    ) -> Result<Self> {
        let counts = derive_counts(side, empty_fraction, type_a_fraction)?;
        Self::from_counts(side, counts, threshold, stopping_floor, seed)
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Self::new(
            config.side_length,
            config.empty_fraction,
            config.type_a_fraction,
            config.threshold,
            config.stopping_floor,
            config.seed,
        )
    }

    /// Build a board whose cell types are drawn without replacement from
    /// exact counts. The counts must tile the board.
    pub fn from_counts(
        side: usize,
        counts: TypeCounts,
        threshold: f64,
        stopping_floor: usize,
        seed: u64,
    ) -> Result<Self> {
        if side == 0 || counts.total() != side * side {
            return Err(SchellingError::DegenerateConfiguration(format!(
                "counts {:?} do not tile a {}x{} board",
                counts, side, side
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool = TypePool::new(counts);
        let mut types = Vec::with_capacity(counts.total());
        while let Some(cell_type) = pool.draw(&mut rng) {
            types.push(cell_type);
        }

        Self::assemble(side, types, threshold, stopping_floor, rng)
    }

    /// Build a board with an explicit row-major layout
    pub fn from_layout(
        side: usize,
        layout: Vec<CellType>,
        threshold: f64,
        stopping_floor: usize,
        seed: u64,
    ) -> Result<Self> {
        if side == 0 || layout.len() != side * side {
            return Err(SchellingError::DegenerateConfiguration(format!(
                "layout of {} cells does not tile a {}x{} board",
                layout.len(),
                side,
                side
            )));
        }
        Self::assemble(side, layout, threshold, stopping_floor, ChaCha8Rng::seed_from_u64(seed))
    }

    fn assemble(
        side: usize,
        types: Vec<CellType>,
        threshold: f64,
        stopping_floor: usize,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SchellingError::DegenerateConfiguration(format!(
                "threshold ({}) must lie in [0, 1]",
                threshold
            )));
        }
        if stopping_floor == 0 {
            return Err(SchellingError::InvalidConfig(
                "stopping floor must be at least 1".into(),
            ));
        }

        // Cells are placed in row-major order; each new cell binds to its
        // already-built neighbors so every adjacency is recorded once per side.
        let mut cells: Vec<Cell> = Vec::with_capacity(types.len());
        for (idx, cell_type) in types.into_iter().enumerate() {
            let pos = GridPos::new(idx / side, idx % side);
            cells.push(Cell::new(cell_type, pos));
            for earlier in backward_neighbors(pos, side) {
                bind_symmetric(&mut cells, earlier.row * side + earlier.col, idx);
            }
        }

        let cells = Grid::from_vec(side, side, cells).ok_or_else(|| {
            SchellingError::DegenerateConfiguration("cell count does not match board".into())
        })?;

        let mut board = Self {
            side,
            threshold,
            stopping_floor,
            cells,
            unsatisfied: Vec::new(),
            empty: Vec::new(),
            snapshots: Vec::new(),
            rng,
        };
        board.refresh_sets();

        let counts = board.type_counts();
        tracing::info!(
            "Built {}x{} board: {} empty, {} red, {} blue, {} unsatisfied at threshold {}",
            side,
            side,
            counts.empty,
            counts.type_a,
            counts.type_b,
            board.unsatisfied.len(),
            threshold
        );

        Ok(board)
    }

    // === SET MAINTENANCE ===

    /// Recompute one cell's cached statistics from its neighbors' current types
    pub fn refresh_cell(&mut self, idx: usize) -> f64 {
        let tally = tally_neighbors(self.cells.as_slice(), idx);
        self.cells[idx].apply_tally(tally)
    }

    /// Full rescan: refresh every cell, then rebuild both pools from scratch
    pub fn refresh_sets(&mut self) {
        self.unsatisfied.clear();
        self.empty.clear();

        for idx in 0..self.cells.len() {
            let satisfaction = self.refresh_cell(idx);
            match self.cells[idx].cell_type {
                CellType::Empty => self.empty.push(idx),
                _ if satisfaction < self.threshold => self.unsatisfied.push(idx),
                _ => {}
            }
        }
    }

    /// Retype `dest` to the mover's type and vacate the mover.
    /// Cached statistics are left untouched until the next refresh.
    pub(crate) fn relocate(&mut self, mover: usize, dest: usize) {
        let mover_type = self.cells[mover].cell_type;
        self.cells[dest].cell_type = mover_type;
        self.cells[mover].cell_type = CellType::Empty;
    }

    pub(crate) fn capture_snapshot(&mut self) {
        let frame = self.color_codes();
        self.snapshots.push(frame);
    }

    // === QUERIES ===

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stopping_floor(&self) -> usize {
        self.stopping_floor
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn unsatisfied(&self) -> &[usize] {
        &self.unsatisfied
    }

    pub fn empty_cells(&self) -> &[usize] {
        &self.empty
    }

    pub fn unsatisfied_count(&self) -> usize {
        self.unsatisfied.len()
    }

    pub fn empty_count(&self) -> usize {
        self.empty.len()
    }

    pub fn is_converged(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    pub fn type_counts(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for cell in self.cells.iter() {
            match cell.cell_type {
                CellType::Empty => counts.empty += 1,
                CellType::TypeA => counts.type_a += 1,
                CellType::TypeB => counts.type_b += 1,
            }
        }
        counts
    }

    /// Frames captured after each successful step, oldest first
    pub fn snapshots(&self) -> &[ColorFrame] {
        &self.snapshots
    }

    /// Current board as color codes
    pub fn color_codes(&self) -> ColorFrame {
        self.cells.map(|cell| cell.cell_type.color_code())
    }

    /// Current cached satisfaction of every cell
    pub fn satisfaction_grid(&self) -> Grid<f64> {
        self.cells.map(|cell| cell.satisfaction)
    }

    /// Mean cached satisfaction over occupied cells; None if nobody lives here
    pub fn average_satisfaction(&self) -> Option<f64> {
        let (sum, count) = self
            .cells
            .iter()
            .filter(|cell| cell.is_occupied())
            .fold((0.0, 0usize), |(sum, count), cell| (sum + cell.satisfaction, count + 1));

        (count > 0).then(|| sum / count as f64)
    }
}

/// Count occupied neighbor types of `cells[idx]`
fn tally_neighbors(cells: &[Cell], idx: usize) -> NeighborTally {
    let mut tally = NeighborTally::default();
    for &n in &cells[idx].neighbors {
        tally.add(cells[n].cell_type);
    }
    tally
}

/// Make two cells neighbors and refresh both
fn bind_symmetric(cells: &mut [Cell], a: usize, b: usize) {
    cells[a].link(b);
    cells[b].link(a);
    for idx in [a, b] {
        let tally = tally_neighbors(cells, idx);
        cells[idx].apply_tally(tally);
    }
}
