//! Relocation policies
//!
//! Every policy is one point in a 3-axis space:
//! - [`Granularity`]: one move per step, or a drain of the whole unsatisfied
//!   pool (optionally recycling vacated cells as destinations)
//! - [`Search`]: random vacancy, or nearest vacancy by Euclidean distance
//! - [`Acceptance`]: take any vacancy, or only one that satisfies the mover,
//!   with a stop or continue fallback
//!
//! The 18 combinations share a single algorithm in [`step`] and
//! [`selection`]; identifiers like `"batchClosestSatisfyStop"` parse into a
//! [`RelocationPolicy`].

pub mod selection;
pub mod step;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::SchellingError;

pub use selection::Relocation;
pub use step::{apply, StepOutcome};

/// How many moves one external step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Exactly one relocation
    Single,
    /// Drain the unsatisfied pool; vacated cells are not reused within the drain
    Batch,
    /// Drain the unsatisfied pool; vacated cells become destinations immediately
    WhiteBatch,
}

/// How a destination is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Search {
    Random,
    Closest,
}

/// Which destinations are acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Acceptance {
    /// Whatever the search yields
    Any,
    /// Must satisfy the mover; otherwise try an opposite-type mover, then fail
    SatisfyStop,
    /// Prefer a satisfying destination; otherwise take the unconditional one
    SatisfyContinue,
}

impl Granularity {
    const ALL: [Granularity; 3] = [Granularity::Single, Granularity::WhiteBatch, Granularity::Batch];

    fn prefix(&self) -> &'static str {
        match self {
            Granularity::Single => "single",
            Granularity::Batch => "batch",
            Granularity::WhiteBatch => "whitebatch",
        }
    }
}

impl Search {
    const ALL: [Search; 2] = [Search::Random, Search::Closest];

    fn label(&self) -> &'static str {
        match self {
            Search::Random => "Random",
            Search::Closest => "Closest",
        }
    }
}

impl Acceptance {
    const ALL: [Acceptance; 3] = [
        Acceptance::Any,
        Acceptance::SatisfyStop,
        Acceptance::SatisfyContinue,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            Acceptance::Any => "",
            Acceptance::SatisfyStop => "SatisfyStop",
            Acceptance::SatisfyContinue => "SatisfyContinue",
        }
    }
}

/// A fully specified relocation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelocationPolicy {
    pub granularity: Granularity,
    pub search: Search,
    pub acceptance: Acceptance,
}

impl RelocationPolicy {
    pub const fn new(granularity: Granularity, search: Search, acceptance: Acceptance) -> Self {
        Self {
            granularity,
            search,
            acceptance,
        }
    }

    /// All 18 policies
    pub fn all() -> impl Iterator<Item = RelocationPolicy> {
        Granularity::ALL.into_iter().flat_map(|granularity| {
            Search::ALL.into_iter().flat_map(move |search| {
                Acceptance::ALL
                    .into_iter()
                    .map(move |acceptance| RelocationPolicy::new(granularity, search, acceptance))
            })
        })
    }

    /// Identifier such as `"whitebatchClosestSatisfyContinue"`
    pub fn name(&self) -> String {
        format!(
            "{}{}{}",
            self.granularity.prefix(),
            self.search.label(),
            self.acceptance.suffix()
        )
    }

    /// Closest-search policies honor the board's stopping floor
    pub fn uses_stopping_floor(&self) -> bool {
        self.search == Search::Closest
    }

    pub fn is_drain(&self) -> bool {
        self.granularity != Granularity::Single
    }
}

impl fmt::Display for RelocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for RelocationPolicy {
    type Err = SchellingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelocationPolicy::all()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| SchellingError::InvalidPolicy(s.to_string()))
    }
}
