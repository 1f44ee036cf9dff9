//! Per-tick annotated copy of the snapshot.

use core::fmt::Write as _;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Cell, Coord, EngagementStage, Grid, Owner, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ChainId(pub u32);

/// Ownership of a single cell from the analysing team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Ownership {
    #[default]
    Unclaimed,
    Mine,
    Other,
}

impl Ownership {
    pub fn of(owner: Owner, team: TeamId) -> Self {
        match owner {
            Owner::Unowned => Ownership::Unclaimed,
            Owner::Team(t) if t == team => Ownership::Mine,
            Owner::Team(_) => Ownership::Other,
        }
    }
}

/// Derived analysis fields for one cell, parallel to the snapshot by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingCell {
    pub chain: Option<ChainId>,
    /// `None` until the analyzer reaches the cell; `Some(0)` for empty cells.
    pub chain_len: Option<usize>,
    /// Same-kind neighbours, filled the first time the traversal pops the cell.
    pub local_connections: Option<u8>,
    pub unclaimed_in_chain: usize,
    pub owned_by_me_in_chain: usize,
    pub owned_by_other_in_chain: usize,
    /// Occupying teams other than the analysing team.
    pub occupant_teams: Vec<TeamId>,
    pub ownership: Ownership,
    pub stage: Option<EngagementStage>,
}

impl WorkingCell {
    pub fn chain_length(&self) -> usize {
        self.chain_len.unwrap_or(0)
    }

    pub fn connections(&self) -> u8 {
        self.local_connections.unwrap_or(0)
    }

    pub fn occupant_count(&self) -> usize {
        self.occupant_teams.len()
    }
}

/// Maximal 8-connected set of same-kind cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: ChainId,
    pub kind: u8,
    /// Members in traversal discovery order; the first one is the root.
    pub members: Vec<Coord>,
    pub unclaimed: usize,
    pub owned_by_me: usize,
    pub owned_by_other: usize,
    /// Largest rival occupant count on any member cell.
    pub max_occupants: usize,
    pub stage: Option<EngagementStage>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn root(&self) -> Option<Coord> {
        self.members.first().copied()
    }
}

/// Snapshot plus one tick's derived annotations. Built fresh every tick, never persisted.
#[derive(Debug, Clone)]
pub struct WorkingGrid<'g> {
    grid: &'g Grid,
    team: TeamId,
    pub(crate) cells: Vec<WorkingCell>,
    pub(crate) chains: Vec<Chain>,
}

impl<'g> WorkingGrid<'g> {
    /// Wrap a snapshot with every cell marked unprocessed.
    pub fn new(grid: &'g Grid, team: TeamId) -> Self {
        Self {
            grid,
            team,
            cells: vec![WorkingCell::default(); grid.len()],
            chains: Vec::new(),
        }
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn cell(&self, coord: Coord) -> Option<&'g Cell> {
        self.grid.get(coord)
    }

    pub fn work(&self, coord: Coord) -> Option<&WorkingCell> {
        self.grid.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id.0 as usize)
    }

    pub fn chain_of(&self, coord: Coord) -> Option<&Chain> {
        self.work(coord)?.chain.and_then(|id| self.chain(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'g Cell, &WorkingCell)> + '_ {
        self.grid.cells().iter().zip(self.cells.iter())
    }

    /// Text dump, one line per row: `kind:owner:chain_len` per cell (`-1` for empty kinds).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..self.grid.rows() {
            let _ = write!(out, "Row{row:<3}");
            for col in 0..self.grid.cols() {
                let coord = Coord::new(row, col);
                let (Some(cell), Some(work)) = (self.cell(coord), self.work(coord)) else {
                    continue;
                };
                let _ = write!(
                    out,
                    " {}:{}:{}",
                    cell.kind.raw(),
                    u32::from(cell.owner),
                    work.chain_length()
                );
            }
            out.push('\n');
        }
        out
    }
}
