#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Coord, Grid, TeamId};

/// Row/column value the host reports while a unit is knocked off the board.
pub const OFF_GRID: i64 = -1;

/// Host-owned unit state, as delivered in the per-tick roster.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerState {
    pub team: TeamId,
    pub row: i64,
    pub col: i64,
    /// Current intensity tier (0-3).
    #[cfg_attr(feature = "serde", serde(default))]
    pub boost: u8,
    /// Cumulative intensity spend; never decreases.
    #[cfg_attr(feature = "serde", serde(default))]
    pub boost_used: u32,
}

impl PlayerState {
    pub fn at(team: TeamId, coord: Coord) -> Self {
        Self {
            team,
            row: coord.row as i64,
            col: coord.col as i64,
            boost: 0,
            boost_used: 0,
        }
    }

    pub fn off_grid(team: TeamId) -> Self {
        Self {
            team,
            row: OFF_GRID,
            col: OFF_GRID,
            boost: 0,
            boost_used: 0,
        }
    }

    pub fn with_boost_used(mut self, boost_used: u32) -> Self {
        self.boost_used = boost_used;
        self
    }

    pub fn with_boost(mut self, boost: u8) -> Self {
        self.boost = boost;
        self
    }

    /// The unit's cell, or `None` while it is off the board.
    pub fn position(&self, grid: &Grid) -> Option<Coord> {
        grid.locate(self.row, self.col)
    }
}

/// Find `team` in the roster, falling back to the first entry when it is missing.
pub fn lookup_player(roster: &[PlayerState], team: TeamId) -> Option<&PlayerState> {
    if let Some(found) = roster.iter().find(|p| p.team == team) {
        return Some(found);
    }
    let fallback = roster.first();
    if fallback.is_some() {
        tracing::warn!(%team, "team missing from roster, using first entry");
    }
    fallback
}
