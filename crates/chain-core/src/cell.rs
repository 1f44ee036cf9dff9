#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::TeamId;

/// Region type of a cell. The host encodes empty cells as `-1` and shapes as `0..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "i8", into = "i8")
)]
pub enum TileKind {
    Empty,
    Shape(u8),
}

impl TileKind {
    pub fn is_shape(self) -> bool {
        matches!(self, TileKind::Shape(_))
    }

    pub fn shape(self) -> Option<u8> {
        match self {
            TileKind::Empty => None,
            TileKind::Shape(kind) => Some(kind),
        }
    }

    pub fn raw(self) -> i8 {
        match self {
            TileKind::Empty => -1,
            TileKind::Shape(kind) => kind as i8,
        }
    }
}

impl From<i8> for TileKind {
    fn from(raw: i8) -> Self {
        if raw < 0 {
            TileKind::Empty
        } else {
            TileKind::Shape(raw as u8)
        }
    }
}

impl From<TileKind> for i8 {
    fn from(kind: TileKind) -> Self {
        kind.raw()
    }
}

/// Who holds a cell. Wire value 0 is [`Owner::Unowned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "u32", into = "u32")
)]
pub enum Owner {
    #[default]
    Unowned,
    Team(TeamId),
}

impl Owner {
    pub fn is(self, team: TeamId) -> bool {
        self == Owner::Team(team)
    }

    pub fn team(self) -> Option<TeamId> {
        match self {
            Owner::Unowned => None,
            Owner::Team(team) => Some(team),
        }
    }
}

impl From<u32> for Owner {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Owner::Unowned,
            id => Owner::Team(TeamId(id)),
        }
    }
}

impl From<Owner> for u32 {
    fn from(owner: Owner) -> Self {
        owner.team().map(|t| t.0).unwrap_or(0)
    }
}

/// Whose action is currently advancing a cell's progress.
///
/// Wire value 0 is [`ProgressOwner::Stalemate`]: either nobody is working the cell or several
/// teams cancel each other out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "u32", into = "u32")
)]
pub enum ProgressOwner {
    #[default]
    Stalemate,
    Team(TeamId),
}

impl ProgressOwner {
    pub fn is(self, team: TeamId) -> bool {
        self == ProgressOwner::Team(team)
    }
}

impl From<u32> for ProgressOwner {
    fn from(raw: u32) -> Self {
        match raw {
            0 => ProgressOwner::Stalemate,
            id => ProgressOwner::Team(TeamId(id)),
        }
    }
}

impl From<ProgressOwner> for u32 {
    fn from(owner: ProgressOwner) -> Self {
        match owner {
            ProgressOwner::Stalemate => 0,
            ProgressOwner::Team(team) => team.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One authoritative cell of the host snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub id: u32,
    pub kind: TileKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub owner: Owner,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fortified: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progress: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progress_goal: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progress_owner: ProgressOwner,
    /// Teams with a unit standing on this cell.
    #[cfg_attr(feature = "serde", serde(default))]
    pub occupants: Vec<TeamId>,
}

impl Cell {
    pub fn new(coord: Coord, id: u32, kind: TileKind) -> Self {
        Self {
            row: coord.row,
            col: coord.col,
            id,
            kind,
            owner: Owner::Unowned,
            fortified: false,
            progress: 0.0,
            progress_goal: 0,
            progress_owner: ProgressOwner::Stalemate,
            occupants: Vec::new(),
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// Progress has not reached its goal yet. Always false for idle cells (goal 0).
    pub fn progress_pending(&self) -> bool {
        self.progress < self.progress_goal as f32
    }

    /// No claim/fortify/attack operation is running on the cell.
    pub fn is_idle(&self) -> bool {
        self.progress_goal == 0
    }

    /// Occupying teams other than `team`, in host order.
    pub fn rival_occupants(&self, team: TeamId) -> impl Iterator<Item = TeamId> + '_ {
        self.occupants.iter().copied().filter(move |t| *t != team)
    }

    /// Seed acceptance: a non-empty cell not held by `team` and free of rival units.
    pub fn is_open_seed_for(&self, team: TeamId) -> bool {
        self.kind.is_shape() && !self.owner.is(team) && self.rival_occupants(team).next().is_none()
    }
}
