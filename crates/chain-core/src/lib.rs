//! Grid model and same-kind connectivity analysis for territory-control agents.
//!
//! The host hands over a read-only [`Grid`] snapshot every tick. [`analyze`] partitions it into
//! 8-connected chains of like-kind cells and [`annotate`] layers occupancy and stage metrics on
//! top, producing a [`WorkingGrid`] that lives for exactly one tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cell;
pub mod chains;
pub mod grid;
pub mod metrics;
pub mod pace;
pub mod player;
pub mod rng;
pub mod team;
pub mod working;

pub use cell::{Cell, Coord, Owner, ProgressOwner, TileKind};
pub use chains::analyze;
pub use grid::{Grid, SnapshotError, GRID_COLS, GRID_ROWS, NEIGHBOR_OFFSETS};
pub use metrics::annotate;
pub use pace::{EngagementStage, Pace, PaceConfig, PaceTable, CELL_STAGE_CEILING};
pub use player::{lookup_player, PlayerState, OFF_GRID};
pub use rng::{derive_seed, DeterministicRng, SplitMix64};
pub use team::TeamId;
pub use working::{Chain, ChainId, Ownership, WorkingCell, WorkingGrid};
