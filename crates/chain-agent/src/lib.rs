//! Per-tick decision policy for a single chain-claiming unit.
//!
//! [`ChainAgent::tick`] is the whole contract: feed it one host snapshot, get back the cell to
//! move toward and the boost tier to use. Inside a tick the agent analyzes the grid, lets the
//! [`EngagementController`] decide whether to keep the current cell, and otherwise walks the
//! [`TargetSelector`] fallback cascade. Only the small [`SessionMemory`] survives between ticks.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod boost;
pub mod command;
pub mod config;
pub mod engagement;
pub mod select;
pub mod session;
pub mod trace;

pub use agent::{ChainAgent, Decision, TickInput, TickOutput, TickPath};
pub use boost::BoostPolicy;
pub use command::OperatorCommand;
pub use config::{AgentConfig, ConfigError};
pub use engagement::{EngagementController, Gate, ReselectReason};
pub use select::{
    pick_border_seed, pick_core_seed, random_claimable, Lattice, RandomPick, Selection,
    TargetSelector, TargetSource,
};
pub use session::{Phase, SessionMemory};
pub use trace::{NullTraceSink, TraceEvent, TraceGroup, TraceLog, TraceSink, Tracer, VecTraceSink};
