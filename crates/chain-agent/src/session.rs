//! State that survives between ticks.

use chain_core::{Coord, Grid, Pace, PaceTable};

use crate::command::OperatorCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Uninitialized,
    /// First tick: seed lists and pace are being set up.
    Initializing,
    /// The unit is off the board and heading back in.
    DisplacedRecovery,
    SteadyState,
}

#[derive(Debug, Clone)]
pub struct SessionMemory {
    pub phase: Phase,
    pub pace: Pace,
    /// `frames_left` seen on the previous tick.
    pub last_frames_left: u32,
    /// `frames_left` right after the most recent bank; the current cycle length.
    pub cycle_frames: u32,
    pub bank_count: u32,
    pub core_seeds: Vec<Coord>,
    /// Rebuilt every steady-state tick.
    pub border_seeds: Vec<Coord>,
    /// Ticks left before the engagement gate forces a re-selection. May reach -1.
    pub commit_budget: i32,
    pub paused: bool,
    pub verbosity: u8,
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            pace: Pace::Mini,
            last_frames_left: 0,
            cycle_frames: 0,
            bank_count: 0,
            core_seeds: Vec::new(),
            border_seeds: Vec::new(),
            commit_budget: 0,
            paused: false,
            verbosity: 0,
        }
    }
}

impl SessionMemory {
    pub fn is_initialized(&self) -> bool {
        self.phase != Phase::Uninitialized
    }

    /// First-tick setup. `ceiling_for` maps the initial pace to its commit ceiling.
    pub fn initialize(
        &mut self,
        grid: &Grid,
        frames_left: u32,
        table: &PaceTable,
        ceiling_for: impl FnOnce(Pace) -> i32,
    ) {
        self.phase = Phase::Initializing;
        self.core_seeds = grid.core_seeds();
        self.cycle_frames = frames_left;
        self.pace = table.classify(frames_left);
        self.commit_budget = ceiling_for(self.pace);
        tracing::debug!(
            frames_left,
            pace = ?self.pace,
            core_seeds = self.core_seeds.len(),
            "session initialized"
        );
    }

    /// Record this tick's `frames_left`. Returns true when a bank happened since the last tick.
    ///
    /// The pace is re-derived from the cycle length every tick.
    pub fn observe_frames(&mut self, frames_left: u32, table: &PaceTable) -> bool {
        let banked = self.last_frames_left < frames_left;
        if banked {
            self.cycle_frames = frames_left;
            self.bank_count += 1;
        }
        self.last_frames_left = frames_left;
        self.pace = table.classify(self.cycle_frames);
        banked
    }

    pub fn apply(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::Pause => self.paused = true,
            OperatorCommand::Verbosity(level) => {
                self.verbosity = level;
                self.paused = false;
            }
            OperatorCommand::Resume => self.paused = false,
        }
    }
}
