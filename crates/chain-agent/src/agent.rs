//! Tick orchestrator.

use chain_core::{
    analyze, annotate, derive_seed, Coord, Grid, PaceConfig, PlayerState, SplitMix64, TeamId,
};
use serde::{Deserialize, Serialize};

use crate::boost::BoostPolicy;
use crate::command::OperatorCommand;
use crate::config::AgentConfig;
use crate::engagement::{EngagementController, Gate, ReselectReason};
use crate::select::{pick_core_seed, random_claimable, Selection, TargetSelector, TargetSource};
use crate::session::{Phase, SessionMemory};
use crate::trace::{TraceEvent, TraceGroup, TraceLog, TraceSink, Tracer};

const RNG_STREAM_TARGETS: u64 = 1;

/// Everything the host delivers for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub player: PlayerState,
    #[serde(default)]
    pub players: Vec<PlayerState>,
    pub grid: Grid,
    #[serde(default)]
    pub message: Option<String>,
    pub frames_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickOutput {
    pub col: usize,
    pub row: usize,
    pub boost: u8,
}

impl TickOutput {
    pub fn at(target: Coord, boost: u8) -> Self {
        Self {
            col: target.col,
            row: target.row,
            boost,
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPath {
    Recovery,
    Paused,
    Hold,
    Reselect,
}

/// Summary of the most recent tick, for tooling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub tick: u64,
    pub path: TickPath,
    pub target: Coord,
    pub boost: u8,
    pub reselect: Option<ReselectReason>,
    pub source: Option<TargetSource>,
}

/// One agent instance per controlled unit. Owns its session memory exclusively.
#[derive(Debug)]
pub struct ChainAgent {
    config: AgentConfig,
    boost: BoostPolicy,
    session: SessionMemory,
    rng: SplitMix64,
    tracer: Tracer,
    ticks: u64,
    last: Option<Decision>,
}

impl ChainAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            boost: BoostPolicy::from_config(&config),
            rng: SplitMix64::new(config.seed),
            config,
            session: SessionMemory::default(),
            tracer: Tracer::default(),
            ticks: 0,
            last: None,
        }
    }

    /// Record trace events in memory (see [`ChainAgent::trace`]).
    pub fn with_trace_log(mut self) -> Self {
        self.tracer.record();
        self
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.tracer.set_sink(sink);
        self
    }

    /// Start at an operator verbosity level instead of 0.
    pub fn with_verbosity(mut self, level: u8) -> Self {
        self.session.verbosity = level;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionMemory {
        &self.session
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last.as_ref()
    }

    pub fn trace(&self) -> Option<&TraceLog> {
        self.tracer.log()
    }

    pub fn take_trace(&mut self) -> Option<TraceLog> {
        self.tracer.take_log()
    }

    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        self.ticks += 1;
        let grid = &input.grid;
        let me = &input.player;

        if !self.session.is_initialized() {
            self.initialize(me.team, grid, input.frames_left);
        }
        if self.session.observe_frames(input.frames_left, &self.config.pace) {
            tracing::info!(
                bank = self.session.bank_count,
                frames_left = input.frames_left,
                pace = ?self.session.pace,
                "bank detected"
            );
            self.emit(
                TraceEvent::new(self.ticks, TraceGroup::Bank, "bank")
                    .with_a(u64::from(self.session.bank_count))
                    .with_b(u64::from(input.frames_left)),
            );
        }
        if let Some(message) = input.message.as_deref() {
            let command = OperatorCommand::parse(message);
            let was_paused = self.session.paused;
            self.session.apply(command);
            match (was_paused, self.session.paused) {
                (false, true) => tracing::info!("paused by operator"),
                (true, false) => tracing::info!(?command, "resumed by operator"),
                _ => tracing::debug!(?command, "operator message"),
            }
        }

        let pace = *self.config.pace.config(self.session.pace);
        let engagement = EngagementController::new(&pace, self.config.default_commit_ceiling);

        let Some(current) = me.position(grid) else {
            return self.recover(me, grid, &engagement);
        };

        let mut work = analyze(grid, me.team);
        annotate(&mut work, &pace);
        self.session.border_seeds = grid.border_cells();
        if TraceGroup::Grid.enabled_at(self.session.verbosity) {
            tracing::debug!(dump = %work.render(), "working grid");
            for row in 0..grid.rows() {
                let claimable = (0..grid.cols())
                    .filter_map(|col| grid.get(Coord::new(row, col)))
                    .filter(|cell| cell.kind.is_shape())
                    .count();
                self.emit(
                    TraceEvent::new(self.ticks, TraceGroup::Grid, "grid.row")
                        .with_a(row as u64)
                        .with_b(claimable as u64),
                );
            }
        }
        self.session.phase = Phase::SteadyState;

        if self.session.paused {
            let output = TickOutput::at(current, me.boost);
            self.emit(TraceEvent::new(self.ticks, TraceGroup::Engagement, "tick.paused"));
            self.record(TickPath::Paused, output, None, None);
            return output;
        }

        let gate = engagement.gate(
            &work,
            current,
            me,
            &input.players,
            &mut self.session.commit_budget,
        );
        let (path, target, reselect, source) = match gate {
            Gate::Hold => {
                self.emit(
                    TraceEvent::new(self.ticks, TraceGroup::Engagement, "engage.hold")
                        .with_a(self.session.commit_budget.max(0) as u64),
                );
                (TickPath::Hold, current, None, None)
            }
            Gate::Reselect(reason) => {
                tracing::debug!(?reason, budget = self.session.commit_budget, "re-selecting");
                self.emit(
                    TraceEvent::new(self.ticks, TraceGroup::Engagement, "engage.reselect")
                        .with_a(reason.code()),
                );
                let stage = self.cycle_stage(&pace, input.frames_left);
                let selector = TargetSelector::new(
                    &work,
                    current,
                    stage,
                    &self.session.core_seeds,
                    &self.session.border_seeds,
                );
                let selection = selector.select(&mut self.rng).unwrap_or_else(|| Selection {
                    target: random_claimable(grid, &mut self.rng).target,
                    source: TargetSource::Random,
                });
                engagement.refill(&mut self.session.commit_budget);
                (
                    TickPath::Reselect,
                    selection.target,
                    Some(reason),
                    Some(selection.source),
                )
            }
        };
        if let Some(source) = source {
            self.emit(
                TraceEvent::new(self.ticks, TraceGroup::Selection, source.tag())
                    .with_a(target.row as u64)
                    .with_b(target.col as u64),
            );
        }

        let tile = work.cell(target).zip(work.work(target));
        let boost = self.boost.choose(me, tile, &input.players);
        self.emit(
            TraceEvent::new(self.ticks, TraceGroup::Engagement, "boost")
                .with_a(u64::from(boost))
                .with_b(u64::from(me.boost_used)),
        );
        let output = TickOutput::at(target, boost);
        self.record(path, output, reselect, source);
        output
    }

    fn initialize(&mut self, team: TeamId, grid: &Grid, frames_left: u32) {
        let default_ceiling = self.config.default_commit_ceiling;
        let table = &self.config.pace;
        self.session.initialize(grid, frames_left, table, |pace| {
            table.config(pace).commit_ceiling_or(default_ceiling)
        });
        self.rng = SplitMix64::new(derive_seed(
            self.config.seed,
            team.stable_id(),
            RNG_STREAM_TARGETS,
        ));
        tracing::info!(%team, frames_left, pace = ?self.session.pace, "agent initialized");
    }

    /// Off-board: head for a core seed, else a random claimable cell. Never boosts.
    fn recover(
        &mut self,
        me: &PlayerState,
        grid: &Grid,
        engagement: &EngagementController,
    ) -> TickOutput {
        self.session.phase = Phase::DisplacedRecovery;
        engagement.refill(&mut self.session.commit_budget);

        let (target, source) =
            match pick_core_seed(grid, me.team, &self.session.core_seeds, &mut self.rng) {
                Some(seed) => (seed, TargetSource::CoreSeed),
                None => (random_claimable(grid, &mut self.rng).target, TargetSource::Random),
            };
        tracing::debug!(?source, row = target.row, col = target.col, "displaced, re-entering");
        self.emit(
            TraceEvent::new(self.ticks, TraceGroup::Selection, "tick.displaced")
                .with_a(target.row as u64)
                .with_b(target.col as u64),
        );

        let output = TickOutput::at(target, 0);
        self.record(TickPath::Recovery, output, None, Some(source));
        output
    }

    /// Early/late split of the bank cycle, used to pick the best-chain lattice.
    fn cycle_stage(&self, pace: &PaceConfig, frames_left: u32) -> chain_core::EngagementStage {
        pace.stage(self.session.cycle_frames as usize, frames_left as usize)
    }

    fn emit(&mut self, event: TraceEvent) {
        self.tracer.emit(self.session.verbosity, event);
    }

    fn record(
        &mut self,
        path: TickPath,
        output: TickOutput,
        reselect: Option<ReselectReason>,
        source: Option<TargetSource>,
    ) {
        self.last = Some(Decision {
            tick: self.ticks,
            path,
            target: output.coord(),
            boost: output.boost,
            reselect,
            source,
        });
    }
}
