//! Re-selection fallback cascade.
//!
//! Tiers run in a fixed order and the first one that yields a cell wins:
//! chain-follow, best chain on the sample lattice, border seeds, core seeds, same-kind neighbour.
//! When all five come up empty the caller falls back to [`random_claimable`], which is bounded by
//! the grid size so an all-empty board still terminates.

use chain_core::{Coord, DeterministicRng, EngagementStage, Grid, TeamId, WorkingGrid};

/// Chain-follow is skipped once this many rivals sit on one member cell.
const MAX_CHAIN_RIVALS: usize = 3;
/// Chain-follow needs a chain longer than this.
const MIN_FOLLOW_LEN: usize = 2;
/// Highest local-connection tier worth scanning.
const MAX_CONNECTION_TIER: usize = 8;

const DENSE_ROWS: [usize; 13] = [13, 11, 9, 7, 5, 1, 14, 12, 10, 8, 6, 4, 2];
const DENSE_COLS: [usize; 17] = [17, 15, 13, 11, 9, 7, 5, 1, 18, 16, 14, 12, 10, 8, 6, 4, 2];
const SPARSE_ROWS: [usize; 12] = [13, 11, 9, 7, 5, 3, 12, 10, 8, 6, 4, 2];
const SPARSE_COLS: [usize; 16] = [17, 15, 13, 11, 9, 7, 5, 3, 16, 14, 12, 10, 8, 6, 4, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSource {
    ChainFollow,
    BestChain,
    BorderSeed,
    CoreSeed,
    SameKindNeighbor,
    Random,
}

impl TargetSource {
    pub fn tag(self) -> &'static str {
        match self {
            TargetSource::ChainFollow => "select.chain_follow",
            TargetSource::BestChain => "select.best_chain",
            TargetSource::BorderSeed => "select.border_seed",
            TargetSource::CoreSeed => "select.core_seed",
            TargetSource::SameKindNeighbor => "select.same_kind_neighbor",
            TargetSource::Random => "select.random",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub target: Coord,
    pub source: TargetSource,
}

/// Hand-ordered sample coordinates for the best-chain scan, plus the length that ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    pub rows: &'static [usize],
    pub cols: &'static [usize],
    /// A chain strictly longer than this ends the scan.
    pub satisfied_above: usize,
}

impl Lattice {
    pub fn for_stage(stage: EngagementStage) -> Self {
        match stage {
            EngagementStage::Early => Self {
                rows: &DENSE_ROWS,
                cols: &DENSE_COLS,
                satisfied_above: 2,
            },
            EngagementStage::Late => Self {
                rows: &SPARSE_ROWS,
                cols: &SPARSE_COLS,
                satisfied_above: 3,
            },
        }
    }

    /// Sample points, rows outer.
    pub fn points(&self) -> impl Iterator<Item = Coord> + '_ {
        self.rows
            .iter()
            .flat_map(move |&row| self.cols.iter().map(move |&col| Coord::new(row, col)))
    }
}

/// One tick's view for the cascade.
#[derive(Debug, Clone, Copy)]
pub struct TargetSelector<'a, 'g> {
    work: &'a WorkingGrid<'g>,
    current: Coord,
    stage: EngagementStage,
    core_seeds: &'a [Coord],
    border_seeds: &'a [Coord],
}

impl<'a, 'g> TargetSelector<'a, 'g> {
    pub fn new(
        work: &'a WorkingGrid<'g>,
        current: Coord,
        stage: EngagementStage,
        core_seeds: &'a [Coord],
        border_seeds: &'a [Coord],
    ) -> Self {
        Self {
            work,
            current,
            stage,
            core_seeds,
            border_seeds,
        }
    }

    /// Run tiers one to five. `None` means the caller should pick at random.
    pub fn select(&self, rng: &mut impl DeterministicRng) -> Option<Selection> {
        let found = self
            .chain_follow()
            .map(|target| (target, TargetSource::ChainFollow))
            .or_else(|| self.best_chain().map(|t| (t, TargetSource::BestChain)))
            .or_else(|| self.border_seed(rng).map(|t| (t, TargetSource::BorderSeed)))
            .or_else(|| self.core_seed(rng).map(|t| (t, TargetSource::CoreSeed)))
            .or_else(|| {
                self.same_kind_neighbor()
                    .map(|t| (t, TargetSource::SameKindNeighbor))
            });
        match found {
            Some((target, source)) => {
                tracing::debug!(?source, row = target.row, col = target.col, "target selected");
                Some(Selection { target, source })
            }
            None => {
                tracing::debug!("fallback cascade exhausted");
                None
            }
        }
    }

    /// Move along the current chain, preferring members with many same-kind neighbours.
    ///
    /// Members are scanned newest-discovered first within each connection tier. Reaching a member
    /// with rivals on it aborts chain-follow for this tick.
    pub fn chain_follow(&self) -> Option<Coord> {
        let chain = self.work.chain_of(self.current)?;
        if chain.len() <= MIN_FOLLOW_LEN || chain.max_occupants >= MAX_CHAIN_RIVALS {
            return None;
        }
        let team = self.work.team();
        let top = chain.len().min(MAX_CONNECTION_TIER);
        for tier in (1..=top).rev() {
            for &member in chain.members.iter().rev() {
                let (Some(cell), Some(annotated)) = (self.work.cell(member), self.work.work(member))
                else {
                    continue;
                };
                if usize::from(annotated.connections()) != tier || cell.owner.is(team) {
                    continue;
                }
                if annotated.occupant_count() > 0 {
                    tracing::trace!(row = member.row, col = member.col, "chain-follow blocked");
                    return None;
                }
                if member == self.current {
                    continue;
                }
                return Some(member);
            }
        }
        None
    }

    /// First lattice point whose chain is long enough, has an unclaimed cell, and is not
    /// majority-owned by rivals.
    pub fn best_chain(&self) -> Option<Coord> {
        let lattice = Lattice::for_stage(self.stage);
        let best = lattice.points().find(|&point| {
            self.work.work(point).is_some_and(|annotated| {
                annotated.chain_length() > lattice.satisfied_above
                    && annotated.unclaimed_in_chain > 0
                    && annotated.owned_by_me_in_chain >= annotated.owned_by_other_in_chain
            })
        });
        best
    }

    pub fn border_seed(&self, rng: &mut impl DeterministicRng) -> Option<Coord> {
        pick_border_seed(self.work.grid(), self.work.team(), self.border_seeds, rng)
    }

    pub fn core_seed(&self, rng: &mut impl DeterministicRng) -> Option<Coord> {
        pick_core_seed(self.work.grid(), self.work.team(), self.core_seeds, rng)
    }

    /// First same-kind neighbour of the current cell that `team` does not own yet.
    pub fn same_kind_neighbor(&self) -> Option<Coord> {
        let kind = self.work.cell(self.current)?.kind;
        if !kind.is_shape() {
            return None;
        }
        let team = self.work.team();
        let grid = self.work.grid();
        grid.neighbors(self.current).find(|&n| {
            grid.get(n)
                .is_some_and(|cell| cell.kind == kind && !cell.owner.is(team))
        })
    }
}

/// Border seed with a shrinking window: attempt `k` draws from the first `len - k` entries.
pub fn pick_border_seed(
    grid: &Grid,
    team: TeamId,
    seeds: &[Coord],
    rng: &mut impl DeterministicRng,
) -> Option<Coord> {
    (0..seeds.len()).find_map(|attempt| {
        let candidate = *rng.pick(&seeds[..seeds.len() - attempt])?;
        accepts_seed(grid, team, candidate).then_some(candidate)
    })
}

/// Core seed: `len` uniform draws over the whole list.
pub fn pick_core_seed(
    grid: &Grid,
    team: TeamId,
    seeds: &[Coord],
    rng: &mut impl DeterministicRng,
) -> Option<Coord> {
    (0..seeds.len()).find_map(|_| {
        let candidate = *rng.pick(seeds)?;
        accepts_seed(grid, team, candidate).then_some(candidate)
    })
}

fn accepts_seed(grid: &Grid, team: TeamId, candidate: Coord) -> bool {
    grid.get(candidate)
        .is_some_and(|cell| cell.is_open_seed_for(team))
}

/// Result of the last-resort random placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomPick {
    pub target: Coord,
    pub attempts: usize,
    /// False when every attempt hit an empty cell and `target` is just the last draw.
    pub claimable: bool,
}

/// Uniform random cell, retried up to `rows * cols` times until a non-empty one comes up.
pub fn random_claimable(grid: &Grid, rng: &mut impl DeterministicRng) -> RandomPick {
    let budget = grid.len().max(1);
    let mut target = Coord::new(0, 0);
    for attempt in 1..=budget {
        target = Coord::new(rng.below(grid.rows()), rng.below(grid.cols()));
        if grid.get(target).is_some_and(|cell| cell.kind.is_shape()) {
            return RandomPick {
                target,
                attempts: attempt,
                claimable: true,
            };
        }
    }
    tracing::warn!(attempts = budget, "no claimable cell found, using last random pick");
    RandomPick {
        target,
        attempts: budget,
        claimable: false,
    }
}
