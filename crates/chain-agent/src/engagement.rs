//! Commit-or-reselect gate evaluated at the start of every steady-state tick.

use chain_core::{lookup_player, Coord, PaceConfig, PlayerState, ProgressOwner, WorkingGrid};

/// Why the gate released the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReselectReason {
    /// The commit budget went negative.
    BudgetExhausted,
    /// Own idle cell below the fortify threshold; not worth holding.
    WeaklyConnected,
    /// Own idle cell that is well connected and already fortified.
    AlreadyFortified,
    /// Another chain member has rival units on it.
    ChainContested,
    /// Progress on the cell reached its goal.
    ProgressComplete,
    /// A rival team holds progress priority on the cell.
    LostPriority,
    /// More than one rival is on the cell.
    Crowded,
    /// Already spent more boost than the competitor on the cell.
    OutSpent,
    /// The current cell is missing from the analysis.
    Unanalyzed,
}

impl ReselectReason {
    /// Stable numeric code for trace events.
    pub fn code(self) -> u64 {
        match self {
            ReselectReason::BudgetExhausted => 1,
            ReselectReason::WeaklyConnected => 2,
            ReselectReason::AlreadyFortified => 3,
            ReselectReason::ChainContested => 4,
            ReselectReason::ProgressComplete => 5,
            ReselectReason::LostPriority => 6,
            ReselectReason::Crowded => 7,
            ReselectReason::OutSpent => 8,
            ReselectReason::Unanalyzed => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Hold,
    Reselect(ReselectReason),
}

/// Pace-specific gate parameters, resolved once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementController {
    fortify_threshold: u8,
    ceiling: i32,
}

impl EngagementController {
    pub fn new(pace: &PaceConfig, default_ceiling: i32) -> Self {
        Self {
            fortify_threshold: pace.fortify_threshold,
            ceiling: pace.commit_ceiling_or(default_ceiling),
        }
    }

    pub fn fortify_threshold(&self) -> u8 {
        self.fortify_threshold
    }

    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }

    /// Reset `budget` to the ceiling. Called on every re-selection.
    pub fn refill(&self, budget: &mut i32) {
        *budget = self.ceiling;
    }

    /// Decide whether to keep working `current`. A hold costs one unit of `budget`.
    pub fn gate(
        &self,
        work: &WorkingGrid<'_>,
        current: Coord,
        me: &PlayerState,
        roster: &[PlayerState],
        budget: &mut i32,
    ) -> Gate {
        let gate = self.evaluate(work, current, me, roster, budget);
        if gate == Gate::Hold {
            *budget -= 1;
        }
        gate
    }

    fn evaluate(
        &self,
        work: &WorkingGrid<'_>,
        current: Coord,
        me: &PlayerState,
        roster: &[PlayerState],
        budget: &mut i32,
    ) -> Gate {
        if *budget < 0 {
            return Gate::Reselect(ReselectReason::BudgetExhausted);
        }
        let (Some(cell), Some(here)) = (work.cell(current), work.work(current)) else {
            return Gate::Reselect(ReselectReason::Unanalyzed);
        };
        let team = me.team;

        if here.occupant_count() == 0 {
            let well_connected = here.connections() >= self.fortify_threshold;
            if cell.owner.is(team)
                && cell.is_idle()
                && cell.progress_owner == ProgressOwner::Stalemate
            {
                if !well_connected {
                    return Gate::Reselect(ReselectReason::WeaklyConnected);
                }
                if cell.fortified {
                    return Gate::Reselect(ReselectReason::AlreadyFortified);
                }
            }
            if cell.progress_pending() || cell.is_idle() {
                let contested = work
                    .chain_of(current)
                    .into_iter()
                    .flat_map(|chain| chain.members.iter())
                    .filter_map(|&member| work.work(member))
                    .any(|member| member.occupant_count() > 0);
                if contested {
                    return Gate::Reselect(ReselectReason::ChainContested);
                }
                if cell.is_idle() && well_connected {
                    self.refill(budget);
                }
                return Gate::Hold;
            }
            return Gate::Reselect(ReselectReason::ProgressComplete);
        }

        if !cell.progress_owner.is(team) {
            return Gate::Reselect(ReselectReason::LostPriority);
        }
        if here.occupant_count() > 1 {
            return Gate::Reselect(ReselectReason::Crowded);
        }
        let leading = here
            .occupant_teams
            .first()
            .and_then(|&rival| lookup_player(roster, rival));
        if leading.is_some_and(|rival| me.boost_used > rival.boost_used) {
            return Gate::Reselect(ReselectReason::OutSpent);
        }
        Gate::Hold
    }
}
