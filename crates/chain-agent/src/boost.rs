use chain_core::{lookup_player, Cell, PlayerState, WorkingCell};

use crate::config::AgentConfig;

/// Maps the chosen target to an intensity tier (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostPolicy {
    pub spend_threshold: u32,
    pub uncontested: u8,
    pub contested: u8,
}

impl Default for BoostPolicy {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

impl BoostPolicy {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            spend_threshold: config.boost_spend_threshold,
            uncontested: config.uncontested_boost.min(3),
            contested: config.contested_boost.min(3),
        }
    }

    /// `target` is `None` while the unit is off the board.
    pub fn choose(
        &self,
        me: &PlayerState,
        target: Option<(&Cell, &WorkingCell)>,
        roster: &[PlayerState],
    ) -> u8 {
        let Some((cell, annotated)) = target else {
            return self.uncontested_boost(me);
        };
        let Some(&rival) = annotated.occupant_teams.first() else {
            return self.uncontested_boost(me);
        };
        let behind =
            lookup_player(roster, rival).is_some_and(|lead| me.boost_used < lead.boost_used);
        if behind && cell.progress_pending() {
            self.contested
        } else {
            0
        }
    }

    fn uncontested_boost(&self, me: &PlayerState) -> u8 {
        if me.boost_used < self.spend_threshold {
            self.uncontested
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_core::{Coord, TeamId, TileKind};

    #[test]
    fn off_grid_uses_spend_threshold() {
        let policy = BoostPolicy::default();
        let fresh = PlayerState::off_grid(TeamId(1));
        let spent = PlayerState::off_grid(TeamId(1)).with_boost_used(20);
        assert_eq!(policy.choose(&fresh, None, &[]), 2);
        assert_eq!(policy.choose(&spent, None, &[]), 0);
    }

    #[test]
    fn contested_boost_needs_open_progress_and_a_richer_rival() {
        let policy = BoostPolicy::default();
        let me = PlayerState::at(TeamId(1), Coord::new(0, 0)).with_boost_used(30);
        let rival = PlayerState::at(TeamId(2), Coord::new(0, 0)).with_boost_used(40);
        let roster = vec![me.clone(), rival];

        let mut cell = Cell::new(Coord::new(0, 0), 0, TileKind::Shape(1));
        cell.progress = 2.0;
        cell.progress_goal = 8;
        let annotated = WorkingCell {
            occupant_teams: vec![TeamId(2)],
            ..WorkingCell::default()
        };
        assert_eq!(policy.choose(&me, Some((&cell, &annotated)), &roster), 3);

        cell.progress = 8.0;
        assert_eq!(policy.choose(&me, Some((&cell, &annotated)), &roster), 0);

        let rich = me.clone().with_boost_used(50);
        cell.progress = 1.0;
        assert_eq!(policy.choose(&rich, Some((&cell, &annotated)), &roster), 0);
    }
}
