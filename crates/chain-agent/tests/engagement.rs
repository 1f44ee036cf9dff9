use chain_agent::{EngagementController, Gate, ReselectReason};
use chain_core::{
    analyze, annotate, Coord, Grid, Owner, Pace, PaceTable, PlayerState, ProgressOwner, TeamId,
};

const ME: TeamId = TeamId(1);
const CORNER: Coord = Coord::new(0, 0);
const CENTER: Coord = Coord::new(1, 1);

fn block() -> Grid {
    Grid::from_layout(&["000.", "000.", "000."]).unwrap()
}

fn controller() -> EngagementController {
    // Long pace: fortify at 4, ceiling falls back to 20.
    EngagementController::new(PaceTable::default().config(Pace::Long), 20)
}

fn gate(
    grid: &Grid,
    current: Coord,
    me: &PlayerState,
    roster: &[PlayerState],
    budget: &mut i32,
) -> Gate {
    let table = PaceTable::default();
    let mut work = analyze(grid, ME);
    annotate(&mut work, table.config(Pace::Long));
    controller().gate(&work, current, me, roster, budget)
}

#[test]
fn negative_budget_forces_reselect() {
    let grid = block();
    let me = PlayerState::at(ME, CORNER);
    let mut budget = -1;
    assert_eq!(
        gate(&grid, CORNER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::BudgetExhausted)
    );
    assert_eq!(budget, -1);
}

#[test]
fn idle_weak_cell_holds_and_spends_budget() {
    let grid = block();
    let me = PlayerState::at(ME, CORNER);
    let mut budget = 5;
    assert_eq!(gate(&grid, CORNER, &me, &[], &mut budget), Gate::Hold);
    assert_eq!(budget, 4);
}

#[test]
fn idle_well_connected_cell_refills_before_spending() {
    let grid = block();
    let me = PlayerState::at(ME, CENTER);
    let mut budget = 2;
    assert_eq!(gate(&grid, CENTER, &me, &[], &mut budget), Gate::Hold);
    assert_eq!(budget, controller().ceiling() - 1);
}

#[test]
fn own_idle_cells_are_released() {
    let mut grid = block();
    grid.get_mut(CORNER).unwrap().owner = Owner::Team(ME);
    {
        let center = grid.get_mut(CENTER).unwrap();
        center.owner = Owner::Team(ME);
        center.fortified = true;
    }

    let mut budget = 5;
    let me = PlayerState::at(ME, CORNER);
    assert_eq!(
        gate(&grid, CORNER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::WeaklyConnected)
    );
    let me = PlayerState::at(ME, CENTER);
    assert_eq!(
        gate(&grid, CENTER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::AlreadyFortified)
    );
    assert_eq!(budget, 5);
}

#[test]
fn own_well_connected_cell_is_held_until_fortified() {
    let mut grid = block();
    grid.get_mut(CENTER).unwrap().owner = Owner::Team(ME);
    let me = PlayerState::at(ME, CENTER);

    let mut budget = 5;
    assert_eq!(gate(&grid, CENTER, &me, &[], &mut budget), Gate::Hold);
    assert_eq!(budget, controller().ceiling() - 1);

    grid.get_mut(CENTER).unwrap().fortified = true;
    assert_eq!(
        gate(&grid, CENTER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::AlreadyFortified)
    );
    assert_eq!(budget, controller().ceiling() - 1);
}

#[test]
fn rival_elsewhere_in_chain_releases_the_cell() {
    let mut grid = block();
    grid.get_mut(Coord::new(2, 2)).unwrap().occupants = vec![TeamId(2)];
    let me = PlayerState::at(ME, CORNER);
    let mut budget = 5;
    assert_eq!(
        gate(&grid, CORNER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::ChainContested)
    );
}

#[test]
fn finished_progress_releases_the_cell() {
    let mut grid = block();
    {
        let cell = grid.get_mut(CORNER).unwrap();
        cell.progress = 10.0;
        cell.progress_goal = 10;
        cell.progress_owner = ProgressOwner::Team(ME);
    }
    let me = PlayerState::at(ME, CORNER);
    let mut budget = 5;
    assert_eq!(
        gate(&grid, CORNER, &me, &[], &mut budget),
        Gate::Reselect(ReselectReason::ProgressComplete)
    );
}

#[test]
fn contested_cell_rules() {
    let rival = TeamId(2);
    let me = PlayerState::at(ME, CORNER).with_boost_used(30);
    let cheap_rival = PlayerState::at(rival, CORNER).with_boost_used(10);
    let rich_rival = PlayerState::at(rival, CORNER).with_boost_used(40);

    let mut grid = block();
    {
        let cell = grid.get_mut(CORNER).unwrap();
        cell.progress = 1.0;
        cell.progress_goal = 10;
        cell.progress_owner = ProgressOwner::Team(rival);
        cell.occupants = vec![ME, rival];
    }
    let mut budget = 5;
    assert_eq!(
        gate(&grid, CORNER, &me, &[me.clone(), cheap_rival.clone()], &mut budget),
        Gate::Reselect(ReselectReason::LostPriority)
    );

    grid.get_mut(CORNER).unwrap().progress_owner = ProgressOwner::Team(ME);
    assert_eq!(
        gate(&grid, CORNER, &me, &[me.clone(), cheap_rival.clone()], &mut budget),
        Gate::Reselect(ReselectReason::OutSpent)
    );
    assert_eq!(
        gate(&grid, CORNER, &me, &[me.clone(), rich_rival], &mut budget),
        Gate::Hold
    );
    assert_eq!(budget, 4);

    grid.get_mut(CORNER).unwrap().occupants = vec![ME, rival, TeamId(3)];
    assert_eq!(
        gate(&grid, CORNER, &me, &[me.clone(), cheap_rival], &mut budget),
        Gate::Reselect(ReselectReason::Crowded)
    );
}

#[test]
fn budget_never_drops_below_minus_one() {
    let grid = block();
    let me = PlayerState::at(ME, CORNER);
    let engagement = controller();
    let mut budget = engagement.ceiling();
    let mut holds = 0;

    loop {
        match gate(&grid, CORNER, &me, &[], &mut budget) {
            Gate::Hold => holds += 1,
            Gate::Reselect(reason) => {
                assert_eq!(reason, ReselectReason::BudgetExhausted);
                break;
            }
        }
        assert!(budget >= -1);
    }
    assert_eq!(budget, -1);
    assert_eq!(holds, engagement.ceiling() + 1);
}
