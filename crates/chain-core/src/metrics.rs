//! Occupancy, ownership and stage metrics derived from a finished analysis.

use crate::{Ownership, PaceConfig, WorkingGrid, CELL_STAGE_CEILING};

/// Annotate every cell and chain of an analyzed grid.
///
/// Must run after [`analyze`](crate::analyze) has covered the whole grid: stages depend on final
/// chain lengths and chain occupancy on every member's occupants.
pub fn annotate(work: &mut WorkingGrid<'_>, pace: &PaceConfig) {
    let grid = work.grid();
    let team = work.team();

    for (index, cell) in grid.cells().iter().enumerate() {
        let annotated = &mut work.cells[index];
        annotated.occupant_teams = cell.rival_occupants(team).collect();
        annotated.ownership = Ownership::of(cell.owner, team);
        annotated.stage = Some(pace.stage(CELL_STAGE_CEILING, annotated.chain_length()));
    }

    for chain in work.chains.iter_mut() {
        chain.max_occupants = chain
            .members
            .iter()
            .filter_map(|&m| grid.index_of(m))
            .map(|i| work.cells[i].occupant_count())
            .max()
            .unwrap_or(0);
        chain.stage = Some(pace.stage(CELL_STAGE_CEILING, chain.len()));
    }
}
