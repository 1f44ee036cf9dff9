//! Connectivity analysis: 8-connected flood fill over same-kind cells.

use crate::{Chain, ChainId, Grid, Ownership, TeamId, WorkingGrid};

/// Partition `grid` into chains and record per-chain ownership tallies on every member cell.
///
/// Cells are visited in row-major order; each unvisited non-empty cell roots a new chain that is
/// collected with an explicit stack, so chain ids follow the scan order of their roots. Empty
/// cells get `chain_len = Some(0)` and no chain.
pub fn analyze(grid: &Grid, team: TeamId) -> WorkingGrid<'_> {
    let mut work = WorkingGrid::new(grid, team);
    let mut visited = vec![false; grid.len()];
    let mut stack = Vec::new();

    for root in 0..grid.len() {
        if visited[root] {
            continue;
        }
        let Some(kind) = grid.cells()[root].kind.shape() else {
            work.cells[root].chain_len = Some(0);
            continue;
        };

        let id = ChainId(work.chains.len() as u32);
        let members = collect_chain(&mut work, &mut visited, &mut stack, root);
        let mut chain = Chain {
            id,
            kind,
            members: Vec::with_capacity(members.len()),
            unclaimed: 0,
            owned_by_me: 0,
            owned_by_other: 0,
            max_occupants: 0,
            stage: None,
        };

        for &index in &members {
            let cell = &grid.cells()[index];
            match Ownership::of(cell.owner, team) {
                Ownership::Unclaimed => chain.unclaimed += 1,
                Ownership::Mine => chain.owned_by_me += 1,
                Ownership::Other => chain.owned_by_other += 1,
            }
            chain.members.push(cell.coord());
        }

        for &index in &members {
            let cell = &mut work.cells[index];
            cell.chain = Some(id);
            cell.chain_len = Some(members.len());
            cell.unclaimed_in_chain = chain.unclaimed;
            cell.owned_by_me_in_chain = chain.owned_by_me;
            cell.owned_by_other_in_chain = chain.owned_by_other;
        }

        work.chains.push(chain);
    }

    tracing::trace!(chains = work.chains.len(), %team, "analyzed grid");
    work
}

/// Depth-first collection of the chain rooted at `root`, in pop order.
///
/// Every same-kind neighbour is pushed, visited or not; duplicates are dropped when popped. The
/// local connection count is filled on a cell's first pop only.
fn collect_chain(
    work: &mut WorkingGrid<'_>,
    visited: &mut [bool],
    stack: &mut Vec<usize>,
    root: usize,
) -> Vec<usize> {
    let grid = work.grid();
    let kind = grid.cells()[root].kind;
    let mut members = Vec::new();

    stack.clear();
    stack.push(root);
    while let Some(index) = stack.pop() {
        if visited[index] {
            continue;
        }
        visited[index] = true;
        members.push(index);

        let populate = work.cells[index].local_connections.is_none();
        let mut connections = 0u8;
        for neighbor in grid.neighbor_indices(index).into_iter().flatten() {
            if grid.cells()[neighbor].kind != kind {
                continue;
            }
            stack.push(neighbor);
            if populate {
                connections += 1;
            }
        }
        if populate {
            work.cells[index].local_connections = Some(connections);
        }
    }

    members
}
