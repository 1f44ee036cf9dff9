use std::collections::BTreeMap;

use chain_core::{analyze, Coord, Grid, Owner, TeamId};

const ME: TeamId = TeamId(1);

fn mixed_board() -> Grid {
    Grid::from_layout(&[
        "0011..2..3",
        "0.1..22.33",
        "..1.2...3.",
        "11..2.0000",
        "1...2.0..0",
    ])
    .unwrap()
}

#[test]
fn three_by_three_region_is_one_unclaimed_chain() {
    let grid = Grid::from_layout(&[".....", ".000.", ".000.", ".000.", "....."]).unwrap();
    let work = analyze(&grid, ME);

    assert_eq!(work.chains().len(), 1);
    let chain = &work.chains()[0];
    assert_eq!(chain.len(), 9);
    assert_eq!(chain.unclaimed, 9);
    assert_eq!(chain.owned_by_me, 0);
    assert_eq!(chain.owned_by_other, 0);
    assert_eq!(chain.root(), Some(Coord::new(1, 1)));

    let center = work.work(Coord::new(2, 2)).unwrap();
    assert_eq!(center.chain_len, Some(9));
    assert_eq!(center.unclaimed_in_chain, 9);
    assert_eq!(center.connections(), 8);
    assert_eq!(work.work(Coord::new(1, 1)).unwrap().connections(), 3);
    assert_eq!(work.work(Coord::new(1, 2)).unwrap().connections(), 5);
}

#[test]
fn empty_cells_are_processed_but_never_chained() {
    let grid = Grid::from_layout(&["0.", ".0"]).unwrap();
    let work = analyze(&grid, ME);

    let empty = work.work(Coord::new(0, 1)).unwrap();
    assert_eq!(empty.chain_len, Some(0));
    assert_eq!(empty.chain, None);
    assert_eq!(empty.local_connections, None);

    // Diagonal neighbours of the same kind join.
    assert_eq!(work.chains().len(), 1);
    assert_eq!(work.work(Coord::new(1, 1)).unwrap().chain_len, Some(2));
}

#[test]
fn every_non_empty_cell_belongs_to_exactly_one_chain() {
    let grid = mixed_board();
    let work = analyze(&grid, ME);

    let mut seen = BTreeMap::new();
    for chain in work.chains() {
        for member in &chain.members {
            assert!(seen.insert(*member, chain.id).is_none(), "{member:?} in two chains");
        }
    }

    for (cell, annotated) in work.iter() {
        if cell.kind.is_shape() {
            assert_eq!(seen.get(&cell.coord()).copied(), annotated.chain);
            assert!(annotated.chain.is_some());
        } else {
            assert!(!seen.contains_key(&cell.coord()));
        }
    }
}

#[test]
fn chain_membership_matches_adjacency_and_kind() {
    let grid = mixed_board();
    let work = analyze(&grid, ME);

    for (cell, annotated) in work.iter() {
        if !cell.kind.is_shape() {
            continue;
        }
        for n in grid.neighbors(cell.coord()) {
            let other = grid.get(n).unwrap();
            let other_chain = work.work(n).unwrap().chain;
            if other.kind == cell.kind {
                assert_eq!(annotated.chain, other_chain);
            } else {
                assert_ne!(annotated.chain, other_chain);
            }
        }
        let chain = work.chain_of(cell.coord()).unwrap();
        assert_eq!(Some(chain.kind), cell.kind.shape());
    }
}

#[test]
fn chain_length_counts_member_cells() {
    let grid = mixed_board();
    let work = analyze(&grid, ME);

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for (_, annotated) in work.iter() {
        if let Some(id) = annotated.chain {
            *counts.entry(id.0).or_default() += 1;
        }
    }
    for (cell, annotated) in work.iter() {
        if let Some(id) = annotated.chain {
            assert_eq!(annotated.chain_len, Some(counts[&id.0]), "at {:?}", cell.coord());
        }
    }
}

#[test]
fn ownership_tallies_partition_every_chain() {
    let mut grid = mixed_board();
    grid.get_mut(Coord::new(0, 0)).unwrap().owner = Owner::Team(ME);
    grid.get_mut(Coord::new(0, 1)).unwrap().owner = Owner::Team(TeamId(2));
    grid.get_mut(Coord::new(3, 6)).unwrap().owner = Owner::Team(TeamId(3));
    grid.get_mut(Coord::new(3, 7)).unwrap().owner = Owner::Team(ME);

    let work = analyze(&grid, ME);
    for chain in work.chains() {
        assert_eq!(chain.unclaimed + chain.owned_by_me + chain.owned_by_other, chain.len());
    }

    let corner = work.work(Coord::new(1, 0)).unwrap();
    assert_eq!(corner.chain_len, Some(3));
    assert_eq!(corner.owned_by_me_in_chain, 1);
    assert_eq!(corner.owned_by_other_in_chain, 1);
    assert_eq!(corner.unclaimed_in_chain, 1);
}

#[test]
fn reanalysis_is_idempotent() {
    let grid = mixed_board();
    let first = analyze(&grid, ME);
    let second = analyze(&grid, ME);

    assert_eq!(first.chains(), second.chains());
    for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
    }
}
