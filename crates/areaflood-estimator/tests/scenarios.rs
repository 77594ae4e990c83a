//! End-to-end estimates over hand-drawn shapes.

use areaflood_core::{CellState, Grid, GridConfig, Point, Shape};
use areaflood_estimator::{AreaEstimator, Estimate, RunStatus};

fn grid(picture: &str) -> Grid {
    Shape::parse(picture)
        .unwrap()
        .build(GridConfig::default())
        .unwrap()
}

fn estimate(grid: &Grid) -> Estimate {
    match AreaEstimator::new(grid.clone()).run().unwrap() {
        RunStatus::Done(e) => e,
        RunStatus::Pending => panic!("immediate run returned pending"),
    }
}

fn counted_at(grid: &Grid, x: usize, y: usize) -> bool {
    let i = grid.index_of(Point::new(x, y)).unwrap();
    grid.cell(i).unwrap().is_counted()
}

#[test]
fn open_grid() {
    let g = Grid::new(3).unwrap();
    g.set_start_point(4).unwrap();
    assert_eq!(estimate(&g).total, 9);
}

#[test]
fn closed_rectangle() {
    let g = grid(
        "
#####
#...#
#.S.#
#...#
#####",
    );
    let e = estimate(&g);
    assert_eq!(e.total - e.corners, 21);
    assert_eq!(e.corners, 4);
    assert_eq!(e.total, 25);
    for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert!(counted_at(&g, x, y), "corner ({x}, {y})");
    }
}

#[test]
fn gap_on_the_edge_is_still_counted() {
    let g = grid(
        "
##.##
#...#
#.S.#
#...#
#####",
    );
    let e = estimate(&g);
    assert_eq!(e.total, 25);
    assert_eq!(g.cell(2).unwrap().state(), CellState::Area);
}

#[test]
fn gap_leaks_into_the_whole_grid() {
    let g = grid(
        "
.......
.##.##.
.#...#.
.#.S.#.
.#...#.
.#####.
.......",
    );
    let e = estimate(&g);
    assert_eq!(e.total, 49);
    assert_eq!(e.corners, 0);
    // the outside got flooded
    assert_eq!(g.cell(0).unwrap().state(), CellState::Area);
    assert_eq!(g.cell(48).unwrap().state(), CellState::Area);
}

#[test]
fn outside_stays_untouched_when_closed() {
    let g = grid(
        "
.......
.#####.
.#...#.
.#.S.#.
.#...#.
.#####.
.......",
    );
    let e = estimate(&g);
    assert_eq!(e.total, 25);
    assert_eq!(g.cell(0).unwrap().state(), CellState::Default);
    assert!(!g.cell(0).unwrap().is_counted());
}

#[test]
fn isolated_boundary_pair_is_not_rescued() {
    let g = grid(
        "
#####..
#...#..
#.S.#..
#...#..
#####..
......#
......#",
    );
    let e = estimate(&g);
    assert_eq!(e.total, 25);
    assert!(!counted_at(&g, 6, 5));
    assert!(!counted_at(&g, 6, 6));
}

#[test]
fn corner_pass_does_not_chain() {
    // (2, 5) touches the counted bottom edge and is rescued; (2, 6) only
    // touches (2, 5) and stays uncounted.
    let g = grid(
        "
#####..
#...#..
#.S.#..
#...#..
#####..
..#....
..#....",
    );
    let e = estimate(&g);
    assert_eq!(e.corners, 5);
    assert_eq!(e.total, 26);
    assert!(counted_at(&g, 2, 5));
    assert!(!counted_at(&g, 2, 6));
}

#[test]
fn l_shaped_room() {
    // The inner corner at (3, 3) touches the interior orthogonally and is
    // counted by the fill; the five outer corners need the corner pass.
    let g = grid(
        "
####...
#..#...
#.S#...
#..####
#.....#
#.....#
#######",
    );
    let e = estimate(&g);
    assert_eq!(e.interior + 1, 16);
    assert_eq!(e.boundary, 19);
    assert_eq!(e.corners, 5);
    assert_eq!(e.total, 40);
    assert!(counted_at(&g, 3, 3));
    assert!(!counted_at(&g, 5, 1));
}

#[test]
fn rebuild_after_run_resets_everything() {
    let g = grid(
        "
#####
#...#
#.S.#
#...#
#####",
    );
    let mut est = AreaEstimator::new(g.clone());
    est.run().unwrap();
    assert!(g.counted_cells() > 0);

    g.rebuild(5).unwrap();
    assert_eq!(g.start_point(), None);
    for c in g.cells() {
        assert_eq!(c.state(), CellState::Default);
        assert!(!c.is_counted());
    }

    // and a fresh drawing can be estimated again with the same estimator
    Shape::parse("...\n.S.\n...").unwrap().draw(&g).unwrap();
    assert!(matches!(est.run(), Ok(RunStatus::Done(Estimate { total: 9, .. }))));
}
