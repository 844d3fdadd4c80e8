use super::*;
use crate::test_utils::assert_valid_path;

fn open(_: HexCoord) -> bool {
    true
}

#[test]
fn open_ground_path_is_as_short_as_the_distance() {
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(5, -2);

    let path = find_path(start, goal, open);

    assert_eq!(path.len() as i32, start.distance(goal) + 1);
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert_valid_path(&path);
}

#[test]
fn start_equals_goal_yields_single_tile() {
    let here = HexCoord::new(3, 3);
    assert_eq!(find_path(here, here, open), vec![here]);
}

#[test]
fn unwalkable_endpoints_fail_without_searching() {
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(4, 0);

    assert!(find_path(start, goal, |c| c != start).is_empty());
    assert!(find_path(start, goal, |c| c != goal).is_empty());
}

#[test]
fn walls_force_a_detour() {
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(4, 0);
    let wall = |c: HexCoord| c.q == 2 && (-4..=4).contains(&c.r);

    let path = find_path(start, goal, |c| !wall(c));

    assert!(!path.is_empty());
    assert_valid_path(&path);
    assert!(path.iter().all(|&c| !wall(c)));
    assert!(path.len() as i32 > start.distance(goal) + 1);
}

#[test]
fn exhausting_a_sealed_region_reports_unreachable() {
    // The start sits on a small island; the goal lies outside it.
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(10, 0);
    let island = |c: HexCoord| c.distance(start) <= 2;

    assert!(find_path(start, goal, island).is_empty());
}

#[test]
fn search_gives_up_on_an_enclosed_goal() {
    // Open terrain everywhere except the goal's neighbor ring. The
    // frontier could grow forever; only the node budget stops it.
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(12, -4);
    let sealed = move |c: HexCoord| c == goal || c.distance(goal) != 1;

    assert!(find_path(start, goal, sealed).is_empty());
}

#[test]
fn equal_cost_ties_resolve_the_same_way_every_run() {
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(6, 0);

    let first = find_path(start, goal, open);
    for _ in 0..10 {
        assert_eq!(find_path(start, goal, open), first);
    }
}

#[test]
fn expensive_tiles_are_routed_around() {
    let start = HexCoord::new(0, 0);
    let goal = HexCoord::new(2, 0);
    let swamp = HexCoord::new(1, 0);
    let cost = |c: HexCoord| if c == swamp { 10.0 } else { 1.0 };

    let path = find_path_with_cost(start, goal, open, cost);

    assert_valid_path(&path);
    assert!(!path.contains(&swamp));
    assert_eq!(path_cost(&path, cost), 3.0);
}

#[test]
fn path_cost_skips_the_starting_tile() {
    let path = [
        HexCoord::new(0, 0),
        HexCoord::new(1, 0),
        HexCoord::new(2, 0),
    ];
    assert_eq!(path_cost(&path, |_| 2.0), 4.0);
}
