use pacwoman::map::{size_for_level, MAX_WALL_RUN};
use pacwoman::pursuit::shortest_path;
use pacwoman::{Dir, Map, Pos};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEEDS: u64 = 12;

fn generated_maps() -> impl Iterator<Item = (u64, Map)> {
    (0..SEEDS).flat_map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (1..=7)
            .map(move |level| (seed, Map::generate(level, &mut rng).unwrap()))
            .collect::<Vec<_>>()
    })
}

fn positions(size: usize) -> impl Iterator<Item = Pos> {
    (0..size).flat_map(move |y| (0..size).map(move |x| Pos::new(x, y)))
}

/// Distances by repeated edge relaxation until nothing improves.
fn relaxed_distances(map: &Map, from: Pos) -> Vec<Vec<Option<usize>>> {
    let size = map.size();
    let mut dist = vec![vec![None; size]; size];
    dist[from.y][from.x] = Some(0);
    let mut changed = true;
    while changed {
        changed = false;
        for pos in positions(size) {
            let Some(d) = dist[pos.y][pos.x] else {
                continue;
            };
            for dir in Dir::ALL {
                if let Some(next) = map.can_cross(pos, dir, false) {
                    let better = dist[next.y][next.x].map_or(true, |old: usize| d + 1 < old);
                    if better {
                        dist[next.y][next.x] = Some(d + 1);
                        changed = true;
                    }
                }
            }
        }
    }
    dist
}

#[test]
fn every_tile_is_reachable_from_every_tile() {
    for (seed, map) in generated_maps() {
        let tiles = map.size() * map.size();
        assert_eq!(map.size(), size_for_level(map.level()));
        for start in positions(map.size()) {
            assert_eq!(
                map.reachable_count(start),
                tiles,
                "seed {seed} level {} from {start}",
                map.level()
            );
        }
    }
}

#[test]
fn walls_agree_on_both_sides_of_every_edge() {
    for (seed, map) in generated_maps() {
        for pos in positions(map.size()) {
            for dir in Dir::ALL {
                if let Some(next) = pos.step(dir, map.size()) {
                    assert_eq!(
                        map.tile(pos).wall(dir),
                        map.tile(next).wall(dir.opposite()),
                        "seed {seed} level {} edge {pos} {dir:?}",
                        map.level()
                    );
                }
            }
        }
    }
}

#[test]
fn no_wall_run_reaches_the_limit() {
    for (seed, map) in generated_maps() {
        let size = map.size();
        for line in 0..size {
            let mut row_run = 0;
            let mut col_run = 0;
            for i in 0..size - 1 {
                let across = Pos::new(i, line);
                let down = Pos::new(line, i);
                row_run = if map.is_open(across, Dir::Right) { 0 } else { row_run + 1 };
                col_run = if map.is_open(down, Dir::Down) { 0 } else { col_run + 1 };
                assert!(row_run < MAX_WALL_RUN, "seed {seed} row {line}");
                assert!(col_run < MAX_WALL_RUN, "seed {seed} column {line}");
            }
        }
    }
}

#[test]
fn only_the_spawn_tile_lacks_a_point() {
    for (seed, map) in generated_maps() {
        let spawn = map.spawn_tile();
        for pos in positions(map.size()) {
            assert_eq!(map.tile(pos).has_point, pos != spawn, "seed {seed} {pos}");
        }
        assert_eq!(map.points_left(), map.size() * map.size() - 1);
    }
}

#[test]
fn pursuit_paths_are_shortest() {
    let mut rng = StdRng::seed_from_u64(99);
    for level in 1..=3 {
        let map = Map::generate(level, &mut rng).unwrap();
        for from in positions(map.size()) {
            let dist = relaxed_distances(&map, from);
            for to in positions(map.size()) {
                let path = shortest_path(&map, from, to, false).unwrap().unwrap();
                assert_eq!(Some(path.len()), dist[to.y][to.x], "{from} -> {to}");

                let mut at = from;
                for next in &path {
                    let dir = Dir::ALL
                        .into_iter()
                        .find(|d| at.step(*d, map.size()) == Some(*next))
                        .unwrap();
                    assert!(map.is_open(at, dir), "{from} -> {to} crosses a wall");
                    at = *next;
                }
                assert_eq!(at, to);
            }
        }
    }
}

#[test]
fn phasing_paths_follow_manhattan_distance() {
    let mut rng = StdRng::seed_from_u64(5);
    let map = Map::generate(4, &mut rng).unwrap();
    for from in positions(map.size()) {
        for to in positions(map.size()) {
            let path = shortest_path(&map, from, to, true).unwrap().unwrap();
            assert_eq!(path.len(), from.x.abs_diff(to.x) + from.y.abs_diff(to.y));
        }
    }
}
