//! Maze generation and the wall/point grid every actor queries.
//!
//! A level's maze is built in four passes over a fully walled grid:
//!
//! 1. a randomized depth-first carve from the centre tile that pushes straight
//!    runs of one to three tiles, giving a spanning tree with long corridors;
//! 2. `level + 3` extra passages knocked through random interior walls, so the
//!    tree gains cycles and there is more than one way around;
//! 3. long-wall breaking, which opens every third consecutive wall segment
//!    along each row and column;
//! 4. point placement on every tile except the player's spawn tile.
//!
//! Passes 2 and 3 only ever remove walls, so the reachability the carve
//! guarantees survives them.

use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::coords::{Dir, Pos};
use crate::error::{GameError, Result};
use crate::tile::Tile;

/// Longest straight run the carver tries to push in one direction.
pub const MAX_RUN_STEPS: usize = 3;
/// Consecutive intact wall segments that trigger a break.
pub const MAX_WALL_RUN: usize = 3;
/// Extra passages added on top of the level number.
pub const EXTRA_PASSAGE_BASE: usize = 3;
const EXTRA_PASSAGE_ATTEMPTS_PER_TILE: usize = 64;

/// Side length of the grid for a 1-indexed level.
pub fn size_for_level(level: u32) -> usize {
    4 + level as usize
}

#[derive(Clone, Debug)]
pub struct Map {
    level: u32,
    size: usize,
    grid: Vec<Vec<Tile>>,
}

struct CarveFrame {
    origin: Pos,
    order: [Dir; 4],
    next: usize,
    run: Option<CarveRun>,
}

struct CarveRun {
    dir: Dir,
    at: Pos,
    remaining: usize,
}

impl CarveFrame {
    fn enter(origin: Pos, rng: &mut impl Rng) -> Self {
        let mut order = Dir::ALL;
        order.shuffle(rng);
        Self {
            origin,
            order,
            next: 0,
            run: None,
        }
    }
}

impl Map {
    /// Builds a fresh maze for `level`.
    pub fn generate(level: u32, rng: &mut impl Rng) -> Result<Map> {
        if level == 0 {
            return Err(GameError::InvalidLevel { level });
        }
        let mut map = Map::walled(size_for_level(level))?;
        map.level = level;

        map.carve_maze(rng);
        let extra = map.add_extra_passages(level as usize + EXTRA_PASSAGE_BASE, rng);
        let broken = map.break_long_walls(MAX_WALL_RUN);
        map.place_points();

        debug!(
            level,
            size = map.size,
            extra_passages = extra,
            walls_broken = broken,
            "maze generated"
        );
        trace!("\n{map}");
        Ok(map)
    }

    /// Hand-built maps report level 0.
    pub fn walled(size: usize) -> Result<Map> {
        Self::filled(size, Tile::closed())
    }

    pub fn open(size: usize) -> Result<Map> {
        Self::filled(size, Tile::open())
    }

    fn filled(size: usize, tile: Tile) -> Result<Map> {
        if size < 2 {
            return Err(GameError::GridTooSmall { size });
        }
        Ok(Map {
            level: 0,
            size,
            grid: vec![vec![tile; size]; size],
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.grid
    }

    /// Panics if `pos` is outside the grid; callers check bounds first.
    pub fn tile(&self, pos: Pos) -> &Tile {
        &self.grid[pos.y][pos.x]
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.in_bounds(self.size)
    }

    pub fn ensure_contains(&self, pos: Pos) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GameError::OutOfBounds {
                pos,
                size: self.size,
            })
        }
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.size / 2, self.size / 2)
    }

    /// Where the player starts; the only tile generated without a point.
    pub fn spawn_tile(&self) -> Pos {
        Pos::new(self.size / 2, (self.size / 2 + 2).min(self.size - 1))
    }

    pub fn is_open(&self, pos: Pos, dir: Dir) -> bool {
        match pos.step(dir, self.size) {
            Some(next) => !self.tile(pos).wall(dir) && !self.tile(next).wall(dir.opposite()),
            None => false,
        }
    }

    /// The tile reached by leaving `pos` in `dir`, if that move is legal.
    /// With `pass_walls` only the grid boundary blocks.
    pub fn can_cross(&self, pos: Pos, dir: Dir, pass_walls: bool) -> Option<Pos> {
        let next = pos.step(dir, self.size)?;
        if pass_walls || self.is_open(pos, dir) {
            Some(next)
        } else {
            None
        }
    }

    fn walled_between(&self, pos: Pos, dir: Dir) -> bool {
        match pos.step(dir, self.size) {
            Some(next) => self.tile(pos).wall(dir) && self.tile(next).wall(dir.opposite()),
            None => false,
        }
    }

    fn set_wall_pair(&mut self, pos: Pos, dir: Dir, present: bool) -> bool {
        let Some(next) = pos.step(dir, self.size) else {
            return false;
        };
        self.grid[pos.y][pos.x].set_wall(dir, present);
        self.grid[next.y][next.x].set_wall(dir.opposite(), present);
        true
    }

    /// Returns false when there is no neighbour in `dir`.
    pub fn open_between(&mut self, pos: Pos, dir: Dir) -> bool {
        self.set_wall_pair(pos, dir, false)
    }

    pub fn close_between(&mut self, pos: Pos, dir: Dir) -> bool {
        self.set_wall_pair(pos, dir, true)
    }

    /// Randomized depth-first carve from the centre tile.
    ///
    /// Runs on an explicit stack. A tile's directions are shuffled when it is
    /// entered and a run length is drawn when each direction is started, the
    /// same draw order a recursive carve would make.
    pub(crate) fn carve_maze(&mut self, rng: &mut impl Rng) {
        let size = self.size;
        let mut visited = vec![vec![false; size]; size];
        let start = self.center();
        visited[start.y][start.x] = true;
        let mut stack = vec![CarveFrame::enter(start, rng)];

        while let Some(frame) = stack.last_mut() {
            if let Some(run) = frame.run.as_mut() {
                let next = if run.remaining > 0 {
                    run.remaining -= 1;
                    run.at
                        .step(run.dir, size)
                        .filter(|p| !visited[p.y][p.x])
                } else {
                    None
                };
                match next {
                    Some(next) => {
                        let (from, dir) = (run.at, run.dir);
                        run.at = next;
                        self.open_between(from, dir);
                        visited[next.y][next.x] = true;
                        stack.push(CarveFrame::enter(next, rng));
                    }
                    None => frame.run = None,
                }
                continue;
            }

            if frame.next < frame.order.len() {
                let dir = frame.order[frame.next];
                frame.next += 1;
                frame.run = Some(CarveRun {
                    dir,
                    at: frame.origin,
                    remaining: rng.gen_range(1..=MAX_RUN_STEPS),
                });
            } else {
                stack.pop();
            }
        }
    }

    /// Knocks `extra` additional passages through right or bottom walls.
    ///
    /// Picks that land on an already open edge do not count. The number of
    /// attempts is bounded so a grid with nothing left to open cannot spin
    /// forever; returns how many passages were actually opened.
    pub(crate) fn add_extra_passages(&mut self, extra: usize, rng: &mut impl Rng) -> usize {
        let size = self.size;
        let budget = EXTRA_PASSAGE_ATTEMPTS_PER_TILE * size * size;
        let mut added = 0;
        let mut attempts = 0;

        while added < extra {
            if attempts == budget {
                warn!(
                    requested = extra,
                    added, attempts, "no closed wall found for extra passage, giving up"
                );
                break;
            }
            attempts += 1;

            let pos = Pos::new(rng.gen_range(0..size - 1), rng.gen_range(0..size - 1));
            let dir = if rng.gen_bool(0.5) { Dir::Right } else { Dir::Down };
            if self.walled_between(pos, dir) {
                self.open_between(pos, dir);
                added += 1;
            }
        }
        added
    }

    /// Opens every `max_len`-th consecutive intact wall segment along each
    /// row (vertical segments) and then each column (horizontal segments).
    /// Returns the number of segments opened.
    pub(crate) fn break_long_walls(&mut self, max_len: usize) -> usize {
        let size = self.size;
        let mut broken = 0;
        for y in 0..size {
            broken += self.break_line((0..size - 1).map(|x| Pos::new(x, y)), Dir::Right, max_len);
        }
        for x in 0..size {
            broken += self.break_line((0..size - 1).map(|y| Pos::new(x, y)), Dir::Down, max_len);
        }
        broken
    }

    fn break_line(&mut self, line: impl Iterator<Item = Pos>, dir: Dir, max_len: usize) -> usize {
        let mut run = 0;
        let mut broken = 0;
        for pos in line {
            if !self.walled_between(pos, dir) {
                run = 0;
                continue;
            }
            run += 1;
            if run >= max_len {
                self.open_between(pos, dir);
                broken += 1;
                run = 0;
            }
        }
        broken
    }

    pub(crate) fn place_points(&mut self) {
        let spawn = self.spawn_tile();
        for (y, row) in self.grid.iter_mut().enumerate() {
            for (x, tile) in row.iter_mut().enumerate() {
                tile.has_point = Pos::new(x, y) != spawn;
            }
        }
    }

    pub fn take_point(&mut self, pos: Pos) -> bool {
        let tile = &mut self.grid[pos.y][pos.x];
        std::mem::replace(&mut tile.has_point, false)
    }

    pub fn points_left(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.has_point)
            .count()
    }

    /// `seen[y][x]` marks every tile reachable on foot from `start`.
    pub fn flood(&self, start: Pos) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.size]; self.size];
        let mut q = VecDeque::new();
        seen[start.y][start.x] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for dir in Dir::ALL {
                let Some(next) = self.can_cross(pos, dir, false) else {
                    continue;
                };
                if !seen[next.y][next.x] {
                    seen[next.y][next.x] = true;
                    q.push_back(next);
                }
            }
        }
        seen
    }

    pub fn reachable_count(&self, start: Pos) -> usize {
        self.flood(start)
            .iter()
            .flat_map(|row| row.iter())
            .filter(|seen| **seen)
            .count()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let top = self.tile(Pos::new(x, y)).wall(Dir::Up);
                f.write_str(if top { "+--" } else { "+  " })?;
            }
            f.write_str("+\n")?;
            for x in 0..self.size {
                let tile = self.tile(Pos::new(x, y));
                f.write_str(if tile.wall(Dir::Left) { "|" } else { " " })?;
                f.write_str(if tile.has_point { ". " } else { "  " })?;
            }
            let last = self.tile(Pos::new(self.size - 1, y));
            f.write_str(if last.wall(Dir::Right) { "|\n" } else { " \n" })?;
        }
        for x in 0..self.size {
            let bottom = self.tile(Pos::new(x, self.size - 1)).wall(Dir::Down);
            f.write_str(if bottom { "+--" } else { "+  " })?;
        }
        f.write_str("+")
    }
}
