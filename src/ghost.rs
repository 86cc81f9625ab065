//! Ghost actors: the timed special ability and the throttled pursuit move.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::coords::{Dir, Pos};
use crate::error::Result;
use crate::map::Map;
use crate::pursuit::shortest_path;

/// The special ability switches on during the first second of every period.
pub const SPECIAL_PERIOD_SECS: i64 = 10;
pub const SPECIAL_DURATION_SECS: f64 = 3.0;
pub const MOVE_DELAY_SECS: f64 = 0.5;
/// Delay of a basic ghost while its special ability is active.
pub const FAST_MOVE_DELAY_SECS: f64 = 0.25;
/// Chance a ghost outside close range follows its shortest path this move.
pub const CHASE_PROBABILITY: f64 = 0.4;
/// Path length at or below which a ghost always follows its shortest path.
pub const CLOSE_RANGE: usize = 3;

/// What the special ability does: `Basic` moves twice as often,
/// `WallPhaser` ignores walls, `AreaEffect` ignores walls and covers a 2x2
/// block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Basic,
    WallPhaser,
    AreaEffect,
}

/// Random decisions a ghost makes while pursuing.
///
/// Every [`Rng`] is a source of dice; tests substitute scripted ones.
pub trait PursuitDice {
    fn commit_to_chase(&mut self) -> bool;
    fn wander_order(&mut self) -> [Dir; 4];
}

impl<R: Rng + ?Sized> PursuitDice for R {
    fn commit_to_chase(&mut self) -> bool {
        self.gen_bool(CHASE_PROBABILITY)
    }

    fn wander_order(&mut self) -> [Dir; 4] {
        let mut order = Dir::ALL;
        order.shuffle(self);
        order
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ghost {
    pos: Pos,
    kind: GhostKind,
    special_active: bool,
    special_activated_at: f64,
    last_move_at: f64,
}

impl Ghost {
    /// Places a ghost on `map`. The first move is due one delay after `now`.
    pub fn spawn(map: &Map, pos: Pos, kind: GhostKind, now: f64) -> Result<Ghost> {
        map.ensure_contains(pos)?;
        Ok(Ghost {
            pos,
            kind,
            special_active: false,
            special_activated_at: 0.0,
            last_move_at: now,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn special_active(&self) -> bool {
        self.special_active
    }

    pub fn special_activated_at(&self) -> f64 {
        self.special_activated_at
    }

    pub fn can_pass_walls(&self) -> bool {
        self.special_active && matches!(self.kind, GhostKind::WallPhaser | GhostKind::AreaEffect)
    }

    pub fn move_delay(&self) -> f64 {
        if self.special_active && self.kind == GhostKind::Basic {
            FAST_MOVE_DELAY_SECS
        } else {
            MOVE_DELAY_SECS
        }
    }

    /// Returns true if the special state flipped.
    pub fn update_special(&mut self, now: f64) -> bool {
        if self.special_active {
            if now - self.special_activated_at >= SPECIAL_DURATION_SECS {
                self.special_active = false;
                debug!(kind = ?self.kind, pos = %self.pos, now, "special ability off");
                return true;
            }
        } else if (now.floor() as i64).rem_euclid(SPECIAL_PERIOD_SECS) == 0 {
            self.special_active = true;
            self.special_activated_at = now;
            debug!(kind = ?self.kind, pos = %self.pos, now, "special ability on");
            return true;
        }
        false
    }

    /// Moves one tile toward `target` once the move delay has elapsed.
    /// Returns whether the ghost changed tile.
    pub fn take_turn(
        &mut self,
        now: f64,
        target: Pos,
        map: &Map,
        dice: &mut impl PursuitDice,
    ) -> Result<bool> {
        if now - self.last_move_at < self.move_delay() {
            return Ok(false);
        }
        self.last_move_at = now;

        match self.choose_step(target, map, dice)? {
            Some(next) => {
                self.pos = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn choose_step(
        &self,
        target: Pos,
        map: &Map,
        dice: &mut impl PursuitDice,
    ) -> Result<Option<Pos>> {
        let pass_walls = self.can_pass_walls();
        if let Some(path) = shortest_path(map, self.pos, target, pass_walls)? {
            // already on the target
            let Some(&first) = path.first() else {
                return Ok(None);
            };
            if path.len() <= CLOSE_RANGE || dice.commit_to_chase() {
                return Ok(Some(first));
            }
        }
        Ok(dice
            .wander_order()
            .into_iter()
            .find_map(|dir| map.can_cross(self.pos, dir, pass_walls)))
    }

    /// An active area-effect ghost covers the 2x2 block extending right and
    /// down. Tiles past the grid edge are dropped.
    pub fn footprint(&self, size: usize) -> Vec<Pos> {
        if !(self.special_active && self.kind == GhostKind::AreaEffect) {
            return vec![self.pos];
        }
        let mut tiles = Vec::with_capacity(4);
        for dy in 0..2 {
            for dx in 0..2 {
                let pos = Pos::new(self.pos.x + dx, self.pos.y + dy);
                if pos.in_bounds(size) {
                    tiles.push(pos);
                }
            }
        }
        tiles
    }

    pub fn touches(&self, pos: Pos, size: usize) -> bool {
        self.footprint(size).contains(&pos)
    }
}
