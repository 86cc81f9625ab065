use crate::coords::{Dir, Pos};
use crate::error::{GameError, Result};
use crate::map::Map;

pub const START_LIVES: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pos: Pos,
    pub score: u32,
    pub lives: u32,
    facing: Dir,
}

impl Player {
    /// A fresh player on `pos`, facing right with full lives.
    pub fn spawn(map: &Map, pos: Pos) -> Result<Player> {
        map.ensure_contains(pos)?;
        Ok(Player {
            pos,
            score: 0,
            lives: START_LIVES,
            facing: Dir::Right,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn facing(&self) -> Dir {
        self.facing
    }

    /// Moves the player back onto `pos` of a (possibly new) map.
    pub fn respawn(&mut self, map: &Map, pos: Pos) -> Result<()> {
        map.ensure_contains(pos)?;
        self.pos = pos;
        Ok(())
    }

    /// Turns to face `dir` and steps that way unless a wall or the grid edge
    /// is in the way. Returns whether the player moved.
    pub fn walk(&mut self, dir: Dir, map: &Map) -> bool {
        self.facing = dir;
        match map.can_cross(self.pos, dir, false) {
            Some(next) => {
                self.pos = next;
                true
            }
            None => false,
        }
    }

    /// [`Player::walk`] for a raw `(dx, dy)`; anything but a unit vector is
    /// rejected and leaves the player untouched.
    pub fn move_by(&mut self, dx: isize, dy: isize, map: &Map) -> Result<bool> {
        let dir = Dir::from_delta(dx, dy).ok_or(GameError::NotUnitStep { dx, dy })?;
        Ok(self.walk(dir, map))
    }
}
