//! Level progression, pickups, collisions and lives.
//!
//! [`Game`] owns the current [`Map`], the [`Player`] and the ghost roster and
//! replaces all of them when a level changes. Everything a renderer needs is
//! exposed read-only; the driver feeds intents and a once-per-tick timestamp
//! into [`Game::tick`] and gets back the events that tick produced.

use rand::Rng;
use tracing::info;

use crate::coords::{Dir, Pos};
use crate::error::Result;
use crate::ghost::{Ghost, GhostKind};
use crate::map::Map;
use crate::player::Player;

pub const MAX_LEVEL: u32 = 7;
/// First level with a wall-phasing ghost.
pub const WALL_PHASER_LEVEL: u32 = 3;
/// First level with an area-effect ghost.
pub const AREA_EFFECT_LEVEL: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Move(Dir),
    SkipLevel,
    /// Only honoured once the game is over.
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Victory,
    Defeat,
}

impl Phase {
    pub fn is_over(self) -> bool {
        self != Phase::Playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelCleared { level: u32 },
    LifeLost { lives_left: u32 },
    Victory,
    Defeat,
}

#[derive(Debug)]
pub struct Game {
    level: u32,
    map: Map,
    player: Player,
    ghosts: Vec<Ghost>,
    phase: Phase,
    running: bool,
}

impl Game {
    pub fn new(rng: &mut impl Rng, now: f64) -> Result<Game> {
        let level = 1;
        let map = Map::generate(level, rng)?;
        let player = Player::spawn(&map, map.spawn_tile())?;
        let ghosts = roster(&map, now)?;
        info!(level, size = map.size(), ghosts = ghosts.len(), "game started");
        Ok(Game {
            level,
            map,
            player,
            ghosts,
            phase: Phase::Playing,
            running: true,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs one world step at `now` after applying `intents` in order.
    pub fn tick<R: Rng>(
        &mut self,
        intents: &[Intent],
        now: f64,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();
        for &intent in intents {
            self.apply(intent, now, rng, &mut events)?;
        }
        if !self.running || self.phase.is_over() {
            return Ok(events);
        }

        if self.map.take_point(self.player.pos()) {
            self.player.score += 1;
        }
        if self.map.points_left() == 0 {
            self.advance_level(now, rng, &mut events)?;
            return Ok(events);
        }

        let size = self.map.size();
        for ghost in &mut self.ghosts {
            ghost.update_special(now);
            ghost.take_turn(now, self.player.pos(), &self.map, rng)?;
            if !ghost.touches(self.player.pos(), size) {
                continue;
            }

            self.player.lives = self.player.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost {
                lives_left: self.player.lives,
            });
            info!(
                kind = ?ghost.kind(),
                at = %self.player.pos(),
                lives_left = self.player.lives,
                "caught by ghost"
            );
            if self.player.lives == 0 {
                self.phase = Phase::Defeat;
                events.push(GameEvent::Defeat);
                info!(score = self.player.score, level = self.level, "defeat");
                break;
            }
            self.player.respawn(&self.map, self.map.spawn_tile())?;
        }
        Ok(events)
    }

    fn apply(
        &mut self,
        intent: Intent,
        now: f64,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        match intent {
            Intent::Quit => self.running = false,
            Intent::Restart if self.phase.is_over() => {
                *self = Game::new(rng, now)?;
            }
            Intent::Restart => {}
            _ if self.phase.is_over() => {}
            Intent::Move(dir) => {
                self.player.walk(dir, &self.map);
            }
            Intent::SkipLevel => self.advance_level(now, rng, events)?,
        }
        Ok(())
    }

    fn advance_level(
        &mut self,
        now: f64,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        events.push(GameEvent::LevelCleared { level: self.level });
        if self.level >= MAX_LEVEL {
            self.phase = Phase::Victory;
            events.push(GameEvent::Victory);
            info!(score = self.player.score, "victory");
            return Ok(());
        }

        self.level += 1;
        self.map = Map::generate(self.level, rng)?;
        self.player.respawn(&self.map, self.map.spawn_tile())?;
        self.ghosts = roster(&self.map, now)?;
        info!(
            level = self.level,
            size = self.map.size(),
            ghosts = self.ghosts.len(),
            "level started"
        );
        Ok(())
    }
}

/// Ghosts for the map's level: a basic ghost in the centre, a wall phaser in
/// the top-right corner from level 3, an area-effect ghost near the
/// bottom-right corner from level 5.
fn roster(map: &Map, now: f64) -> Result<Vec<Ghost>> {
    let size = map.size();
    let mut ghosts = vec![Ghost::spawn(map, map.center(), GhostKind::Basic, now)?];
    if map.level() >= WALL_PHASER_LEVEL {
        ghosts.push(Ghost::spawn(
            map,
            Pos::new(size - 1, 0),
            GhostKind::WallPhaser,
            now,
        )?);
    }
    if map.level() >= AREA_EFFECT_LEVEL {
        ghosts.push(Ghost::spawn(
            map,
            Pos::new(size - 2, size - 2),
            GhostKind::AreaEffect,
            now,
        )?);
    }
    Ok(ghosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_game(seed: u64) -> (Game, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = Game::new(&mut rng, 0.0).unwrap();
        (game, rng)
    }

    fn clear_points(game: &mut Game) {
        let size = game.map.size();
        for y in 0..size {
            for x in 0..size {
                game.map.take_point(Pos::new(x, y));
            }
        }
    }

    #[test]
    fn first_level_layout() {
        let (game, _) = new_game(1);
        assert_eq!(game.level(), 1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.map().size(), 5);
        assert_eq!(game.player().pos(), Pos::new(2, 4));
        assert_eq!(game.map().points_left(), 24);
        assert_eq!(game.ghosts().len(), 1);
        assert_eq!(game.ghosts()[0].kind(), GhostKind::Basic);
        assert_eq!(game.ghosts()[0].pos(), Pos::new(2, 2));
    }

    #[test]
    fn moving_onto_a_point_scores_it() {
        let (mut game, mut rng) = new_game(2);
        let spawn = game.player().pos();
        let dir = Dir::ALL
            .into_iter()
            .find(|d| game.map().can_cross(spawn, *d, false).is_some())
            .unwrap();
        let events = game.tick(&[Intent::Move(dir)], 0.0, &mut rng).unwrap();
        assert!(events.is_empty());
        assert_ne!(game.player().pos(), spawn);
        assert_eq!(game.player().score, 1);
        assert_eq!(game.map().points_left(), 23);
    }

    #[test]
    fn eating_every_point_advances_the_level() {
        let (mut game, mut rng) = new_game(3);
        game.player.score = 24;
        clear_points(&mut game);
        let events = game.tick(&[], 0.0, &mut rng).unwrap();
        assert_eq!(events, vec![GameEvent::LevelCleared { level: 1 }]);
        assert_eq!(game.level(), 2);
        assert_eq!(game.map().size(), 6);
        assert_eq!(game.player().pos(), game.map().spawn_tile());
        assert_eq!(game.player().score, 24);
        assert_eq!(game.map().points_left(), 35);
    }

    #[test]
    fn roster_grows_with_level() {
        let (mut game, mut rng) = new_game(4);
        game.tick(&[Intent::SkipLevel, Intent::SkipLevel], 0.0, &mut rng)
            .unwrap();
        assert_eq!(game.level(), 3);
        let kinds: Vec<_> = game.ghosts().iter().map(Ghost::kind).collect();
        assert_eq!(kinds, vec![GhostKind::Basic, GhostKind::WallPhaser]);
        assert_eq!(game.ghosts()[1].pos(), Pos::new(6, 0));

        game.tick(&[Intent::SkipLevel, Intent::SkipLevel], 0.0, &mut rng)
            .unwrap();
        assert_eq!(game.level(), 5);
        assert_eq!(game.ghosts().len(), 3);
        assert_eq!(game.ghosts()[2].kind(), GhostKind::AreaEffect);
        assert_eq!(game.ghosts()[2].pos(), Pos::new(7, 7));
    }

    #[test]
    fn clearing_the_last_level_is_victory() {
        let (mut game, mut rng) = new_game(5);
        let skips = [Intent::SkipLevel; 6];
        game.tick(&skips, 0.0, &mut rng).unwrap();
        assert_eq!(game.level(), MAX_LEVEL);

        let events = game.tick(&[Intent::SkipLevel], 0.0, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::LevelCleared { level: 7 }, GameEvent::Victory]
        );
        assert_eq!(game.phase(), Phase::Victory);

        let pos = game.player().pos();
        let events = game
            .tick(&[Intent::Move(Dir::Up), Intent::SkipLevel], 1.0, &mut rng)
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(game.player().pos(), pos);
        assert_eq!(game.level(), MAX_LEVEL);
    }

    #[test]
    fn restart_only_acts_after_game_over() {
        let (mut game, mut rng) = new_game(6);
        game.tick(&[Intent::SkipLevel, Intent::Restart], 0.0, &mut rng)
            .unwrap();
        assert_eq!(game.level(), 2);

        game.phase = Phase::Defeat;
        game.tick(&[Intent::Restart], 0.0, &mut rng).unwrap();
        assert_eq!(game.level(), 1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.player().lives, 3);
        assert_eq!(game.player().score, 0);
    }

    #[test]
    fn quit_stops_the_game() {
        let (mut game, mut rng) = new_game(7);
        assert!(game.is_running());
        game.tick(&[Intent::Quit], 0.0, &mut rng).unwrap();
        assert!(!game.is_running());
    }

    #[test]
    fn ghost_contact_costs_a_life_and_respawns() {
        let (mut game, mut rng) = new_game(8);
        let spawn = game.map.spawn_tile();
        let dir = Dir::ALL
            .into_iter()
            .find(|d| game.map.can_cross(spawn, *d, false).is_some())
            .unwrap();
        game.player.walk(dir, &game.map);
        let caught_at = game.player.pos();
        game.ghosts = vec![Ghost::spawn(&game.map, caught_at, GhostKind::Basic, 1.0).unwrap()];

        let events = game.tick(&[], 1.0, &mut rng).unwrap();
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
        assert_eq!(game.player().lives, 2);
        assert_eq!(game.player().pos(), spawn);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn losing_the_last_life_is_defeat() {
        let (mut game, mut rng) = new_game(9);
        game.player.lives = 1;
        let at = game.player.pos();
        game.ghosts = vec![Ghost::spawn(&game.map, at, GhostKind::Basic, 1.0).unwrap()];

        let events = game.tick(&[], 1.0, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::LifeLost { lives_left: 0 }, GameEvent::Defeat]
        );
        assert_eq!(game.phase(), Phase::Defeat);
        assert!(game.tick(&[], 2.0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn active_area_ghost_catches_with_its_whole_footprint() {
        let (mut game, mut rng) = new_game(10);
        let at = game.player.pos();
        let corner = Pos::new(at.x - 1, at.y - 1);
        // t = 0 opens the special window, and the ghost was just placed so it
        // cannot move yet.
        game.ghosts = vec![Ghost::spawn(&game.map, corner, GhostKind::AreaEffect, 0.0).unwrap()];

        let events = game.tick(&[], 0.0, &mut rng).unwrap();
        assert!(game.ghosts()[0].special_active());
        assert_eq!(game.ghosts()[0].pos(), corner);
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
    }
}
