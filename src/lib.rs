//! Core of a maze-chase arcade game: a randomized maze generator, ghosts
//! that hunt the player by breadth-first search with timed special
//! abilities, and the orchestrator that ties levels, points and lives
//! together. Rendering, audio and input devices live outside this library;
//! they read the state exposed here and feed [`game::Intent`]s back in.

pub mod config;
pub mod coords;
pub mod error;
pub mod game;
pub mod ghost;
pub mod map;
pub mod player;
pub mod pursuit;
pub mod tile;

pub use coords::{Dir, Pos};
pub use error::{GameError, Result};
pub use game::{Game, GameEvent, Intent, Phase};
pub use ghost::{Ghost, GhostKind, PursuitDice};
pub use map::Map;
pub use player::Player;
pub use tile::Tile;
