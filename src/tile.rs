use crate::coords::Dir;

/// One grid cell: a wall flag per side and an optional collectible point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    walls: [bool; 4],
    pub has_point: bool,
}

impl Tile {
    /// A closed tile with no point, the state every tile starts in before
    /// carving.
    pub const fn closed() -> Self {
        Self {
            walls: [true; 4],
            has_point: false,
        }
    }

    pub const fn open() -> Self {
        Self {
            walls: [false; 4],
            has_point: false,
        }
    }

    pub fn wall(&self, side: Dir) -> bool {
        self.walls[side.index()]
    }

    pub(crate) fn set_wall(&mut self, side: Dir, present: bool) {
        self.walls[side.index()] = present;
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::closed()
    }
}
