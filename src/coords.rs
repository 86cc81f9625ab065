/// A tile coordinate. `x` grows to the right, `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    /// The neighbouring tile in `dir`, or `None` if it would leave a
    /// `size`x`size` grid.
    pub fn step(self, dir: Dir, size: usize) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = self.x as isize + dx;
        let ny = self.y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Pos {
            x: nx as usize,
            y: ny as usize,
        };
        next.in_bounds(size).then_some(next)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal directions. Also names the side of a tile a wall
/// sits on: `Up` is the top wall, `Down` the bottom wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Neighbour expansion order used by the pursuit search. Fixed so that
    /// equal-length paths always resolve the same way.
    pub const PURSUIT_ORDER: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Down, Dir::Up];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// Maps a unit vector back to its direction. Anything else (diagonals,
    /// zero, longer steps) is `None`.
    pub fn from_delta(dx: isize, dy: isize) -> Option<Dir> {
        match (dx, dy) {
            (0, -1) => Some(Dir::Up),
            (0, 1) => Some(Dir::Down),
            (-1, 0) => Some(Dir::Left),
            (1, 0) => Some(Dir::Right),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Dir::Up => 0,
            Dir::Down => 1,
            Dir::Left => 2,
            Dir::Right => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_grid() {
        let corner = Pos::new(0, 0);
        assert_eq!(corner.step(Dir::Up, 5), None);
        assert_eq!(corner.step(Dir::Left, 5), None);
        assert_eq!(corner.step(Dir::Right, 5), Some(Pos::new(1, 0)));
        assert_eq!(Pos::new(4, 4).step(Dir::Down, 5), None);
        assert_eq!(Pos::new(4, 3).step(Dir::Down, 5), Some(Pos::new(4, 4)));
    }

    #[test]
    fn from_delta_round_trips_unit_vectors_only() {
        for dir in Dir::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(Dir::from_delta(dx, dy), Some(dir));
        }
        assert_eq!(Dir::from_delta(1, 1), None);
        assert_eq!(Dir::from_delta(0, 0), None);
        assert_eq!(Dir::from_delta(2, 0), None);
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in Dir::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
