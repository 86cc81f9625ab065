use std::collections::VecDeque;

use crate::coords::{Dir, Pos};
use crate::error::Result;
use crate::map::Map;

/// Breadth-first shortest path from `from` to `to`.
///
/// The returned tiles exclude `from` and end with `to`; an empty path means
/// the two already coincide. Neighbours are expanded in
/// [`Dir::PURSUIT_ORDER`], so ties always break the same way. With
/// `pass_walls` every in-bounds neighbour is an edge. Either end lying off
/// the grid is an error, not an unreachable target.
pub fn shortest_path(map: &Map, from: Pos, to: Pos, pass_walls: bool) -> Result<Option<Vec<Pos>>> {
    map.ensure_contains(from)?;
    map.ensure_contains(to)?;
    if from == to {
        return Ok(Some(Vec::new()));
    }
    let size = map.size();
    let mut parent: Vec<Vec<Option<Pos>>> = vec![vec![None; size]; size];
    let mut seen = vec![vec![false; size]; size];
    let mut q = VecDeque::new();
    seen[from.y][from.x] = true;
    q.push_back(from);

    while let Some(pos) = q.pop_front() {
        for dir in Dir::PURSUIT_ORDER {
            let Some(next) = map.can_cross(pos, dir, pass_walls) else {
                continue;
            };
            if seen[next.y][next.x] {
                continue;
            }
            seen[next.y][next.x] = true;
            parent[next.y][next.x] = Some(pos);
            if next == to {
                return Ok(Some(unwind(&parent, from, to)));
            }
            q.push_back(next);
        }
    }
    Ok(None)
}

fn unwind(parent: &[Vec<Option<Pos>>], from: Pos, to: Pos) -> Vec<Pos> {
    let mut path = vec![to];
    let mut at = to;
    while let Some(prev) = parent[at.y][at.x] {
        if prev == from {
            break;
        }
        path.push(prev);
        at = prev;
    }
    path.reverse();
    path
}
