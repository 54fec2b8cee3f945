use serde::{Deserialize, Serialize};
use util::Grid;

use crate::prelude::*;

/// How many ticks a scent marker stays trackable.
pub const SMELL_STRENGTH: u16 = 60;

/// Spread stencil for laying scent around the player, row-major 5×5.
/// `None` cells are the cut corners that scent does not reach.
const SCENT_SPREAD: [[Option<u16>; 5]; 5] = [
    [None, Some(2), Some(2), Some(2), None],
    [Some(2), Some(1), Some(1), Some(1), Some(2)],
    [Some(2), Some(1), Some(0), Some(1), Some(2)],
    [Some(2), Some(1), Some(1), Some(1), Some(2)],
    [None, Some(2), Some(2), Some(2), None],
];

/// A trap on a floor cell. Hidden traps don't penalize pathing until seen.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize,
)]
pub struct Trap {
    pub visible: bool,
}

/// The dungeon level: terrain, trap overlay, observer knowledge and the
/// scent field. Read-only to the flow and AI layers.
#[derive(Clone, Serialize, Deserialize)]
pub struct Level {
    tiles: Grid<Tile>,
    traps: Grid<Option<Trap>>,
    /// Cells the player has seen at some point.
    known: Grid<bool>,
    /// Cells in the player's current field of view.
    visible: Grid<bool>,
    /// Scent timestamps, 0 is no scent.
    scent: Grid<u16>,
    scent_when: u16,
}

impl Level {
    pub fn new(dim: impl Into<IVec2>) -> Self {
        let dim = dim.into();
        Level {
            tiles: Grid::new(dim, Tile::default()),
            traps: Grid::new(dim, None),
            known: Grid::new(dim, false),
            visible: Grid::new(dim, false),
            scent: Grid::new(dim, 0),
            scent_when: 0,
        }
    }

    pub fn dim(&self) -> IVec2 {
        self.tiles.dim()
    }

    pub fn in_bounds(&self, loc: Location) -> bool {
        self.tiles.contains(loc)
    }

    /// Tile at the cell, out-of-bounds reads as solid wall.
    pub fn tile(&self, loc: Location) -> Tile {
        self.tiles.get(loc).copied().unwrap_or_default()
    }

    pub fn set_tile(&mut self, loc: Location, t: Tile) {
        self.tiles[loc] = t;
    }

    pub fn cells(&self) -> impl Iterator<Item = Location> + '_ {
        self.tiles.iter_cells()
    }

    pub fn trap_at(&self, loc: Location) -> Option<Trap> {
        self.traps.get(loc).copied().flatten()
    }

    pub fn add_trap(&mut self, loc: Location, visible: bool) {
        self.traps[loc] = Some(Trap { visible });
    }

    pub fn reveal_trap(&mut self, loc: Location) {
        if let Some(Some(t)) = self.traps.get_mut(loc) {
            t.visible = true;
        }
    }

    /// Situational pathing penalty from the terrain itself.
    pub fn terrain_extra_cost(&self, loc: Location) -> u16 {
        match self.trap_at(loc) {
            Some(t) if t.visible => 3,
            _ => 0,
        }
    }

    pub fn is_known(&self, loc: Location) -> bool {
        self.known.get(loc).copied().unwrap_or(false)
    }

    pub fn mark_known(&mut self, loc: Location) {
        if let Some(c) = self.known.get_mut(loc) {
            *c = true;
        }
    }

    pub fn is_visible(&self, loc: Location) -> bool {
        self.visible.get(loc).copied().unwrap_or(false)
    }

    pub(crate) fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    pub(crate) fn mark_visible(&mut self, loc: Location) {
        if let Some(c) = self.visible.get_mut(loc) {
            *c = true;
        }
    }

    /// Advance the scent clock one step and expire stale markers.
    pub(crate) fn age_scent(&mut self) {
        self.scent_when = self.scent_when.wrapping_add(1);
        if self.scent_when == 0 {
            // The clock wrapped, old stamps would read as fresh. Start over.
            self.scent.fill(0);
            self.scent_when = 1;
        }
    }

    /// Lay a fresh scent marker spread around the given cell.
    pub(crate) fn lay_scent(&mut self, center: Location) {
        for (dy, row) in SCENT_SPREAD.iter().enumerate() {
            for (dx, spread) in row.iter().enumerate() {
                let Some(delay) = spread else { continue };
                let loc = center + ivec2(dx as i32 - 2, dy as i32 - 2);
                if !self.in_bounds(loc) || !self.tile(loc).is_passable() {
                    continue;
                }
                let stamp = self.scent_when.saturating_sub(*delay).max(1);
                self.scent[loc] = stamp;
            }
        }
    }

    /// Age of the scent on a cell, if any fresh enough to track. Lower is
    /// fresher.
    pub fn scent_age(&self, loc: Location) -> Option<u16> {
        let stamp = self.scent.get(loc).copied().unwrap_or(0);
        if stamp == 0 {
            return None;
        }
        let age = self.scent_when.wrapping_sub(stamp);
        (age < SMELL_STRENGTH).then_some(age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_level() -> Level {
        let mut level = Level::new([9, 9]);
        for loc in level.cells().collect::<Vec<_>>() {
            level.set_tile(loc, Tile::Floor);
        }
        level
    }

    #[test]
    fn scent_spreads_and_fades() {
        let mut level = open_level();
        let center = ivec2(4, 4);

        // A few clock steps in so the edge-of-stencil stamps have room to
        // be older than the middle.
        for _ in 0..3 {
            level.age_scent();
        }
        level.lay_scent(center);

        // Fresh underfoot, staler towards the stencil edge, absent at the
        // cut corners and beyond.
        assert_eq!(level.scent_age(center), Some(0));
        assert_eq!(level.scent_age(center + ivec2(1, 0)), Some(1));
        assert_eq!(level.scent_age(center + ivec2(2, 0)), Some(2));
        assert_eq!(level.scent_age(center + ivec2(2, 2)), None);
        assert_eq!(level.scent_age(center + ivec2(3, 0)), None);

        // An old trail fades out entirely.
        for _ in 0..SMELL_STRENGTH {
            level.age_scent();
        }
        assert_eq!(level.scent_age(center), None);
    }

    #[test]
    fn walls_hold_no_scent() {
        let mut level = open_level();
        level.set_tile(ivec2(5, 4), Tile::Wall);
        level.age_scent();
        level.lay_scent(ivec2(4, 4));
        assert_eq!(level.scent_age(ivec2(5, 4)), None);
    }

    #[test]
    fn trap_cost_needs_visibility() {
        let mut level = open_level();
        level.add_trap(ivec2(2, 2), false);
        assert_eq!(level.terrain_extra_cost(ivec2(2, 2)), 0);
        level.reveal_trap(ivec2(2, 2));
        assert_eq!(level.terrain_extra_cost(ivec2(2, 2)), 3);
    }
}
