use crate::prelude::*;

/// Cell coordinates on the level map.
pub type Location = IVec2;

/// Game state queries hung off map locations.
pub trait LocExt: Sized {
    /// The 8 neighboring cells in fixed scan order, orthogonals first.
    fn neighbors_8(self) -> [Self; 8];

    fn tile(self, r: &Runtime) -> Tile;

    /// Can a walking creature enter this cell, terrain-wise.
    fn is_passable(self, r: &Runtime) -> bool;

    /// Has the player seen this cell at some point.
    fn is_known(self, r: &Runtime) -> bool;

    /// Is the cell in the player's current field of view.
    fn is_visible(self, r: &Runtime) -> bool;

    fn mob_at(self, r: &Runtime) -> Option<Entity>;

    fn item_at(self, r: &Runtime) -> Option<Entity>;

    /// Count of wall-like cells among the 8 neighbors.
    ///
    /// Seven walls around a floor cell mark a dead end that smells of a
    /// secret door.
    fn solid_neighbor_count(self, r: &Runtime) -> usize;
}

impl LocExt for Location {
    fn neighbors_8(self) -> [Location; 8] {
        DIR_8.map(|d| self + d)
    }

    fn tile(self, r: &Runtime) -> Tile {
        r.level.tile(self)
    }

    fn is_passable(self, r: &Runtime) -> bool {
        r.level.in_bounds(self) && self.tile(r).is_passable()
    }

    fn is_known(self, r: &Runtime) -> bool {
        r.level.is_known(self)
    }

    fn is_visible(self, r: &Runtime) -> bool {
        r.level.is_visible(self)
    }

    fn mob_at(self, r: &Runtime) -> Option<Entity> {
        r.placement.mob_at(self)
    }

    fn item_at(self, r: &Runtime) -> Option<Entity> {
        r.placement.item_at(self)
    }

    fn solid_neighbor_count(self, r: &Runtime) -> usize {
        self.neighbors_8()
            .into_iter()
            .filter(|&loc| {
                !r.level.in_bounds(loc) || loc.tile(r).is_solid_wall()
            })
            .count()
    }
}
