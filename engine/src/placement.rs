//! Spatial index of entity positions.

use crate::prelude::*;

/// Position bookkeeping for entities on the level.
///
/// Mobs block their cell, items share theirs (one item per cell is enough
/// for this game). Every mutation goes through `place`/`remove` so the two
/// directions of the index can't drift apart.
#[derive(Default)]
pub struct Placement {
    mobs: HashMap<Location, Entity>,
    items: HashMap<Location, Entity>,
    locs: HashMap<Entity, Location>,
}

impl Placement {
    pub fn mob_at(&self, loc: Location) -> Option<Entity> {
        self.mobs.get(&loc).copied()
    }

    pub fn item_at(&self, loc: Location) -> Option<Entity> {
        self.items.get(&loc).copied()
    }

    pub fn loc(&self, e: Entity) -> Option<Location> {
        self.locs.get(&e).copied()
    }

    pub fn all_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.locs.keys().copied()
    }

    pub(crate) fn place_mob(&mut self, loc: Location, e: Entity) {
        self.remove(e);
        debug_assert!(
            !self.mobs.contains_key(&loc),
            "Placement: mob cell collision"
        );
        self.mobs.insert(loc, e);
        self.locs.insert(e, loc);
    }

    pub(crate) fn place_item(&mut self, loc: Location, e: Entity) {
        self.remove(e);
        self.items.insert(loc, e);
        self.locs.insert(e, loc);
    }

    pub(crate) fn remove(&mut self, e: Entity) {
        if let Some(loc) = self.locs.remove(&e) {
            if self.mobs.get(&loc) == Some(&e) {
                self.mobs.remove(&loc);
            }
            if self.items.get(&loc) == Some(&e) {
                self.items.remove(&loc);
            }
        }
    }
}
