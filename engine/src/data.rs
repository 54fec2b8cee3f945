//! Static spawn data for the creatures the demo levels use.

use crate::{ecs::*, prelude::*, NORMAL_SPEED};

/// Spawn template for one kind of monster.
pub struct MonsterSeed {
    pub name: &'static str,
    pub icon: char,
    pub speed: u8,
    pub hp: i32,
    pub damage: i32,
    pub perception: i32,
    pub never_moves: bool,
    /// Experience awarded for the kill.
    pub value: i32,
}

pub const WOLF: MonsterSeed = MonsterSeed {
    name: "wolf",
    icon: 'w',
    speed: 3,
    hp: 8,
    damage: 3,
    perception: 6,
    never_moves: false,
    value: 15,
};

pub const ORC: MonsterSeed = MonsterSeed {
    name: "orc",
    icon: 'o',
    speed: NORMAL_SPEED,
    hp: 12,
    damage: 4,
    perception: 3,
    never_moves: false,
    value: 20,
};

pub const MOLD: MonsterSeed = MonsterSeed {
    name: "grasping mold",
    icon: 'm',
    speed: NORMAL_SPEED,
    hp: 15,
    damage: 2,
    perception: 0,
    never_moves: true,
    value: 5,
};

impl Runtime {
    pub fn spawn_monster(
        &mut self,
        seed: &MonsterSeed,
        loc: Location,
    ) -> Entity {
        let e = Entity(self.ecs.spawn((
            Name(seed.name.into()),
            Icon(seed.icon),
            Speed(seed.speed),
            IsMob(true),
            Hp(seed.hp),
            MaxHp(seed.hp),
            Damage(seed.damage),
            Perception(seed.perception),
            Value(seed.value),
        )));
        if seed.never_moves {
            e.set(self, NeverMoves(true));
            // A rooted thing is always awake, it has nowhere to be anyway.
            e.set(self, Alertness::Alert);
        }
        self.placement.place_mob(loc, e);
        e
    }
}
