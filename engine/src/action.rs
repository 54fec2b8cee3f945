//! Entities doing things.

use rand::Rng;
use serde::{Deserialize, Serialize};
use util::RngExt;

use crate::{ecs::*, prelude::*, TORCH_FUEL};

/// Atomic single-turn actions.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub enum Action {
    Pass,
    /// "Dumb step", only move. Used when a goal AI is driving.
    Step(IVec2),
    /// "Smart step", attack enemies and bash doors when running into them.
    Bump(IVec2),
    /// Study the surroundings for secret doors and hidden traps.
    Search,
    Pickup,
    Descend,
    /// Swap a spare torch in for the dying one.
    Refuel,
    /// Spend experience on a skill. Bookkeeping, takes no game time.
    RaiseSkill(Skill),
}

impl Action {
    /// Energy debited when the action completes.
    pub fn cost(&self) -> i32 {
        match self {
            Action::RaiseSkill(_) => 0,
            _ => ENERGY_PER_TURN,
        }
    }
}

impl Entity {
    /// Run the action against the world. Returns false when the action
    /// aborts before changing anything, in which case no energy may be
    /// charged for it.
    pub(crate) fn execute(&self, r: &mut Runtime, action: Action) -> bool {
        use Action::*;
        match action {
            Pass => true,
            Step(dir) => self.step(r, dir),
            Bump(dir) => self.bump(r, dir),
            Search => self.search(r),
            Pickup => self.pickup(r),
            Descend => self.descend(r),
            Refuel => self.refuel(r),
            RaiseSkill(skill) => self.raise_skill(r, skill),
        }
    }

    pub fn is_enemy(&self, r: &Runtime, other: &Entity) -> bool {
        self.is_player(r) != other.is_player(r)
    }

    fn step(&self, r: &mut Runtime, dir: IVec2) -> bool {
        debug_assert!(dir.is_adjacent());
        let Some(loc) = self.loc(r) else { return false };
        let dest = loc + dir;

        if !dest.is_passable(r) || dest.mob_at(r).is_some() {
            return false;
        }

        self.place(r, dest);

        if let Some(trap) = r.level.trap_at(dest) {
            if !trap.visible {
                r.level.reveal_trap(dest);
            }
            msg!("{} stumbles into a trap.", self.noun(r));
            self.damage(r, 2);
        }
        true
    }

    fn bump(&self, r: &mut Runtime, dir: IVec2) -> bool {
        let Some(loc) = self.loc(r) else { return false };
        let dest = loc + dir;

        if let Some(mob) = dest.mob_at(r) {
            if self.is_enemy(r, &mob) {
                self.attack(r, mob);
                return true;
            }
            return false;
        }

        if dest.tile(r) == Tile::Door {
            // Reduce the door to kindling instead of opening it.
            r.level.set_tile(dest, Tile::Floor);
            msg!("{} smashes the door open.", self.noun(r));
            if self.is_player(r) {
                r.update_fov();
            }
            return true;
        }

        self.step(r, dir)
    }

    fn attack(&self, r: &mut Runtime, target: Entity) {
        let Damage(dmg) = self.get(r);
        let spread = r.rng().gen_range(0..=2);
        msg!("{} hits {}.", self.noun(r), target.noun(r));
        target.damage(r, dmg + spread);
    }

    fn search(&self, r: &mut Runtime) -> bool {
        let Some(loc) = self.loc(r) else { return false };
        let Perception(skill) = self.get(r);

        for n in loc.neighbors_8() {
            if !r.level.in_bounds(n) {
                continue;
            }
            if n.tile(r) == Tile::SecretDoor
                && r.rng().percent_chance((20 + skill * 5) as u32)
            {
                r.level.set_tile(n, Tile::Door);
                msg!("{} finds a secret door!", self.noun(r));
            }
            match r.level.trap_at(n) {
                Some(t)
                    if !t.visible
                        && r.rng().percent_chance((30 + skill * 5) as u32) =>
                {
                    r.level.reveal_trap(n);
                    msg!("{} notices a trap.", self.noun(r));
                }
                _ => {}
            }
        }
        if self.is_player(r) {
            r.update_fov();
        }
        true
    }

    fn pickup(&self, r: &mut Runtime) -> bool {
        let Some(loc) = self.loc(r) else { return false };
        let Some(item) = loc.item_at(r) else {
            return false;
        };

        let Value(worth) = item.get(r);
        if item.get::<IsTorch>(r).0 {
            self.with_mut::<Torches, _>(r, |t| t.0 += 1);
        } else {
            self.with_mut::<Loot, _>(r, |l| l.0 += worth);
        }
        msg!("{} picks up {}.", self.noun(r), item.noun(r));
        r.despawn(item);
        true
    }

    fn descend(&self, r: &mut Runtime) -> bool {
        let Some(loc) = self.loc(r) else { return false };
        if loc.tile(r) != Tile::StairsDown {
            return false;
        }
        msg!("{} descends the stairs.", self.noun(r));
        r.descended = true;
        true
    }

    fn refuel(&self, r: &mut Runtime) -> bool {
        let Torches(spares) = self.get(r);
        if spares <= 0 {
            return false;
        }
        self.set(r, Torches(spares - 1));
        self.set(r, LightFuel(TORCH_FUEL));
        msg!("{} lights a fresh torch.", self.noun(r));
        true
    }

    fn raise_skill(&self, r: &mut Runtime, skill: Skill) -> bool {
        let ranks: Skills = self.get(r);
        let price = (ranks.rank(skill) + 1) * 100;
        let Exp(points) = self.get(r);
        if points < price {
            return false;
        }
        self.set(r, Exp(points - price));
        self.with_mut::<Skills, _>(r, |s| s.raise(skill));
        msg!("{} improves at {:?}.", self.noun(r), skill);
        true
    }
}
