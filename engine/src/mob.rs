//! Entity logic for active creatures.

use rand::Rng;

use crate::{ecs::*, prelude::*, ENERGY_GAIN};

impl Entity {
    pub fn is_player(&self, r: &Runtime) -> bool {
        r.player == Some(*self)
    }

    pub fn is_mob(&self, r: &Runtime) -> bool {
        self.get::<IsMob>(r).0
    }

    pub fn is_item(&self, r: &Runtime) -> bool {
        self.get::<IsItem>(r).0
    }

    pub fn speed(&self, r: &Runtime) -> u8 {
        self.get::<Speed>(r).0
    }

    pub fn energy(&self, r: &Runtime) -> i32 {
        self.get::<Energy>(r).0
    }

    /// Per-tick energy increment from the speed rating table.
    pub fn energy_gain(&self, r: &Runtime) -> i32 {
        ENERGY_GAIN[self.speed(r) as usize % ENERGY_GAIN.len()]
    }

    pub(crate) fn give_energy(&self, r: &mut Runtime) {
        let gain = self.energy_gain(r);
        self.with_mut::<Energy, _>(r, |e| e.0 += gain);
    }

    /// Debit a completed action's cost. Never drives energy negative, an
    /// actor is only granted an action at or above the full threshold.
    pub(crate) fn spend_energy(&self, r: &mut Runtime, cost: i32) {
        debug_assert!(cost <= self.energy(r));
        self.with_mut::<Energy, _>(r, |e| e.0 -= cost);
    }

    pub fn can_act(&self, r: &Runtime) -> bool {
        self.energy(r) >= ENERGY_PER_TURN
    }

    pub fn is_alert(&self, r: &Runtime) -> bool {
        self.get::<Alertness>(r) == Alertness::Alert
    }

    pub(crate) fn wake(&self, r: &mut Runtime) {
        if self.is_alert(r) {
            return;
        }
        self.set(r, Alertness::Alert);
        log::debug!("{} noticed the player", self.noun(r));

        // The first spotter raises the alarm. Its shout spreads as noise
        // and rouses any packmates it reaches.
        let Some(loc) = self.loc(r) else { return };
        msg!("{} shouts!", self.noun(r));
        r.rebuild_flow(ChannelId::MonsterNoise, loc);
        for m in r.mobs() {
            if m == *self || m.is_player(r) || m.is_alert(r) {
                continue;
            }
            let Some(m_loc) = m.loc(r) else { continue };
            if r.flow_dist(ChannelId::MonsterNoise, m_loc)
                <= crate::SHOUT_RADIUS
            {
                m.set(r, Alertness::Alert);
                log::debug!("{} is roused by the shout", m.noun(r));
            }
        }
    }

    /// Roll whether the monster picks out the player's noise this turn.
    ///
    /// The noise flow distance is how muffled the sound is by the time it
    /// arrives, perception is pitted against it.
    pub(crate) fn hears_player(&self, r: &mut Runtime) -> bool {
        let Some(loc) = self.loc(r) else {
            return false;
        };
        let noise = r.flow_dist(ChannelId::Noise, loc);
        if noise >= FLOW_MAX {
            return false;
        }
        let Perception(skill) = self.get(r);
        let roll: i32 = r.rng().gen_range(1..=10);
        roll + skill > noise as i32 + 5
    }

    pub fn hp(&self, r: &Runtime) -> i32 {
        self.get::<Hp>(r).0
    }

    /// Treasure value accumulated so far.
    pub fn loot(&self, r: &Runtime) -> i32 {
        self.get::<Loot>(r).0
    }

    pub(crate) fn heal(&self, r: &mut Runtime, amount: i32) {
        let MaxHp(max) = self.get(r);
        self.with_mut::<Hp, _>(r, |hp| hp.0 = (hp.0 + amount).min(max));
    }

    pub(crate) fn damage(&self, r: &mut Runtime, amount: i32) {
        let hp = self.hp(r) - amount;
        self.set(r, Hp(hp));
        if hp <= 0 {
            self.die(r);
        }
    }

    pub(crate) fn die(&self, r: &mut Runtime) {
        msg!("{} dies.", self.noun(r));
        if let Some(loc) = self.loc(r) {
            send_msg(Msg::Death(loc));
        }
        // Killing things is what experience comes from.
        if !self.is_player(r) {
            if let Some(player) = r.player() {
                let Value(worth) = self.get(r);
                player.with_mut::<Exp, _>(r, |e| e.0 += worth.max(10));
            }
        }
        r.despawn(*self);
    }

    pub(crate) fn place(&self, r: &mut Runtime, loc: Location) {
        r.placement.place_mob(loc, *self);
        if self.is_player(r) {
            r.update_fov();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn shout_carries_only_so_far() {
        let mut r = Runtime::from_map(
            "#############\n\
             #@.o...o...o#\n\
             #############",
        )
        .unwrap();
        let p = r.player().unwrap();
        let mobs: Vec<Entity> =
            r.mobs().into_iter().filter(|e| *e != p).collect();
        let (near, mid, far) = (mobs[0], mobs[1], mobs[2]);

        near.wake(&mut r);

        assert!(near.is_alert(&r));
        // The shout reaches the middle monster along the noise flow...
        assert!(mid.is_alert(&r));
        // ...but has attenuated into nothing by the far end.
        assert!(!far.is_alert(&r));
    }
}
