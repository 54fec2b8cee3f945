//! Energy-based cooperative turn scheduling.
//!
//! Every clock tick feeds each actor energy according to its speed rating.
//! Anyone at or past the action threshold gets a turn, monsters that have
//! outpaced the player going first, then the player, then the rest. The
//! clock only advances once nobody can act.

use rand::seq::SliceRandom;
use util::RngExt;

use crate::{data, ecs::*, prelude::*};

impl Runtime {
    /// Advance the scheduler by one unit of work.
    ///
    /// At most one actor acts per call, and it is returned. `None` means
    /// either the clock advanced because nobody was ready, or the player
    /// holds the turn and needs external input, see `awaiting_input`.
    pub fn tick(&mut self) -> Option<Entity> {
        let player = self.player();
        let player_energy = player.map_or(0, |p| p.energy(self));

        let monsters: Vec<Entity> = self
            .mobs()
            .into_iter()
            .filter(|e| Some(*e) != player)
            .collect();

        // First sweep: only monsters that have strictly outpaced the player
        // act, so the player never observes out-of-order effects.
        if let Some(&m) = monsters
            .iter()
            .find(|m| m.can_act(self) && m.energy(self) > player_energy)
        {
            self.monster_turn(m);
            return Some(m);
        }

        // The player's turn.
        if let Some(p) = player {
            if p.can_act(self) {
                let goal = p.goal(self);
                if goal.is_some() {
                    if let Some(act) = p.decide(self, goal) {
                        if self.perform(p, act) {
                            return Some(p);
                        }
                    }
                    // The intent ran out or its action fell through.
                    // Cancel between actions, no energy was spent.
                    p.next_goal(self);
                    return None;
                }
                // Holding the turn for external input.
                return None;
            }
        }

        // Second sweep: remaining ready monsters.
        if let Some(&m) = monsters.iter().find(|m| m.can_act(self)) {
            self.monster_turn(m);
            return Some(m);
        }

        // Nobody is ready, the clock moves.
        self.advance_clock();
        None
    }

    /// True when the scheduler is stalled on the player's decision.
    pub fn awaiting_input(&self) -> bool {
        self.player().is_some_and(|p| {
            p.can_act(self) && !p.goal(self).is_some()
        })
    }

    /// Submit an action for an actor, normally the player answering
    /// `awaiting_input`. Accepted actions debit energy. Rejected submissions
    /// (actor not eligible, or the action aborted against the world state)
    /// change nothing.
    pub fn request_action(&mut self, e: Entity, action: Action) -> bool {
        if !e.is_alive(self) || !e.can_act(self) {
            return false;
        }
        if e.is_player(self) {
            // Fresh direct input always cancels a pending intent.
            self.interrupt(e);
        }
        self.perform(e, action)
    }

    /// Cancel an actor's pending multi-turn intent. Cancellation happens
    /// strictly between actions, never partway through one.
    pub fn interrupt(&mut self, e: Entity) {
        if e.goal(self).is_some() {
            e.clear_goal(self);
        }
    }

    /// Run an action to completion and charge for it.
    fn perform(&mut self, e: Entity, action: Action) -> bool {
        let cost = action.cost();
        if e.execute(self, action) {
            e.spend_energy(self, cost);
            true
        } else {
            false
        }
    }

    fn advance_clock(&mut self) {
        for e in self.mobs() {
            e.give_energy(self);
        }
        self.turn += 1;
        self.process_world();
    }

    /// Periodic world upkeep, gated on the clock.
    fn process_world(&mut self) {
        if self.turn % 10 != 0 {
            return;
        }

        if self.turn % 1000 == 0 {
            // Coarse bookkeeping checkpoint.
            log::info!(
                "turn {}: {} mobs on the level",
                self.turn,
                self.mobs().len()
            );
        }

        // Regeneration.
        for e in self.mobs() {
            e.heal(self, 1);
        }

        if let Some(p) = self.player() {
            // The wielded torch burns down.
            let LightFuel(fuel) = p.get(self);
            if fuel > 0 {
                p.set(self, LightFuel((fuel - 10).max(0)));
                if fuel <= 10 {
                    msg!("The torch gutters out.");
                }
            }

            // The player's scent trail ages and spreads.
            if let Some(loc) = p.loc(self) {
                self.level.age_scent();
                self.level.lay_scent(loc);
            }
        }

        // Ambient wandering monster pressure.
        if self.rng().one_chance_in(50) {
            self.spawn_wanderer();
        }
    }

    /// Drop a new wandering monster somewhere out of the player's sight.
    fn spawn_wanderer(&mut self) {
        let spots: Vec<Location> = self
            .level
            .cells()
            .filter(|&c| {
                c.is_passable(self)
                    && c.mob_at(self).is_none()
                    && !c.is_visible(self)
            })
            .collect();
        let Some(&loc) = spots.choose(&mut self.rng) else {
            return;
        };

        let group = self.wander_groups().last().copied().unwrap_or(0) + 1;
        let e = self.spawn_monster(&data::ORC, loc);
        e.set(self, WanderGroup(group));
        log::debug!("a wanderer joins group {group} at {loc}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENERGY_GAIN;

    /// Fixture: an open room with two monsters and no player.
    fn arena() -> Runtime {
        Runtime::from_map(
            "########\n\
             #o....o#\n\
             ########",
        )
        .unwrap()
    }

    #[test]
    fn energy_is_monotonic_without_actions() {
        let mut r = Runtime::from_map("####\n#@.#\n####").unwrap();
        let p = r.player().unwrap();

        let mut prev = p.energy(&r);
        for _ in 0..1000 {
            r.tick();
            let cur = p.energy(&r);
            // The player never acts on its own without a goal, so energy
            // only ever rises.
            assert!(cur >= prev);
            prev = cur;
        }
        assert!(r.awaiting_input());

        // A completed action debits exactly its cost.
        let before = p.energy(&r);
        assert!(r.request_action(p, Action::Pass));
        assert_eq!(p.energy(&r), before - ENERGY_PER_TURN);
        assert!(p.energy(&r) >= 0);
    }

    #[test]
    fn rejected_actions_spend_nothing() {
        let mut r = Runtime::from_map("####\n#@.#\n####").unwrap();
        let p = r.player().unwrap();
        while !r.awaiting_input() {
            r.tick();
        }

        let before = p.energy(&r);
        // Walking into the wall aborts before anything happens.
        assert!(!r.request_action(p, Action::Step(ivec2(0, -1))));
        assert_eq!(p.energy(&r), before);
    }

    #[test]
    fn baseline_actor_acts_about_every_ten_ticks() {
        let mut r = arena();
        let mobs = r.mobs();
        let (a, b) = (mobs[0], mobs[1]);
        // One baseline actor, one that can't move at all.
        b.set(&mut r, Speed(0));

        let mut a_acts = 0;
        let mut b_acts = 0;
        while r.now() < 1000 {
            match r.tick() {
                Some(e) if e == a => a_acts += 1,
                Some(e) if e == b => b_acts += 1,
                _ => {}
            }
        }

        assert!((95..=105).contains(&a_acts), "baseline acts: {a_acts}");
        assert_eq!(b_acts, 0);
    }

    #[test]
    fn double_speed_doubles_throughput() {
        let mut r = arena();
        let mobs = r.mobs();
        let (a, b) = (mobs[0], mobs[1]);
        // Rating 4 gains energy twice as fast as rating 2.
        assert_eq!(ENERGY_GAIN[4], 2 * ENERGY_GAIN[2]);
        b.set(&mut r, Speed(4));

        let mut a_acts = 0f64;
        let mut b_acts = 0f64;
        while r.now() < 2000 {
            match r.tick() {
                Some(e) if e == a => a_acts += 1.0,
                Some(e) if e == b => b_acts += 1.0,
                _ => {}
            }
        }

        let ratio = b_acts / a_acts;
        assert!(
            (1.9..=2.1).contains(&ratio),
            "throughput ratio {ratio}, {a_acts} vs {b_acts}"
        );
    }

    #[test]
    fn outpacing_monsters_act_before_the_player() {
        let mut r = Runtime::from_map("#####\n#@.o#\n#####").unwrap();
        let p = r.player().unwrap();
        let m = r.mobs().into_iter().find(|e| *e != p).unwrap();

        p.set(&mut r, Energy(ENERGY_PER_TURN));
        m.set(&mut r, Energy(ENERGY_PER_TURN + 20));

        // The monster has strictly more energy, it moves first even though
        // the player is also ready.
        assert_eq!(r.tick(), Some(m));

        // Now the player holds the turn.
        assert_eq!(r.tick(), None);
        assert!(r.awaiting_input());
        assert!(r.request_action(p, Action::Pass));
    }

    #[test]
    fn ready_monsters_act_after_the_player_passes() {
        let mut r = Runtime::from_map("#####\n#@.o#\n#####").unwrap();
        let p = r.player().unwrap();
        let m = r.mobs().into_iter().find(|e| *e != p).unwrap();

        p.set(&mut r, Energy(ENERGY_PER_TURN + 20));
        m.set(&mut r, Energy(ENERGY_PER_TURN));

        // Tied or lower energy monsters wait for the player.
        assert_eq!(r.tick(), None);
        assert!(r.awaiting_input());
        assert!(r.request_action(p, Action::Pass));

        // With the player done, the remaining ready monster moves.
        assert_eq!(r.tick(), Some(m));
    }

    #[test]
    fn maintenance_fires_on_the_tens() {
        let mut r = Runtime::from_map("####\n#@.#\n####").unwrap();
        let p = r.player().unwrap();
        p.set(&mut r, Hp(5));

        // Regeneration only lands when the clock count hits a multiple of
        // ten.
        while r.now() < 9 {
            r.tick();
        }
        assert_eq!(p.hp(&r), 5);
        while r.now() < 10 {
            r.tick();
        }
        assert_eq!(p.hp(&r), 6);
    }

    #[test]
    fn rest_intent_is_interruptible() {
        let mut r = Runtime::from_map("####\n#@.#\n####").unwrap();
        let p = r.player().unwrap();
        p.set_goal(&mut r, Goal::Rest { turns: 10 });

        // Resting runs by itself.
        while r.now() < 30 && p.goal(&r).is_some() {
            r.tick();
        }

        p.set_goal(&mut r, Goal::Rest { turns: 10 });
        // Fresh input interrupts between actions.
        r.interrupt(p);
        assert_eq!(p.goal(&r), Goal::None);
    }
}
