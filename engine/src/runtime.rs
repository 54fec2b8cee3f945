use rand::SeedableRng;
use util::{GameRng, Grid};

use crate::{ecs::*, prelude::*, Flows, Level, Placement};

/// Main data container for game engine runtime.
pub struct Runtime {
    pub(crate) turn: u64,
    pub(crate) player: Option<Entity>,
    pub(crate) level: Level,
    pub(crate) ecs: Ecs,
    pub(crate) placement: Placement,
    pub(crate) flows: Flows,
    pub(crate) rng: GameRng,
    /// The automaton's private memory overlay: cells it has deduced to be
    /// passable without ever seeing them.
    pub(crate) automaton_memory: Grid<bool>,
    pub(crate) descended: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Level::new([1, 1]))
    }
}

impl Runtime {
    pub fn new(level: Level) -> Self {
        let dim = level.dim();
        Runtime {
            turn: 0,
            player: None,
            level,
            ecs: Default::default(),
            placement: Default::default(),
            flows: Default::default(),
            rng: GameRng::seed_from_u64(0xdeadbeef),
            automaton_memory: Grid::new(dim, false),
            descended: false,
        }
    }

    /// Current value of the scheduler clock.
    pub fn now(&self) -> u64 {
        self.turn
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn live_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.placement.all_entities()
    }

    /// Mobs in a deterministic processing order.
    pub(crate) fn mobs(&self) -> Vec<Entity> {
        let mut ret: Vec<Entity> = self
            .live_entities()
            .filter(|e| e.get::<IsMob>(self).0)
            .collect();
        ret.sort();
        ret
    }

    /// Spawns a new player entity if there isn't currently a player.
    pub fn spawn_player(&mut self, loc: Location) {
        if self.player.is_some() {
            return;
        }

        let player = Entity(self.ecs.spawn((
            Name("Adventurer".into()),
            Icon('@'),
            Speed(crate::NORMAL_SPEED),
            IsMob(true),
            Hp(20),
            MaxHp(20),
            Damage(4),
            Perception(5),
            LightFuel(crate::TORCH_FUEL),
            Torches(2),
        )));

        self.player = Some(player);
        self.placement.place_mob(loc, player);
        self.update_fov();
    }

    pub fn spawn_item(
        &mut self,
        loc: Location,
        name: &str,
        value: i32,
        is_torch: bool,
    ) -> Entity {
        let e = Entity(self.ecs.spawn((
            Name(name.into()),
            IsItem(true),
            Value(value),
            IsTorch(is_torch),
        )));
        self.placement.place_item(loc, e);
        e
    }

    /// Remove a dead or consumed entity from the world.
    pub(crate) fn despawn(&mut self, e: Entity) {
        self.placement.remove(e);
        let _ = self.ecs.despawn(e.0);
        if self.player == Some(e) {
            self.player = None;
        }
    }

    /// Access the persistent engine random number generator.
    pub(crate) fn rng(&mut self) -> &mut impl rand::Rng {
        &mut self.rng
    }

    /// Return whether the overall game scenario is still going or if it has
    /// ended.
    pub fn scenario_status(&self) -> ScenarioStatus {
        if self.player.is_none() {
            ScenarioStatus::Lost
        } else if self.descended {
            ScenarioStatus::Descended
        } else {
            ScenarioStatus::Ongoing
        }
    }
}
