//! Multi-channel distance fields over the level terrain.
//!
//! Each channel is a dense grid of traversal costs propagated outward from
//! an epicenter cell. Noise channels model how far a sound carries, travel
//! channels model how many turns of walking a route costs. Consumers read
//! distances and follow the gradient, they never mutate the grids.

use serde::{Deserialize, Serialize};
use util::Grid;

use crate::{
    ecs::{NeverMoves, WanderGroup},
    prelude::*,
};

/// Cost cap for flow propagation, doubles as the unreached sentinel.
pub const FLOW_MAX: u16 = 100;

/// Extra turns a door costs traffic walking through it.
const DOOR_DELAY: u16 = 3;

/// Noise attenuation of a closed door.
const DOOR_MUFFLE: u16 = 5;

/// Pathing penalty for standing on a visible stationary hazard's cell.
const HAZARD_COST: u16 = 10;

/// Pathing penalty for each visible stationary hazard adjacent to a cell.
const HAZARD_FRINGE_COST: u16 = 2;

/// Epicenter drift tolerated before a re-anchor becomes a full rebuild.
const REANCHOR_RADIUS: i32 = 2;

/// Identity of one independently maintained flow field.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelId {
    /// Noise spreading from the player.
    Noise,
    /// Noise spreading from a shouting monster.
    MonsterNoise,
    /// Walking distance from the player, used by alert monsters closing in.
    Pursuit,
    /// Walking distance from a wandering group's shared destination.
    Wander(u8),
    /// The automaton's travel map, centered on its current target.
    Automaton,
}

impl ChannelId {
    /// Noise channels ignore passability and knowledge, they only care what
    /// sound carries through.
    fn is_noise(self) -> bool {
        matches!(self, ChannelId::Noise | ChannelId::MonsterNoise)
    }

    /// Whether expansion is limited to cells the observer knows about.
    ///
    /// Monsters know the terrain of their own dungeon, the automaton only
    /// knows what it has seen or deduced.
    fn observer_limited(self) -> bool {
        matches!(self, ChannelId::Automaton)
    }
}

/// One flow field and its bookkeeping.
#[derive(Clone, Serialize, Deserialize)]
pub struct FlowChannel {
    /// Epicenter of the last full rebuild.
    origin: Location,
    /// Epicenter as of the last maintenance update. Re-anchoring a channel
    /// whose epicenter drifted a little updates this without paying for a
    /// full rebuild.
    updated_origin: Location,
    grid: Grid<u16>,
}

impl FlowChannel {
    pub fn origin(&self) -> Location {
        self.origin
    }

    pub fn updated_origin(&self) -> Location {
        self.updated_origin
    }
}

/// Registry of flow channels, one per navigational purpose.
#[derive(Default)]
pub struct Flows {
    channels: HashMap<ChannelId, FlowChannel>,
}

impl Flows {
    pub fn get(&self, which: ChannelId) -> Option<&FlowChannel> {
        self.channels.get(&which)
    }
}

impl Runtime {
    /// Fully recompute a channel's cost grid from the given epicenter.
    ///
    /// The epicenter must be in bounds but needs not be passable, an
    /// impassable epicenter just yields a degenerate field. Unreachable
    /// cells are not an error, they keep the `FLOW_MAX` sentinel.
    pub fn rebuild_flow(&mut self, which: ChannelId, epicenter: Location) {
        let grid = self.propagate(which, epicenter);
        self.flows.channels.insert(
            which,
            FlowChannel {
                origin: epicenter,
                updated_origin: epicenter,
                grid,
            },
        );
    }

    /// Bring a channel up to date for a possibly moved epicenter.
    ///
    /// Small drifts only re-anchor the updated epicenter field and keep the
    /// slightly stale grid, larger moves pay for the full rebuild.
    pub fn refresh_flow(&mut self, which: ChannelId, epicenter: Location) {
        let reanchor = match self.flows.channels.get(&which) {
            Some(ch) if ch.updated_origin == epicenter => return,
            Some(ch) => (epicenter - ch.origin).cheb_len() <= REANCHOR_RADIUS,
            None => false,
        };

        if reanchor {
            if let Some(ch) = self.flows.channels.get_mut(&which) {
                ch.updated_origin = epicenter;
            }
        } else {
            self.rebuild_flow(which, epicenter);
        }
    }

    /// Current propagated cost at a cell, `FLOW_MAX` when unreached or out
    /// of bounds. A pure read, never triggers a rebuild.
    pub fn flow_dist(&self, which: ChannelId, loc: Location) -> u16 {
        self.flows
            .channels
            .get(&which)
            .and_then(|ch| ch.grid.get(loc))
            .copied()
            .unwrap_or(FLOW_MAX)
    }

    /// Wavefront expansion with a bucket queue keyed by tentative cost.
    ///
    /// Cells come off the queue in nondecreasing cost order, so every cost
    /// is final when its cell expands. Buckets are FIFO and neighbors are
    /// visited in the fixed `DIR_8` order, which pins down all tie-breaking.
    fn propagate(&self, which: ChannelId, epicenter: Location) -> Grid<u16> {
        let mut costs = Grid::new(self.level.dim(), FLOW_MAX);
        if !costs.contains(epicenter) {
            log::warn!("rebuild_flow: epicenter {epicenter} out of bounds");
            return costs;
        }

        let mut buckets: Vec<Vec<Location>> =
            vec![Vec::new(); FLOW_MAX as usize];
        costs[epicenter] = 0;
        buckets[0].push(epicenter);

        for cost in 0..FLOW_MAX {
            let mut i = 0;
            // Expanding a cell can only push into strictly higher buckets,
            // edge weights are never zero.
            while i < buckets[cost as usize].len() {
                let loc = buckets[cost as usize][i];
                i += 1;
                if costs[loc] != cost {
                    // Stale entry, the cell got relabeled cheaper.
                    continue;
                }
                for dir in DIR_8 {
                    let n = loc + dir;
                    if !costs.contains(n) {
                        continue;
                    }
                    let Some(step) = self.edge_cost(which, n) else {
                        continue;
                    };
                    let total = cost.saturating_add(step);
                    if total >= FLOW_MAX {
                        continue;
                    }
                    if total < costs[n] {
                        costs[n] = total;
                        buckets[total as usize].push(n);
                    }
                }
            }
        }

        costs
    }

    /// Cost of entering a cell for the given channel, `None` when the cell
    /// blocks the flow entirely.
    fn edge_cost(&self, which: ChannelId, loc: Location) -> Option<u16> {
        let tile = self.level.tile(loc);

        if which.is_noise() {
            if !tile.carries_sound() {
                return None;
            }
            let mut cost = 1;
            if tile == Tile::Door {
                cost += DOOR_MUFFLE;
            }
            return Some(cost);
        }

        if !tile.is_passable() {
            return None;
        }
        if which.observer_limited()
            && !self.level.is_known(loc)
            && !self.automaton_memory[loc]
        {
            return None;
        }

        let mut cost = 1;
        if tile == Tile::Door {
            cost += DOOR_DELAY;
        }
        cost += self.level.terrain_extra_cost(loc);
        if self.is_stationary_threat(loc) {
            cost += HAZARD_COST;
        }
        cost += HAZARD_FRINGE_COST
            * self.nearby_stationary_threats(loc).count() as u16;

        Some(cost)
    }

    /// Visible never-moving hazards on the cells adjacent to `loc`.
    pub fn nearby_stationary_threats(
        &self,
        loc: Location,
    ) -> impl Iterator<Item = Entity> + '_ {
        loc.neighbors_8().into_iter().filter_map(move |n| {
            self.is_stationary_threat(n)
                .then(|| n.mob_at(self))
                .flatten()
        })
    }

    fn is_stationary_threat(&self, loc: Location) -> bool {
        let Some(mob) = loc.mob_at(self) else {
            return false;
        };
        mob.get::<NeverMoves>(self).0 && loc.is_visible(self)
    }
}

/// Helpers used by monster upkeep.
impl Runtime {
    /// Pick a fresh wandering destination for a group whose flow is missing
    /// or already walked out.
    pub(crate) fn rewander(&mut self, group: u8) {
        use rand::seq::SliceRandom;

        let open: Vec<Location> = self
            .level
            .cells()
            .filter(|&loc| loc.is_passable(self))
            .collect();
        if let Some(&dest) = open.choose(&mut self.rng) {
            self.rebuild_flow(ChannelId::Wander(group), dest);
            log::debug!("wander group {group} heads for {dest}");
        }
    }

    pub(crate) fn wander_groups(&self) -> Vec<u8> {
        let mut ret: Vec<u8> = self
            .mobs()
            .iter()
            .map(|e| e.get::<WanderGroup>(self).0)
            .filter(|&g| g != 0)
            .collect();
        ret.sort();
        ret.dedup();
        ret
    }
}
