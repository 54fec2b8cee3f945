//! Actors figuring out what to do on their own.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use util::{srng, RngExt};

use crate::{ecs::*, prelude::*, LOW_FUEL};

/// Multi-turn standing orders.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub enum Goal {
    #[default]
    None,

    /// Walk to a location along explored terrain.
    GoTo { destination: Location },

    /// Stay put and recover for a set number of turns.
    Rest { turns: u16 },

    /// Autonomous control has the helm.
    Automaton,
}

impl Goal {
    pub fn is_some(&self) -> bool {
        !matches!(self, Goal::None)
    }
}

/// What a goal evaluator wants done this turn.
enum Verdict {
    /// An immediate action.
    Do(Action),
    /// Walk towards a destination cell.
    Travel(Location),
}

type Evaluator = fn(Entity, &Runtime) -> Option<Verdict>;

/// The automaton's priorities, strictly ordered. The first evaluator that
/// produces a verdict wins the turn.
const AUTOMATON_GOALS: &[(&str, Evaluator)] = &[
    ("allocate-experience", allocate_experience),
    ("engage-threat", engage_threat),
    ("grab-underfoot", grab_underfoot),
    ("renew-light", renew_light),
    ("fetch-item", fetch_item),
    ("explore-frontier", explore_frontier),
    ("take-stairs", take_stairs),
    ("seek-stairs", seek_stairs),
    ("seek-secret-door", seek_secret_door),
];

impl Entity {
    pub fn goal(&self, r: &Runtime) -> Goal {
        self.get(r)
    }

    pub fn set_goal(&self, r: &mut Runtime, goal: Goal) {
        self.set(r, goal);
    }

    pub fn clear_goal(&self, r: &mut Runtime) {
        self.set(r, Goal::default());
    }

    /// Decide on the next action given a goal.
    ///
    /// `None` means the goal is finished or has to be abandoned, the caller
    /// moves on via `next_goal`.
    pub(crate) fn decide(&self, r: &mut Runtime, goal: Goal) -> Option<Action> {
        match goal {
            Goal::None => None,

            Goal::Rest { turns } => {
                if turns == 0 || self.threat_in_view(r) {
                    return None;
                }
                self.set(r, Goal::Rest { turns: turns - 1 });
                Some(Action::Pass)
            }

            Goal::GoTo { destination } => {
                let loc = self.loc(r)?;
                if loc == destination {
                    return None;
                }
                if self.threat_in_view(r) {
                    // Don't walk blindly while something is stalking us.
                    return None;
                }
                self.travel_step(r, destination)
            }

            Goal::Automaton => self.automaton_turn(r),
        }
    }

    /// Figure out what happens when the current goal ends.
    pub(crate) fn next_goal(&self, r: &mut Runtime) {
        if self.goal(r) == Goal::Automaton {
            msg!("Autonomous control has nothing left to do.");
            send_msg(Msg::AutomatonStopped);
            log::info!("automaton: no viable goal, handing back control");
        }
        self.clear_goal(r);
    }

    /// Is a woken enemy in the actor's field of view.
    pub fn threat_in_view(&self, r: &Runtime) -> bool {
        r.mobs().iter().any(|mob| {
            mob.is_enemy(r, self)
                && mob.is_alert(r)
                && mob.loc(r).is_some_and(|loc| loc.is_visible(r))
        })
    }

    /// One turn of the autonomous controller.
    fn automaton_turn(&self, r: &mut Runtime) -> Option<Action> {
        let loc = self.loc(r)?;

        r.absorb_automaton_fov();
        r.rebuild_flow(ChannelId::Automaton, loc);

        let mut choice = None;
        for (name, eval) in AUTOMATON_GOALS {
            if let Some(verdict) = eval(*self, r) {
                log::debug!("automaton goal: {name}");
                choice = Some(verdict);
                break;
            }
        }

        match choice? {
            Verdict::Do(act) => Some(act),
            Verdict::Travel(dest) => self.travel_step(r, dest),
        }
    }

    /// Convert a destination cell into this turn's single step.
    ///
    /// Arriving at the destination degenerates into searching in place.
    /// Returns `None` when no neighbor improves on the current distance,
    /// the "no viable direction" outcome.
    fn travel_step(&self, r: &mut Runtime, dest: Location) -> Option<Action> {
        let loc = self.loc(r)?;

        if dest == loc {
            // Searching in place means we walked into a dead end on
            // purpose. The unseen cells around us would have been offered
            // as frontier otherwise, remember them as already handled.
            for n in loc.neighbors_8() {
                if let Some(c) = r.automaton_memory.get_mut(n) {
                    *c = true;
                }
            }
            return Some(Action::Search);
        }

        r.rebuild_flow(ChannelId::Automaton, dest);
        let dir = r.downhill_step(ChannelId::Automaton, loc)?;

        if (loc + dir).tile(r) == Tile::Door
            && srng(&(r.now(), loc)).one_chance_in(5)
        {
            // Why open a door when you can make an entrance.
            return Some(Action::Bump(dir));
        }
        Some(Action::Step(dir))
    }
}

impl Runtime {
    /// Step direction that descends the flow gradient from `from`, if any
    /// enterable neighbor strictly improves on the current distance.
    ///
    /// The `DIR_8` scan order makes orthogonal steps win all ties against
    /// diagonal ones.
    pub(crate) fn downhill_step(
        &self,
        which: ChannelId,
        from: Location,
    ) -> Option<IVec2> {
        let mut best = self.flow_dist(which, from).min(FLOW_MAX - 1);
        let mut best_dir = None;
        for dir in DIR_8 {
            let n = from + dir;
            // The epicenter cell carries cost zero even when it's solid
            // terrain, so passability has to be checked here too.
            if !n.is_passable(self) || n.mob_at(self).is_some() {
                continue;
            }
            let d = self.flow_dist(which, n);
            if d < best {
                best = d;
                best_dir = Some(dir);
            }
        }
        best_dir
    }

    /// The automaton remembers every cell it has laid eyes on.
    pub(crate) fn absorb_automaton_fov(&mut self) {
        let dim = self.automaton_memory.dim();
        for y in 0..dim.y {
            for x in 0..dim.x {
                let loc = ivec2(x, y);
                if self.level.is_visible(loc) {
                    self.automaton_memory[loc] = true;
                }
            }
        }
    }
}

////////////////////////////////
//
// Goal evaluators, in priority order.

fn allocate_experience(e: Entity, r: &Runtime) -> Option<Verdict> {
    let ranks: Skills = e.get(r);
    let Exp(points) = e.get(r);

    // Which skill gives the most value per rank right now. First hit wins
    // ties.
    let mut best = None;
    let mut best_val = 0;
    for skill in Skill::iter() {
        let val = skill.weight() * 10 / (ranks.rank(skill) + 1);
        if val > best_val {
            best_val = val;
            best = Some(skill);
        }
    }

    let skill = best?;
    (points >= (ranks.rank(skill) + 1) * 100)
        .then_some(Verdict::Do(Action::RaiseSkill(skill)))
}

fn engage_threat(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;

    let mut best: Option<(u16, Location)> = None;
    for mob in r.mobs() {
        if !mob.is_enemy(r, &e) || !mob.is_alert(r) {
            continue;
        }
        // Rooted hazards are routed around, not hunted down.
        if mob.get::<NeverMoves>(r).0 {
            continue;
        }
        let Some(mob_loc) = mob.loc(r) else { continue };
        if !mob_loc.is_visible(r) {
            continue;
        }
        let d = r.flow_dist(ChannelId::Automaton, mob_loc);
        if d >= FLOW_MAX {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, mob_loc));
        }
    }

    let (_, target) = best?;
    if (target - loc).is_adjacent() {
        return Some(Verdict::Do(Action::Bump(target - loc)));
    }
    Some(Verdict::Travel(target))
}

fn grab_underfoot(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;
    let item = loc.item_at(r)?;
    (item.get::<Value>(r).0 > 0 || item.get::<IsTorch>(r).0)
        .then_some(Verdict::Do(Action::Pickup))
}

fn renew_light(e: Entity, r: &Runtime) -> Option<Verdict> {
    let LightFuel(fuel) = e.get(r);
    let Torches(spares) = e.get(r);
    (fuel < LOW_FUEL && spares > 0).then_some(Verdict::Do(Action::Refuel))
}

fn fetch_item(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;

    let mut best: Option<(u16, Location)> = None;
    for item in r.live_entities().filter(|it| it.is_item(r)) {
        if item.get::<Value>(r).0 <= 0 && !item.get::<IsTorch>(r).0 {
            continue;
        }
        let Some(item_loc) = item.loc(r) else { continue };
        if item_loc == loc || !item_loc.is_known(r) {
            continue;
        }
        let d = r.flow_dist(ChannelId::Automaton, item_loc);
        if d >= FLOW_MAX {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, item_loc));
        }
    }

    best.map(|(_, target)| Verdict::Travel(target))
}

fn explore_frontier(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;

    // A dead end in fully charted surroundings reeks of a secret door,
    // usually stop to check instead of trudging to the next frontier.
    if loc.solid_neighbor_count(r) == 7
        && srng(&(r.now(), loc)).percent_chance(90)
    {
        return Some(Verdict::Travel(loc));
    }

    let mut best_dist = FLOW_MAX - 1;
    let mut best: Option<Location> = None;

    for cell in r.level().cells() {
        if r.level().is_known(cell) || r.automaton_memory[cell] {
            continue;
        }
        if cell == loc {
            continue;
        }

        let local = cell
            .neighbors_8()
            .into_iter()
            .map(|n| r.flow_dist(ChannelId::Automaton, n))
            .min()
            .unwrap_or(FLOW_MAX);

        // The tie-break clause makes exploration hug corridors around
        // corners instead of cutting unexplored diagonals.
        let wins = local < best_dist
            || (local == best_dist
                && local == 1
                && (cell.x == loc.x || cell.y == loc.y)
                && cell.is_visible(r));
        if wins {
            best_dist = local;
            best = Some(cell);
        }
    }

    best.map(Verdict::Travel)
}

fn take_stairs(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;
    (loc.tile(r) == Tile::StairsDown).then_some(Verdict::Do(Action::Descend))
}

fn seek_stairs(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;

    let mut best: Option<(u16, Location)> = None;
    for cell in r.level().cells() {
        if cell.tile(r) != Tile::StairsDown || !cell.is_known(r) {
            continue;
        }
        if cell == loc {
            continue;
        }
        let d = r.flow_dist(ChannelId::Automaton, cell);
        if d >= FLOW_MAX {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, cell));
        }
    }

    best.map(|(_, target)| Verdict::Travel(target))
}

fn seek_secret_door(e: Entity, r: &Runtime) -> Option<Verdict> {
    let loc = e.loc(r)?;

    let mut best: Option<(u16, Location)> = None;
    for cell in r.level().cells() {
        if cell.tile(r) != Tile::Floor || !cell.is_known(r) {
            continue;
        }
        if cell.solid_neighbor_count(r) != 7 {
            continue;
        }
        let d = r.flow_dist(ChannelId::Automaton, cell);
        if d >= FLOW_MAX {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, cell));
        }
    }

    best.map(|(_, target)| Verdict::Travel(target))
}

////////////////////////////////
//
// Monster turns.

impl Runtime {
    /// Let a monster take its turn. Always spends the monster's turn, a
    /// monster that can't do what it wanted idles instead.
    pub(crate) fn monster_turn(&mut self, e: Entity) {
        if !e.is_alert(self) && !e.get::<NeverMoves>(self).0 {
            if let Some(player_loc) =
                self.player().and_then(|p| p.loc(self))
            {
                self.refresh_flow(ChannelId::Noise, player_loc);
                if e.hears_player(self) {
                    e.wake(self);
                }
            }
        }

        let action = self.monster_decide(e);
        let completed = e.execute(self, action);
        if !completed {
            // The plan fell through, burn the turn idling.
            e.execute(self, Action::Pass);
        }
        e.spend_energy(self, ENERGY_PER_TURN);
    }

    fn monster_decide(&mut self, e: Entity) -> Action {
        let Some(loc) = e.loc(self) else {
            return Action::Pass;
        };

        let player_loc = self.player().and_then(|p| p.loc(self));

        if e.get::<NeverMoves>(self).0 {
            // Rooted hazards lash out at whatever stands next to them.
            if let Some(p) = player_loc {
                if (p - loc).is_adjacent() {
                    return Action::Bump(p - loc);
                }
            }
            return Action::Pass;
        }

        if e.is_alert(self) {
            let Some(p) = player_loc else {
                return Action::Pass;
            };
            if (p - loc).is_adjacent() {
                return Action::Bump(p - loc);
            }
            self.refresh_flow(ChannelId::Pursuit, p);
            if let Some(dir) = self.downhill_step(ChannelId::Pursuit, loc) {
                return Action::Step(dir);
            }
            // No walkable route, fall back to nosing along the scent trail.
            if let Some(dir) = self.scent_step(loc) {
                return Action::Step(dir);
            }
            return Action::Pass;
        }

        // Unwary wanderers drift towards their group's destination.
        let WanderGroup(group) = e.get(self);
        if group != 0 {
            let arrived = self
                .flows
                .get(ChannelId::Wander(group))
                .map_or(true, |ch| ch.origin() == loc);
            if arrived {
                self.rewander(group);
            }
            if let Some(dir) =
                self.downhill_step(ChannelId::Wander(group), loc)
            {
                return Action::Step(dir);
            }
        }

        Action::Pass
    }

    /// Adjacent step onto the freshest trackable scent, if any.
    fn scent_step(&self, from: Location) -> Option<IVec2> {
        let mut best: Option<(u16, IVec2)> = None;
        for dir in DIR_8 {
            let n = from + dir;
            if !n.is_passable(self) || n.mob_at(self).is_some() {
                continue;
            }
            let Some(age) = self.level.scent_age(n) else {
                continue;
            };
            if best.map_or(true, |(ba, _)| age < ba) {
                best = Some((age, dir));
            }
        }
        best.map(|(_, dir)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Energy, Loot};

    /// Drive the scheduler until the player's next action or give up after
    /// a while.
    fn run_player_turn(r: &mut Runtime) {
        for _ in 0..1000 {
            if let Some(e) = r.tick() {
                if e.is_player(r) {
                    return;
                }
            }
            if r.awaiting_input() {
                return;
            }
        }
        panic!("player never got a turn");
    }

    #[test]
    fn frontier_tiebreak_prefers_aligned_visible() {
        // Using a plain mob as the explorer leaves the knowledge state
        // fully in the test's hands, spawning a player would chart the
        // whole room through its field of view.
        let mut r = Runtime::from_map(
            "#######\n\
             #.....#\n\
             #o....#\n\
             #.....#\n\
             #######",
        )
        .unwrap();
        let e = r.mobs()[0];
        let loc = e.loc(&r).unwrap();

        // Hand-build the knowledge state: everything is charted except the
        // two candidate cells.
        let aligned = ivec2(3, 2);
        let offside = ivec2(3, 1);
        for cell in r.level.cells().collect::<Vec<_>>() {
            if cell != aligned && cell != offside {
                r.level.mark_known(cell);
            }
        }
        r.level.mark_visible(aligned);
        r.level.mark_visible(offside);

        r.rebuild_flow(ChannelId::Automaton, loc);

        // Both candidates sit one step past a distance-1 cell, and the
        // scan meets the unaligned one first. The aligned one must still
        // win the tie.
        match explore_frontier(e, &r) {
            Some(Verdict::Travel(dest)) => assert_eq!(dest, aligned),
            _ => panic!("no frontier target"),
        }

        // Without visibility the tie-break does not apply and the scan
        // order stands.
        r.level.clear_visible();
        match explore_frontier(e, &r) {
            Some(Verdict::Travel(dest)) => assert_eq!(dest, offside),
            _ => panic!("no frontier target"),
        }
    }

    #[test]
    fn searching_in_place_marks_surroundings_handled() {
        let mut r = Runtime::from_map(
            "####\n\
             #@.#\n\
             ####",
        )
        .unwrap();
        let p = r.player().unwrap();
        let loc = p.loc(&r).unwrap();

        let act = p.travel_step(&mut r, loc);
        assert!(matches!(act, Some(Action::Search)));
        for n in loc.neighbors_8() {
            if r.automaton_memory.contains(n) {
                assert!(r.automaton_memory[n]);
            }
        }
    }

    #[test]
    fn automaton_prefers_loot_underfoot_over_exploring() {
        let mut r = Runtime::from_map(
            "#########\n\
             #@......#\n\
             #########",
        )
        .unwrap();
        let p = r.player().unwrap();
        let loc = p.loc(&r).unwrap();
        r.spawn_item(loc, "gold trinket", 50, false);

        p.set_goal(&mut r, Goal::Automaton);
        run_player_turn(&mut r);

        assert_eq!(p.get::<Loot>(&r).0, 50);
    }

    #[test]
    fn automaton_disables_when_out_of_goals() {
        let mut r = Runtime::from_map(
            "#####\n\
             #@..#\n\
             #...#\n\
             #####",
        )
        .unwrap();
        let p = r.player().unwrap();
        p.set_goal(&mut r, Goal::Automaton);

        // Everything is seen, nothing is buried here: the automaton gives
        // up and hands back control.
        for _ in 0..2000 {
            r.tick();
            if !p.goal(&r).is_some() {
                break;
            }
        }
        assert_eq!(p.goal(&r), Goal::None);
        for _ in 0..200 {
            r.tick();
        }
        assert!(r.awaiting_input());
    }

    #[test]
    fn automaton_plays_through_a_level() {
        let mut r = Runtime::from_map(
            "############\n\
             #@...+...$.#\n\
             ####.###...#\n\
             ####....>###\n\
             ############",
        )
        .unwrap();
        let p = r.player().unwrap();
        p.set_goal(&mut r, Goal::Automaton);

        for _ in 0..60_000 {
            if r.scenario_status() != ScenarioStatus::Ongoing {
                break;
            }
            r.tick();
            if r.awaiting_input() {
                panic!("automaton gave up mid-level");
            }
        }

        assert_eq!(r.scenario_status(), ScenarioStatus::Descended);
        // It grabbed the treasure on the way down.
        assert_eq!(p.get::<Loot>(&r).0, 50);
    }

    #[test]
    fn alert_monster_closes_in_along_the_flow() {
        let mut r = Runtime::from_map(
            "#########\n\
             #@.....o#\n\
             #########",
        )
        .unwrap();
        let p = r.player().unwrap();
        let m = r.mobs().into_iter().find(|e| *e != p).unwrap();
        m.set(&mut r, crate::ecs::Alertness::Alert);

        let start = m.loc(&r).unwrap();
        m.set(&mut r, Energy(ENERGY_PER_TURN));
        r.tick();

        let now = m.loc(&r).unwrap();
        let player_loc = p.loc(&r).unwrap();
        assert!(
            (now - player_loc).cheb_len() < (start - player_loc).cheb_len(),
            "monster did not close in: {start} -> {now}"
        );
    }
}
