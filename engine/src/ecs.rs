//! Entity component system component types.
//!
//! Components follow the default-absent convention: a component missing from
//! an entity reads as its default value, and setting a component to its
//! default removes it.

use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

use crate::prelude::*;

/// Trainable player skills, in experience-spending priority weight order.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    EnumCount,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Skill {
    Melee,
    Evasion,
    Perception,
    Will,
}

impl Skill {
    /// Relative worth used when deciding where experience goes.
    pub fn weight(self) -> i32 {
        match self {
            Skill::Melee => 100,
            Skill::Evasion => 100,
            Skill::Perception => 50,
            Skill::Will => 30,
        }
    }
}

/// Base ranks in each skill.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Skills(pub [i32; Skill::COUNT]);

impl Skills {
    pub fn rank(&self, s: Skill) -> i32 {
        self.0[s as usize]
    }

    pub fn raise(&mut self, s: Skill) {
        self.0[s as usize] += 1;
    }
}

/// How awake a monster is to the player's presence.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Alertness {
    #[default]
    Unwary,
    Alert,
}

#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Name(pub String);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Icon(pub char);

/// Speed rating, an index into the energy gain table.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Speed(pub u8);

/// Accumulated action energy. Only the scheduler mutates this.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Energy(pub i32);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Hp(pub i32);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct MaxHp(pub i32);

/// Flat damage dealt by a successful melee hit.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Damage(pub i32);

/// Skill at hearing noise, higher notices from farther away.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Perception(pub i32);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct IsMob(pub bool);

/// Stationary hazards like molds. They act but never step.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct NeverMoves(pub bool);

/// Wandering group id, 0 when the monster is not a wanderer.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct WanderGroup(pub u8);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct IsItem(pub bool);

/// Worth of an item for pickup decisions, or of a monster as an experience
/// award.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Value(pub i32);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct IsTorch(pub bool);

/// Unspent experience points.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Exp(pub i32);

/// Accumulated treasure value.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Loot(pub i32);

/// Spare torches carried.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Torches(pub i32);

/// Ticks of light left in the wielded torch.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct LightFuel(pub i32);

////////////////////////////////

/// Entity component system. Stores all the data of game entities.
#[derive(Default, Deref, DerefMut)]
pub(crate) struct Ecs(pub(crate) hecs::World);

impl Ecs {
    pub(crate) fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        (&self.0).into_iter().map(|he| Entity(he.entity()))
    }
}
