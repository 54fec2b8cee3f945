pub use crate::{
    msg, send_msg, Action, ChannelId, Entity, Goal, LocExt, Location, Msg,
    Runtime, ScenarioStatus, Tile, ENERGY_PER_TURN, FLOW_MAX, FOV_RADIUS,
};
pub use glam::{ivec2, IVec2};
pub use util::{HashMap, HashSet, VecExt, DIR_4, DIR_8};
