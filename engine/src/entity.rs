//! Generic entity logic.
use hecs::Component;

use crate::prelude::*;

// Dummy wrapper so we can write impls for it directly instead of deriving a
// trait for hecs::Entity and writing every fn signature twice.
/// Game entity identifier datatype. All the actual contents live in the ECS.
#[derive(Copy, Clone, Hash, Eq, Ord, PartialEq, PartialOrd, Debug)]
pub struct Entity(pub(crate) hecs::Entity);

impl Entity {
    pub(crate) fn get<T>(&self, r: &Runtime) -> T
    where
        T: Component + Clone + Default,
    {
        r.ecs
            .get::<&T>(self.0)
            .map(|c| (*c).clone())
            .unwrap_or_default()
    }

    pub(crate) fn set<T>(&self, r: &mut Runtime, val: T)
    where
        T: Component + Default + PartialEq,
    {
        if val == T::default() {
            // Remove default values, abstraction layer assumes components
            // are always present but defaulted.
            //
            // Will give an error if the component wasn't there to begin
            // with, just ignore that.
            let _ = r.ecs.remove_one::<T>(self.0);
        } else {
            r.ecs.insert_one(self.0, val).expect("Entity::set failed");
        }
    }

    /// Access and mutate a component using a closure.
    ///
    /// Use for components that aren't just atomic values.
    pub(crate) fn with_mut<T: Component + Clone + Default + PartialEq, U>(
        &self,
        r: &mut Runtime,
        f: impl FnOnce(&mut T) -> U,
    ) -> U {
        let mut val: T = self.get(r);
        let ret = f(&mut val);
        self.set(r, val);
        ret
    }

    pub fn is_alive(&self, r: &Runtime) -> bool {
        r.ecs.contains(self.0)
    }

    pub fn loc(&self, r: &Runtime) -> Option<Location> {
        r.placement.loc(*self)
    }

    /// Display name for messages.
    pub fn noun(&self, r: &Runtime) -> String {
        let crate::ecs::Name(n) = self.get(r);
        if n.is_empty() {
            "something".into()
        } else {
            n
        }
    }
}
