use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

/// Construct a throwaway random number generator seeded by a noise value.
///
/// Good for short-term use in immutable contexts given a varying source of
/// noise like map position coordinates.
pub fn srng(seed: &(impl Hash + ?Sized)) -> XorShiftRng {
    let mut h = crate::FastHasher::default();
    seed.hash(&mut h);
    XorShiftRng::seed_from_u64(h.finish())
}

pub trait RngExt {
    fn one_chance_in(&mut self, n: usize) -> bool;

    fn percent_chance(&mut self, p: u32) -> bool;
}

impl<T: Rng + ?Sized> RngExt for T {
    fn one_chance_in(&mut self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.gen_range(0..n) == 0
    }

    fn percent_chance(&mut self, p: u32) -> bool {
        self.gen_range(0..100) < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_stable() {
        let a: u64 = srng("epicenter").gen();
        let b: u64 = srng("epicenter").gen();
        assert_eq!(a, b);

        let c: u64 = srng("elsewhere").gen();
        assert_ne!(a, c);
    }

    #[test]
    fn chances() {
        let mut rng = srng(&7u32);
        assert!(!rng.one_chance_in(0));
        assert!((0..100).all(|_| rng.percent_chance(100)));
        assert!(!(0..100).any(|_| rng.percent_chance(0)));
    }
}
