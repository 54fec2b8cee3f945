//! Line-of-sight scan maintaining the player's visibility model.

use util::bresenham_line;

use crate::prelude::*;

impl Runtime {
    /// Recompute the player's field of view and fold it into the explored
    /// map. Called after every player move.
    pub(crate) fn update_fov(&mut self) {
        self.level.clear_visible();
        let Some(loc) = self.player.and_then(|p| p.loc(self)) else {
            return;
        };

        let mut seen = Vec::new();
        for y in -FOV_RADIUS..=FOV_RADIUS {
            for x in -FOV_RADIUS..=FOV_RADIUS {
                let cell = loc + ivec2(x, y);
                if !self.level.in_bounds(cell) {
                    continue;
                }
                if (cell - loc).cheb_len() <= FOV_RADIUS
                    && self.sightline(loc, cell)
                {
                    seen.push(cell);
                }
            }
        }

        for cell in seen {
            self.level.mark_visible(cell);
            self.level.mark_known(cell);
        }
    }

    /// Whether an unobstructed sightline runs from `a` to `b`.
    ///
    /// Endpoints don't block themselves, so wall faces are visible from the
    /// open side.
    pub fn sightline(&self, a: Location, b: Location) -> bool {
        bresenham_line(a, b)
            .skip(1)
            .all(|p| !self.level.tile(p).blocks_sight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_block_sight() {
        let mut r = Runtime::from_map(
            "#######\n\
             #..#..#\n\
             #######",
        )
        .unwrap();
        r.spawn_player(ivec2(1, 1));

        assert!(ivec2(2, 1).is_visible(&r));
        // The near face of the dividing wall is visible...
        assert!(ivec2(3, 1).is_visible(&r));
        // ...the far side is not.
        assert!(!ivec2(4, 1).is_visible(&r));
        assert!(!ivec2(5, 1).is_visible(&r));

        // Seen cells become known and stay known after moving away.
        assert!(ivec2(2, 1).is_known(&r));
    }
}
