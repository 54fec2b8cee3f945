//! Building runtimes from ascii maps.
//!
//! Dungeon generation proper is someone else's job, the engine just ingests
//! a drawn map: terrain from the tile legend plus spawn characters for the
//! player, monsters and items.

use anyhow::bail;

use crate::{data, ecs::WanderGroup, prelude::*, Level};

impl Runtime {
    /// Construct a runtime from an ascii map.
    ///
    /// Terrain uses the `Tile` legend. `@` is the player, `w`/`o` are
    /// monsters, `m` is a stationary mold, `W` is a wandering monster,
    /// `$` is treasure, `t` a torch, `^` a visible trap and `x` a hidden
    /// one. Spawn characters sit on floor.
    pub fn from_map(text: &str) -> crate::Result<Runtime> {
        let lines: Vec<&str> =
            text.lines().map(str::trim_end).collect();
        let height = lines.len() as i32;
        let width = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as i32;
        if width == 0 || height == 0 {
            bail!("empty map");
        }

        let mut level = Level::new([width, height]);
        let mut spawns = Vec::new();

        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                let loc = ivec2(x as i32, y as i32);
                if let Ok(tile) = Tile::try_from(c) {
                    level.set_tile(loc, tile);
                    continue;
                }
                match c {
                    '@' | 'w' | 'o' | 'm' | 'W' | '$' | 't' => {
                        level.set_tile(loc, Tile::Floor);
                        spawns.push((loc, c));
                    }
                    '^' => {
                        level.set_tile(loc, Tile::Floor);
                        level.add_trap(loc, true);
                    }
                    'x' => {
                        level.set_tile(loc, Tile::Floor);
                        level.add_trap(loc, false);
                    }
                    ' ' => {}
                    _ => bail!("unknown map character {c:?}"),
                }
            }
        }

        let mut r = Runtime::new(level);
        let mut wander_group = 0;
        for (loc, c) in spawns {
            match c {
                '@' => r.spawn_player(loc),
                'w' => {
                    r.spawn_monster(&data::WOLF, loc);
                }
                'o' => {
                    r.spawn_monster(&data::ORC, loc);
                }
                'm' => {
                    r.spawn_monster(&data::MOLD, loc);
                }
                'W' => {
                    wander_group += 1;
                    let e = r.spawn_monster(&data::ORC, loc);
                    e.set(&mut r, WanderGroup(wander_group));
                }
                '$' => {
                    r.spawn_item(loc, "gold trinket", 50, false);
                }
                't' => {
                    r.spawn_item(loc, "torch", 0, true);
                }
                _ => unreachable!(),
            }
        }

        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::IsTorch;

    #[test]
    fn parse_map() {
        let r = Runtime::from_map(
            "#######\n\
             #@..w$#\n\
             #..>.t#\n\
             #######",
        )
        .unwrap();

        let p = r.player().expect("no player spawned");
        assert_eq!(p.loc(&r), Some(ivec2(1, 1)));
        assert_eq!(ivec2(3, 2).tile(&r), Tile::StairsDown);
        assert!(ivec2(4, 1).mob_at(&r).is_some());

        let torch = ivec2(5, 2).item_at(&r).unwrap();
        assert!(torch.get::<IsTorch>(&r).0);

        assert!(Runtime::from_map("").is_err());
        assert!(Runtime::from_map("#?#").is_err());
    }
}
