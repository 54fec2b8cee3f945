use serde::{Deserialize, Serialize};

/// Specific terrain in a single game world map cell.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    Door,
    SecretDoor,
    Rubble,
    Chasm,
    StairsDown,
}

use Tile::*;

impl Tile {
    pub fn blocks_sight(self) -> bool {
        matches!(self, Wall | Door | SecretDoor | Rubble)
    }

    /// Whether a walking creature can enter the cell.
    ///
    /// Doors count as passable, opening one is folded into the move. Secret
    /// doors are wall until discovered.
    pub fn is_passable(self) -> bool {
        matches!(self, Floor | Door | StairsDown)
    }

    /// Whether sound propagates through the cell.
    ///
    /// Secret doors are deliberately not soundproof, noise flowing through
    /// them is how listeners on the far side stay connected.
    pub fn carries_sound(self) -> bool {
        !matches!(self, Wall | Rubble)
    }

    /// Wall-like for purposes of spotting dead ends and secret door sites.
    ///
    /// Rubble is excluded, a dead end closed off by rubble was dug open at
    /// some point and is not suspicious.
    pub fn is_solid_wall(self) -> bool {
        matches!(self, Wall | SecretDoor)
    }
}

impl TryFrom<char> for Tile {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '#' => Ok(Wall),
            '.' => Ok(Floor),
            '+' => Ok(Door),
            's' => Ok(SecretDoor),
            ';' => Ok(Rubble),
            '~' => Ok(Chasm),
            '>' => Ok(StairsDown),
            _ => Err("bad tile char"),
        }
    }
}

impl From<Tile> for char {
    fn from(value: Tile) -> Self {
        match value {
            Wall => '#',
            Floor => '.',
            Door => '+',
            SecretDoor => 's',
            Rubble => ';',
            Chasm => '~',
            StairsDown => '>',
        }
    }
}
