use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct RoomId;
    pub struct CellId;
}

/// Integer tile position. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn squared_distance(self, other: Self) -> u64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        (dx * dx + dy * dy) as u64
    }

    /// Left, right, below, above.
    pub fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            Self { x: self.x - 1, y: self.y },
            Self { x: self.x + 1, y: self.y },
            Self { x: self.x, y: self.y - 1 },
            Self { x: self.x, y: self.y + 1 },
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
}

impl TileKind {
    pub fn value(self) -> u8 {
        match self {
            Self::Floor => 0,
            Self::Wall => 1,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Floor => Self::Wall,
            Self::Wall => Self::Floor,
        }
    }
}
