use battle_math::Vec2;
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Terrain classification of a passable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AreaKind {
    OpenGround,
    Wall,
    Tower,
    Water,
}

impl AreaKind {
    pub fn mask(self) -> AreaMask {
        match self {
            AreaKind::OpenGround => AreaMask::OPEN_GROUND,
            AreaKind::Wall => AreaMask::WALL,
            AreaKind::Tower => AreaMask::TOWER,
            AreaKind::Water => AreaMask::WATER,
        }
    }

    /// Walls and towers share crossing rules: entry is gated by battle side
    /// or an already-on-the-walls state.
    pub fn is_fortification(self) -> bool {
        matches!(self, AreaKind::Wall | AreaKind::Tower)
    }
}

bitflags! {
    /// Set of area kinds a query is willing to stand on or cross into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AreaMask: u8 {
        const OPEN_GROUND = 1 << 0;
        const WALL = 1 << 1;
        const TOWER = 1 << 2;
        const WATER = 1 << 3;
    }
}

impl AreaMask {
    pub const GROUND: AreaMask = AreaMask::OPEN_GROUND;

    pub fn allows(self, kind: AreaKind) -> bool {
        self.contains(kind.mask())
    }
}

impl From<AreaKind> for AreaMask {
    fn from(kind: AreaKind) -> AreaMask {
        kind.mask()
    }
}

/// Which side of the battle a query (or a fortification) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleSide {
    Attacker,
    Defender,
}

/// Identifier of a tracked area within one grid.
///
/// The raw value 0 is reserved: it means "not resolved to any area". Values
/// greater than zero index the grid's area table. Ids are stable for the
/// lifetime of the grid that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AreaId(u16);

impl AreaId {
    pub const NONE: AreaId = AreaId(0);

    pub(crate) fn from_index(index: usize) -> AreaId {
        AreaId(index as u16 + 1)
    }

    pub(crate) fn index(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0 as usize - 1)
        }
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn is_some(self) -> bool {
        self.0 != 0
    }

    pub fn raw(self) -> u16 {
        self.0
    }
}

/// A typed axis-aligned region of the battlefield grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassableArea {
    pub id: AreaId,
    pub kind: AreaKind,
    /// Side that holds this area; only meaningful for fortifications.
    pub side: Option<BattleSide>,
    pub min: Vec2,
    pub max: Vec2,
}
