use battle_math::Vec2;

use crate::area::{AreaId, AreaKind, BattleSide, PassableArea};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A position resolved against the grid's area table.
///
/// Recomputed whenever the owning unit or anchor moves; never kept across
/// ticks. `area` is `AreaId::NONE` when the point is on untracked terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPos {
    pub point: Vec2,
    pub area: AreaId,
}

/// Dense cell grid classifying the battlefield into passable areas.
///
/// Areas are painted in registration order; a later area overwrites the
/// cells it covers (walls are painted over the ground they stand on). The
/// grid is read-only during trace queries.
#[derive(Debug, Clone)]
pub struct PassabilityGrid {
    width: u32,
    height: u32,
    cell_size: f32,
    cells: Vec<AreaId>,
    areas: Vec<PassableArea>,
}

impl PassabilityGrid {
    pub fn new(width: u32, height: u32, cell_size: f32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        assert!(cell_size > 0.0, "cell_size must be > 0");
        Self {
            width,
            height,
            cell_size,
            cells: vec![AreaId::NONE; (width as usize) * (height as usize)],
            areas: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Register an area covering `[min, max)` and paint its cells.
    pub fn add_area(
        &mut self,
        kind: AreaKind,
        side: Option<BattleSide>,
        min: Vec2,
        max: Vec2,
    ) -> AreaId {
        let id = AreaId::from_index(self.areas.len());
        self.areas.push(PassableArea {
            id,
            kind,
            side,
            min,
            max,
        });

        let cs = self.cell_size;
        let x0 = (min.x / cs).floor().max(0.0) as u32;
        let y0 = (min.y / cs).floor().max(0.0) as u32;
        let x1 = ((max.x / cs).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((max.y / cs).ceil().max(0.0) as u32).min(self.height);

        for cy in y0..y1 {
            let row = (cy as usize) * (self.width as usize);
            for cx in x0..x1 {
                self.cells[row + cx as usize] = id;
            }
        }

        id
    }

    pub fn areas(&self) -> &[PassableArea] {
        &self.areas
    }

    pub fn area(&self, id: AreaId) -> Option<&PassableArea> {
        id.index().and_then(|i| self.areas.get(i))
    }

    pub(crate) fn area_at_cell(&self, cx: i64, cy: i64) -> AreaId {
        if cx < 0 || cy < 0 || cx >= self.width as i64 || cy >= self.height as i64 {
            return AreaId::NONE;
        }
        self.cells[(cy as usize) * (self.width as usize) + cx as usize]
    }

    /// Area id under a world-space point, `AreaId::NONE` off the tracked
    /// grid.
    pub fn area_at(&self, point: Vec2) -> AreaId {
        let cx = (point.x / self.cell_size).floor() as i64;
        let cy = (point.y / self.cell_size).floor() as i64;
        self.area_at_cell(cx, cy)
    }

    /// Bind a point to the area under it.
    pub fn resolve(&self, point: Vec2) -> GridPos {
        GridPos {
            point,
            area: self.area_at(point),
        }
    }

    pub(crate) fn is_fortification(&self, id: AreaId) -> bool {
        self.area(id).map(|a| a.kind.is_fortification()).unwrap_or(false)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct GridSerde {
    width: u32,
    height: u32,
    cell_size: f32,
    areas: Vec<PassableArea>,
}

#[cfg(feature = "serde")]
impl Serialize for PassabilityGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        GridSerde {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            areas: self.areas.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PassabilityGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = GridSerde::deserialize(deserializer)?;
        let mut grid = PassabilityGrid::new(data.width, data.height, data.cell_size);
        // Repaint in registration order so cell ownership comes out identical.
        for area in data.areas {
            grid.add_area(area.kind, area.side, area.min, area.max);
        }
        Ok(grid)
    }
}
