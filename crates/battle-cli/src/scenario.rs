//! Scenario files: a grid, its areas, formation defs and squads, in YAML.

use std::collections::BTreeMap;

use battle_formation::RawFormationDef;
use battle_grid::{AreaKind, BattleSide, PassabilityGrid};
use battle_math::Vec2;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub grid: GridSpec,
    pub areas: Vec<AreaSpec>,
    #[serde(default)]
    pub defs: BTreeMap<String, RawFormationDef>,
    #[serde(default)]
    pub squads: Vec<SquadSpec>,
}

#[derive(Debug, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

fn default_cell_size() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct AreaSpec {
    pub kind: AreaKind,
    #[serde(default)]
    pub side: Option<BattleSide>,
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Debug, Deserialize)]
pub struct SquadSpec {
    pub name: String,
    /// Name of the formation def this squad uses.
    pub def: String,
    pub side: BattleSide,
    pub count: u32,
    pub anchor: Vec2,
    pub facing: Vec2,
    #[serde(default)]
    pub inside_wall: bool,
}

impl Scenario {
    pub fn build_grid(&self) -> PassabilityGrid {
        let mut grid =
            PassabilityGrid::new(self.grid.width, self.grid.height, self.grid.cell_size);
        for area in &self.areas {
            grid.add_area(area.kind, area.side, area.min, area.max);
        }
        grid
    }
}
