//! Data-driven formation definitions.
//!
//! The game's definition system supplies per-formation tuning as YAML; this
//! module compiles it into an id-indexed table. The geometry core never
//! parses anything itself — it receives compiled defs.

use std::collections::BTreeMap;

use battle_grid::{AreaKind, AreaMask};
use serde::Deserialize;
use thiserror::Error;

use crate::formation::FormationKind;

#[derive(Debug, Error)]
pub enum DefsError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("formation '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Formation tuning as written in data files.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFormationDef {
    pub kind: FormationKind,
    /// Lateral spacing between units within a row.
    pub file_spacing: f32,
    /// Distance between successive rows.
    pub rank_spacing: f32,
    /// Width/depth balance for rect-style sizing; 1.0 is square.
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    /// Lateral clamp on a row's extent. Zero disables the clamp.
    #[serde(default = "default_max_width")]
    pub max_width: f32,
    #[serde(default = "default_unit_radius")]
    pub unit_radius: f32,
    #[serde(default = "default_allowed")]
    pub allowed: Vec<AreaKind>,
    #[serde(default)]
    pub water_passable: bool,
}

fn default_aspect() -> f32 {
    1.0
}

fn default_max_width() -> f32 {
    24.0
}

fn default_unit_radius() -> f32 {
    0.5
}

fn default_allowed() -> Vec<AreaKind> {
    vec![AreaKind::OpenGround]
}

/// Compiled formation tuning handed to the geometry core. Opaque numbers as
/// far as the layout code is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationDef {
    pub kind: FormationKind,
    pub file_spacing: f32,
    pub rank_spacing: f32,
    pub aspect: f32,
    pub max_width: f32,
    pub unit_radius: f32,
    pub allowed: AreaMask,
    pub water_passable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefId(u16);

impl DefId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Name-keyed table of compiled formation defs.
#[derive(Debug, Default)]
pub struct FormationDefs {
    ids: BTreeMap<String, DefId>,
    defs: Vec<FormationDef>,
}

impl FormationDefs {
    /// Compile raw defs into the id-indexed table. Ids are assigned in
    /// name order, so the same data always compiles to the same ids.
    pub fn compile(raw: BTreeMap<String, RawFormationDef>) -> Result<Self, DefsError> {
        let mut ids = BTreeMap::new();
        let mut defs = Vec::with_capacity(raw.len());
        for (index, (name, raw_def)) in raw.into_iter().enumerate() {
            let def = compile_def(&name, raw_def)?;
            ids.insert(name, DefId(index as u16));
            defs.push(def);
        }
        Ok(Self { ids, defs })
    }

    pub fn id(&self, name: &str) -> Option<DefId> {
        self.ids.get(name).copied()
    }

    pub fn def(&self, id: DefId) -> Option<&FormationDef> {
        self.defs.get(id.index())
    }

    pub fn get(&self, name: &str) -> Option<&FormationDef> {
        self.id(name).and_then(|id| self.def(id))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn compile_def(name: &str, raw: RawFormationDef) -> Result<FormationDef, DefsError> {
    if raw.file_spacing <= 0.0 {
        return Err(invalid(name, "file_spacing must be > 0"));
    }
    if raw.rank_spacing <= 0.0 {
        return Err(invalid(name, "rank_spacing must be > 0"));
    }
    if raw.unit_radius < 0.0 {
        return Err(invalid(name, "unit_radius must be >= 0"));
    }
    if raw.allowed.is_empty() {
        return Err(invalid(name, "allowed area kinds must not be empty"));
    }

    let allowed = raw
        .allowed
        .iter()
        .fold(AreaMask::empty(), |mask, kind| mask | kind.mask());

    Ok(FormationDef {
        kind: raw.kind,
        file_spacing: raw.file_spacing,
        rank_spacing: raw.rank_spacing,
        aspect: raw.aspect,
        max_width: raw.max_width,
        unit_radius: raw.unit_radius,
        allowed,
        water_passable: raw.water_passable,
    })
}

fn invalid(name: &str, reason: &str) -> DefsError {
    DefsError::Invalid {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a `name -> def` YAML map and compile it.
pub fn load_defs(yaml: &str) -> Result<FormationDefs, DefsError> {
    let raw: BTreeMap<String, RawFormationDef> = serde_yaml::from_str(yaml)?;
    FormationDefs::compile(raw)
}
