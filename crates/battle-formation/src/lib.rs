//! Row-by-row squad formation layout over the passability grid.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod defs;
pub mod formation;
pub mod line;
pub mod pool;

pub use defs::{load_defs, DefId, DefsError, FormationDef, FormationDefs, RawFormationDef};
pub use formation::{Formation, FormationKind, SquadId};
pub use line::Line;
pub use pool::{FormationHandle, FormationPool};
