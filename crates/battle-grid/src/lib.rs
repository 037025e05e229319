//! Passability grid and deterministic line tracer for battlefield layout.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod area;
pub mod context;
pub mod grid;
pub mod trace;

pub use area::{AreaId, AreaKind, AreaMask, BattleSide, PassableArea};
pub use battle_math::Vec2;
pub use context::LineContext;
pub use grid::{GridPos, PassabilityGrid};
pub use trace::{TraceHit, TraceParams};
