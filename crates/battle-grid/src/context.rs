use battle_math::Vec2;

use crate::grid::PassabilityGrid;
use crate::trace::{TraceHit, TraceParams};

/// Everything one row-layout pass needs to trace, captured up front.
///
/// Borrowing the grid ties the snapshot's lifetime to the single layout call
/// that builds it; the live formation can mutate freely without a trace
/// re-reading it halfway through. Construct once per pass, drop on return.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    grid: &'a PassabilityGrid,
    params: TraceParams,
    unit_radius: f32,
    max_width: f32,
}

impl<'a> LineContext<'a> {
    pub fn new(
        grid: &'a PassabilityGrid,
        params: TraceParams,
        unit_radius: f32,
        max_width: f32,
    ) -> Self {
        Self {
            grid,
            params,
            unit_radius,
            max_width,
        }
    }

    pub fn grid(&self) -> &'a PassabilityGrid {
        self.grid
    }

    pub fn params(&self) -> &TraceParams {
        &self.params
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Most units one row can hold at `spacing` under the width clamp.
    pub fn max_per_row(&self, spacing: f32) -> u32 {
        if self.max_width <= 0.0 || spacing <= 0.0 {
            u32::MAX
        } else {
            (self.max_width / spacing).floor() as u32 + 1
        }
    }

    /// Trace with the captured constraints, keeping the caller's body radius
    /// clear of whatever shortened the walk.
    pub fn trace(&self, from: Vec2, to: Vec2) -> Option<TraceHit> {
        let mut hit = self.grid.trace(from, to, &self.params)?;
        if self.unit_radius > 0.0 && hit.point != to {
            let dir = (to - from).normalize_or_zero();
            let travelled = (hit.point - from).length();
            hit.point = from + dir * (travelled - self.unit_radius).max(0.0);
        }
        Some(hit)
    }
}
