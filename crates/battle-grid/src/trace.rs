use battle_math::Vec2;

use crate::area::{AreaId, AreaKind, AreaMask, BattleSide};
use crate::grid::PassabilityGrid;

/// Constraints for one line trace, fixed for the whole query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceParams {
    /// Area kinds the query may stand on or cross into.
    pub allowed: AreaMask,
    /// Side issuing the query; gates fortification entry.
    pub side: BattleSide,
    /// The mover already stands on fortifications, so wall/tower boundaries
    /// are open to it.
    pub inside_wall: bool,
    /// Water counts as crossable in addition to being in `allowed`.
    pub water_passable: bool,
    /// Untracked terrain and the kind mask do not stop the walk. Water and
    /// fortification-side gates still apply.
    pub ignore_impassable: bool,
    /// Require the final point itself to lie in an allowed area; otherwise
    /// the trace reports the last point that did.
    pub check_destination: bool,
}

impl TraceParams {
    pub fn new(allowed: AreaMask, side: BattleSide) -> Self {
        Self {
            allowed,
            side,
            inside_wall: false,
            water_passable: false,
            ignore_impassable: false,
            check_destination: false,
        }
    }
}

/// Result of a trace: the furthest reachable point under the constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Furthest point reachable from the origin.
    pub point: Vec2,
    /// Area containing `point` (`AreaId::NONE` only when the walk was allowed
    /// onto untracked terrain).
    pub area: AreaId,
    /// Tracked area that refused entry, if the walk stopped at one. `None`
    /// when the segment completed, or when untracked terrain stopped it.
    pub blocked_by: Option<AreaId>,
}

impl PassabilityGrid {
    /// Walk the segment `from -> to` through the cell grid and return the
    /// furthest reachable point under `params`.
    ///
    /// Returns `None` only when the origin itself is unresolvable: it lies
    /// on no tracked area and `ignore_impassable` is off. Every other
    /// failure mode is a shortened hit, so the per-tick caller never
    /// branches on errors.
    ///
    /// The walk is a pure function of the grid contents and its inputs;
    /// identical calls return identical hits.
    pub fn trace(&self, from: Vec2, to: Vec2, params: &TraceParams) -> Option<TraceHit> {
        let origin = self.area_at(from);
        if origin.is_none() && !params.ignore_impassable {
            return None;
        }

        // Wall state while walking: seeded by the caller, then tracking the
        // terrain under the walk (stepping off the walls re-arms the gate).
        let mut inside_wall = params.inside_wall || self.is_fortification(origin);
        let mut current = origin;

        if from == to {
            return Some(TraceHit {
                point: from,
                area: origin,
                blocked_by: None,
            });
        }

        let delta = to - from;
        let cs = self.cell_size();

        let mut cx = (from.x / cs).floor() as i64;
        let mut cy = (from.y / cs).floor() as i64;

        let step_x: i64 = if delta.x > 0.0 {
            1
        } else if delta.x < 0.0 {
            -1
        } else {
            0
        };
        let step_y: i64 = if delta.y > 0.0 {
            1
        } else if delta.y < 0.0 {
            -1
        } else {
            0
        };

        // Trace parameter consumed by crossing one full cell on each axis.
        let t_step_x = if step_x != 0 {
            (cs / delta.x).abs()
        } else {
            f32::INFINITY
        };
        let t_step_y = if step_y != 0 {
            (cs / delta.y).abs()
        } else {
            f32::INFINITY
        };

        // Trace parameter of the first boundary on each axis.
        let mut t_max_x = match step_x {
            1 => (((cx + 1) as f32) * cs - from.x) / delta.x,
            -1 => ((cx as f32) * cs - from.x) / delta.x,
            _ => f32::INFINITY,
        };
        let mut t_max_y = match step_y {
            1 => (((cy + 1) as f32) * cs - from.y) / delta.y,
            -1 => ((cy as f32) * cs - from.y) / delta.y,
            _ => f32::INFINITY,
        };

        let mut last_ok_point = from;
        let mut last_ok_area = current;

        loop {
            let t_cross = t_max_x.min(t_max_y);
            if t_cross >= 1.0 {
                break;
            }

            // Exact corner hits advance both axes in one step.
            if t_max_x <= t_cross {
                cx += step_x;
                t_max_x += t_step_x;
            }
            if t_max_y <= t_cross {
                cy += step_y;
                t_max_y += t_step_y;
            }

            let next = self.area_at_cell(cx, cy);
            if next == current {
                continue;
            }

            if !self.may_enter(next, params, inside_wall) {
                return Some(TraceHit {
                    point: from + delta * t_cross,
                    area: current,
                    blocked_by: next.is_some().then_some(next),
                });
            }

            // Leaving an allowed area: its far edge is the fallback answer
            // if the destination check fails later on.
            if self.destination_ok(current, params) {
                last_ok_point = from + delta * t_cross;
                last_ok_area = current;
            }
            current = next;
            inside_wall = self.is_fortification(current);
        }

        if params.check_destination && !self.destination_ok(current, params) {
            return Some(TraceHit {
                point: last_ok_point,
                area: last_ok_area,
                blocked_by: current.is_some().then_some(current),
            });
        }

        Some(TraceHit {
            point: to,
            area: current,
            blocked_by: None,
        })
    }

    /// May the walk cross a boundary into `id`?
    fn may_enter(&self, id: AreaId, params: &TraceParams, inside_wall: bool) -> bool {
        let Some(area) = self.area(id) else {
            return params.ignore_impassable;
        };
        if !params.ignore_impassable && !params.allowed.allows(area.kind) {
            return false;
        }
        if area.kind == AreaKind::Water && !params.water_passable {
            return false;
        }
        if area.kind.is_fortification() && !inside_wall && area.side != Some(params.side) {
            return false;
        }
        true
    }

    /// May the walk come to rest on `id`? The kind mask applies here even
    /// under `ignore_impassable`; the side gate does not (standing there
    /// means the crossing was legal).
    fn destination_ok(&self, id: AreaId, params: &TraceParams) -> bool {
        let Some(area) = self.area(id) else {
            return false;
        };
        if !params.allowed.allows(area.kind) {
            return false;
        }
        area.kind != AreaKind::Water || params.water_passable
    }
}
