use battle_grid::{AreaMask, BattleSide, LineContext, PassabilityGrid, TraceParams};
use battle_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::defs::FormationDef;
use crate::line::Line;

/// Geometry rule of a formation. Row sizing and per-row line placement are
/// dispatched on this tag; there is no trait object in the layout loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationKind {
    Rect,
    Triangle,
    Checkerboard,
}

/// Identifier of the squad that owns a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SquadId(pub u64);

/// A squad's formation: sizing state plus the slot positions of its last
/// layout pass.
///
/// Lifecycle: `from_def` (or pool `acquire`) -> `set_count` -> `reposition`,
/// with the latter two repeated freely as the squad changes. Returning the
/// instance to a pool and `init`-ing it for a new owner is the only form of
/// teardown.
#[derive(Debug, Clone)]
pub struct Formation {
    kind: FormationKind,
    file_spacing: f32,
    rank_spacing: f32,
    aspect: f32,
    max_width: f32,
    unit_radius: f32,
    allowed: AreaMask,
    water_passable: bool,
    side: BattleSide,
    owner: SquadId,
    inside_wall: bool,
    anchor: Vec2,
    facing: Vec2,
    count: u32,
    rows: u32,
    cols: u32,
    slots: Vec<Vec2>,
}

impl Formation {
    /// Factory dispatched by the def's kind tag.
    pub fn from_def(def: &FormationDef, side: BattleSide, owner: SquadId) -> Self {
        let mut formation = Self {
            kind: def.kind,
            file_spacing: 0.0,
            rank_spacing: 0.0,
            aspect: 1.0,
            max_width: 0.0,
            unit_radius: 0.0,
            allowed: AreaMask::GROUND,
            water_passable: false,
            side,
            owner,
            inside_wall: false,
            anchor: Vec2::ZERO,
            facing: Vec2::new(0.0, 1.0),
            count: 0,
            rows: 0,
            cols: 0,
            slots: Vec::new(),
        };
        formation.init(def, side, owner);
        formation
    }

    /// Reset to a fresh state for a new owner.
    ///
    /// The slot buffer keeps its capacity, so recycled formations do not
    /// reallocate inside the battle update loop.
    pub fn init(&mut self, def: &FormationDef, side: BattleSide, owner: SquadId) {
        self.kind = def.kind;
        self.file_spacing = def.file_spacing;
        self.rank_spacing = def.rank_spacing;
        self.aspect = def.aspect;
        self.max_width = def.max_width;
        self.unit_radius = def.unit_radius;
        self.allowed = def.allowed;
        self.water_passable = def.water_passable;
        self.side = side;
        self.owner = owner;
        self.inside_wall = false;
        self.anchor = Vec2::ZERO;
        self.facing = Vec2::new(0.0, 1.0);
        self.count = 0;
        self.rows = 0;
        self.cols = 0;
        self.slots.clear();
    }

    pub fn kind(&self) -> FormationKind {
        self.kind
    }

    pub fn side(&self) -> BattleSide {
        self.side
    }

    pub fn owner(&self) -> SquadId {
        self.owner
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn inside_wall(&self) -> bool {
        self.inside_wall
    }

    /// Mark the squad as standing on fortifications; traces from here may
    /// cross wall and tower boundaries.
    pub fn set_inside_wall(&mut self, inside_wall: bool) {
        self.inside_wall = inside_wall;
    }

    /// Slot positions from the last layout pass, row-major front to back.
    pub fn slots(&self) -> &[Vec2] {
        &self.slots
    }

    pub fn unit_position(&self, slot: u32) -> Option<Vec2> {
        self.slots.get(slot as usize).copied()
    }

    /// Resize to `count` units, recomputing rows and columns by the kind's
    /// geometry rule. Zero is not an error; it just produces zero rows.
    pub fn set_count(&mut self, count: u32) {
        self.count = count;
        let (rows, cols) = match self.kind {
            FormationKind::Rect | FormationKind::Checkerboard => {
                rect_dims(count, self.aspect, self.max_columns())
            }
            FormationKind::Triangle => triangle_dims(count),
        };
        self.rows = rows;
        self.cols = cols;
    }

    /// Lay the formation out around a new anchor and facing.
    ///
    /// Rows are computed front to back in a fixed order; each row snaps to
    /// passable terrain through the tracer. Rows whose line comes up short
    /// crowd their leftover units onto the last usable line, so one slot
    /// exists per unit no matter how hostile the terrain.
    pub fn reposition(&mut self, anchor: Vec2, facing: Vec2, grid: &PassabilityGrid) {
        self.anchor = anchor;
        let facing = facing.normalize_or_zero();
        self.facing = if facing == Vec2::ZERO {
            Vec2::new(0.0, 1.0)
        } else {
            facing
        };

        let ctx = LineContext::new(grid, self.trace_params(), self.unit_radius, self.max_width);

        self.slots.clear();
        let mut remaining = self.count;
        let mut prev_line: Option<Line> = None;

        for row in 0..self.rows {
            if remaining == 0 {
                break;
            }
            let desired = self.row_size(row).min(remaining);
            if desired == 0 {
                continue;
            }

            let row_anchor = self.anchor - self.facing * (self.rank_spacing * row as f32);
            let line = self.calc_line(
                &ctx,
                row,
                desired,
                row_anchor,
                self.facing,
                self.file_spacing,
                0.0,
                false,
            );

            let placed = line.count.min(desired);
            for i in 0..placed {
                self.slots.push(line.point(i));
            }

            let shortfall = desired - placed;
            if shortfall > 0 {
                let fallback = if placed > 0 {
                    Some(&line)
                } else {
                    prev_line.as_ref()
                };
                match fallback {
                    Some(fb) if fb.count > 0 => {
                        for i in 0..shortfall {
                            self.slots.push(fb.point(i % fb.count));
                        }
                    }
                    _ => {
                        for _ in 0..shortfall {
                            self.slots.push(row_anchor);
                        }
                    }
                }
            }

            remaining -= desired;
            if line.count > 0 {
                prev_line = Some(line);
            }
        }
    }

    /// Compute one row's line: starting point, direction and slot count.
    ///
    /// The row runs along `facing.right()`, centered on the anchor's
    /// perpendicular axis, snapped to passable terrain by tracing first to
    /// the left end and then across the row's extent. `no_limit` lifts the
    /// max-width clamp for rows that may stretch (siege approach lines).
    #[allow(clippy::too_many_arguments)]
    pub fn calc_line(
        &self,
        ctx: &LineContext<'_>,
        row: u32,
        max_count: u32,
        anchor: Vec2,
        facing: Vec2,
        spacing: f32,
        extra_distance: f32,
        no_limit: bool,
    ) -> Line {
        match self.kind {
            FormationKind::Checkerboard => self.calc_line_offset(
                ctx,
                row,
                max_count,
                anchor,
                facing,
                spacing,
                extra_distance,
                no_limit,
            ),
            FormationKind::Rect | FormationKind::Triangle => {
                calc_line_straight(ctx, max_count, anchor, facing, spacing, extra_distance, no_limit)
            }
        }
    }

    /// Checkerboard rows: odd rows shift half a spacing to the right, but
    /// only when the shifted anchor is itself reachable and passable.
    /// Anything else falls back to the straight row.
    #[allow(clippy::too_many_arguments)]
    fn calc_line_offset(
        &self,
        ctx: &LineContext<'_>,
        row: u32,
        max_count: u32,
        anchor: Vec2,
        facing: Vec2,
        spacing: f32,
        extra_distance: f32,
        no_limit: bool,
    ) -> Line {
        if row % 2 == 1 && spacing > 0.0 {
            let offset = facing.right().normalize_or_zero() * (spacing * 0.5);
            let probe = anchor + offset;
            if let Some(hit) = ctx.trace(anchor, probe) {
                if hit.point == probe {
                    return calc_line_straight(
                        ctx,
                        max_count,
                        probe,
                        facing,
                        spacing,
                        extra_distance,
                        no_limit,
                    );
                }
            }
        }
        calc_line_straight(ctx, max_count, anchor, facing, spacing, extra_distance, no_limit)
    }

    fn row_size(&self, row: u32) -> u32 {
        match self.kind {
            FormationKind::Rect | FormationKind::Checkerboard => self.cols,
            FormationKind::Triangle => row + 1,
        }
    }

    fn max_columns(&self) -> u32 {
        if self.max_width <= 0.0 || self.file_spacing <= 0.0 {
            u32::MAX
        } else {
            (self.max_width / self.file_spacing).floor() as u32 + 1
        }
    }

    fn trace_params(&self) -> TraceParams {
        let mut params = TraceParams::new(self.allowed, self.side);
        params.inside_wall = self.inside_wall;
        params.water_passable = self.water_passable;
        params.check_destination = true;
        params
    }
}

fn calc_line_straight(
    ctx: &LineContext<'_>,
    max_count: u32,
    anchor: Vec2,
    facing: Vec2,
    spacing: f32,
    extra_distance: f32,
    no_limit: bool,
) -> Line {
    let right = facing.right().normalize_or_zero();
    if right == Vec2::ZERO {
        return Line::empty(anchor, right);
    }

    let count = if no_limit {
        max_count
    } else {
        max_count.min(ctx.max_per_row(spacing))
    };
    if count == 0 {
        return Line::empty(anchor, right);
    }

    if spacing <= 0.0 {
        // Degenerate spacing: the whole row collapses onto the snapped
        // anchor. Not an error.
        let Some(hit) = ctx.trace(anchor, anchor) else {
            return Line::empty(anchor, right);
        };
        return Line {
            start: hit.point,
            dir: right,
            spacing: 0.0,
            count,
        };
    }

    let half = (count - 1) as f32 * spacing * 0.5;
    let left_goal = anchor - right * (half + extra_distance);
    let Some(left) = ctx.trace(anchor, left_goal) else {
        return Line::empty(anchor, right);
    };
    let start = left.point;

    let span = (count - 1) as f32 * spacing + extra_distance;
    if span <= 0.0 {
        return Line {
            start,
            dir: right,
            spacing,
            count: 1,
        };
    }

    let right_goal = start + right * span;
    let Some(reach) = ctx.trace(start, right_goal) else {
        return Line {
            start,
            dir: right,
            spacing,
            count: 1,
        };
    };

    let length = reach.point.distance(start);
    let fit = ((length / spacing + 1e-4).floor() as u32 + 1).min(count);
    Line {
        start,
        dir: right,
        spacing,
        count: fit,
    }
}

fn rect_dims(count: u32, aspect: f32, max_cols: u32) -> (u32, u32) {
    if count == 0 {
        return (0, 0);
    }
    let balanced = (f64::from(count) * f64::from(aspect.max(0.01))).sqrt().ceil() as u32;
    let cols = balanced.max(1).min(max_cols.max(1));
    let rows = count.div_ceil(cols);
    (rows, cols)
}

/// Triangular-number inversion: the smallest `r` with `r (r + 1) / 2 >= n`.
fn triangle_dims(count: u32) -> (u32, u32) {
    if count == 0 {
        return (0, 0);
    }
    let rows = (((1.0 + 8.0 * f64::from(count)).sqrt() - 1.0) / 2.0).ceil() as u32;
    let rows = rows.max(1);
    (rows, rows)
}
