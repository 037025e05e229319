use battle_formation::{Formation, FormationDef, FormationKind, SquadId};
use battle_grid::{AreaKind, AreaMask, BattleSide, LineContext, PassabilityGrid, TraceParams, Vec2};

fn open_field() -> PassabilityGrid {
    let mut grid = PassabilityGrid::new(100, 100, 1.0);
    grid.add_area(
        AreaKind::OpenGround,
        None,
        Vec2::new(0.0, 0.0),
        Vec2::new(100.0, 100.0),
    );
    grid
}

fn def(kind: FormationKind) -> FormationDef {
    FormationDef {
        kind,
        file_spacing: 2.0,
        rank_spacing: 2.0,
        aspect: 1.0,
        max_width: 24.0,
        unit_radius: 0.5,
        allowed: AreaMask::OPEN_GROUND,
        water_passable: false,
    }
}

#[test]
fn triangle_rows_follow_triangular_numbers() {
    let grid = open_field();
    for (n, expected_rows) in [(1, 1), (3, 2), (6, 3), (10, 4), (15, 5)] {
        let mut formation = Formation::from_def(&def(FormationKind::Triangle), BattleSide::Attacker, SquadId(1));
        formation.set_count(n);
        assert_eq!(formation.rows(), expected_rows, "n = {n}");

        formation.reposition(Vec2::new(50.0, 50.0), Vec2::new(0.0, 1.0), &grid);
        assert_eq!(
            formation.slots().len(),
            n as usize,
            "every unit placed for n = {n}"
        );
    }
}

#[test]
fn rect_set_count_is_idempotent() {
    let mut formation = Formation::from_def(&def(FormationKind::Rect), BattleSide::Attacker, SquadId(1));
    for n in [0, 1, 7, 9, 50, 144] {
        formation.set_count(n);
        let first = (formation.rows(), formation.cols());
        formation.set_count(n);
        assert_eq!((formation.rows(), formation.cols()), first, "n = {n}");
    }
}

#[test]
fn zero_count_produces_zero_rows() {
    let grid = open_field();
    let mut formation = Formation::from_def(&def(FormationKind::Rect), BattleSide::Attacker, SquadId(1));
    formation.set_count(0);
    assert_eq!(formation.rows(), 0);

    formation.reposition(Vec2::new(50.0, 50.0), Vec2::new(0.0, 1.0), &grid);
    assert!(formation.slots().is_empty());
    assert_eq!(formation.unit_position(0), None);
}

#[test]
fn nine_units_form_a_centered_square() {
    let grid = open_field();
    let mut formation = Formation::from_def(&def(FormationKind::Rect), BattleSide::Attacker, SquadId(1));
    formation.set_count(9);
    assert_eq!((formation.rows(), formation.cols()), (3, 3));

    let anchor = Vec2::new(50.0, 50.0);
    formation.reposition(anchor, Vec2::new(0.0, 1.0), &grid);
    assert_eq!(formation.slots().len(), 9);

    for row in 0..3u32 {
        let y = 50.0 - 2.0 * row as f32;
        let base = (row * 3) as usize;
        assert_eq!(formation.slots()[base], Vec2::new(48.0, y));
        assert_eq!(formation.slots()[base + 1], Vec2::new(50.0, y));
        assert_eq!(formation.slots()[base + 2], Vec2::new(52.0, y));
    }

    // The middle column sits on the anchor's perpendicular axis.
    for row in 0..3u32 {
        assert_eq!(formation.slots()[(row * 3 + 1) as usize].x, anchor.x);
    }
}

#[test]
fn checkerboard_offsets_odd_rows_on_open_ground() {
    let grid = open_field();

    let rect = Formation::from_def(&def(FormationKind::Rect), BattleSide::Attacker, SquadId(1));
    let checker = Formation::from_def(&def(FormationKind::Checkerboard), BattleSide::Attacker, SquadId(1));

    let params = TraceParams::new(AreaMask::OPEN_GROUND, BattleSide::Attacker);
    let ctx = LineContext::new(&grid, params, 0.0, 24.0);

    let anchor = Vec2::new(50.0, 48.0);
    let facing = Vec2::new(0.0, 1.0);

    let straight = rect.calc_line(&ctx, 1, 3, anchor, facing, 2.0, 0.0, false);
    let shifted = checker.calc_line(&ctx, 1, 3, anchor, facing, 2.0, 0.0, false);

    assert_eq!(shifted.count, straight.count);
    assert_eq!(shifted.start, straight.start + Vec2::new(1.0, 0.0));

    // Even rows stay put.
    let even = checker.calc_line(&ctx, 2, 3, anchor, facing, 2.0, 0.0, false);
    assert_eq!(even, straight);
}

#[test]
fn checkerboard_falls_back_when_the_offset_is_impassable() {
    // A 2-unit-wide corridor: the half-spacing probe from the row anchor
    // leaves the tracked strip, so the offset must be abandoned.
    let mut grid = PassabilityGrid::new(20, 20, 1.0);
    grid.add_area(
        AreaKind::OpenGround,
        None,
        Vec2::new(8.0, 0.0),
        Vec2::new(10.0, 20.0),
    );

    let mut narrow = def(FormationKind::Rect);
    narrow.unit_radius = 0.0;
    let rect = Formation::from_def(&narrow, BattleSide::Attacker, SquadId(1));
    narrow.kind = FormationKind::Checkerboard;
    let checker = Formation::from_def(&narrow, BattleSide::Attacker, SquadId(1));

    let params = TraceParams::new(AreaMask::OPEN_GROUND, BattleSide::Attacker);
    let ctx = LineContext::new(&grid, params, 0.0, 24.0);

    let anchor = Vec2::new(9.0, 10.0);
    let facing = Vec2::new(0.0, 1.0);

    // Spacing 3: the half-spacing probe at (10.5, 10) is clearly off the
    // strip, not just touching its edge.
    let straight = rect.calc_line(&ctx, 1, 3, anchor, facing, 3.0, 0.0, false);
    let fallback = checker.calc_line(&ctx, 1, 3, anchor, facing, 3.0, 0.0, false);

    assert!(straight.count > 0);
    assert_eq!(fallback, straight);
}

#[test]
fn rows_off_the_tracked_area_collapse_onto_the_previous_row() {
    // Only a one-row-deep strip of ground: back rows have nowhere to stand
    // and must crowd the front line instead of vanishing.
    let mut grid = PassabilityGrid::new(100, 100, 1.0);
    grid.add_area(
        AreaKind::OpenGround,
        None,
        Vec2::new(0.0, 49.0),
        Vec2::new(100.0, 51.0),
    );

    let mut formation = Formation::from_def(&def(FormationKind::Rect), BattleSide::Attacker, SquadId(1));
    formation.set_count(9);
    formation.reposition(Vec2::new(50.0, 50.0), Vec2::new(0.0, 1.0), &grid);

    assert_eq!(formation.slots().len(), 9);
    let front: Vec<_> = formation.slots()[0..3].to_vec();
    assert_eq!(&formation.slots()[3..6], front.as_slice());
    assert_eq!(&formation.slots()[6..9], front.as_slice());
}

#[test]
fn layout_is_deterministic() {
    let grid = open_field();
    let mut a = Formation::from_def(&def(FormationKind::Checkerboard), BattleSide::Defender, SquadId(1));
    let mut b = Formation::from_def(&def(FormationKind::Checkerboard), BattleSide::Defender, SquadId(1));

    for formation in [&mut a, &mut b] {
        formation.set_count(23);
        formation.reposition(Vec2::new(41.5, 63.25), Vec2::new(0.7, -0.3), &grid);
    }

    assert_eq!(a.slots(), b.slots());
}

#[test]
fn no_limit_lifts_the_width_clamp() {
    let grid = open_field();
    let mut wide = def(FormationKind::Rect);
    wide.max_width = 4.0; // three columns at spacing 2
    let formation = Formation::from_def(&wide, BattleSide::Attacker, SquadId(1));

    let params = TraceParams::new(AreaMask::OPEN_GROUND, BattleSide::Attacker);
    let ctx = LineContext::new(&grid, params, 0.0, wide.max_width);

    let anchor = Vec2::new(50.0, 50.0);
    let facing = Vec2::new(0.0, 1.0);

    let clamped = formation.calc_line(&ctx, 0, 10, anchor, facing, 2.0, 0.0, false);
    assert_eq!(clamped.count, 3);

    let unclamped = formation.calc_line(&ctx, 0, 10, anchor, facing, 2.0, 0.0, true);
    assert_eq!(unclamped.count, 10);
}
