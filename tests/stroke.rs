use vellum::*;

fn new_canvas(w: i32, h: i32) -> Surface {
    Surface::new(w, h, PixelFormat::Rgba8888).unwrap()
}

#[test]
fn stroked_square_double_close_matches_single() {
    let render = |closes: u32| {
        let mut surface = new_canvas(300, 300);
        let mut ctx = Context::new(&mut surface);
        ctx.set_source_color(Color::WHITE);
        ctx.set_line_width(2.0);
        ctx.move_to(49.0, 49.0);
        ctx.line_to(250.0, 49.0);
        ctx.line_to(250.0, 250.0);
        ctx.line_to(49.0, 250.0);
        for _ in 0..closes {
            ctx.close();
        }
        ctx.stroke().unwrap();
        surface
    };

    assert!(render(1) == render(2));
}

#[test]
fn stroke_direction_symmetry() {
    // Stroking a horizontal line in either direction with butt caps
    // produces identical pixels.
    let render = |flip: bool| {
        let mut surface = new_canvas(60, 20);
        let mut ctx = Context::new(&mut surface);
        ctx.set_source_color(Color::WHITE);
        ctx.set_line_width(3.0);
        ctx.set_line_cap(LineCap::Butt);
        if flip {
            ctx.move_to(50.0, 10.0);
            ctx.line_to(10.0, 10.0);
        } else {
            ctx.move_to(10.0, 10.0);
            ctx.line_to(50.0, 10.0);
        }
        ctx.stroke().unwrap();
        surface
    };

    assert!(render(false) == render(true));
}

#[test]
fn butt_caps_stop_flush() {
    let mut surface = new_canvas(60, 20);
    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(4.0);
    ctx.move_to(10.0, 10.0);
    ctx.line_to(50.0, 10.0);
    ctx.stroke().unwrap();

    assert!(surface.pixel(10, 10).unwrap().is_opaque());
    assert!(surface.pixel(49, 8).unwrap().is_opaque());
    assert_eq!(surface.pixel(9, 10).unwrap().alpha(), 0);
    assert_eq!(surface.pixel(50, 10).unwrap().alpha(), 0);
    // Width 4 centered on y = 10: rows 8..=11.
    assert!(surface.pixel(30, 8).unwrap().is_opaque());
    assert!(surface.pixel(30, 11).unwrap().is_opaque());
    assert_eq!(surface.pixel(30, 7).unwrap().alpha(), 0);
    assert_eq!(surface.pixel(30, 12).unwrap().alpha(), 0);
}

#[test]
fn square_caps_extend() {
    let mut surface = new_canvas(60, 20);
    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(4.0);
    ctx.set_line_cap(LineCap::Square);
    ctx.move_to(10.0, 10.0);
    ctx.line_to(50.0, 10.0);
    ctx.stroke().unwrap();

    assert!(surface.pixel(8, 10).unwrap().is_opaque());
    assert!(surface.pixel(51, 10).unwrap().is_opaque());
    assert_eq!(surface.pixel(7, 10).unwrap().alpha(), 0);
    assert_eq!(surface.pixel(52, 10).unwrap().alpha(), 0);
}

#[test]
fn round_caps_cover_the_endpoint_disc() {
    let mut surface = new_canvas(60, 24);
    let mut ctx = Context::new(&mut surface);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(8.0);
    ctx.set_line_cap(LineCap::Round);
    ctx.move_to(12.0, 12.0);
    ctx.line_to(48.0, 12.0);
    ctx.stroke().unwrap();

    // A point inside the start cap's disc but before the segment body.
    assert!(surface.pixel(9, 12).unwrap().is_opaque());
    // Corner of the would-be square cap stays empty for round caps.
    assert_eq!(surface.pixel(8, 8).unwrap().alpha(), 0);
}

#[test]
fn closed_stroke_leaves_the_middle_hollow() {
    let mut surface = new_canvas(100, 100);
    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(4.0);
    ctx.rectangle(20.0, 20.0, 60.0, 60.0);
    ctx.stroke().unwrap();

    // On the outline.
    assert!(surface.pixel(50, 20).unwrap().is_opaque());
    assert!(surface.pixel(20, 50).unwrap().is_opaque());
    // Inside the ring: hollow.
    assert_eq!(surface.pixel(50, 50).unwrap().alpha(), 0);
    // Outside.
    assert_eq!(surface.pixel(10, 50).unwrap().alpha(), 0);
}

#[test]
fn miter_join_fills_the_corner() {
    let render = |join: LineJoin| {
        let mut surface = new_canvas(60, 60);
        let mut ctx = Context::new(&mut surface);
        ctx.set_anti_alias(AntiAlias::None);
        ctx.set_source_color(Color::WHITE);
        ctx.set_line_width(8.0);
        ctx.set_line_join(join);
        ctx.move_to(10.0, 40.0);
        ctx.line_to(40.0, 40.0);
        ctx.line_to(40.0, 10.0);
        ctx.stroke().unwrap();
        surface
    };

    let miter = render(LineJoin::Miter);
    let bevel = render(LineJoin::Bevel);

    // The sharp miter tip extends past the beveled corner.
    assert!(miter.pixel(43, 43).unwrap().is_opaque());
    assert_eq!(bevel.pixel(43, 43).unwrap().alpha(), 0);
    // Both cover the joint interior.
    assert!(miter.pixel(40, 40).unwrap().is_opaque());
    assert!(bevel.pixel(40, 40).unwrap().is_opaque());
}

#[test]
fn dashes_leave_gaps_and_honor_offset() {
    let mut surface = new_canvas(100, 10);
    {
        let mut ctx = Context::new(&mut surface);
        ctx.set_anti_alias(AntiAlias::None);
        ctx.set_source_color(Color::WHITE);
        ctx.set_line_width(2.0);
        ctx.set_dash(&[6.0, 4.0], 0.0);
        ctx.move_to(0.0, 5.0);
        ctx.line_to(100.0, 5.0);
        ctx.stroke().unwrap();
    }

    assert!(surface.pixel(2, 5).unwrap().is_opaque());
    assert_eq!(surface.pixel(8, 5).unwrap().alpha(), 0);
    assert!(surface.pixel(12, 5).unwrap().is_opaque());

    // With an offset the pattern shifts back by two units.
    let mut shifted = new_canvas(100, 10);
    {
        let mut ctx = Context::new(&mut shifted);
        ctx.set_anti_alias(AntiAlias::None);
        ctx.set_source_color(Color::WHITE);
        ctx.set_line_width(2.0);
        ctx.set_dash(&[6.0, 4.0], 2.0);
        ctx.move_to(0.0, 5.0);
        ctx.line_to(100.0, 5.0);
        ctx.stroke().unwrap();
    }
    assert!(shifted.pixel(2, 5).unwrap().is_opaque());
    assert_eq!(shifted.pixel(5, 5).unwrap().alpha(), 0);
}

#[test]
fn zero_width_stroke_is_a_noop() {
    let mut surface = new_canvas(40, 40);
    let before = surface.clone();
    let mut ctx = Context::new(&mut surface);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(0.0);
    ctx.move_to(5.0, 5.0);
    ctx.line_to(35.0, 35.0);
    ctx.stroke().unwrap();
    assert!(surface == before);
}

#[test]
fn degenerate_dot_with_round_cap() {
    let mut surface = new_canvas(20, 20);
    let mut ctx = Context::new(&mut surface);
    ctx.set_source_color(Color::WHITE);
    ctx.set_line_width(6.0);
    ctx.set_line_cap(LineCap::Round);
    ctx.move_to(10.0, 10.0);
    ctx.line_to(10.0, 10.0);
    ctx.stroke().unwrap();

    assert!(surface.pixel(10, 10).unwrap().alpha() > 0);
    assert!(surface.pixel(8, 10).unwrap().alpha() > 0);
    assert_eq!(surface.pixel(2, 2).unwrap().alpha(), 0);
}

#[test]
fn hairline_bypasses_expansion() {
    let mut surface = new_canvas(40, 40);
    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_source_color(Color::WHITE);
    ctx.set_hairline(true);
    ctx.set_line_width(10.0); // ignored by the hairline path
    ctx.move_to(5.0, 20.0);
    ctx.line_to(35.0, 20.0);
    ctx.stroke().unwrap();

    assert!(surface.pixel(20, 20).unwrap().is_opaque());
    assert_eq!(surface.pixel(20, 19).unwrap().alpha(), 0);
    assert_eq!(surface.pixel(20, 21).unwrap().alpha(), 0);
}
