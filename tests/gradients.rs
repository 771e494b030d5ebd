use vellum::*;

fn rgb_at(surface: &Surface, x: i32, y: i32) -> (u8, u8, u8) {
    let c = surface.pixel(x, y).unwrap().to_rgba();
    (c.red(), c.green(), c.blue())
}

fn red_blue_stops() -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, Color::from_rgb(1.0, 0.0, 0.0)),
        GradientStop::new(1.0, Color::from_rgb(0.0, 0.0, 1.0)),
    ]
}

#[test]
fn linear_gradient_left_to_right() {
    let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
    let gradient = Gradient::new_linear(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(99.0, 0.0),
        red_blue_stops(),
    )
    .unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_operator(Operator::Source);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 1.0);
    ctx.fill().unwrap();

    assert_eq!(rgb_at(&surface, 0, 0), (255, 0, 0));
    assert_eq!(rgb_at(&surface, 99, 0), (0, 0, 255));

    let (r, _, b) = rgb_at(&surface, 50, 0);
    assert!((i32::from(r) - 128).abs() <= 3, "r = {}", r);
    assert!((i32::from(b) - 128).abs() <= 3, "b = {}", b);
}

#[test]
fn linear_gradient_is_monotone_along_its_axis() {
    let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
    let gradient = Gradient::new_linear(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(99.0, 0.0),
        red_blue_stops(),
    )
    .unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_operator(Operator::Source);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 1.0);
    ctx.fill().unwrap();

    let mut prev_r = 255i32;
    let mut prev_b = 0i32;
    for x in 0..100 {
        let (r, _, b) = rgb_at(&surface, x, 0);
        assert!(i32::from(r) <= prev_r + 1, "red rises at x = {}", x);
        assert!(i32::from(b) + 1 >= prev_b, "blue falls at x = {}", x);
        prev_r = i32::from(r);
        prev_b = i32::from(b);
    }
}

#[test]
fn radial_gradient_rings() {
    let mut surface = Surface::new(100, 100, PixelFormat::Rgba8888).unwrap();
    let gradient = Gradient::new_radial(
        Point::from_xy(50.0, 50.0),
        0.0,
        Point::from_xy(50.0, 50.0),
        40.0,
        red_blue_stops(),
    )
    .unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_operator(Operator::Source);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 100.0);
    ctx.fill().unwrap();

    let (r, _, b) = rgb_at(&surface, 50, 50);
    assert!(r > 250 && b < 5, "center is red");

    // Same radius, same color: the parameter is radially symmetric.
    assert_eq!(rgb_at(&surface, 70, 50), rgb_at(&surface, 50, 70));
    assert_eq!(rgb_at(&surface, 30, 50), rgb_at(&surface, 50, 30));

    // Beyond the outer circle the parameter clamps to the end color.
    assert_eq!(rgb_at(&surface, 99, 50), (0, 0, 255));
}

#[test]
fn conic_gradient_sweeps() {
    let mut surface = Surface::new(100, 100, PixelFormat::Rgba8888).unwrap();
    let gradient =
        Gradient::new_conic(Point::from_xy(50.0, 50.0), 0.0, red_blue_stops()).unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_operator(Operator::Source);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 100.0);
    ctx.fill().unwrap();

    // t grows with the angle from the start ray (+x, sweeping through +y).
    let (r0, _, b0) = rgb_at(&surface, 90, 50); // angle ~ 0
    assert!(r0 > 250 && b0 < 5);
    let (r1, _, b1) = rgb_at(&surface, 50, 90); // quarter turn
    assert!(r1 > b1 && b1 > 20, "quarter turn mixes: {} {}", r1, b1);
    let (r3, _, b3) = rgb_at(&surface, 50, 10); // three quarters
    assert!(b3 > 150 && b3 > r3, "late sweep is blue: {} {}", r3, b3);
}

#[test]
fn gradient_transform_shifts_the_axis() {
    let stops = red_blue_stops();
    let gradient = Gradient::new(
        GradientKind::Linear {
            p0: Point::from_xy(0.0, 0.0),
            p1: Point::from_xy(50.0, 0.0),
        },
        stops,
        InterpolationMethod::LinearRgb,
        Transform::from_translate(25.0, 0.0).unwrap(),
    )
    .unwrap();

    let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_operator(Operator::Source);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 1.0);
    ctx.fill().unwrap();

    // The axis start moved to x = 25.
    assert_eq!(rgb_at(&surface, 25, 0), (255, 0, 0));
    assert_eq!(rgb_at(&surface, 10, 0), (255, 0, 0));
    assert_eq!(rgb_at(&surface, 75, 0), (0, 0, 255));
}

#[test]
fn srgb_interpolation_midpoint_is_darker() {
    let fill_with = |method: InterpolationMethod| {
        let gradient = Gradient::new(
            GradientKind::Linear {
                p0: Point::from_xy(0.0, 0.0),
                p1: Point::from_xy(99.0, 0.0),
            },
            red_blue_stops(),
            method,
            Transform::identity(),
        )
        .unwrap();

        let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
        let mut ctx = Context::new(&mut surface);
        ctx.set_anti_alias(AntiAlias::None);
        ctx.set_operator(Operator::Source);
        ctx.set_source_gradient(gradient);
        ctx.rectangle(0.0, 0.0, 100.0, 1.0);
        ctx.fill().unwrap();
        rgb_at(&surface, 50, 0)
    };

    let (lin_r, ..) = fill_with(InterpolationMethod::LinearRgb);
    let (srgb_r, ..) = fill_with(InterpolationMethod::Srgb);
    assert!(srgb_r < lin_r);
}

#[test]
fn hsl_hue_directions_differ() {
    let fill_with = |method: HueMethod| {
        let stops = vec![
            GradientStop::new(0.0, Color::from_hsl(10.0, 1.0, 0.5)),
            GradientStop::new(1.0, Color::from_hsl(350.0, 1.0, 0.5)),
        ];
        let gradient = Gradient::new(
            GradientKind::Linear {
                p0: Point::from_xy(0.0, 0.0),
                p1: Point::from_xy(99.0, 0.0),
            },
            stops,
            InterpolationMethod::Hsl(method),
            Transform::identity(),
        )
        .unwrap();

        let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
        let mut ctx = Context::new(&mut surface);
        ctx.set_anti_alias(AntiAlias::None);
        ctx.set_operator(Operator::Source);
        ctx.set_source_gradient(gradient);
        ctx.rectangle(0.0, 0.0, 100.0, 1.0);
        ctx.fill().unwrap();
        rgb_at(&surface, 50, 0)
    };

    // Shorter: both hues hug red, the midpoint stays red.
    let (r, g, b) = fill_with(HueMethod::Shorter);
    assert!(r > 200 && g < 60 && b < 60, "shorter: {:?}", (r, g, b));

    // Longer: the midpoint swings through cyan.
    let (r, g, b) = fill_with(HueMethod::Longer);
    assert!(g > 150 && b > 150 && r < 100, "longer: {:?}", (r, g, b));

    // Increasing travels the same long way here; decreasing hugs red.
    let (r, ..) = fill_with(HueMethod::Increasing);
    assert!(r < 100);
    let (r, ..) = fill_with(HueMethod::Decreasing);
    assert!(r > 200);
}

#[test]
fn gradient_pattern_composites_with_alpha() {
    let stops = vec![
        GradientStop::new(0.0, Color::from_rgba(1.0, 1.0, 1.0, 1.0)),
        GradientStop::new(1.0, Color::from_rgba(1.0, 1.0, 1.0, 0.0)),
    ];
    let gradient = Gradient::new_linear(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(99.0, 0.0),
        stops,
    )
    .unwrap();

    let mut surface = Surface::new(100, 1, PixelFormat::Rgba8888).unwrap();
    surface.fill(Pixel::from_color(&Color::from_rgb(0.0, 0.0, 1.0)));

    let mut ctx = Context::new(&mut surface);
    ctx.set_anti_alias(AntiAlias::None);
    ctx.set_source_gradient(gradient);
    ctx.rectangle(0.0, 0.0, 100.0, 1.0);
    ctx.fill().unwrap();

    // Fully covered by white at the start, untouched blue at the end.
    assert_eq!(rgb_at(&surface, 0, 0), (255, 255, 255));
    assert_eq!(rgb_at(&surface, 99, 0), (0, 0, 255));
}
