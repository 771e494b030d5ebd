use vellum::*;

fn main() {
    let mut surface = Surface::new(500, 500, PixelFormat::Rgba8888).unwrap();

    let gradient = Gradient::new(
        GradientKind::Linear {
            p0: Point::from_xy(0.0, 0.0),
            p1: Point::from_xy(500.0, 500.0),
        },
        vec![
            GradientStop::new(0.0, Color::from_srgb(0.1, 0.8, 0.9)),
            GradientStop::new(0.5, Color::from_srgb(0.9, 0.2, 0.6)),
            GradientStop::new(1.0, Color::from_srgb(1.0, 0.9, 0.2)),
        ],
        InterpolationMethod::LinearRgb,
        Transform::identity(),
    )
    .unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_source_gradient(gradient);
    ctx.arc(250.0, 250.0, 220.0, 0.0, 2.0 * std::f64::consts::PI, false);
    ctx.close();
    ctx.fill().unwrap();

    surface.save_png("linear_gradient.png").unwrap();
}
