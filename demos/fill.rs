use vellum::*;

fn main() {
    let mut surface = Surface::new(500, 500, PixelFormat::Rgba8888).unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_source_rgba(0.35, 0.75, 0.45, 0.9);
    ctx.move_to(60.0, 60.0);
    ctx.line_to(160.0, 460.0);
    ctx.line_to(460.0, 230.0);
    ctx.curve_to(380.0, 120.0, 300.0, 30.0, 60.0, 60.0);
    ctx.close();
    ctx.fill().unwrap();

    ctx.set_source_rgba(0.85, 0.3, 0.5, 0.7);
    ctx.set_fill_rule(FillRule::EvenOdd);
    ctx.arc(250.0, 250.0, 140.0, 0.0, 2.0 * std::f64::consts::PI, false);
    ctx.close();
    ctx.arc(250.0, 250.0, 70.0, 0.0, 2.0 * std::f64::consts::PI, false);
    ctx.close();
    ctx.fill().unwrap();

    surface.save_png("fill.png").unwrap();
}
