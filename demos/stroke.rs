use vellum::*;

fn main() {
    let mut surface = Surface::new(500, 500, PixelFormat::Rgba8888).unwrap();

    let mut ctx = Context::new(&mut surface);
    ctx.set_source_rgb(0.9, 0.9, 0.9);
    ctx.paint().unwrap();

    // A thick round-capped zig-zag.
    ctx.set_source_rgb(0.2, 0.35, 0.75);
    ctx.set_line_width(26.0);
    ctx.set_line_cap(LineCap::Round);
    ctx.set_line_join(LineJoin::Round);
    ctx.move_to(60.0, 100.0);
    ctx.line_to(180.0, 220.0);
    ctx.line_to(300.0, 100.0);
    ctx.line_to(440.0, 200.0);
    ctx.stroke().unwrap();

    // A dashed rectangle with miter joins.
    ctx.new_path();
    ctx.set_source_rgb(0.75, 0.3, 0.2);
    ctx.set_line_width(8.0);
    ctx.set_line_cap(LineCap::Butt);
    ctx.set_line_join(LineJoin::Miter);
    ctx.set_dash(&[24.0, 12.0], 0.0);
    ctx.rectangle(80.0, 280.0, 340.0, 160.0);
    ctx.stroke().unwrap();

    surface.save_png("stroke.png").unwrap();
}
