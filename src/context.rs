// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use vellum_path::{PathBuilder, Point, Transform};

use crate::color::Color;
use crate::compositor::{Operator, Precision};
use crate::dash::DashPattern;
use crate::dither::DitherKind;
use crate::error::Error;
use crate::gradient::Gradient;
use crate::pattern::Pattern;
use crate::pixel::{Pixel, PixelFormat};
use crate::raster::{self, AntiAlias, FillRule};
use crate::stroke::{self, LineCap, LineJoin, Stroke, DEFAULT_MITER_LIMIT};
use crate::surface::Surface;
use crate::tessellator::{self, DEFAULT_TOLERANCE};

#[derive(Clone, Debug)]
enum Source<'a> {
    Solid(Pixel),
    Gradient(Gradient),
    Surface {
        surface: &'a Surface,
        dx: i32,
        dy: i32,
    },
}

#[derive(Clone, Debug)]
struct State<'a> {
    transform: Transform,
    source: Source<'a>,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
    dash: Option<DashPattern>,
    hairline: bool,
    tolerance: f64,
    anti_alias: AntiAlias,
    fill_rule: FillRule,
    operator: Operator,
    precision: Precision,
    dither: DitherKind,
}

impl Default for State<'_> {
    fn default() -> Self {
        State {
            transform: Transform::identity(),
            source: Source::Solid(Pixel::from_color(&Color::BLACK)),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: DEFAULT_MITER_LIMIT,
            dash: None,
            hairline: false,
            tolerance: DEFAULT_TOLERANCE,
            anti_alias: AntiAlias::default(),
            fill_rule: FillRule::default(),
            operator: Operator::default(),
            precision: Precision::default(),
            dither: DitherKind::default(),
        }
    }
}

/// A stateful drawing context over a borrowed surface.
///
/// Owns the current path, the transform stack and the drawing parameters;
/// `fill` and `stroke` hand everything to the tessellator, stroker and
/// rasterizer. The context itself contains no rasterization logic.
///
/// The current path survives `fill`/`stroke`; call [`Context::new_path`]
/// to start over.
#[derive(Debug)]
pub struct Context<'a> {
    surface: &'a mut Surface,
    path: PathBuilder,
    state: State<'a>,
    saved: Vec<State<'a>>,
}

impl<'a> Context<'a> {
    /// Creates a context drawing into `surface`.
    ///
    /// Defaults: black source, SourceOver, 4x4 supersampling, non-zero
    /// fill rule, line width 1.0, butt caps, miter joins with limit 10.
    pub fn new(surface: &'a mut Surface) -> Self {
        Context {
            surface,
            path: PathBuilder::new(),
            state: State::default(),
            saved: Vec::new(),
        }
    }

    /// Returns the target surface.
    pub fn surface(&self) -> &Surface {
        self.surface
    }

    // --- transform stack ---------------------------------------------------

    /// Returns the current transform.
    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.state.transform = transform;
    }

    /// Appends a translation to the current transform.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        if let Some(ts) = self.state.transform.pre_translate(tx, ty) {
            self.state.transform = ts;
        }
    }

    /// Appends a scale to the current transform.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        if let Some(ts) = self.state.transform.pre_scale(sx, sy) {
            self.state.transform = ts;
        }
    }

    /// Appends a rotation (radians) to the current transform.
    pub fn rotate(&mut self, angle: f64) {
        if let Some(ts) = self.state.transform.pre_rotate(angle) {
            self.state.transform = ts;
        }
    }

    /// Maps a user-space point into device space.
    pub fn user_to_device(&self, p: Point) -> Point {
        self.state.transform.map_point(p)
    }

    /// Maps a device-space distance back into user space.
    ///
    /// Errors with [`Error::InvalidTransform`] when the current transform
    /// is not invertible.
    pub fn device_to_user_distance(&self, dx: f64, dy: f64) -> Result<Point, Error> {
        self.state
            .transform
            .map_vector_inverse(dx, dy)
            .ok_or(Error::InvalidTransform)
    }

    /// Pushes a copy of the full drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Pops the most recently saved state, if any.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    // --- sources -----------------------------------------------------------

    /// Sets the source to a solid color.
    pub fn set_source_color(&mut self, color: Color) {
        self.state.source = Source::Solid(Pixel::from_color(&color));
    }

    /// Sets the source to an opaque linear-RGB color.
    pub fn set_source_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.set_source_color(Color::from_rgb(r, g, b));
    }

    /// Sets the source to a linear-RGBA color.
    pub fn set_source_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.set_source_color(Color::from_rgba(r, g, b, a));
    }

    /// Sets the source to a gradient.
    pub fn set_source_gradient(&mut self, gradient: Gradient) {
        self.state.source = Source::Gradient(gradient);
    }

    /// Sets the source to another surface placed at `(dx, dy)`.
    ///
    /// The surface must outlive the context's draw calls; it may not
    /// alias the destination.
    pub fn set_source_surface(&mut self, surface: &'a Surface, dx: i32, dy: i32) {
        self.state.source = Source::Surface { surface, dx, dy };
    }

    // --- parameters --------------------------------------------------------

    /// Sets the stroke width in user units.
    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    /// Sets the line cap for open stroked contours.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    /// Sets the line join.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    /// Sets the miter limit (defaults to 10.0).
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.state.miter_limit = limit;
    }

    /// Sets the dash pattern; lengths are user units.
    ///
    /// An empty or invalid array clears dashing.
    pub fn set_dash(&mut self, array: &[f64], offset: f64) {
        self.state.dash = DashPattern::new(array.to_vec(), offset);
    }

    /// Enables or disables hairline stroking (bypasses stroke expansion).
    pub fn set_hairline(&mut self, hairline: bool) {
        self.state.hairline = hairline;
    }

    /// Sets the curve flattening tolerance in device units.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.state.tolerance = tolerance;
    }

    /// Sets the anti-aliasing mode.
    pub fn set_anti_alias(&mut self, anti_alias: AntiAlias) {
        self.state.anti_alias = anti_alias;
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    /// Sets the compositing operator.
    pub fn set_operator(&mut self, operator: Operator) {
        self.state.operator = operator;
    }

    /// Sets the requested compositor precision.
    ///
    /// Operators that need the float pipeline upgrade it regardless.
    pub fn set_precision(&mut self, precision: Precision) {
        self.state.precision = precision;
    }

    /// Sets the dithering applied to the source.
    pub fn set_dither(&mut self, dither: DitherKind) {
        self.state.dither = dither;
    }

    // --- path --------------------------------------------------------------

    /// Starts a new path, discarding the current one.
    pub fn new_path(&mut self) {
        self.path.clear();
    }

    /// Begins a new subpath at `(x, y)` (user space).
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.sync_path_transform();
        self.path.move_to(x, y);
    }

    /// Adds a line towards `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.sync_path_transform();
        self.path.line_to(x, y);
    }

    /// Adds a cubic curve towards `(x, y)`.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.sync_path_transform();
        self.path.curve_to(x1, y1, x2, y2, x, y);
    }

    /// Adds a line relative to the current point.
    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<(), Error> {
        self.sync_path_transform();
        self.path.rel_line_to(dx, dy)?;
        Ok(())
    }

    /// Adds a cubic curve relative to the current point.
    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), Error> {
        self.sync_path_transform();
        self.path.rel_curve_to(dx1, dy1, dx2, dy2, dx, dy)?;
        Ok(())
    }

    /// Adds a circular arc; see [`PathBuilder::arc`].
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        self.sync_path_transform();
        self.path.arc(cx, cy, r, a0, a1, ccw);
    }

    /// Adds a closed rectangle contour.
    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.sync_path_transform();
        self.path.push_rect(x, y, w, h);
    }

    /// Closes the current subpath.
    pub fn close(&mut self) {
        self.path.close();
    }

    fn sync_path_transform(&mut self) {
        self.path.set_transform(self.state.transform);
    }

    // --- drawing -----------------------------------------------------------

    /// Fills the current path with the current source.
    pub fn fill(&mut self) -> Result<(), Error> {
        let polygon = tessellator::tessellate(self.path.nodes(), self.state.tolerance);

        let state = &self.state;
        let surface = &mut *self.surface;
        let scale_bits = dither_scale(surface.format());
        with_pattern(state, scale_bits, |pattern| {
            raster::fill_polygon(
                surface,
                &polygon,
                state.fill_rule,
                pattern,
                state.operator,
                state.precision,
                state.anti_alias,
            )
        })
    }

    /// Strokes the current path with the current source.
    ///
    /// The stroke width (and dash lengths) follow the larger principal
    /// axis of the current transform, so nonuniform scaling never thins a
    /// stroke below one device pixel along its narrow axis.
    pub fn stroke(&mut self) -> Result<(), Error> {
        let flat = tessellator::tessellate(self.path.nodes(), self.state.tolerance);
        if flat.is_empty() {
            return Ok(());
        }

        let state = &self.state;
        let surface = &mut *self.surface;
        let scale = state.transform.max_scale_factor();

        let stroke = Stroke {
            width: state.line_width * scale,
            line_cap: state.line_cap,
            line_join: state.line_join,
            miter_limit: state.miter_limit,
            dash: state.dash.as_ref().and_then(|d| d.scaled(scale)),
            hairline: state.hairline,
        };

        let scale_bits = dither_scale(surface.format());
        if stroke.hairline {
            return with_pattern(state, scale_bits, |pattern| {
                raster::hairline::stroke_polygon(
                    surface,
                    &flat,
                    state.anti_alias,
                    pattern,
                    state.operator,
                    state.precision,
                );
                Ok(())
            });
        }

        let outline = stroke::expand_polygon(&flat, &stroke, state.tolerance);
        with_pattern(state, scale_bits, |pattern| {
            raster::fill_polygon(
                surface,
                &outline,
                FillRule::NonZero,
                pattern,
                state.operator,
                state.precision,
                state.anti_alias,
            )
        })
    }

    /// Applies the current source across the entire surface.
    pub fn paint(&mut self) -> Result<(), Error> {
        let state = &self.state;
        let surface = &mut *self.surface;
        let width = surface.width() as u32;
        let scale_bits = dither_scale(surface.format());
        with_pattern(state, scale_bits, |pattern| {
            for y in 0..surface.height() {
                raster::composite_span(
                    surface,
                    0,
                    y,
                    width,
                    pattern,
                    state.operator,
                    state.precision,
                    255,
                );
            }
            Ok(())
        })
    }
}

/// Builds the draw-call pattern from the current state, wrapping it in a
/// dither layer scaled to the destination's bit depth when requested.
fn with_pattern<R>(
    state: &State<'_>,
    dither_scale: u8,
    f: impl FnOnce(&Pattern) -> Result<R, Error>,
) -> Result<R, Error> {
    let base = match &state.source {
        Source::Solid(px) => Pattern::Solid(*px),
        Source::Gradient(gradient) => Pattern::Gradient(gradient),
        Source::Surface { surface, dx, dy } => Pattern::SurfaceMask {
            surface,
            dx: *dx,
            dy: *dy,
        },
    };

    if state.dither == DitherKind::None {
        f(&base)
    } else {
        let dithered = Pattern::Dither {
            pattern: &base,
            kind: state.dither,
            scale: dither_scale,
        };
        f(&dithered)
    }
}

// The dither amplitude is one quantization step of the destination's
// channel depth.
fn dither_scale(format: PixelFormat) -> u8 {
    match format {
        PixelFormat::Rgb888 | PixelFormat::Rgba8888 | PixelFormat::Alpha8 => 8,
        PixelFormat::Alpha4 => 4,
        PixelFormat::Alpha2 => 2,
        PixelFormat::Alpha1 => 1,
    }
}
