// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/*!
`vellum` is a pure-software 2D vector graphics library.

Paths built from lines, cubic curves and arcs are tessellated into
polygons, optionally expanded into stroke outlines, rasterized under one
of three anti-aliasing modes and composited onto pixel surfaces through
Porter-Duff operators. Sources can be solid colors, linear/radial/conic
gradients or other surfaces, with optional ordered dithering.

The usual entry point is [`Context`], a stateful facade over a
[`Surface`]:

```
use vellum::{Color, Context, PixelFormat, Surface};

let mut surface = Surface::new(200, 200, PixelFormat::Rgba8888).unwrap();
let mut ctx = Context::new(&mut surface);
ctx.set_source_color(Color::from_rgb(1.0, 0.0, 0.0));
ctx.move_to(20.0, 20.0);
ctx.line_to(180.0, 20.0);
ctx.line_to(100.0, 180.0);
ctx.close();
ctx.fill().unwrap();
```
*/

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::approx_constant)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::float_cmp)]
#![allow(clippy::identity_op)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

mod color;
mod compositor;
mod context;
mod dash;
mod dither;
mod error;
mod gradient;
mod pattern;
mod pixel;
#[cfg(feature = "png-format")]
mod png_io;
mod polygon;
mod raster;
mod stroke;
mod surface;
mod tessellator;

pub use vellum_path::{
    FixedPathBuilder, Path, PathBuilder, PathError, PathNode, Point, Transform,
};

pub use color::{Color, LinearRgba, PremultipliedLinearRgba, ALPHA_OPAQUE, ALPHA_TRANSPARENT};
pub use compositor::{composite_row, CompositeStep, Operator, Precision};
pub use context::Context;
pub use dash::DashPattern;
pub use dither::DitherKind;
pub use error::Error;
pub use gradient::{Gradient, GradientKind, GradientStop, HueMethod, InterpolationMethod};
pub use pattern::Pattern;
pub use pixel::{
    AlphaU8, Pixel, PixelFormat, PremultipliedRgba8, RgbPixel, ALPHA_U8_OPAQUE,
    ALPHA_U8_TRANSPARENT,
};
pub use polygon::{Contour, Polygon};
pub use raster::{AntiAlias, FillRule};
pub use stroke::{LineCap, LineJoin, Stroke, DEFAULT_MITER_LIMIT};
pub use surface::{Stride, Surface};
pub use tessellator::{tessellate, DEFAULT_TOLERANCE};
