// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::dither::DitherKind;
use crate::gradient::Gradient;
use crate::pixel::{Pixel, PremultipliedRgba8};
use crate::surface::Surface;

/// A pixel source.
///
/// A closed sum type: the compositor fetches source pixels through a plain
/// match dispatch, no trait objects involved. Borrowed references must
/// outlive the draw call they are used in.
#[derive(Copy, Clone, Debug)]
pub enum Pattern<'a> {
    /// The same pixel for every coordinate.
    Solid(Pixel),
    /// A gradient evaluated per coordinate.
    Gradient(&'a Gradient),
    /// Reads another surface, translated by `(dx, dy)`; out-of-bounds
    /// reads yield transparent black.
    SurfaceMask {
        /// The surface to read.
        surface: &'a Surface,
        /// Horizontal placement of the surface's origin.
        dx: i32,
        /// Vertical placement of the surface's origin.
        dy: i32,
    },
    /// Wraps another pattern and perturbs its output per coordinate.
    Dither {
        /// The wrapped source.
        pattern: &'a Pattern<'a>,
        /// The noise source.
        kind: DitherKind,
        /// The bit depth being dithered to.
        scale: u8,
    },
}

impl Pattern<'_> {
    /// Returns the source pixel at a device position.
    pub fn pixel_at(&self, x: i32, y: i32) -> Pixel {
        match *self {
            Pattern::Solid(px) => px,
            Pattern::Gradient(gradient) => gradient.pixel_at(x, y),
            Pattern::SurfaceMask { surface, dx, dy } => surface
                .pixel(x - dx, y - dy)
                .unwrap_or(Pixel::Rgba(PremultipliedRgba8::TRANSPARENT)),
            Pattern::Dither {
                pattern,
                kind,
                scale,
            } => dither_pixel(pattern.pixel_at(x, y), kind, scale, x, y),
        }
    }

    /// Checks whether the pattern yields the same pixel everywhere.
    pub fn is_solid(&self) -> bool {
        matches!(self, Pattern::Solid(_))
    }
}

/// Perturbs a pixel by the threshold table entry at `(x, y)`.
///
/// The perturbation amplitude is one quantization step of the `scale`-bit
/// destination, so the noise disappears exactly where banding would.
fn dither_pixel(px: Pixel, kind: DitherKind, scale: u8, x: i32, y: i32) -> Pixel {
    let t = kind.threshold(x, y);
    if t == 0.0 || scale == 0 || scale > 16 {
        return px;
    }

    let step = 1.0 / ((1u32 << scale) - 1) as f32;
    let d = t * step;

    let c = px.to_rgba();
    let perturb = |v: u8| -> f32 { (f32::from(v) / 255.0 + d).max(0.0).min(1.0) };

    let a = perturb(c.alpha());
    let ch = |v: u8| (perturb(v).min(a) * 255.0 + 0.5) as u8;

    let out = PremultipliedRgba8::from_rgba_unchecked(
        ch(c.red()),
        ch(c.green()),
        ch(c.blue()),
        (a * 255.0 + 0.5) as u8,
    );
    Pixel::Rgba(out).to_format(px.format())
}
