// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Polygon and hairline rasterization.
//!
//! Three fill backends (direct scanline, 4x4 supersampling, 4-sample
//! multisampling) plus the hairline path. Everything funnels into the
//! compositor or the surface's strided writes; geometric degeneracies are
//! silent no-ops, scratch allocation failures propagate.

mod coverage;
pub(crate) mod hairline;
mod multisample;
mod scanline;
mod supersample;

use crate::compositor::{self, Operator, Precision};
use crate::error::Error;
use crate::pattern::Pattern;
use crate::polygon::Polygon;
use crate::surface::Surface;

/// An anti-aliasing mode.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AntiAlias {
    /// Direct scanline fill; boundary pixels are all-or-nothing.
    None,
    /// 4x4 supersampling through an alpha mask.
    Supersample4x,
    /// 4 sub-scanlines per row into a sparse coverage buffer.
    Multisample4x,
}

impl Default for AntiAlias {
    fn default() -> Self {
        AntiAlias::Supersample4x
    }
}

/// A path filling rule.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FillRule {
    /// Inside is a non-zero sum of signed edge crossings.
    NonZero,
    /// Inside is an odd number of edge crossings.
    EvenOdd,
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}

impl FillRule {
    #[inline]
    pub(crate) fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding & 1 != 0,
        }
    }
}

/// Fills a polygon into the surface with the selected backend.
pub(crate) fn fill_polygon(
    surface: &mut Surface,
    polygon: &Polygon,
    rule: FillRule,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
    anti_alias: AntiAlias,
) -> Result<(), Error> {
    if polygon.is_empty() {
        return Ok(());
    }

    // Fully outside the surface: nothing to draw.
    if polygon.extent_right() < 0.0
        || polygon.extent_bottom() < 0.0
        || polygon.extent_left() >= surface.width() as f64
        || polygon.extent_top() >= surface.height() as f64
    {
        return Ok(());
    }

    match anti_alias {
        AntiAlias::None => {
            scanline::fill_direct(surface, polygon, rule, pattern, operator, precision)
        }
        AntiAlias::Supersample4x => {
            supersample::fill(surface, polygon, rule, pattern, operator, precision)
        }
        AntiAlias::Multisample4x => {
            multisample::fill(surface, polygon, rule, pattern, operator, precision)
        }
    }
}

/// Composites one span of a pattern, honoring the plain-write fast path.
///
/// `opacity` additionally scales the source (255 is opaque).
pub(crate) fn composite_span(
    surface: &mut Surface,
    x: i32,
    y: i32,
    len: u32,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
    opacity: u8,
) {
    if let Pattern::Solid(px) = pattern {
        // The single-pixel-source path has its own reduction check, but
        // it always runs the integer pipeline, so only take it when the
        // requested precision allows (or the span is a plain write).
        if precision == Precision::Integer
            || (opacity == 255 && operator.reduces_to_source_write(px))
        {
            surface.composite_stride(x, y, len, *px, operator, opacity);
            return;
        }
    }

    let (x, len) = match surface.clip_run(x, y, len) {
        Some(v) => v,
        None => return,
    };

    for i in 0..len as i32 {
        let src = pattern.pixel_at(x + i, y);
        if opacity == 255 && operator.reduces_to_source_write(&src) {
            surface.put_pixel(x + i, y, src);
            continue;
        }

        let src = compositor::apply_opacity(src.to_rgba(), opacity);
        let dst = match surface.pixel(x + i, y) {
            Some(px) => px,
            None => continue,
        };
        let out = compositor::composite_pixel(operator, precision, src, dst);
        surface.put_pixel(x + i, y, out);
    }
}
