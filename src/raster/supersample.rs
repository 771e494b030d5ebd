// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The 4x4 supersampling fill backend.

use crate::compositor::{composite_row, CompositeStep, Operator, Precision};
use crate::error::Error;
use crate::pattern::Pattern;
use crate::pixel::{Pixel, PixelFormat};
use crate::polygon::Polygon;
use crate::raster::scanline::walk_scanlines;
use crate::raster::FillRule;
use crate::surface::Surface;

const SCALE: u32 = 4;

/// Fills through an Alpha8 coverage mask.
///
/// The polygon is scan-converted at 4x into a mask over its device
/// extent, box-downsampled back to device resolution, then composited
/// with the mask-then-composite chain:
/// `[DstIn(dst = source, src = mask), final operator]`.
pub(crate) fn fill(
    surface: &mut Surface,
    polygon: &Polygon,
    rule: FillRule,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) -> Result<(), Error> {
    // The mask covers the polygon extent clipped to the surface.
    let left = (polygon.extent_left().floor() as i64).max(0) as i32;
    let top = (polygon.extent_top().floor() as i64).max(0) as i32;
    let right = (polygon.extent_right().ceil() as i64).min(surface.width() as i64) as i32;
    let bottom = (polygon.extent_bottom().ceil() as i64).min(surface.height() as i64) as i32;
    if right <= left || bottom <= top {
        return Ok(());
    }

    let mask_w = right - left;
    let mask_h = bottom - top;

    let mut big_mask = Surface::new(
        mask_w * SCALE as i32,
        mask_h * SCALE as i32,
        PixelFormat::Alpha8,
    )?;

    let table = polygon.edges(SCALE)?;
    if table.is_empty() {
        return Ok(());
    }

    let y_start = table.top().max(top * SCALE as i32);
    let y_end = table.bottom().min(bottom * SCALE as i32);
    let (dx, dy) = (left * SCALE as i32, top * SCALE as i32);
    walk_scanlines(&table, rule, y_start, y_end, |x, y, len| {
        big_mask.paint_stride(x - dx, y - dy, len, Pixel::Alpha8(255));
    });

    // 4x4 box filter: sum of covered subpixels over 16, rounded.
    let mask = big_mask.downsample(SCALE, SCALE)?;

    let mask_pattern = Pattern::SurfaceMask {
        surface: &mask,
        dx: left,
        dy: top,
    };
    let steps = [
        CompositeStep {
            operator: Operator::DestinationIn,
            src: Some(&mask_pattern),
            dst: Some(pattern),
        },
        CompositeStep {
            operator,
            src: None,
            dst: None,
        },
    ];

    // Composite only where the mask has coverage, so pixels the polygon
    // never touched stay bit-identical.
    for my in 0..mask_h {
        let mut run_start: Option<i32> = None;
        for mx in 0..=mask_w {
            let covered = mx < mask_w
                && mask
                    .pixel(mx, my)
                    .map(|px| px.alpha() != 0)
                    .unwrap_or(false);
            match (covered, run_start) {
                (true, None) => run_start = Some(mx),
                (false, Some(start)) => {
                    composite_row(
                        surface,
                        left + start,
                        top + my,
                        (mx - start) as u32,
                        &steps,
                        precision,
                    );
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    Ok(())
}
