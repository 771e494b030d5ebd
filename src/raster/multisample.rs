// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The 4-sample multisampling fill backend.

use crate::compositor::{Operator, Precision};
use crate::error::Error;
use crate::pattern::Pattern;
use crate::polygon::{Edge, Polygon};
use crate::raster::coverage::CoverageRuns;
use crate::raster::FillRule;
use crate::surface::Surface;

const SCALE: i32 = 4;

/// Fills by sampling four sub-scanlines per device row into a sparse
/// run-length coverage buffer, then compositing each run at its coverage.
///
/// The edge table lives at 4x in both axes; x spans are converted back to
/// device pixels by the coverage accumulator. The active set refreshes
/// only at Y-breakpoints; in between, edges just advance by their slope.
pub(crate) fn fill(
    surface: &mut Surface,
    polygon: &Polygon,
    rule: FillRule,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) -> Result<(), Error> {
    let table = polygon.edges(SCALE as u32)?;
    if table.is_empty() {
        return Ok(());
    }

    let left = (polygon.extent_left().floor() as i64).max(0) as i32;
    let right = (polygon.extent_right().ceil() as i64).min(surface.width() as i64) as i32;
    if right <= left {
        return Ok(());
    }

    // Device rows touched by any sub-scanline. Round the last sub-scanline
    // up to its containing row so a polygon confined to a single row still
    // renders on that row.
    let row_start = table.top().div_euclid(SCALE).max(0);
    let row_end = ((table.bottom() + SCALE - 1).div_euclid(SCALE)).min(surface.height());
    if row_start >= row_end {
        return Ok(());
    }

    let mut runs = CoverageRuns::new((right - left) as u32)?;

    let mut active: Vec<Edge> = Vec::new();
    let mut next = 0;
    let mut first = true;

    for row in row_start..row_end {
        runs.reset();

        for sub in 0..SCALE {
            let y = row * SCALE + sub;
            if y < table.top() || y >= table.bottom() {
                continue;
            }

            let is_breakpoint = table.breakpoints.binary_search(&y).is_ok();
            if first || is_breakpoint {
                active.retain(|e| e.bottom > y);

                while next < table.edges.len() && table.edges[next].top <= y {
                    let mut e = table.edges[next];
                    next += 1;
                    if e.bottom <= y {
                        continue;
                    }
                    e.x += f64::from(y - e.top) * e.dx;
                    active.push(e);
                }

                first = false;
            }

            active.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

            let mut winding = 0;
            let mut span_start = 0.0;
            for e in &active {
                let was_inside = rule.is_inside(winding);
                winding += e.winding;
                let now_inside = rule.is_inside(winding);

                if !was_inside && now_inside {
                    span_start = e.x;
                } else if was_inside && !now_inside {
                    // Pre-clamp into the buffer's supersampled window so
                    // the narrowing casts below cannot overflow.
                    let window = i64::from(right - left) * i64::from(SCALE);
                    let origin = i64::from(left) * i64::from(SCALE);
                    let x0 = (((span_start - 0.5).ceil() as i64) - origin).max(0);
                    let x1 = (((e.x - 0.5).ceil() as i64) - origin).min(window);
                    if x1 > x0 {
                        runs.add_span(x0 as i32, (x1 - x0) as u32);
                    }
                }
            }

            for e in &mut active {
                e.x += e.dx;
            }
        }

        runs.for_each_run(|x_rel, len, cov| match cov {
            0 => {}
            16 => {
                super::composite_span(
                    surface,
                    left + x_rel as i32,
                    row,
                    len,
                    pattern,
                    operator,
                    precision,
                    255,
                );
            }
            cov => {
                // coverage * (256 / 16) - 1, clamped to 0..=255.
                let opacity = (u32::from(cov) * 16).saturating_sub(1).min(255) as u8;
                super::composite_span(
                    surface,
                    left + x_rel as i32,
                    row,
                    len,
                    pattern,
                    operator,
                    precision,
                    opacity,
                );
            }
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::pixel::{Pixel, PixelFormat};
    use crate::polygon::Contour;
    use vellum_path::Point;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        let mut c = Contour::new();
        c.push(Point::from_xy(x0, y0));
        c.push(Point::from_xy(x1, y0));
        c.push(Point::from_xy(x1, y1));
        c.push(Point::from_xy(x0, y1));
        c.set_closed(true);
        let mut poly = Polygon::new();
        poly.push_contour(c);
        poly
    }

    fn fill_white(surface: &mut Surface, poly: &Polygon) {
        let pattern = Pattern::Solid(Pixel::from_color(&Color::WHITE));
        fill(
            surface,
            poly,
            FillRule::NonZero,
            &pattern,
            Operator::SourceOver,
            Precision::Integer,
        )
        .unwrap();
    }

    #[test]
    fn interior_is_opaque_boundary_blends() {
        let mut surface = Surface::new(8, 8, PixelFormat::Rgba8888).unwrap();
        fill_white(&mut surface, &rect(1.5, 1.5, 6.5, 6.5));

        assert!(surface.pixel(3, 3).unwrap().is_opaque());
        // The half-covered boundary pixel: 8 of 16 samples.
        let edge = surface.pixel(1, 3).unwrap().to_rgba();
        assert_eq!(edge.alpha(), 127);
        assert_eq!(surface.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn single_row_polygon_renders_on_its_row() {
        // Confined to row 3; the row loop must not clamp it away.
        let mut surface = Surface::new(8, 8, PixelFormat::Rgba8888).unwrap();
        fill_white(&mut surface, &rect(1.0, 3.25, 7.0, 3.75));

        let px = surface.pixel(4, 3).unwrap().to_rgba();
        assert!(px.alpha() > 0, "row 3 must receive coverage");
        assert_eq!(surface.pixel(4, 2).unwrap().alpha(), 0);
        assert_eq!(surface.pixel(4, 4).unwrap().alpha(), 0);
    }

    #[test]
    fn matches_supersampling_on_interiors() {
        let poly = rect(2.0, 2.0, 6.0, 6.0);

        let mut ms = Surface::new(8, 8, PixelFormat::Rgba8888).unwrap();
        fill_white(&mut ms, &poly);

        let mut ss = Surface::new(8, 8, PixelFormat::Rgba8888).unwrap();
        let pattern = Pattern::Solid(Pixel::from_color(&Color::WHITE));
        crate::raster::supersample::fill(
            &mut ss,
            &poly,
            FillRule::NonZero,
            &pattern,
            Operator::SourceOver,
            Precision::Integer,
        )
        .unwrap();

        for y in 0..8 {
            for x in 0..8 {
                let a = ms.pixel(x, y).unwrap().to_rgba();
                let b = ss.pixel(x, y).unwrap().to_rgba();
                assert_eq!(a.is_opaque(), b.is_opaque(), "at {},{}", x, y);
                assert_eq!(a.alpha() == 0, b.alpha() == 0, "at {},{}", x, y);
            }
        }
    }
}
