// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The direct (non-anti-aliased) scanline fill.

use crate::compositor::{Operator, Precision};
use crate::error::Error;
use crate::pattern::Pattern;
use crate::polygon::{Edge, EdgeTable, Polygon};
use crate::surface::Surface;

/// Walks the active edge table and emits the inside spans of each
/// scanline in `y_start..y_end` (left to right, top to bottom).
///
/// The active set only changes at Y-breakpoints; between them the walk is
/// just the per-scanline `x += dx` advance and the x re-sort.
pub(crate) fn walk_scanlines(
    table: &EdgeTable,
    rule: super::FillRule,
    y_start: i32,
    y_end: i32,
    mut emit: impl FnMut(i32, i32, u32),
) {
    if table.is_empty() || y_start >= y_end {
        return;
    }

    let mut active: Vec<Edge> = Vec::new();
    let mut next = 0;
    let mut first = true;

    for y in y_start..y_end {
        let is_breakpoint = table.breakpoints.binary_search(&y).is_ok();
        if first || is_breakpoint {
            active.retain(|e| e.bottom > y);

            while next < table.edges.len() && table.edges[next].top <= y {
                let mut e = table.edges[next];
                next += 1;
                if e.bottom <= y {
                    continue;
                }
                // Catch the x up when the edge started above our window.
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
                // A pixel is in when its center is inside the span. Wild
                // coordinates clamp to a window the clipped writes can
                // digest without overflowing.
                const X_BOUND: i64 = 1 << 30;
                let x0 = ((span_start - 0.5).ceil() as i64).max(-X_BOUND);
                let x1 = ((e.x - 0.5).ceil() as i64).min(X_BOUND);
                if x1 > x0 {
                    emit(x0 as i32, y, (x1 - x0) as u32);
                }
            }
        }

        for e in &mut active {
            e.x += e.dx;
        }
    }
}

/// AA = none: spans go straight to the compositor (or the plain-write
/// fast path) at device resolution.
pub(crate) fn fill_direct(
    surface: &mut Surface,
    polygon: &Polygon,
    rule: super::FillRule,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) -> Result<(), Error> {
    let table = polygon.edges(1)?;
    if table.is_empty() {
        return Ok(());
    }

    let y_start = table.top().max(0);
    let y_end = table.bottom().min(surface.height());

    walk_scanlines(&table, rule, y_start, y_end, |x, y, len| {
        super::composite_span(surface, x, y, len, pattern, operator, precision, 255);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::FillRule;
    use vellum_path::Point;

    use crate::polygon::Contour;

    fn rect_polygon(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
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

    fn spans_of(poly: &Polygon, rule: FillRule) -> Vec<(i32, i32, u32)> {
        let table = poly.edges(1).unwrap();
        let mut spans = Vec::new();
        walk_scanlines(&table, rule, table.top(), table.bottom(), |x, y, len| {
            spans.push((x, y, len))
        });
        spans
    }

    #[test]
    fn integer_rect_spans() {
        let spans = spans_of(&rect_polygon(2.0, 1.0, 7.0, 4.0), FillRule::NonZero);
        assert_eq!(spans.len(), 3);
        for (i, span) in spans.iter().enumerate() {
            assert_eq!(*span, (2, 1 + i as i32, 5));
        }
    }

    #[test]
    fn fractional_rect_rounds_to_pixel_centers() {
        // Covers centers of columns 2..=6 and rows 1..=2.
        let spans = spans_of(&rect_polygon(1.6, 0.7, 6.8, 3.2), FillRule::NonZero);
        assert_eq!(spans[0], (2, 1, 5));
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn fill_rules_agree_on_simple_polygons() {
        let poly = rect_polygon(0.0, 0.0, 5.0, 5.0);
        assert_eq!(
            spans_of(&poly, FillRule::NonZero),
            spans_of(&poly, FillRule::EvenOdd)
        );
    }

    #[test]
    fn nested_rings_differ_by_rule() {
        // Two same-direction nested squares.
        let mut poly = rect_polygon(0.0, 0.0, 10.0, 10.0);
        let mut inner = Contour::new();
        inner.push(Point::from_xy(2.0, 2.0));
        inner.push(Point::from_xy(8.0, 2.0));
        inner.push(Point::from_xy(8.0, 8.0));
        inner.push(Point::from_xy(2.0, 8.0));
        inner.set_closed(true);
        poly.push_contour(inner);

        // Non-zero: solid 10-wide rows everywhere.
        let nz = spans_of(&poly, FillRule::NonZero);
        assert!(nz.iter().all(|s| s.2 == 10));

        // Even-odd: the middle rows split around the hole.
        let eo = spans_of(&poly, FillRule::EvenOdd);
        assert!(eo.iter().any(|s| s.2 == 2));
        assert!(eo.len() > nz.len());
    }

    #[test]
    fn direct_fill_writes_surface() {
        use crate::color::Color;
        use crate::pixel::{Pixel, PixelFormat};

        let mut surface = Surface::new(10, 10, PixelFormat::Rgb888).unwrap();
        let pattern = Pattern::Solid(Pixel::from_color(&Color::WHITE));
        let poly = rect_polygon(2.0, 2.0, 8.0, 8.0);
        fill_direct(
            &mut surface,
            &poly,
            FillRule::NonZero,
            &pattern,
            Operator::SourceOver,
            Precision::Integer,
        )
        .unwrap();

        assert_eq!(surface.pixel(2, 2), Some(Pixel::from_rgb8(255, 255, 255)));
        assert_eq!(surface.pixel(7, 7), Some(Pixel::from_rgb8(255, 255, 255)));
        assert_eq!(surface.pixel(8, 8), Some(Pixel::from_rgb8(0, 0, 0)));
        assert_eq!(surface.pixel(1, 2), Some(Pixel::from_rgb8(0, 0, 0)));
    }
}
