// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Path flattening: node streams in, polygons out.

use vellum_path::{PathNode, Point};

use crate::polygon::{Contour, Polygon};

/// The default flattening tolerance, in device-space units.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

// Subdivision is geometric, so the depth cap is a backstop for
// pathological control points, not a quality knob.
const MAX_SUBDIVIDE_DEPTH: u8 = 16;

/// Converts a path node stream into a polygon.
///
/// Curves are flattened by recursive de Casteljau midpoint subdivision
/// until the longest side of the control polygon is within `tolerance`.
/// Subpaths become cyclic contours; a zero-length subpath is kept as a
/// single-corner contour (round caps render it as a dot) but contributes
/// no edges.
pub fn tessellate(nodes: &[PathNode], tolerance: f64) -> Polygon {
    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_TOLERANCE
    };

    let mut polygon = Polygon::new();
    let mut contour = Contour::new();
    let mut start = Point::zero();
    let mut current = Point::zero();

    let mut flush = |contour: &mut Contour, closed: bool| {
        contour.dedup_closing_corner();
        contour.set_closed(closed);
        polygon.push_contour(std::mem::take(contour));
    };

    for node in nodes {
        match *node {
            PathNode::MoveTo(p) => {
                flush(&mut contour, false);
                contour.push(p);
                start = p;
                current = p;
            }
            PathNode::LineTo(p) => {
                if contour.is_empty() {
                    contour.push(current);
                }
                contour.push(p);
                current = p;
            }
            PathNode::CurveTo(c1, c2, p) => {
                if contour.is_empty() {
                    contour.push(current);
                }
                flatten_cubic(current, c1, c2, p, tolerance, &mut contour);
                current = p;
            }
            PathNode::Close => {
                // Consecutive closes are idempotent; an explicit closing
                // edge appears only through the cyclic wrap, and a
                // same-as-start trailing corner is removed so no
                // zero-length edge sneaks in.
                if !contour.is_empty() {
                    flush(&mut contour, true);
                }
                current = start;
            }
        }
    }

    flush(&mut contour, false);
    polygon
}

/// Recursive de Casteljau subdivision of one cubic.
///
/// Emits every on-curve point except the first (the caller owns it).
pub(crate) fn flatten_cubic(
    p0: Point,
    c1: Point,
    c2: Point,
    p1: Point,
    tolerance: f64,
    out: &mut Contour,
) {
    flatten_cubic_impl(p0, c1, c2, p1, tolerance, 0, out);
    out.push(p1);
}

fn flatten_cubic_impl(
    p0: Point,
    c1: Point,
    c2: Point,
    p1: Point,
    tolerance: f64,
    depth: u8,
    out: &mut Contour,
) {
    if depth >= MAX_SUBDIVIDE_DEPTH || is_flat_enough(p0, c1, c2, p1, tolerance) {
        return;
    }

    // One de Casteljau step at the midpoint.
    let q0 = p0.mid(c1);
    let q1 = c1.mid(c2);
    let q2 = c2.mid(p1);
    let r0 = q0.mid(q1);
    let r1 = q1.mid(q2);
    let s = r0.mid(r1);

    flatten_cubic_impl(p0, q0, r0, s, tolerance, depth + 1, out);
    out.push(s);
    flatten_cubic_impl(s, r1, q2, p1, tolerance, depth + 1, out);
}

// The control polygon's longest side bounds how far the curve can stray
// from a straight segment at this level.
#[inline]
fn is_flat_enough(p0: Point, c1: Point, c2: Point, p1: Point, tolerance: f64) -> bool {
    let longest = (c1 - p0)
        .length_sq()
        .max((c2 - c1).length_sq())
        .max((p1 - c2).length_sq());
    longest <= tolerance * tolerance
}
