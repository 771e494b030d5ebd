// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Stroke expansion: offset polygon pairs with caps, joins and miters.

use vellum_path::{Point, Scalar};

use crate::dash::{dash_contour, DashPattern};
use crate::polygon::{Contour, Polygon};
use crate::tessellator::flatten_cubic;

/// The shape drawn at the ends of an open stroked contour.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LineCap {
    /// No extension; the stroke stops flush at the endpoint.
    Butt,
    /// A semicircle centered on the endpoint.
    Round,
    /// A half-width square extension.
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

/// The shape drawn where two stroked segments meet.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LineJoin {
    /// Extends the outer edges to their intersection, falling back to
    /// bevel past the miter limit.
    Miter,
    /// A straight edge between the outer offset points.
    Bevel,
    /// A circular arc around the vertex.
    Round,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// The default miter limit.
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Stroking properties.
#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// The stroke width in device units.
    ///
    /// Default: 1.0
    pub width: f64,

    /// The end-of-contour cap.
    ///
    /// Default: Butt
    pub line_cap: LineCap,

    /// The segment join.
    ///
    /// Default: Miter
    pub line_join: LineJoin,

    /// The ratio of miter length to half-width above which a miter join
    /// falls back to bevel.
    ///
    /// Default: 10.0 (call sites may override per stroke)
    pub miter_limit: f64,

    /// The dash pattern, if any.
    ///
    /// Default: None
    pub dash: Option<DashPattern>,

    /// Bypasses expansion: the rasterizer draws 1-pixel lines directly.
    ///
    /// Default: false
    pub hairline: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: DEFAULT_MITER_LIMIT,
            dash: None,
            hairline: false,
        }
    }
}

/// The left-hand unit normal of a direction, in y-down device space.
#[inline]
fn left_normal(d: Point) -> Point {
    Point::from_xy(d.y, -d.x)
}

/// Expands every contour of a flattened path into stroke outline
/// contours, dash-splitting first when a pattern is set.
///
/// A zero or negative width produces an empty polygon (a silent no-op
/// downstream).
pub(crate) fn expand_polygon(flat: &Polygon, stroke: &Stroke, tolerance: f64) -> Polygon {
    let mut out = Polygon::new();
    let half = stroke.width / 2.0;
    if !(half > 0.0) || !half.is_finite() {
        return out;
    }

    for contour in flat.contours() {
        let dashed;
        let subs: &[Contour] = match &stroke.dash {
            Some(pattern) => {
                dashed = dash_contour(contour, pattern);
                &dashed
            }
            None => std::slice::from_ref(contour),
        };

        for sub in subs {
            expand_contour(sub, half, stroke, tolerance, &mut out);
        }
    }

    out
}

fn expand_contour(
    contour: &Contour,
    half: f64,
    stroke: &Stroke,
    tolerance: f64,
    out: &mut Polygon,
) {
    let corners = contour.corners();
    match corners.len() {
        0 => {}
        1 => emit_dot(corners[0], half, stroke.line_cap, tolerance, out),
        _ => {
            if contour.is_closed() && corners.len() >= 3 {
                expand_closed(corners, half, stroke, tolerance, out);
            } else {
                expand_open(corners, half, stroke, tolerance, out);
            }
        }
    }
}

/// A single-point contour: round caps render a dot, square caps a square,
/// butt caps nothing.
fn emit_dot(p: Point, half: f64, cap: LineCap, tolerance: f64, out: &mut Polygon) {
    match cap {
        LineCap::Butt => {}
        LineCap::Round => {
            let mut ring = Contour::new();
            ring.push(Point::from_xy(p.x + half, p.y));
            push_arc(&mut ring, p, half, 0.0, 2.0 * std::f64::consts::PI, tolerance);
            emit(ring, out);
        }
        LineCap::Square => {
            let mut ring = Contour::new();
            ring.push(Point::from_xy(p.x - half, p.y - half));
            ring.push(Point::from_xy(p.x + half, p.y - half));
            ring.push(Point::from_xy(p.x + half, p.y + half));
            ring.push(Point::from_xy(p.x - half, p.y + half));
            emit(ring, out);
        }
    }
}

fn segment_dirs(corners: &[Point], closed: bool) -> Vec<Point> {
    let count = if closed {
        corners.len()
    } else {
        corners.len() - 1
    };

    (0..count)
        .map(|i| {
            let mut d = corners[(i + 1) % corners.len()] - corners[i];
            if !d.normalize() {
                d = Point::from_xy(1.0, 0.0);
            }
            d
        })
        .collect()
}

/// An open sub-contour becomes one closed outline: the left offsets
/// forward, the end cap, the right offsets backward, the start cap.
fn expand_open(corners: &[Point], half: f64, stroke: &Stroke, tolerance: f64, out: &mut Polygon) {
    let dirs = segment_dirs(corners, false);

    let mut left = Contour::new();
    let mut right = Contour::new();
    left.push(corners[0] + left_normal(dirs[0]) * half);
    right.push(corners[0] - left_normal(dirs[0]) * half);

    for v in 1..corners.len() - 1 {
        let d0 = dirs[v - 1];
        let d1 = dirs[v];
        add_vertex(
            &mut left,
            &mut right,
            corners[v],
            d0,
            d1,
            half,
            stroke,
            tolerance,
        );
    }

    let last = corners.len() - 1;
    let d_last = dirs[last - 1];
    left.push(corners[last] + left_normal(d_last) * half);
    right.push(corners[last] - left_normal(d_last) * half);

    // Assemble: left forward, end cap, right backward, start cap.
    let mut outline = left;
    push_cap(&mut outline, corners[last], d_last, half, stroke.line_cap, tolerance);
    for p in right.corners().iter().rev() {
        outline.push(*p);
    }
    push_cap(&mut outline, corners[0], -dirs[0], half, stroke.line_cap, tolerance);

    emit(outline, out);
}

/// A closed contour without dashes becomes two nested loops: the left
/// offsets as one ring and the right offsets reversed as the other.
fn expand_closed(corners: &[Point], half: f64, stroke: &Stroke, tolerance: f64, out: &mut Polygon) {
    let n = corners.len();
    let dirs = segment_dirs(corners, true);

    let mut left = Contour::new();
    let mut right = Contour::new();

    for v in 0..n {
        let d0 = dirs[(v + n - 1) % n];
        let d1 = dirs[v];
        add_vertex(
            &mut left,
            &mut right,
            corners[v],
            d0,
            d1,
            half,
            stroke,
            tolerance,
        );
    }

    emit(left, out);

    let mut inner = Contour::new();
    for p in right.corners().iter().rev() {
        inner.push(*p);
    }
    emit(inner, out);
}

/// Adds the offset points around one interior vertex to both sides.
///
/// The sign of the segment cross product picks which side is outside the
/// turn; that side receives the join geometry, the other a plain fold.
fn add_vertex(
    left: &mut Contour,
    right: &mut Contour,
    p: Point,
    d0: Point,
    d1: Point,
    half: f64,
    stroke: &Stroke,
    tolerance: f64,
) {
    let cross = d0.cross(d1);
    let l0 = left_normal(d0);
    let l1 = left_normal(d1);

    add_join(left, p, l0, l1, half, stroke, tolerance, cross > 0.0);
    add_join(right, p, -l0, -l1, half, stroke, tolerance, cross < 0.0);
}

/// Connects two offset points around `p`.
///
/// On the inside of a turn the two points are linked directly (the fold
/// self-intersects and vanishes under the non-zero rule). On the outside
/// the configured join fills the wedge.
fn add_join(
    out: &mut Contour,
    p: Point,
    n0: Point,
    n1: Point,
    half: f64,
    stroke: &Stroke,
    tolerance: f64,
    outside: bool,
) {
    let a = p + n0 * half;
    let b = p + n1 * half;
    out.push(a);

    if outside {
        match stroke.line_join {
            LineJoin::Bevel => {}
            LineJoin::Miter => {
                // cos of the half-angle between the segments; the miter
                // ratio is its reciprocal.
                let cos_half = ((1.0 + n0.dot(n1)) * 0.5).max(0.0).sqrt();
                if cos_half > 0.0 && cos_half.invert() <= stroke.miter_limit {
                    if let Some(dir) = (n0 + n1).with_length(half * cos_half.invert()) {
                        out.push(p + dir);
                    }
                }
            }
            LineJoin::Round => {
                let sweep = n0.cross(n1).atan2(n0.dot(n1));
                push_arc(out, p, half, n0.y.atan2(n0.x), sweep, tolerance);
                return;
            }
        }
    }

    out.push(b);
}

/// Appends cap geometry at `p` facing direction `d`.
///
/// Assumes the contour currently ends at `p + left_normal(d) * half` and
/// leaves it at `p - left_normal(d) * half`.
fn push_cap(out: &mut Contour, p: Point, d: Point, half: f64, cap: LineCap, tolerance: f64) {
    let l = left_normal(d);
    match cap {
        LineCap::Butt => {
            out.push(p - l * half);
        }
        LineCap::Square => {
            out.push(p + l * half + d * half);
            out.push(p - l * half + d * half);
            out.push(p - l * half);
        }
        LineCap::Round => {
            // A semicircle from the left offset through d to the right.
            push_arc(out, p, half, l.y.atan2(l.x), std::f64::consts::PI, tolerance);
        }
    }
}

/// Appends a flattened circular arc, excluding its start point.
///
/// Approximated as cubics of at most a quadrant each, re-tessellated with
/// the regular flattener.
fn push_arc(out: &mut Contour, center: Point, radius: f64, a0: f64, sweep: f64, tolerance: f64) {
    use std::f64::consts::FRAC_PI_2;

    if sweep == 0.0 || !(radius > 0.0) {
        return;
    }

    let steps = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1);
    let h = sweep / steps as f64;
    let k = 4.0 / 3.0 * (h / 4.0).tan();

    let mut theta = a0;
    for _ in 0..steps {
        let next = theta + h;
        let (sin0, cos0) = theta.sin_cos();
        let (sin1, cos1) = next.sin_cos();

        let p0 = Point::from_xy(center.x + radius * cos0, center.y + radius * sin0);
        let p1 = Point::from_xy(center.x + radius * cos1, center.y + radius * sin1);
        let c1 = Point::from_xy(p0.x - k * radius * sin0, p0.y + k * radius * cos0);
        let c2 = Point::from_xy(p1.x + k * radius * sin1, p1.y - k * radius * cos1);

        flatten_cubic(p0, c1, c2, p1, tolerance, out);
        theta = next;
    }
}

fn emit(mut contour: Contour, out: &mut Polygon) {
    contour.dedup_closing_corner();
    contour.set_closed(true);
    out.push_contour(contour);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_line(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        let mut c = Contour::new();
        c.push(Point::from_xy(x0, y0));
        c.push(Point::from_xy(x1, y1));
        let mut poly = Polygon::new();
        poly.push_contour(c);
        poly
    }

    fn closed_square() -> Polygon {
        let mut c = Contour::new();
        c.push(Point::from_xy(10.0, 10.0));
        c.push(Point::from_xy(30.0, 10.0));
        c.push(Point::from_xy(30.0, 30.0));
        c.push(Point::from_xy(10.0, 30.0));
        c.set_closed(true);
        let mut poly = Polygon::new();
        poly.push_contour(c);
        poly
    }

    #[test]
    fn zero_width_is_empty() {
        let stroke = Stroke {
            width: 0.0,
            ..Stroke::default()
        };
        let out = expand_polygon(&open_line(0.0, 0.0, 10.0, 0.0), &stroke, 0.1);
        assert!(out.is_empty());
    }

    #[test]
    fn butt_stroke_is_a_rectangle() {
        let stroke = Stroke {
            width: 4.0,
            ..Stroke::default()
        };
        let out = expand_polygon(&open_line(0.0, 10.0, 10.0, 10.0), &stroke, 0.1);
        assert_eq!(out.contours().len(), 1);
        assert_eq!(out.contours()[0].len(), 4);
        assert_eq!(out.extent_left(), 0.0);
        assert_eq!(out.extent_right(), 10.0);
        assert_eq!(out.extent_top(), 8.0);
        assert_eq!(out.extent_bottom(), 12.0);
    }

    #[test]
    fn square_cap_extends_by_half_width() {
        let stroke = Stroke {
            width: 4.0,
            line_cap: LineCap::Square,
            ..Stroke::default()
        };
        let out = expand_polygon(&open_line(0.0, 10.0, 10.0, 10.0), &stroke, 0.1);
        assert_eq!(out.extent_left(), -2.0);
        assert_eq!(out.extent_right(), 12.0);
    }

    #[test]
    fn round_cap_extends_by_half_width() {
        let stroke = Stroke {
            width: 4.0,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        let out = expand_polygon(&open_line(0.0, 10.0, 10.0, 10.0), &stroke, 0.01);
        assert!((out.extent_left() - -2.0).abs() < 0.05);
        assert!((out.extent_right() - 12.0).abs() < 0.05);
    }

    #[test]
    fn closed_contour_yields_two_loops() {
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        let out = expand_polygon(&closed_square(), &stroke, 0.1);
        assert_eq!(out.contours().len(), 2);
        // Outer ring reaches one half-width beyond the square.
        assert_eq!(out.extent_left(), 9.0);
        assert_eq!(out.extent_right(), 31.0);
    }

    #[test]
    fn miter_extends_to_corner() {
        // A right angle with width 2: the miter tip reaches sqrt(2)/2
        // beyond the corner along the diagonal.
        let mut c = Contour::new();
        c.push(Point::from_xy(0.0, 10.0));
        c.push(Point::from_xy(10.0, 10.0));
        c.push(Point::from_xy(10.0, 0.0));
        let mut poly = Polygon::new();
        poly.push_contour(c);

        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        let out = expand_polygon(&poly, &stroke, 0.1);
        assert!((out.extent_right() - 11.0).abs() < 1e-9);
        assert!((out.extent_bottom() - 11.0).abs() < 1e-9);

        // The miter tip is the corner of the offset rectangle pair.
        let has_tip = out.contours()[0]
            .corners()
            .iter()
            .any(|p| (p.x - 11.0).abs() < 1e-9 && (p.y - 11.0).abs() < 1e-9);
        assert!(has_tip);
    }

    #[test]
    fn miter_limit_falls_back_to_bevel() {
        // A hairpin turn: the miter would be enormous.
        let mut c = Contour::new();
        c.push(Point::from_xy(0.0, 0.0));
        c.push(Point::from_xy(20.0, 1.0));
        c.push(Point::from_xy(0.0, 2.0));
        let mut poly = Polygon::new();
        poly.push_contour(c);

        let stroke = Stroke {
            width: 2.0,
            miter_limit: 4.0,
            ..Stroke::default()
        };
        let out = expand_polygon(&poly, &stroke, 0.1);
        // Beveled: nothing reaches far past the turn point.
        assert!(out.extent_right() < 22.0);
    }

    #[test]
    fn round_dot_for_degenerate_subpath() {
        let mut c = Contour::new();
        c.push(Point::from_xy(5.0, 5.0));
        let mut poly = Polygon::new();
        poly.push_contour(c);

        let stroke = Stroke {
            width: 4.0,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        let out = expand_polygon(&poly, &stroke, 0.01);
        assert_eq!(out.contours().len(), 1);
        assert!((out.extent_left() - 3.0).abs() < 0.05);
        assert!((out.extent_right() - 7.0).abs() < 0.05);

        // Butt caps draw nothing for a dot.
        let butt = Stroke {
            width: 4.0,
            ..Stroke::default()
        };
        assert!(expand_polygon(&poly, &butt, 0.01).is_empty());
    }

    #[test]
    fn dashes_split_into_multiple_outlines() {
        let stroke = Stroke {
            width: 2.0,
            dash: Some(DashPattern::new(vec![2.0, 2.0], 0.0).unwrap()),
            ..Stroke::default()
        };
        let out = expand_polygon(&open_line(0.0, 0.0, 10.0, 0.0), &stroke, 0.1);
        assert_eq!(out.contours().len(), 3);
    }

    #[test]
    fn direction_symmetry() {
        let stroke = Stroke {
            width: 3.0,
            ..Stroke::default()
        };
        let fwd = expand_polygon(&open_line(2.0, 5.0, 12.0, 5.0), &stroke, 0.1);
        let rev = expand_polygon(&open_line(12.0, 5.0, 2.0, 5.0), &stroke, 0.1);
        assert_eq!(fwd.extent_left(), rev.extent_left());
        assert_eq!(fwd.extent_right(), rev.extent_right());
        assert_eq!(fwd.extent_top(), rev.extent_top());
        assert_eq!(fwd.extent_bottom(), rev.extent_bottom());
    }
}
