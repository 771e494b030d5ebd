// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use vellum_path::Point;

/// One closed ring of corners in device space.
///
/// The corner list is cyclic: the edge from the last corner back to the
/// first is implied, never stored. A single-corner contour carries no
/// edges but is kept so round caps can still render dots.
#[derive(Clone, PartialEq, Debug)]
pub struct Contour {
    corners: Vec<Point>,
    closed: bool,
}

impl Contour {
    /// Creates an empty contour.
    pub fn new() -> Self {
        Contour {
            corners: Vec::new(),
            closed: false,
        }
    }

    /// Creates a contour from a corner list.
    pub fn from_corners(corners: Vec<Point>, closed: bool) -> Self {
        Contour { corners, closed }
    }

    /// Appends a corner, dropping exact duplicates of the previous one.
    pub fn push(&mut self, p: Point) {
        if self.corners.last() != Some(&p) {
            self.corners.push(p);
        }
    }

    /// Returns the corner count.
    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Checks if the contour has no corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Returns the corners in order.
    #[inline]
    pub fn corners(&self) -> &[Point] {
        &self.corners
    }

    /// Returns the corner at a wrapped index.
    #[inline]
    pub fn corner(&self, i: usize) -> Point {
        self.corners[i % self.corners.len()]
    }

    /// Whether the source subpath was explicitly closed.
    ///
    /// Filling treats every contour as a cycle either way; stroking caps
    /// open contours and joins closed ones.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Drops a trailing corner that duplicates the first one, so closing
    /// never produces a spurious zero-length edge.
    pub(crate) fn dedup_closing_corner(&mut self) {
        if self.corners.len() > 1 && self.corners.first() == self.corners.last() {
            self.corners.pop();
        }
    }

    /// Drops all corners, keeping the allocation.
    pub(crate) fn clear_corners(&mut self) {
        self.corners.clear();
    }
}

impl Default for Contour {
    fn default() -> Self {
        Contour::new()
    }
}

/// The tessellation output: a set of contours plus scanline metadata.
///
/// Extents are tight over all corners, in (unscaled) device space.
#[derive(Clone, PartialEq, Debug)]
pub struct Polygon {
    contours: Vec<Contour>,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Polygon {
    /// Creates an empty polygon.
    pub fn new() -> Self {
        Polygon {
            contours: Vec::new(),
            left: f64::MAX,
            right: f64::MIN,
            top: f64::MAX,
            bottom: f64::MIN,
        }
    }

    /// Appends a contour, widening the extents.
    ///
    /// Empty contours are dropped.
    pub fn push_contour(&mut self, contour: Contour) {
        if contour.is_empty() {
            return;
        }

        for p in contour.corners() {
            self.left = self.left.min(p.x);
            self.right = self.right.max(p.x);
            self.top = self.top.min(p.y);
            self.bottom = self.bottom.max(p.y);
        }

        self.contours.push(contour);
    }

    /// Checks if the polygon holds no contours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Returns the contours.
    #[inline]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Returns the tight left extent.
    #[inline]
    pub fn extent_left(&self) -> f64 {
        self.left
    }

    /// Returns the tight right extent.
    #[inline]
    pub fn extent_right(&self) -> f64 {
        self.right
    }

    /// Returns the tight top extent.
    #[inline]
    pub fn extent_top(&self) -> f64 {
        self.top
    }

    /// Returns the tight bottom extent.
    #[inline]
    pub fn extent_bottom(&self) -> f64 {
        self.bottom
    }

    /// Builds the scanline edge table at an integer supersample scale.
    ///
    /// Corners are scaled by `scale` first; edges are sampled at scanline
    /// centers, so an edge covers the half-open scanline range whose
    /// centers fall inside its y span. Horizontal edges contribute no
    /// scanline coverage and are dropped here.
    ///
    /// The table is rebuilt per fill, so its allocation is fallible.
    pub(crate) fn edges(&self, scale: u32) -> Result<EdgeTable, crate::error::Error> {
        let scale = scale as f64;
        let segment_count: usize = self.contours.iter().map(|c| c.len()).sum();

        let mut edges = Vec::new();
        edges
            .try_reserve(segment_count)
            .map_err(|_| crate::error::Error::AllocationFailed)?;

        for contour in &self.contours {
            let n = contour.len();
            if n < 2 {
                continue;
            }

            for i in 0..n {
                let p0 = contour.corner(i);
                let p1 = contour.corner(i + 1);
                if let Some(edge) = Edge::from_segment(
                    Point::from_xy(p0.x * scale, p0.y * scale),
                    Point::from_xy(p1.x * scale, p1.y * scale),
                ) {
                    edges.push(edge);
                }
            }
        }

        // The scanline walk consumes edges in min-y order.
        edges.sort_by(|a, b| a.top.cmp(&b.top));

        // Y-breakpoints: the scanlines at which the active set changes.
        let mut breakpoints: Vec<i32> = edges
            .iter()
            .flat_map(|e| [e.top, e.bottom])
            .collect();
        breakpoints.sort_unstable();
        breakpoints.dedup();

        Ok(EdgeTable { edges, breakpoints })
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Polygon::new()
    }
}

/// An active-edge record.
///
/// `x` is the crossing at the current scanline's center and advances by
/// `dx` per scanline. The edge is live for scanlines `top..bottom`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Edge {
    pub x: f64,
    pub dx: f64,
    pub top: i32,
    pub bottom: i32,
    pub winding: i32,
}

impl Edge {
    /// Builds an edge from a device-space segment, or `None` when the
    /// segment crosses no scanline center.
    fn from_segment(p0: Point, p1: Point) -> Option<Edge> {
        if !p0.is_finite() || !p1.is_finite() {
            return None;
        }

        let winding = if p1.y > p0.y { 1 } else { -1 };
        let (a, b) = if p1.y > p0.y { (p0, p1) } else { (p1, p0) };

        // Clamp wild scanline indices so the narrowing below cannot wrap;
        // the visible part of the edge is unaffected.
        const Y_BOUND: i64 = 1 << 30;
        let top = ((a.y - 0.5).ceil() as i64).max(-Y_BOUND);
        let bottom = ((b.y - 0.5).ceil() as i64).min(Y_BOUND);
        if top >= bottom {
            return None;
        }
        let (top, bottom) = (top as i32, bottom as i32);

        let dx = (b.x - a.x) / (b.y - a.y);
        let x = a.x + (top as f64 + 0.5 - a.y) * dx;

        Some(Edge {
            x,
            dx,
            top,
            bottom,
            winding,
        })
    }
}

/// The per-fill scanline structures: edges sorted by `top` plus the
/// deduplicated breakpoint list.
pub(crate) struct EdgeTable {
    pub edges: Vec<Edge>,
    pub breakpoints: Vec<i32>,
}

impl EdgeTable {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The first scanline any edge covers.
    pub fn top(&self) -> i32 {
        self.edges.iter().map(|e| e.top).min().unwrap_or(0)
    }

    /// One past the last scanline any edge covers.
    pub fn bottom(&self) -> i32 {
        self.edges.iter().map(|e| e.bottom).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        Contour::from_corners(
            vec![
                Point::from_xy(x0, y0),
                Point::from_xy(x1, y0),
                Point::from_xy(x1, y1),
                Point::from_xy(x0, y1),
            ],
            true,
        )
    }

    #[test]
    fn extents_are_tight() {
        let mut poly = Polygon::new();
        poly.push_contour(square(1.5, 2.5, 10.0, 20.0));
        assert_eq!(poly.extent_left(), 1.5);
        assert_eq!(poly.extent_right(), 10.0);
        assert_eq!(poly.extent_top(), 2.5);
        assert_eq!(poly.extent_bottom(), 20.0);
    }

    #[test]
    fn horizontal_edges_are_dropped() {
        let mut poly = Polygon::new();
        poly.push_contour(square(0.0, 0.0, 10.0, 10.0));
        let table = poly.edges(1).unwrap();
        // Only the two vertical edges survive.
        assert_eq!(table.edges.len(), 2);
        assert_eq!(table.top(), 0);
        assert_eq!(table.bottom(), 10);
        assert_eq!(table.breakpoints, vec![0, 10]);
    }

    #[test]
    fn winding_signs() {
        let mut poly = Polygon::new();
        poly.push_contour(square(0.0, 0.0, 10.0, 10.0));
        let table = poly.edges(1).unwrap();
        let windings: i32 = table.edges.iter().map(|e| e.winding).sum();
        // One edge runs down, the other up.
        assert_eq!(windings, 0);
    }

    #[test]
    fn single_corner_contour_has_no_edges() {
        let mut contour = Contour::new();
        contour.push(Point::from_xy(5.0, 5.0));
        contour.push(Point::from_xy(5.0, 5.0)); // dropped duplicate

        let mut poly = Polygon::new();
        poly.push_contour(contour);
        assert!(!poly.is_empty());
        assert!(poly.edges(1).unwrap().is_empty());
    }

    #[test]
    fn scaling_scales_edges() {
        let mut poly = Polygon::new();
        poly.push_contour(square(0.0, 0.0, 10.0, 10.0));
        let table = poly.edges(4).unwrap();
        assert_eq!(table.bottom(), 40);
    }

    #[test]
    fn closing_corner_dedup() {
        let mut contour = Contour::new();
        contour.push(Point::from_xy(0.0, 0.0));
        contour.push(Point::from_xy(10.0, 0.0));
        contour.push(Point::from_xy(10.0, 10.0));
        contour.push(Point::from_xy(0.0, 0.0));
        contour.dedup_closing_corner();
        assert_eq!(contour.len(), 3);
    }

    #[test]
    fn edge_sampling_at_centers() {
        // A segment from y=0.6 to y=0.9 crosses no scanline center.
        let e = Edge::from_segment(Point::from_xy(0.0, 0.6), Point::from_xy(1.0, 0.9));
        assert!(e.is_none());

        // From y=0.4 to y=1.6 crosses the center of scanlines 0 and 1.
        let e = Edge::from_segment(Point::from_xy(0.0, 0.4), Point::from_xy(1.2, 1.6)).unwrap();
        assert_eq!(e.top, 0);
        assert_eq!(e.bottom, 2);
        assert_eq!(e.winding, 1);
    }
}
