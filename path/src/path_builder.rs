// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use arrayvec::ArrayVec;

use crate::path::{Path, PathNode};
use crate::point::Point;
use crate::transform::Transform;

/// A path construction error.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathError {
    /// A relative segment was appended while the builder had no current point.
    NoCurrentPoint,
    /// A fixed-capacity builder ran out of node slots.
    Overflow,
}

impl core::fmt::Display for PathError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PathError::NoCurrentPoint => write!(f, "no current point"),
            PathError::Overflow => write!(f, "path node capacity exceeded"),
        }
    }
}

impl std::error::Error for PathError {}

/// A single cubic piece of a circular arc, in user space.
#[derive(Copy, Clone, Debug)]
struct ArcSegment {
    c1: Point,
    c2: Point,
    p: Point,
}

/// Splits an arc into cubic segments of at most a quadrant each.
///
/// Returns the arc's start point and the segment list. A full circle takes
/// four segments; the handle factor evaluates to the classic 0.5522847498
/// ratio for an exact quadrant.
fn arc_segments(
    cx: f64,
    cy: f64,
    r: f64,
    a0: f64,
    a1: f64,
    ccw: bool,
) -> Option<(Point, ArrayVec<ArcSegment, 4>)> {
    use core::f64::consts::{FRAC_PI_2, PI};

    if !(r > 0.0) || !r.is_finite() || !a0.is_finite() || !a1.is_finite() {
        return None;
    }

    let mut sweep = a1 - a0;
    if ccw {
        if sweep > 0.0 {
            sweep -= 2.0 * PI * (sweep / (2.0 * PI)).ceil();
        }
        sweep = sweep.max(-2.0 * PI);
    } else {
        if sweep < 0.0 {
            sweep += 2.0 * PI * (-sweep / (2.0 * PI)).ceil();
        }
        sweep = sweep.min(2.0 * PI);
    }

    let start = Point::from_xy(cx + r * a0.cos(), cy + r * a0.sin());
    let mut segments = ArrayVec::new();
    if sweep == 0.0 {
        return Some((start, segments));
    }

    let n = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1).min(4);
    let h = sweep / n as f64;
    let k = 4.0 / 3.0 * (h / 4.0).tan();

    let mut theta = a0;
    for _ in 0..n {
        let next = theta + h;
        let (sin0, cos0) = theta.sin_cos();
        let (sin1, cos1) = next.sin_cos();

        let p0 = Point::from_xy(cx + r * cos0, cy + r * sin0);
        let p3 = Point::from_xy(cx + r * cos1, cy + r * sin1);
        segments.push(ArcSegment {
            c1: Point::from_xy(p0.x - k * r * sin0, p0.y + k * r * cos0),
            c2: Point::from_xy(p3.x + k * r * sin1, p3.y - k * r * cos1),
            p: p3,
        });

        theta = next;
    }

    Some((start, segments))
}

/// Lifts a quadratic curve into an equivalent cubic.
#[inline]
fn quad_to_cubic(from: Point, ctrl: Point, to: Point) -> (Point, Point) {
    let c1 = from + (ctrl - from) * (2.0 / 3.0);
    let c2 = to + (ctrl - to) * (2.0 / 3.0);
    (c1, c2)
}

/// A path builder.
///
/// Nodes are stored in device space: every appended point is passed
/// through the builder's current transform first. Relative segments are
/// resolved against the current point in user space before mapping.
#[derive(Clone, Debug)]
pub struct PathBuilder {
    nodes: Vec<PathNode>,
    transform: Transform,
    last_user: Option<Point>,
    start_user: Option<Point>,
    move_required: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        PathBuilder::new()
    }
}

impl PathBuilder {
    /// Creates a new builder with an identity transform.
    pub fn new() -> Self {
        PathBuilder {
            nodes: Vec::new(),
            transform: Transform::identity(),
            last_user: None,
            start_user: None,
            move_required: false,
        }
    }

    /// Creates a new builder with a pre-sized node stream.
    pub fn with_capacity(nodes_capacity: usize) -> Self {
        PathBuilder {
            nodes: Vec::with_capacity(nodes_capacity),
            ..PathBuilder::new()
        }
    }

    pub(crate) fn from_vec(nodes: Vec<PathNode>) -> Self {
        PathBuilder {
            nodes,
            ..PathBuilder::new()
        }
    }

    /// Returns the transform applied to appended points.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Sets the transform applied to subsequently appended points.
    ///
    /// Already-appended nodes are not remapped.
    #[inline]
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Returns the current number of nodes in the builder.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the builder has any nodes added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node stream built so far.
    #[inline]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Returns the current point in user space, if any.
    #[inline]
    pub fn last_point(&self) -> Option<Point> {
        self.last_user
    }

    /// Adds the beginning of a contour.
    ///
    /// Consecutive MoveTo nodes collapse: the last one wins.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = Point::from_xy(x, y);
        let d = self.transform.map_point(p);

        if let Some(PathNode::MoveTo(_)) = self.nodes.last() {
            let last_idx = self.nodes.len() - 1;
            self.nodes[last_idx] = PathNode::MoveTo(d);
        } else {
            self.nodes.push(PathNode::MoveTo(d));
        }

        self.last_user = Some(p);
        self.start_user = Some(p);
        self.move_required = false;
    }

    fn inject_move_to_if_needed(&mut self) {
        if self.move_required || self.last_user.is_none() {
            match self.start_user {
                Some(p) => self.move_to(p.x, p.y),
                None => self.move_to(0.0, 0.0),
            }
        }
    }

    /// Adds a line from the current point.
    ///
    /// - If the builder is empty, adds `MoveTo(0, 0)` first.
    /// - If the previous node was `Close`, restarts the subpath at its start.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.inject_move_to_if_needed();

        let p = Point::from_xy(x, y);
        self.nodes.push(PathNode::LineTo(self.transform.map_point(p)));
        self.last_user = Some(p);
    }

    /// Adds a cubic curve from the current point towards `(x, y)`.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.inject_move_to_if_needed();

        let p = Point::from_xy(x, y);
        self.nodes.push(PathNode::CurveTo(
            self.transform.map_point(Point::from_xy(x1, y1)),
            self.transform.map_point(Point::from_xy(x2, y2)),
            self.transform.map_point(p),
        ));
        self.last_user = Some(p);
    }

    /// Adds a quadratic curve from the current point towards `(x, y)`.
    ///
    /// Stored as the equivalent cubic.
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.inject_move_to_if_needed();

        let from = self.last_user.unwrap();
        let (c1, c2) = quad_to_cubic(from, Point::from_xy(x1, y1), Point::from_xy(x, y));
        self.curve_to(c1.x, c1.y, c2.x, c2.y, x, y);
    }

    /// Adds a line relative to the current point.
    ///
    /// Errors when the builder has no current point.
    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<(), PathError> {
        let last = self.last_user.ok_or(PathError::NoCurrentPoint)?;
        self.line_to(last.x + dx, last.y + dy);
        Ok(())
    }

    /// Adds a cubic curve relative to the current point.
    ///
    /// Errors when the builder has no current point.
    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), PathError> {
        let last = self.last_user.ok_or(PathError::NoCurrentPoint)?;
        self.curve_to(
            last.x + dx1,
            last.y + dy1,
            last.x + dx2,
            last.y + dy2,
            last.x + dx,
            last.y + dy,
        );
        Ok(())
    }

    /// Adds a circular arc around `(cx, cy)` from angle `a0` to `a1`.
    ///
    /// Angles are in radians; with `ccw = false` the arc sweeps in the
    /// direction of increasing angles (clockwise on a y-down surface).
    /// When a current point exists, a line towards the arc start is added
    /// first, otherwise the arc starts a new subpath.
    ///
    /// Degenerate radii and non-finite angles draw nothing.
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        let (start, segments) = match arc_segments(cx, cy, r, a0, a1, ccw) {
            Some(v) => v,
            None => return,
        };

        if self.last_user.is_some() && !self.move_required {
            self.line_to(start.x, start.y);
        } else {
            self.move_to(start.x, start.y);
        }

        for seg in &segments {
            self.curve_to(seg.c1.x, seg.c1.y, seg.c2.x, seg.c2.y, seg.p.x, seg.p.y);
        }
    }

    /// Closes the current contour, returning the pen to the subpath start.
    ///
    /// Does nothing when the subpath is empty or already closed.
    pub fn close(&mut self) {
        if self.nodes.is_empty() || self.move_required {
            return;
        }

        if self.nodes.last() != Some(&PathNode::Close) {
            self.nodes.push(PathNode::Close);
        }

        self.last_user = self.start_user;
        self.move_required = true;
    }

    /// Adds a closed rectangle contour.
    pub fn push_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if !(w > 0.0) || !(h > 0.0) {
            return;
        }

        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close();
    }

    /// Adds a closed circle contour.
    pub fn push_circle(&mut self, cx: f64, cy: f64, r: f64) {
        if !(r > 0.0) {
            return;
        }

        self.move_to(cx + r, cy);
        self.arc(cx, cy, r, 0.0, 2.0 * core::f64::consts::PI, false);
        self.close();
    }

    /// Resets the builder. Memory is not deallocated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.last_user = None;
        self.start_user = None;
        self.move_required = false;
    }

    /// Finishes the builder and returns a `Path`.
    ///
    /// Returns `None` when the stream is empty or holds a lone MoveTo.
    pub fn finish(self) -> Option<Path> {
        if self.nodes.len() < 2 {
            return None;
        }

        Some(Path { nodes: self.nodes })
    }
}

/// A static-capacity path builder for hot paths.
///
/// Semantically identical to [`PathBuilder`], except the node stream lives
/// in a fixed-size buffer and appends past capacity report
/// [`PathError::Overflow`].
#[derive(Clone, Debug)]
pub struct FixedPathBuilder<const N: usize> {
    nodes: ArrayVec<PathNode, N>,
    transform: Transform,
    last_user: Option<Point>,
    start_user: Option<Point>,
    move_required: bool,
}

impl<const N: usize> Default for FixedPathBuilder<N> {
    fn default() -> Self {
        FixedPathBuilder::new()
    }
}

impl<const N: usize> FixedPathBuilder<N> {
    /// Creates a new builder with an identity transform.
    pub fn new() -> Self {
        FixedPathBuilder {
            nodes: ArrayVec::new(),
            transform: Transform::identity(),
            last_user: None,
            start_user: None,
            move_required: false,
        }
    }

    /// Sets the transform applied to subsequently appended points.
    #[inline]
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Returns the node stream built so far.
    #[inline]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    fn push(&mut self, node: PathNode) -> Result<(), PathError> {
        self.nodes.try_push(node).map_err(|_| PathError::Overflow)
    }

    /// See [`PathBuilder::move_to`].
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), PathError> {
        let p = Point::from_xy(x, y);
        let d = self.transform.map_point(p);

        if let Some(PathNode::MoveTo(_)) = self.nodes.last() {
            let last_idx = self.nodes.len() - 1;
            self.nodes[last_idx] = PathNode::MoveTo(d);
        } else {
            self.push(PathNode::MoveTo(d))?;
        }

        self.last_user = Some(p);
        self.start_user = Some(p);
        self.move_required = false;
        Ok(())
    }

    fn inject_move_to_if_needed(&mut self) -> Result<(), PathError> {
        if self.move_required || self.last_user.is_none() {
            match self.start_user {
                Some(p) => self.move_to(p.x, p.y)?,
                None => self.move_to(0.0, 0.0)?,
            }
        }

        Ok(())
    }

    /// See [`PathBuilder::line_to`].
    pub fn line_to(&mut self, x: f64, y: f64) -> Result<(), PathError> {
        self.inject_move_to_if_needed()?;

        let p = Point::from_xy(x, y);
        self.push(PathNode::LineTo(self.transform.map_point(p)))?;
        self.last_user = Some(p);
        Ok(())
    }

    /// See [`PathBuilder::curve_to`].
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    ) -> Result<(), PathError> {
        self.inject_move_to_if_needed()?;

        let p = Point::from_xy(x, y);
        self.push(PathNode::CurveTo(
            self.transform.map_point(Point::from_xy(x1, y1)),
            self.transform.map_point(Point::from_xy(x2, y2)),
            self.transform.map_point(p),
        ))?;
        self.last_user = Some(p);
        Ok(())
    }

    /// See [`PathBuilder::quad_to`].
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) -> Result<(), PathError> {
        self.inject_move_to_if_needed()?;

        let from = self.last_user.unwrap();
        let (c1, c2) = quad_to_cubic(from, Point::from_xy(x1, y1), Point::from_xy(x, y));
        self.curve_to(c1.x, c1.y, c2.x, c2.y, x, y)
    }

    /// See [`PathBuilder::rel_line_to`].
    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<(), PathError> {
        let last = self.last_user.ok_or(PathError::NoCurrentPoint)?;
        self.line_to(last.x + dx, last.y + dy)
    }

    /// See [`PathBuilder::rel_curve_to`].
    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), PathError> {
        let last = self.last_user.ok_or(PathError::NoCurrentPoint)?;
        self.curve_to(
            last.x + dx1,
            last.y + dy1,
            last.x + dx2,
            last.y + dy2,
            last.x + dx,
            last.y + dy,
        )
    }

    /// See [`PathBuilder::arc`].
    pub fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        a0: f64,
        a1: f64,
        ccw: bool,
    ) -> Result<(), PathError> {
        let (start, segments) = match arc_segments(cx, cy, r, a0, a1, ccw) {
            Some(v) => v,
            None => return Ok(()),
        };

        if self.last_user.is_some() && !self.move_required {
            self.line_to(start.x, start.y)?;
        } else {
            self.move_to(start.x, start.y)?;
        }

        for seg in &segments {
            self.curve_to(seg.c1.x, seg.c1.y, seg.c2.x, seg.c2.y, seg.p.x, seg.p.y)?;
        }

        Ok(())
    }

    /// See [`PathBuilder::close`].
    pub fn close(&mut self) -> Result<(), PathError> {
        if self.nodes.is_empty() || self.move_required {
            return Ok(());
        }

        if self.nodes.last() != Some(&PathNode::Close) {
            self.push(PathNode::Close)?;
        }

        self.last_user = self.start_user;
        self.move_required = true;
        Ok(())
    }

    /// Resets the builder.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.last_user = None;
        self.start_user = None;
        self.move_required = false;
    }
}
