// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::point::Point;

/// A single entry of a path node stream.
///
/// Coordinates are already in device space: the builder applies its
/// current transform at append time.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PathNode {
    MoveTo(Point),
    LineTo(Point),
    /// A cubic curve towards the last point. Quadratic curves are encoded
    /// as cubics with lifted control points.
    CurveTo(Point, Point, Point),
    Close,
}

/// A finished, immutable path node stream.
///
/// Created via [`PathBuilder`](crate::PathBuilder).
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    pub(crate) nodes: Vec<PathNode>,
}

impl Path {
    /// Returns the number of nodes in the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the path is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node stream.
    #[inline]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Returns the last on-curve point, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.nodes.iter().rev().find_map(|node| match node {
            PathNode::MoveTo(p) | PathNode::LineTo(p) | PathNode::CurveTo(_, _, p) => Some(*p),
            PathNode::Close => None,
        })
    }

    /// Clears the path, returning the allocation to a builder.
    pub fn clear(mut self) -> crate::PathBuilder {
        self.nodes.clear();
        crate::PathBuilder::from_vec(self.nodes)
    }
}
