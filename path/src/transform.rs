// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use strict_num::FiniteF64;

use crate::point::Point;
use crate::scalar::{Scalar, SCALAR_NEARLY_ZERO};

/// An affine transformation matrix.
///
/// Maps user-space points into device space as:
///
/// ```text
/// | sx kx tx |   | x |
/// | ky sy ty | * | y |
///               | 1 |
/// ```
///
/// # Guarantees
///
/// - All values are finite.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform {
    sx: f64, kx: f64, tx: f64,
    ky: f64, sy: f64, ty: f64,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform {
            sx: 1.0, kx: 0.0, tx: 0.0,
            ky: 0.0, sy: 1.0, ty: 0.0,
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    #[inline]
    pub fn identity() -> Self {
        Transform::default()
    }

    /// Creates a new `Transform`.
    ///
    /// # Checks
    ///
    /// - All values must be finite.
    pub fn from_row(sx: f64, ky: f64, kx: f64, sy: f64, tx: f64, ty: f64) -> Option<Self> {
        let sx = FiniteF64::new(sx)?.get();
        let ky = FiniteF64::new(ky)?.get();
        let kx = FiniteF64::new(kx)?.get();
        let sy = FiniteF64::new(sy)?.get();
        let tx = FiniteF64::new(tx)?.get();
        let ty = FiniteF64::new(ty)?.get();
        Some(Transform { sx, kx, tx, ky, sy, ty })
    }

    /// Creates a new translating `Transform`.
    ///
    /// # Checks
    ///
    /// - All values must be finite.
    #[inline]
    pub fn from_translate(tx: f64, ty: f64) -> Option<Self> {
        Transform::from_row(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a new scaling `Transform`.
    ///
    /// # Checks
    ///
    /// - All values must be finite.
    #[inline]
    pub fn from_scale(sx: f64, sy: f64) -> Option<Self> {
        Transform::from_row(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Creates a new rotating `Transform`.
    ///
    /// `angle` is in radians, positive values rotate clockwise in the
    /// y-down device coordinate system.
    ///
    /// # Checks
    ///
    /// - `angle` must be finite.
    #[inline]
    pub fn from_rotate(angle: f64) -> Option<Self> {
        let (sin, cos) = angle.sin_cos();
        Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns all values.
    #[inline]
    pub fn get_row(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.sx, self.ky, self.kx, self.sy, self.tx, self.ty)
    }

    /// Checks that transform is identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }

    /// Checks that transform contains no skew part.
    #[inline]
    pub fn has_skew(&self) -> bool {
        self.kx != 0.0 || self.ky != 0.0
    }

    /// Pre-translates the current transform.
    #[inline]
    #[must_use]
    pub fn pre_translate(&self, tx: f64, ty: f64) -> Option<Self> {
        Some(self.pre_concat(&Transform::from_translate(tx, ty)?))
    }

    /// Pre-scales the current transform.
    #[inline]
    #[must_use]
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Option<Self> {
        Some(self.pre_concat(&Transform::from_scale(sx, sy)?))
    }

    /// Pre-rotates the current transform.
    #[inline]
    #[must_use]
    pub fn pre_rotate(&self, angle: f64) -> Option<Self> {
        Some(self.pre_concat(&Transform::from_rotate(angle)?))
    }

    /// Pre-concats the current transform: `self * other`.
    #[must_use]
    pub fn pre_concat(&self, other: &Self) -> Self {
        concat(self, other)
    }

    /// Post-concats the current transform: `other * self`.
    #[must_use]
    pub fn post_concat(&self, other: &Self) -> Self {
        concat(other, self)
    }

    /// Maps a user-space point into device space.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point::from_xy(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    /// Maps a vector by the linear part only, ignoring translation.
    #[inline]
    pub fn map_vector(&self, v: Point) -> Point {
        Point::from_xy(
            self.sx * v.x + self.kx * v.y,
            self.ky * v.x + self.sy * v.y,
        )
    }

    /// Maps a device-space distance vector back into user space.
    ///
    /// Applies the inverse linear part; translation does not affect
    /// distances. Returns `None` when the transform is not invertible.
    pub fn map_vector_inverse(&self, dx: f64, dy: f64) -> Option<Point> {
        let inv = self.invert()?;
        Some(inv.map_vector(Point::from_xy(dx, dy)))
    }

    /// Returns an inverted transform.
    ///
    /// Returns `None` when the determinant is nearly zero.
    pub fn invert(&self) -> Option<Self> {
        // Allow the trivial case to be inlined.
        if self.is_identity() {
            return Some(*self);
        }

        let det = self.sx * self.sy - self.kx * self.ky;
        // The determinant is on the order of the square of the matrix
        // members, so compare against the square of the nearly-zero bound.
        if det.is_nearly_zero_within_tolerance(SCALAR_NEARLY_ZERO.sqr()) {
            return None;
        }

        let inv_det = det.invert();
        Transform::from_row(
            self.sy * inv_det,
            -self.ky * inv_det,
            -self.kx * inv_det,
            self.sx * inv_det,
            (self.kx * self.ty - self.sy * self.tx) * inv_det,
            (self.ky * self.tx - self.sx * self.ty) * inv_det,
        )
    }

    /// Returns the larger of the two principal-axis scale factors.
    ///
    /// Used for stroke-width compensation: a stroke under nonuniform scale
    /// must still cover at least one device pixel along its narrow axis.
    pub fn max_scale_factor(&self) -> f64 {
        let x = (self.sx * self.sx + self.ky * self.ky).sqrt();
        let y = (self.kx * self.kx + self.sy * self.sy).sqrt();
        if x > y { x } else { y }
    }
}

fn concat(a: &Transform, b: &Transform) -> Transform {
    if a.is_identity() {
        *b
    } else if b.is_identity() {
        *a
    } else {
        Transform {
            sx: a.sx * b.sx + a.kx * b.ky,
            ky: a.ky * b.sx + a.sy * b.ky,
            kx: a.sx * b.kx + a.kx * b.sy,
            sy: a.ky * b.kx + a.sy * b.sy,
            tx: a.sx * b.tx + a.kx * b.ty + a.tx,
            ty: a.ky * b.tx + a.sy * b.ty + a.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert_eq!(Transform::from_row(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0), None);
        assert_eq!(Transform::from_translate(f64::INFINITY, 0.0), None);
        assert!(Transform::from_row(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).is_some());
    }

    #[test]
    fn map_point() {
        let ts = Transform::from_translate(10.0, 20.0).unwrap();
        assert_eq!(ts.map_point(Point::from_xy(1.0, 2.0)), Point::from_xy(11.0, 22.0));

        let ts = Transform::from_scale(2.0, 3.0).unwrap();
        assert_eq!(ts.map_point(Point::from_xy(1.0, 2.0)), Point::from_xy(2.0, 6.0));
    }

    #[test]
    fn invert() {
        let ts = Transform::from_row(2.0, 0.0, 0.0, 4.0, 10.0, 20.0).unwrap();
        let inv = ts.invert().unwrap();
        let p = inv.map_point(ts.map_point(Point::from_xy(3.0, 5.0)));
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y - 5.0).abs() < 1e-12);

        // Degenerate: zero scale has no inverse.
        let ts = Transform::from_row(0.0, 0.0, 0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(ts.invert(), None);
    }

    #[test]
    fn map_vector_ignores_translate() {
        let ts = Transform::from_translate(100.0, 100.0).unwrap();
        assert_eq!(ts.map_vector(Point::from_xy(1.0, 2.0)), Point::from_xy(1.0, 2.0));
        assert_eq!(
            ts.map_vector_inverse(1.0, 2.0).unwrap(),
            Point::from_xy(1.0, 2.0)
        );
    }

    #[test]
    fn max_scale_factor() {
        let ts = Transform::from_scale(2.0, 5.0).unwrap();
        assert_eq!(ts.max_scale_factor(), 5.0);

        let ts = Transform::from_rotate(core::f64::consts::FRAC_PI_2).unwrap();
        assert!((ts.max_scale_factor() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn concat_order() {
        let ts = Transform::from_translate(10.0, 0.0)
            .unwrap()
            .pre_scale(2.0, 2.0)
            .unwrap();
        // Scale applies first, then the translation.
        assert_eq!(ts.map_point(Point::from_xy(1.0, 1.0)), Point::from_xy(12.0, 2.0));
    }
}
