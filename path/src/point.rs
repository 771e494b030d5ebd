// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::scalar::Scalar;

/// A point in 2D space.
///
/// Doesn't guarantee to be finite. Coordinates are in user space until
/// passed through a `Transform`.
#[allow(missing_docs)]
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl Point {
    /// Creates a new `Point`.
    #[inline]
    pub const fn from_xy(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Creates a point at 0x0 position.
    #[inline]
    pub const fn zero() -> Self {
        Point { x: 0.0, y: 0.0 }
    }

    /// Checks that both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Checks that both coordinates are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns the dot product of two points treated as vectors.
    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the cross product of two points treated as vectors.
    #[inline]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns the Euclidean distance from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the squared distance from the origin.
    #[inline]
    pub fn length_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Returns the distance to `other`.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Scales the vector to a unit length.
    ///
    /// Leaves the point unchanged when its length is nearly zero.
    pub fn normalize(&mut self) -> bool {
        let len = self.length();
        if len.is_nearly_zero() {
            return false;
        }

        let inv = len.invert();
        self.x *= inv;
        self.y *= inv;
        true
    }

    /// Returns a vector of the same direction and the given length.
    pub fn with_length(mut self, len: f64) -> Option<Point> {
        if !self.normalize() {
            return None;
        }

        self.x *= len;
        self.y *= len;
        Some(self)
    }

    /// Rotates the vector 90 degrees clockwise.
    #[inline]
    pub fn rotate_cw(&self) -> Point {
        Point::from_xy(-self.y, self.x)
    }

    /// Rotates the vector 90 degrees counter-clockwise.
    #[inline]
    pub fn rotate_ccw(&self) -> Point {
        Point::from_xy(self.y, -self.x)
    }

    /// Returns the midpoint between `self` and `other`.
    #[inline]
    pub fn mid(&self, other: Point) -> Point {
        Point::from_xy(self.x.ave(other.x), self.y.ave(other.y))
    }
}

impl core::ops::Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::from_xy(self.x + other.x, self.y + other.y)
    }
}

impl core::ops::AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::from_xy(self.x - other.x, self.y - other.y)
    }
}

impl core::ops::SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl core::ops::Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::from_xy(-self.x, -self.y)
    }
}

impl core::ops::Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, factor: f64) -> Point {
        Point::from_xy(self.x * factor, self.y * factor)
    }
}
