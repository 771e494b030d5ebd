// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use strict_num::NormalizedF32;

use vellum_path::{Point, Scalar, Transform};

use crate::color::{hsl_to_rgb, linear_to_srgb, srgb_to_linear, Color, LinearRgba};
use crate::pixel::{Pixel, PremultipliedRgba8};

/// A gradient stop.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GradientStop {
    pub(crate) offset: NormalizedF32,
    pub(crate) color: Color,
}

impl GradientStop {
    /// Creates a new gradient stop.
    ///
    /// `offset` will be clamped to a 0..=1 range.
    pub fn new(offset: f32, color: Color) -> Self {
        GradientStop {
            offset: NormalizedF32::new_clamped(offset),
            color,
        }
    }
}

/// The geometric shape of a gradient.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum GradientKind {
    /// A linear gradient along the axis from `p0` to `p1`.
    Linear {
        /// The point mapped to offset 0.
        p0: Point,
        /// The point mapped to offset 1.
        p1: Point,
    },
    /// The two-circle radial formulation.
    Radial {
        /// The start circle center.
        c0: Point,
        /// The start circle radius.
        r0: f64,
        /// The end circle center.
        c1: Point,
        /// The end circle radius.
        r1: f64,
    },
    /// A sweep around `center` starting at `angle` (radians).
    Conic {
        /// The sweep center.
        center: Point,
        /// The angle mapped to offset 0.
        angle: f64,
    },
}

/// The hue-direction rule for HSL interpolation.
///
/// The four cases are defined on the directed hue distance; the wrap at
/// 360/0 degrees follows the named rule.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HueMethod {
    /// Take the shorter of the two arcs between the hues.
    Shorter,
    /// Take the longer arc.
    Longer,
    /// Always travel in the direction of increasing hue.
    Increasing,
    /// Always travel in the direction of decreasing hue.
    Decreasing,
}

/// The color space stops are interpolated in.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InterpolationMethod {
    /// Lerp premultiplied linear RGBA. The default.
    LinearRgb,
    /// Lerp in sRGB-encoded space.
    Srgb,
    /// Lerp in HSL with the given hue-direction rule.
    Hsl(HueMethod),
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::LinearRgb
    }
}

/// A gradient source.
///
/// Stores the shape, the stop list and the interpolation method. The
/// gradient may carry its own transform, applied as user to gradient
/// space before evaluating the geometric parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<GradientStop>,
    method: InterpolationMethod,
    transform: Transform,
    inv_transform: Option<Transform>,
}

impl Gradient {
    /// Creates a new gradient.
    ///
    /// The stop list must not be empty; offsets are pinned so the list is
    /// monotone non-decreasing (duplicate offsets form a hard stop). A
    /// non-invertible transform produces an empty (transparent) pattern.
    pub fn new(
        kind: GradientKind,
        mut stops: Vec<GradientStop>,
        method: InterpolationMethod,
        transform: Transform,
    ) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }

        // Pin positions so they are monotone non-decreasing.
        let mut prev = 0.0;
        for stop in &mut stops {
            let curr = (stop.offset.get() as f64).bound(prev, 1.0);
            stop.offset = NormalizedF32::new_clamped(curr as f32);
            prev = curr;
        }

        let inv_transform = transform.invert();
        if inv_transform.is_none() {
            log::warn!("failed to invert a gradient transform; nothing will be rendered");
        }

        Some(Gradient {
            kind,
            stops,
            method,
            transform,
            inv_transform,
        })
    }

    /// Creates a linear gradient with the default method and no transform.
    pub fn new_linear(p0: Point, p1: Point, stops: Vec<GradientStop>) -> Option<Self> {
        Gradient::new(
            GradientKind::Linear { p0, p1 },
            stops,
            InterpolationMethod::default(),
            Transform::identity(),
        )
    }

    /// Creates a two-circle radial gradient with the default method.
    pub fn new_radial(
        c0: Point,
        r0: f64,
        c1: Point,
        r1: f64,
        stops: Vec<GradientStop>,
    ) -> Option<Self> {
        Gradient::new(
            GradientKind::Radial { c0, r0, c1, r1 },
            stops,
            InterpolationMethod::default(),
            Transform::identity(),
        )
    }

    /// Creates a conic gradient with the default method.
    pub fn new_conic(center: Point, angle: f64, stops: Vec<GradientStop>) -> Option<Self> {
        Gradient::new(
            GradientKind::Conic { center, angle },
            stops,
            InterpolationMethod::default(),
            Transform::identity(),
        )
    }

    /// Returns the gradient's transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Evaluates the gradient at a device position.
    ///
    /// Returns a premultiplied pixel; degenerate geometry evaluates to
    /// transparent black.
    pub fn pixel_at(&self, x: i32, y: i32) -> Pixel {
        let inv = match self.inv_transform {
            Some(ts) => ts,
            None => return Pixel::Rgba(PremultipliedRgba8::TRANSPARENT),
        };

        let p = inv.map_point(Point::from_xy(x as f64, y as f64));
        let t = match self.parameter_at(p) {
            Some(t) if t.is_finite() => t.bound(0.0, 1.0),
            _ => return Pixel::Rgba(PremultipliedRgba8::TRANSPARENT),
        };

        self.interpolate(t as f32)
    }

    fn parameter_at(&self, p: Point) -> Option<f64> {
        match self.kind {
            GradientKind::Linear { p0, p1 } => {
                let d = p1 - p0;
                let len_sq = d.length_sq();
                if len_sq.is_nearly_zero() {
                    return None;
                }

                Some((p - p0).dot(d) / len_sq)
            }
            GradientKind::Radial { c0, r0, c1, r1 } => {
                radial_parameter(p, c0, r0, c1, r1)
            }
            GradientKind::Conic { center, angle } => {
                use std::f64::consts::PI;
                let v = p - center;
                let t = (v.y.atan2(v.x) - angle).rem_euclid(2.0 * PI) / (2.0 * PI);
                Some(t)
            }
        }
    }

    fn interpolate(&self, t: f32) -> Pixel {
        debug_assert!(!self.stops.is_empty());

        // The last stop at or below t; everything before the first stop
        // takes its color, everything past the last takes the last's.
        let mut lo = 0;
        for (i, stop) in self.stops.iter().enumerate() {
            if stop.offset.get() <= t {
                lo = i;
            } else {
                break;
            }
        }

        if t < self.stops[0].offset.get() {
            return premultiplied_pixel(self.stops[0].color.to_linear());
        }

        let hi = lo + 1;
        if hi == self.stops.len() {
            return premultiplied_pixel(self.stops[lo].color.to_linear());
        }

        let o0 = self.stops[lo].offset.get();
        let o1 = self.stops[hi].offset.get();
        let f = if o1 > o0 { (t - o0) / (o1 - o0) } else { 0.0 };

        let c0 = self.stops[lo].color.to_linear();
        let c1 = self.stops[hi].color.to_linear();
        premultiplied_pixel(mix(c0, c1, f, self.method))
    }
}

/// Solves the two-circle radial quadratic.
///
/// Yields the first root in 0..=1 with a positive interpolated radius,
/// preferring the larger root like the focal formulation does. Degenerate
/// configurations yield `None` (drawn as transparent).
fn radial_parameter(p: Point, c0: Point, r0: f64, c1: Point, r1: f64) -> Option<f64> {
    let cd = c1 - c0;
    let rd = r1 - r0;
    let pd = p - c0;

    if r0 <= 0.0 && r1 <= 0.0 {
        return None;
    }

    let a = cd.length_sq() - rd * rd;
    let b = -2.0 * (pd.dot(cd) + r0 * rd);
    let c = pd.length_sq() - r0 * r0;

    if a.abs().is_nearly_zero() {
        // Concentric equal radii is an empty pattern; otherwise the
        // quadratic collapses to a linear equation.
        if b.abs().is_nearly_zero() {
            return None;
        }
        let t = -c / b;
        return if r0 + t * rd >= 0.0 { Some(t) } else { None };
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let sq = disc.sqrt();
    let t0 = (-b + sq) / (2.0 * a);
    let t1 = (-b - sq) / (2.0 * a);
    let (first, second) = if t0 >= t1 { (t0, t1) } else { (t1, t0) };

    if r0 + first * rd >= 0.0 {
        Some(first)
    } else if r0 + second * rd >= 0.0 {
        Some(second)
    } else {
        None
    }
}

fn premultiplied_pixel(c: LinearRgba) -> Pixel {
    let p = c.premultiply();
    let ch = |v: f32| (v * 255.0 + 0.5) as u8;
    Pixel::Rgba(PremultipliedRgba8::from_rgba_unchecked(
        ch(p.red()),
        ch(p.green()),
        ch(p.blue()),
        ch(p.alpha()),
    ))
}

#[inline]
fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a + (b - a) * f
}

fn mix(c0: LinearRgba, c1: LinearRgba, f: f32, method: InterpolationMethod) -> LinearRgba {
    match method {
        InterpolationMethod::LinearRgb => {
            // Lerp premultiplied, then demultiply back into the hub form
            // so hard alpha edges interpolate without fringing.
            let p0 = c0.premultiply();
            let p1 = c1.premultiply();
            let a = lerp(p0.alpha(), p1.alpha(), f);
            if a == 0.0 {
                return LinearRgba::default();
            }
            LinearRgba::new(
                lerp(p0.red(), p1.red(), f) / a,
                lerp(p0.green(), p1.green(), f) / a,
                lerp(p0.blue(), p1.blue(), f) / a,
                a,
            )
        }
        InterpolationMethod::Srgb => {
            let s0 = c0.to_srgb();
            let s1 = c1.to_srgb();
            LinearRgba::new(
                srgb_to_linear(lerp(s0[0], s1[0], f)),
                srgb_to_linear(lerp(s0[1], s1[1], f)),
                srgb_to_linear(lerp(s0[2], s1[2], f)),
                lerp(s0[3], s1[3], f),
            )
        }
        InterpolationMethod::Hsl(hue_method) => {
            let h0 = c0.to_hsla();
            let h1 = c1.to_hsla();
            let h = lerp_hue(h0[0], h1[0], f, hue_method);
            let (r, g, b) = hsl_to_rgb(h, lerp(h0[1], h1[1], f), lerp(h0[2], h1[2], f));
            LinearRgba::new(
                srgb_to_linear(r),
                srgb_to_linear(g),
                srgb_to_linear(b),
                lerp(h0[3], h1[3], f),
            )
        }
    }
}

/// Interpolates two hues (degrees) under the given direction rule.
fn lerp_hue(h0: f32, h1: f32, f: f32, method: HueMethod) -> f32 {
    let mut d = h1 - h0;
    match method {
        HueMethod::Shorter => {
            if d > 180.0 {
                d -= 360.0;
            } else if d < -180.0 {
                d += 360.0;
            }
        }
        HueMethod::Longer => {
            if d > 0.0 && d < 180.0 {
                d -= 360.0;
            } else if d > -180.0 && d <= 0.0 {
                d += 360.0;
            }
        }
        HueMethod::Increasing => {
            if d < 0.0 {
                d += 360.0;
            }
        }
        HueMethod::Decreasing => {
            if d > 0.0 {
                d -= 360.0;
            }
        }
    }

    (h0 + d * f).rem_euclid(360.0)
}
