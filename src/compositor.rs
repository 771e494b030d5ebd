// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Per-pixel Porter-Duff application.
//!
//! Two pipelines exist: an integer one over premultiplied 8-bit channels
//! and a float one over premultiplied linear `f32` channels. The float
//! pipeline supports every operator; the integer one only the plain
//! Porter-Duff subset. Operators outside that subset force the float
//! pipeline regardless of the requested precision.

use crate::pattern::Pattern;
use crate::pixel::{premultiply_u8, Pixel, PremultipliedRgba8, ALPHA_U8_OPAQUE};
use crate::surface::Surface;

/// A compositing operator.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Operator {
    /// Replaces destination with zero: fully transparent.
    Clear,
    /// Replaces destination.
    Source,
    /// Preserves destination.
    Destination,
    /// Source over destination.
    SourceOver,
    /// Destination over source.
    DestinationOver,
    /// Source trimmed inside destination.
    SourceIn,
    /// Destination trimmed by source.
    DestinationIn,
    /// Source trimmed outside destination.
    SourceOut,
    /// Destination trimmed outside source.
    DestinationOut,
    /// Source inside destination blended with destination.
    SourceAtop,
    /// Destination inside source blended with source.
    DestinationAtop,
    /// Each of source and destination trimmed outside the other.
    Xor,
    /// Saturating sum of colors.
    Plus,
    /// Sum of colors, clamped in linear light.
    PlusLighter,
    /// Multiply source with destination, darkening image.
    Multiply,
    /// Multiply inverse of pixels, inverting result; brightens destination.
    Screen,
    /// Multiply or screen, depending on destination.
    Overlay,
    /// Darker of source and destination.
    Darken,
    /// Lighter of source and destination.
    Lighten,
    /// Brighten destination to reflect source.
    ColorDodge,
    /// Darken destination to reflect source.
    ColorBurn,
    /// Multiply or screen, depending on source.
    HardLight,
    /// Lighten or darken, depending on source.
    SoftLight,
    /// Subtract darker from lighter with higher contrast.
    Difference,
    /// Subtract darker from lighter with lower contrast.
    Exclusion,
    /// Hue of source with saturation and luminosity of destination.
    Hue,
    /// Saturation of source with hue and luminosity of destination.
    Saturation,
    /// Hue and saturation of source with luminosity of destination.
    Color,
    /// Luminosity of source with hue and saturation of destination.
    Luminosity,
}

impl Default for Operator {
    fn default() -> Self {
        Operator::SourceOver
    }
}

impl Operator {
    /// Checks whether correct semantics require the float pipeline.
    ///
    /// Everything past `Plus` does; the caller-requested precision is
    /// overridden for those.
    pub fn requires_float(self) -> bool {
        !matches!(
            self,
            Operator::Clear
                | Operator::Source
                | Operator::Destination
                | Operator::SourceOver
                | Operator::DestinationOver
                | Operator::SourceIn
                | Operator::DestinationIn
                | Operator::SourceOut
                | Operator::DestinationOut
                | Operator::SourceAtop
                | Operator::DestinationAtop
                | Operator::Xor
                | Operator::Plus
        )
    }

    /// Checks whether `(operator, src)` reduces to a plain source write.
    ///
    /// `Source` always does; `SourceOver` does when the source is opaque.
    /// Reducible spans bypass the compositor entirely.
    pub(crate) fn reduces_to_source_write(self, src: &Pixel) -> bool {
        match self {
            Operator::Source => true,
            Operator::SourceOver => src.is_opaque(),
            _ => false,
        }
    }
}

/// A channel precision request for the compositor.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Precision {
    /// Premultiplied 8-bit channel math. Fast, slightly lossy.
    Integer,
    /// Premultiplied linear `f32` channel math.
    Float,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Integer
    }
}

impl Precision {
    fn resolve(self, operator: Operator) -> Precision {
        if operator.requires_float() {
            Precision::Float
        } else {
            self
        }
    }
}

/// One entry of a compositor operation list.
///
/// An omitted `src` is the running result of the previous step (the
/// surface pixel for the first step); an omitted `dst` is the surface
/// pixel. The supersampling path relies on this for its mask idiom:
/// `[DstIn(dst = source pattern, src = mask), final operator]`.
#[derive(Copy, Clone, Debug)]
pub struct CompositeStep<'a> {
    /// The operator applied by this step.
    pub operator: Operator,
    /// The source operand; defaults to the previous step's result.
    pub src: Option<&'a Pattern<'a>>,
    /// The destination operand; defaults to the surface pixel.
    pub dst: Option<&'a Pattern<'a>>,
}

impl<'a> CompositeStep<'a> {
    /// A step compositing `src` onto the surface with `operator`.
    pub fn with_source(operator: Operator, src: &'a Pattern<'a>) -> Self {
        CompositeStep {
            operator,
            src: Some(src),
            dst: None,
        }
    }
}

/// Applies an operation list across a horizontal run of the surface.
///
/// The run is clipped by the surface like every other write path; the
/// precision upgrades to float when any step's operator demands it.
pub fn composite_row(
    surface: &mut Surface,
    x: i32,
    y: i32,
    len: u32,
    steps: &[CompositeStep],
    precision: Precision,
) {
    let (x, len) = match surface.clip_run(x, y, len) {
        Some(v) => v,
        None => return,
    };

    let precision = steps
        .iter()
        .fold(precision, |p, step| p.resolve(step.operator));

    for i in 0..len {
        let sx = x + i as i32;
        let cur = match surface.pixel(sx, y) {
            Some(px) => px,
            None => continue,
        };

        let cur_rgba = cur.to_rgba();
        let mut acc = cur_rgba;
        for step in steps {
            let src = match step.src {
                Some(pattern) => pattern.pixel_at(sx, y).to_rgba(),
                None => acc,
            };
            let dst = match step.dst {
                Some(pattern) => pattern.pixel_at(sx, y).to_rgba(),
                None => cur_rgba,
            };

            acc = blend(step.operator, precision, src, dst);
        }

        surface.put_pixel(sx, y, Pixel::Rgba(acc));
    }
}

/// Blends one source pixel into one destination pixel.
///
/// Converts through premultiplied RGBA, picks the pipeline from the
/// resolved precision and converts back to the destination's format.
pub(crate) fn composite_pixel(
    operator: Operator,
    precision: Precision,
    src: PremultipliedRgba8,
    dst: Pixel,
) -> Pixel {
    let out = blend(operator, precision, src, dst.to_rgba());
    Pixel::Rgba(out).to_format(dst.format())
}

/// Scales a premultiplied pixel by an 8-bit opacity.
pub(crate) fn apply_opacity(px: PremultipliedRgba8, opacity: u8) -> PremultipliedRgba8 {
    if opacity == ALPHA_U8_OPAQUE {
        return px;
    }

    PremultipliedRgba8::from_rgba_unchecked(
        premultiply_u8(px.red(), opacity),
        premultiply_u8(px.green(), opacity),
        premultiply_u8(px.blue(), opacity),
        premultiply_u8(px.alpha(), opacity),
    )
}

fn blend(
    operator: Operator,
    precision: Precision,
    src: PremultipliedRgba8,
    dst: PremultipliedRgba8,
) -> PremultipliedRgba8 {
    match precision.resolve(operator) {
        Precision::Integer => blend_int(operator, src, dst),
        Precision::Float => blend_float(operator, src, dst),
    }
}

// Porter-Duff in coefficient form: out = src * fa + dst * fb.
// `None` stands for the operand alpha complement pairings below.
fn porter_duff_factors(operator: Operator, sa: u8, da: u8) -> (u8, u8) {
    let inv = |a: u8| 255 - a;
    match operator {
        Operator::Clear => (0, 0),
        Operator::Source => (255, 0),
        Operator::Destination => (0, 255),
        Operator::SourceOver => (255, inv(sa)),
        Operator::DestinationOver => (inv(da), 255),
        Operator::SourceIn => (da, 0),
        Operator::DestinationIn => (0, sa),
        Operator::SourceOut => (inv(da), 0),
        Operator::DestinationOut => (0, inv(sa)),
        Operator::SourceAtop => (da, inv(sa)),
        Operator::DestinationAtop => (inv(da), sa),
        Operator::Xor => (inv(da), inv(sa)),
        Operator::Plus => (255, 255),
        _ => unreachable!("operator requires the float pipeline"),
    }
}

fn blend_int(
    operator: Operator,
    src: PremultipliedRgba8,
    dst: PremultipliedRgba8,
) -> PremultipliedRgba8 {
    debug_assert!(!operator.requires_float());

    let (fa, fb) = porter_duff_factors(operator, src.alpha(), dst.alpha());

    let ch = |s: u8, d: u8| -> u8 {
        let v = u16::from(premultiply_u8(s, fa)) + u16::from(premultiply_u8(d, fb));
        v.min(255) as u8
    };

    PremultipliedRgba8::from_rgba_unchecked(
        ch(src.red(), dst.red()),
        ch(src.green(), dst.green()),
        ch(src.blue(), dst.blue()),
        ch(src.alpha(), dst.alpha()),
    )
}

fn blend_float(
    operator: Operator,
    src: PremultipliedRgba8,
    dst: PremultipliedRgba8,
) -> PremultipliedRgba8 {
    let s = unpack(src);
    let d = unpack(dst);
    pack(blend_float_raw(operator, s, d))
}

// Premultiplied [r, g, b, a] in 0..=1.
type Frgba = [f32; 4];

#[inline]
fn unpack(px: PremultipliedRgba8) -> Frgba {
    [
        f32::from(px.red()) / 255.0,
        f32::from(px.green()) / 255.0,
        f32::from(px.blue()) / 255.0,
        f32::from(px.alpha()) / 255.0,
    ]
}

#[inline]
fn pack(c: Frgba) -> PremultipliedRgba8 {
    let a = clamp01(c[3]);
    let ch = |v: f32| ((clamp01(v).min(a)) * 255.0 + 0.5) as u8;
    PremultipliedRgba8::from_rgba_unchecked(ch(c[0]), ch(c[1]), ch(c[2]), (a * 255.0 + 0.5) as u8)
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.max(0.0).min(1.0)
}

#[inline]
fn inv(a: f32) -> f32 {
    1.0 - a
}

fn blend_float_raw(operator: Operator, s: Frgba, d: Frgba) -> Frgba {
    let (sa, da) = (s[3], d[3]);

    // The plain Porter-Duff set in coefficient form.
    let coeff = |fa: f32, fb: f32| -> Frgba {
        [
            s[0] * fa + d[0] * fb,
            s[1] * fa + d[1] * fb,
            s[2] * fa + d[2] * fb,
            sa * fa + da * fb,
        ]
    };

    // A separable mode: the closure blends one color channel, alpha
    // composites as source-over.
    let separable = |f: &dyn Fn(f32, f32) -> f32| -> Frgba {
        [
            f(s[0], d[0]),
            f(s[1], d[1]),
            f(s[2], d[2]),
            sa + da * inv(sa),
        ]
    };

    match operator {
        Operator::Clear => [0.0; 4],
        Operator::Source => s,
        Operator::Destination => d,
        Operator::SourceOver => coeff(1.0, inv(sa)),
        Operator::DestinationOver => coeff(inv(da), 1.0),
        Operator::SourceIn => coeff(da, 0.0),
        Operator::DestinationIn => coeff(0.0, sa),
        Operator::SourceOut => coeff(inv(da), 0.0),
        Operator::DestinationOut => coeff(0.0, inv(sa)),
        Operator::SourceAtop => coeff(da, inv(sa)),
        Operator::DestinationAtop => coeff(inv(da), sa),
        Operator::Xor => coeff(inv(da), inv(sa)),
        Operator::Plus | Operator::PlusLighter => [
            clamp01(s[0] + d[0]),
            clamp01(s[1] + d[1]),
            clamp01(s[2] + d[2]),
            clamp01(sa + da),
        ],
        Operator::Multiply => separable(&|s, d| s * inv(da) + d * inv(sa) + s * d),
        Operator::Screen => separable(&|s, d| s + d - s * d),
        Operator::Overlay => separable(&|s, d| {
            s * inv(da)
                + d * inv(sa)
                + if 2.0 * d <= da {
                    2.0 * s * d
                } else {
                    sa * da - 2.0 * (da - d) * (sa - s)
                }
        }),
        Operator::Darken => separable(&|s, d| s + d - (s * da).max(d * sa)),
        Operator::Lighten => separable(&|s, d| s + d - (s * da).min(d * sa)),
        Operator::ColorDodge => separable(&|s, d| {
            if d == 0.0 {
                s * inv(da)
            } else if s == sa {
                s + d * inv(sa)
            } else {
                sa * da.min((d * sa) / (sa - s)) + s * inv(da) + d * inv(sa)
            }
        }),
        Operator::ColorBurn => separable(&|s, d| {
            if d == da {
                d + s * inv(da)
            } else if s == 0.0 {
                d * inv(sa)
            } else {
                sa * (da - da.min((da - d) * sa / s)) + s * inv(da) + d * inv(sa)
            }
        }),
        Operator::HardLight => separable(&|s, d| {
            s * inv(da)
                + d * inv(sa)
                + if 2.0 * s <= sa {
                    2.0 * s * d
                } else {
                    sa * da - 2.0 * (da - d) * (sa - s)
                }
        }),
        Operator::SoftLight => separable(&|s, d| {
            let m = if da > 0.0 { d / da } else { 0.0 };
            let s2 = 2.0 * s;
            let m4 = 4.0 * m;

            // The logic forks three ways:
            //    1. dark src?
            //    2. light src, dark dst?
            //    3. light src, light dst?
            let dark_src = d * (sa + (s2 - sa) * (1.0 - m));
            let dark_dst = (m4 * m4 + m4) * (m - 1.0) + 7.0 * m;
            let lite_dst = m.sqrt() - m;
            let lite_src =
                d * sa + da * (s2 - sa) * if 4.0 * d <= da { dark_dst } else { lite_dst };

            s * inv(da) + d * inv(sa) + if s2 <= sa { dark_src } else { lite_src }
        }),
        Operator::Difference => separable(&|s, d| s + d - 2.0 * (s * da).min(d * sa)),
        Operator::Exclusion => separable(&|s, d| s + d - 2.0 * s * d),
        Operator::Hue => {
            let mut c = [s[0] * sa, s[1] * sa, s[2] * sa];
            set_sat(&mut c, sat(d[0], d[1], d[2]) * sa);
            set_lum(&mut c, lum(d[0], d[1], d[2]) * sa);
            clip_color(&mut c, sa * da);
            non_separable(s, d, c)
        }
        Operator::Saturation => {
            let mut c = [d[0] * sa, d[1] * sa, d[2] * sa];
            set_sat(&mut c, sat(s[0], s[1], s[2]) * da);
            set_lum(&mut c, lum(d[0], d[1], d[2]) * sa);
            clip_color(&mut c, sa * da);
            non_separable(s, d, c)
        }
        Operator::Color => {
            let mut c = [s[0] * da, s[1] * da, s[2] * da];
            set_lum(&mut c, lum(d[0], d[1], d[2]) * sa);
            clip_color(&mut c, sa * da);
            non_separable(s, d, c)
        }
        Operator::Luminosity => {
            let mut c = [d[0] * sa, d[1] * sa, d[2] * sa];
            set_lum(&mut c, lum(s[0], s[1], s[2]) * da);
            clip_color(&mut c, sa * da);
            non_separable(s, d, c)
        }
    }
}

// Non-separable epilogue, shared by the four HSL modes.
// Per https://www.w3.org/TR/compositing-1/#blendingnonseparable, adjusted
// for premultiplied inputs.
fn non_separable(s: Frgba, d: Frgba, c: [f32; 3]) -> Frgba {
    let (sa, da) = (s[3], d[3]);
    [
        s[0] * inv(da) + d[0] * inv(sa) + c[0],
        s[1] * inv(da) + d[1] * inv(sa) + c[1],
        s[2] * inv(da) + d[2] * inv(sa) + c[2],
        sa + da - sa * da,
    ]
}

#[inline]
fn sat(r: f32, g: f32, b: f32) -> f32 {
    r.max(g.max(b)) - r.min(g.min(b))
}

#[inline]
fn lum(r: f32, g: f32, b: f32) -> f32 {
    r * 0.30 + g * 0.59 + b * 0.11
}

fn set_sat(c: &mut [f32; 3], s: f32) {
    let mn = c[0].min(c[1].min(c[2]));
    let mx = c[0].max(c[1].max(c[2]));
    let sat = mx - mn;

    // Map min channel to 0, max channel to s, scale the middle proportionally.
    for v in c.iter_mut() {
        *v = if sat == 0.0 { 0.0 } else { (*v - mn) * s / sat };
    }
}

fn set_lum(c: &mut [f32; 3], l: f32) {
    let diff = l - lum(c[0], c[1], c[2]);
    for v in c.iter_mut() {
        *v += diff;
    }
}

fn clip_color(c: &mut [f32; 3], a: f32) {
    let mn = c[0].min(c[1].min(c[2]));
    let mx = c[0].max(c[1].max(c[2]));
    let l = lum(c[0], c[1], c[2]);

    for v in c.iter_mut() {
        let mut val = *v;
        if mn < 0.0 && l != mn {
            val = l + (val - l) * l / (l - mn);
        }
        if mx > a && mx != l {
            val = l + (val - l) * (a - l) / (mx - l);
        }
        *v = val.max(0.0);
    }
}
