// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use vellum_path::Scalar;

/// Fully transparent alpha value.
pub const ALPHA_TRANSPARENT: f32 = 0.0;

/// Fully opaque alpha value.
pub const ALPHA_OPAQUE: f32 = 1.0;

/// A logical color in one of the supported color spaces.
///
/// Channels are `f32` in 0..=1 (hue in 0..360 degrees). The provided
/// constructors clamp; conversions clamp again on the way out, so junk
/// values never escape into pixel data.
///
/// All conversions go through unpremultiplied linear RGBA. Transfer curves
/// run only at the boundaries: sRGB variants decode on the way in and the
/// sRGB encoder is applied when explicitly requested.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Color {
    /// Linear RGB, implicitly opaque.
    Rgb(f32, f32, f32),
    /// Linear RGBA, unpremultiplied.
    Rgba(f32, f32, f32, f32),
    /// sRGB-encoded RGB, implicitly opaque.
    Srgb(f32, f32, f32),
    /// sRGB-encoded RGBA, unpremultiplied.
    Srgba(f32, f32, f32, f32),
    /// Hue (degrees), saturation, lightness; implicitly opaque.
    Hsl(f32, f32, f32),
    /// Hue (degrees), saturation, lightness, alpha.
    Hsla(f32, f32, f32, f32),
}

/// An unpremultiplied linear RGBA quadruple, the hub of all conversions.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct LinearRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A premultiplied linear RGBA quadruple.
///
/// # Guarantees
///
/// - All components are in 0..=1.
/// - RGB components are <= alpha.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct PremultipliedLinearRgba {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Color {
    /// A transparent color.
    pub const TRANSPARENT: Color = Color::Rgba(0.0, 0.0, 0.0, 0.0);
    /// A black color.
    pub const BLACK: Color = Color::Rgb(0.0, 0.0, 0.0);
    /// A white color.
    pub const WHITE: Color = Color::Rgb(1.0, 1.0, 1.0);

    /// Creates a linear RGB color. Values are clamped to 0..=1.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Color::Rgb(clamp01(r), clamp01(g), clamp01(b))
    }

    /// Creates a linear RGBA color. Values are clamped to 0..=1.
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color::Rgba(clamp01(r), clamp01(g), clamp01(b), clamp01(a))
    }

    /// Creates a linear RGBA color from 8-bit components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::Rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Creates an sRGB-encoded color. Values are clamped to 0..=1.
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Color::Srgb(clamp01(r), clamp01(g), clamp01(b))
    }

    /// Creates an sRGB-encoded color with alpha. Values are clamped to 0..=1.
    pub fn from_srgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color::Srgba(clamp01(r), clamp01(g), clamp01(b), clamp01(a))
    }

    /// Creates an HSL color. Hue wraps into 0..360, the rest clamps.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        Color::Hsl(wrap_hue(h), clamp01(s), clamp01(l))
    }

    /// Creates an HSL color with alpha. Hue wraps into 0..360, the rest clamps.
    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla(wrap_hue(h), clamp01(s), clamp01(l), clamp01(a))
    }

    /// Returns the alpha component.
    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgb(..) | Color::Srgb(..) | Color::Hsl(..) => ALPHA_OPAQUE,
            Color::Rgba(_, _, _, a) | Color::Srgba(_, _, _, a) | Color::Hsla(_, _, _, a) => a,
        }
    }

    /// Checks that the color is opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha() == ALPHA_OPAQUE
    }

    /// Converts into unpremultiplied linear RGBA.
    pub fn to_linear(&self) -> LinearRgba {
        match *self {
            Color::Rgb(r, g, b) => LinearRgba::new(r, g, b, 1.0),
            Color::Rgba(r, g, b, a) => LinearRgba::new(r, g, b, a),
            Color::Srgb(r, g, b) => {
                LinearRgba::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0)
            }
            Color::Srgba(r, g, b, a) => {
                LinearRgba::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a)
            }
            Color::Hsl(h, s, l) => {
                let (r, g, b) = hsl_to_rgb(h, s, l);
                LinearRgba::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0)
            }
            Color::Hsla(h, s, l, a) => {
                let (r, g, b) = hsl_to_rgb(h, s, l);
                LinearRgba::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a)
            }
        }
    }

    /// Converts into a premultiplied linear color.
    pub fn premultiply(&self) -> PremultipliedLinearRgba {
        self.to_linear().premultiply()
    }
}

impl LinearRgba {
    /// Creates a new value, clamping every component to 0..=1.
    ///
    /// NaN clamps to 1.0, which keeps downstream math finite.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        LinearRgba {
            r: clamp01(r),
            g: clamp01(g),
            b: clamp01(b),
            a: clamp01(a),
        }
    }

    /// Converts into a premultiplied color.
    pub fn premultiply(&self) -> PremultipliedLinearRgba {
        PremultipliedLinearRgba {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    /// Converts into an sRGB-encoded quadruple (alpha untouched).
    pub fn to_srgb(&self) -> [f32; 4] {
        [
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
            self.a,
        ]
    }

    /// Converts into HSL over the sRGB encoding (hue in degrees).
    pub fn to_hsla(&self) -> [f32; 4] {
        let [r, g, b, a] = self.to_srgb();
        let (h, s, l) = rgb_to_hsl(r, g, b);
        [h, s, l, a]
    }
}

impl PremultipliedLinearRgba {
    /// A transparent color.
    pub const TRANSPARENT: Self = PremultipliedLinearRgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Returns the red component. The value is <= alpha.
    #[inline]
    pub fn red(&self) -> f32 {
        self.r
    }

    /// Returns the green component. The value is <= alpha.
    #[inline]
    pub fn green(&self) -> f32 {
        self.g
    }

    /// Returns the blue component. The value is <= alpha.
    #[inline]
    pub fn blue(&self) -> f32 {
        self.b
    }

    /// Returns the alpha component.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.a
    }

    /// Returns a demultiplied color.
    pub fn demultiply(&self) -> LinearRgba {
        if self.a == 0.0 {
            LinearRgba::default()
        } else {
            LinearRgba::new(self.r / self.a, self.g / self.a, self.b / self.a, self.a)
        }
    }
}

#[inline]
fn clamp01(n: f32) -> f32 {
    (n as f64).bound(0.0, 1.0) as f32
}

#[inline]
fn wrap_hue(h: f32) -> f32 {
    if h.is_finite() {
        h.rem_euclid(360.0)
    } else {
        0.0
    }
}

/// Decodes one sRGB-encoded channel into linear light.
///
/// The standard piecewise transfer with the 0.04045 knee.
pub(crate) fn srgb_to_linear(c: f32) -> f32 {
    let c = clamp01(c);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encodes one linear channel into sRGB.
pub(crate) fn linear_to_srgb(c: f32) -> f32 {
    let c = clamp01(c);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// The standard hex-cone HSL to RGB conversion.
///
/// Hue is in degrees, the result channels share the encoding of the input
/// lightness/saturation (sRGB in this crate).
pub(crate) fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = wrap_hue(h);
    let s = clamp01(s);
    let l = clamp01(l);

    if s == 0.0 {
        return (l, l, l);
    }

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c * 0.5;
    (r1 + m, g1 + m, b1 + m)
}

/// The inverse hex-cone conversion. Returns hue in degrees.
pub(crate) fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}
