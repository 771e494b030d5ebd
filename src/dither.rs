// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Ordered-dither threshold tables.
//!
//! A dithering pattern perturbs its wrapped source per pixel before the
//! value is quantized down to the destination's bit depth, trading banding
//! for noise.

/// The dithering noise source.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DitherKind {
    /// No perturbation; the wrapper is a pass-through.
    None,
    /// The classic 8x8 Bayer matrix.
    Bayer8x8,
    /// A precomputed 16x16 void-and-cluster blue-noise table.
    BlueNoise16x16,
}

impl Default for DitherKind {
    fn default() -> Self {
        DitherKind::None
    }
}

#[rustfmt::skip]
const BAYER_8X8: [u8; 64] = [
     0, 32,  8, 40,  2, 34, 10, 42,
    48, 16, 56, 24, 50, 18, 58, 26,
    12, 44,  4, 36, 14, 46,  6, 38,
    60, 28, 52, 20, 62, 30, 54, 22,
     3, 35, 11, 43,  1, 33,  9, 41,
    51, 19, 59, 27, 49, 17, 57, 25,
    15, 47,  7, 39, 13, 45,  5, 37,
    63, 31, 55, 23, 61, 29, 53, 21,
];

// Generated offline with the void-and-cluster method on a 16x16 torus;
// every value 0..=255 appears exactly once.
#[rustfmt::skip]
const BLUE_NOISE_16X16: [u8; 256] = [
    192, 251, 134,  80, 216, 101,  68, 225,  93,  11, 154,  46,  24,  74,  99,   1,
     88, 147,  17,  43, 175, 238,  23, 167, 247, 125,  65, 201, 249, 132, 163, 180,
     49, 200, 106, 208,  60, 129, 194,  42, 143,  28, 217, 172,  85,  14, 212, 112,
    243,  69, 232, 150,   5,  91, 159, 111,  81, 187,  98, 117,  37, 230, 140,  30,
    127,  10, 169, 118, 227,  32, 254, 204,  56, 241,   4, 161, 195,  72,  57, 186,
    158,  94,  38, 188,  76, 139, 177,  12,  70, 135, 226,  51, 148, 252, 104, 219,
     83, 237,  59, 206, 100,  48, 223, 122, 210, 170,  25,  92, 124,   8, 173,  22,
    145, 193, 133,  15, 244, 153,  21,  84, 103,  40, 183, 233, 199,  79, 207,  45,
    119, 215,  31, 174, 114,  64, 197, 164, 250, 144, 113,  66, 156,  34, 110, 246,
      2,  73, 160,  90, 221, 137,  36, 229,   0,  55, 214,  13, 240, 130, 166,  61,
    179, 102, 253,  50,   7, 182,  75,  97, 190, 131,  82, 176,  95,  20, 189, 231,
    205,  39, 126, 228, 149, 209, 123, 242,  26, 152, 202,  44, 220, 142,  52,  87,
     18, 138, 191,  67, 108,  19,  47, 162,  62, 105, 255, 120,  71, 245, 107, 151,
     77, 239,   9, 168, 203,  86, 234, 178, 218,  16,  35, 165,   6, 196,  29, 213,
    116, 157,  96,  54, 248,  33, 141, 115,  78, 136, 211,  89, 181,  58, 128, 171,
     63, 222,  27, 185, 121, 155,   3, 198,  53, 184, 235, 109, 146, 224, 236,  41,
];

impl DitherKind {
    /// Returns the threshold at `(x, y)` as a signed perturbation in
    /// -0.5..0.5, tiling the table across the plane.
    pub(crate) fn threshold(self, x: i32, y: i32) -> f32 {
        match self {
            DitherKind::None => 0.0,
            DitherKind::Bayer8x8 => {
                let i = (y.rem_euclid(8) * 8 + x.rem_euclid(8)) as usize;
                (f32::from(BAYER_8X8[i]) + 0.5) / 64.0 - 0.5
            }
            DitherKind::BlueNoise16x16 => {
                let i = (y.rem_euclid(16) * 16 + x.rem_euclid(16)) as usize;
                (f32::from(BLUE_NOISE_16X16[i]) + 0.5) / 256.0 - 0.5
            }
        }
    }
}
