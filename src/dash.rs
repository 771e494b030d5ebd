// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Dash splitting over flattened contours.

use vellum_path::Point;

use crate::polygon::Contour;

/// A stroke dashing description.
///
/// # Guarantees
///
/// - The array is non-empty and every value is finite and positive.
/// - The stored offset phase is normalized into one on/off cycle.
///
/// Odd-length arrays are logically doubled, so `[2]` means 2 on, 2 off.
#[derive(Clone, PartialEq, Debug)]
pub struct DashPattern {
    array: Vec<f64>,
    phase: f64,
}

impl DashPattern {
    /// Creates a new dash pattern.
    ///
    /// Returns `None` when the array is empty, contains a non-positive or
    /// non-finite value, or the offset is not finite.
    pub fn new(array: Vec<f64>, offset: f64) -> Option<Self> {
        if array.is_empty() || !offset.is_finite() {
            return None;
        }

        if array.iter().any(|n| !(*n > 0.0) || !n.is_finite()) {
            return None;
        }

        let sum: f64 = array.iter().sum();
        // An odd array only repeats after two passes (on/off roles swap).
        let cycle = if array.len() % 2 == 0 { sum } else { sum * 2.0 };
        let phase = offset.rem_euclid(cycle);

        Some(DashPattern { array, phase })
    }

    /// Returns the dash array.
    pub fn array(&self) -> &[f64] {
        &self.array
    }

    /// Returns the pattern with every length (and the phase) scaled.
    ///
    /// Used to carry user-unit dashes into device space alongside the
    /// stroke width.
    pub(crate) fn scaled(&self, factor: f64) -> Option<DashPattern> {
        if factor == 1.0 {
            return Some(self.clone());
        }

        DashPattern::new(
            self.array.iter().map(|v| v * factor).collect(),
            self.phase * factor,
        )
    }

    fn start_state(&self) -> DashState<'_> {
        let mut index = 0;
        let mut phase = self.phase;
        while phase >= self.array[index % self.array.len()] {
            phase -= self.array[index % self.array.len()];
            index += 1;
        }

        DashState {
            array: &self.array,
            index,
            remaining: self.array[index % self.array.len()] - phase,
        }
    }
}

struct DashState<'a> {
    array: &'a [f64],
    index: usize,
    remaining: f64,
}

impl DashState<'_> {
    #[inline]
    fn on(&self) -> bool {
        self.index % 2 == 0
    }

    fn advance(&mut self) {
        self.index += 1;
        self.remaining = self.array[self.index % self.array.len()];
    }
}

/// Splits a flat contour into its "on" runs.
///
/// The offset phase carries across segments, so dash alignment is
/// continuous along the whole contour. Every returned contour is open.
pub(crate) fn dash_contour(contour: &Contour, dash: &DashPattern) -> Vec<Contour> {
    let corners = contour.corners();
    if corners.len() < 2 {
        return vec![contour.clone()];
    }

    let mut out = Vec::new();
    let mut state = dash.start_state();
    let mut current = Contour::new();

    if state.on() {
        current.push(corners[0]);
    }

    let segments = if contour.is_closed() {
        corners.len()
    } else {
        corners.len() - 1
    };

    for i in 0..segments {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        let len = a.distance(b);
        if len == 0.0 {
            continue;
        }
        let dir = Point::from_xy((b.x - a.x) / len, (b.y - a.y) / len);

        let mut pos = 0.0;
        while pos < len {
            let span = len - pos;
            if state.remaining <= span {
                let cut = pos + state.remaining;
                let p = a + dir * cut;
                if state.on() {
                    current.push(p);
                    flush(&mut current, &mut out);
                }
                state.advance();
                if state.on() {
                    current.push(p);
                }
                pos = cut;
            } else {
                if state.on() {
                    current.push(b);
                }
                state.remaining -= span;
                pos = len;
            }
        }
    }

    flush(&mut current, &mut out);
    out
}

fn flush(current: &mut Contour, out: &mut Vec<Contour>) {
    if current.len() >= 2 {
        out.push(std::mem::take(current));
    } else {
        current.clear_corners();
    }
}
