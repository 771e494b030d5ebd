// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Hairline stroking: 1-pixel lines drawn without stroke expansion.

use vellum_path::Point;

use crate::compositor::{Operator, Precision};
use crate::pattern::Pattern;
use crate::polygon::Polygon;
use crate::raster::AntiAlias;
use crate::surface::Surface;

/// Draws every contour of a flattened path as 1-pixel lines.
///
/// Axis-aligned segments become strided paints; diagonals use Bresenham
/// without anti-aliasing and Xiaolin Wu with it. Single-point contours
/// draw one pixel.
pub(crate) fn stroke_polygon(
    surface: &mut Surface,
    flat: &Polygon,
    anti_alias: AntiAlias,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) {
    for contour in flat.contours() {
        let corners = contour.corners();
        if corners.len() == 1 {
            let (x, y) = round_point(corners[0]);
            plot(surface, x, y, 255, pattern, operator, precision);
            continue;
        }

        let segments = if contour.is_closed() {
            corners.len()
        } else {
            corners.len() - 1
        };

        for i in 0..segments {
            let p0 = corners[i];
            let p1 = corners[(i + 1) % corners.len()];
            draw_line(surface, p0, p1, anti_alias, pattern, operator, precision);
        }
    }
}

#[inline]
fn round_point(p: Point) -> (i32, i32) {
    ((p.x + 0.5).floor() as i32, (p.y + 0.5).floor() as i32)
}

#[inline]
fn plot(
    surface: &mut Surface,
    x: i32,
    y: i32,
    opacity: u8,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) {
    if opacity == 0 {
        return;
    }
    super::composite_span(surface, x, y, 1, pattern, operator, precision, opacity);
}

fn draw_line(
    surface: &mut Surface,
    p0: Point,
    p1: Point,
    anti_alias: AntiAlias,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) {
    if !p0.is_finite() || !p1.is_finite() {
        return;
    }

    let (x0, y0) = round_point(p0);
    let (x1, y1) = round_point(p1);
    let dx = x1 - x0;
    let dy = y1 - y0;

    if dy == 0 {
        // Horizontal: one strided paint of |dx| + 1 pixels.
        let x = x0.min(x1);
        super::composite_span(
            surface,
            x,
            y0,
            dx.unsigned_abs() + 1,
            pattern,
            operator,
            precision,
            255,
        );
        return;
    }

    if dx == 0 {
        let y_top = y0.min(y1);
        for i in 0..=dy.unsigned_abs() as i32 {
            plot(surface, x0, y_top + i, 255, pattern, operator, precision);
        }
        return;
    }

    if anti_alias == AntiAlias::None {
        bresenham(surface, x0, y0, x1, y1, pattern, operator, precision);
        return;
    }

    if dx.abs() == dy.abs() {
        // An exact diagonal: the Wu error step would be 65536, which
        // wraps to zero in the u16 accumulator, so both axes simply step
        // together at full opacity.
        let sx = dx.signum();
        let sy = dy.signum();
        for i in 0..=dx.abs() {
            plot(surface, x0 + i * sx, y0 + i * sy, 255, pattern, operator, precision);
        }
        return;
    }

    wu(surface, x0, y0, x1, y1, pattern, operator, precision);
}

fn bresenham(
    surface: &mut Surface,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = (x1 - x0).signum();
    let sy = (y1 - y0).signum();
    let mut err = dx + dy;

    loop {
        plot(surface, x0, y0, 255, pattern, operator, precision);
        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Xiaolin Wu along the major axis.
///
/// The fractional minor-axis position accumulates in a u16; a carry-out
/// steps the minor axis. `err >> 8` is the complement of the primary
/// pixel's opacity and the opacity of the co-plotted neighbor.
fn wu(
    surface: &mut Surface,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    pattern: &Pattern,
    operator: Operator,
    precision: Precision,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    if dx >= dy {
        // Mostly horizontal; walk x.
        let (mut x, mut y, xe, step_y) = if x0 <= x1 {
            (x0, y0, x1, (y1 - y0).signum())
        } else {
            (x1, y1, x0, (y0 - y1).signum())
        };

        let err_step = ((u64::from(dy as u32) << 16) / u64::from(dx as u32)) as u16;
        let mut err: u16 = 0;

        loop {
            let frac = (err >> 8) as u8;
            plot(surface, x, y, !frac, pattern, operator, precision);
            plot(surface, x, y + step_y, frac, pattern, operator, precision);

            if x == xe {
                break;
            }
            x += 1;

            let (next, carry) = err.overflowing_add(err_step);
            err = next;
            if carry {
                y += step_y;
            }
        }
    } else {
        // Mostly vertical; walk y.
        let (mut x, mut y, ye, step_x) = if y0 <= y1 {
            (x0, y0, y1, (x1 - x0).signum())
        } else {
            (x1, y1, y0, (x0 - x1).signum())
        };

        let err_step = ((u64::from(dx as u32) << 16) / u64::from(dy as u32)) as u16;
        let mut err: u16 = 0;

        loop {
            let frac = (err >> 8) as u8;
            plot(surface, x, y, !frac, pattern, operator, precision);
            plot(surface, x + step_x, y, frac, pattern, operator, precision);

            if y == ye {
                break;
            }
            y += 1;

            let (next, carry) = err.overflowing_add(err_step);
            err = next;
            if carry {
                x += step_x;
            }
        }
    }
}
