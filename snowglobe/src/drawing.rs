//! Raster drawing primitives for calibration overlays.
//!
//! Coordinates are pixel centers; shapes are clipped at the raster edges.

use glam::Vec2;

use crate::raster::{Raster, Rgb};

/// Inclusive pixel range covering `[lo, hi]`, clipped to `0..len`.
fn clipped_span(lo: f32, hi: f32, len: usize) -> Option<(usize, usize)> {
    let lo = (lo.floor() as i64).max(0);
    let hi = (hi.ceil() as i64).min(len as i64 - 1);
    (lo <= hi).then_some((lo as usize, hi as usize))
}

#[inline]
fn plot(raster: &mut Raster, x: i64, y: i64, color: Rgb) {
    if x >= 0 && y >= 0 {
        if let Some(pixel) = raster.get_mut(x as usize, y as usize) {
            *pixel = color;
        }
    }
}

/// Filled disc of every pixel within `radius` of `center`.
pub fn draw_disc(raster: &mut Raster, center: Vec2, radius: f32, color: Rgb) {
    if radius < 0.0 {
        return;
    }
    let r_sq = radius * radius;

    let Some((x_min, x_max)) = clipped_span(center.x - radius, center.x + radius, raster.width())
    else {
        return;
    };
    let Some((y_min, y_max)) = clipped_span(center.y - radius, center.y + radius, raster.height())
    else {
        return;
    };

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let d = Vec2::new(x as f32, y as f32) - center;
            if d.length_squared() <= r_sq {
                raster[(x, y)] = color;
            }
        }
    }
}

/// Straight line of the given thickness, stepped one pixel at a time.
pub fn draw_line(raster: &mut Raster, start: Vec2, end: Vec2, color: Rgb, thickness: f32) {
    let delta = end - start;
    let length = delta.length();

    if length < 0.001 {
        plot(raster, start.x.round() as i64, start.y.round() as i64, color);
        return;
    }

    let dir = delta / length;
    let normal = dir.perp();
    let half_thick = thickness / 2.0;
    let thick_steps = (thickness.ceil() as i32).max(1);

    let steps = (length.ceil() as usize).max(1);
    for i in 0..=steps {
        let along = start + delta * (i as f32 / steps as f32);

        // Half-pixel steps across the line so diagonal strokes stay solid.
        for j in -thick_steps..=thick_steps {
            let across = j as f32 * 0.5;
            if across.abs() > half_thick {
                continue;
            }
            let p = along + normal * across;
            plot(raster, p.x.round() as i64, p.y.round() as i64, color);
        }
    }
}
