//! Calibration test pattern.
//!
//! Concentric latitude discs drawn through the forward projection, crossed
//! by eight longitude spokes. Projected onto a correctly calibrated globe the
//! disc edges become evenly spaced parallels and the spokes meridians.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::Vec2;
use tracing::debug;

use crate::calibration::CalibrationModel;
use crate::drawing::{draw_disc, draw_line};
use crate::projection::radius_for_theta;
use crate::raster::{Raster, Rgb};

pub const SPOKE_COLOR: Rgb = Rgb::new(128, 255, 128);
pub const SPOKE_WIDTH: f32 = 5.0;

/// Disc latitudes and fill colors, outermost first.
pub const LATITUDE_BANDS: [(f64, Rgb); 4] = [
    (PI, Rgb::new(255, 0, 64)),
    (3.0 * FRAC_PI_4, Rgb::new(192, 0, 128)),
    (FRAC_PI_2, Rgb::new(128, 0, 192)),
    (FRAC_PI_4, Rgb::new(64, 0, 255)),
];

/// Whole-pixel radius of the disc drawn for latitude `theta`.
pub fn band_radius(theta: f64, model: &CalibrationModel) -> u32 {
    radius_for_theta(theta, model) as u32
}

/// Endpoints of the spokes: frame corners and edge midpoints.
fn spoke_ends(r: f32) -> [Vec2; 8] {
    let d = 2.0 * r;
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(r, 0.0),
        Vec2::new(d, 0.0),
        Vec2::new(d, r),
        Vec2::new(d, d),
        Vec2::new(r, d),
        Vec2::new(0.0, d),
        Vec2::new(0.0, r),
    ]
}

/// Draws the pattern on a black `2r × 2r` frame.
pub fn calibration_pattern(model: &CalibrationModel) -> Raster {
    let side = model.diameter();
    let r = model.radius as f32;
    let center = Vec2::splat(r);
    let mut raster = Raster::new_filled(side, side, Rgb::BLACK);

    for (theta, color) in LATITUDE_BANDS {
        draw_disc(&mut raster, center, band_radius(theta, model) as f32, color);
    }
    for end in spoke_ends(r) {
        draw_line(&mut raster, center, end, SPOKE_COLOR, SPOKE_WIDTH);
    }

    debug!(
        radius = model.radius,
        offset = model.offset,
        "drew calibration pattern"
    );
    raster
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;

    fn model() -> CalibrationModel {
        CalibrationModel::new(100, 95.0, IVec2::new(100, 100))
    }

    #[test]
    fn test_pattern_size_and_black_corners_between_spokes() {
        let raster = calibration_pattern(&model());
        assert_eq!((raster.width(), raster.height()), (200, 200));
        // Off-spoke point near a frame corner, outside every disc.
        assert_eq!(raster[(199, 150)], Rgb::BLACK);
    }

    #[test]
    fn test_center_is_spoke_color() {
        let raster = calibration_pattern(&model());
        assert_eq!(raster[(100, 100)], SPOKE_COLOR);
    }

    #[test]
    fn test_bands_are_nested_in_order() {
        let m = model();
        let radii: Vec<u32> = LATITUDE_BANDS
            .iter()
            .map(|&(theta, _)| band_radius(theta, &m))
            .collect();
        assert!(radii.windows(2).all(|w| w[0] > w[1]), "{:?}", radii);

        let raster = calibration_pattern(&m);
        // Sample just inside each band edge, between the horizontal and the
        // diagonal spoke.
        let angle = 22.5f32.to_radians();
        for (i, &(_, color)) in LATITUDE_BANDS.iter().enumerate() {
            let inner = radii.get(i + 1).copied().unwrap_or(0) as f32;
            let mid = (radii[i] as f32 + inner) / 2.0;
            let x = (100.0 + mid * angle.cos()).round() as usize;
            let y = (100.0 + mid * angle.sin()).round() as usize;
            assert_eq!(raster[(x, y)], color, "band {} at ({}, {})", i, x, y);
        }
    }

    #[test]
    fn test_spokes_reach_frame_edges() {
        let raster = calibration_pattern(&model());
        assert_eq!(raster[(0, 0)], SPOKE_COLOR);
        assert_eq!(raster[(100, 0)], SPOKE_COLOR);
        assert_eq!(raster[(199, 100)], SPOKE_COLOR);
        assert_eq!(raster[(100, 199)], SPOKE_COLOR);
        assert_eq!(raster[(0, 100)], SPOKE_COLOR);
    }
}
