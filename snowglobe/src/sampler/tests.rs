use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::*;

fn gradient(width: usize, height: usize) -> EquirectImage {
    EquirectImage::new(Raster::from_fn(width, height, |x, y| {
        Rgb::new((x % 256) as u8, (y % 256) as u8, 7)
    }))
}

// ============================================================================
// polar_to_pixel
// ============================================================================

#[test]
fn test_longitude_anchors() {
    let image = gradient(720, 360);
    assert_eq!(polar_to_pixel(0.0, PI, &image).0, 0);
    assert_eq!(polar_to_pixel(0.0, 0.0, &image).0, 360);
    assert_eq!(polar_to_pixel(0.0, FRAC_PI_2, &image).0, 180);
    assert_eq!(polar_to_pixel(0.0, -FRAC_PI_2, &image).0, 540);
}

#[test]
fn test_longitude_just_east_of_seam_clamps_to_last_column() {
    let image = gradient(720, 360);
    // -π normalizes to π, the first column.
    assert_eq!(polar_to_pixel(0.0, -PI, &image).0, 0);
    // Rounds up to the image width and stays on the last column.
    assert_eq!(polar_to_pixel(0.0, -PI + 1e-6, &image).0, 719);
    assert_eq!(polar_to_pixel(0.0, -PI + 1e-6, &gradient(7, 3)).0, 6);
}

#[test]
fn test_latitude_anchors_and_clamp() {
    let image = gradient(720, 360);
    assert_eq!(polar_to_pixel(0.0, 0.0, &image).1, 0);
    assert_eq!(polar_to_pixel(FRAC_PI_4, 0.0, &image).1, 180);
    assert_eq!(polar_to_pixel(FRAC_PI_2, 0.0, &image).1, 359);
}

#[test]
fn test_pixel_always_lies_in_image() {
    let image = gradient(7, 3);
    for i in 0..=40 {
        for j in 0..=40 {
            let theta = FRAC_PI_2 * i as f64 / 40.0;
            let phi = -PI + 2.0 * PI * j as f64 / 40.0;
            let (x, y) = polar_to_pixel(theta, phi, &image);
            assert!(x < 7 && y < 3, "({}, {}) -> ({}, {})", theta, phi, x, y);
        }
    }
}

#[test]
fn test_point_sample_reads_mapped_pixel() {
    let image = gradient(720, 360);
    assert_eq!(color_at_coordinate(FRAC_PI_4, 0.0, &image), Rgb::new(104, 180, 7));
}

// ============================================================================
// Box filter
// ============================================================================

#[test]
fn test_bounding_rect_is_inclusive() {
    let rect = PixelRect::bounding(&[(5, 9), (3, 9), (3, 9), (4, 12)]);
    assert_eq!(
        rect,
        PixelRect {
            x: 3,
            y: 9,
            width: 3,
            height: 4
        }
    );
    assert_eq!(PixelRect::bounding(&[(2, 2)]).width, 1);
}

#[test]
fn test_degenerate_when_wider_than_half_the_image() {
    let image = gradient(720, 360);
    let seam = PixelRect::bounding(&[(0, 0), (719, 1)]);
    let local = PixelRect::bounding(&[(10, 10), (369, 189)]);
    assert!(seam.is_degenerate(&image));
    assert!(!local.is_degenerate(&image));
    assert!(PixelRect::bounding(&[(0, 0), (0, 181)]).is_degenerate(&image));
}

#[test]
fn test_average_of_uniform_region_is_exact() {
    let image = EquirectImage::new(Raster::new_filled(8, 8, Rgb::new(10, 20, 30)));
    let rect = PixelRect {
        x: 2,
        y: 1,
        width: 3,
        height: 4,
    };
    assert_eq!(average_color_over_region(rect, &image), Rgb::new(10, 20, 30));
}

#[test]
fn test_average_truncates() {
    let image = EquirectImage::new(Raster::new(
        3,
        1,
        vec![Rgb::new(0, 0, 0), Rgb::new(1, 255, 0), Rgb::new(1, 255, 1)],
    ));
    let rect = PixelRect {
        x: 0,
        y: 0,
        width: 3,
        height: 1,
    };
    // 2/3 and 1/3 truncate to 0, 510/3 is exact.
    assert_eq!(average_color_over_region(rect, &image), Rgb::new(0, 170, 0));
}

#[test]
fn test_average_clips_to_image() {
    let image = EquirectImage::new(Raster::from_fn(4, 2, |x, _| {
        if x < 2 {
            Rgb::BLACK
        } else {
            Rgb::gray(200)
        }
    }));
    let rect = PixelRect {
        x: 2,
        y: 1,
        width: 50,
        height: 50,
    };
    assert_eq!(average_color_over_region(rect, &image), Rgb::gray(200));

    let outside = PixelRect {
        x: 9,
        y: 0,
        width: 2,
        height: 2,
    };
    assert_eq!(average_color_over_region(outside, &image), Rgb::BLACK);
}

#[test]
#[should_panic(expected = "must not be empty")]
fn test_empty_image_is_rejected() {
    EquirectImage::new(Raster::new(0, 0, Vec::new()));
}
