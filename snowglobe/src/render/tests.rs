use std::f64::consts::PI;

use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

const WEST: Rgb = Rgb::new(200, 40, 10);
const EAST: Rgb = Rgb::new(10, 60, 220);

fn globe(radius: u32, offset: f64) -> CalibrationModel {
    CalibrationModel::new(radius, offset, IVec2::new(radius as i32, radius as i32))
}

/// Gray 720×360 image with a white 2×2 block at the apex column.
fn apex_marked() -> EquirectImage {
    let mut raster = Raster::new_filled(720, 360, Rgb::gray(128));
    for y in 0..2 {
        for x in 360..362 {
            raster[(x, y)] = Rgb::WHITE;
        }
    }
    EquirectImage::new(raster)
}

/// Left half `WEST`, right half `EAST`.
fn split() -> EquirectImage {
    EquirectImage::new(Raster::from_fn(720, 360, |x, _| if x < 360 { WEST } else { EAST }))
}

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> EquirectImage {
    EquirectImage::new(Raster::from_fn(width, height, |_, _| {
        Rgb::new(rng.random(), rng.random(), rng.random())
    }))
}

fn strictly_between(value: u8, a: u8, b: u8) -> bool {
    value > a.min(b) && value < a.max(b)
}

#[test]
fn test_frame_is_diameter_square() {
    let model = globe(37, 30.0);
    let raster = render(&model, &apex_marked());
    assert_eq!((raster.width(), raster.height()), (74, 74));
}

#[test]
fn test_outside_disk_is_black() {
    let model = globe(50, 45.0);
    let raster = render(&model, &EquirectImage::new(Raster::new_filled(64, 32, Rgb::WHITE)));

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let d = ((x as f64 - 50.0).powi(2) + (y as f64 - 50.0).powi(2)).sqrt();
            if d > 50.0 {
                assert_eq!(raster[(x, y)], Rgb::BLACK, "({}, {}) at d={}", x, y, d);
            } else {
                assert_eq!(raster[(x, y)], Rgb::WHITE, "({}, {}) at d={}", x, y, d);
            }
        }
    }
}

#[test]
fn test_apex_shows_top_center_of_image() {
    let model = globe(100, 95.0);
    let raster = render(&model, &apex_marked());

    assert_eq!(raster[(100, 100)], Rgb::WHITE);
    assert_eq!(raster[(0, 0)], Rgb::BLACK);
    assert_eq!(raster[(100, 160)], Rgb::gray(128));
    for (x, y) in [(100, 198), (2, 100), (198, 100), (100, 2)] {
        assert_eq!(raster[(x, y)], Rgb::gray(128), "near rim at ({}, {})", x, y);
    }
}

#[test]
fn test_neighboring_columns_are_box_filtered() {
    let model = globe(100, 95.0);
    let image = split();
    let color = FrameRenderer::new(&model, &image).resolve_pixel(100, 150);

    assert!(strictly_between(color.r, WEST.r, EAST.r), "{:?}", color);
    assert!(strictly_between(color.g, WEST.g, EAST.g), "{:?}", color);
    assert!(strictly_between(color.b, WEST.b, EAST.b), "{:?}", color);
}

#[test]
fn test_seam_straddling_corners_fall_back_to_point_sample() {
    let model = globe(100, 95.0);
    let image = split();
    // phi = π maps to column 0; corners land on columns 719 and 1.
    assert_eq!(FrameRenderer::new(&model, &image).resolve_pixel(100, 50), WEST);
}

#[test]
fn test_parallel_render_matches_sequential_evaluation() {
    let mut rng = StdRng::seed_from_u64(7);
    let image = random_image(&mut rng, 96, 48);

    for (radius, offset, rotation, corners) in [
        (23, 20.0, 0.0, CornerPattern::Observed),
        (40, 12.5, 1.3, CornerPattern::Square),
        (17, 17.0, -2.9, CornerPattern::Observed),
    ] {
        let model = globe(radius, offset);
        let renderer =
            FrameRenderer::with_options(&model, &image, RenderOptions { corners, rotation });
        let side = model.diameter();
        let expected = Raster::from_fn(side, side, |x, y| renderer.resolve_pixel(x, y));

        assert_eq!(renderer.render(), expected, "radius {}", radius);
    }
}

#[test]
fn test_rotation_shifts_longitude() {
    let mut raster = Raster::new_filled(720, 360, Rgb::gray(128));
    for y in 0..2 {
        for x in 349..352 {
            raster[(x, y)] = Rgb::WHITE;
        }
    }
    let image = EquirectImage::new(raster);
    let model = globe(100, 95.0);

    let options = RenderOptions {
        rotation: 2.0 * PI * 10.0 / 720.0,
        ..Default::default()
    };
    let rotated = FrameRenderer::with_options(&model, &image, options);
    assert_eq!(rotated.resolve_pixel(100, 100), Rgb::WHITE);
    assert_eq!(FrameRenderer::new(&model, &image).resolve_pixel(100, 100), Rgb::gray(128));
}

#[test]
fn test_full_turn_rotation_is_identity() {
    let mut rng = StdRng::seed_from_u64(11);
    let image = random_image(&mut rng, 64, 32);
    let model = globe(20, 18.0);

    let plain = render(&model, &image);
    let spun = FrameRenderer::with_options(
        &model,
        &image,
        RenderOptions {
            rotation: 2.0 * PI,
            corners: CornerPattern::Observed,
        },
    )
    .render();
    assert_eq!(plain, spun);
}

#[test]
fn test_square_corners_probe_the_bottom_left_corner() {
    // Alternating one-pixel columns so a box average is never a pure color.
    let image = EquirectImage::new(Raster::from_fn(7200, 360, |x, _| {
        if x % 2 == 0 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }));
    let model = globe(100, 95.0);

    // Offset (-71, 70): only the bottom-left corner leaves the disk.
    let (x, y) = (29, 170);
    let observed = FrameRenderer::new(&model, &image).resolve_pixel(x, y);
    let square = FrameRenderer::with_options(
        &model,
        &image,
        RenderOptions {
            corners: CornerPattern::Square,
            ..Default::default()
        },
    )
    .resolve_pixel(x, y);

    assert!(square == Rgb::BLACK || square == Rgb::WHITE, "{:?}", square);
    assert!(observed != Rgb::BLACK && observed != Rgb::WHITE, "{:?}", observed);
}

#[test]
fn test_observed_pattern_repeats_top_right_corner() {
    let offsets = CornerPattern::Observed.offsets();
    assert_eq!(offsets[1], offsets[2]);
    assert!(!offsets.contains(&(-0.5, 0.5)));
    assert!(CornerPattern::Square.offsets().contains(&(-0.5, 0.5)));
    assert_eq!(CornerPattern::default(), CornerPattern::Observed);
}
