//! Lookup of colors in an equirectangular source image.
//!
//! Column `0` is longitude `π` and columns advance westward, wrapping after
//! `2π`. Row `0` is the apex and the last row is the equator.

#[cfg(test)]
mod tests;

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::Path;

use crate::error::Result;
use crate::projection::normalize_longitude;
use crate::raster::{read_raster, Raster, Rgb};

/// Immutable source image; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EquirectImage {
    pixels: Raster,
}

/// Integer rectangle in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl EquirectImage {
    /// # Panics
    ///
    /// Panics if the raster has no pixels.
    pub fn new(pixels: Raster) -> Self {
        assert!(
            pixels.width() > 0 && pixels.height() > 0,
            "equirectangular image must not be empty"
        );
        Self { pixels }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(read_raster(path)?))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[(x, y)]
    }

    pub fn raster(&self) -> &Raster {
        &self.pixels
    }
}

impl From<Raster> for EquirectImage {
    fn from(pixels: Raster) -> Self {
        Self::new(pixels)
    }
}

impl PixelRect {
    /// Smallest rectangle holding every pixel in `corners`.
    pub fn bounding(corners: &[(usize, usize)]) -> Self {
        debug_assert!(!corners.is_empty());
        let (mut x0, mut y0) = (usize::MAX, usize::MAX);
        let (mut x1, mut y1) = (0, 0);
        for &(x, y) in corners {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Self {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        }
    }

    /// True when the rectangle spans more than half the image in either
    /// direction, as happens when corners straddle the longitude seam or
    /// converge on the apex.
    pub fn is_degenerate(&self, image: &EquirectImage) -> bool {
        self.width > image.width() / 2 || self.height > image.height() / 2
    }
}

/// Source pixel showing the surface point `(theta, phi)`.
///
/// Both coordinates are clamped into the image, so a longitude that rounds
/// past the last column stays on it.
pub fn polar_to_pixel(theta: f64, phi: f64, image: &EquirectImage) -> (usize, usize) {
    debug_assert!(theta.is_finite() && phi.is_finite());
    let (width, height) = (image.width(), image.height());
    let phi = normalize_longitude(phi);

    let fx = ((TAU - (phi + PI)) / TAU) * width as f64;
    let fy = (theta / FRAC_PI_2) * height as f64;

    let x = (fx.round().max(0.0) as usize).min(width - 1);
    let y = (fy.round().max(0.0) as usize).min(height - 1);
    (x, y)
}

/// Point sample at `(theta, phi)`.
#[inline]
pub fn color_at_coordinate(theta: f64, phi: f64, image: &EquirectImage) -> Rgb {
    let (x, y) = polar_to_pixel(theta, phi, image);
    image.pixel(x, y)
}

/// Box filter: per-channel mean over `rect` clipped to the image, truncated
/// to whole levels. A rectangle entirely outside the image yields black.
pub fn average_color_over_region(rect: PixelRect, image: &EquirectImage) -> Rgb {
    let x_end = rect.x.saturating_add(rect.width).min(image.width());
    let y_end = rect.y.saturating_add(rect.height).min(image.height());
    if rect.x >= x_end || rect.y >= y_end {
        return Rgb::BLACK;
    }

    let mut sum = [0u64; 3];
    for y in rect.y..y_end {
        for pixel in &image.raster().row(y)[rect.x..x_end] {
            sum[0] += pixel.r as u64;
            sum[1] += pixel.g as u64;
            sum[2] += pixel.b as u64;
        }
    }

    let count = ((x_end - rect.x) * (y_end - rect.y)) as u64;
    let mean = |s: u64| (s / count) as u8;
    Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]))
}
