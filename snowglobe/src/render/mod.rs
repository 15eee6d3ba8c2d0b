//! Pre-warped frame rendering.
//!
//! Every pixel of the `2r × 2r` frame inside the projectable disk is traced
//! back to the source image through the inverse projection. Four corner
//! samples bound a source rectangle that is box-filtered; when the corners
//! straddle the longitude seam, converge on the apex or fall off the disk,
//! the pixel falls back to a point sample at its own position.

#[cfg(test)]
mod tests;

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use common::parallel::ParRowsMutAuto;

use crate::calibration::CalibrationModel;
use crate::projection::{polar_for_point, DiskFrame, PolarCoordinate};
use crate::raster::{Raster, Rgb};
use crate::sampler::{
    average_color_over_region, color_at_coordinate, polar_to_pixel, EquirectImage, PixelRect,
};

/// Which four sub-pixel corners bound the box filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerPattern {
    /// `(−½,−½)`, `(+½,−½)` twice and `(+½,+½)`. The bottom-left corner is
    /// never sampled, matching frames produced by existing installations.
    #[default]
    Observed,
    /// The four corners of the pixel square.
    Square,
}

impl CornerPattern {
    pub fn offsets(self) -> [(f64, f64); 4] {
        match self {
            CornerPattern::Observed => [(-0.5, -0.5), (0.5, -0.5), (0.5, -0.5), (0.5, 0.5)],
            CornerPattern::Square => [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    pub corners: CornerPattern,
    /// Longitude rotation in radians added to every sample.
    pub rotation: f64,
}

/// Renders frames of one calibration and one source image.
#[derive(Debug, Clone, Copy)]
pub struct FrameRenderer<'a> {
    model: &'a CalibrationModel,
    image: &'a EquirectImage,
    options: RenderOptions,
    frame: DiskFrame,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(model: &'a CalibrationModel, image: &'a EquirectImage) -> Self {
        Self::with_options(model, image, RenderOptions::default())
    }

    pub fn with_options(
        model: &'a CalibrationModel,
        image: &'a EquirectImage,
        options: RenderOptions,
    ) -> Self {
        Self {
            model,
            image,
            options,
            frame: DiskFrame::for_model(model),
        }
    }

    fn polar_at(&self, x: f64, y: f64) -> Option<PolarCoordinate> {
        let point = self.frame.locate(x, y);
        point
            .is_inside(&self.frame)
            .then(|| polar_for_point(point, self.model).rotated(self.options.rotation))
    }

    /// Color of output pixel `(x, y)`.
    pub fn resolve_pixel(&self, x: usize, y: usize) -> Rgb {
        let (fx, fy) = (x as f64, y as f64);
        let point = self.frame.locate(fx, fy);
        if !point.is_projectable(&self.frame) {
            return Rgb::BLACK;
        }
        let own = polar_for_point(point, self.model).rotated(self.options.rotation);

        let mut corners = [(0usize, 0usize); 4];
        for (slot, (dx, dy)) in corners.iter_mut().zip(self.options.corners.offsets()) {
            match self.polar_at(fx + dx, fy + dy) {
                Some(polar) => *slot = polar_to_pixel(polar.theta, polar.phi, self.image),
                None => return color_at_coordinate(own.theta, own.phi, self.image),
            }
        }

        let rect = PixelRect::bounding(&corners);
        if rect.is_degenerate(self.image) {
            color_at_coordinate(own.theta, own.phi, self.image)
        } else {
            average_color_over_region(rect, self.image)
        }
    }

    /// Renders the whole frame, rows in parallel.
    pub fn render(&self) -> Raster {
        let start = Instant::now();
        let side = self.model.diameter();
        let mut raster = Raster::new_filled(side, side, Rgb::BLACK);

        if side > 0 {
            raster
                .pixels_mut()
                .par_rows_mut_auto(side)
                .for_each(|(start_row, chunk)| {
                    for (i, row) in chunk.chunks_exact_mut(side).enumerate() {
                        let y = start_row + i;
                        for (x, pixel) in row.iter_mut().enumerate() {
                            *pixel = self.resolve_pixel(x, y);
                        }
                    }
                });
        }

        debug!(
            radius = self.model.radius,
            offset = self.model.offset,
            rotation = self.options.rotation,
            corners = ?self.options.corners,
            source_width = self.image.width(),
            source_height = self.image.height(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "rendered frame"
        );

        raster
    }
}

/// Renders `image` for `model` with default options.
pub fn render(model: &CalibrationModel, image: &EquirectImage) -> Raster {
    FrameRenderer::new(model, image).render()
}
