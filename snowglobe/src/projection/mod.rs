//! Fisheye/offset model mapping between the globe surface and the display.
//!
//! The lens is treated as an ideal equisolid fisheye (`r = 2·f·sin(θ/2)`),
//! looking at the sphere from `offset` pixels beyond its apex.
//!
//! Both directions share [`DiskFrame`] for the center-relative pixel offset.
//! Longitude is `atan2(dx, dy)`: `phi = 0` points down the frame (+y),
//! `phi = ±π` points up.


use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::DVec2;

use crate::calibration::CalibrationModel;

/// Coordinates of a `2r × 2r` output frame relative to its projectable disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskFrame {
    radius: f64,
}

/// A frame position together with its distance from the disk center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskPoint {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

/// Latitude from the apex (`0..=π/2`) and longitude (`(-π, π]`), in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarCoordinate {
    pub theta: f64,
    pub phi: f64,
}

impl DiskFrame {
    pub fn new(radius: f64) -> Self {
        debug_assert!(radius > 0.0, "disk radius must be positive");
        Self { radius }
    }

    pub fn for_model(model: &CalibrationModel) -> Self {
        Self::new(model.radius as f64)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::splat(self.radius)
    }

    /// Offset of a frame position from the disk center.
    #[inline]
    pub fn offset(&self, x: f64, y: f64) -> DVec2 {
        DVec2::new(x - self.radius, y - self.radius)
    }

    #[inline]
    pub fn locate(&self, x: f64, y: f64) -> DiskPoint {
        DiskPoint {
            x,
            y,
            distance: self.offset(x, y).length(),
        }
    }

    /// Longitude of a frame position.
    #[inline]
    pub fn longitude(&self, x: f64, y: f64) -> f64 {
        let offset = self.offset(x, y);
        offset.x.atan2(offset.y)
    }

    /// Frame position `pixel_radius` away from the center along longitude `phi`.
    #[inline]
    pub fn point_at(&self, pixel_radius: f64, phi: f64) -> DVec2 {
        self.center() + DVec2::new(phi.sin(), phi.cos()) * pixel_radius
    }
}

impl DiskPoint {
    /// Strictly inside the disk, as required for corner samples.
    #[inline]
    pub fn is_inside(&self, frame: &DiskFrame) -> bool {
        self.distance < frame.radius
    }

    /// Inside or on the rim; everything else renders black.
    #[inline]
    pub fn is_projectable(&self, frame: &DiskFrame) -> bool {
        self.distance <= frame.radius
    }
}

impl PolarCoordinate {
    pub fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Spins the globe by `angle` radians of longitude.
    pub fn rotated(self, angle: f64) -> Self {
        if angle == 0.0 {
            return self;
        }
        Self {
            theta: self.theta,
            phi: normalize_longitude(self.phi + angle),
        }
    }
}

/// Wraps a longitude into `(-π, π]`. In-range values are returned unchanged.
pub fn normalize_longitude(phi: f64) -> f64 {
    if phi > -PI && phi <= PI {
        return phi;
    }
    let wrapped = (phi + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Display radius, in pixels from the disk center, of the ring at sphere
/// angle `theta` (`0` = apex). Only used for calibration overlays.
///
/// `theta` is the angle at the sphere center and may run to `π`. The angle
/// the ring subtends at the lens is clamped to the lens field of view, so
/// the result stays within `0..=radius`.
pub fn radius_for_theta(theta: f64, model: &CalibrationModel) -> f64 {
    let radius = model.radius as f64;

    let side_a = radius * theta.sin();
    let side_c = radius * (FRAC_PI_2 - theta).sin();
    let angle_b = side_a.atan2(side_c + model.offset).clamp(0.0, FRAC_PI_2);

    (radius / FRAC_PI_4.sin()) * (angle_b / 2.0).sin()
}

/// Surface position shown by the frame pixel at `(x, y)`, which lies `d`
/// pixels from the disk center.
///
/// `d` must not exceed the radius; the pixel would be off the globe.
pub fn surface_to_polar(x: f64, y: f64, d: f64, model: &CalibrationModel) -> PolarCoordinate {
    let frame = DiskFrame::for_model(model);
    let radius = frame.radius();
    debug_assert!(
        d <= radius * (1.0 + 1e-9),
        "sample out of range: d={} > radius={}",
        d,
        radius
    );

    let h = (d * FRAC_PI_4.sin() / radius).clamp(0.0, 1.0);
    let theta_h = h.asin();
    let theta_s = (model.offset * h / radius).clamp(-1.0, 1.0).asin() + theta_h;

    PolarCoordinate {
        theta: theta_s,
        phi: frame.longitude(x, y),
    }
}

/// [`surface_to_polar`] for a point already located in the frame.
#[inline]
pub fn polar_for_point(point: DiskPoint, model: &CalibrationModel) -> PolarCoordinate {
    surface_to_polar(point.x, point.y, point.distance, model)
}
