//! Snowglobe - pre-warping for fisheye spherical projection displays.
//!
//! A projector shining through a fisheye lens into a translucent globe
//! bends a flat frame onto the sphere. This library renders the frame the
//! projector has to show so that an equirectangular image appears
//! undistorted on the globe:
//! - Calibration of radius, lens offset and on-screen center
//! - Forward and inverse mapping between the sphere and the display
//! - Box-filtered sampling of equirectangular images
//! - Calibration patterns, interactive adjustment and globe spin
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use snowglobe::{CalibrationModel, EquirectImage, FrameRenderer};
//!
//! let model = CalibrationModel::load_or_default("globe.yaml")?;
//! let image = EquirectImage::open("earth.jpg")?;
//!
//! let frame = FrameRenderer::new(&model, &image).render();
//! snowglobe::save_raster(&frame, "frame.png")?;
//! ```

pub mod calibration;
pub mod composite;
pub mod drawing;
pub mod error;
pub mod pattern;
pub mod projection;
pub mod raster;
pub mod render;
pub mod sampler;
pub mod session;
pub mod spin;

// ============================================================================
// Model and errors
// ============================================================================

pub use calibration::CalibrationModel;
pub use error::{Error, Result};

// ============================================================================
// Geometry
// ============================================================================

pub use projection::{
    normalize_longitude, polar_for_point, radius_for_theta, surface_to_polar, DiskFrame,
    DiskPoint, PolarCoordinate,
};

// ============================================================================
// Images and rendering
// ============================================================================

pub use raster::{read_raster, save_raster, Raster, Rgb};
pub use render::{render, CornerPattern, FrameRenderer, RenderOptions};
pub use sampler::{
    average_color_over_region, color_at_coordinate, polar_to_pixel, EquirectImage, PixelRect,
};

// ============================================================================
// Calibration tools
// ============================================================================

pub use composite::{composite, Compositor, DisplayRect, DEFAULT_DISPLAY_SIZE};
pub use pattern::calibration_pattern;
pub use session::{Adjustment, CalibrationSession, Move, MoveParseError};
pub use spin::Spin;
