use std::path::Path;

use tracing::debug;

use super::{raster_bytes, Raster, Rgb};
use crate::error::{Error, Result};

pub(super) fn load_rgb(path: &Path) -> Result<Raster> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let color = img.color();
    let rgb = img.into_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    let pixels: Vec<Rgb> = rgb
        .into_raw()
        .chunks_exact(3)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();

    debug!(
        path = %path.display(),
        width,
        height,
        source_color = ?color,
        "loaded image"
    );

    Ok(Raster::new(width, height, pixels))
}

pub(super) fn save_rgb(raster: &Raster, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        raster_bytes(raster),
        raster.width() as u32,
        raster.height() as u32,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "saved image"
    );

    Ok(())
}
