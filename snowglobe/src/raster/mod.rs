mod io;


use std::path::Path;

use bytemuck::{Pod, Zeroable};

use common::Buffer2;

use crate::error::Result;

/// 8-bit RGB color.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// Row-major RGB pixel buffer.
pub type Raster = Buffer2<Rgb>;

/// Views a raster as tightly packed RGB8 bytes.
pub fn raster_bytes(raster: &Raster) -> &[u8] {
    bytemuck::cast_slice(raster.pixels())
}

/// Reads any image the `image` crate can decode, converting to RGB8.
pub fn read_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    io::load_rgb(path.as_ref())
}

/// Writes a raster, choosing the encoder from the file extension.
pub fn save_raster<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<()> {
    io::save_rgb(raster, path.as_ref())
}
