//! Placement of rendered frames on the full projector display.

use glam::{IVec2, UVec2};

use crate::calibration::CalibrationModel;
use crate::raster::{Raster, Rgb};

pub const DEFAULT_DISPLAY_SIZE: UVec2 = UVec2::new(848, 480);

/// Region of the display touched by a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub origin: UVec2,
    pub size: UVec2,
}

pub fn new_display(size: UVec2) -> Raster {
    Raster::new_filled(size.x as usize, size.y as usize, Rgb::BLACK)
}

/// Copies `frame` onto `display` with its top-left pixel at `top_left`,
/// clipping whatever falls outside. Returns the region written, or `None`
/// when the frame misses the display entirely.
pub fn composite(display: &mut Raster, frame: &Raster, top_left: IVec2) -> Option<DisplayRect> {
    let clip = |start: i32, len: usize, bound: usize| -> Option<(usize, usize, usize)> {
        let lo = (start as i64).max(0);
        let hi = (start as i64 + len as i64).min(bound as i64);
        (lo < hi).then(|| ((lo - start as i64) as usize, lo as usize, (hi - lo) as usize))
    };

    let (src_x, dst_x, width) = clip(top_left.x, frame.width(), display.width())?;
    let (src_y, dst_y, height) = clip(top_left.y, frame.height(), display.height())?;

    let display_width = display.width();
    let dst = display.pixels_mut();
    for row in 0..height {
        let src = &frame.row(src_y + row)[src_x..src_x + width];
        let start = (dst_y + row) * display_width + dst_x;
        dst[start..start + width].copy_from_slice(src);
    }

    Some(DisplayRect {
        origin: UVec2::new(dst_x as u32, dst_y as u32),
        size: UVec2::new(width as u32, height as u32),
    })
}

/// A display that erases the previous frame before drawing the next one.
#[derive(Debug, Clone)]
pub struct Compositor {
    display: Raster,
    last: Option<DisplayRect>,
}

impl Compositor {
    pub fn new(size: UVec2) -> Self {
        Self {
            display: new_display(size),
            last: None,
        }
    }

    pub fn display(&self) -> &Raster {
        &self.display
    }

    pub fn into_display(self) -> Raster {
        self.display
    }

    /// Blanks the last blit, then draws `frame` centered on `model.center`.
    pub fn present(&mut self, frame: &Raster, model: &CalibrationModel) -> Option<DisplayRect> {
        if let Some(last) = self.last.take() {
            let width = self.display.width();
            let pixels = self.display.pixels_mut();
            for y in last.origin.y..last.origin.y + last.size.y {
                let start = y as usize * width + last.origin.x as usize;
                pixels[start..start + last.size.x as usize].fill(Rgb::BLACK);
            }
        }
        self.last = composite(&mut self.display, frame, model.top_left());
        self.last
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb = Rgb::new(9, 9, 200);

    fn count(raster: &Raster, color: Rgb) -> usize {
        raster.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn test_default_display_is_black() {
        let display = Compositor::default().into_display();
        assert_eq!((display.width(), display.height()), (848, 480));
        assert_eq!(count(&display, Rgb::BLACK), 848 * 480);
    }

    #[test]
    fn test_blit_inside() {
        let mut display = new_display(UVec2::new(10, 8));
        let frame = Raster::new_filled(3, 2, INK);
        let rect = composite(&mut display, &frame, IVec2::new(4, 5)).unwrap();

        assert_eq!(rect.origin, UVec2::new(4, 5));
        assert_eq!(rect.size, UVec2::new(3, 2));
        assert_eq!(display[(4, 5)], INK);
        assert_eq!(display[(6, 6)], INK);
        assert_eq!(display[(7, 6)], Rgb::BLACK);
        assert_eq!(count(&display, INK), 6);
    }

    #[test]
    fn test_blit_clips_negative_origin() {
        let mut display = new_display(UVec2::new(10, 8));
        let frame = Raster::from_fn(6, 6, |x, y| Rgb::new(x as u8, y as u8, 1));
        let rect = composite(&mut display, &frame, IVec2::new(-2, -3)).unwrap();

        assert_eq!(rect.origin, UVec2::ZERO);
        assert_eq!(rect.size, UVec2::new(4, 3));
        assert_eq!(display[(0, 0)], Rgb::new(2, 3, 1));
        assert_eq!(display[(3, 2)], Rgb::new(5, 5, 1));
        assert_eq!(display[(4, 0)], Rgb::BLACK);
    }

    #[test]
    fn test_blit_clips_far_edges_and_misses() {
        let mut display = new_display(UVec2::new(10, 8));
        let frame = Raster::new_filled(5, 5, INK);

        let rect = composite(&mut display, &frame, IVec2::new(8, 6)).unwrap();
        assert_eq!(rect.size, UVec2::new(2, 2));

        assert!(composite(&mut display, &frame, IVec2::new(10, 0)).is_none());
        assert!(composite(&mut display, &frame, IVec2::new(0, -5)).is_none());
    }

    #[test]
    fn test_present_erases_previous_frame() {
        let mut compositor = Compositor::new(UVec2::new(40, 30));
        let frame = Raster::new_filled(10, 10, INK);

        let mut model = CalibrationModel::new(5, 4.0, IVec2::new(10, 10));
        compositor.present(&frame, &model);
        assert_eq!(compositor.display()[(5, 5)], INK);

        model.center = IVec2::new(25, 20);
        let rect = compositor.present(&frame, &model).unwrap();
        assert_eq!(rect.origin, UVec2::new(20, 15));
        assert_eq!(compositor.display()[(5, 5)], Rgb::BLACK);
        assert_eq!(count(compositor.display(), INK), 100);
    }
}
