use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::PlotError;

pub type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// An owned RGB pixel buffer that plotters draws into.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    /// White drawing area covering the whole canvas.
    pub fn root(&mut self) -> Result<Root<'_>, PlotError> {
        let root = BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        Ok(root)
    }

    /// Encode as PNG. Consumes the canvas, so the buffer is freed once the
    /// file is on disk.
    pub fn save(self, path: &Path) -> Result<(), PlotError> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        info!("saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Allocate a canvas, let `draw` paint it, write it to `path`, drop it.
pub fn render_png<F>(path: &Path, (width, height): (u32, u32), draw: F) -> Result<(), PlotError>
where
    F: FnOnce(&Root<'_>) -> Result<(), PlotError>,
{
    let mut canvas = Canvas::new(width, height);
    {
        let root = canvas.root()?;
        draw(&root)?;
        root.present()?;
    }
    canvas.save(path)
}
