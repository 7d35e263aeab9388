//! Raster Renderer
//!
//! Draws frames into an RGB buffer (row-major, 3 bytes per pixel) and encodes
//! it with the `image` crate. Triangle filling is a scanline pass: triangles
//! are bucketed by the rows they cover, then rows are filled in parallel with
//! Rayon.
//!
//! License: MIT

use std::path::Path;

use image::{ImageFormat, RgbImage};
use rayon::prelude::*;

use super::{prepare_path, Renderer, Rgb, Viewport, BACKGROUND_COLOR};
use crate::error::{GasketError, Result};
use crate::geometry::{Triangle, Vertex};

/// Bitmap renderer for PNG / TIFF output
#[derive(Debug, Clone, Copy)]
pub struct RasterRenderer {
    viewport: Viewport,
    format: ImageFormat,
}

impl RasterRenderer {
    /// Renderer producing frames `width` pixels wide
    pub fn new(width: u32, format: ImageFormat) -> Self {
        Self {
            viewport: Viewport::triangle(width),
            format,
        }
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Blank canvas in the background colour
    fn canvas(&self) -> Vec<u8> {
        let n = self.viewport.width() as usize * self.viewport.height() as usize;
        BACKGROUND_COLOR.repeat(n)
    }

    /// Scatter `points` into an RGB buffer
    pub fn rasterize_points(&self, points: &[Vertex], color: Rgb) -> Vec<u8> {
        let mut buffer = self.canvas();
        let (w, h) = (self.viewport.width() as f64, self.viewport.height() as f64);
        let stride = self.viewport.width() as usize;

        for &p in points {
            let (x, y) = self.viewport.to_image(p);
            if x < 0.0 || y < 0.0 || x >= w || y >= h {
                continue;
            }
            let offset = (y as usize * stride + x as usize) * 3;
            buffer[offset..offset + 3].copy_from_slice(&color);
        }
        buffer
    }

    /// Fill `triangles` into an RGB buffer
    pub fn rasterize_triangles(&self, triangles: &[Triangle], color: Rgb) -> Vec<u8> {
        let mut buffer = self.canvas();
        let height = self.viewport.height();
        let stride = self.viewport.width() as usize * 3;

        // Row buckets: indices of triangles whose vertical extent meets the row
        let mut rows: Vec<Vec<u32>> = vec![Vec::new(); height as usize];
        for (index, triangle) in triangles.iter().enumerate() {
            let (min, max) = triangle.bounds();
            let (_, top) = self.viewport.to_image(max);
            let (_, bottom) = self.viewport.to_image(min);
            let first = top.floor().max(0.0) as usize;
            let last = (bottom.ceil() as usize).min(height as usize);
            for bucket in rows.iter_mut().take(last).skip(first) {
                bucket.push(index as u32);
            }
        }

        buffer
            .par_chunks_mut(stride)
            .zip(rows.par_iter())
            .enumerate()
            .for_each(|(row, (line, bucket))| {
                let y = self.viewport.row_center_y(row as u32);
                for &index in bucket {
                    if let Some((from, to)) = self.span(&triangles[index as usize], y) {
                        for pixel in line[from * 3..to * 3].chunks_exact_mut(3) {
                            pixel.copy_from_slice(&color);
                        }
                    }
                }
            });
        buffer
    }

    /// Column range `[from, to)` covered by `triangle` on the scanline at
    /// world height `y`. Triangles narrower than a pixel still cover the
    /// pixel they fall in.
    fn span(&self, triangle: &Triangle, y: f64) -> Option<(usize, usize)> {
        let [a, b, c] = *triangle.vertices();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        for (p, q) in [(a, b), (b, c), (c, a)] {
            let (y0, y1) = (p.y.min(q.y), p.y.max(q.y));
            if y < y0 || y > y1 || y1 == y0 {
                continue;
            }
            let x = p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y);
            lo = lo.min(x);
            hi = hi.max(x);
        }
        if lo > hi {
            return None;
        }

        let width = self.viewport.width() as f64;
        let (lo_px, _) = self.viewport.to_image(Vertex::new(lo, y));
        let (hi_px, _) = self.viewport.to_image(Vertex::new(hi, y));
        let mut from = (lo_px - 0.5).ceil().max(0.0);
        let mut to = ((hi_px - 0.5).floor() + 1.0).min(width);
        if from >= to {
            let centre = ((lo_px + hi_px) * 0.5).floor().clamp(0.0, width - 1.0);
            from = centre;
            to = centre + 1.0;
        }
        Some((from as usize, to as usize))
    }

    fn write(&self, buffer: Vec<u8>, path: &Path) -> Result<()> {
        let image = RgbImage::from_raw(self.viewport.width(), self.viewport.height(), buffer)
            .ok_or_else(|| GasketError::InvalidInput("raster buffer does not match frame size".into()))?;
        prepare_path(path)?;
        image.save_with_format(path, self.format)?;
        log::debug!("wrote {}x{} frame to {}", image.width(), image.height(), path.display());
        Ok(())
    }
}

impl Renderer for RasterRenderer {
    fn render_points(&self, points: &[Vertex], color: Rgb, path: &Path) -> Result<()> {
        self.write(self.rasterize_points(points, color), path)
    }

    fn render_triangles(&self, triangles: &[Triangle], color: Rgb, path: &Path) -> Result<()> {
        self.write(self.rasterize_triangles(triangles, color), path)
    }
}
