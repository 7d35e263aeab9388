//! Frame Renderers
//!
//! Turn point sets (scatter) and triangle sets (filled polygons) into image
//! files. All frames share one fixed viewport around the base triangle so
//! that consecutive snapshots line up.
//!
//! License: MIT

pub mod raster;
pub mod svg;

pub use raster::RasterRenderer;
pub use svg::SvgRenderer;

use std::path::Path;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::geometry::{Triangle, Vertex, BASE_HEIGHT};

/// RGB colour
pub type Rgb = [u8; 3];

pub const BACKGROUND_COLOR: Rgb = [255, 255, 255];
/// Forward chaos game points
pub const FORWARD_COLOR: Rgb = [0, 0, 0];
/// Reconstructed predecessors (crimson)
pub const REVERSE_COLOR: Rgb = [220, 20, 60];
/// Subdivision cells
pub const TRIANGLE_COLOR: Rgb = [31, 119, 180];

/// Margin around the base triangle, as a fraction of each extent
const VIEWPORT_MARGIN: f64 = 0.05;

/// Consumer of generated geometry
pub trait Renderer {
    /// Scatter `points` in `color` and write the frame to `path`.
    fn render_points(&self, points: &[Vertex], color: Rgb, path: &Path) -> Result<()>;

    /// Fill `triangles` in `color` and write the frame to `path`.
    fn render_triangles(&self, triangles: &[Triangle], color: Rgb, path: &Path) -> Result<()>;
}

/// Renderer for `output` at `dpi`
pub fn renderer_for(output: &OutputConfig, dpi: u32) -> Box<dyn Renderer> {
    let extent = output.pixel_extent(dpi).max(1);
    match output.format {
        OutputFormat::Png => Box::new(RasterRenderer::new(extent, image::ImageFormat::Png)),
        OutputFormat::Tif => Box::new(RasterRenderer::new(extent, image::ImageFormat::Tiff)),
        OutputFormat::Svg => Box::new(SvgRenderer::new(extent, output.image_size)),
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// World-to-image mapping with equal aspect and y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    min: Vertex,
    max: Vertex,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Viewport over [0, 1] x [0, √3/2] plus margin, `width` pixels wide
    pub fn triangle(width: u32) -> Self {
        let x_margin = VIEWPORT_MARGIN;
        let y_margin = VIEWPORT_MARGIN * BASE_HEIGHT;
        let min = Vertex::new(-x_margin, -y_margin);
        let max = Vertex::new(1.0 + x_margin, BASE_HEIGHT + y_margin);
        let aspect = (max.y - min.y) / (max.x - min.x);
        let height = ((width as f64 * aspect).round() as u32).max(1);
        Self { min, max, width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels per world unit
    #[inline]
    pub fn scale(&self) -> f64 {
        self.width as f64 / (self.max.x - self.min.x)
    }

    /// Continuous image coordinates of `v` (pixel `(c, r)` spans `[c, c+1)`)
    #[inline]
    pub fn to_image(&self, v: Vertex) -> (f64, f64) {
        let scale = self.scale();
        ((v.x - self.min.x) * scale, (self.max.y - v.y) * scale)
    }

    /// World y at the centre of pixel row `row`
    #[inline]
    pub fn row_center_y(&self, row: u32) -> f64 {
        self.max.y - (row as f64 + 0.5) / self.scale()
    }
}

/// Create the parent directory of `path` if needed
pub(crate) fn prepare_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BASE_VERTICES;

    #[test]
    fn test_viewport_keeps_triangle_inside() {
        let viewport = Viewport::triangle(1000);
        assert_eq!(viewport.width(), 1000);
        assert_eq!(viewport.height(), 866);
        for v in BASE_VERTICES {
            let (x, y) = viewport.to_image(v);
            assert!(x > 0.0 && x < viewport.width() as f64);
            assert!(y > 0.0 && y < viewport.height() as f64);
        }
    }

    #[test]
    fn test_viewport_flips_y() {
        let viewport = Viewport::triangle(200);
        let (_, apex_y) = viewport.to_image(BASE_VERTICES[0]);
        let (_, base_y) = viewport.to_image(BASE_VERTICES[1]);
        assert!(apex_y < base_y);
        assert!(viewport.row_center_y(0) > viewport.row_center_y(1));
    }
}
