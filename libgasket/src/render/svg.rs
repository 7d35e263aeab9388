//! SVG Renderer
//!
//! Writes frames as plain SVG documents: one `<circle>` per point or one
//! `<polygon>` per triangle, in image coordinates of the shared viewport.
//! The physical size is `image_size / 100` inches, matching the raster
//! frames at 100 dpi.
//!
//! License: MIT

use std::fmt::Write as _;
use std::path::Path;

use super::{prepare_path, Renderer, Rgb, Viewport};
use crate::error::Result;
use crate::geometry::{Triangle, Vertex};

/// Radius of a scattered point, in pixels
const POINT_RADIUS: f64 = 0.5;

/// Vector renderer
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    viewport: Viewport,
    image_size: u32,
}

impl SvgRenderer {
    pub fn new(width: u32, image_size: u32) -> Self {
        Self {
            viewport: Viewport::triangle(width),
            image_size,
        }
    }

    fn header(&self, out: &mut String) {
        let w = self.viewport.width();
        let h = self.viewport.height();
        let inches = self.image_size as f64 / 100.0;
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.3}in" height="{:.3}in" viewBox="0 0 {} {}">"#,
            inches,
            inches * h as f64 / w as f64,
            w,
            h
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    }

    /// SVG document scattering `points`
    pub fn points_document(&self, points: &[Vertex], color: Rgb) -> String {
        let mut out = String::with_capacity(256 + points.len() * 48);
        self.header(&mut out);
        let _ = writeln!(out, r#"<g fill="{}">"#, css_color(color));
        for &p in points {
            let (x, y) = self.viewport.to_image(p);
            let _ = writeln!(out, r#"<circle cx="{:.2}" cy="{:.2}" r="{}"/>"#, x, y, POINT_RADIUS);
        }
        out.push_str("</g>\n</svg>\n");
        out
    }

    /// SVG document filling `triangles`
    pub fn triangles_document(&self, triangles: &[Triangle], color: Rgb) -> String {
        let mut out = String::with_capacity(256 + triangles.len() * 80);
        self.header(&mut out);
        let _ = writeln!(out, r#"<g fill="{}" stroke="none">"#, css_color(color));
        for triangle in triangles {
            out.push_str(r#"<polygon points=""#);
            for (k, &v) in triangle.vertices().iter().enumerate() {
                let (x, y) = self.viewport.to_image(v);
                if k > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{:.3},{:.3}", x, y);
            }
            out.push_str("\"/>\n");
        }
        out.push_str("</g>\n</svg>\n");
        out
    }

    fn write(document: String, path: &Path) -> Result<()> {
        prepare_path(path)?;
        std::fs::write(path, document)?;
        log::debug!("wrote svg frame to {}", path.display());
        Ok(())
    }
}

fn css_color([r, g, b]: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

impl Renderer for SvgRenderer {
    fn render_points(&self, points: &[Vertex], color: Rgb, path: &Path) -> Result<()> {
        Self::write(self.points_document(points, color), path)
    }

    fn render_triangles(&self, triangles: &[Triangle], color: Rgb, path: &Path) -> Result<()> {
        Self::write(self.triangles_document(triangles, color), path)
    }
}
