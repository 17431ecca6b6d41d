use glam::{DMat4, DVec3};
use kurbo::{Affine, BezPath, PathEl, Point};

use crate::{
    foundation::{
        core::Rgba8,
        error::{MdlError, MdlResult},
    },
    render::geometry::TriangleMesh,
};

/// CPU-rendered frame.
///
/// `data` is straight (non-premultiplied) RGBA8, row-major, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).and_then(|px| px.try_into().ok())
    }
}

#[derive(Clone, Debug)]
struct Stroke {
    path: BezPath,
    color: Rgba8,
}

/// Wireframe raster target for one frame.
///
/// Drawing records stroked paths in world coordinates (`x` right, `y` up, origin at the
/// bottom-left corner); [`Screen::render`] rasterizes them with `vello_cpu`.
#[derive(Clone, Debug)]
pub struct Screen {
    width: u16,
    height: u16,
    background: Rgba8,
    strokes: Vec<Stroke>,
}

impl Screen {
    pub fn new(width: u32, height: u32, background: Rgba8) -> MdlResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| MdlError::validation("screen width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| MdlError::validation("screen height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(MdlError::validation("screen width/height must be non-zero"));
        }
        Ok(Self {
            width,
            height,
            background,
            strokes: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Number of strokes recorded since the last clear.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Outline every front-facing triangle of `mesh` after applying `transform`.
    ///
    /// A triangle faces the viewer when its projected vertices wind counter-clockwise.
    pub fn draw_polygons(&mut self, mesh: &TriangleMesh, transform: &DMat4, color: Rgba8) {
        for tri in &mesh.triangles {
            let [a, b, c] = tri.map(|p| transform.transform_point3(p));
            let facing = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if facing <= 0.0 {
                continue;
            }
            let mut path = BezPath::new();
            path.move_to(to_point(a));
            path.line_to(to_point(b));
            path.line_to(to_point(c));
            path.close_path();
            self.strokes.push(Stroke { path, color });
        }
    }

    /// Endpoints are already in world coordinates.
    pub fn draw_line(&mut self, p0: DVec3, p1: DVec3, color: Rgba8) {
        let mut path = BezPath::new();
        path.move_to(to_point(p0));
        path.line_to(to_point(p1));
        self.strokes.push(Stroke { path, color });
    }

    pub fn render(&self) -> MdlResult<FrameRGBA> {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        ctx.set_paint(to_cpu_color(self.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        // Flip y so world coordinates grow upwards from the bottom-left corner.
        let view = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, h]);
        ctx.set_transform(affine_to_cpu(view));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
        for stroke in &self.strokes {
            ctx.set_paint(to_cpu_color(stroke.color));
            ctx.stroke_path(&bezpath_to_cpu(&stroke.path));
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_in_place(&mut data);
        Ok(FrameRGBA {
            width: self.width(),
            height: self.height(),
            data,
        })
    }
}

fn to_point(p: DVec3) -> Point {
    Point::new(p.x, p.y)
}

fn to_cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn unpremultiply_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/screen.rs"]
mod tests;
