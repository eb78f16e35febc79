//! Shape generation for 2D primitives
//!
//! Shapes are built in CSS pixels (origin top-left, y down) and mapped to
//! normalized device coordinates when a frame is tessellated.

use glam::Vec2;
use std::f32::consts::PI;

use super::frame::Frame;
use super::vertex::Vertex;

/// Map a point in a `size` pixel viewport to NDC (-1..1, y up)
#[inline]
pub fn to_ndc(p: Vec2, size: (f32, f32)) -> Vec2 {
    let (w, h) = size;
    Vec2::new(p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32, out: &mut Vec<Vertex>) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Generate vertices for a line segment as a `width`-wide quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    // Two triangles
    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));

    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Tessellate a whole frame into NDC triangles. Discs go first and links are
/// drawn over them.
pub fn frame_vertices(frame: &Frame, disc_segments: u32, out: &mut Vec<Vertex>) {
    out.clear();
    let (w, h) = frame.size;
    if !(w > 0.0 && h > 0.0) {
        return;
    }

    for d in &frame.discs {
        circle(d.center, d.radius, d.color, disc_segments, out);
    }
    for l in &frame.lines {
        line(l.from, l.to, l.width, l.color, out);
    }

    for v in out.iter_mut() {
        let ndc = to_ndc(Vec2::from(v.position), frame.size);
        v.position = ndc.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::frame::{Disc, Line};

    #[test]
    fn test_to_ndc_corners() {
        let size = (800.0, 600.0);
        assert_eq!(to_ndc(Vec2::ZERO, size), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(Vec2::new(800.0, 600.0), size), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
    }

    #[test]
    fn test_line_quad_width() {
        let mut out = Vec::new();
        line(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.5, [1.0; 4], &mut out);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.position[1].abs() == 0.25));
    }

    #[test]
    fn test_degenerate_line_skipped() {
        let mut out = Vec::new();
        line(Vec2::ONE, Vec2::ONE, 0.5, [1.0; 4], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_frame_vertex_count() {
        let mut frame = Frame::default();
        frame.clear(100.0, 100.0);
        frame.discs.push(Disc {
            center: Vec2::new(50.0, 50.0),
            radius: 2.0,
            color: [0.0, 0.5, 1.0, 0.3],
        });
        frame.lines.push(Line {
            from: Vec2::new(10.0, 10.0),
            to: Vec2::new(20.0, 20.0),
            width: 0.5,
            color: [0.0, 0.5, 1.0, 0.03],
        });

        let mut out = Vec::new();
        frame_vertices(&frame, 12, &mut out);
        assert_eq!(out.len(), 6 + 12 * 3);
        // Disc first, link over it
        assert_eq!(out[0].position, [0.0, 0.0]);
        assert_eq!(out[0].color[3], 0.3);
        assert!(out[12 * 3..].iter().all(|v| v.color[3] == 0.03));
    }
}
