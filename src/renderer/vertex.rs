//! Vertex layout shared with `shader.wgsl`
//!
//! Colors are uploaded with straight alpha, exactly as `rgba` builds them for
//! discs and links. `fs_main` premultiplies, which is what the pipeline's
//! `PREMULTIPLIED_ALPHA_BLENDING` and the canvas's premultiplied compositing
//! expect. Anything written into a `Vertex` must stay straight-alpha or the
//! field will draw too bright over the page.

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (NDC) and straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Position at location 0, color at location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_shader_locations() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes[0].shader_location, 0);
        assert_eq!(desc.attributes[1].shader_location, 1);
        assert_eq!(desc.attributes[1].offset, 8);
    }

    #[test]
    fn test_color_kept_straight_alpha() {
        let color = crate::rgba([10, 132, 255], 0.25);
        let v = Vertex::new(0.0, 0.0, color);
        assert_eq!(v.color, color);
        assert_eq!(v.color[3], 0.25);
        assert!(v.color[2] > 0.99);
    }
}
