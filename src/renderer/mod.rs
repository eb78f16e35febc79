//! Rendering
//!
//! The simulation is drawn into a host-agnostic `Frame`; the wgpu pipeline
//! tessellates it into triangles on the page's canvas.

pub mod frame;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use frame::{Disc, Frame, Line, RecordingSurface, Surface};
pub use pipeline::FieldRenderer;
pub use scene::{FieldAnimation, draw_field};
