//! Field animation loop
//!
//! Each display frame: advance the simulation, rebuild the draw list from
//! scratch, and hand it to the surface.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use super::frame::{Disc, Frame, Line, Surface};
use crate::platform::TickSource;
use crate::rgba;
use crate::sim::{ParticleField, tick};

/// Draw the field's particles and current links into `frame`
pub fn draw_field(field: &ParticleField, frame: &mut Frame) {
    let (w, h) = field.size();
    frame.clear(w, h);

    let config = field.config();
    let particles = field.particles();

    for p in particles {
        frame.discs.push(Disc {
            center: p.pos,
            radius: p.radius,
            color: rgba(config.color, p.opacity),
        });
    }

    for link in field.links() {
        frame.lines.push(Line {
            from: particles[link.a].pos,
            to: particles[link.b].pos,
            width: config.link_width,
            color: rgba(config.color, link.alpha),
        });
    }
}

/// A particle field bound to the surface it is shown on
pub struct FieldAnimation<S> {
    field: ParticleField,
    frame: Frame,
    surface: S,
}

impl<S: Surface> FieldAnimation<S> {
    pub fn new(field: ParticleField, surface: S) -> Self {
        Self {
            field,
            frame: Frame::default(),
            surface,
        }
    }

    /// Simulate and present one display frame
    pub fn render_frame(&mut self) {
        tick(&mut self.field);
        draw_field(&self.field, &mut self.frame);
        self.surface.present(&self.frame);
    }

    /// Viewport resized (CSS pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field.resize(width, height);
        self.surface.resize(width, height);
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Run `animation` on every tick. The loop never stops on its own.
pub fn start<S, T>(animation: Rc<RefCell<FieldAnimation<S>>>, ticker: &T)
where
    S: Surface + 'static,
    T: TickSource + ?Sized,
{
    ticker.subscribe(Box::new(move |_now| {
        animation.borrow_mut().render_frame();
        ControlFlow::Continue(())
    }));
}
