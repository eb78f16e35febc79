//! Page effects outside the particle field
//!
//! Each effect is a small state machine fed by the platform seams. The wasm
//! entry point applies their outputs to the DOM.

pub mod anchor;
pub mod counter;
pub mod reveal;
pub mod video;

pub use anchor::{AnchorAction, anchor_action};
pub use counter::{CounterAnimation, Counters, Latch, ease_out_cubic, eased_value, parse_target, run_counter};
pub use reveal::{PendingReveal, Reveal};
pub use video::{ButtonLook, SoundGroup, VideoUpdate};
