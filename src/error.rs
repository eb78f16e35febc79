//! Host setup errors
//!
//! None of these reach the page: the entry point logs them and skips the
//! effect that failed to set up.

use thiserror::Error;

/// Errors raised while wiring an effect to the page
#[derive(Debug, Error)]
pub enum FxError {
    /// No global `window` (not running in a browser)
    #[error("no window")]
    NoWindow,

    /// Window has no document
    #[error("no document")]
    NoDocument,

    /// A required element is not on the page
    #[error("missing element: {0}")]
    MissingElement(String),

    /// The particle canvas id matched something other than a canvas
    #[error("element is not a canvas: {0}")]
    NotACanvas(String),

    /// Surface creation failed
    #[error("surface: {0}")]
    Surface(String),

    /// No GPU adapter for the surface
    #[error("no compatible adapter: {0}")]
    Adapter(String),

    /// Device request failed
    #[error("device: {0}")]
    Device(String),

    /// A DOM call threw
    #[error("js error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for FxError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FxError::Js(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
