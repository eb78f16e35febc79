//! Browser implementations of the platform seams
//!
//! - `AnimationFrameTicker`: `requestAnimationFrame` chains
//! - `IntersectionReporter`: an `IntersectionObserver` over a fixed element list
//!
//! Elements are referred to by their index in that list, since DOM handles
//! can't be hashed.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use super::{ObserveOptions, TickCallback, TickSource, VisibilityEntry, VisibilityReporter};
use crate::error::{FxError, Result};

/// Ticks on every display refresh
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameTicker;

impl TickSource for AnimationFrameTicker {
    fn subscribe(&self, callback: TickCallback) {
        request_animation_frame(callback);
    }
}

fn request_animation_frame(mut callback: TickCallback) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        if callback(time).is_continue() {
            request_animation_frame(callback);
        }
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

/// `IntersectionObserver` wrapper reporting element indices
pub struct IntersectionReporter {
    observer: IntersectionObserver,
    elements: Rc<Vec<Element>>,
}

impl IntersectionReporter {
    /// Create an observer over `elements`. Nothing is watched until
    /// `observe` is called; `on_entries` gets each batch of changes.
    pub fn new<F>(elements: Rc<Vec<Element>>, options: ObserveOptions, mut on_entries: F) -> Result<Self>
    where
        F: FnMut(&[VisibilityEntry<usize>], &mut IntersectionReporter) + 'static,
    {
        let known = elements.clone();
        let closure = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let batch: Vec<_> = entries
                    .iter()
                    .filter_map(|value| {
                        let entry: IntersectionObserverEntry = value.dyn_into().ok()?;
                        let target = entry.target();
                        let element = known.iter().position(|el| *el == target)?;
                        Some(VisibilityEntry {
                            element,
                            is_intersecting: entry.is_intersecting(),
                            ratio: entry.intersection_ratio() as f32,
                        })
                    })
                    .collect();
                let mut reporter = IntersectionReporter {
                    observer,
                    elements: known.clone(),
                };
                on_entries(&batch, &mut reporter);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold as f64));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;
        closure.forget();

        Ok(Self { observer, elements })
    }
}

impl VisibilityReporter<usize> for IntersectionReporter {
    fn observe(&mut self, element: &usize) {
        if let Some(el) = self.elements.get(*element) {
            self.observer.observe(el);
        }
    }

    fn unobserve(&mut self, element: &usize) {
        if let Some(el) = self.elements.get(*element) {
            self.observer.unobserve(el);
        }
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

pub fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or(FxError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(FxError::NoDocument)
}

/// All elements matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Like `query_all`, but an empty match is an error
pub fn require_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let found = query_all(document, selector)?;
    if found.is_empty() {
        return Err(FxError::MissingElement(selector.to_string()));
    }
    Ok(found)
}

/// Indices (into `elements`) of `elements[index]`'s siblings, in document order
pub fn sibling_indices(elements: &[Element], index: usize) -> Vec<usize> {
    let Some(parent) = elements.get(index).and_then(|el| el.parent_element()) else {
        return vec![index];
    };
    let children = parent.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|child| elements.iter().position(|el| *el == child))
        .collect()
}

/// Viewport size in CSS pixels
pub fn viewport_size(window: &web_sys::Window) -> (f32, f32) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w as f32, h as f32)
}
