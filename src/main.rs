//! pagefx entry point
//!
//! On the web, wires every effect to the page and starts the particle loop.
//! Natively, runs the field headless and logs what it would draw.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlMediaElement, MouseEvent};

    use pagefx::Settings;
    use pagefx::effects::counter::{COUNTER_CONTAINER_SELECTOR, COUNTER_SELECTOR, TARGET_ATTRIBUTE};
    use pagefx::effects::reveal::{REVEAL_SELECTOR, VISIBLE_CLASS};
    use pagefx::effects::video::{BUTTON_SELECTOR, UNMUTED_CLASS, WRAPPER_SELECTOR};
    use pagefx::effects::{
        AnchorAction, ButtonLook, Counters, Reveal, SoundGroup, anchor_action, parse_target,
        run_counter,
    };
    use pagefx::effects::anchor::ANCHOR_SELECTOR;
    use pagefx::error::{FxError, Result};
    use pagefx::platform::VisibilityReporter;
    use pagefx::platform::web::{
        AnimationFrameTicker, IntersectionReporter, document, query_all, require_all,
        sibling_indices, viewport_size, window,
    };
    use pagefx::renderer::{FieldAnimation, FieldRenderer};
    use pagefx::sim::ParticleField;

    const CANVAS_ID: &str = "particles-canvas";
    const SETTINGS_ATTRIBUTE: &str = "data-settings";

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"pagefx: logger already set".into());
        }

        log::info!("pagefx starting...");

        let document = match document() {
            Ok(document) => document,
            Err(e) => {
                log::warn!("pagefx disabled: {}", e);
                return;
            }
        };

        let settings = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|canvas| canvas.get_attribute(SETTINGS_ATTRIBUTE))
            .map(|json| Settings::from_json(&json))
            .unwrap_or_else(Settings::enabled);

        // DOM effects first so a slow GPU adapter can't delay them
        if settings.reveal {
            report("Scroll reveal", setup_reveal(&document));
        }
        if settings.counters {
            report("Counters", setup_counters(&document));
        }
        report("Video sound toggle", setup_video_toggle(&document));
        report("Anchor scroll", setup_anchor_scroll(&document));

        if settings.particles {
            report("Particle field", setup_particles(&document, &settings).await);
        }
    }

    /// Log whether an effect came up. A missing page element just means the
    /// page doesn't use that effect.
    fn report(name: &str, result: Result<()>) {
        match result {
            Ok(()) => log::info!("{} active", name),
            Err(e @ FxError::MissingElement(_)) => log::debug!("{} skipped: {}", name, e),
            Err(e) => log::warn!("{} skipped: {}", name, e),
        }
    }

    async fn setup_particles(document: &Document, settings: &Settings) -> Result<()> {
        let window = window()?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| FxError::MissingElement(format!("#{}", CANVAS_ID)))?
            .dyn_into()
            .map_err(|_| FxError::NotACanvas(CANVAS_ID.to_string()))?;

        let dpr = window.device_pixel_ratio() as f32;
        let (width, height) = viewport_size(&window);
        size_canvas(&canvas, width, height, dpr);

        // Prefer WebGPU, fall back to WebGL2
        let has_webgpu = js_sys::Reflect::has(&window.navigator(), &"gpu".into()).unwrap_or(false);
        let backends = if has_webgpu {
            wgpu::Backends::BROWSER_WEBGPU
        } else {
            wgpu::Backends::GL
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| FxError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| FxError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = FieldRenderer::new(
            surface,
            &adapter,
            canvas.width(),
            canvas.height(),
            dpr,
            settings.quality.disc_segments(),
        )
        .await?;

        let seed = js_sys::Date::now() as u64;
        let field = ParticleField::new(width, height, settings, seed);
        log::info!(
            "Field initialized with seed {}: {} particles for {}x{}",
            seed,
            field.particles().len(),
            width,
            height
        );

        let animation = Rc::new(RefCell::new(FieldAnimation::new(field, renderer)));
        setup_resize(&window, canvas, animation.clone());

        // Start animation loop
        pagefx::renderer::scene::start(animation, &AnimationFrameTicker);
        Ok(())
    }

    fn size_canvas(canvas: &HtmlCanvasElement, width: f32, height: f32, dpr: f32) {
        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);
    }

    fn setup_resize(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        animation: Rc<RefCell<FieldAnimation<FieldRenderer>>>,
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio() as f32;
            let (width, height) = viewport_size(&window);
            size_canvas(&canvas, width, height, dpr);
            animation.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reveal(document: &Document) -> Result<()> {
        let elements = Rc::new(require_all(document, REVEAL_SELECTOR)?);
        let reveal = Rc::new(RefCell::new(Reveal::<usize>::new()));
        let options = reveal.borrow().options();

        let mut reporter = {
            let reveal = reveal.clone();
            let elements = elements.clone();
            IntersectionReporter::new(elements.clone(), options, move |entries, reporter| {
                let pending = reveal.borrow_mut().on_entries(
                    entries,
                    |&i| sibling_indices(&elements, i),
                    reporter,
                );
                for p in pending {
                    reveal_later(elements[p.element].clone(), p.delay_ms);
                }
            })?
        };

        reveal.borrow_mut().watch(0..elements.len(), &mut reporter);
        log::debug!("Watching {} reveal targets", elements.len());
        // The observer lives as long as the page
        std::mem::forget(reporter);
        Ok(())
    }

    fn reveal_later(element: Element, delay_ms: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            let _ = element.class_list().add_1(VISIBLE_CLASS);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();
    }

    fn setup_counters(document: &Document) -> Result<()> {
        let counters = Rc::new(require_all(document, COUNTER_SELECTOR)?);
        let container = counters[0]
            .closest(COUNTER_CONTAINER_SELECTOR)?
            .ok_or_else(|| FxError::MissingElement(COUNTER_CONTAINER_SELECTOR.to_string()))?;

        let targets = counters
            .iter()
            .enumerate()
            .map(|(i, el)| {
                let target = el
                    .get_attribute(TARGET_ATTRIBUTE)
                    .map(|raw| parse_target(&raw))
                    .unwrap_or(0);
                (i, target)
            })
            .collect();
        let group = Rc::new(RefCell::new(Counters::new(targets)));
        let options = group.borrow().options();

        let mut reporter = IntersectionReporter::new(
            Rc::new(vec![container]),
            options,
            move |entries, reporter| {
                let started = group.borrow_mut().on_entries(entries, reporter);
                for (i, animation) in started {
                    let el = counters[i].clone();
                    run_counter(&AnimationFrameTicker, animation, move |value| {
                        el.set_text_content(Some(&value.to_string()));
                    });
                }
            },
        )?;
        reporter.observe(&0);
        std::mem::forget(reporter);
        Ok(())
    }

    /// A video and the sound button in its wrapper
    struct SoundSlot {
        video: HtmlMediaElement,
        button: Option<Element>,
    }

    fn setup_video_toggle(document: &Document) -> Result<()> {
        let videos = require_all(document, &format!("{} video", WRAPPER_SELECTOR))?;
        let slots: Rc<Vec<SoundSlot>> = Rc::new(
            videos
                .into_iter()
                .filter_map(|el| {
                    let button = el
                        .closest(WRAPPER_SELECTOR)
                        .ok()
                        .flatten()
                        .and_then(|wrapper| wrapper.query_selector(BUTTON_SELECTOR).ok().flatten());
                    let video = el.dyn_into::<HtmlMediaElement>().ok()?;
                    Some(SoundSlot { video, button })
                })
                .collect(),
        );
        let group = Rc::new(RefCell::new(SoundGroup::new(slots.len())));

        for (index, slot) in slots.iter().enumerate() {
            let Some(button) = &slot.button else {
                continue;
            };
            let slots = slots.clone();
            let group = group.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = group.borrow_mut();
                for (i, slot) in slots.iter().enumerate() {
                    g.sync(i, slot.video.muted());
                }
                for update in g.toggle(index) {
                    let slot = &slots[update.index];
                    slot.video.set_muted(update.muted);
                    if let Some(button) = &slot.button {
                        apply_look(button, update.look);
                    }
                }
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        Ok(())
    }

    fn apply_look(button: &Element, look: ButtonLook) {
        if let Ok(Some(icon)) = button.query_selector("i") {
            icon.set_class_name(look.icon);
        }
        let classes = button.class_list();
        let _ = if look.unmuted_class {
            classes.add_1(UNMUTED_CLASS)
        } else {
            classes.remove_1(UNMUTED_CLASS)
        };
        if let Some(label) = look.label {
            if let Ok(Some(span)) = button.query_selector("span") {
                span.set_text_content(Some(label));
            }
        }
    }

    fn setup_anchor_scroll(document: &Document) -> Result<()> {
        for anchor in query_all(document, ANCHOR_SELECTOR)? {
            let document = document.clone();
            let link = anchor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let href = link.get_attribute("href");
                let AnchorAction::ScrollTo { selector } = anchor_action(href.as_deref()) else {
                    return;
                };
                event.prevent_default();
                if let Ok(Some(target)) = document.query_selector(selector) {
                    let options = web_sys::ScrollIntoViewOptions::new();
                    options.set_behavior(web_sys::ScrollBehavior::Smooth);
                    options.set_block(web_sys::ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                }
            });
            let _ = anchor.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_page::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("pagefx (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to see the page effects");

    run_headless(1440.0, 900.0, 600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate the field for `frames` frames at 60 Hz and log what was drawn
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(width: f32, height: f32, frames: u32) {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pagefx::Settings;
    use pagefx::platform::ManualTicker;
    use pagefx::renderer::{FieldAnimation, RecordingSurface};
    use pagefx::sim::ParticleField;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let field = ParticleField::new(width, height, &Settings::enabled(), seed);
    log::info!(
        "Field initialized with seed {}: {} particles for {}x{}",
        seed,
        field.particles().len(),
        width,
        height
    );

    let animation = Rc::new(RefCell::new(FieldAnimation::new(field, RecordingSurface::default())));
    let ticker = ManualTicker::new();
    pagefx::renderer::scene::start(animation.clone(), &ticker);
    ticker.run(0.0, 1000.0 / 60.0, frames);

    let a = animation.borrow();
    let stats = a.field().stats();
    let frame = &a.surface().last;
    log::info!(
        "{} frames: {} discs, {} links in the last frame",
        a.surface().presented,
        frame.discs.len(),
        stats.links
    );
    println!(
        "pagefx: {} particles, {} links after {} ticks",
        stats.particles, stats.links, stats.ticks
    );
}
