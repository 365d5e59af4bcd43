use js_sys::Array;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};
use yew::prelude::*;
use yew_hooks::use_effect_once;

/// Fires `on_visible` whenever the target scrolls into view. Disconnects on drop.
pub struct LaunchObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl LaunchObserver {
    pub fn observe(target: &Element, on_visible: impl Fn() + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let visible = entries.iter().any(|entry| {
                entry
                    .unchecked_into::<IntersectionObserverEntry>()
                    .is_intersecting()
            });
            if visible {
                on_visible();
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(target);

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for LaunchObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Turns true once the element behind `root` has been on screen, and stays
/// true. The observer lives as long as the component.
#[hook]
pub fn use_launched(root: NodeRef) -> bool {
    let launched = use_state(|| false);

    {
        let launched = launched.clone();

        use_effect_once(move || {
            let observer = root.cast::<Element>().and_then(|element| {
                LaunchObserver::observe(&element, move || launched.set(true))
                    .map_err(|err| warn!(error = ?err, "could not observe widget element"))
                    .ok()
            });

            move || drop(observer)
        });
    }

    *launched
}
