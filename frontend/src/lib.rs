//! Browser side of the Flowise embed: yew widgets plus a `Chatbot` class the
//! host page drives.
//!
//! ```js
//! import init, { Chatbot } from './frontend.js';
//! await init();
//! const bot = new Chatbot();
//! bot.initFull({ chatflowid: 'f1', apiHost: 'https://flowise.example.com' });
//! ```

use shared::{Lifecycle, LifecycleError};
use wasm_bindgen::prelude::*;

pub mod components;
mod hook;
mod host;
mod launcher;
mod props;
mod transport;

pub use crate::hook::JsRequestHook;
pub use crate::host::{WebHost, WebMount};
pub use crate::launcher::LaunchObserver;
pub use crate::props::{Observers, PageProps, WidgetProps};
pub use crate::transport::{AbortSlot, GlooTransport, TransportError};

/// Runs once when the module loads: panics and `tracing` events go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // a subscriber may already be installed by the embedding page's bundle
    let _ = tracing_wasm::try_set_as_global_default();
}

fn to_js(err: LifecycleError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Owns at most one mounted widget; every `init*` replaces the previous one.
#[wasm_bindgen]
pub struct Chatbot {
    lifecycle: Lifecycle<WebHost>,
}

#[wasm_bindgen]
impl Chatbot {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Chatbot, JsValue> {
        let host = WebHost::new().map_err(to_js)?;
        Ok(Chatbot {
            lifecycle: Lifecycle::new(host),
        })
    }

    /// Floating bubble appended to the page body.
    pub fn init(&mut self, props: JsValue) -> Result<(), JsValue> {
        let page = PageProps::from_js(&props)?;
        self.lifecycle.init(page.widget).map_err(to_js)
    }

    /// Full-page chat in `<flowise-fullchatbot>` or the element with `props.id`.
    #[wasm_bindgen(js_name = initFull)]
    pub fn init_full(&mut self, props: JsValue) -> Result<(), JsValue> {
        let page = PageProps::from_js(&props)?;
        self.lifecycle
            .init_full(page.widget, page.id.as_deref())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = initExpertPage)]
    pub fn init_expert_page(&mut self, props: JsValue) -> Result<(), JsValue> {
        let page = PageProps::from_js(&props)?;
        self.lifecycle
            .init_expert_page(page.widget, page.id.as_deref())
            .map_err(to_js)
    }

    pub fn destroy(&mut self) {
        self.lifecycle.destroy();
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }
}
