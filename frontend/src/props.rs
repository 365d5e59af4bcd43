use js_sys::{Function, Reflect, JSON};
use serde::Serialize;
use shared::{Api, BotConfig};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use yew::Properties;

use crate::hook::JsRequestHook;
use crate::transport::{AbortSlot, GlooTransport};

/// Callbacks from the page's `observersConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observers {
    pub user_input: Option<Function>,
    pub loading: Option<Function>,
    pub messages: Option<Function>,
}

fn function_at(target: &JsValue, key: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn notify(callback: &Option<Function>, value: &JsValue) {
    if let Some(callback) = callback {
        if let Err(err) = callback.call1(&JsValue::NULL, value) {
            warn!(error = ?err, "observer callback threw");
        }
    }
}

impl Observers {
    pub fn from_js(value: &JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }

        Self {
            user_input: function_at(value, "observeUserInput"),
            loading: function_at(value, "observeLoading"),
            messages: function_at(value, "observeMessages"),
        }
    }

    pub fn user_input(&self, text: &str) {
        notify(&self.user_input, &JsValue::from_str(text));
    }

    pub fn loading(&self, loading: bool) {
        notify(&self.loading, &JsValue::from_bool(loading));
    }

    pub fn messages(&self, messages: &impl Serialize) {
        if self.messages.is_none() {
            return;
        }

        match serde_json::to_string(messages)
            .ok()
            .and_then(|json| JSON::parse(&json).ok())
        {
            Some(value) => notify(&self.messages, &value),
            None => warn!("could not hand messages to observer"),
        }
    }
}

/// Everything a widget component needs.
#[derive(Properties, Debug, Clone, PartialEq)]
pub struct WidgetProps {
    pub config: BotConfig,
    #[prop_or_default]
    pub hook: Option<JsRequestHook>,
    #[prop_or_default]
    pub observers: Observers,
}

impl WidgetProps {
    /// A client for one request. Its hook and transport share an abort slot,
    /// so a signal the page attaches only cancels that request.
    pub fn api(&self) -> Api<GlooTransport> {
        let abort = AbortSlot::default();
        let api = Api::new(GlooTransport::with_abort(abort.clone()))
            .with_api_host(self.config.api_host.clone());
        match &self.hook {
            Some(hook) => api.with_hook(hook.with_abort(abort)),
            None => api,
        }
    }
}

impl AsRef<BotConfig> for WidgetProps {
    fn as_ref(&self) -> &BotConfig {
        &self.config
    }
}

/// The object a page passes to `init`, `initFull` or `initExpertPage`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProps {
    pub id: Option<String>,
    pub widget: WidgetProps,
}

impl PageProps {
    pub fn from_js(value: &JsValue) -> Result<Self, JsValue> {
        if !value.is_object() {
            return Err(js_sys::Error::new("chatbot props must be an object").into());
        }

        // functions are dropped by stringify and picked up below
        let json: String = JSON::stringify(value)?.into();
        let config: BotConfig = serde_json::from_str(&json)
            .map_err(|e| js_sys::Error::new(&format!("invalid chatbot props: {e}")))?;

        let id = Reflect::get(value, &JsValue::from_str("id"))?.as_string();
        let hook = function_at(value, "onRequest").map(JsRequestHook::new);
        let observers =
            Observers::from_js(&Reflect::get(value, &JsValue::from_str("observersConfig"))?);

        Ok(Self {
            id,
            widget: WidgetProps {
                config,
                hook,
                observers,
            },
        })
    }
}
