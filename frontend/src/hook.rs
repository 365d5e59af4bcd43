use std::collections::BTreeMap;

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use shared::{HookError, OutgoingRequest, RequestHook};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::AbortSignal;

use crate::transport::{js_message, AbortSlot};

/// The page's `onRequest` callback.
///
/// It is called with `{ method, url, headers }` and may edit `url` and
/// `headers` in place (a plain object, a `Headers` instance or any iterable of
/// pairs), or set `signal` to an `AbortSignal` to cancel the request later.
/// It may return a promise. Throwing or rejecting aborts the request.
#[derive(Debug, Clone)]
pub struct JsRequestHook {
    function: Function,
    abort: AbortSlot,
}

impl PartialEq for JsRequestHook {
    fn eq(&self, other: &Self) -> bool {
        self.function == other.function
    }
}

impl JsRequestHook {
    pub fn new(function: Function) -> Self {
        Self {
            function,
            abort: AbortSlot::default(),
        }
    }

    /// Same callback, handing any signal it attaches to `abort`.
    pub fn with_abort(&self, abort: AbortSlot) -> Self {
        Self {
            function: self.function.clone(),
            abort,
        }
    }
}

fn abort(err: JsValue) -> HookError {
    HookError::new(js_message(&err))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), HookError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(abort)
}

fn get(target: &Object, key: &str) -> Result<JsValue, HookError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(abort)
}

fn insert_pair(headers: &mut BTreeMap<String, String>, pair: &JsValue) {
    let pair = Array::from(pair);
    if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
        headers.insert(name, value);
    }
}

/// Reads whatever the hook left in `headers`. `None` means there was no header
/// bag to read, so the request keeps its own headers.
fn read_headers(value: &JsValue) -> Result<Option<BTreeMap<String, String>>, HookError> {
    if !value.is_object() {
        return Ok(None);
    }

    let mut headers = BTreeMap::new();
    match js_sys::try_iter(value).map_err(abort)? {
        // Headers, Map and arrays of pairs
        Some(entries) => {
            for entry in entries {
                insert_pair(&mut headers, &entry.map_err(abort)?);
            }
        }
        None => {
            for entry in Object::entries(value.unchecked_ref::<Object>()).iter() {
                insert_pair(&mut headers, &entry);
            }
        }
    }

    Ok(Some(headers))
}

#[async_trait(?Send)]
impl RequestHook for JsRequestHook {
    async fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), HookError> {
        self.abort.take();

        let headers = Object::new();
        for (name, value) in &request.headers {
            set(&headers, name, &JsValue::from_str(value))?;
        }

        let init = Object::new();
        set(&init, "method", &JsValue::from_str(request.method.as_str()))?;
        set(&init, "url", &JsValue::from_str(&request.url))?;
        set(&init, "headers", &headers)?;

        let returned = self.function.call1(&JsValue::NULL, &init).map_err(abort)?;
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(abort)?;

        if let Some(url) = get(&init, "url")?.as_string() {
            request.url = url;
        }

        if let Some(headers) = read_headers(&get(&init, "headers")?)? {
            request.headers = headers;
        }

        if let Ok(signal) = get(&init, "signal")?.dyn_into::<AbortSignal>() {
            self.abort.put(signal);
        }

        Ok(())
    }
}
