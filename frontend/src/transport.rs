use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::{Method, Request};
use js_sys::{Array, Uint8Array};
use shared::{ClientTransport, FormData, FormPart, OutgoingBody, OutgoingRequest, RawResponse};
use wasm_bindgen::JsValue;
use web_sys::{AbortSignal, Blob, BlobPropertyBag};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Gloo(#[from] gloo_net::Error),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for TransportError {
    fn from(value: JsValue) -> Self {
        TransportError::Js(js_message(&value))
    }
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Hands the abort signal a request hook attached over to the transport that
/// sends the same request.
#[derive(Debug, Clone, Default)]
pub struct AbortSlot(Rc<RefCell<Option<AbortSignal>>>);

impl AbortSlot {
    pub fn put(&self, signal: AbortSignal) {
        *self.0.borrow_mut() = Some(signal);
    }

    pub fn take(&self) -> Option<AbortSignal> {
        self.0.borrow_mut().take()
    }
}

/// Sends requests with the browser's fetch.
#[derive(Debug, Clone, Default)]
pub struct GlooTransport {
    abort: AbortSlot,
}

impl GlooTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests pick up the signal left in `abort`, if any.
    pub fn with_abort(abort: AbortSlot) -> Self {
        Self { abort }
    }
}

fn browser_form(form: FormData) -> Result<web_sys::FormData, JsValue> {
    let data = web_sys::FormData::new()?;
    for (name, part) in form.into_parts() {
        match part {
            FormPart::Text(value) => data.append_with_str(&name, &value)?,
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
                let mut options = BlobPropertyBag::new();
                options.type_(&mime);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
                data.append_with_blob_and_filename(&name, &blob, &file_name)?;
            }
        }
    }
    Ok(data)
}

#[async_trait::async_trait(?Send)]
impl ClientTransport for GlooTransport {
    type Error = TransportError;

    async fn send_request(&self, request: OutgoingRequest) -> Result<RawResponse, Self::Error> {
        let method = match request.method {
            shared::Method::Get => Method::GET,
            shared::Method::Post => Method::POST,
            shared::Method::Put => Method::PUT,
        };

        let mut req = Request::new(&request.url).method(method);
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        if let Some(signal) = self.abort.take() {
            req = req.abort_signal(Some(&signal));
        }

        // the browser sets the multipart boundary for FormData bodies
        let req = match request.body {
            OutgoingBody::Empty => req,
            OutgoingBody::Json(json) => req.body(json),
            OutgoingBody::Form(form) => req.body(browser_form(form)?),
        };

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.binary().await?;

        Ok(RawResponse { status, body })
    }
}
