use std::collections::BTreeMap;
use std::fmt::Debug;
use std::rc::Rc;

use async_trait::async_trait;
use miette::Diagnostic;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::endpoints::{self, EndpointError};
use crate::request::{
    FormData, OutgoingBody, OutgoingRequest, RawResponse, RequestBody, RequestConfig,
    ResponsePayload, ResponseType,
};
use crate::types::{
    ChatbotConfig, DocumentChunksPage, DocumentStore, Feedback, FeedbackInput, FeedbackUpdate,
    FileDownloadRequest, IncomingInput, Lead, LeadCaptureInput, PredictionResponse,
    StreamingAvailability, UploadedAttachment, UpsertResult,
};

/// Sends one prepared request. Implementations do a single attempt with no
/// timeout and report any status code as a [`RawResponse`].
#[async_trait(?Send)]
pub trait ClientTransport {
    type Error: std::error::Error + 'static;

    async fn send_request(&self, request: OutgoingRequest) -> Result<RawResponse, Self::Error>;
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("request aborted by hook: {reason}")]
pub struct HookError {
    pub reason: String,
}

impl HookError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Runs before dispatch and may rewrite the outgoing request in place.
/// Returning an error aborts the request; hooks never see the response.
#[async_trait(?Send)]
pub trait RequestHook {
    async fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), HookError>;
}

/// Inserts a fixed set of headers, overwriting existing values.
#[derive(Debug, Clone, Default)]
pub struct HeaderHook {
    headers: BTreeMap<String, String>,
}

impl HeaderHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[async_trait(?Send)]
impl RequestHook for HeaderHook {
    async fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), HookError> {
        for (name, value) in &self.headers {
            request.headers.insert(name.clone(), value.clone());
        }
        Ok(())
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ClientError<TransportError>
where
    TransportError: Debug + std::error::Error + 'static,
{
    #[error("network error")]
    Network(#[source] TransportError),
    #[error("server answered {status}: {body}")]
    Http { status: u16, body: String },
    #[error(transparent)]
    Request(EndpointError),
    #[error("could not serialize request body")]
    Serialization(#[source] serde_json::Error),
    #[error("could not decode response body")]
    Deserialization(#[source] serde_json::Error),
    #[error(transparent)]
    Aborted(HookError),
}

impl<E> ClientError<E>
where
    E: Debug + std::error::Error + 'static,
{
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl<E> From<EndpointError> for ClientError<E>
where
    E: Debug + std::error::Error + 'static,
{
    fn from(err: EndpointError) -> Self {
        ClientError::Request(err)
    }
}

pub type ApiResult<T, Transport> = Result<T, ClientError<<Transport as ClientTransport>::Error>>;

/// Flowise API client over any [`ClientTransport`].
pub struct Api<T> {
    transport: T,
    api_host: Option<String>,
    hooks: Vec<Rc<dyn RequestHook>>,
}

impl<T: Clone> Clone for Api<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            api_host: self.api_host.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<T> Api<T>
where
    T: ClientTransport,
    T::Error: Debug,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_host: None,
            hooks: vec![],
        }
    }

    pub fn with_api_host(mut self, api_host: Option<String>) -> Self {
        self.api_host = api_host;
        self
    }

    pub fn with_hook(self, hook: impl RequestHook + 'static) -> Self {
        self.with_shared_hook(Rc::new(hook))
    }

    pub fn with_shared_hook(mut self, hook: Rc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn api_host(&self) -> &str {
        endpoints::api_host(self.api_host.as_deref())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    /// Turns a [`RequestConfig`] into the request hooks and transports see.
    /// JSON bodies get `Content-Type: application/json`; forms get no
    /// content type so the transport can add the boundary.
    pub fn prepare(config: RequestConfig) -> ApiResult<OutgoingRequest, T> {
        let RequestConfig {
            method,
            url,
            body,
            mut headers,
            ..
        } = config;

        let body = match body {
            RequestBody::Empty => OutgoingBody::Empty,
            RequestBody::Json(value) => {
                let json = serde_json::to_string(&value).map_err(ClientError::Serialization)?;
                headers.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
                headers.insert("Content-Type".to_owned(), "application/json".to_owned());
                OutgoingBody::Json(json)
            }
            RequestBody::Form(form) => {
                headers.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
                OutgoingBody::Form(form)
            }
        };

        Ok(OutgoingRequest {
            method,
            url,
            headers,
            body,
        })
    }

    pub async fn send(&self, config: RequestConfig) -> ApiResult<ResponsePayload, T> {
        let response_type = config.response_type;
        let mut request = Self::prepare(config)?;

        for hook in &self.hooks {
            hook.before_send(&mut request)
                .await
                .map_err(ClientError::Aborted)?;
        }

        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = self
            .transport
            .send_request(request)
            .await
            .map_err(ClientError::Network)?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(%method, %url, status = response.status, "request failed");
            return Err(ClientError::Http {
                status: response.status,
                body,
            });
        }

        match response_type {
            ResponseType::Blob => Ok(ResponsePayload::Blob(response.body)),
            ResponseType::Json => {
                if response.body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(ResponsePayload::Json(serde_json::Value::Null));
                }
                let value =
                    serde_json::from_slice(&response.body).map_err(ClientError::Deserialization)?;
                Ok(ResponsePayload::Json(value))
            }
        }
    }

    pub async fn send_json<R: DeserializeOwned>(&self, config: RequestConfig) -> ApiResult<R, T> {
        let value = match self.send(config).await? {
            ResponsePayload::Json(value) => value,
            ResponsePayload::Blob(bytes) => {
                serde_json::from_slice(&bytes).map_err(ClientError::Deserialization)?
            }
        };
        serde_json::from_value(value).map_err(ClientError::Deserialization)
    }

    pub async fn send_message(
        &self,
        chatflowid: &str,
        body: &IncomingInput,
    ) -> ApiResult<PredictionResponse, T> {
        let config = endpoints::send_message(self.host(), chatflowid, body)?;
        self.send_json(config).await
    }

    pub async fn create_feedback(
        &self,
        chatflowid: &str,
        body: &FeedbackInput,
    ) -> ApiResult<Feedback, T> {
        let config = endpoints::create_feedback(self.host(), chatflowid, body)?;
        self.send_json(config).await
    }

    pub async fn update_feedback(&self, id: &str, body: &FeedbackUpdate) -> ApiResult<Feedback, T> {
        let config = endpoints::update_feedback(self.host(), id, body)?;
        self.send_json(config).await
    }

    pub async fn create_attachment(
        &self,
        chatflowid: &str,
        chat_id: &str,
        form: FormData,
    ) -> ApiResult<Vec<UploadedAttachment>, T> {
        let config = endpoints::create_attachment(self.host(), chatflowid, chat_id, form)?;
        self.send_json(config).await
    }

    pub async fn upsert_vector_store(
        &self,
        chatflowid: &str,
        form: FormData,
    ) -> ApiResult<UpsertResult, T> {
        let config = endpoints::upsert_vector_store(self.host(), chatflowid, form)?;
        self.send_json(config).await
    }

    pub async fn get_chatbot_config(&self, chatflowid: &str) -> ApiResult<ChatbotConfig, T> {
        let config = endpoints::get_chatbot_config(self.host(), chatflowid)?;
        self.send_json(config).await
    }

    pub async fn is_stream_available(
        &self,
        chatflowid: &str,
    ) -> ApiResult<StreamingAvailability, T> {
        let config = endpoints::is_stream_available(self.host(), chatflowid)?;
        self.send_json(config).await
    }

    pub async fn download_file(&self, body: &FileDownloadRequest) -> ApiResult<Vec<u8>, T> {
        let config = endpoints::download_file(self.host(), body)?;
        match self.send(config).await? {
            ResponsePayload::Blob(bytes) => Ok(bytes),
            ResponsePayload::Json(value) => {
                serde_json::to_vec(&value).map_err(ClientError::Serialization)
            }
        }
    }

    pub async fn add_lead(&self, body: &LeadCaptureInput) -> ApiResult<Lead, T> {
        let config = endpoints::add_lead(self.host(), body)?;
        self.send_json(config).await
    }

    pub async fn get_document_store(&self, id: &str) -> ApiResult<DocumentStore, T> {
        let config = endpoints::get_document_store(self.host(), id)?;
        self.send_json(config).await
    }

    pub async fn get_document_chunks(
        &self,
        store_id: &str,
        loader_id: &str,
        page_no: u32,
    ) -> ApiResult<DocumentChunksPage, T> {
        let config = endpoints::get_document_chunks(self.host(), store_id, loader_id, page_no)?;
        self.send_json(config).await
    }
}
