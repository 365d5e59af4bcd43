pub mod client;
pub mod config;
pub mod endpoints;
pub mod lifecycle;
pub mod request;
pub mod types;

pub use client::{Api, ApiResult, ClientError, ClientTransport, HeaderHook, HookError, RequestHook};
pub use config::{BotConfig, ConfigError, Theme};
pub use endpoints::{EndpointError, DEFAULT_API_HOST};
pub use lifecycle::{
    mount_widget, unmount_widget, Host, Lifecycle, LifecycleError, WidgetHandle, WidgetKind,
};
pub use request::{
    FormData, FormPart, Method, OutgoingBody, OutgoingRequest, RawResponse, RequestBody,
    RequestConfig, ResponsePayload, ResponseType,
};
pub use types::*;
