pub mod cli;
mod config;
mod transport;

pub use crate::config::{Config, API_HOST_VAR, API_KEY_VAR};
pub use crate::transport::ReqwestTransport;
pub use shared;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub type Api = shared::Api<ReqwestTransport>;
pub type ClientError = shared::ClientError<reqwest::Error>;
