use miette::{Context, IntoDiagnostic, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use shared::Api;

use crate::transport::ReqwestTransport;
use crate::APP_USER_AGENT;

pub const API_HOST_VAR: &str = "FLOWISE_API_HOST";
pub const API_KEY_VAR: &str = "FLOWISE_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct Config {
    api_host: Option<String>,
    api_key: Option<String>,
}

fn optional_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not read {name} env var")),
    }
}

impl Config {
    pub fn new(api_host: Option<String>, api_key: Option<String>) -> Self {
        Self { api_host, api_key }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_host: optional_var(API_HOST_VAR)?,
            api_key: optional_var(API_KEY_VAR)?,
        })
    }

    /// Values given here win over the ones read from the environment.
    pub fn with_overrides(self, api_host: Option<String>, api_key: Option<String>) -> Self {
        Self {
            api_host: api_host.or(self.api_host),
            api_key: api_key.or(self.api_key),
        }
    }

    pub fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    pub fn client(&self) -> Result<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(api_key) = &self.api_key {
            let value = format!("Bearer {api_key}");
            let mut value = HeaderValue::from_str(&value)
                .into_diagnostic()
                .wrap_err("Could not create header value")?;
            value.set_sensitive(true);

            headers.insert(AUTHORIZATION, value);
        }

        reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")
    }

    pub fn api(&self) -> Result<Api<ReqwestTransport>> {
        let transport = ReqwestTransport(self.client()?);
        Ok(Api::new(transport).with_api_host(self.api_host.clone()))
    }
}
