use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::endpoints;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chatflowid is required")]
    MissingChatflowId,
    #[error("apiHost must start with http:// or https://, got {0:?}")]
    InvalidApiHost(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatWindowTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Widget theme. Only the fields the widget reads are typed, the rest is kept.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_window: Option<ChatWindowTheme>,
    #[serde(rename = "customCSS", default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration handed to a widget when it is mounted.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[serde(default)]
    pub chatflowid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatflow_config: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl BotConfig {
    pub fn new(chatflowid: impl Into<String>) -> Self {
        Self {
            chatflowid: chatflowid.into(),
            ..Default::default()
        }
    }

    pub fn api_host(&self) -> &str {
        endpoints::api_host(self.api_host.as_deref())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chatflowid.trim().is_empty() {
            return Err(ConfigError::MissingChatflowId);
        }

        if let Some(host) = &self.api_host {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return Err(ConfigError::InvalidApiHost(host.clone()));
            }
        }

        Ok(())
    }

    pub fn chat_window(&self) -> Option<&ChatWindowTheme> {
        self.theme.as_ref().and_then(|t| t.chat_window.as_ref())
    }

    pub fn button(&self) -> Option<&ButtonTheme> {
        self.theme.as_ref().and_then(|t| t.button.as_ref())
    }
}

impl AsRef<BotConfig> for BotConfig {
    fn as_ref(&self) -> &BotConfig {
        self
    }
}
