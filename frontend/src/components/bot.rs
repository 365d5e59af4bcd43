use serde::Serialize;
use shared::{BotConfig, FeedbackInput, FeedbackRating, IncomingInput};
use tracing::warn;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::props::WidgetProps;

const DEFAULT_ERROR_MESSAGE: &str = "Oops! There seems to be an error. Please try again.";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "userMessage")]
    User,
    #[serde(rename = "apiMessage")]
    Bot,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(rename = "message")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl ChatEntry {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            message_id: None,
        }
    }

    fn bot(text: impl Into<String>, message_id: Option<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            message_id,
        }
    }
}

fn opening_messages(config: &BotConfig) -> Vec<ChatEntry> {
    config
        .chat_window()
        .and_then(|w| w.welcome_message.clone())
        .map(|welcome| vec![ChatEntry::bot(welcome, None)])
        .unwrap_or_default()
}

fn error_message(config: &BotConfig) -> String {
    config
        .chat_window()
        .and_then(|w| w.error_message.clone())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned())
}

#[derive(Properties, PartialEq)]
pub struct BotProps {
    pub widget: WidgetProps,
    #[prop_or(false)]
    pub full_page: bool,
}

fn render_entry(entry: &ChatEntry, on_feedback: &Callback<(String, FeedbackRating)>) -> Html {
    let class = match entry.role {
        Role::User => "flowise-bot__user",
        Role::Bot => "flowise-bot__reply",
    };

    let feedback = match (entry.role, &entry.message_id) {
        (Role::Bot, Some(id)) => {
            let up = {
                let on_feedback = on_feedback.clone();
                let id = id.clone();
                move |_: MouseEvent| on_feedback.emit((id.clone(), FeedbackRating::ThumbsUp))
            };
            let down = {
                let on_feedback = on_feedback.clone();
                let id = id.clone();
                move |_: MouseEvent| on_feedback.emit((id.clone(), FeedbackRating::ThumbsDown))
            };
            html! {
                <span class="flowise-bot__feedback">
                    <button onclick={up}>{ "👍" }</button>
                    <button onclick={down}>{ "👎" }</button>
                </span>
            }
        }
        _ => html! {},
    };

    html! {
        <div class={class}>
            <p>{ entry.text.clone() }</p>
            { feedback }
        </div>
    }
}

#[function_component]
pub fn Bot(props: &BotProps) -> Html {
    let textarea_ref = use_node_ref();
    let chat_id = use_state(|| Uuid::new_v4().to_string());
    let messages = use_state(|| opening_messages(&props.widget.config));
    let loading = use_state(|| false);

    let onclick = {
        let textarea_ref = textarea_ref.clone();
        let chat_id = chat_id.clone();
        let messages = messages.clone();
        let loading = loading.clone();
        let widget = props.widget.clone();

        move |_: MouseEvent| {
            let Some(textarea) = textarea_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            let question = textarea.value();
            if question.trim().is_empty() || *loading {
                return;
            }
            textarea.set_value("");

            widget.observers.user_input(&question);
            let mut history = (*messages).clone();
            history.push(ChatEntry::user(question.clone()));
            messages.set(history.clone());
            loading.set(true);
            widget.observers.loading(true);

            let input = IncomingInput {
                chat_id: Some((*chat_id).clone()),
                override_config: widget.config.chatflow_config.clone(),
                ..IncomingInput::question(question)
            };
            let messages = messages.clone();
            let loading = loading.clone();
            let widget = widget.clone();

            spawn_local(async move {
                let reply = match widget
                    .api()
                    .send_message(&widget.config.chatflowid, &input)
                    .await
                {
                    Ok(resp) => ChatEntry::bot(resp.text.unwrap_or_default(), resp.chat_message_id),
                    Err(err) => {
                        warn!(error = %err, "prediction failed");
                        ChatEntry::bot(error_message(&widget.config), None)
                    }
                };

                history.push(reply);
                widget.observers.messages(&history);
                messages.set(history);
                loading.set(false);
                widget.observers.loading(false);
            });
        }
    };

    let on_feedback = {
        let chat_id = chat_id.clone();
        let widget = props.widget.clone();

        Callback::from(move |(message_id, rating): (String, FeedbackRating)| {
            let input = FeedbackInput {
                chat_id: (*chat_id).clone(),
                message_id,
                rating,
                content: None,
            };
            let widget = widget.clone();

            spawn_local(async move {
                if let Err(err) = widget
                    .api()
                    .create_feedback(&widget.config.chatflowid, &input)
                    .await
                {
                    warn!(error = %err, "feedback failed");
                }
            });
        })
    };

    let config = &props.widget.config;
    let custom_css = config.theme.as_ref().and_then(|t| t.custom_css.clone());
    let title = config
        .chat_window()
        .filter(|w| w.show_title != Some(false))
        .and_then(|w| w.title.clone());

    html! {
        <div class={classes!("flowise-bot", props.full_page.then_some("flowise-bot--full"))}>
            if let Some(css) = custom_css {
                <style>{ css }</style>
            }
            if let Some(title) = title {
                <div class="flowise-bot__title">{ title }</div>
            }
            <div class="flowise-bot__messages">
                { for messages.iter().map(|entry| render_entry(entry, &on_feedback)) }
                if *loading {
                    <div class="flowise-bot__loading">{ "…" }</div>
                }
            </div>
            <textarea ref={textarea_ref} placeholder="Type your question" rows=3 />
            <button {onclick} disabled={*loading}>{ "Send" }</button>
        </div>
    }
}
