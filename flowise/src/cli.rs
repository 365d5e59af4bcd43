use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{
    FeedbackInput, FeedbackRating, FeedbackUpdate, FileDownloadRequest, FormData, IncomingInput,
    LeadCaptureInput,
};
use tracing::info;
use uuid::Uuid;

use crate::Config;

#[derive(Parser, Debug)]
#[command(name = "flowise-cli", version, about = "Talk to a Flowise server from the terminal")]
pub struct Cli {
    /// Defaults to $FLOWISE_API_HOST, then http://localhost:3000
    #[arg(long, global = true)]
    pub api_host: Option<String>,

    /// Chat flow API key, defaults to $FLOWISE_API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Up,
    Down,
}

impl From<Rating> for FeedbackRating {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Up => FeedbackRating::ThumbsUp,
            Rating::Down => FeedbackRating::ThumbsDown,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a chat flow a question
    Predict {
        chatflow: String,
        question: String,
        #[arg(long)]
        chat_id: Option<String>,
        /// JSON object merged into the flow's node config
        #[arg(long)]
        override_config: Option<String>,
    },
    /// Rate a bot message
    Feedback {
        chatflow: String,
        #[arg(long)]
        chat_id: String,
        #[arg(long)]
        message_id: String,
        #[arg(long, value_enum)]
        rating: Rating,
        #[arg(long)]
        content: Option<String>,
    },
    UpdateFeedback {
        id: String,
        #[arg(long, value_enum)]
        rating: Option<Rating>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Upload files as chat attachments
    Attach {
        chatflow: String,
        #[arg(long)]
        chat_id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Upsert files into the flow's vector store
    Upsert {
        chatflow: String,
        files: Vec<PathBuf>,
        /// Extra form fields, as key=value
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Print the public chatbot config
    Config { chatflow: String },
    /// Check whether a flow can stream
    Streaming { chatflow: String },
    /// Download a file produced by an assistant flow
    Download {
        chatflow: String,
        file_name: String,
        #[arg(long)]
        chat_id: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Capture a lead for a chat session
    Lead {
        chatflow: String,
        #[arg(long)]
        chat_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show a document store
    Store { id: String },
    /// List one page of a loader's chunks
    Chunks {
        store_id: String,
        loader_id: String,
        #[arg(default_value_t = 1)]
        page: u32,
    },
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    Ok((key.to_owned(), value.to_owned()))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn file_form(form: FormData, field: &str, files: &[PathBuf]) -> Result<FormData> {
    let mut form = form;
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_owned());
        form = form.file(field, file_name, mime_for(path), bytes);
    }
    Ok(form)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn new_chat_id() -> String {
    let id = Uuid::new_v4().to_string();
    info!(chat_id = %id, "generated chat id");
    id
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.api_host, cli.api_key);
    let api = config.api()?;

    match cli.command {
        Command::Predict {
            chatflow,
            question,
            chat_id,
            override_config,
        } => {
            let override_config = override_config
                .map(|raw| serde_json::from_str::<Map<String, Value>>(&raw))
                .transpose()
                .into_diagnostic()
                .wrap_err("--override-config must be a JSON object")?;
            let input = IncomingInput {
                chat_id: Some(chat_id.unwrap_or_else(new_chat_id)),
                override_config,
                ..IncomingInput::question(question)
            };
            print_json(&api.send_message(&chatflow, &input).await?)
        }
        Command::Feedback {
            chatflow,
            chat_id,
            message_id,
            rating,
            content,
        } => {
            let input = FeedbackInput {
                chat_id,
                message_id,
                rating: rating.into(),
                content,
            };
            print_json(&api.create_feedback(&chatflow, &input).await?)
        }
        Command::UpdateFeedback {
            id,
            rating,
            content,
        } => {
            let update = FeedbackUpdate {
                rating: rating.map(Into::into),
                content,
                ..Default::default()
            };
            print_json(&api.update_feedback(&id, &update).await?)
        }
        Command::Attach {
            chatflow,
            chat_id,
            files,
        } => {
            let form = file_form(FormData::new(), "files", &files).await?;
            print_json(&api.create_attachment(&chatflow, &chat_id, form).await?)
        }
        Command::Upsert {
            chatflow,
            files,
            fields,
        } => {
            let mut form = FormData::new();
            for (key, value) in fields {
                form.append_text(key, value);
            }
            let form = file_form(form, "files", &files).await?;
            print_json(&api.upsert_vector_store(&chatflow, form).await?)
        }
        Command::Config { chatflow } => print_json(&api.get_chatbot_config(&chatflow).await?),
        Command::Streaming { chatflow } => print_json(&api.is_stream_available(&chatflow).await?),
        Command::Download {
            chatflow,
            file_name,
            chat_id,
            out,
        } => {
            let request = FileDownloadRequest::new(chatflow, chat_id, file_name);
            let bytes = api.download_file(&request).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("Could not write {}", out.display()))?;
            info!(bytes = bytes.len(), path = %out.display(), "file downloaded");
            Ok(())
        }
        Command::Lead {
            chatflow,
            chat_id,
            name,
            email,
            phone,
        } => {
            let input = LeadCaptureInput {
                chatflowid: chatflow,
                chat_id: chat_id.unwrap_or_else(new_chat_id),
                name,
                email,
                phone,
            };
            print_json(&api.add_lead(&input).await?)
        }
        Command::Store { id } => print_json(&api.get_document_store(&id).await?),
        Command::Chunks {
            store_id,
            loader_id,
            page,
        } => print_json(&api.get_document_chunks(&store_id, &loader_id, page).await?),
    }
}
