use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a prediction call. The chat flow id travels in the path.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingInput {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<FileUpload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_config: Option<Map<String, Value>>,
    #[serde(
        rename = "socketIOClientId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub socket_io_client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    /// Only read by the assistant flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl IncomingInput {
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FileUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// `file`, `url` or `audio`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub mime: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ActionMapping>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ActionElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<Value>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ActionElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub json: Option<Value>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub chat_message_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub source_documents: Vec<Value>,
    #[serde(default)]
    pub used_tools: Vec<Value>,
    #[serde(default)]
    pub file_annotations: Vec<Value>,
    #[serde(default)]
    pub agent_reasoning: Vec<Value>,
    #[serde(default)]
    pub artifacts: Vec<Value>,
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRating {
    #[serde(rename = "THUMBS_UP")]
    ThumbsUp,
    #[serde(rename = "THUMBS_DOWN")]
    ThumbsDown,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub chat_id: String,
    pub message_id: String,
    pub rating: FeedbackRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Partial [`FeedbackInput`] for the update call.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<FeedbackRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    #[serde(default)]
    pub chatflowid: Option<String>,
    pub chat_id: String,
    pub message_id: String,
    pub rating: FeedbackRating,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadCaptureInput {
    pub chatflowid: String,
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub chatflowid: String,
    pub chat_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

/// Body of the assistant file download call; `question` is always empty.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileDownloadRequest {
    pub question: String,
    pub chatflow_id: String,
    pub chat_id: String,
    pub file_name: String,
}

impl FileDownloadRequest {
    pub fn new(
        chatflow_id: impl Into<String>,
        chat_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            question: String::new(),
            chatflow_id: chatflow_id.into(),
            chat_id: chat_id.into(),
            file_name: file_name.into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingAvailability {
    pub is_streaming: bool,
}

pub type ChatbotConfig = Map<String, Value>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAttachment {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResult {
    #[serde(default)]
    pub num_added: u64,
    #[serde(default)]
    pub num_deleted: u64,
    #[serde(default)]
    pub num_updated: u64,
    #[serde(default)]
    pub num_skipped: u64,
    #[serde(default)]
    pub added_docs: Vec<Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStoreStatus {
    Empty,
    Sync,
    Syncing,
    Stale,
    New,
    Upserting,
    Upserted,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStore {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON-encoded loader list, as stored by the server.
    #[serde(default)]
    pub loaders: String,
    #[serde(default)]
    pub where_used: String,
    pub status: DocumentStoreStatus,
    #[serde(default)]
    pub vector_store_config: Option<String>,
    #[serde(default)]
    pub embedding_config: Option<String>,
    #[serde(default)]
    pub record_manager_config: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStoreFileChunk {
    pub id: String,
    pub doc_id: String,
    pub store_id: String,
    pub chunk_no: i64,
    pub page_content: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub id: String,
    #[serde(default)]
    pub loader_id: Option<String>,
    #[serde(default)]
    pub loader_name: Option<String>,
    #[serde(default)]
    pub splitter_name: Option<String>,
    #[serde(default)]
    pub total_chunks: Option<u64>,
    #[serde(default)]
    pub total_chars: Option<u64>,
    #[serde(default)]
    pub status: Option<DocumentStoreStatus>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunksPage {
    #[serde(default)]
    pub chunks: Vec<DocumentStoreFileChunk>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub file: Option<DocumentFile>,
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
