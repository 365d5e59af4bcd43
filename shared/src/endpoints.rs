//! One function per Flowise endpoint: a pure mapping from typed input to a
//! [`RequestConfig`]. Nothing here touches the network.

use std::collections::HashMap;

use serde::Serialize;

use crate::request::{FormData, Method, RequestConfig};
use crate::types::{
    FeedbackInput, FeedbackUpdate, FileDownloadRequest, IncomingInput, LeadCaptureInput,
};

pub const DEFAULT_API_HOST: &str = "http://localhost:3000";

pub const PREDICTION_ROUTE: &str = "/api/v1/prediction/{chatflowid}";
pub const CREATE_FEEDBACK_ROUTE: &str = "/api/v1/feedback/{chatflowid}";
pub const UPDATE_FEEDBACK_ROUTE: &str = "/api/v1/feedback/{id}";
pub const ATTACHMENTS_ROUTE: &str = "/api/v1/attachments/{chatflowid}/{chatId}";
pub const VECTOR_UPSERT_ROUTE: &str = "/api/v1/vector/upsert/{chatflowid}";
pub const CHATBOT_CONFIG_ROUTE: &str = "/api/v1/public-chatbotConfig/{chatflowid}";
pub const STREAMING_ROUTE: &str = "/api/v1/chatflows-streaming/{chatflowid}";
pub const FILE_DOWNLOAD_ROUTE: &str = "/api/v1/openai-assistants-file/download";
pub const LEADS_ROUTE: &str = "/api/v1/leads/";
pub const DOCUMENT_STORE_ROUTE: &str = "/api/v1/document-store/store/{id}";
pub const DOCUMENT_CHUNKS_ROUTE: &str =
    "/api/v1/document-store/chunks/{storeId}/{loaderId}/{pageNo}";

#[derive(thiserror::Error, miette::Diagnostic, Debug)]
pub enum EndpointError {
    #[error("could not fill route template {route}")]
    Template {
        route: &'static str,
        #[source]
        source: strfmt::FmtError,
    },
    #[error(transparent)]
    Serialization(serde_json::Error),
}

/// Host used verbatim when given, no trailing slash handling.
pub fn api_host(host: Option<&str>) -> &str {
    host.unwrap_or(DEFAULT_API_HOST)
}

fn url(host: Option<&str>, route: &'static str, vars: &[(&str, &str)]) -> Result<String, EndpointError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let path = if vars.is_empty() {
        route.to_owned()
    } else {
        strfmt::strfmt(route, &vars).map_err(|source| EndpointError::Template { route, source })?
    };

    Ok(format!("{}{}", api_host(host), path))
}

fn json_body(body: &impl Serialize) -> Result<serde_json::Value, EndpointError> {
    serde_json::to_value(body).map_err(EndpointError::Serialization)
}

pub fn send_message(
    host: Option<&str>,
    chatflowid: &str,
    body: &IncomingInput,
) -> Result<RequestConfig, EndpointError> {
    let url = url(host, PREDICTION_ROUTE, &[("chatflowid", chatflowid)])?;
    Ok(RequestConfig::new(Method::Post, url).json(json_body(body)?))
}

pub fn create_feedback(
    host: Option<&str>,
    chatflowid: &str,
    body: &FeedbackInput,
) -> Result<RequestConfig, EndpointError> {
    let url = url(host, CREATE_FEEDBACK_ROUTE, &[("chatflowid", chatflowid)])?;
    Ok(RequestConfig::new(Method::Post, url).json(json_body(body)?))
}

pub fn update_feedback(
    host: Option<&str>,
    id: &str,
    body: &FeedbackUpdate,
) -> Result<RequestConfig, EndpointError> {
    let url = url(host, UPDATE_FEEDBACK_ROUTE, &[("id", id)])?;
    Ok(RequestConfig::new(Method::Put, url).json(json_body(body)?))
}

/// The form gets a `chatId` text part when it has none, so body and path agree.
pub fn create_attachment(
    host: Option<&str>,
    chatflowid: &str,
    chat_id: &str,
    mut form: FormData,
) -> Result<RequestConfig, EndpointError> {
    let url = url(
        host,
        ATTACHMENTS_ROUTE,
        &[("chatflowid", chatflowid), ("chatId", chat_id)],
    )?;
    if form.text_value("chatId").is_none() {
        form.append_text("chatId", chat_id);
    }
    Ok(RequestConfig::new(Method::Post, url).form(form))
}

pub fn upsert_vector_store(
    host: Option<&str>,
    chatflowid: &str,
    form: FormData,
) -> Result<RequestConfig, EndpointError> {
    let url = url(host, VECTOR_UPSERT_ROUTE, &[("chatflowid", chatflowid)])?;
    Ok(RequestConfig::new(Method::Post, url).form(form))
}

pub fn get_chatbot_config(host: Option<&str>, chatflowid: &str) -> Result<RequestConfig, EndpointError> {
    let url = url(host, CHATBOT_CONFIG_ROUTE, &[("chatflowid", chatflowid)])?;
    Ok(RequestConfig::new(Method::Get, url))
}

pub fn is_stream_available(host: Option<&str>, chatflowid: &str) -> Result<RequestConfig, EndpointError> {
    let url = url(host, STREAMING_ROUTE, &[("chatflowid", chatflowid)])?;
    Ok(RequestConfig::new(Method::Get, url))
}

pub fn download_file(
    host: Option<&str>,
    body: &FileDownloadRequest,
) -> Result<RequestConfig, EndpointError> {
    let url = url(host, FILE_DOWNLOAD_ROUTE, &[])?;
    Ok(RequestConfig::new(Method::Post, url)
        .json(json_body(body)?)
        .blob())
}

pub fn add_lead(host: Option<&str>, body: &LeadCaptureInput) -> Result<RequestConfig, EndpointError> {
    let url = url(host, LEADS_ROUTE, &[])?;
    Ok(RequestConfig::new(Method::Post, url).json(json_body(body)?))
}

pub fn get_document_store(host: Option<&str>, id: &str) -> Result<RequestConfig, EndpointError> {
    let url = url(host, DOCUMENT_STORE_ROUTE, &[("id", id)])?;
    Ok(RequestConfig::new(Method::Get, url))
}

pub fn get_document_chunks(
    host: Option<&str>,
    store_id: &str,
    loader_id: &str,
    page_no: u32,
) -> Result<RequestConfig, EndpointError> {
    let page_no = page_no.to_string();
    let url = url(
        host,
        DOCUMENT_CHUNKS_ROUTE,
        &[
            ("storeId", store_id),
            ("loaderId", loader_id),
            ("pageNo", page_no.as_str()),
        ],
    )?;
    Ok(RequestConfig::new(Method::Get, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{RequestBody, ResponseType};
    use crate::types::FeedbackRating;
    use serde_json::json;

    #[test]
    fn prediction_defaults_to_local_host() {
        let req = send_message(None, "f1", &IncomingInput::question("hi")).unwrap();

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "http://localhost:3000/api/v1/prediction/f1");
        assert_eq!(req.body, RequestBody::Json(json!({ "question": "hi" })));
        assert_eq!(req.response_type, ResponseType::Json);
    }

    #[test]
    fn host_is_used_verbatim() {
        let req = get_chatbot_config(Some("https://flowise.example.com/"), "f1").unwrap();

        assert_eq!(
            req.url,
            "https://flowise.example.com//api/v1/public-chatbotConfig/f1"
        );
    }

    #[test]
    fn document_chunks_fill_every_segment() {
        let req = get_document_chunks(None, "s1", "l1", 2).unwrap();

        assert_eq!(req.method, Method::Get);
        assert_eq!(
            req.url,
            "http://localhost:3000/api/v1/document-store/chunks/s1/l1/2"
        );
        assert_eq!(req.body, RequestBody::Empty);
    }

    #[test]
    fn every_route_maps_to_its_method_and_path() {
        let feedback = FeedbackInput {
            chat_id: "c1".to_owned(),
            message_id: "m1".to_owned(),
            rating: FeedbackRating::ThumbsUp,
            content: None,
        };
        let lead = LeadCaptureInput {
            chatflowid: "f1".to_owned(),
            chat_id: "c1".to_owned(),
            name: None,
            email: Some("a@b.c".to_owned()),
            phone: None,
        };

        let cases = vec![
            (create_feedback(None, "f1", &feedback).unwrap(), Method::Post, "/api/v1/feedback/f1"),
            (
                update_feedback(None, "fb1", &FeedbackUpdate::default()).unwrap(),
                Method::Put,
                "/api/v1/feedback/fb1",
            ),
            (
                create_attachment(None, "f1", "c1", FormData::new()).unwrap(),
                Method::Post,
                "/api/v1/attachments/f1/c1",
            ),
            (
                upsert_vector_store(None, "f1", FormData::new()).unwrap(),
                Method::Post,
                "/api/v1/vector/upsert/f1",
            ),
            (is_stream_available(None, "f1").unwrap(), Method::Get, "/api/v1/chatflows-streaming/f1"),
            (
                download_file(None, &FileDownloadRequest::new("f1", "c1", "out.png")).unwrap(),
                Method::Post,
                "/api/v1/openai-assistants-file/download",
            ),
            (add_lead(None, &lead).unwrap(), Method::Post, "/api/v1/leads/"),
            (get_document_store(None, "s1").unwrap(), Method::Get, "/api/v1/document-store/store/s1"),
        ];

        for (req, method, path) in cases {
            assert_eq!(req.method, method, "{path}");
            assert_eq!(req.url, format!("{DEFAULT_API_HOST}{path}"));
        }
    }

    #[test]
    fn download_asks_for_blob() {
        let req = download_file(None, &FileDownloadRequest::new("f1", "c1", "out.png")).unwrap();

        assert_eq!(req.response_type, ResponseType::Blob);
        assert_eq!(
            req.body,
            RequestBody::Json(json!({
                "question": "",
                "chatflowId": "f1",
                "chatId": "c1",
                "fileName": "out.png"
            }))
        );
    }

    #[test]
    fn attachment_form_gets_chat_id_once() {
        let req = create_attachment(None, "f1", "c1", FormData::new()).unwrap();
        let RequestBody::Form(form) = req.body else {
            panic!("expected form body");
        };
        assert_eq!(form.text_value("chatId"), Some("c1"));

        let req = create_attachment(None, "f1", "c1", FormData::new().text("chatId", "c1")).unwrap();
        let RequestBody::Form(form) = req.body else {
            panic!("expected form body");
        };
        assert_eq!(form.parts().count(), 1);
    }
}
