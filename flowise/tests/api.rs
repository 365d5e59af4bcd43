use flowise::shared::{
    ClientError, FeedbackInput, FeedbackRating, FileDownloadRequest, FormData, HeaderHook,
    IncomingInput, LeadCaptureInput,
};
use flowise::Config;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config::new(Some(server.uri()), None)
}

#[tokio::test]
async fn prediction_posts_the_question() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/prediction/f1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "question": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Hello!",
            "question": "hi",
            "chatId": "c1",
            "chatMessageId": "m1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let resp = api
        .send_message("f1", &IncomingInput::question("hi"))
        .await
        .unwrap();

    assert_eq!(resp.text.as_deref(), Some("Hello!"));
    assert_eq!(resp.chat_message_id.as_deref(), Some("m1"));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/document-store/store/s1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let err = api.get_document_store("s1").await.unwrap_err();

    match err {
        ClientError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn api_key_is_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/chatflows-streaming/f1"))
        .and(header("authorization", "Bearer secret"))
        .and(header_regex("user-agent", "^flowise/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isStreaming": false })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Config::new(Some(mock_server.uri()), Some("secret".to_owned()))
        .api()
        .unwrap();
    let streaming = api.is_stream_available("f1").await.unwrap();

    assert!(!streaming.is_streaming);
}

#[tokio::test]
async fn attachments_go_out_as_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/attachments/f1/c1"))
        .and(header_regex("content-type", "^multipart/form-data; boundary=.+"))
        .and(body_string_contains("name=\"chatId\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "notes.txt",
            "mimeType": "text/plain",
            "size": 5,
            "content": "hello"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let form = FormData::new().file("files", "notes.txt", "text/plain", b"hello".to_vec());
    let uploaded = api.create_attachment("f1", "c1", form).await.unwrap();

    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].mime_type, "text/plain");
}

#[tokio::test]
async fn attachment_with_unknown_mime_is_sent_as_octet_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/attachments/f1/c1"))
        .and(body_string_contains("application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let form = FormData::new().file("files", "blob.bin", "not a mime", vec![0, 1, 2]);
    let uploaded = api.create_attachment("f1", "c1", form).await.unwrap();

    assert!(uploaded.is_empty());
}

#[tokio::test]
async fn upsert_sends_form_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/vector/upsert/f1"))
        .and(body_string_contains("legacyBuild"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numAdded": 3,
            "numDeleted": 0,
            "numUpdated": 0,
            "numSkipped": 0,
            "addedDocs": []
        })))
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let form = FormData::new()
        .text("legacyBuild", "true")
        .file("files", "a.md", "text/markdown", b"# A".to_vec());
    let result = api.upsert_vector_store("f1", form).await.unwrap();

    assert_eq!(result.num_added, 3);
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let mock_server = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a];

    Mock::given(method("POST"))
        .and(path("/api/v1/openai-assistants-file/download"))
        .and(body_json(json!({
            "question": "",
            "chatflowId": "f1",
            "chatId": "c1",
            "fileName": "chart.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let bytes = api
        .download_file(&FileDownloadRequest::new("f1", "c1", "chart.png"))
        .await
        .unwrap();

    assert_eq!(bytes, png);
}

#[tokio::test]
async fn feedback_and_lead_bodies_match_the_wire_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/feedback/f1"))
        .and(body_json(json!({
            "chatId": "c1",
            "messageId": "m1",
            "rating": "THUMBS_UP"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "fb1",
            "chatflowid": "f1",
            "chatId": "c1",
            "messageId": "m1",
            "rating": "THUMBS_UP",
            "createdDate": "2024-05-01T12:00:00.000Z"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/leads/"))
        .and(body_json(json!({
            "chatflowid": "f1",
            "chatId": "c1",
            "email": "ada@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "l1",
            "chatflowid": "f1",
            "chatId": "c1",
            "email": "ada@example.com"
        })))
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();

    let feedback = api
        .create_feedback(
            "f1",
            &FeedbackInput {
                chat_id: "c1".to_owned(),
                message_id: "m1".to_owned(),
                rating: FeedbackRating::ThumbsUp,
                content: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(feedback.id, "fb1");

    let lead = api
        .add_lead(&LeadCaptureInput {
            chatflowid: "f1".to_owned(),
            chat_id: "c1".to_owned(),
            name: None,
            email: Some("ada@example.com".to_owned()),
            phone: None,
        })
        .await
        .unwrap();
    assert_eq!(lead.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn document_chunks_page_is_fetched_by_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/document-store/chunks/s1/l1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chunks": [],
            "count": 40,
            "currentPage": 2,
            "storeName": "Docs"
        })))
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server).api().unwrap();
    let page = api.get_document_chunks("s1", "l1", 2).await.unwrap();

    assert_eq!(page.count, 40);
    assert_eq!(page.store_name.as_deref(), Some("Docs"));
}

#[tokio::test]
async fn hook_headers_reach_the_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/public-chatbotConfig/f1"))
        .and(header("x-request-source", "cli-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = config_for(&mock_server)
        .api()
        .unwrap()
        .with_hook(HeaderHook::new().header("X-Request-Source", "cli-test"));
    let config = api.get_chatbot_config("f1").await.unwrap();

    assert!(config.is_empty());
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let api = Config::new(Some("http://127.0.0.1:1".to_owned()), None)
        .api()
        .unwrap();

    let err = api.is_stream_available("f1").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
}
