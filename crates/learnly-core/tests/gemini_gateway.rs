use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use learnly_core::config::GeminiGatewayConfig;
use learnly_core::image::{HttpImageFetcher, ImageFetchError, ImageFetcher};
use learnly_core::llm::{AssistantClient, GatewayError, GeminiGateway};
use learnly_core::models::ChatTurn;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

#[derive(Debug, Clone)]
struct MockReply {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Clone)]
struct SeenRequest {
    model_action: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Debug, Clone)]
struct TestServerState {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl TestServerState {
    fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[tokio::test]
async fn chat_turn_carries_history_instruction_and_api_key() {
    let state = TestServerState::with_replies(vec![ok_reply(text_body("UX is user experience."))]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let client = client_for(&base_url);
    let history = vec![
        ChatTurn::model("Hi! I am Learnly AI. How can I help you learn today?"),
        ChatTurn::user("Hello"),
        ChatTurn::model("Hi there"),
    ];
    let reply = client
        .send_chat_turn(&history, "What is UX?")
        .await
        .expect("chat should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(reply, "UX is user experience.");

    let seen = state.seen.lock().await.clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model_action, "gemini-3-pro-preview:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("test-gemini-key"));

    let body = &seen[0].body;
    let contents = body["contents"].as_array().expect("contents array");
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0]["role"], "model");
    assert_eq!(contents[1]["role"], "user");
    assert_eq!(contents[3], json!({ "role": "user", "parts": [{ "text": "What is UX?" }] }));
    assert!(
        body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .is_some_and(|text| text.contains("encouraging AI learning assistant"))
    );
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn chat_turn_answers_with_fallback_when_provider_fails() {
    let state = TestServerState::with_replies(vec![provider_error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
    )]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let reply = client_for(&base_url)
        .send_chat_turn(&[], "hello")
        .await
        .expect("chat failures are swallowed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(
        reply,
        "Sorry, I'm having trouble connecting to the AI right now."
    );
}

#[tokio::test]
async fn study_plan_sends_thinking_budget_and_propagates_failures() {
    let state = TestServerState::with_replies(vec![
        ok_reply(text_body("Monday: HTML")),
        provider_error_reply(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED"),
    ]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let client = client_for(&base_url);
    let plan = client
        .generate_plan("Rust")
        .await
        .expect("first plan should succeed");
    let err = client
        .generate_plan("Rust")
        .await
        .expect_err("second plan should fail");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(plan, "Monday: HTML");
    assert!(
        matches!(err, GatewayError::ProviderFailure(ref message)
            if message.contains("status=429") && message.contains("RESOURCE_EXHAUSTED")),
        "expected structured provider error, got {err:?}"
    );

    let seen = state.seen.lock().await.clone();
    assert_eq!(
        seen[0].body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        32_768
    );
    assert!(
        seen[0].body["contents"][0]["parts"][0]["text"]
            .as_str()
            .is_some_and(|prompt| prompt.contains("wants to learn: Rust."))
    );
}

#[tokio::test]
async fn unparsable_success_body_is_an_invalid_payload() {
    let state = TestServerState::with_replies(vec![MockReply {
        status: StatusCode::OK,
        body: "not-json".to_string(),
    }]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state).await;

    let err = client_for(&base_url)
        .generate_plan("Go")
        .await
        .expect_err("invalid json should fail");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(
        err,
        GatewayError::InvalidProviderPayload("response_json_parse_failed".to_string())
    );
}

#[tokio::test]
async fn search_enables_grounding_and_keeps_web_sources_in_order() {
    let state = TestServerState::with_replies(vec![ok_reply(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "Latest AI trends." }] },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://a.example/trends", "title": "a.example" } },
                    { "retrievedContext": { "uri": "gs://bucket/doc" } },
                    { "web": { "uri": "https://b.example/report" } }
                ]
            }
        }]
    }))]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let result = client_for(&base_url)
        .search_topic("AI trends")
        .await
        .expect("search should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(result.text, "Latest AI trends.");
    assert_eq!(result.sources.len(), 2);
    assert_eq!(result.sources[0].uri, "https://a.example/trends");
    assert_eq!(result.sources[0].title.as_deref(), Some("a.example"));
    assert_eq!(result.sources[1].uri, "https://b.example/report");
    assert_eq!(result.sources[1].title, None);

    let seen = state.seen.lock().await.clone();
    assert_eq!(seen[0].model_action, "gemini-2.5-flash:generateContent");
    assert_eq!(seen[0].body["tools"], json!([{ "googleSearch": {} }]));
}

#[tokio::test]
async fn search_without_metadata_has_no_sources_and_failures_fall_back() {
    let state = TestServerState::with_replies(vec![
        ok_reply(text_body("Plain answer")),
        provider_error_reply(StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
    ]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state).await;

    let client = client_for(&base_url);
    let plain = client.search_topic("topic").await.expect("plain search");
    let failed = client.search_topic("topic").await.expect("fallback search");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(plain.text, "Plain answer");
    assert!(plain.sources.is_empty());
    assert_eq!(failed.text, "Error performing search.");
    assert!(failed.sources.is_empty());
}

#[tokio::test]
async fn image_edit_strips_data_uri_prefix_and_reprefixes_result() {
    let state = TestServerState::with_replies(vec![
        ok_reply(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Done." },
                        { "inlineData": { "mimeType": "image/png", "data": "RURJVEVE" } }
                    ]
                }
            }]
        })),
        ok_reply(text_body("I can only describe images.")),
    ]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let client = client_for(&base_url);
    let edited = client
        .edit_image("data:image/png;base64,T1JJR0lOQUw=", "make it neon")
        .await
        .expect("edit should succeed");
    let missing = client
        .edit_image("T1JJR0lOQUw=", "make it neon")
        .await
        .expect("textual answer is not an error");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(edited.as_deref(), Some("data:image/png;base64,RURJVEVE"));
    assert_eq!(missing, None);

    let seen = state.seen.lock().await.clone();
    assert_eq!(seen[0].model_action, "gemini-2.5-flash-image:generateContent");
    for request in &seen {
        let parts = &request.body["contents"][0]["parts"];
        assert_eq!(
            parts[0],
            json!({ "inlineData": { "mimeType": "image/png", "data": "T1JJR0lOQUw=" } })
        );
        assert_eq!(
            parts[1]["text"],
            "Edit this image: make it neon. Return the image only."
        );
    }
}

#[tokio::test]
async fn image_edit_propagates_provider_failures() {
    let state = TestServerState::with_replies(vec![provider_error_reply(
        StatusCode::BAD_REQUEST,
        "INVALID_ARGUMENT",
    )]);
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state).await;

    let err = client_for(&base_url)
        .edit_image("AAAA", "sepia")
        .await
        .expect_err("provider failure should propagate");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(
        err,
        GatewayError::ProviderFailure("status=400 status_text=INVALID_ARGUMENT".to_string())
    );
}

#[tokio::test]
async fn http_fetcher_reads_remote_bytes_and_content_type() {
    let state = TestServerState::with_replies(Vec::new());
    let (base_url, shutdown_tx, server_task) = spawn_test_server(state).await;
    let origin = base_url.trim_end_matches("/v1beta");

    let fetcher =
        HttpImageFetcher::new(Some(Duration::from_secs(5))).expect("fetcher should build");
    let image = fetcher
        .fetch(&format!("{origin}/images/thumb.jpg"))
        .await
        .expect("image should download");
    let missing = fetcher
        .fetch(&format!("{origin}/images/missing.jpg"))
        .await
        .expect_err("missing image should fail");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.bytes, b"jpeg-bytes");
    assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,anBlZy1ieXRlcw==");
    assert_eq!(missing, ImageFetchError::Status(404));
}

#[tokio::test]
async fn http_fetcher_decodes_data_uris_without_network() {
    let fetcher = HttpImageFetcher::new(None).expect("fetcher should build");

    let image = fetcher
        .fetch("data:image/png;base64,anBlZy1ieXRlcw==")
        .await
        .expect("data uri should decode");
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.bytes, b"jpeg-bytes");

    let err = fetcher
        .fetch("file:///etc/passwd")
        .await
        .expect_err("file urls are not supported");
    assert!(matches!(err, ImageFetchError::InvalidLocator(_)));
}

fn client_for(base_url: &str) -> AssistantClient {
    let gateway = GeminiGateway::new(GeminiGatewayConfig {
        api_base_url: base_url.to_string(),
        api_key: "test-gemini-key".to_string(),
        timeout_ms: None,
    })
    .expect("gateway should build");
    AssistantClient::new(Arc::new(gateway))
}

fn text_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "modelVersion": "test-model"
    })
}

fn ok_reply(body: Value) -> MockReply {
    MockReply {
        status: StatusCode::OK,
        body: body.to_string(),
    }
}

fn provider_error_reply(status: StatusCode, provider_status: &str) -> MockReply {
    MockReply {
        status,
        body: json!({
            "error": {
                "code": status.as_u16(),
                "message": "mock provider error",
                "status": provider_status
            }
        })
        .to_string(),
    }
}

async fn spawn_test_server(
    state: TestServerState,
) -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(test_generate_handler))
        .route("/images/{name}", get(test_image_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let local_addr = listener
        .local_addr()
        .expect("listener address should resolve");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        server.await.expect("test server should run");
    });

    (format!("http://{local_addr}/v1beta"), shutdown_tx, server_task)
}

async fn test_generate_handler(
    State(state): State<TestServerState>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    state.seen.lock().await.push(SeenRequest {
        model_action,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string),
        body: payload,
    });

    let reply = state.replies.lock().await.pop_front().unwrap_or(MockReply {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: json!({ "error": { "status": "EXHAUSTED_TEST_REPLIES" } }).to_string(),
    });

    (
        reply.status,
        [(CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

async fn test_image_handler(Path(name): Path<String>) -> impl IntoResponse {
    if name == "thumb.jpg" {
        (
            StatusCode::OK,
            [(CONTENT_TYPE, "image/jpeg")],
            b"jpeg-bytes".to_vec(),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "text/plain")],
            b"missing".to_vec(),
        )
    }
}
