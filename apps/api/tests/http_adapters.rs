//! Outbound HTTP adapter tests
//!
//! The OpenAI client and the search and scrape tools run against a local
//! wiremock server to check headers, bodies and error mapping.

use reqwest::Client;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripcrew_api::agents::imagery::destination_image_request;
use tripcrew_api::agents::messages::{ChatMessage, ChatRequest, ToolDefinition};
use tripcrew_api::agents::{AgentError, ImageGenerator, LanguageModel, Tool};
use tripcrew_api::config::{OpenAiConfig, SerperConfig};
use tripcrew_api::domain::trip::Destination;
use tripcrew_api::infrastructure::openai::OpenAiClient;
use tripcrew_api::infrastructure::tools::{ScrapeWebsiteTool, SerperSearchTool};

fn openai(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(
        Client::new(),
        OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            base_url: format!("{}/v1", server.uri()),
            model: "gpt-test".to_string(),
            image_model: "dall-e-2".to_string(),
        },
    )
}

fn chat_request() -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system("You are Local Expert."),
            ChatMessage::user("Where to eat?"),
        ],
        tools: vec![ToolDefinition {
            name: "web_search".to_string(),
            description: "Search the web".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }],
    }
}

async fn only_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_chat_completion_sends_bearer_and_parses_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "web_search", "arguments": "{\"query\":\"paris\"}"}
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = openai(&server).complete(chat_request()).await.unwrap();

    assert!(response.wants_tools());
    assert_eq!(response.tool_calls[0].name, "web_search");
    assert_eq!(response.tool_calls[0].arguments, r#"{"query":"paris"}"#);

    let body = only_request_body(&server).await;
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Where to eat?");
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "web_search");
}

#[tokio::test]
async fn test_chat_completion_text_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Try the Marais."}}]
        })))
        .mount(&server)
        .await;

    let response = openai(&server).complete(chat_request()).await.unwrap();

    assert!(!response.wants_tools());
    assert_eq!(response.content.as_deref(), Some("Try the Marais."));
}

#[tokio::test]
async fn test_chat_error_envelope_maps_to_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = openai(&server).complete(chat_request()).await.unwrap_err();

    match err {
        AgentError::LlmError(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("expected LlmError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_without_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = openai(&server).complete(chat_request()).await.unwrap_err();

    assert!(matches!(err, AgentError::LlmError(ref m) if m.contains("no choices")));
}

#[tokio::test]
async fn test_image_generation_sends_fixed_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "data": [{"url": "https://images.example/paris.png"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let paris = Destination::new("Paris").unwrap();

    let url = openai(&server)
        .generate(destination_image_request(&paris))
        .await
        .unwrap();

    assert_eq!(url, "https://images.example/paris.png");
    let body = only_request_body(&server).await;
    assert_eq!(body["model"], "dall-e-2");
    assert_eq!(body["n"], 1);
    assert_eq!(body["size"], "1024x1024");
    assert_eq!(body["quality"], "standard");
    assert!(body["prompt"]
        .as_str()
        .unwrap()
        .starts_with("A wide, panoramic, vibrant view of Paris"));
}

#[tokio::test]
async fn test_image_error_envelope_maps_to_image_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Your request was rejected by the safety system."}
        })))
        .mount(&server)
        .await;
    let paris = Destination::new("Paris").unwrap();

    let err = openai(&server)
        .generate(destination_image_request(&paris))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::ImageError(ref m) if m.contains("safety system")));
}

#[tokio::test]
async fn test_image_without_url_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"b64_json": "aGVsbG8="}]})),
        )
        .mount(&server)
        .await;
    let paris = Destination::new("Paris").unwrap();

    let err = openai(&server)
        .generate(destination_image_request(&paris))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::ImageError(ref m) if m.contains("no image URL")));
}

fn serper(server: &MockServer) -> SerperSearchTool {
    SerperSearchTool::new(
        Client::new(),
        SerperConfig {
            api_key: Some("serper-key".to_string()),
            base_url: server.uri(),
        },
    )
}

#[tokio::test]
async fn test_serper_search_sends_key_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "serper-key"))
        .and(body_json(json!({"q": "paris vegetarian", "num": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Le Potager du Marais", "link": "https://example.com/potager", "snippet": "Vegan French"},
                {"title": "Wild & The Moon", "link": "https://example.com/wild"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = serper(&server)
        .invoke(json!({"query": "paris vegetarian"}))
        .await
        .unwrap();

    assert!(text.starts_with("Search results for 'paris vegetarian':"));
    assert!(text.contains("Title: Le Potager du Marais"));
    assert!(text.contains("Link: https://example.com/wild"));
}

#[tokio::test]
async fn test_serper_failure_is_a_tool_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized."))
        .mount(&server)
        .await;

    let err = serper(&server)
        .invoke(json!({"query": "paris"}))
        .await
        .unwrap_err();

    match err {
        AgentError::ToolFailed { tool, message } => {
            assert_eq!(tool, "web_search");
            assert!(message.contains("403"));
            assert!(message.contains("Unauthorized."));
        }
        other => panic!("expected ToolFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_converts_page_to_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Paris Guide</h1><p>Visit the Louvre early.</p></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let text = ScrapeWebsiteTool::new(Client::new(), 1_000)
        .invoke(json!({"website_url": format!("{}/guide", server.uri())}))
        .await
        .unwrap();

    assert!(text.contains("Paris Guide"));
    assert!(text.contains("Visit the Louvre early."));
    assert!(!text.contains("<p>"));
}

#[tokio::test]
async fn test_scrape_non_success_status_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = ScrapeWebsiteTool::new(Client::new(), 1_000)
        .invoke(json!({"website_url": format!("{}/missing", server.uri())}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentError::ToolFailed { ref tool, ref message } if tool == "scrape_website" && message.contains("404")
    ));
}

#[tokio::test]
async fn test_scrape_reads_at_most_the_byte_budget() {
    let server = MockServer::start().await;
    let page = format!("<p>{}</p><p>TAIL</p>", "a".repeat(10_000));
    Mock::given(method("GET"))
        .and(path("/huge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
        .mount(&server)
        .await;

    let text = ScrapeWebsiteTool::new(Client::new(), 100_000)
        .with_max_bytes(1_000)
        .invoke(json!({"website_url": format!("{}/huge", server.uri())}))
        .await
        .unwrap();

    assert!(!text.contains("TAIL"));
    assert!(text.len() < 1_000);
    assert!(text.starts_with("aaaa"));
}
