mod common;

use async_trait::async_trait;
use common::mock_messages_api::{MockMessagesApi, MockResponse};
use common::serve;
use mailbrief::background::{
    AnthropicSummarizer, BackgroundAgent, InputPolicy, Summarize, SummarizeError,
    OUTPUT_TRUNCATED_NOTICE,
};
use mailbrief::config::{
    ApiConfig, ApiKey, Config, CredentialStore, MemoryCredentialStore, SecureString,
};
use mailbrief::ipc::SummaryResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const KEY: &str = "sk-ant-test-key";

/// Summarizer that records calls instead of going to the network.
#[derive(Default)]
struct CountingSummarizer {
    calls: AtomicUsize,
    last_len: AtomicUsize,
}

#[async_trait]
impl Summarize for CountingSummarizer {
    async fn summarize(
        &self,
        _api_key: &SecureString,
        email_text: &str,
    ) -> Result<String, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_len
            .store(email_text.chars().count(), Ordering::SeqCst);
        Ok("summary".to_string())
    }
}

fn keyed_store() -> Arc<dyn CredentialStore> {
    Arc::new(MemoryCredentialStore::with_key(ApiKey::parse(KEY).unwrap()))
}

fn agent_with(summarizer: Arc<CountingSummarizer>) -> BackgroundAgent {
    BackgroundAgent::new(InputPolicy::default(), keyed_store(), summarizer)
}

fn api_config(base_url: String) -> Config {
    Config {
        api: ApiConfig {
            base_url,
            model: "test-model".to_string(),
            max_tokens: 256,
            timeout_seconds: 5,
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn oversized_input_is_rejected_without_a_call() {
    let summarizer = Arc::new(CountingSummarizer::default());
    let client = serve(Arc::new(agent_with(summarizer.clone())));

    let result = client.summarize("x".repeat(150_000)).await.unwrap();

    match result {
        SummaryResult::Failure { message } => {
            assert!(message.contains("150,000"), "unexpected message: {message}");
            assert!(message.contains("120,000"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn large_input_is_truncated_and_flagged() {
    let summarizer = Arc::new(CountingSummarizer::default());
    let client = serve(Arc::new(agent_with(summarizer.clone())));

    let result = client.summarize("é".repeat(110_000)).await.unwrap();

    assert_eq!(result, SummaryResult::success("summary", true));
    assert_eq!(summarizer.last_len.load(Ordering::SeqCst), 100_000);
}

#[tokio::test]
async fn empty_input_is_rejected() {
    let summarizer = Arc::new(CountingSummarizer::default());
    let agent = agent_with(summarizer.clone());

    let err = agent.summarize_text("  \n ").await.unwrap_err();

    assert_eq!(err.user_message(), "No email content provided.");
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_key_is_reported() {
    let summarizer = Arc::new(CountingSummarizer::default());
    let agent = BackgroundAgent::new(
        InputPolicy::default(),
        Arc::new(MemoryCredentialStore::new()),
        summarizer.clone(),
    );

    let err = agent.summarize_text("Hello").await.unwrap_err();

    assert!(matches!(err, SummarizeError::NotConfigured));
    assert_eq!(
        err.user_message(),
        "No API key configured. Click the extension icon to set your key."
    );
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sends_one_messages_request() {
    let api = MockMessagesApi::start().await;
    api.enqueue_response(MockResponse::message("**Summary**\nAll fine", "end_turn"))
        .await;
    let agent = BackgroundAgent::from_config(&api_config(api.base_url()), keyed_store()).unwrap();

    let (summary, truncated) = agent.summarize_text("Meeting at noon").await.unwrap();

    assert_eq!(summary, "**Summary**\nAll fine");
    assert!(!truncated);

    let requests = api.captured_requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/v1/messages");
    assert_eq!(request.header("x-api-key"), Some(KEY));
    assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));

    let body = request.json();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["max_tokens"], 256);
    let content = body["messages"][0]["content"].as_str().unwrap();
    assert!(content.ends_with("Meeting at noon"));
}

#[tokio::test]
async fn token_limited_output_gets_notice() {
    let api = MockMessagesApi::start().await;
    api.enqueue_response(MockResponse::message("Partial summary", "max_tokens"))
        .await;
    let agent = BackgroundAgent::from_config(&api_config(api.base_url()), keyed_store()).unwrap();

    let (summary, _) = agent.summarize_text("Long email").await.unwrap();

    assert!(summary.ends_with(OUTPUT_TRUNCATED_NOTICE));
    assert_eq!(
        summary,
        "Partial summary\n\n(Summary was truncated due to length.)"
    );
}

#[tokio::test]
async fn http_statuses_map_to_user_messages() {
    let cases = [
        (401, "Invalid API key. Check your key in the extension settings."),
        (403, "Access denied. Your API key may lack permissions for this model."),
        (429, "Rate limit exceeded. Wait a moment and try again."),
        (529, "Claude is temporarily overloaded. Try again in a few seconds."),
        (500, "API error (500). Please try again."),
    ];

    for (status, expected) in cases {
        let api = MockMessagesApi::start().await;
        api.enqueue_response(MockResponse::error(status, "upstream"))
            .await;
        let client = serve(Arc::new(
            BackgroundAgent::from_config(&api_config(api.base_url()), keyed_store()).unwrap(),
        ));

        let result = client.summarize("Hello".to_string()).await.unwrap();

        assert_eq!(result, SummaryResult::failure(expected), "status {status}");
    }
}

#[tokio::test]
async fn empty_api_content_is_reported() {
    let api = MockMessagesApi::start().await;
    api.enqueue_response(MockResponse::empty()).await;
    let agent = BackgroundAgent::from_config(&api_config(api.base_url()), keyed_store()).unwrap();

    let err = agent.summarize_text("Hello").await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "Received an empty response from Claude. Please try again."
    );
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let summarizer =
        AnthropicSummarizer::new(api_config(format!("http://{addr}")).api).unwrap();
    let key = SecureString::new(KEY.to_string());

    let err = summarizer.summarize(&key, "Hello").await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "Network error. Check your internet connection."
    );
}
