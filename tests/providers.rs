// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Integration tests for AI providers.
//!
//! Uses `wiremock` to mock HTTP endpoints so no real backends are needed.

mod helpers;

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commitgen::config::{Config, Provider};
use commitgen::domain::CommitType;
use commitgen::error::Error;
use commitgen::services::providers::anthropic::AnthropicProvider;
use commitgen::services::providers::deepseek::DeepSeekProvider;
use commitgen::services::providers::gemini::GeminiProvider;
use commitgen::services::providers::ollama::OllamaProvider;
use commitgen::services::providers::openai::OpenAiProvider;
use commitgen::services::providers::openrouter::OpenRouterProvider;
use commitgen::services::providers::{AiProvider, create_provider};

use helpers::sample_diff;

// ─── Config helpers ──────────────────────────────────────────────────────────

fn openrouter_config(server_url: &str) -> Config {
    Config {
        provider: Provider::OpenRouter,
        model: "openai/gpt-4o-mini".into(),
        api_key: Some("sk-or-v1-test-key".into()),
        openrouter_base_url: Some(server_url.to_string()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn openai_config(server_url: &str) -> Config {
    Config {
        provider: Provider::OpenAI,
        model: "gpt-4o-mini".into(),
        api_key: Some("sk-test-key".into()),
        openai_base_url: Some(server_url.to_string()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn anthropic_config(server_url: &str) -> Config {
    Config {
        provider: Provider::Anthropic,
        model: "claude-3-haiku".into(),
        api_key: Some("sk-ant-test-key".into()),
        anthropic_base_url: Some(server_url.to_string()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn gemini_config(server_url: &str) -> Config {
    Config {
        provider: Provider::Gemini,
        model: "gemini-2.0-flash-001".into(),
        api_key: Some("g-test-key".into()),
        gemini_base_url: Some(server_url.to_string()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn deepseek_config(server_url: &str) -> Config {
    Config {
        provider: Provider::DeepSeek,
        model: "deepseek-chat".into(),
        api_key: Some("sk-ds-test-key".into()),
        deepseek_base_url: Some(server_url.to_string()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn ollama_config(server_url: &str) -> Config {
    Config {
        provider: Provider::Ollama,
        model: "qwen2.5:7b".into(),
        ollama_host: server_url.to_string(),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn chat_completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

// ─── Model format validation (OpenRouter, at construction) ───────────────────

#[test]
fn model_format_accepts_valid_identifiers() {
    for model in [
        "openai/gpt-4o",
        "anthropic/claude-3-5-sonnet",
        "mistral/mistral-tiny",
        "google/gemini-2.0-flash-exp",
    ] {
        let config = Config {
            model: model.into(),
            ..openrouter_config("http://localhost:1")
        };
        assert!(
            OpenRouterProvider::new(&config).is_ok(),
            "expected {model:?} to be accepted"
        );
    }
}

#[test]
fn model_format_rejects_invalid_identifiers() {
    for model in [
        "gpt-4o",
        "openai/",
        "/gpt-4o",
        "OpenAI/GPT-4O",
        "openai gpt-4o",
        "",
    ] {
        let config = Config {
            model: model.into(),
            ..openrouter_config("http://localhost:1")
        };
        let result = OpenRouterProvider::new(&config);
        assert!(
            matches!(result, Err(Error::Config(_))),
            "expected {model:?} to be rejected at construction"
        );
    }
}

proptest! {
    #[test]
    fn model_format_accepts_generated_valid(model in "[a-z0-9-]{1,12}/[a-z0-9.-]{1,16}") {
        let config = Config { model, ..openrouter_config("http://localhost:1") };
        prop_assert!(OpenRouterProvider::new(&config).is_ok());
    }

    #[test]
    fn model_format_rejects_missing_slash(model in "[a-z0-9-]{1,20}") {
        let config = Config { model, ..openrouter_config("http://localhost:1") };
        prop_assert!(OpenRouterProvider::new(&config).is_err());
    }
}

// ─── validate_config ─────────────────────────────────────────────────────────

#[test]
fn validate_config_flags_missing_api_key() {
    let config = Config {
        api_key: None,
        ..openrouter_config("http://localhost:1")
    };
    let provider = OpenRouterProvider::new(&config).unwrap();
    let errors = provider.validate_config();
    assert!(!errors.is_empty());
    assert!(
        errors.iter().any(|e| e.contains("API key")),
        "expected an API key message, got {errors:?}"
    );
}

#[test]
fn validate_config_passes_on_valid_provider() {
    let config = openrouter_config("http://localhost:1");
    let provider = OpenRouterProvider::new(&config).unwrap();
    assert!(provider.validate_config().is_empty());
}

#[test]
fn validate_config_flags_bad_ollama_host() {
    let config = Config {
        ollama_host: "localhost:11434".into(),
        ..Config::default()
    };
    let provider = OllamaProvider::new(&config);
    let errors = provider.validate_config();
    assert!(errors.iter().any(|e| e.contains("http://")));
}

#[test]
fn validate_config_never_performs_io() {
    // Unroutable base URL: validation must still answer instantly
    let config = openai_config("http://192.0.2.1:9");
    let provider = OpenAiProvider::new(&config);
    assert!(provider.validate_config().is_empty());
}

// ─── Factory ─────────────────────────────────────────────────────────────────

#[test]
fn factory_builds_every_backend() {
    for provider in [
        Provider::Ollama,
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::DeepSeek,
    ] {
        let config = Config {
            provider,
            ..Config::default()
        };
        assert!(create_provider(&config).is_ok(), "factory failed for {provider}");
    }

    let config = Config {
        provider: Provider::OpenRouter,
        model: "openai/gpt-4o".into(),
        ..Config::default()
    };
    let built = create_provider(&config).unwrap();
    assert_eq!(built.name(), "openrouter");
}

#[test]
fn factory_fails_fast_on_bad_openrouter_model() {
    let config = Config {
        provider: Provider::OpenRouter,
        model: "gpt-4o".into(),
        ..Config::default()
    };
    assert!(matches!(create_provider(&config), Err(Error::Config(_))));
}

// ─── OpenRouter request/response ─────────────────────────────────────────────

#[tokio::test]
async fn openrouter_generates_commit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-or-v1-test-key"))
        .and(header("HTTP-Referer", "https://github.com/Sephyi/commitgen"))
        .and(header("X-Title", "commitgen"))
        .and(body_partial_json(json!({
            "model": "openai/gpt-4o-mini",
            "temperature": 0.7,
            "max_tokens": 500,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(
            "feat(auth): implement JWT-based authentication\n\nAdds refresh tokens.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        timeout_secs: 60,
        ..openrouter_config(&server.uri())
    };
    let provider = OpenRouterProvider::new(&config).unwrap();
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();

    assert_eq!(msg.commit_type, CommitType::Feat);
    assert_eq!(msg.scope.as_deref(), Some("auth"));
    assert!(msg.body.as_deref().unwrap().contains("refresh tokens"));
}

#[tokio::test]
async fn openrouter_sends_system_and_user_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {"role": "user"},
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_completion_body("chore: noop")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    provider.generate_commit_message(&sample_diff()).await.unwrap();
}

#[tokio::test]
async fn openrouter_prompt_carries_file_list_and_totals() {
    let server = MockServer::start().await;
    server
        .register(
            Mock::given(method("POST")).respond_with(
                ResponseTemplate::new(200).set_body_json(chat_completion_body("chore: noop")),
            ),
        )
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    provider.generate_commit_message(&sample_diff()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user_content = body["messages"][1]["content"].as_str().unwrap();
    assert!(user_content.contains("- src/auth.rs (+42 -7)"));
    assert!(user_content.contains("- tests/auth.rs (+30 -0)"));
    assert!(user_content.contains("+72 -7"));
}

#[tokio::test]
async fn openrouter_unparseable_output_degrades_to_chore() {
    let server = MockServer::start().await;
    server
        .register(
            Mock::given(method("POST")).respond_with(
                ResponseTemplate::new(200).set_body_json(chat_completion_body(
                    "Here is a lovely commit message for your consideration today, friend",
                )),
            ),
        )
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();
    assert_eq!(msg.commit_type, CommitType::Chore);
    assert_eq!(msg.description.chars().count(), 50);
}

// ─── Error classification ────────────────────────────────────────────────────

#[tokio::test]
async fn status_401_yields_unauthorized_with_key_url() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "Invalid API key"}})),
        ))
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("401"), "missing status: {text}");
    assert!(text.contains("Invalid API key"), "missing backend message: {text}");
    assert!(
        text.contains("https://openrouter.ai/keys"),
        "missing key URL: {text}"
    );
}

#[tokio::test]
async fn status_429_yields_rate_limited() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "slow down"}})),
        ))
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimited { .. }));
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn status_503_suggests_alternative_providers() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": {"message": "overloaded"}})),
        ))
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("503"), "missing status: {text}");
    for alt in ["openai", "anthropic", "deepseek", "ollama"] {
        assert!(text.contains(alt), "missing alternative {alt}: {text}");
    }
    assert!(
        !text.contains("openrouter,"),
        "failing provider should not suggest itself: {text}"
    );
}

#[tokio::test]
async fn other_status_embeds_code_and_backend_message() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": {"message": "boom"}})),
        ))
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider { status: 500, .. }));
    let text = err.to_string();
    assert!(text.contains("500"));
    assert!(text.contains("boom"));
}

#[tokio::test]
async fn non_json_error_body_used_verbatim() {
    let server = MockServer::start().await;
    server
        .register(
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway")),
        )
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn empty_error_body_reports_unknown_error() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)))
        .await;

    let provider = OpenRouterProvider::new(&openrouter_config(&server.uri())).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown error"));
}

#[tokio::test]
async fn request_times_out_instead_of_hanging() {
    let server = MockServer::start().await;
    server
        .register(
            Mock::given(method("POST")).respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_completion_body("chore: late"))
                    .set_delay(Duration::from_secs(30)),
            ),
        )
        .await;

    let config = Config {
        timeout_secs: 1,
        ..openrouter_config(&server.uri())
    };
    let provider = OpenRouterProvider::new(&config).unwrap();
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { secs: 1, .. }));
}

// ─── Other backends ──────────────────────────────────────────────────────────

#[tokio::test]
async fn openai_generates_commit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("fix(config): reject empty host")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();
    assert_eq!(msg.commit_type, CommitType::Fix);
    assert_eq!(msg.scope.as_deref(), Some("config"));
}

#[tokio::test]
async fn deepseek_401_names_its_key_url() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        ))
        .await;

    let provider = DeepSeekProvider::new(&deepseek_config(&server.uri()));
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("platform.deepseek.com"));
}

#[tokio::test]
async fn anthropic_generates_commit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "docs: describe provider registry"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AnthropicProvider::new(&anthropic_config(&server.uri()));
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();
    assert_eq!(msg.commit_type, CommitType::Docs);
    assert!(msg.scope.is_none());
}

#[tokio::test]
async fn gemini_generates_commit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-001:generateContent"))
        .and(query_param("key", "g-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "test(parser): cover fallback path"}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(&gemini_config(&server.uri()));
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();
    assert_eq!(msg.commit_type, CommitType::Test);
    assert_eq!(msg.scope.as_deref(), Some("parser"));
}

#[tokio::test]
async fn ollama_generates_commit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": false, "model": "qwen2.5:7b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "refactor(git): simplify status parsing",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let msg = provider.generate_commit_message(&sample_diff()).await.unwrap();
    assert_eq!(msg.commit_type, CommitType::Refactor);
}

#[tokio::test]
async fn ollama_http_error_is_classified() {
    let server = MockServer::start().await;
    server
        .register(
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(404).set_body_string("model not found")),
        )
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider { status: 404, .. }));
}

#[tokio::test]
async fn ollama_error_carries_no_credential_hints() {
    let server = MockServer::start().await;
    server
        .register(Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "unexpected auth"})),
        ))
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let err = provider
        .generate_commit_message(&sample_diff())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider { status: 401, .. }));
    let text = err.to_string();
    assert!(text.contains("unexpected auth"), "{text}");
    assert!(
        !text.contains("API key"),
        "keyless backend mentioned credentials: {text}"
    );
    assert!(!text.contains("ollama.com/download"), "{text}");
}
