//! `OpenAiSummarizer` against a wiremock chat completions endpoint.

use techfeed_core::Field;
use techfeed_enrich::{EnrichError, OpenAiSummarizer, Summarizer};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summarizer(server: &MockServer) -> OpenAiSummarizer {
    OpenAiSummarizer::new("test-key", "gpt-4o-mini", 0.3, &format!("{}/v1/", server.uri()), 5)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn summarize_parses_json_mode_answer() {
    let server = MockServer::start().await;
    let answer = serde_json::json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "{\"summary\": \"쿠버네티스 배포 파이프라인을 정리한 글입니다.\", \"field\": \"DevOps\"}"
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&answer))
        .expect(1)
        .mount(&server)
        .await;

    let summary = summarizer(&server)
        .summarize("Kubernetes rollout notes")
        .await
        .expect("summary should parse");

    assert_eq!(summary.summary, "쿠버네티스 배포 파이프라인을 정리한 글입니다.");
    assert_eq!(summary.category, Field::DevOps);
}

#[tokio::test]
async fn summarize_reports_http_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = summarizer(&server)
        .summarize("text")
        .await
        .expect_err("429 should fail");

    assert!(matches!(err, EnrichError::UnexpectedStatus { status: 429, .. }));
}

#[tokio::test]
async fn summarize_rejects_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = summarizer(&server)
        .summarize("text")
        .await
        .expect_err("no choices should fail");

    assert!(matches!(err, EnrichError::Summarizer(_)));
}
