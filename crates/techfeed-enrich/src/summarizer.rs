//! Post summarization through an OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use techfeed_core::Field;

use crate::error::EnrichError;

/// Characters of post body sent to the model.
const MAX_INPUT_CHARS: usize = 12_000;

/// A generated summary and the category assigned to the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub summary: String,
    pub category: Field,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a post body.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if no usable summary could be produced.
    async fn summarize(&self, text: &str) -> Result<Summary, EnrichError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct SummaryPayload {
    summary: String,
    #[serde(default, alias = "category")]
    field: String,
}

/// [`Summarizer`] backed by `POST {base_url}/chat/completions` in JSON mode.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        temperature: f32,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<Summary, EnrichError> {
        let excerpt: String = text.chars().take(MAX_INPUT_CHARS).collect();
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt() },
                { "role": "user", "content": format!("다음 글을 요약해 주세요:\n{excerpt}") }
            ]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EnrichError::Summarizer("response has no message content".to_string()))?;
        parse_summary(&content)
    }
}

/// Parse the model's JSON answer. A missing or unknown category maps to
/// [`Field::Other`]; an empty summary is an error.
pub(crate) fn parse_summary(content: &str) -> Result<Summary, EnrichError> {
    let payload: SummaryPayload = serde_json::from_str(content.trim())?;
    let summary = payload.summary.trim().to_string();
    if summary.is_empty() {
        return Err(EnrichError::Summarizer("model returned an empty summary".to_string()));
    }
    Ok(Summary {
        summary,
        category: Field::from_label(&payload.field),
    })
}

fn system_prompt() -> String {
    let labels = Field::ALL
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "당신은 기술 블로그 글을 한국어로 요약하는 도우미입니다.\n\
         다음 형식의 JSON 객체 하나만 반환하세요: {{\"summary\": \"요약\", \"field\": \"분류\"}}\n\
         분류는 다음 중 하나입니다: {labels}\n\
         - AI: 인공지능, 머신러닝, LLM, 생성형 AI\n\
         - DevOps: CI/CD, 컨테이너, 쿠버네티스, 클라우드 인프라와 배포\n\
         요약 규칙:\n\
         - 500자 내외로 작성하고, 원문이 짧으면 더 짧게 작성합니다.\n\
         - 작성자의 이름이나 자기소개(\"저는\", \"필자는\" 등)는 포함하지 않습니다.\n\
         - 글의 기술적 내용에만 집중합니다."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_and_known_field() {
        let got = parse_summary(r#"{"summary": "  요약입니다. ", "field": "DevOps"}"#).unwrap();
        assert_eq!(got.summary, "요약입니다.");
        assert_eq!(got.category, Field::DevOps);
    }

    #[test]
    fn unknown_or_missing_field_is_other() {
        let got = parse_summary(r#"{"summary": "s", "field": "기타"}"#).unwrap();
        assert_eq!(got.category, Field::Other);
        let got = parse_summary(r#"{"summary": "s"}"#).unwrap();
        assert_eq!(got.category, Field::Other);
    }

    #[test]
    fn accepts_category_alias() {
        let got = parse_summary(r#"{"summary": "s", "category": "Collab Tool"}"#).unwrap();
        assert_eq!(got.category, Field::CollabTool);
    }

    #[test]
    fn empty_summary_is_rejected() {
        assert!(matches!(
            parse_summary(r#"{"summary": "   ", "field": "AI"}"#),
            Err(EnrichError::Summarizer(_))
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(parse_summary("not json"), Err(EnrichError::Json(_))));
    }

    #[test]
    fn prompt_lists_every_category() {
        let prompt = system_prompt();
        for field in Field::ALL {
            assert!(prompt.contains(field.label()), "missing {}", field.label());
        }
    }
}
