//! Copy rewrite of the content document through the OpenAI Responses API.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::app::{AutopilotError, Result};
use crate::config::RewriteConfig;
use crate::domain::ContentDocument;

const INSTRUCTIONS: &[&str] = &[
    "You are a marketing copywriter and editor.",
    "Rewrite the landing page content to be ORIGINAL and non-infringing.",
    "Do NOT copy text verbatim from any reference site; paraphrase and improve.",
    "Keep WhatsApp number/message and Instagram URL as-is.",
    "Return ONLY valid JSON that matches the same schema as the input (same keys/structure).",
    "If a field is missing, fill it reasonably.",
];

const TASK: &str = "Rewrite landing.json copy";
const SCHEMA_NOTE: &str = "Keep the same JSON keys and nesting. Only modify text fields \
     (title/description/tagline/headlines/sections).";

#[derive(Serialize)]
struct Payload<'a> {
    task: &'a str,
    input_schema_note: &'a str,
    landing_json: &'a ContentDocument,
}

#[derive(Serialize)]
struct Reasoning<'a> {
    effort: &'a str,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    reasoning: Reasoning<'a>,
    instructions: String,
    input: String,
}

pub struct Rewriter {
    client: Client,
    endpoint: String,
    model: String,
    effort: String,
    api_key: String,
}

impl Rewriter {
    pub fn new(config: &RewriteConfig, api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AutopilotError::MissingInput(
                "OpenAI API key missing (--api-key or OPENAI_API_KEY)".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.trim().to_string(),
            effort: config.reasoning_effort.clone(),
            api_key: api_key.to_string(),
        })
    }

    /// Rewritten copy for `document`, with its contact fields kept.
    pub async fn rewrite(&self, document: &ContentDocument) -> Result<ContentDocument> {
        let payload = Payload {
            task: TASK,
            input_schema_note: SCHEMA_NOTE,
            landing_json: document,
        };
        let request = ResponsesRequest {
            model: &self.model,
            reasoning: Reasoning {
                effort: &self.effort,
            },
            instructions: INSTRUCTIONS.join("\n"),
            input: serde_json::to_string(&payload)?,
        };

        info!(model = %self.model, "Requesting copy rewrite");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;

        let text = response_text(&body);
        debug!(chars = text.len(), "Received model output");

        let rewritten = parse_model_output(&text)?;
        Ok(preserve_contact_fields(document, rewritten))
    }
}

/// Text output of a Responses API reply.
pub fn response_text(body: &Value) -> String {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    body.get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect()
}

/// Parse model output as a content document, falling back to the span
/// between the first `{` and the last `}`.
pub fn parse_model_output(text: &str) -> Result<ContentDocument> {
    let text = text.trim();
    if let Ok(document) = serde_json::from_str(text) {
        return Ok(document);
    }

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(AutopilotError::Rewrite("LLM output was not valid JSON.".into())),
    };
    serde_json::from_str(span)
        .map_err(|_| AutopilotError::Rewrite("LLM output was not valid JSON.".into()))
}

/// Copy messaging and social fields back from `original` wherever it has them.
pub fn preserve_contact_fields(
    original: &ContentDocument,
    mut rewritten: ContentDocument,
) -> ContentDocument {
    let keep = |from: &String, to: &mut String| {
        if !from.is_empty() {
            to.clone_from(from);
        }
    };
    keep(&original.hero.messaging_number, &mut rewritten.hero.messaging_number);
    keep(&original.hero.messaging_text, &mut rewritten.hero.messaging_text);
    keep(&original.hero.social_url, &mut rewritten.hero.social_url);
    rewritten
}
