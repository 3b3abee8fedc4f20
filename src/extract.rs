//! Converts free-text expense descriptions into structured records with a
//! hosted text-generation model.
//!
//! One analysis is one prompt/response round trip: no conversation state, no
//! streaming, no retries. The model is asked to answer with a single JSON
//! object, and the response is parsed with a deliberately lenient brace scan
//! (first `{` to last `}`, inclusive) so that models which wrap their answer
//! in prose or code fences still parse. The scan is a best-effort heuristic:
//! it is fooled by stray braces outside the object, and that is accepted.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{category::Category, error::ExtractionError};

/// The generation endpoint.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// A structured expense extracted from free text.
///
/// Transient: never persisted directly. The category is returned exactly as
/// the model produced it, without checking membership in the fixed set;
/// callers decide what to do with unrecognised values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseAnalysis {
    /// A short description of the expense.
    pub description: String,
    /// The suggested category. May fall outside [crate::category::CATEGORIES].
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
}

/// A single-shot client for the text-generation endpoint.
#[derive(Debug, Clone)]
pub struct ExpenseAnalyzer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ExpenseAnalyzer {
    /// Create an analyzer using the [DEFAULT_MODEL].
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Use `model` instead of the default.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_owned();
        self
    }

    /// Convert a free-text expense entry into a structured record.
    ///
    /// # Errors
    /// Returns an [ExtractionError] if the request fails, the model answers
    /// with no text, or no JSON object can be decoded from the answer. The
    /// error carries a human-readable cause; it never yields a partially
    /// populated result.
    pub async fn analyze(&self, raw_text: &str) -> Result<ExpenseAnalysis, ExtractionError> {
        let response = self.generate(&build_prompt(raw_text)).await?;
        let text = response_text(&response).ok_or(ExtractionError::EmptyResponse)?;

        parse_analysis(&text)
    }

    async fn generate(&self, prompt: &str) -> Result<Value, ExtractionError> {
        let url = format!("{API_BASE_URL}/{}:generateContent", self.model);
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|error| ExtractionError::Http(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| ExtractionError::Http(error.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|value| value["error"]["message"].as_str().map(str::to_owned))
                .unwrap_or(text);
            return Err(ExtractionError::Api(format!("HTTP {status}: {message}")));
        }

        serde_json::from_str(&text).map_err(|error| ExtractionError::Http(error.to_string()))
    }
}

/// Build the fixed instructional prompt embedding the user's raw text and
/// the allowed category set.
fn build_prompt(raw_text: &str) -> String {
    format!(
        "Analyze the following expense entry and extract the description, category, and amount.\n\
         Entry: \"{raw_text}\"\n\
         Respond ONLY with a valid JSON object containing \"description\" (string), \
         \"category\" (string), and \"amount\" (number).\n\
         The category must be one of the following: {}.\n\
         Example: {{\"description\": \"Coffee with friend\", \"category\": \"Food\", \"amount\": 5.75}}",
        Category::comma_separated_list()
    )
}

/// Pull the first text part out of a generation response.
fn response_text(response: &Value) -> Option<String> {
    response["candidates"][0]["content"]["parts"]
        .as_array()
        .and_then(|parts| parts.iter().find_map(|part| part["text"].as_str()))
        .map(str::to_owned)
}

/// The substring from the first `{` to the last `}` of `text`, inclusive.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (end >= start).then(|| &text[start..=end])
}

/// Decode the model's answer into an [ExpenseAnalysis].
///
/// Unknown fields in the object are tolerated.
///
/// # Errors
/// Returns an [ExtractionError] if the text is empty, contains no `{`/`}`
/// pair, or the bracketed substring is not a valid expense object.
fn parse_analysis(text: &str) -> Result<ExpenseAnalysis, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let object = extract_json_object(text).ok_or(ExtractionError::MissingJson)?;

    serde_json::from_str(object).map_err(|error| ExtractionError::InvalidJson(error.to_string()))
}
