
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::explanation::{Explanation, ExplanationContext, ExplanationGenerator};

/// OpenAI-compatible router used when nothing else is configured
pub const DEFAULT_LLM_ENDPOINT: &str = "https://router.huggingface.co/v1";
/// Chat model used when nothing else is configured
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct:novita";

const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 400;

/// Everything that can go wrong while asking the model; all of these become the fallback text
#[derive(thiserror::Error, Debug)]
pub enum ExplanationError {
    #[error("no API token was configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {0}")]
    HttpStatus(u16),
    #[error("malformed reply: {0}")]
    MalformedPayload(String)
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32
}

#[derive(Deserialize, Serialize)]
struct ChatMessage {
    role: String,
    content: String
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage
}

/// Settings for the chat-completion generator
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Base URL, `/chat/completions` is appended
    pub endpoint: String,
    pub model: String,
    /// Bearer token; without one every call falls back
    pub api_token: Option<String>
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_token: None
        }
    }
}

/// Explanation generator backed by an OpenAI-compatible chat-completion endpoint
pub struct LlmExplainer {
    config: LlmConfig,
    client: reqwest::blocking::Client
}

impl LlmExplainer {
    pub fn new(config: LlmConfig) -> LlmExplainer {
        LlmExplainer {
            config,
            client: reqwest::blocking::Client::new()
        }
    }

    /// Performs one chat-completion call and parses the reply into an explanation.
    /// # Arguments
    /// * `context` - the clinical context for one drug
    /// # Errors
    /// * if no token is configured
    /// * if the request fails or returns a non-2xx status
    /// * if the reply is not JSON with three non-empty fields
    pub fn try_generate(&self, context: &ExplanationContext) -> Result<Explanation, ExplanationError> {
        let token = match self.config.api_token.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ExplanationError::MissingCredential)
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(context)
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| ExplanationError::MalformedPayload(e.to_string()))?;

        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        debug!("Requesting explanation for {} from {url}", context.drug);
        let response = self.client.post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplanationError::HttpStatus(status.as_u16()));
        }
        let reply: String = response.text()?;
        parse_reply(&reply)
    }
}

impl ExplanationGenerator for LlmExplainer {
    fn generate(&self, context: &ExplanationContext) -> Explanation {
        match self.try_generate(context) {
            Ok(explanation) => explanation,
            Err(e) => {
                warn!("Explanation generation failed for {}, using fallback: {e}", context.drug);
                Explanation::fallback()
            }
        }
    }
}

/// Builds the prompt sent to the model
fn build_prompt(context: &ExplanationContext) -> String {
    format!("You are a clinical pharmacogenomics expert.

Generate a structured JSON explanation for:

Gene: {}
Diplotype: {}
Phenotype: {}
Drug: {}
Risk: {}
Guideline: {}

Rules:
- Be clinically precise.
- Mention enzyme function.
- Explain biological mechanism.
- Keep it professional.
- Respond ONLY with valid JSON.

{{
  \"summary\": \"1-2 sentence summary\",
  \"mechanism\": \"2-3 sentences explaining biological mechanism\",
  \"clinical_impact\": \"2 sentences explaining clinical consequences\"
}}
", context.gene, context.diplotype, context.phenotype, context.drug, context.risk, context.recommendation)
}

/// Pulls the explanation out of a raw chat-completion reply body
fn parse_reply(reply: &str) -> Result<Explanation, ExplanationError> {
    let parsed: ChatResponse = serde_json::from_str(reply)
        .map_err(|e| ExplanationError::MalformedPayload(e.to_string()))?;
    let content = match parsed.choices.into_iter().next() {
        Some(choice) => choice.message.content,
        None => return Err(ExplanationError::MalformedPayload("reply has no choices".to_string()))
    };

    // models like to wrap the JSON in a code fence
    let content = content.replace("```json", "").replace("```", "");
    let explanation: Explanation = serde_json::from_str(content.trim())
        .map_err(|e| ExplanationError::MalformedPayload(e.to_string()))?;
    if !explanation.is_complete() {
        return Err(ExplanationError::MalformedPayload("one or more explanation fields are empty".to_string()));
    }
    Ok(explanation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codeine_context() -> ExplanationContext {
        ExplanationContext {
            gene: "CYP2D6".to_string(),
            diplotype: "*4/*4".to_string(),
            phenotype: "PM".to_string(),
            drug: "CODEINE".to_string(),
            risk: "Ineffective".to_string(),
            recommendation: "Avoid codeine.".to_string()
        }
    }

    fn wrap_content(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }).to_string()
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt(&codeine_context());
        assert!(prompt.contains("Gene: CYP2D6"));
        assert!(prompt.contains("Diplotype: *4/*4"));
        assert!(prompt.contains("Guideline: Avoid codeine."));
        assert!(prompt.contains("\"clinical_impact\""));
    }

    #[test]
    fn test_parse_reply() {
        let content = "```json\n{\"summary\": \"Poor metabolizer.\", \"mechanism\": \"No CYP2D6 activity.\", \"clinical_impact\": \"No analgesia.\"}\n```";
        let explanation = parse_reply(&wrap_content(content)).unwrap();
        assert_eq!(explanation.summary, "Poor metabolizer.");
        assert_eq!(explanation.clinical_impact, "No analgesia.");
    }

    #[test]
    fn test_parse_reply_malformed() {
        assert!(matches!(parse_reply("not json"), Err(ExplanationError::MalformedPayload(_))));
        assert!(matches!(parse_reply("{\"choices\": []}"), Err(ExplanationError::MalformedPayload(_))));
        assert!(matches!(parse_reply(&wrap_content("I cannot help with that.")), Err(ExplanationError::MalformedPayload(_))));
        let missing_field = "{\"summary\": \"a\", \"mechanism\": \"b\"}";
        assert!(matches!(parse_reply(&wrap_content(missing_field)), Err(ExplanationError::MalformedPayload(_))));
        let empty_field = "{\"summary\": \"a\", \"mechanism\": \"\", \"clinical_impact\": \"c\"}";
        assert!(matches!(parse_reply(&wrap_content(empty_field)), Err(ExplanationError::MalformedPayload(_))));
    }

    #[test]
    fn test_missing_token_falls_back() {
        let explainer = LlmExplainer::new(LlmConfig::default());
        assert!(matches!(explainer.try_generate(&codeine_context()), Err(ExplanationError::MissingCredential)));
        assert_eq!(explainer.generate(&codeine_context()), Explanation::fallback());
    }

    #[test]
    fn test_unreachable_endpoint_falls_back() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_token: Some("token".to_string())
        };
        let explainer = LlmExplainer::new(config);
        assert!(matches!(explainer.try_generate(&codeine_context()), Err(ExplanationError::Network(_))));
        assert_eq!(explainer.generate(&codeine_context()), Explanation::fallback());
    }
}
