//! Tactical advice from a remote text-generation service.
//!
//! The service is reached through [`AdviceProvider`]. Callers go through
//! [`request_substitution_advice`] / [`request_source_analysis`], which never fail:
//! remote errors turn into a fixed fallback message.

use crate::models::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub const ADVICE_EMPTY_FALLBACK: &str = "I'm currently observing the game. Check back in a minute!";
pub const ADVICE_ERROR_FALLBACK: &str = "Error getting tactical advice.";
pub const ANALYSIS_EMPTY_FALLBACK: &str = "No intelligence could be extracted.";
pub const ANALYSIS_ERROR_FALLBACK: &str = "Failed to analyze intelligence source. Please try again.";

const COACH_INSTRUCTION: &str =
    "You are a professional futsal coach. Help me manage my player rotations.";

const ANALYST_INSTRUCTION: &str = "You are a professional football/futsal tactical analyst and scout. \
Analyze the provided content which could be a league table, a match result, a social media post about an opponent, or a website. \
Extract recent results for our team and opponents, current league standings if visible, \
tactical weaknesses or strengths of opponents, and important dates for upcoming fixtures. \
Format the output in clear Markdown with headers.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub enum RemoteError {
    /// No API key configured.
    MissingApiKey,
    Network(reqwest::Error),
    /// Non-success HTTP status (quota, auth, service errors).
    Status { code: u16, body: String },
    Parse(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::MissingApiKey => write!(f, "No API key configured"),
            RemoteError::Network(e) => write!(f, "Network error: {e}"),
            RemoteError::Status { code, body } => write!(f, "Service returned {code}: {body}"),
            RemoteError::Parse(msg) => write!(f, "Unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// What kind of scouting material is being analyzed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Text,
    Url,
    /// Payload is base64 image data; needs a mime type.
    Image,
}

/// Remote text generation. An empty `Ok` string means the service had nothing to say.
pub trait AdviceProvider {
    fn generate_advice(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;

    fn analyze_source(
        &self,
        kind: SourceKind,
        payload: &str,
        mime_type: Option<&str>,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Generated,
    Fallback,
}

/// Text to show the coach and where it came from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

impl Advice {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: AdviceSource::Fallback,
        }
    }

    fn from_reply(reply: Result<String, RemoteError>, empty: &str, failed: &str) -> Self {
        match reply {
            Ok(text) if text.trim().is_empty() => Self::fallback(empty),
            Ok(text) => Self {
                text,
                source: AdviceSource::Generated,
            },
            Err(e) => {
                log::warn!("Advice request failed: {}", e);
                Self::fallback(failed)
            }
        }
    }
}

/// Roster summary sent to the coach model.
pub fn substitution_prompt(players: &[Player], elapsed_seconds: u32) -> String {
    let lines = |active: bool| {
        players
            .iter()
            .filter(|p| p.is_active == active)
            .map(|p| format!("- {}: total played {}m", p.name, p.minutes_played()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Current Match Time: {} minutes.\n\n\
         Active Players (on the pitch):\n{}\n\n\
         Bench Players:\n{}\n\n\
         Goal: Ensure fair playing time and high intensity.\n\
         Please provide:\n\
         1. A quick summary of who should be subbed out next.\n\
         2. Specific pairings for the substitution.\n\
         3. Keep it brief and motivating.",
        elapsed_seconds / 60,
        lines(true),
        lines(false)
    )
}

pub async fn request_substitution_advice<P: AdviceProvider>(
    provider: &P,
    players: &[Player],
    elapsed_seconds: u32,
) -> Advice {
    let prompt = substitution_prompt(players, elapsed_seconds);
    let reply = provider.generate_advice(&prompt).await;
    Advice::from_reply(reply, ADVICE_EMPTY_FALLBACK, ADVICE_ERROR_FALLBACK)
}

pub async fn request_source_analysis<P: AdviceProvider>(
    provider: &P,
    kind: SourceKind,
    payload: &str,
    mime_type: Option<&str>,
) -> Advice {
    let reply = provider.analyze_source(kind, payload, mime_type).await;
    Advice::from_reply(reply, ANALYSIS_EMPTY_FALLBACK, ANALYSIS_ERROR_FALLBACK)
}

/// Append a Markdown list of source links, skipping duplicates.
pub fn with_sources(mut text: String, uris: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for uri in uris {
        if !seen.contains(&uri.as_str()) {
            seen.push(uri.as_str());
        }
    }
    if seen.is_empty() {
        return text;
    }
    text.push_str("\n\n**Sources:**\n");
    let list: Vec<String> = seen.iter().map(|u| format!("- [{u}]({u})")).collect();
    text.push_str(&list.join("\n"));
    text
}

/// Settings for [`GeminiClient`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    /// Used for advice, text and image analysis.
    pub model: String,
    /// Used for URL research (with search grounding).
    pub analysis_model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            analysis_model: "gemini-3-pro-preview".to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

/// [`AdviceProvider`] backed by the Gemini `generateContent` REST endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn source_uris(&self) -> Vec<String> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| {
                m.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref()?.uri.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reply text for a scouting request. URL research also lists its web sources.
    fn analysis_text(&self, kind: SourceKind) -> String {
        let text = self.text();
        if kind == SourceKind::Url && !text.trim().is_empty() {
            return with_sources(text, &self.source_uris());
        }
        text
    }
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn generate(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<GenerateResponse, RemoteError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RemoteError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(RemoteError::Network)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                code: status.as_u16(),
                body,
            });
        }
        resp.json::<GenerateResponse>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

impl AdviceProvider for GeminiClient {
    async fn generate_advice(&self, prompt: &str) -> Result<String, RemoteError> {
        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": COACH_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        let resp = self.generate(&self.config.model, body).await?;
        Ok(resp.text())
    }

    async fn analyze_source(
        &self,
        kind: SourceKind,
        payload: &str,
        mime_type: Option<&str>,
    ) -> Result<String, RemoteError> {
        let parts = match (kind, mime_type) {
            (SourceKind::Image, Some(mime)) => serde_json::json!([
                { "inlineData": { "data": payload, "mimeType": mime } },
                { "text": "Analyze this image for football/futsal team results, standings, or scouting info." },
            ]),
            (SourceKind::Url, _) => serde_json::json!([{
                "text": format!("Research this URL for football league data and team performance: {payload}"),
            }]),
            _ => serde_json::json!([{ "text": payload }]),
        };
        let mut body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": ANALYST_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": parts }],
        });
        let model = if kind == SourceKind::Url {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
            &self.config.analysis_model
        } else {
            &self.config.model
        };

        let resp = self.generate(model, body).await?;
        Ok(resp.analysis_text(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GenerateResponse {
        serde_json::from_str(body).unwrap()
    }

    const GROUNDED: &str = r#"{
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "Thunder FC " }, { "text": "lead the table." }] },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://league.example/table", "title": "Table" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "https://league.example/table" } },
                    { "web": { "uri": "https://news.example/thunder" } }
                ]
            }
        }]
    }"#;

    #[test]
    fn text_joins_parts_of_first_candidate() {
        assert_eq!(parse(GROUNDED).text(), "Thunder FC lead the table.");
    }

    #[test]
    fn grounding_chunks_yield_web_uris() {
        assert_eq!(
            parse(GROUNDED).source_uris(),
            [
                "https://league.example/table",
                "https://league.example/table",
                "https://news.example/thunder",
            ]
        );
    }

    #[test]
    fn only_url_analysis_lists_sources() {
        let resp = parse(GROUNDED);
        let url = resp.analysis_text(SourceKind::Url);
        assert!(url.starts_with("Thunder FC lead the table.\n\n**Sources:**\n"));
        assert_eq!(url.matches("https://league.example/table").count(), 2);
        assert!(url.ends_with("- [https://news.example/thunder](https://news.example/thunder)"));

        assert_eq!(resp.analysis_text(SourceKind::Text), "Thunder FC lead the table.");
        assert_eq!(resp.analysis_text(SourceKind::Image), "Thunder FC lead the table.");
    }

    #[test]
    fn missing_candidates_give_empty_text() {
        let resp = parse(r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#);
        assert_eq!(resp.text(), "");
        assert!(resp.source_uris().is_empty());
        assert_eq!(resp.analysis_text(SourceKind::Url), "");
        assert_eq!(
            Advice::from_reply(Ok(resp.text()), ANALYSIS_EMPTY_FALLBACK, ANALYSIS_ERROR_FALLBACK),
            Advice::fallback(ANALYSIS_EMPTY_FALLBACK)
        );
    }

    #[test]
    fn candidate_without_content_or_metadata_is_empty() {
        let resp = parse(r#"{ "candidates": [{ "finishReason": "SAFETY" }] }"#);
        assert_eq!(resp.text(), "");
        assert!(resp.source_uris().is_empty());
    }
}
