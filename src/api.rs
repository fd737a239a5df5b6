// API client module: a small blocking HTTP client for the Gemini
// `generateContent` endpoint. One call retries transport failures with
// exponential backoff; a response that arrives but has the wrong shape
// comes back as a distinct marker, since retrying will not fix it.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model queried when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Endpoint base when `GEMINI_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Total attempts per generate call, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Request body for `generateContent`. The system instruction is only
/// serialized when a system prompt was supplied.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Success-path response shape. Only the fields on the documented text
/// path are modeled; anything else in the body is ignored.
#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Outcome of one `generate` call. The failure markers are values, not
/// errors: the caller always gets something it can print.
#[derive(Debug, PartialEq, Eq)]
pub enum AiReply {
    /// Generated text, exactly as the endpoint delivered it.
    Text(String),
    /// Every transport attempt failed.
    Exhausted,
    /// The endpoint answered but the body lacked the expected fields.
    Malformed,
}

/// One HTTP attempt against the endpoint. Behind a trait so tests can
/// stand in a scripted fake; the retry loop never touches the network
/// directly.
pub trait Transport {
    /// Post the JSON body, returning the response body text on an HTTP
    /// success status and an error for any transport-level failure.
    fn post_json(&self, body: &serde_json::Value) -> Result<String>;
}

/// Real transport backed by a blocking reqwest client.
struct HttpTransport {
    client: Client,
    url: String,
}

impl Transport for HttpTransport {
    fn post_json(&self, body: &serde_json::Value) -> Result<String> {
        let res = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .context("Failed to send generate request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Generate request failed: {} - {}", status, txt);
        }
        res.text().context("Failed to read generate response body")
    }
}

/// Client for the text-generation endpoint. Holds the transport and the
/// wait used between retries; both are injectable so the backoff
/// schedule can be tested without sleeping.
pub struct AiClient {
    transport: Box<dyn Transport>,
    wait: Box<dyn Fn(Duration)>,
}

impl AiClient {
    /// Create a client configured from the environment. `GEMINI_API_KEY`
    /// is required; `GEMINI_MODEL` and `GEMINI_API_BASE` fall back to
    /// the defaults above.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set")?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base, model, api_key
        );
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(AiClient {
            transport: Box::new(HttpTransport { client, url }),
            wait: Box::new(|d| std::thread::sleep(d)),
        })
    }

    /// Create a client over an arbitrary transport and wait function.
    pub fn with_transport(transport: Box<dyn Transport>, wait: Box<dyn Fn(Duration)>) -> Self {
        AiClient { transport, wait }
    }

    /// Send one prompt (plus an optional system instruction) and return
    /// the generated text or a failure marker.
    ///
    /// Transport failures are retried up to 3 attempts total, waiting
    /// 2^attempt seconds between tries (1s, then 2s). Each failed
    /// attempt is reported before deciding whether to retry. A body that
    /// arrives but is missing the expected fields returns `Malformed`
    /// with no retry.
    pub fn generate(&self, prompt: &str, system: Option<&str>) -> AiReply {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: system.map(|text| Content {
                parts: vec![Part { text }],
            }),
        };
        // Serializing plain string fields cannot fail.
        let body = serde_json::to_value(&request).unwrap_or_default();

        for attempt in 0..MAX_ATTEMPTS {
            match self.transport.post_json(&body) {
                Ok(response_text) => return extract_text(&response_text),
                Err(e) => {
                    eprintln!("API error (attempt {}/{}): {}", attempt + 1, MAX_ATTEMPTS, e);
                    if attempt + 1 < MAX_ATTEMPTS {
                        (self.wait)(Duration::from_secs(1 << attempt));
                    }
                }
            }
        }
        AiReply::Exhausted
    }
}

/// Pull the generated text out of a successful response body. Any shape
/// mismatch maps to `Malformed`.
fn extract_text(response_text: &str) -> AiReply {
    let parsed: GenerateResponse = match serde_json::from_str(response_text) {
        Ok(parsed) => parsed,
        Err(_) => return AiReply::Malformed,
    };
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text);
    match text {
        Some(text) => AiReply::Text(text),
        None => AiReply::Malformed,
    }
}
