use crate::config::TranscriptionConfig;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The Whisper server answers anything smaller than this with an error
pub const MIN_AUDIO_BYTES: usize = 1000;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    success: bool,
    #[serde(default)]
    transcription: String,
    message: Option<String>,
    processing_time_ms: Option<u64>,
    language: Option<String>,
    confidence: Option<f64>,
}

/// Decoded speech
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
    pub confidence: Option<f64>,
    pub processing_time_ms: Option<u64>,
}

impl TranscriptionResponse {
    fn into_transcript(self) -> Result<Transcript, String> {
        if !self.success {
            return Err(self
                .message
                .unwrap_or_else(|| "transcription unsuccessful".to_string()));
        }
        Ok(Transcript {
            text: self.transcription.trim().to_string(),
            language: self.language,
            confidence: self.confidence,
            processing_time_ms: self.processing_time_ms,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Speech to text
pub trait Transcriber: Send + Sync {
    fn transcribe(
        &self,
        file_name: &str,
        audio: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<Transcript, String>> + Send;
}

/// Client for the Whisper transcription server
pub struct WhisperClient {
    base_url: String,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: &TranscriptionConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `GET /health`, falling back to the root status page on servers without it
    pub async fn health(&self) -> Result<HealthStatus, String> {
        match self.get_status("/health").await? {
            Some(status) => Ok(status),
            None => {
                log::debug!("{}/health not found, trying root status", self.base_url);
                self.get_status("/")
                    .await?
                    .ok_or_else(|| "transcription server has no status endpoint".to_string())
            }
        }
    }

    /// `Ok(None)` when the endpoint does not exist
    async fn get_status(&self, path: &str) -> Result<Option<HealthStatus>, String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("health request failed: {e}"))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(format!("health check returned status {}", resp.status()));
        }
        resp.json()
            .await
            .map(Some)
            .map_err(|e| format!("failed to parse health response: {e}"))
    }
}

impl Transcriber for WhisperClient {
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> Result<Transcript, String> {
        let url = format!("{}/transcribe", self.base_url);
        let size = audio.len();

        let file_part = multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = multipart::Form::new().part("audio", file_part);

        log::debug!("uploading {size} bytes to {url}");
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("transcription request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("transcription server returned status {}", resp.status()));
        }

        let body: TranscriptionResponse = resp
            .json()
            .await
            .map_err(|e| format!("failed to parse transcription response: {e}"))?;
        body.into_transcript()
    }
}
