use crate::{config::SpeechConfig, models::Mood, utils::AppError};

const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";
const PROSODY_RATE: &str = "1.1";

/// Proxy para o serviço de voz (Azure Cognitive Services)
///
/// Um token novo é emitido a cada síntese; nada é cacheado.
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    key: Option<String>,
    region: Option<String>,
}

impl SpeechClient {
    pub fn new(config: &SpeechConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            key: config.key.clone(),
            region: config.region.clone(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (self.key.as_deref(), self.region.as_deref()) {
            (Some(key), Some(region)) => Ok((key, region)),
            _ => Err(AppError::Misconfigured(
                "SPEECH_KEY or SPEECH_REGION is not set".to_string(),
            )),
        }
    }

    async fn issue_token(&self, key: &str, region: &str) -> Result<String, AppError> {
        let url = format!("https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken", region);

        let response = self
            .http
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", key)
            .header("Content-Length", "0")
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Token request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "Token request rejected: {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    /// Sintetiza o texto; a resposta é devolvida sem ler o corpo (áudio MP3)
    pub async fn synthesize(&self, text: &str, mood: Mood) -> Result<reqwest::Response, AppError> {
        let (key, region) = self.credentials()?;

        let token = self.issue_token(key, region).await?;
        let url = format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region);

        log::info!("🔊 Synthesizing {} chars with voice {}", text.chars().count(), mood.voice_name());

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(build_ssml(text, mood))
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Synthesis request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "Synthesis rejected: {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn build_ssml(text: &str, mood: Mood) -> String {
    format!(
        "<speak version='1.0' xml:lang='ko-KR'><voice name='{}'><prosody rate=\"{}\">{}</prosody></voice></speak>",
        mood.voice_name(),
        PROSODY_RATE,
        escape_xml(text)
    )
}
