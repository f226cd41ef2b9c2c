//! Haven, the companion that writes reflections and affirmations. Text comes from a
//! [TextGenerator], by default Gemini through [gemini::GeminiClient]. Every failure is masked
//! behind a fixed fallback text, so callers always get something to show.

pub mod gemini;

use std::{fmt::Display, future::Future};

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

pub const REFLECTION_FALLBACK: &str = "I'm having a little trouble reflecting right now, but please know that your thoughts are valid and important.";
pub const AFFIRMATION_FALLBACK: &str =
    "I am capable of overcoming any challenge that comes my way.";

/// Something that turns a prompt into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Result of a companion request. Either freshly generated text or the fallback used when
/// generation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    Text(String),
    Fallback(&'static str),
}

impl Generated {
    pub fn as_str(&self) -> &str {
        match self {
            Generated::Text(text) => text,
            Generated::Fallback(text) => text,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Generated::Text(text) => text,
            Generated::Fallback(text) => text.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback(_))
    }
}

impl Display for Generated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct Companion {
    generator: Box<dyn TextGenerator>,
}

impl Companion {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Short supportive reflection on a journal entry.
    #[instrument(skip_all)]
    pub async fn reflect(&self, journal_text: &str) -> Generated {
        let prompt = format!(
            "You are a compassionate mental health assistant named Haven. Read the following journal entry and provide a short (under 60 words), gentle, and encouraging reflection. Focus on acknowledging the user's feelings and offer a message of hope, strength, or self-kindness. Do not give medical advice. Journal entry: \"{journal_text}\""
        );
        match self.generate_non_empty(&prompt).await {
            Ok(text) => {
                info!("Generated reflection");
                Generated::Text(text)
            }
            Err(e) => {
                error!("Error analyzing journal entry: {e:?}");
                Generated::Fallback(REFLECTION_FALLBACK)
            }
        }
    }

    /// One short first person affirmation, without quotation marks.
    #[instrument(skip_all)]
    pub async fn affirmation(&self) -> Generated {
        let prompt = "Generate one short, powerful, and unique positive affirmation for someone working on their mental well-being. Make it personal, using \"I am\" or \"I can\".";
        let result = self
            .generate_non_empty(prompt)
            .await
            .map(|text| strip_quotes(&text))
            .and_then(|text| {
                if text.is_empty() {
                    Err(anyhow::anyhow!("Affirmation consisted only of quotes"))
                } else {
                    Ok(text)
                }
            });
        match result {
            Ok(text) => {
                info!("Generated affirmation");
                Generated::Text(text)
            }
            Err(e) => {
                error!("Error fetching affirmation: {e:?}");
                Generated::Fallback(AFFIRMATION_FALLBACK)
            }
        }
    }

    async fn generate_non_empty(&self, prompt: &str) -> Result<String> {
        let text = self.generator.generate(prompt).await?;
        let text = text.trim();
        anyhow::ensure!(!text.is_empty(), "Generator returned an empty text");
        Ok(text.to_string())
    }
}

/// Runs `request` on its own task and waits for it only as long as `view` is alive. When the
/// view is cancelled `None` is returned at once. The request isn't aborted, its result is dropped
/// whenever it arrives.
pub async fn until_view_closed<T, Fut>(request: Fut, view: &CancellationToken) -> Option<T>
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let handle = tokio::spawn(request);
    tokio::select! {
        biased;
        _ = view.cancelled() => {
            warn!("View closed while waiting for the companion");
            None
        }
        joined = handle => match joined {
            Ok(value) => Some(value),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                error!("Companion request was stopped: {e}");
                None
            }
        },
    }
}

fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\u{201C}' | '\u{201D}'))
        .collect::<String>()
        .trim()
        .to_string()
}
