// Speech model abstraction
//
// The pipeline talks to a loaded model through the SpeechModel trait. The
// handle is created explicitly by the caller (see OpenAIWhisperModel::load)
// and lives as long as its owner; there is no process-wide model state.

pub mod common;
pub mod openai;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use common::*;
pub use openai::OpenAIWhisperModel;

use crate::error::Result;

/// Pretrained model size; larger models are slower to load and run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inference task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Keep the spoken language
    Transcribe,
    /// Render the text in English whatever the source language
    Translate,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Transcribe => "transcribe",
            Task::Translate => "translate",
        }
    }
}

/// Parameters for one model run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscribeRequest {
    pub task: Task,
    /// Source language hint; `None` lets the model detect it
    pub language: Option<String>,
}

impl TranscribeRequest {
    /// Forced-translation request. A blank hint counts as no hint.
    pub fn translate(language: Option<&str>) -> Self {
        let language = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);

        Self {
            task: Task::Translate,
            language,
        }
    }
}

/// A loaded speech-to-text model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Run inference over a 16 kHz mono audio file
    async fn transcribe(&self, audio_path: &Path, request: &TranscribeRequest) -> Result<Transcription>;

    /// Size the handle was loaded with
    fn model_size(&self) -> ModelSize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_normalises_language() {
        assert_eq!(TranscribeRequest::translate(None).language, None);
        assert_eq!(TranscribeRequest::translate(Some("")).language, None);
        assert_eq!(TranscribeRequest::translate(Some("  ")).language, None);
        assert_eq!(
            TranscribeRequest::translate(Some("ja")).language.as_deref(),
            Some("ja")
        );
        assert_eq!(TranscribeRequest::translate(Some("ja")).task, Task::Translate);
    }

    #[test]
    fn test_model_size_names() {
        assert_eq!(ModelSize::Small.to_string(), "small");
        assert_eq!(ModelSize::Medium.as_str(), "medium");
        assert_eq!(ModelSize::Large.to_string(), "large");
    }
}
