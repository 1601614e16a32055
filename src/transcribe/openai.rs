// OpenAI Whisper command-line implementation
//
// Runs the `whisper` tool with JSON output into a private scratch directory
// and maps the result into a Transcription.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::common::{collect_segments, Transcription, TranscriptionMapper, UNKNOWN_LANGUAGE};
use super::{ModelSize, SpeechModel, TranscribeRequest};
use crate::config::TranscriberConfig;
use crate::error::{Result, SubburnError};

/// OpenAI Whisper specific JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

/// OpenAI Whisper specific segment format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Mapper for OpenAI Whisper format
pub struct OpenAIWhisperMapper;

impl TranscriptionMapper<OpenAIWhisperOutput> for OpenAIWhisperMapper {
    fn to_transcription(whisper_output: OpenAIWhisperOutput) -> Result<Transcription> {
        let segments = collect_segments(
            whisper_output
                .segments
                .into_iter()
                .map(|seg| (seg.start, seg.end, seg.text)),
        );

        Ok(Transcription {
            language: whisper_output
                .language
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            segments,
        })
    }
}

/// Handle to a whisper model of a fixed size
#[derive(Debug)]
pub struct OpenAIWhisperModel {
    config: TranscriberConfig,
    size: ModelSize,
}

impl OpenAIWhisperModel {
    /// Load a model handle, failing early when the whisper tool is missing
    pub async fn load(config: TranscriberConfig, size: ModelSize) -> Result<Self> {
        Self::check_availability(&config.binary_path).await?;
        info!("Loaded whisper model: {}", size);
        Ok(Self::with_config(config, size))
    }

    /// Build a handle without probing the binary
    pub fn with_config(config: TranscriberConfig, size: ModelSize) -> Self {
        Self { config, size }
    }

    /// Check if the whisper command-line tool can be executed
    pub async fn check_availability(binary_path: &str) -> Result<()> {
        let output = Command::new(binary_path)
            .arg("--help")
            .output()
            .await
            .map_err(|e| SubburnError::Transcriber(format!("{} command not found: {}", binary_path, e)))?;

        if output.status.success() {
            debug!("Whisper command-line tool is available");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SubburnError::Transcriber(format!(
                "Whisper not available. Install with: pip install openai-whisper\nError: {}",
                stderr
            )))
        }
    }

    /// Arguments for one whisper invocation
    pub fn command_args(&self, audio_path: &Path, output_dir: &Path, request: &TranscribeRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            audio_path.into(),
            "--model".into(),
            self.size.as_str().into(),
            "--task".into(),
            request.task.as_str().into(),
            "--output_dir".into(),
            output_dir.into(),
            "--output_format".into(),
            "json".into(),
            "--verbose".into(),
            "False".into(),
        ];

        if let Some(lang) = &request.language {
            args.push("--language".into());
            args.push(lang.into());
        }
        if let Some(model_dir) = &self.config.model_dir {
            args.push("--model_dir".into());
            args.push(model_dir.into());
        }
        if let Some(device) = &self.config.device {
            args.push("--device".into());
            args.push(device.into());
        }
        args.extend(self.config.extra_args.iter().map(OsString::from));

        args
    }
}

#[async_trait]
impl SpeechModel for OpenAIWhisperModel {
    async fn transcribe(&self, audio_path: &Path, request: &TranscribeRequest) -> Result<Transcription> {
        info!(
            "Running whisper {} ({}) on {}",
            self.size,
            request.task.as_str(),
            audio_path.display()
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SubburnError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let args = self.command_args(audio_path, output_dir, request);
        debug!("Executing whisper command: {} {:?}", self.config.binary_path, args);

        let output = Command::new(&self.config.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| SubburnError::Transcriber(format!("Failed to execute whisper command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubburnError::Transcriber(format!(
                "Whisper transcription failed ({}): {}",
                output.status, stderr
            )));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| SubburnError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        if !json_file.exists() {
            return Err(SubburnError::Transcriber(
                "Whisper JSON output file not found".to_string(),
            ));
        }

        let json_content = tokio::fs::read_to_string(&json_file).await?;
        let whisper_output: OpenAIWhisperOutput = serde_json::from_str(&json_content)?;

        OpenAIWhisperMapper::to_transcription(whisper_output)
    }

    fn model_size(&self) -> ModelSize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::Task;

    fn lossy(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_mapper_parses_whisper_json() {
        let json = r#"{
            "text": " Hello there.",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 1.5, "text": " Hello", "tokens": [1, 2],
                 "temperature": 0.0, "avg_logprob": -0.2, "compression_ratio": 1.1, "no_speech_prob": 0.01},
                {"id": 1, "seek": 0, "start": 1.5, "end": 3.0, "text": " there.", "tokens": [3],
                 "temperature": 0.0, "avg_logprob": -0.3, "compression_ratio": 1.0, "no_speech_prob": 0.02}
            ],
            "language": "ja"
        }"#;

        let output: OpenAIWhisperOutput = serde_json::from_str(json).unwrap();
        let transcription = OpenAIWhisperMapper::to_transcription(output).unwrap();

        assert_eq!(transcription.language, "ja");
        assert_eq!(transcription.segments.len(), 2);
        assert_eq!(transcription.segments[0].text(), "Hello");
        assert_eq!(transcription.segments[1].text(), "there.");
        assert_eq!(transcription.segments[1].start(), 1.5);
    }

    #[test]
    fn test_mapper_defaults_language_and_skips_degenerate() {
        let json = r#"{"segments": [
            {"start": 2.0, "end": 2.0, "text": "empty"},
            {"start": 2.0, "end": 4.0, "text": "kept"}
        ]}"#;

        let output: OpenAIWhisperOutput = serde_json::from_str(json).unwrap();
        let transcription = OpenAIWhisperMapper::to_transcription(output).unwrap();

        assert_eq!(transcription.language, UNKNOWN_LANGUAGE);
        assert_eq!(transcription.segments.len(), 1);
        assert_eq!(transcription.segments[0].text(), "kept");
    }

    #[test]
    fn test_command_args_auto_detect() {
        let model = OpenAIWhisperModel::with_config(TranscriberConfig::default(), ModelSize::Medium);
        let args = model.command_args(
            Path::new("temp/temp_audio.wav"),
            Path::new("/tmp/out"),
            &TranscribeRequest::translate(None),
        );

        assert_eq!(
            lossy(&args),
            vec![
                "temp/temp_audio.wav",
                "--model",
                "medium",
                "--task",
                "translate",
                "--output_dir",
                "/tmp/out",
                "--output_format",
                "json",
                "--verbose",
                "False",
            ]
        );
    }

    #[test]
    fn test_command_args_with_hint_and_config() {
        let config = TranscriberConfig {
            model_dir: Some("/models".to_string()),
            device: Some("cuda".to_string()),
            extra_args: vec!["--fp16".to_string(), "False".to_string()],
            ..TranscriberConfig::default()
        };
        let model = OpenAIWhisperModel::with_config(config, ModelSize::Large);
        let request = TranscribeRequest {
            task: Task::Transcribe,
            language: Some("fr".to_string()),
        };

        let args = lossy(&model.command_args(Path::new("a.wav"), Path::new("out"), &request));

        assert_eq!(&args[1..5], ["--model", "large", "--task", "transcribe"]);
        assert_eq!(
            &args[11..],
            ["--language", "fr", "--model_dir", "/models", "--device", "cuda", "--fp16", "False"]
        );
    }

    #[tokio::test]
    async fn test_load_fails_for_missing_binary() {
        let config = TranscriberConfig {
            binary_path: "subburn-no-such-whisper-binary".to_string(),
            ..TranscriberConfig::default()
        };

        let result = OpenAIWhisperModel::load(config, ModelSize::Small).await;
        assert!(matches!(result, Err(SubburnError::Transcriber(_))));
    }

    #[tokio::test]
    async fn test_transcribe_reports_command_failure() {
        let config = TranscriberConfig {
            binary_path: "subburn-no-such-whisper-binary".to_string(),
            ..TranscriberConfig::default()
        };
        let model = OpenAIWhisperModel::with_config(config, ModelSize::Small);

        let result = model
            .transcribe(Path::new("missing.wav"), &TranscribeRequest::translate(None))
            .await;
        assert!(matches!(result, Err(SubburnError::Transcriber(_))));
        assert_eq!(model.model_size(), ModelSize::Small);
    }
}
