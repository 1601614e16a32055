use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::artifact::TempArtifact;
use crate::config::Config;
use crate::error::{Result, SubburnError};
use crate::media::{MediaProcessor, MediaProcessorFactory};
use crate::subtitle::generate_srt;
use crate::transcribe::{ModelSize, OpenAIWhisperModel, SpeechModel, TranscribeRequest, Transcription};

/// Name of the extracted audio file inside the temp directory
pub const AUDIO_FILE_NAME: &str = "temp_audio.wav";
/// Name of the generated subtitle file inside the temp directory
pub const CAPTION_FILE_NAME: &str = "output_subtitles.srt";

/// Settings for one `process_video` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub model_size: ModelSize,
    pub language: Option<String>,
    pub temp_dir: PathBuf,
}

impl RunConfig {
    /// Build a run configuration, deriving the output path when none is given
    pub fn new(
        input: PathBuf,
        output: Option<PathBuf>,
        model_size: ModelSize,
        language: Option<String>,
        temp_dir: PathBuf,
    ) -> Self {
        let output = output.unwrap_or_else(|| default_output_path(&input));

        Self {
            input,
            output,
            model_size,
            language,
            temp_dir,
        }
    }

    pub fn audio_path(&self) -> PathBuf {
        self.temp_dir.join(AUDIO_FILE_NAME)
    }

    pub fn caption_path(&self) -> PathBuf {
        self.temp_dir.join(CAPTION_FILE_NAME)
    }
}

/// `<stem>_with_subs<suffix>` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = input
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    input.with_file_name(format!("{}_with_subs{}", stem, suffix))
}

/// Progress of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    AudioExtracted,
    Transcribed,
    Embedded,
    CleanedUp,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Init => "init",
            PipelineStage::AudioExtracted => "audio extracted",
            PipelineStage::Transcribed => "transcribed",
            PipelineStage::Embedded => "embedded",
            PipelineStage::CleanedUp => "cleaned up",
        };
        f.write_str(name)
    }
}

/// Extract -> transcribe/translate -> write SRT -> burn in
pub struct Workflow {
    media: Box<dyn MediaProcessor>,
    model: Box<dyn SpeechModel>,
}

impl Workflow {
    pub fn new(media: Box<dyn MediaProcessor>, model: Box<dyn SpeechModel>) -> Self {
        Self { media, model }
    }

    /// Build the ffmpeg/whisper workflow, checking both tools are usable
    pub async fn from_config(config: &Config, model_size: ModelSize) -> Result<Self> {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        media.check_availability().await?;

        let model = OpenAIWhisperModel::load(config.transcriber.clone(), model_size).await?;

        Ok(Self::new(media, Box::new(model)))
    }

    /// Run the whole pipeline for one video, returning the output path.
    ///
    /// Intermediate files are removed whether the run succeeds or not.
    pub async fn process_video(&self, run: &RunConfig) -> Result<PathBuf> {
        info!("Processing video file: {}", run.input.display());

        if !run.input.exists() {
            return Err(SubburnError::FileNotFound(run.input.display().to_string()));
        }
        if run.model_size != self.model.model_size() {
            warn!(
                "Run requested model {} but the loaded model is {}",
                run.model_size,
                self.model.model_size()
            );
        }

        fs::create_dir_all(&run.temp_dir).await?;

        let mut stage = PipelineStage::Init;
        let result = {
            let audio = TempArtifact::new(run.audio_path());
            let captions = TempArtifact::new(run.caption_path());
            self.run_stages(run, &audio, &captions, &mut stage).await
        };

        match &result {
            Ok(output) => {
                debug!("Pipeline reached stage: {}", PipelineStage::CleanedUp);
                info!("Process completed. Output saved as: {}", output.display());
            }
            Err(e) => warn!("Pipeline aborted after stage '{}': {}", stage, e),
        }

        result
    }

    async fn run_stages(
        &self,
        run: &RunConfig,
        audio: &TempArtifact,
        captions: &TempArtifact,
        stage: &mut PipelineStage,
    ) -> Result<PathBuf> {
        self.media.extract_audio(&run.input, audio.path()).await?;
        *stage = PipelineStage::AudioExtracted;

        self.transcribe_to_srt(audio.path(), captions.path(), run.language.as_deref())
            .await?;
        *stage = PipelineStage::Transcribed;

        self.media
            .embed_subtitles(&run.input, captions.path(), &run.output)
            .await?;
        *stage = PipelineStage::Embedded;

        Ok(run.output.clone())
    }

    /// Translate the audio and write the segments as an SRT file
    pub async fn transcribe_to_srt(
        &self,
        audio_path: &Path,
        srt_path: &Path,
        language: Option<&str>,
    ) -> Result<Transcription> {
        let request = TranscribeRequest::translate(language);
        let transcription = self.model.transcribe(audio_path, &request).await?;

        info!("Detected language: {}", transcription.language);

        generate_srt(&transcription.segments, srt_path).await?;

        info!("Transcription and translation completed");
        Ok(transcription)
    }
}
