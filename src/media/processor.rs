use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{MediaCommandBuilder, MediaProcessor};
use crate::config::MediaConfig;
use crate::error::{Result, SubburnError};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct FfmpegProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn embed_subtitles(&self, video_path: &Path, subtitle_path: &Path, output_path: &Path) -> Result<()> {
        info!(
            "Embedding subtitles from {} into {} -> {}",
            subtitle_path.display(),
            video_path.display(),
            output_path.display()
        );

        let command = self.command_builder.embed_subtitles(
            video_path,
            subtitle_path,
            output_path,
            &self.config.subtitle_options,
        );

        command.execute().await?;

        info!("Subtitles embedded into video");
        Ok(())
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        let command = self.command_builder.extract_audio(video_path, audio_path);
        command.execute().await?;

        info!("Audio extracted successfully");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .execute()
            .await
            .map_err(|e| SubburnError::Media(format!("Media processor not available: {}", e)))?;

        info!("Media processor is available");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_binary() -> FfmpegProcessor {
        FfmpegProcessor::new(MediaConfig {
            binary_path: "subburn-no-such-ffmpeg".to_string(),
            subtitle_options: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_check_availability_missing_binary() {
        let result = missing_binary().check_availability().await;
        assert!(matches!(result, Err(SubburnError::Media(_))));
    }

    #[tokio::test]
    async fn test_extract_audio_propagates_failure() {
        let result = missing_binary()
            .extract_audio(Path::new("in.mp4"), Path::new("out.wav"))
            .await;
        assert!(matches!(result, Err(SubburnError::Media(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_embed_subtitles_non_zero_exit() {
        // `false` ignores its arguments and exits 1
        let processor = FfmpegProcessor::new(MediaConfig {
            binary_path: "false".to_string(),
            subtitle_options: Vec::new(),
        });

        let err = processor
            .embed_subtitles(Path::new("in.mp4"), Path::new("subs.srt"), Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Subtitle embedding failed"));
    }
}
