use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::transcribe::ModelSize;
use crate::workflow::RunConfig;

/// Transcribe and translate video subtitles using Whisper, then burn them into the video
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input video file
    pub input_video: PathBuf,

    /// Path to the output video file (default: <input>_with_subs.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Whisper model size (default: medium)
    #[arg(short, long, value_enum)]
    pub model: Option<ModelSize>,

    /// Source language code (auto-detected if not specified)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Directory for temporary files (default: temp)
    #[arg(short, long)]
    pub temp_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Resolve the run settings, letting command-line flags override the config file
    pub fn run_config(&self, config: &Config) -> RunConfig {
        RunConfig::new(
            self.input_video.clone(),
            self.output.clone(),
            self.model.unwrap_or(config.transcriber.model),
            self.language.clone(),
            self.temp_dir
                .clone()
                .unwrap_or_else(|| config.workflow.temp_dir.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["subburn", "movie.mp4"]).unwrap();
        let run = args.run_config(&Config::default());

        assert_eq!(run.input, PathBuf::from("movie.mp4"));
        assert_eq!(run.output, PathBuf::from("movie_with_subs.mp4"));
        assert_eq!(run.model_size, ModelSize::Medium);
        assert_eq!(run.language, None);
        assert_eq!(run.temp_dir, PathBuf::from("temp"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "subburn", "in.mkv", "-o", "out.mkv", "-m", "large", "-l", "ja", "-t", "/tmp/work", "-v",
        ])
        .unwrap();
        let run = args.run_config(&Config::default());

        assert_eq!(run.output, PathBuf::from("out.mkv"));
        assert_eq!(run.model_size, ModelSize::Large);
        assert_eq!(run.language.as_deref(), Some("ja"));
        assert_eq!(run.temp_dir, PathBuf::from("/tmp/work"));
        assert!(args.verbose);
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "subburn",
            "in.mp4",
            "--output",
            "o.mp4",
            "--model",
            "small",
            "--language",
            "fr",
            "--temp-dir",
            "scratch",
            "--config",
            "subburn.toml",
        ])
        .unwrap();

        assert_eq!(args.model, Some(ModelSize::Small));
        assert_eq!(args.temp_dir, Some(PathBuf::from("scratch")));
        assert_eq!(args.config, Some(PathBuf::from("subburn.toml")));
    }

    #[test]
    fn test_config_supplies_defaults() {
        let mut config = Config::default();
        config.transcriber.model = ModelSize::Small;
        config.workflow.temp_dir = PathBuf::from("cache");

        let args = Args::try_parse_from(["subburn", "a.mp4"]).unwrap();
        let run = args.run_config(&config);
        assert_eq!(run.model_size, ModelSize::Small);
        assert_eq!(run.temp_dir, PathBuf::from("cache"));

        let args = Args::try_parse_from(["subburn", "a.mp4", "-m", "medium"]).unwrap();
        assert_eq!(args.run_config(&config).model_size, ModelSize::Medium);
    }

    #[test]
    fn test_rejects_unknown_model_and_missing_input() {
        assert!(Args::try_parse_from(["subburn", "a.mp4", "-m", "tiny"]).is_err());
        assert!(Args::try_parse_from(["subburn"]).is_err());
    }
}
