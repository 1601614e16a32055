use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::transcribe::Segment;

/// Render segments as SRT cues, numbered from 1 in the given order
pub fn render_srt(segments: &[Segment]) -> String {
    let mut srt_content = String::new();

    for (index, segment) in segments.iter().enumerate() {
        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_srt_time(segment.start()),
            format_srt_time(segment.end()),
            segment.text().trim()
        ));
    }

    srt_content
}

/// Generate SRT subtitle file from segments, returning the number of cues written
pub async fn generate_srt<P: AsRef<Path>>(segments: &[Segment], output_path: P) -> Result<usize> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    fs::write(output_path, render_srt(segments)).await?;

    info!("SRT file generated with {} cues", segments.len());
    Ok(segments.len())
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm).
///
/// Milliseconds are truncated, not rounded; hours are not wrapped at 24.
/// Negative input saturates to zero.
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds * 1000.0) as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
