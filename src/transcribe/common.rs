use tracing::warn;

use crate::error::{Result, SubburnError};

/// Language reported when the model output carries none
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// One timed piece of recognised text.
///
/// Timing is validated on construction (`start >= 0`, `end > start`) and the
/// segment is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    start: f64,
    end: f64,
    text: String,
}

impl Segment {
    pub fn new<S: Into<String>>(start: f64, end: f64, text: S) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
            return Err(SubburnError::Transcriber(format!(
                "Invalid segment timing: start={} end={}",
                start, end
            )));
        }

        Ok(Self {
            start,
            end,
            text: text.into(),
        })
    }

    /// Start time in seconds
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Result of one model run: detected (or pinned) language plus ordered segments
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub language: String,
    pub segments: Vec<Segment>,
}

/// Trait for converting service-specific model output into a [`Transcription`]
pub trait TranscriptionMapper<T> {
    fn to_transcription(service_result: T) -> Result<Transcription>;
}

/// Build segments from raw `(start, end, text)` triples, keeping order and
/// dropping entries whose timing cannot form a valid segment.
pub fn collect_segments<I>(raw: I) -> Vec<Segment>
where
    I: IntoIterator<Item = (f64, f64, String)>,
{
    raw.into_iter()
        .filter_map(|(start, end, text)| match Segment::new(start, end, text.trim()) {
            Ok(segment) => Some(segment),
            Err(e) => {
                warn!("Skipping segment: {}", e);
                None
            }
        })
        .collect()
}
