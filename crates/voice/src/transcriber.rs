//! Speech-to-text collaborator seam.
//!
//! Transcription itself is a black box. The engine only sees a string or one of
//! two named failures, and never adds a timeout of its own.

use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    /// Audio was captured but could not be interpreted.
    #[error("audio not understood")]
    Unintelligible,

    /// The recognition service could not be reached.
    #[error("recognition service connection error: {0}")]
    ServiceUnavailable(String),
}

/// Blocking source of recognized utterances.
pub trait Transcriber {
    fn transcribe(&mut self) -> Result<String, TranscriptionError>;
}

/// Replays the same result on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTranscript {
    result: Result<String, TranscriptionError>,
}

impl FixedTranscript {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
        }
    }

    pub fn failing(error: TranscriptionError) -> Self {
        Self { result: Err(error) }
    }
}

impl Transcriber for FixedTranscript {
    fn transcribe(&mut self) -> Result<String, TranscriptionError> {
        self.result.clone()
    }
}

/// Reads one utterance per line, e.g. from a terminal or a recognizer piping text.
///
/// A blank line is unintelligible audio. End of input or a read failure means
/// the service is gone and marks the transcriber exhausted.
#[derive(Debug)]
pub struct LineTranscriber<R> {
    reader: R,
    exhausted: bool,
}

impl<R: BufRead> LineTranscriber<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }

    /// True once end of input has been reached or the reader has failed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R: BufRead> Transcriber for LineTranscriber<R> {
    fn transcribe(&mut self) -> Result<String, TranscriptionError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.exhausted = true;
                Err(TranscriptionError::ServiceUnavailable("input closed".to_string()))
            }
            Ok(_) => {
                let text = line.trim();
                if text.is_empty() {
                    Err(TranscriptionError::Unintelligible)
                } else {
                    Ok(text.to_string())
                }
            }
            Err(e) => {
                self.exhausted = true;
                Err(TranscriptionError::ServiceUnavailable(e.to_string()))
            }
        }
    }
}
