use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("could not load carrier image: {0}")]
    Image(#[from] image::ImageError),

    /// Every channel and plane was scanned without completing the payload.
    /// `required` is `None` when the header itself never became readable.
    #[error("{}", scan_exhausted_message(.collected, .required))]
    ScanExhausted {
        collected: usize,
        required: Option<usize>,
    },

    #[error("bitstream too short: need {needed} bits, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("could not write '{}': {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn scan_exhausted_message(collected: &usize, required: &Option<usize>) -> String {
    match *required {
        Some(required) => format!(
            "no complete payload in carrier: scan ended after {} of {} bits",
            collected, required
        ),
        None => format!(
            "no complete payload in carrier: header unreadable after {} bits",
            collected
        ),
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
