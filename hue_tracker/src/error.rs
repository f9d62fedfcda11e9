// THEORY:
// One error type for the whole library. Only two failures are part of the normal
// story: a source that cannot be opened (fatal) and the end of a stream (not an
// error at all, modelled as `Ok(None)` by `FrameSource::read`). Everything else
// here is a genuine fault: bad configuration, frames that change size mid-run, or a
// collaborator (codec, font, backend) giving up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("error opening video stream or file '{source_name}': {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("frame geometry changed mid-run: expected {expected:?}, found {found:?}")]
    FrameGeometry {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("font unusable: {0}")]
    Font(String),

    #[error("backend failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
