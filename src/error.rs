use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the counterpart of an image does not exist under the second root.
    #[error("no counterpart found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// dimensions are reported as (width, height).
    #[error("image sizes differ: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch { left: (u32, u32), right: (u32, u32) },

    #[error("expected at least 3 color channels, found {channels}")]
    ChannelDepth { channels: u8 },

    #[error("i/o error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// another input of the same batch already claimed this output path.
    #[error("output {path:?} is already written from {first:?}")]
    OutputCollision { path: PathBuf, first: PathBuf },

    #[error("root directory {path:?} does not exist")]
    RootNotFound { path: PathBuf },

    #[error("failed to configure thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid color {0:?}, expected `R,G,B` or a color name")]
    InvalidColor(String),
}

impl Error {
    /// data problems that only affect a single item of a batch. everything else is an environment
    /// problem and aborts the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::Decode { .. }
                | Error::ShapeMismatch { .. }
                | Error::ChannelDepth { .. }
                | Error::OutputCollision { .. }
        )
    }
}
