//! Errors raised while loading or persisting `tecton.ron`.

use std::path::PathBuf;

/// Failure to read, parse, or write the config file. Every variant that touches
/// the filesystem carries the path it was working on.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid RON for [`Config`](crate::Config).
    #[error("invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The config directory or file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory config could not be rendered as RON.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

impl ConfigError {
    /// Path of the file or directory involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => {
                Some(path)
            }
            Self::Serialize(_) => None,
        }
    }
}
