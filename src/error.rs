use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the library's input edges.
///
/// Packing, animation and interaction never fail; bad geometry degrades to
/// an empty or minimum-height layout instead.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options file {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown easing {0:?}")]
    UnknownEasing(String),

    #[error("unknown entry direction {0:?}")]
    UnknownDirection(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
