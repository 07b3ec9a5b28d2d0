use std::{io, path::PathBuf};

use thiserror::Error;

use crate::piece::PieceKind;

#[derive(Debug, Error)]
pub enum GameError {
    /// Rotation is only implemented for shapes that are symmetric under it.
    #[error("rotation is not supported for {0:?} pieces")]
    RotationUnsupported(PieceKind),

    #[error("board of {width}x{height} is outside the supported 3x4 to 255x255")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidOverride { var: &'static str, value: String },
}
