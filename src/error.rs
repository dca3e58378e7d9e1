use std::path::PathBuf;

use thiserror::Error;

use crate::document::PixelFormat;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("There is no sprite selected.")]
    NoActiveDocument,
    #[error("You can use this command only for RGB sprites ({0} sprite selected).")]
    UnsupportedFormat(PixelFormat),
    #[error("Error with palette file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("The document is in use.")]
    DocumentAccess,
}

impl EditError {
    pub fn io(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        EditError::Io {
            path: path.into(),
            source: err.into(),
        }
    }
}
