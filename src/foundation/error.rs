/// Convenience result type used across stkr.
pub type StkrResult<T> = Result<T, StkrError>;

/// Top-level error taxonomy used by export and asset APIs.
///
/// Selection and layout operations never fail; only configuration, asset access and the
/// three export stages produce errors.
#[derive(thiserror::Error, Debug)]
pub enum StkrError {
    /// Invalid configuration or an export request that does not meet its preconditions.
    #[error("validation error: {0}")]
    Validation(String),

    /// The asset source was used before library access was granted.
    #[error("permission error: {0}")]
    Permission(String),

    /// One or more source assets could not be resolved to pixel data.
    #[error("asset resolution error: {0}")]
    AssetResolution(String),

    /// Compositing produced no output surface.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// A surface was produced but could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Another export is already running.
    #[error("export already in progress")]
    ExportInProgress,

    /// The output sink failed to persist the encoded bytes.
    #[error("output error: {0}")]
    Output(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StkrError {
    /// Build a [`StkrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StkrError::Permission`] value.
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    /// Build a [`StkrError::AssetResolution`] value.
    pub fn asset_resolution(msg: impl Into<String>) -> Self {
        Self::AssetResolution(msg.into())
    }

    /// Build a [`StkrError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`StkrError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`StkrError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Short reason suitable for a dismissable status message.
    ///
    /// Each export stage maps to its own message so a front end never conflates them.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Permission(_) => "Please allow access to your photos to use this app.".into(),
            Self::AssetResolution(_) => "Failed to load image from Photos library".into(),
            Self::Rasterization(_) => "Failed to generate composed image".into(),
            Self::Encoding(_) => "Failed to export image".into(),
            Self::ExportInProgress => "An export is already in progress".into(),
            Self::Output(_) => "Could not save image".into(),
            Self::Other(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
