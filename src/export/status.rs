use crate::foundation::error::StkrResult;

/// Where an export is in its pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportPhase {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// Fetching full-quality pixels for every selection.
    Resolving,
    /// Drawing tiles onto the output surface.
    Rasterizing,
    /// Compressing the surface.
    Encoding,
    /// Handing the encoded bytes to the output sink.
    Persisting,
    /// The last export succeeded.
    Done,
    /// The last export failed, with a user-facing reason.
    Failed(String),
}

impl ExportPhase {
    /// Whether the pipeline is between start and completion.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Resolving | Self::Rasterizing | Self::Encoding | Self::Persisting
        )
    }
}

/// Coarse export status for a front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    /// An export is running.
    Exporting,
    /// The image was produced and persisted.
    Success,
    /// The export failed; the message is safe to show to a user.
    Failure(String),
}

impl ExportStatus {
    /// Map an export result to a status.
    pub fn from_result<T>(res: &StkrResult<T>) -> Self {
        match res {
            Ok(_) => Self::Success,
            Err(e) => Self::Failure(e.user_message()),
        }
    }

    /// Status for a phase, or `None` while idle.
    pub fn from_phase(phase: &ExportPhase) -> Option<Self> {
        match phase {
            ExportPhase::Idle => None,
            ExportPhase::Resolving
            | ExportPhase::Rasterizing
            | ExportPhase::Encoding
            | ExportPhase::Persisting => Some(Self::Exporting),
            ExportPhase::Done => Some(Self::Success),
            ExportPhase::Failed(msg) => Some(Self::Failure(msg.clone())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/status.rs"]
mod tests;
