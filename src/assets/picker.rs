use crate::selection::model::{AssetRef, ImageSelection};
use crate::selection::state::CompositionState;

/// One result handed back by the platform picker.
#[derive(Clone, Debug, PartialEq)]
pub struct PickedAsset {
    /// Library handle.
    pub asset: AssetRef,
    /// Intrinsic width in pixels.
    pub width: f64,
    /// Intrinsic height in pixels.
    pub height: f64,
}

impl PickedAsset {
    /// Build a pick result.
    pub fn new(asset: impl Into<AssetRef>, width: f64, height: f64) -> Self {
        Self {
            asset: asset.into(),
            width,
            height,
        }
    }

    /// Turn the pick into a fresh selection.
    pub fn into_selection(self) -> ImageSelection {
        ImageSelection::new(self.asset, self.width, self.height)
    }
}

/// What a picker session does with its results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickMode {
    /// Append to the end of the stack.
    Append,
    /// Replace the selection at this index.
    Replace(usize),
}

/// How many items the picker should let the user choose.
pub fn picker_limit(state: &CompositionState, mode: PickMode) -> usize {
    match mode {
        PickMode::Append => state.remaining_capacity(),
        PickMode::Replace(_) => 1,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/picker.rs"]
mod tests;
