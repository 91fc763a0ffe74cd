use crate::foundation::config::{MAX_IMAGES, MIN_IMAGES};
use crate::selection::model::{ImageSelection, SelectionId};

/// Ordered top-to-bottom stack of selections.
///
/// Every operation is index-checked; out-of-range indices and appends past the cap
/// leave the sequence unchanged instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionState {
    images: Vec<ImageSelection>,
    cap: usize,
    min_exportable: usize,
}

impl Default for CompositionState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositionState {
    /// Empty state with the default cap of [`MAX_IMAGES`].
    pub fn new() -> Self {
        Self::with_limits(MAX_IMAGES, MIN_IMAGES)
    }

    /// Empty state with explicit limits (normally taken from [`crate::ComposeConfig`]).
    pub fn with_limits(cap: usize, min_exportable: usize) -> Self {
        Self {
            images: Vec::with_capacity(cap),
            cap,
            min_exportable,
        }
    }

    /// Current selections in stacking order.
    pub fn images(&self) -> &[ImageSelection] {
        &self.images
    }

    /// Number of selections.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether there are no selections.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Maximum number of selections.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Whether another image can be appended.
    pub fn can_add_more(&self) -> bool {
        self.images.len() < self.cap
    }

    /// Whether the composition has enough images to export.
    pub fn can_export(&self) -> bool {
        self.images.len() >= self.min_exportable
    }

    /// Free slots left before the cap.
    pub fn remaining_capacity(&self) -> usize {
        self.cap.saturating_sub(self.images.len())
    }

    /// Position of the selection with identity `id`.
    pub fn index_of(&self, id: SelectionId) -> Option<usize> {
        self.images.iter().position(|s| s.id() == id)
    }

    /// Aspect ratios in stacking order, as consumed by the layout engine.
    pub fn aspect_ratios(&self) -> Vec<f64> {
        self.images.iter().map(ImageSelection::aspect_ratio).collect()
    }

    /// Append `selection` unless the stack is full.
    pub fn add(&mut self, selection: ImageSelection) -> &[ImageSelection] {
        if self.can_add_more() {
            self.images.push(selection);
        }
        &self.images
    }

    /// Remove the selection at `index`.
    pub fn remove_at(&mut self, index: usize) -> &[ImageSelection] {
        if index < self.images.len() {
            self.images.remove(index);
        }
        &self.images
    }

    /// Replace the selection at `index` with a new record.
    pub fn replace_at(&mut self, index: usize, selection: ImageSelection) -> &[ImageSelection] {
        if let Some(slot) = self.images.get_mut(index) {
            *slot = selection;
        }
        &self.images
    }

    /// Move the selection at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> &[ImageSelection] {
        let len = self.images.len();
        if from < len && to < len && from != to {
            let moved = self.images.remove(from);
            self.images.insert(to, moved);
        }
        &self.images
    }

    /// Drop every selection.
    pub fn clear_all(&mut self) -> &[ImageSelection] {
        self.images.clear();
        &self.images
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/state.rs"]
mod tests;
