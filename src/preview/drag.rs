use crate::foundation::core::Point;
use crate::preview::layout::PreviewLayout;
use crate::selection::model::SelectionId;
use crate::selection::state::CompositionState;

/// Drag-to-reorder bookkeeping, decoupled from any gesture recognizer.
///
/// At most one drag is active. Moves fire only when the pointer enters a slot other than the
/// last observed target, so hovering inside one slot never repeats a move.
#[derive(Clone, Debug, Default)]
pub struct DragReorder {
    active: Option<SelectionId>,
    last_target: Option<SelectionId>,
}

impl DragReorder {
    /// Idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `id`. Returns `false` if a different drag is already active.
    pub fn begin(&mut self, id: SelectionId) -> bool {
        match self.active {
            Some(current) if current != id => false,
            Some(_) => true,
            None => {
                self.active = Some(id);
                self.last_target = None;
                true
            }
        }
    }

    /// Selection currently being dragged.
    pub fn active(&self) -> Option<SelectionId> {
        self.active
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Feed a pointer location; returns the `(from, to)` move to apply, if any.
    pub fn update(
        &mut self,
        point: Point,
        state: &CompositionState,
        layout: &PreviewLayout,
    ) -> Option<(usize, usize)> {
        let dragged = self.active?;
        let source = state.index_of(dragged)?;
        let slot = layout.slot_at(point)?;
        let target_id = *layout.ids().get(slot)?;

        if self.last_target == Some(target_id) {
            return None;
        }
        self.last_target = Some(target_id);

        let target = state.index_of(target_id)?;
        (target != source).then_some((source, target))
    }

    /// Finish the drag and forget the last target.
    pub fn end(&mut self) {
        self.active = None;
        self.last_target = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/drag.rs"]
mod tests;
