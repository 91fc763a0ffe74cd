use std::fmt;
use std::sync::Arc;

use crate::assets::permission::{
    GatedAssetSource, PermissionCallback, PermissionGate, PermissionStatus,
};
use crate::assets::picker::{PickMode, PickedAsset, picker_limit};
use crate::assets::source::AssetSource;
use crate::encode::codec::ExportOutput;
use crate::encode::sink::OutputSink;
use crate::export::exporter::{ExportJob, Exporter};
use crate::export::status::ExportStatus;
use crate::foundation::config::ComposeConfig;
use crate::foundation::core::Point;
use crate::foundation::error::{StkrError, StkrResult};
use crate::preview::drag::DragReorder;
use crate::preview::layout::PreviewLayout;
use crate::selection::model::{AssetRef, ImageSelection, SelectionId};
use crate::selection::state::CompositionState;

/// Handle returned by [`ComposeSession::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&[ImageSelection]) + Send>;

/// One user's composition: selections, preview geometry, drag state and export.
///
/// The session is the single writer of its [`CompositionState`]. Observers see every change
/// to the sequence, in order, and nothing when an operation was a no-op.
pub struct ComposeSession {
    config: ComposeConfig,
    state: CompositionState,
    source: GatedAssetSource,
    exporter: Arc<Exporter>,
    drag: DragReorder,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for ComposeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposeSession")
            .field("state", &self.state)
            .field("drag", &self.drag)
            .field("observers", &self.observers.len())
            .field("exporter", &self.exporter)
            .finish()
    }
}

impl ComposeSession {
    /// Build a session reading from `source`, which is only touched once `gate` grants access.
    pub fn new(
        config: ComposeConfig,
        source: Arc<dyn AssetSource>,
        gate: Arc<dyn PermissionGate>,
    ) -> StkrResult<Self> {
        config.validate()?;
        let source = GatedAssetSource::new(source, gate);
        let exporter = Exporter::new(config.clone(), Arc::new(source.clone()))?;
        let state = CompositionState::with_limits(config.selection_cap, config.min_exportable);
        tracing::debug!(
            cap = config.selection_cap,
            canvas_w = config.canvas_width,
            canvas_h = config.canvas_height,
            "compose session created"
        );
        Ok(Self {
            config,
            state,
            source,
            exporter: Arc::new(exporter),
            drag: DragReorder::new(),
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Settings this session was built with.
    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Current composition.
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    /// Current selections in stacking order.
    pub fn images(&self) -> &[ImageSelection] {
        self.state.images()
    }

    /// Library access as last reported by the gate.
    pub fn permission_status(&self) -> PermissionStatus {
        self.source.status()
    }

    /// Ask the gate for library access; `done` receives the outcome.
    pub fn request_access(&self, done: PermissionCallback) {
        self.source.request_access(done);
    }

    /// Register `observer`, called with the new sequence after every change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&[ImageSelection]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Append `selection`. Returns whether the sequence changed.
    pub fn add_selection(&mut self, selection: ImageSelection) -> bool {
        self.mutate(|s| {
            s.add(selection);
        })
    }

    /// Append one picker result.
    pub fn add_picked(&mut self, picked: PickedAsset) -> bool {
        self.add_selection(picked.into_selection())
    }

    /// Append a library asset, reading its size through the permission gate.
    pub fn add_asset(&mut self, asset: impl Into<AssetRef>) -> StkrResult<bool> {
        if !self.state.can_add_more() {
            return Ok(false);
        }
        let asset = asset.into();
        let (w, h) = self.source.dimensions(&asset)?;
        Ok(self.add_selection(ImageSelection::new(asset, f64::from(w), f64::from(h))))
    }

    /// How many picks a picker opened in `mode` should allow.
    pub fn picker_limit(&self, mode: PickMode) -> usize {
        picker_limit(&self.state, mode)
    }

    /// Apply a batch of picker results as one change.
    ///
    /// Appends stop at the cap. A replacement uses the first pick and ignores the rest.
    pub fn apply_picks(&mut self, picks: Vec<PickedAsset>, mode: PickMode) -> bool {
        let limit = self.picker_limit(mode);
        if picks.len() > limit {
            tracing::debug!(picked = picks.len(), limit, "dropping picks past the limit");
        }
        self.mutate(|s| match mode {
            PickMode::Append => {
                for p in picks.into_iter().take(limit) {
                    s.add(p.into_selection());
                }
            }
            PickMode::Replace(index) => {
                if let Some(p) = picks.into_iter().next() {
                    s.replace_at(index, p.into_selection());
                }
            }
        })
    }

    /// Remove the selection at `index`.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.mutate(|s| {
            s.remove_at(index);
        })
    }

    /// Replace the selection at `index`.
    pub fn replace_at(&mut self, index: usize, selection: ImageSelection) -> bool {
        self.mutate(|s| {
            s.replace_at(index, selection);
        })
    }

    /// Move the selection at `from` to `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        self.mutate(|s| {
            s.move_item(from, to);
        })
    }

    /// Remove every selection and cancel any drag.
    pub fn clear_all(&mut self) -> bool {
        self.drag.end();
        self.mutate(|s| {
            s.clear_all();
        })
    }

    /// Preview geometry for a display `display_width` points wide.
    pub fn preview(&self, display_width: f64) -> PreviewLayout {
        PreviewLayout::new(&self.state, self.config.canvas(), display_width)
    }

    /// Start dragging `id`. Fails for unknown selections and while another drag is active.
    pub fn begin_drag(&mut self, id: SelectionId) -> bool {
        self.state.index_of(id).is_some() && self.drag.begin(id)
    }

    /// Feed a pointer location from the preview; applies at most one move.
    pub fn drag_to(&mut self, point: Point, layout: &PreviewLayout) -> bool {
        match self.drag.update(point, &self.state, layout) {
            Some((from, to)) => self.move_item(from, to),
            None => false,
        }
    }

    /// Finish the active drag.
    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Selection being dragged, if any.
    pub fn dragging(&self) -> Option<SelectionId> {
        self.drag.active()
    }

    /// Whether the current selection can be exported.
    pub fn can_export(&self) -> bool {
        self.state.can_export() && !self.exporter.is_busy()
    }

    /// Status of the current or most recent export.
    pub fn export_status(&self) -> Option<ExportStatus> {
        ExportStatus::from_phase(&self.exporter.phase())
    }

    /// Export the current selections and persist the result to `sink` on success.
    pub fn export(&self, sink: &mut dyn OutputSink) -> StkrResult<ExportOutput> {
        if self.state.is_empty() {
            return Err(StkrError::validation("nothing to export"));
        }
        self.exporter.export_to(self.state.images(), sink)
    }

    /// Snapshot the current selections into a job that can run on another thread.
    pub fn export_handle(&self) -> ExportJob {
        ExportJob::new(Arc::clone(&self.exporter), self.state.images().to_vec())
    }

    fn mutate(&mut self, f: impl FnOnce(&mut CompositionState)) -> bool {
        let before = self.state.images().to_vec();
        f(&mut self.state);
        let changed = self.state.images() != before.as_slice();
        if changed {
            if let Some(active) = self.drag.active()
                && self.state.index_of(active).is_none()
            {
                self.drag.end();
            }
            tracing::debug!(len = self.state.len(), "selection changed");
            let images = self.state.images();
            for (_, observer) in &mut self.observers {
                observer(images);
            }
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compose.rs"]
mod tests;
