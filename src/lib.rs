//! Stkr stacks a handful of photos vertically onto one tall canvas and exports the result.
//!
//! The crate owns everything between "the user picked some images" and "here are the encoded
//! bytes": the ordered selection, the deterministic stacking layout, the preview geometry used
//! for hit-testing and drag-to-reorder, and the high-resolution export pipeline.
//!
//! # Pipeline overview
//!
//! 1. **Select**: [`CompositionState`] keeps up to `selection_cap` images in stacking order.
//! 2. **Lay out**: [`compute_layout`] maps aspect ratios to centered, vertically stacked rects.
//! 3. **Preview**: [`PreviewLayout`] runs the same layout on the canvas scaled to the display.
//! 4. **Export**: [`Exporter`] resolves full-quality pixels concurrently, rasterizes them with
//!    [`rasterize`] and compresses the surface with [`encode_surface`].
//!
//! Platform services stay behind traits: [`AssetSource`] for the photo library,
//! [`PermissionGate`] for library access and [`OutputSink`] for persisting results.
//!
//! # Getting started
//!
//! [`ComposeSession`] wires all of the above together and is the usual entry point.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod encode;
mod export;
mod foundation;
mod layout;
mod preview;
mod render;
mod selection;
mod session;

pub use assets::decode::{decode_image, header_dimensions};
pub use assets::file::{FileAssetSource, normalize_rel_path};
pub use assets::permission::{
    GatedAssetSource, PermissionCallback, PermissionGate, PermissionStatus, StaticPermissionGate,
};
pub use assets::picker::{PickMode, PickedAsset, picker_limit};
pub use assets::source::{
    AssetSource, Delivery, MemoryAssetSource, ResolvePolicy, ResolvedImage,
};
pub use encode::codec::{ExportOutput, encode_surface};
pub use encode::sink::{FileSink, InMemorySink, OutputSink};
pub use export::exporter::{ExportJob, Exporter};
pub use export::status::{ExportPhase, ExportStatus};
pub use foundation::config::{
    CANVAS_HEIGHT, CANVAS_WIDTH, COMPRESSION_QUALITY, ComposeConfig, GAP, MAX_IMAGES,
    MIN_IMAGES, OutputFormat,
};
pub use foundation::core::{CanvasGeometry, Point, Rect, Size};
pub use foundation::error::{StkrError, StkrResult};
pub use layout::stack::{
    LayoutRect, PixelRect, StackLayout, compute_layout, plan_stack, snap_to_pixels,
};
pub use preview::drag::DragReorder;
pub use preview::layout::{PreviewLayout, slot_at};
pub use render::raster::rasterize;
pub use selection::model::{AssetRef, ImageSelection, SelectionId};
pub use selection::state::CompositionState;
pub use session::compose::{ComposeSession, SubscriptionId};
