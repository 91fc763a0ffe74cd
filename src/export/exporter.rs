use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::assets::source::{AssetSource, ResolvePolicy, ResolvedImage};
use crate::encode::codec::{ExportOutput, encode_surface};
use crate::encode::sink::OutputSink;
use crate::export::status::ExportPhase;
use crate::foundation::config::ComposeConfig;
use crate::foundation::error::{StkrError, StkrResult};
use crate::layout::stack::compute_layout;
use crate::render::raster::rasterize;
use crate::selection::model::{AssetRef, ImageSelection, SelectionId};

type Resolved = (usize, SelectionId, StkrResult<ResolvedImage>);

/// Turns a snapshot of selections into one encoded image.
///
/// At most one export runs at a time per exporter; a second request while one is in flight
/// fails with [`StkrError::ExportInProgress`]. An export that gives up on its assets cancels
/// their remaining retries and moves later exports onto a fresh worker pool, so abandoned
/// work never delays the next export.
pub struct Exporter {
    config: ComposeConfig,
    source: Arc<dyn AssetSource>,
    pool: Mutex<Arc<rayon::ThreadPool>>,
    phase: Mutex<ExportPhase>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl Exporter {
    /// Build an exporter resolving assets from `source`.
    pub fn new(config: ComposeConfig, source: Arc<dyn AssetSource>) -> StkrResult<Self> {
        config.validate()?;
        let pool = build_thread_pool(config.resolve_threads)?;
        Ok(Self {
            config,
            source,
            pool: Mutex::new(Arc::new(pool)),
            phase: Mutex::new(ExportPhase::Idle),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Settings this exporter was built with.
    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Phase of the current or most recent export.
    pub fn phase(&self) -> ExportPhase {
        self.phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or(ExportPhase::Idle)
    }

    /// Whether an export is running right now.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Export `snapshot` in stacking order.
    ///
    /// Snapshots below `min_exportable` are rejected before anything is resolved.
    pub fn export(&self, snapshot: &[ImageSelection]) -> StkrResult<ExportOutput> {
        self.export_inner(snapshot, None)
    }

    /// Export `snapshot` and hand the bytes to `sink` only if every stage succeeded.
    ///
    /// Persisting is part of the export: a sink failure leaves the phase at `Failed`.
    pub fn export_to(
        &self,
        snapshot: &[ImageSelection],
        sink: &mut dyn OutputSink,
    ) -> StkrResult<ExportOutput> {
        self.export_inner(snapshot, Some(sink))
    }

    #[tracing::instrument(skip(self, snapshot, sink), fields(images = snapshot.len()))]
    fn export_inner(
        &self,
        snapshot: &[ImageSelection],
        sink: Option<&mut dyn OutputSink>,
    ) -> StkrResult<ExportOutput> {
        if snapshot.len() < self.config.min_exportable {
            return Err(StkrError::validation(format!(
                "export needs at least {} image(s), got {}",
                self.config.min_exportable,
                snapshot.len()
            )));
        }
        if snapshot.len() > self.config.selection_cap {
            return Err(StkrError::validation(format!(
                "export accepts at most {} images, got {}",
                self.config.selection_cap,
                snapshot.len()
            )));
        }

        let _slot = InFlight::acquire(&self.in_flight).ok_or(StkrError::ExportInProgress)?;
        let started = Instant::now();
        let res = self.run(snapshot).and_then(|out| match sink {
            Some(sink) => {
                self.set_phase(ExportPhase::Persisting);
                sink.persist(&out).map(|()| out)
            }
            None => Ok(out),
        });
        match &res {
            Ok(out) => {
                tracing::debug!(
                    bytes = out.bytes.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "export done"
                );
                self.set_phase(ExportPhase::Done);
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.set_phase(ExportPhase::Failed(e.user_message()));
            }
        }
        res
    }

    fn run(&self, snapshot: &[ImageSelection]) -> StkrResult<ExportOutput> {
        self.set_phase(ExportPhase::Resolving);
        let pool = self.current_pool()?;
        let images = self.resolve_all(&pool, snapshot)?;

        self.set_phase(ExportPhase::Rasterizing);
        let canvas = self.config.canvas();
        let aspects: Vec<f64> = snapshot.iter().map(ImageSelection::aspect_ratio).collect();
        let rects = compute_layout(&aspects, canvas);
        let surface =
            pool.install(|| rasterize(&images, &rects, canvas, self.config.background_rgb))?;

        self.set_phase(ExportPhase::Encoding);
        encode_surface(
            &surface,
            self.config.output_format,
            self.config.compression_quality,
        )
    }

    /// Fan out one resolution per selection and join them all, or fail on the first error.
    fn resolve_all(
        &self,
        pool: &rayon::ThreadPool,
        snapshot: &[ImageSelection],
    ) -> StkrResult<Vec<ResolvedImage>> {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<Resolved>();
        for (idx, sel) in snapshot.iter().enumerate() {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let cancel = Arc::clone(&cancel);
            let config = self.config.clone();
            let id = sel.id();
            let asset = sel.asset().clone();
            pool.spawn(move || {
                let res = resolve_with_retries(source.as_ref(), &asset, &config, &cancel);
                // The receiver is gone once the export has already failed or timed out.
                let _ = tx.send((idx, id, res));
            });
        }
        drop(tx);

        let mut outstanding = snapshot.len();
        let res = join_resolved(&rx, snapshot, self.config.resolve_timeout(), &mut outstanding);
        if res.is_err() {
            cancel.store(true, Ordering::Release);
            if outstanding > 0 {
                self.retire_pool(outstanding);
            }
        }
        res
    }

    fn current_pool(&self) -> StkrResult<Arc<rayon::ThreadPool>> {
        self.pool
            .lock()
            .map(|p| Arc::clone(&p))
            .map_err(|_| StkrError::Other(anyhow::anyhow!("resolve pool lock poisoned")))
    }

    /// Swap in a fresh pool; the old one winds down once its abandoned tasks return.
    fn retire_pool(&self, outstanding: usize) {
        tracing::warn!(outstanding, "abandoning in-flight asset resolutions");
        let fresh = match build_thread_pool(self.config.resolve_threads) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "could not replace resolve pool");
                return;
            }
        };
        if let Ok(mut pool) = self.pool.lock() {
            *pool = Arc::new(fresh);
        }
    }

    fn set_phase(&self, phase: ExportPhase) {
        tracing::debug!(?phase, "export phase");
        if let Ok(mut p) = self.phase.lock() {
            *p = phase;
        }
    }
}

/// An export bound to a point-in-time snapshot, runnable on any thread.
///
/// Later mutations of the session do not affect a job that was already created.
#[derive(Debug, Clone)]
pub struct ExportJob {
    exporter: Arc<Exporter>,
    snapshot: Vec<ImageSelection>,
}

impl ExportJob {
    /// Bind `snapshot` to `exporter`.
    pub fn new(exporter: Arc<Exporter>, snapshot: Vec<ImageSelection>) -> Self {
        Self { exporter, snapshot }
    }

    /// Selections this job will export.
    pub fn snapshot(&self) -> &[ImageSelection] {
        &self.snapshot
    }

    /// Run the export.
    pub fn run(&self) -> StkrResult<ExportOutput> {
        self.exporter.export(&self.snapshot)
    }

    /// Run the export and persist the result to `sink` on success.
    pub fn run_into(&self, sink: &mut dyn OutputSink) -> StkrResult<ExportOutput> {
        self.exporter.export_to(&self.snapshot, sink)
    }
}

/// Collect one result per selection before `timeout`, matching them back by index and id.
///
/// `outstanding` counts tasks that have not reported yet.
fn join_resolved(
    rx: &Receiver<Resolved>,
    snapshot: &[ImageSelection],
    timeout: Duration,
    outstanding: &mut usize,
) -> StkrResult<Vec<ResolvedImage>> {
    let deadline = Instant::now() + timeout;
    let mut slots: Vec<Option<ResolvedImage>> = (0..snapshot.len()).map(|_| None).collect();
    while *outstanding > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let (idx, id, res) = match rx.recv_timeout(remaining) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => {
                return Err(StkrError::asset_resolution(format!(
                    "timed out after {} ms with {} of {} assets resolved",
                    timeout.as_millis(),
                    snapshot.len() - *outstanding,
                    snapshot.len()
                )));
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };
        *outstanding -= 1;
        match res {
            Ok(img) => {
                let slot = slots
                    .get_mut(idx)
                    .filter(|_| snapshot[idx].id() == id)
                    .ok_or_else(|| {
                        StkrError::asset_resolution(format!(
                            "resolved image for unknown selection {id}"
                        ))
                    })?;
                *slot = Some(img);
            }
            Err(e @ StkrError::Permission(_)) => return Err(e),
            Err(e) => {
                return Err(StkrError::asset_resolution(format!(
                    "selection {id} at index {idx}: {e}"
                )));
            }
        }
    }

    let resolved: Vec<ResolvedImage> = slots.into_iter().flatten().collect();
    if resolved.len() != snapshot.len() {
        return Err(StkrError::asset_resolution(format!(
            "resolved {} of {} assets",
            resolved.len(),
            snapshot.len()
        )));
    }
    tracing::debug!(count = resolved.len(), "resolved all assets");
    Ok(resolved)
}

fn resolve_with_retries(
    source: &dyn AssetSource,
    asset: &AssetRef,
    config: &ComposeConfig,
    cancel: &AtomicBool,
) -> StkrResult<ResolvedImage> {
    let mut attempt = 0u32;
    loop {
        if cancel.load(Ordering::Acquire) {
            return Err(StkrError::asset_resolution(format!(
                "resolution of '{asset}' cancelled"
            )));
        }
        match source.resolve(asset, ResolvePolicy::full_quality()) {
            Ok(img) => return Ok(img),
            Err(e @ StkrError::Permission(_)) => return Err(e),
            Err(e) if attempt >= config.resolve_retries => return Err(e),
            Err(e) => {
                attempt += 1;
                let delay = config.retry_delay(attempt);
                tracing::warn!(
                    %asset,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying asset resolution"
                );
                std::thread::sleep(delay);
            }
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn build_thread_pool(threads: Option<usize>) -> StkrResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StkrError::validation(
            "resolve_threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("stkr-resolve-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StkrError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
