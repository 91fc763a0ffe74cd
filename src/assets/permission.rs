use std::sync::{Arc, Mutex};

use crate::assets::source::{AssetSource, ResolvePolicy, ResolvedImage};
use crate::foundation::error::{StkrError, StkrResult};
use crate::selection::model::AssetRef;

/// Photo library access state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Not asked yet.
    #[default]
    Unknown,
    /// Full access.
    Granted,
    /// Access to a user-chosen subset of the library; treated as granted.
    Limited,
    /// Refused or restricted.
    Denied,
}

impl PermissionStatus {
    /// Whether the asset source may be used.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted | Self::Limited)
    }

    /// Whether the user refused access.
    pub fn is_denied(self) -> bool {
        self == Self::Denied
    }
}

/// Callback invoked once a permission request settles.
pub type PermissionCallback = Box<dyn FnOnce(PermissionStatus) + Send>;

/// Platform permission prompt.
pub trait PermissionGate: Send + Sync {
    /// Current status without prompting.
    fn status(&self) -> PermissionStatus;

    /// Ask for access. `done` may run on any thread, after this call returns.
    fn request(&self, done: PermissionCallback);
}

/// Gate with a fixed answer to requests, for headless front ends and tests.
#[derive(Debug)]
pub struct StaticPermissionGate {
    status: Mutex<PermissionStatus>,
    answer: PermissionStatus,
}

impl StaticPermissionGate {
    /// Gate that starts at `status` and resolves requests to `answer`.
    pub fn new(status: PermissionStatus, answer: PermissionStatus) -> Self {
        Self {
            status: Mutex::new(status),
            answer,
        }
    }

    /// Already granted.
    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }

    /// Already denied.
    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied, PermissionStatus::Denied)
    }
}

impl PermissionGate for StaticPermissionGate {
    fn status(&self) -> PermissionStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(PermissionStatus::Unknown)
    }

    fn request(&self, done: PermissionCallback) {
        if let Ok(mut s) = self.status.lock() {
            *s = self.answer;
        }
        done(self.answer);
    }
}

/// Asset source that refuses to touch the library until access is granted.
#[derive(Clone)]
pub struct GatedAssetSource {
    inner: Arc<dyn AssetSource>,
    gate: Arc<dyn PermissionGate>,
}

impl GatedAssetSource {
    /// Wrap `inner` behind `gate`.
    pub fn new(inner: Arc<dyn AssetSource>, gate: Arc<dyn PermissionGate>) -> Self {
        Self { inner, gate }
    }

    /// Current gate status.
    pub fn status(&self) -> PermissionStatus {
        self.gate.status()
    }

    /// Forward a permission request to the gate.
    pub fn request_access(&self, done: PermissionCallback) {
        self.gate.request(done);
    }

    fn check(&self) -> StkrResult<()> {
        let status = self.gate.status();
        if status.is_granted() {
            Ok(())
        } else {
            Err(StkrError::permission(format!(
                "photo library access is {status:?}"
            )))
        }
    }
}

impl AssetSource for GatedAssetSource {
    fn dimensions(&self, asset: &AssetRef) -> StkrResult<(u32, u32)> {
        self.check()?;
        self.inner.dimensions(asset)
    }

    fn resolve(&self, asset: &AssetRef, policy: ResolvePolicy) -> StkrResult<ResolvedImage> {
        self.check()?;
        self.inner.resolve(asset, policy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/permission.rs"]
mod tests;
