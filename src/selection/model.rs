use std::fmt;

/// Stable identity of one selection, unique for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionId(uuid::Uuid);

impl SelectionId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SelectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque handle used to fetch pixel data from an asset source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Wrap a source-specific identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AssetRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One picked image and its intrinsic pixel size.
///
/// Immutable: replacing an entry means building a new selection.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSelection {
    id: SelectionId,
    asset: AssetRef,
    original_width: f64,
    original_height: f64,
}

impl ImageSelection {
    /// Create a selection with a fresh identity.
    pub fn new(asset: impl Into<AssetRef>, width: f64, height: f64) -> Self {
        Self {
            id: SelectionId::new(),
            asset: asset.into(),
            original_width: width,
            original_height: height,
        }
    }

    /// Rebuild a selection under an existing identity, e.g. when restoring a saved stack.
    pub fn with_id(id: SelectionId, asset: impl Into<AssetRef>, width: f64, height: f64) -> Self {
        Self {
            id,
            asset: asset.into(),
            original_width: width,
            original_height: height,
        }
    }

    /// Stable identity.
    pub fn id(&self) -> SelectionId {
        self.id
    }

    /// Asset handle used to resolve pixel data at export time.
    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// Intrinsic width in device pixels.
    pub fn original_width(&self) -> f64 {
        self.original_width
    }

    /// Intrinsic height in device pixels.
    pub fn original_height(&self) -> f64 {
        self.original_height
    }

    /// `width / height`, or `1.0` for degenerate dimensions.
    pub fn aspect_ratio(&self) -> f64 {
        if self.original_height <= 0.0 {
            return 1.0;
        }
        let a = self.original_width / self.original_height;
        if a.is_finite() && a > 0.0 { a } else { 1.0 }
    }
}
