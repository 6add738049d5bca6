//! Deferred access to module content.

use std::io::Read;
use std::sync::Arc;

use a3s_pack_core::error::{PackError, Result};

use crate::descriptor::ModuleKind;
use crate::label::Package;

/// Content that is only read when opened.
pub trait Blob: Send + Sync {
    /// Open a fresh stream over the content. Every call performs its own I/O.
    fn open(&self) -> Result<Box<dyn Read + Send>>;
}

/// A module's layer in a package, fetched by diffID on [`Blob::open`].
///
/// The diffID and module name are fixed when the blob is created.
pub struct LayerBlob<P: ?Sized> {
    package: Arc<P>,
    diff_id: String,
    module: String,
    kind: ModuleKind,
}

impl<P: Package + ?Sized> LayerBlob<P> {
    pub fn new(
        package: Arc<P>,
        diff_id: impl Into<String>,
        module: impl Into<String>,
        kind: ModuleKind,
    ) -> Self {
        Self {
            package,
            diff_id: diff_id.into(),
            module: module.into(),
            kind,
        }
    }

    pub fn diff_id(&self) -> &str {
        &self.diff_id
    }
}

impl<P: Package + ?Sized> Blob for LayerBlob<P> {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        tracing::trace!(
            module = %self.module,
            diff_id = %self.diff_id,
            "Opening module layer"
        );

        self.package
            .get_layer(&self.diff_id)
            .map_err(|e| PackError::LayerFetch {
                kind: self.kind.to_string(),
                module: self.module.clone(),
                diff_id: self.diff_id.clone(),
                source: Box::new(e),
            })
    }
}
