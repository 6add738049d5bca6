//! Build modules: a descriptor paired with its layer content.

use std::fmt;
use std::io::Read;
use std::path::Path;

use a3s_pack_core::error::Result;

use crate::blob::Blob;
use crate::descriptor::Descriptor;
use crate::layers::unpack_layer;

/// A packaged module: its descriptor plus lazily opened content.
pub struct BuildModule<D> {
    descriptor: D,
    blob: Box<dyn Blob>,
}

impl<D: Descriptor> BuildModule<D> {
    pub fn from_blob(descriptor: D, blob: impl Blob + 'static) -> Self {
        Self {
            descriptor,
            blob: Box::new(blob),
        }
    }

    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Open the module content. Not cached; each call fetches again.
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        self.blob.open()
    }

    /// Open the module content and unpack it into `target_dir`.
    pub fn unpack(&self, target_dir: &Path) -> Result<()> {
        unpack_layer(self.open()?, target_dir)
    }
}

impl<D: fmt::Debug> fmt::Debug for BuildModule<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildModule")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
