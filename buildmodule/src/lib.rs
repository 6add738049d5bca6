//! A3S Pack Build Modules - extraction of buildpacks from packaged images.
//!
//! A packaged buildpack image carries its modules as layers and describes
//! them in two labels. This crate decodes those labels into descriptors and
//! pairs each descriptor with a lazily opened layer.
//!
//! ```no_run
//! use std::sync::Arc;
//! use a3s_pack_buildmodule::{extract_buildpacks, OciLayoutPackage};
//!
//! # fn main() -> a3s_pack_core::Result<()> {
//! let pkg = Arc::new(OciLayoutPackage::from_path("./my-buildpack")?);
//! let extracted = extract_buildpacks(pkg)?;
//! for module in extracted.all() {
//!     println!("{}", module.descriptor().info.full_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod descriptor;
pub mod extract;
pub mod label;
pub mod layers;
pub mod model;
pub mod module;
pub mod package;

// Re-export common types
pub use blob::{Blob, LayerBlob};
pub use descriptor::{
    BuildpackDescriptor, BuildpackDescriptorBuilder, Descriptor, DescriptorBuilder,
    ExtensionDescriptor, ExtensionDescriptorBuilder, ModuleKind,
};
pub use extract::{extract_buildpacks, extract_buildpacks_with, extract_modules, Extracted};
pub use label::{read_label, Package};
pub use layers::unpack_layer;
pub use model::{ApiVersion, LayerInfo, Metadata, ModuleInfo, ModuleLayers, ModuleRef, OrderEntry, Stack};
pub use module::BuildModule;
pub use package::{MemoryPackage, OciLayoutPackage};

/// A3S Pack Build Modules version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
