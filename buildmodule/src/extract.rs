//! Build module extraction from a packaged image.
//!
//! A package declares its main module in the metadata label and lists every
//! module it carries in the layers label. Extraction pairs each listed
//! module with a [`LayerBlob`] over its layer and splits the result into the
//! main module and its dependencies. No layer is read here; content is
//! fetched when a consumer opens a module.

use std::sync::Arc;

use a3s_pack_core::config::ExtractConfig;
use a3s_pack_core::error::{PackError, Result};

use crate::blob::LayerBlob;
use crate::descriptor::{
    BuildpackDescriptor, BuildpackDescriptorBuilder, Descriptor, DescriptorBuilder,
};
use crate::label::{read_label, Package};
use crate::model::{Metadata, ModuleLayers};
use crate::module::BuildModule;

/// Modules extracted from one package.
#[derive(Debug)]
pub struct Extracted<D> {
    /// The module matching the package's declared identity, if any
    pub main: Option<BuildModule<D>>,

    /// All other modules, ordered by identifier then version
    pub dependencies: Vec<BuildModule<D>>,
}

impl<D: Descriptor> Extracted<D> {
    /// Total number of modules, main included.
    pub fn len(&self) -> usize {
        self.dependencies.len() + usize::from(self.main.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All modules, main first.
    pub fn all(&self) -> impl Iterator<Item = &BuildModule<D>> {
        self.main.iter().chain(self.dependencies.iter())
    }

    pub fn into_parts(self) -> (Option<BuildModule<D>>, Vec<BuildModule<D>>) {
        (self.main, self.dependencies)
    }
}

/// Extract buildpacks using the default label names.
pub fn extract_buildpacks<P>(pkg: Arc<P>) -> Result<Extracted<BuildpackDescriptor>>
where
    P: Package + ?Sized + 'static,
{
    extract_buildpacks_with(pkg, &ExtractConfig::default())
}

pub fn extract_buildpacks_with<P>(
    pkg: Arc<P>,
    config: &ExtractConfig,
) -> Result<Extracted<BuildpackDescriptor>>
where
    P: Package + ?Sized + 'static,
{
    extract_modules(pkg, config, &BuildpackDescriptorBuilder)
}

/// Extract every module listed in the layers label, building descriptors
/// with `builder`.
///
/// # Errors
///
/// - [`PackError::MissingLabel`] if either label is absent
/// - [`PackError::LabelDecode`] if either label is malformed
/// - [`PackError::MainModuleNotFound`] if `config.require_main` is set and
///   no module matches the declared identity
/// - any error returned by the package's label lookup, unchanged
pub fn extract_modules<P, B>(
    pkg: Arc<P>,
    config: &ExtractConfig,
    builder: &B,
) -> Result<Extracted<B::Descriptor>>
where
    P: Package + ?Sized + 'static,
    B: DescriptorBuilder,
{
    let metadata: Metadata = read_label(pkg.as_ref(), &config.metadata_label)?.ok_or_else(|| {
        PackError::MissingLabel {
            label: config.metadata_label.clone(),
        }
    })?;

    let layers: ModuleLayers = read_label(pkg.as_ref(), &config.layers_label)?.ok_or_else(|| {
        PackError::MissingLabel {
            label: config.layers_label.clone(),
        }
    })?;

    tracing::debug!(
        main = %metadata.info.full_name(),
        modules = layers.len(),
        kind = %builder.kind(),
        "Read package labels"
    );

    let mut main = None;
    let mut dependencies = Vec::with_capacity(layers.len());

    for (id, version, layer) in layers.iter() {
        let descriptor = builder.build(id, version, layer);
        let blob = LayerBlob::new(
            Arc::clone(&pkg),
            layer.layer_diff_id.clone(),
            descriptor.info().full_name(),
            builder.kind(),
        );

        let is_main = descriptor.info().matches(&metadata.info);
        tracing::debug!(
            module = %descriptor.info().full_name(),
            diff_id = %layer.layer_diff_id,
            main = is_main,
            "Extracted build module"
        );

        let module = BuildModule::from_blob(descriptor, blob);
        if is_main {
            main = Some(module);
        } else {
            dependencies.push(module);
        }
    }

    if main.is_none() && config.require_main {
        return Err(PackError::MainModuleNotFound {
            module: metadata.info.full_name(),
        });
    }

    Ok(Extracted { main, dependencies })
}
