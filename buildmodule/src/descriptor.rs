//! Module descriptors and the builders that derive them from layer records.

use std::fmt;

use crate::model::{ApiVersion, LayerInfo, ModuleInfo, OrderEntry, Stack};

/// Kind of packaged module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Buildpack,
    Extension,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buildpack => write!(f, "buildpack"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// Declared capabilities and metadata of a module, independent of its content.
pub trait Descriptor: fmt::Debug + Send + Sync {
    fn api(&self) -> Option<&ApiVersion>;

    fn info(&self) -> &ModuleInfo;

    fn kind(&self) -> ModuleKind;

    fn order(&self) -> &[OrderEntry] {
        &[]
    }

    fn stacks(&self) -> &[Stack] {
        &[]
    }

    /// Module id usable as a single path component.
    fn escaped_id(&self) -> String {
        self.info().id.replace('/', "_")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildpackDescriptor {
    pub api: Option<ApiVersion>,
    pub info: ModuleInfo,
    pub stacks: Vec<Stack>,
    pub order: Vec<OrderEntry>,
}

impl Descriptor for BuildpackDescriptor {
    fn api(&self) -> Option<&ApiVersion> {
        self.api.as_ref()
    }

    fn info(&self) -> &ModuleInfo {
        &self.info
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Buildpack
    }

    fn order(&self) -> &[OrderEntry] {
        &self.order
    }

    fn stacks(&self) -> &[Stack] {
        &self.stacks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub api: Option<ApiVersion>,
    pub info: ModuleInfo,
}

impl Descriptor for ExtensionDescriptor {
    fn api(&self) -> Option<&ApiVersion> {
        self.api.as_ref()
    }

    fn info(&self) -> &ModuleInfo {
        &self.info
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Extension
    }
}

/// Builds a descriptor from one `(id, version, layer info)` entry of the
/// layers label.
pub trait DescriptorBuilder {
    type Descriptor: Descriptor + 'static;

    fn kind(&self) -> ModuleKind;

    fn build(&self, id: &str, version: &str, layer: &LayerInfo) -> Self::Descriptor;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildpackDescriptorBuilder;

impl DescriptorBuilder for BuildpackDescriptorBuilder {
    type Descriptor = BuildpackDescriptor;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Buildpack
    }

    fn build(&self, id: &str, version: &str, layer: &LayerInfo) -> BuildpackDescriptor {
        BuildpackDescriptor {
            api: layer.api,
            info: module_info(id, version, layer),
            stacks: layer.stacks.clone(),
            order: layer.order.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionDescriptorBuilder;

impl DescriptorBuilder for ExtensionDescriptorBuilder {
    type Descriptor = ExtensionDescriptor;

    fn kind(&self) -> ModuleKind {
        ModuleKind::Extension
    }

    fn build(&self, id: &str, version: &str, layer: &LayerInfo) -> ExtensionDescriptor {
        ExtensionDescriptor {
            api: layer.api,
            info: module_info(id, version, layer),
        }
    }
}

fn module_info(id: &str, version: &str, layer: &LayerInfo) -> ModuleInfo {
    ModuleInfo {
        id: id.to_string(),
        version: version.to_string(),
        homepage: layer.homepage.clone(),
        name: layer.name.clone(),
        ..Default::default()
    }
}
