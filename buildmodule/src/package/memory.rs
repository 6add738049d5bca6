//! In-memory packages.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use a3s_pack_core::error::{PackError, Result};
use serde::Serialize;

use crate::label::Package;

/// A package held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    labels: HashMap<String, String>,
    layers: HashMap<String, Vec<u8>>,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    /// Add a label holding `value` serialized as JSON.
    pub fn with_json_label<T: Serialize>(self, name: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_string(value)?;
        Ok(self.with_label(name, value))
    }

    pub fn with_layer(mut self, diff_id: impl Into<String>, content: Vec<u8>) -> Self {
        self.layers.insert(diff_id.into(), content);
        self
    }
}

impl Package for MemoryPackage {
    fn label(&self, name: &str) -> Result<Option<String>> {
        Ok(self.labels.get(name).cloned())
    }

    fn get_layer(&self, diff_id: &str) -> Result<Box<dyn Read + Send>> {
        let content = self
            .layers
            .get(diff_id)
            .ok_or_else(|| PackError::LayerNotFound(diff_id.to_string()))?;
        Ok(Box::new(Cursor::new(content.clone())))
    }
}
