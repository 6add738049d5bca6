//! Label and layer access over a packaged image.

use std::io::Read;

use a3s_pack_core::error::{PackError, Result};
use serde::de::DeserializeOwned;

/// A packaged image exposing its labels and layers.
///
/// Implementations shared across threads are responsible for their own
/// synchronization.
pub trait Package: Send + Sync {
    /// Raw value of the label `name`, or `None` when the image has no such label.
    fn label(&self, name: &str) -> Result<Option<String>>;

    /// Open the uncompressed layer identified by `diff_id`.
    ///
    /// The caller owns the returned stream.
    fn get_layer(&self, diff_id: &str) -> Result<Box<dyn Read + Send>>;
}

/// Decode the JSON label `name` into `T`.
///
/// Returns `Ok(None)` when the label is absent or its value is the empty
/// string. Any other value that fails to decode, whitespace included, is a
/// [`PackError::LabelDecode`].
pub fn read_label<T, P>(pkg: &P, name: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    P: Package + ?Sized,
{
    let raw = match pkg.label(name)? {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| PackError::LabelDecode {
            label: name.to_string(),
            source,
        })
}
