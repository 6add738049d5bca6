//! Unpacking module layers to the filesystem.

use a3s_pack_core::error::{PackError, Result};
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// Unpack an uncompressed layer tar stream into `target_dir`.
///
/// # Errors
///
/// Returns error if:
/// - Target directory cannot be created
/// - The stream is not a valid tar archive
pub fn unpack_layer(layer: impl Read, target_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(target_dir).map_err(|e| {
        PackError::Other(format!(
            "Failed to create target directory {}: {}",
            target_dir.display(),
            e
        ))
    })?;

    let mut archive = Archive::new(layer);
    archive.unpack(target_dir).map_err(|e| {
        PackError::Other(format!(
            "Failed to unpack layer to {}: {}",
            target_dir.display(),
            e
        ))
    })?;

    tracing::debug!(target = %target_dir.display(), "Unpacked module layer");

    Ok(())
}

#[cfg(test)]
pub(crate) fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap()
}
