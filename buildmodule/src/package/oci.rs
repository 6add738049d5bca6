//! Packages backed by an OCI image layout on disk.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use a3s_pack_core::error::{PackError, Result};
use flate2::read::GzDecoder;
use oci_spec::image::{ImageConfiguration, ImageIndex, ImageManifest};

use crate::label::Package;

/// Location and encoding of one layer blob.
#[derive(Debug, Clone)]
struct LayerBlobRef {
    path: PathBuf,
    media_type: String,
}

/// A packaged image loaded from an OCI image layout.
///
/// Labels come from the image configuration. Layers are addressed by
/// diffID: `rootfs.diff_ids[i]` of the configuration names the
/// uncompressed content of `layers[i]` in the manifest.
#[derive(Debug)]
pub struct OciLayoutPackage {
    labels: HashMap<String, String>,
    layers: HashMap<String, LayerBlobRef>,
}

impl OciLayoutPackage {
    /// Load a package from an OCI image layout directory.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The directory is not an OCI layout
    /// - Index, manifest or config cannot be read or parsed
    /// - The manifest and config disagree on the number of layers
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let root_dir = path.as_ref().to_path_buf();
        validate_oci_layout(&root_dir)?;

        let index: ImageIndex = read_json(&root_dir.join("index.json"), "index.json")?;
        let manifest_digest = index
            .manifests()
            .first()
            .ok_or_else(|| PackError::OciImageError("No manifests in index.json".to_string()))?
            .digest()
            .to_string();

        let manifest: ImageManifest =
            read_json(&blob_path(&root_dir, &manifest_digest), "manifest")?;
        let config: ImageConfiguration =
            read_json(&blob_path(&root_dir, manifest.config().digest()), "config")?;

        let diff_ids = config.rootfs().diff_ids();
        if diff_ids.len() != manifest.layers().len() {
            return Err(PackError::OciImageError(format!(
                "Config lists {} diffIDs but manifest has {} layers",
                diff_ids.len(),
                manifest.layers().len()
            )));
        }

        let layers = diff_ids
            .iter()
            .zip(manifest.layers())
            .map(|(diff_id, layer)| {
                (
                    diff_id.clone(),
                    LayerBlobRef {
                        path: blob_path(&root_dir, layer.digest()),
                        media_type: layer.media_type().to_string(),
                    },
                )
            })
            .collect();

        let labels = config
            .config()
            .as_ref()
            .and_then(|c| c.labels().clone())
            .unwrap_or_default();

        tracing::debug!(
            path = %root_dir.display(),
            labels = labels.len(),
            "Loaded OCI layout package"
        );

        Ok(Self { labels, layers })
    }

    /// All diffIDs of the image, in no particular order.
    pub fn diff_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

impl Package for OciLayoutPackage {
    fn label(&self, name: &str) -> Result<Option<String>> {
        Ok(self.labels.get(name).cloned())
    }

    fn get_layer(&self, diff_id: &str) -> Result<Box<dyn Read + Send>> {
        let layer = self
            .layers
            .get(diff_id)
            .ok_or_else(|| PackError::LayerNotFound(diff_id.to_string()))?;

        let file = File::open(&layer.path).map_err(|e| {
            PackError::OciImageError(format!(
                "Failed to open layer blob {}: {}",
                layer.path.display(),
                e
            ))
        })?;

        if layer.media_type.ends_with("gzip") {
            Ok(Box::new(GzDecoder::new(file)))
        } else if layer.media_type.ends_with("zstd") {
            Err(PackError::OciImageError(format!(
                "Unsupported layer media type: {}",
                layer.media_type
            )))
        } else {
            Ok(Box::new(file))
        }
    }
}

fn validate_oci_layout(root_dir: &Path) -> Result<()> {
    for required in ["oci-layout", "index.json", "blobs"] {
        if !root_dir.join(required).exists() {
            return Err(PackError::OciImageError(format!(
                "Not a valid OCI layout: missing {} in {}",
                required,
                root_dir.display()
            )));
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PackError::OciImageError(format!(
            "Failed to read {} at {}: {}",
            what,
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| PackError::OciImageError(format!("Failed to parse {}: {}", what, e)))
}

/// Path to a blob by digest (`sha256:abc` → `blobs/sha256/abc`).
fn blob_path(root_dir: &Path, digest: &str) -> PathBuf {
    let (algorithm, hash) = digest.split_once(':').unwrap_or(("sha256", digest));
    root_dir.join("blobs").join(algorithm).join(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::tar_bytes;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_layout(path: &Path, layers: &[(&str, &str, Vec<u8>)], labels: serde_json::Value) {
        let blobs = path.join("blobs/sha256");
        fs::create_dir_all(&blobs).unwrap();
        fs::write(path.join("oci-layout"), r#"{"imageLayoutVersion":"1.0.0"}"#).unwrap();

        let mut manifest_layers = Vec::new();
        let mut diff_ids = Vec::new();
        for (i, (diff_id, media_type, blob)) in layers.iter().enumerate() {
            let hash = format!("layer{}", i);
            fs::write(blobs.join(&hash), blob).unwrap();
            manifest_layers.push(serde_json::json!({
                "mediaType": media_type,
                "digest": format!("sha256:{}", hash),
                "size": blob.len()
            }));
            diff_ids.push(diff_id.to_string());
        }

        let config = serde_json::json!({
            "architecture": "amd64",
            "os": "linux",
            "config": { "Labels": labels },
            "rootfs": { "type": "layers", "diff_ids": diff_ids },
            "history": []
        })
        .to_string();
        fs::write(blobs.join("config"), &config).unwrap();

        let manifest = serde_json::json!({
            "schemaVersion": 2,
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "config": {
                "mediaType": "application/vnd.oci.image.config.v1+json",
                "digest": "sha256:config",
                "size": config.len()
            },
            "layers": manifest_layers
        })
        .to_string();
        fs::write(blobs.join("manifest"), &manifest).unwrap();

        let index = serde_json::json!({
            "schemaVersion": 2,
            "mediaType": "application/vnd.oci.image.index.v1+json",
            "manifests": [{
                "mediaType": "application/vnd.oci.image.manifest.v1+json",
                "digest": "sha256:manifest",
                "size": manifest.len()
            }]
        });
        fs::write(path.join("index.json"), index.to_string()).unwrap();
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_from_path_reads_labels_and_layers() {
        let temp_dir = TempDir::new().unwrap();
        let tar = tar_bytes(&[("hello.txt", b"hello")]);
        write_layout(
            temp_dir.path(),
            &[
                ("sha256:gz", "application/vnd.oci.image.layer.v1.tar+gzip", gzip(&tar)),
                ("sha256:plain", "application/vnd.oci.image.layer.v1.tar", tar.clone()),
            ],
            serde_json::json!({ "io.buildpacks.buildpackage.metadata": "{\"id\":\"A\"}" }),
        );

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        assert_eq!(
            pkg.label("io.buildpacks.buildpackage.metadata").unwrap().as_deref(),
            Some("{\"id\":\"A\"}")
        );
        assert!(pkg.label("missing").unwrap().is_none());
        assert_eq!(pkg.diff_ids().count(), 2);

        for diff_id in ["sha256:gz", "sha256:plain"] {
            let mut content = Vec::new();
            pkg.get_layer(diff_id).unwrap().read_to_end(&mut content).unwrap();
            assert_eq!(content, tar);
        }
    }

    #[test]
    fn test_get_layer_unknown_diff_id() {
        let temp_dir = TempDir::new().unwrap();
        write_layout(temp_dir.path(), &[], serde_json::json!({}));

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();
        let err = match pkg.get_layer("sha256:nope") {
            Ok(_) => panic!("expected missing layer"),
            Err(e) => e,
        };
        assert!(matches!(err, PackError::LayerNotFound(_)));
    }

    #[test]
    fn test_get_layer_zstd_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        write_layout(
            temp_dir.path(),
            &[("sha256:z", "application/vnd.oci.image.layer.v1.tar+zstd", vec![0u8; 4])],
            serde_json::json!({}),
        );

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();
        let err = match pkg.get_layer("sha256:z") {
            Ok(_) => panic!("expected unsupported media type"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("Unsupported layer media type"));
    }

    #[test]
    fn test_from_path_missing_layout() {
        let temp_dir = TempDir::new().unwrap();
        let err = OciLayoutPackage::from_path(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("oci-layout"));
    }

    #[test]
    fn test_blob_path() {
        let root = PathBuf::from("/images/test");
        assert_eq!(
            blob_path(&root, "sha256:abc123"),
            PathBuf::from("/images/test/blobs/sha256/abc123")
        );
        assert_eq!(
            blob_path(&root, "abc123"),
            PathBuf::from("/images/test/blobs/sha256/abc123")
        );
    }
}
