//! Package metadata decoded from image labels.
//!
//! Two labels describe a packaged buildpack image:
//!
//! - the metadata label names the package's own (main) module
//! - the layers label maps every packaged module, keyed by identifier and
//!   then version, to the layer that holds its content
//!
//! ```json
//! {
//!   "example/node": {
//!     "1.2.3": {
//!       "api": "0.8",
//!       "layerDiffID": "sha256:4f1c...",
//!       "stacks": [{ "id": "io.buildpacks.stacks.jammy" }]
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identity and display fields of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<License>,
}

impl ModuleInfo {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// `id@version`, or just `id` when no version is set.
    pub fn full_name(&self) -> String {
        if self.version.is_empty() {
            self.id.clone()
        } else {
            format!("{}@{}", self.id, self.version)
        }
    }

    /// Two modules match when both identifier and version are equal.
    pub fn matches(&self, other: &ModuleInfo) -> bool {
        self.id == other.id && self.version == other.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A platform stack a module supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
}

/// Reference to a module from within an order group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    #[serde(flatten)]
    pub info: ModuleInfo,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// One group of an order-type module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    #[serde(default)]
    pub group: Vec<ModuleRef>,
}

pub type Order = Vec<OrderEntry>;

/// Buildpack API version in `major.minor` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u64,
    pub minor: u64,
}

impl ApiVersion {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };
        let major = major
            .parse()
            .map_err(|_| format!("invalid API version '{}'", s))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid API version '{}'", s))?;
        Ok(Self { major, minor })
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-version layer record of a packaged module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiVersion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<Stack>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Order,

    #[serde(rename = "layerDiffID", default)]
    pub layer_diff_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Identifier → version → layer info, ordered by identifier then version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleLayers(BTreeMap<String, BTreeMap<String, LayerInfo>>);

impl ModuleLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        id: impl Into<String>,
        version: impl Into<String>,
        info: LayerInfo,
    ) -> Option<LayerInfo> {
        self.0
            .entry(id.into())
            .or_default()
            .insert(version.into(), info)
    }

    pub fn get(&self, id: &str, version: &str) -> Option<&LayerInfo> {
        self.0.get(id).and_then(|versions| versions.get(version))
    }

    /// Every `(id, version, info)` entry, by identifier then version.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &LayerInfo)> {
        self.0.iter().flat_map(|(id, versions)| {
            versions
                .iter()
                .map(move |(version, info)| (id.as_str(), version.as_str(), info))
        })
    }

    /// Number of `(id, version)` entries.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contents of the package metadata label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub info: ModuleInfo,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<Stack>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_name() {
        assert_eq!(ModuleInfo::new("example/node", "1.2.3").full_name(), "example/node@1.2.3");
        assert_eq!(ModuleInfo::new("example/node", "").full_name(), "example/node");
    }

    #[test]
    fn test_matches_ignores_display_fields() {
        let mut a = ModuleInfo::new("A", "1.0");
        a.name = Some("Module A".to_string());
        a.homepage = Some("https://example.com".to_string());
        let b = ModuleInfo::new("A", "1.0");

        assert!(a.matches(&b));
        assert!(!a.matches(&ModuleInfo::new("A", "1.1")));
        assert!(!a.matches(&ModuleInfo::new("B", "1.0")));
    }

    #[test]
    fn test_matches_compares_fields_not_full_name() {
        let a = ModuleInfo::new("A", "1.0");
        let joined = ModuleInfo::new("A@1.0", "");

        assert_eq!(a.full_name(), joined.full_name());
        assert!(!a.matches(&joined));
        assert!(!joined.matches(&a));
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("0.8".parse::<ApiVersion>().unwrap(), ApiVersion::new(0, 8));
        assert_eq!("1".parse::<ApiVersion>().unwrap(), ApiVersion::new(1, 0));
        assert!("x.2".parse::<ApiVersion>().is_err());
        assert!("0.beta".parse::<ApiVersion>().is_err());
        assert_eq!(ApiVersion::new(0, 10).to_string(), "0.10");
    }

    #[test]
    fn test_api_version_serde_as_string() {
        let v: ApiVersion = serde_json::from_value(json!("0.9")).unwrap();
        assert_eq!(v, ApiVersion::new(0, 9));
        assert_eq!(serde_json::to_value(v).unwrap(), json!("0.9"));
        assert!(serde_json::from_value::<ApiVersion>(json!("bogus")).is_err());
    }

    #[test]
    fn test_decode_module_layers() {
        let layers: ModuleLayers = serde_json::from_value(json!({
            "example/meta": {
                "0.1.0": {
                    "api": "0.8",
                    "layerDiffID": "sha256:meta",
                    "order": [{
                        "group": [
                            { "id": "example/node", "version": "1.2.3" },
                            { "id": "example/npm", "version": "0.4.0", "optional": true }
                        ]
                    }]
                }
            },
            "example/node": {
                "1.2.3": {
                    "api": "0.8",
                    "layerDiffID": "sha256:node",
                    "homepage": "https://example.com/node",
                    "stacks": [{ "id": "io.buildpacks.stacks.jammy", "mixins": ["build:git"] }]
                }
            }
        }))
        .unwrap();

        assert_eq!(layers.len(), 2);

        let meta = layers.get("example/meta", "0.1.0").unwrap();
        assert_eq!(meta.api, Some(ApiVersion::new(0, 8)));
        assert_eq!(meta.order[0].group.len(), 2);
        assert!(meta.order[0].group[1].optional);
        assert_eq!(meta.order[0].group[0].info.full_name(), "example/node@1.2.3");

        let node = layers.get("example/node", "1.2.3").unwrap();
        assert_eq!(node.layer_diff_id, "sha256:node");
        assert_eq!(node.stacks[0].mixins, vec!["build:git".to_string()]);
    }

    #[test]
    fn test_module_layers_iter_is_sorted() {
        let mut layers = ModuleLayers::new();
        layers.insert("b", "2.0", LayerInfo::default());
        layers.insert("a", "1.1", LayerInfo::default());
        layers.insert("a", "1.0", LayerInfo::default());

        let keys: Vec<_> = layers.iter().map(|(id, version, _)| (id, version)).collect();
        assert_eq!(keys, vec![("a", "1.0"), ("a", "1.1"), ("b", "2.0")]);
    }

    #[test]
    fn test_decode_metadata() {
        let md: Metadata = serde_json::from_value(json!({
            "id": "example/app",
            "version": "0.1.0",
            "name": "App",
            "stacks": [{ "id": "*" }]
        }))
        .unwrap();

        assert_eq!(md.info.full_name(), "example/app@0.1.0");
        assert_eq!(md.info.name.as_deref(), Some("App"));
        assert_eq!(md.stacks[0].id, "*");
    }
}
