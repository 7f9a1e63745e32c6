//! Manifest format detection
//!
//! A manifest line is a JSON object. DDA manifests carry the label under
//! `anomaly-label` with a fixed set of `-metadata` companions; Ground Truth
//! manifests name their label attribute after the labeling job, so any other
//! `-metadata` key marks a manifest that still needs transforming.

use std::fmt;

use serde::Serialize;

/// Label attribute of a DDA manifest
pub const DDA_LABEL_KEY: &str = "anomaly-label";

/// The only `-metadata` keys a DDA manifest may carry
pub const DDA_METADATA_KEYS: [&str; 2] = ["anomaly-label-metadata", "anomaly-mask-ref-metadata"];

const METADATA_SUFFIX: &str = "-metadata";

/// Manifest schema family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestFormat {
    /// Raw Ground Truth output; must be transformed before training
    GroundTruth,

    /// Ready to train
    Dda,

    Unknown,
}

impl ManifestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::GroundTruth => "ground-truth",
            ManifestFormat::Dda => "dda",
            ManifestFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_foreign_metadata_key(key: &str) -> bool {
    key.ends_with(METADATA_SUFFIX) && !DDA_METADATA_KEYS.contains(&key)
}

/// Classify a manifest from one sample entry
pub fn detect_format(entry: &serde_json::Map<String, serde_json::Value>) -> ManifestFormat {
    if entry.keys().any(|key| is_foreign_metadata_key(key)) {
        ManifestFormat::GroundTruth
    } else if entry.contains_key(DDA_LABEL_KEY) {
        ManifestFormat::Dda
    } else {
        ManifestFormat::Unknown
    }
}

/// The Ground Truth label attribute: a key whose `-metadata` sibling is also
/// present. Keys are visited in map order, so the first match wins.
pub fn ground_truth_label_attribute(entry: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    entry
        .keys()
        .filter(|key| is_foreign_metadata_key(key))
        .filter_map(|key| key.strip_suffix(METADATA_SUFFIX))
        .find(|attribute| entry.contains_key(*attribute))
        .map(str::to_string)
}
