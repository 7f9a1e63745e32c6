//! Architecture normalisation
//!
//! Devices and component platforms report architectures in many spellings
//! (`aarch64`, `arm64v8`, `x86_64`, `amd64` ...). Everything is folded onto two
//! canonical tokens by substring match; anything else is unrecognised and
//! treated as incompatible.

use std::collections::BTreeSet;
use std::fmt;

use openapi_client::models::Platform;
use serde::{Serialize, Serializer};

/// Platform attribute keys that carry an architecture
const ARCH_ATTRIBUTE_KEYS: [&str; 2] = ["architecture", "arch"];

/// Canonical CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arch {
    Arm64,
    Amd64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::Amd64 => "amd64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalise a raw architecture string. ARM spellings win over x86 ones.
pub fn normalize_arch(raw: &str) -> Option<Arch> {
    let lower = raw.to_lowercase();
    if lower.contains("arm64") || lower.contains("aarch64") {
        Some(Arch::Arm64)
    } else if lower.contains("amd64") || lower.contains("x86_64") || lower.contains("x86") {
        Some(Arch::Amd64)
    } else {
        None
    }
}

/// Normalised architecture of a target device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceArch {
    Known(Arch),
    Unrecognized,
}

impl DeviceArch {
    pub fn from_reported(raw: Option<&str>) -> Self {
        raw.and_then(normalize_arch)
            .map(DeviceArch::Known)
            .unwrap_or(DeviceArch::Unrecognized)
    }
}

impl fmt::Display for DeviceArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceArch::Known(arch) => arch.fmt(f),
            DeviceArch::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

impl Serialize for DeviceArch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Architectures a component can run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchSupport {
    /// No platform pins an architecture
    All,

    /// Platforms pin these architectures. Empty when every pinned value was
    /// unrecognised, which makes the component compatible with nothing.
    Only(BTreeSet<Arch>),
}

impl ArchSupport {
    pub fn from_platforms(platforms: Option<&[Platform]>) -> Self {
        let mut pinned = false;
        let mut archs = BTreeSet::new();

        for platform in platforms.unwrap_or_default() {
            for (key, value) in &platform.attributes {
                if !ARCH_ATTRIBUTE_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k)) {
                    continue;
                }
                pinned = true;
                if let Some(arch) = normalize_arch(value) {
                    archs.insert(arch);
                }
            }
        }

        if pinned {
            ArchSupport::Only(archs)
        } else {
            ArchSupport::All
        }
    }

    /// Whether a device of this architecture can run the component
    pub fn supports(&self, device: &DeviceArch) -> bool {
        match (self, device) {
            (ArchSupport::All, _) => true,
            (ArchSupport::Only(archs), DeviceArch::Known(arch)) => archs.contains(arch),
            (ArchSupport::Only(_), DeviceArch::Unrecognized) => false,
        }
    }

    /// Whether the component runs on every architecture in `selection`
    pub fn supports_all<'a>(&self, selection: impl IntoIterator<Item = &'a DeviceArch>) -> bool {
        selection.into_iter().all(|device| self.supports(device))
    }
}

impl fmt::Display for ArchSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchSupport::All => f.write_str("all"),
            ArchSupport::Only(archs) if archs.is_empty() => f.write_str("no recognized architecture"),
            ArchSupport::Only(archs) => {
                let names: Vec<&str> = archs.iter().map(Arch::as_str).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}
