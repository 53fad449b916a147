//! Entity document model.
//!
//! Field names serialize in PascalCase, which is both the fixture file
//! format and the wire shape of the metadata facets built from them.

use std::collections::BTreeMap;

use charmstore_domain::CharmId;
use serde::{Deserialize, Serialize};

/// A stored charm or bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entity {
    /// The fully resolved id.
    pub id: CharmId,
    /// Hex-encoded hash of the archive blob.
    pub blob_hash: String,
    /// Archive size in bytes.
    pub size: u64,
    /// Charm contents, present only for charms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charm: Option<CharmData>,
    /// Bundle contents, present only for bundles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleData>,
}

impl Entity {
    /// Creates a charm entity.
    pub fn charm(id: CharmId, blob_hash: impl Into<String>, size: u64, data: CharmData) -> Self {
        Self {
            id,
            blob_hash: blob_hash.into(),
            size,
            charm: Some(data),
            bundle: None,
        }
    }

    /// Creates a bundle entity.
    pub fn bundle(id: CharmId, blob_hash: impl Into<String>, size: u64, data: BundleData) -> Self {
        Self {
            id,
            blob_hash: blob_hash.into(),
            size,
            charm: None,
            bundle: Some(data),
        }
    }

    /// Interfaces the charm provides, sorted.
    pub fn provided_interfaces(&self) -> Vec<&str> {
        self.charm
            .as_ref()
            .map(|c| interfaces(&c.meta.provides))
            .unwrap_or_default()
    }

    /// Interfaces the charm requires, sorted.
    pub fn required_interfaces(&self) -> Vec<&str> {
        self.charm
            .as_ref()
            .map(|c| interfaces(&c.meta.requires))
            .unwrap_or_default()
    }
}

fn interfaces(relations: &BTreeMap<String, RelationSpec>) -> Vec<&str> {
    let mut out: Vec<&str> = relations.values().map(|r| r.interface.as_str()).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Charm contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharmData {
    pub meta: CharmMeta,
    /// Config options keyed by option name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, ConfigOption>>,
    /// Actions keyed by action name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, ActionSpec>>,
}

/// The charm's metadata.yaml contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharmMeta {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provides: BTreeMap<String, RelationSpec>,
    #[serde(default)]
    pub requires: BTreeMap<String, RelationSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// A relation endpoint declared by a charm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelationSpec {
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl RelationSpec {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            scope: None,
        }
    }
}

/// A charm config option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigOption {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// A charm action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// Bundle contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BundleData {
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub machines: BTreeMap<String, MachineSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub readme: String,
}

impl BundleData {
    /// Total number of units across all services.
    pub fn unit_count(&self) -> u32 {
        self.services.values().map(|s| s.num_units).sum()
    }

    /// Number of machines the bundle deploys.
    ///
    /// Bundles without an explicit machine section place every unit on its
    /// own machine.
    pub fn machine_count(&self) -> u32 {
        if self.machines.is_empty() {
            self.unit_count()
        } else {
            self.machines.len() as u32
        }
    }
}

/// A service within a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSpec {
    pub charm: String,
    #[serde(default)]
    pub num_units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
}

/// A machine within a bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MachineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}
