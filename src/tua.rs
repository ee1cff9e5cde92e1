// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Serialization support for assets
//!
//! Each asset reads and writes itself as a [`TuaRecord`], a JSON object keyed
//! by field name, through its descriptor table. A [`TuaPackage`] groups the
//! records of a whole [`AssetCollection`] by type name; the position of a
//! record in its list is the instance id.
//!
//! References are written as `{"type": <type name>, "key": <id>}` so that a
//! package stays readable when numeric type ids are reassigned.

use std::collections::BTreeMap;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::asset::NAME;
use crate::collection::AssetCollection;
use crate::error::{AssetError, Result};
use crate::path::{AssetPath, AssetTypeId};
use crate::registry::AssetRegistry;
use crate::sub_path::SubPath;

/// Serialized form of one record
pub type TuaRecord = serde_json::Map<String, serde_json::Value>;

/// Current package format version
pub const TUA_VERSION: u32 = 1;

const TYPE_KEY: &str = "type";
const ID_KEY: &str = "key";

/// Shared state of one save or load pass
pub struct SaveLoadContext<'a> {
    registry: &'a AssetRegistry,
    bounds: Option<AHashMap<AssetTypeId, usize>>,
}

impl<'a> SaveLoadContext<'a> {
    pub fn new(registry: &'a AssetRegistry) -> Self {
        Self {
            registry,
            bounds: None,
        }
    }

    /// Reject references whose key is not below the instance count of its type
    pub fn with_reference_bounds(mut self, bounds: AHashMap<AssetTypeId, usize>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn registry(&self) -> &'a AssetRegistry {
        self.registry
    }

    pub fn path_to_tua(&self, path: &AssetPath) -> Result<serde_json::Value> {
        if path.is_null() {
            return Ok(serde_json::Value::Null);
        }
        let type_name = self
            .registry
            .type_name(path.type_id())
            .ok_or(AssetError::UnknownTypeId(path.type_id()))?;
        let mut object = TuaRecord::new();
        object.insert(TYPE_KEY.to_string(), type_name.into());
        object.insert(ID_KEY.to_string(), path.id().into());
        Ok(serde_json::Value::Object(object))
    }

    pub fn path_from_tua(&self, value: &serde_json::Value) -> Result<AssetPath> {
        if value.is_null() {
            return Ok(AssetPath::NULL);
        }
        let malformed = || {
            AssetError::DeserializationError(format!(
                "expected null or {{\"{TYPE_KEY}\": <name>, \"{ID_KEY}\": <id>}}, found {value}"
            ))
        };
        let object = value.as_object().ok_or_else(malformed)?;
        let type_name = object
            .get(TYPE_KEY)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(malformed)?;
        let key = object
            .get(ID_KEY)
            .and_then(serde_json::Value::as_u64)
            .and_then(|key| u32::try_from(key).ok())
            .ok_or_else(malformed)?;

        let type_id = self
            .registry
            .type_id(type_name)
            .ok_or_else(|| AssetError::UnknownAssetType(type_name.to_string()))?;
        if let Some(bounds) = &self.bounds {
            let count = bounds.get(&type_id).copied().unwrap_or(0);
            if key as usize >= count {
                return Err(AssetError::UnresolvedReference {
                    type_name: type_name.to_string(),
                    key,
                });
            }
        }
        let path = AssetPath::new(type_id, key);
        if path.is_null() {
            return Err(malformed());
        }
        Ok(path)
    }
}

/// Serialized form of a whole collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuaPackage {
    pub version: u32,
    /// Records per type name, in id order
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<serde_json::Value>>,
}

impl Default for TuaPackage {
    fn default() -> Self {
        Self {
            version: TUA_VERSION,
            assets: BTreeMap::new(),
        }
    }
}

impl TuaPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records
    pub fn record_count(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }

    /// Serialize package to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AssetError::SerializationError(e.to_string()))
    }

    /// Deserialize package from JSON
    pub fn from_json_string(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AssetError::DeserializationError(e.to_string()))
    }

    /// Save package to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load package from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_string(&json)
    }
}

/// Load configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject references past the end of the package; on by default
    pub strict_references: bool,
    /// Skip lists of unregistered types instead of failing their records
    pub allow_unknown_types: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict_references: true,
            allow_unknown_types: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    pub fn allow_unknown_types(mut self, allow: bool) -> Self {
        self.allow_unknown_types = allow;
        self
    }
}

/// One record that could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub type_name: String,
    pub index: usize,
    pub error: AssetError,
}

/// What happened during [`load_package`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Records read without error
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
    /// Unregistered type names whose lists were skipped
    pub skipped_types: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped_types.is_empty()
    }
}

/// Build a collection from a package.
///
/// Never fails as a whole: per-record problems land in the report, and the
/// slot of a failed record holds a default instance (named when the name was
/// readable) so that the ids of its siblings are unchanged.
pub fn load_package(
    package: &TuaPackage,
    registry: &AssetRegistry,
    options: &LoadOptions,
) -> (AssetCollection, LoadReport) {
    #[cfg(feature = "profiling")]
    let _span = tracing::info_span!("load_package", records = package.record_count()).entered();

    let mut ctx = SaveLoadContext::new(registry);
    if options.strict_references {
        let bounds = package
            .assets
            .iter()
            .filter_map(|(type_name, records)| {
                registry
                    .type_id(type_name)
                    .map(|type_id| (type_id, records.len()))
            })
            .collect();
        ctx = ctx.with_reference_bounds(bounds);
    }

    let mut collection = AssetCollection::new();
    let mut report = LoadReport::default();

    for (type_name, records) in &package.assets {
        let Some(registration) = registry.by_name(type_name) else {
            #[cfg(feature = "profiling")]
            tracing::warn!(type_name = %type_name, "unknown asset type in package");
            if options.allow_unknown_types {
                report.skipped_types.push(type_name.clone());
            } else {
                report
                    .failures
                    .extend((0..records.len()).map(|index| LoadFailure {
                        type_name: type_name.clone(),
                        index,
                        error: AssetError::UnknownAssetType(type_name.clone()),
                    }));
            }
            continue;
        };

        for (index, record) in records.iter().enumerate() {
            let mut asset = registration.create();
            let status = match record.as_object() {
                Some(object) => asset.read_record(&ctx, object),
                None => Err(AssetError::MalformedRecord(format!(
                    "{type_name}[{index}] is not an object"
                ))),
            };
            match status {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    #[cfg(feature = "profiling")]
                    tracing::warn!(type_name = %type_name, index, %error, "failed to load asset");
                    asset = registration.create();
                    if let Some(name) = record.get("name").and_then(serde_json::Value::as_str) {
                        asset.set_value(NAME, &SubPath::root(), name.to_string());
                    }
                    report.failures.push(LoadFailure {
                        type_name: type_name.clone(),
                        index,
                        error,
                    });
                }
            }
            collection.insert_boxed(asset);
        }
    }

    (collection, report)
}

/// Write every asset of `collection` into a package
pub fn save_package(collection: &AssetCollection, registry: &AssetRegistry) -> Result<TuaPackage> {
    #[cfg(feature = "profiling")]
    let _span = tracing::info_span!("save_package", assets = collection.len()).entered();

    let ctx = SaveLoadContext::new(registry);
    let mut package = TuaPackage::new();
    for type_id in collection.type_ids() {
        let type_name = registry
            .type_name(type_id)
            .ok_or(AssetError::UnknownTypeId(type_id))?;
        let records = collection
            .assets_of(type_id)
            .iter()
            .map(|asset| asset.write_record(&ctx).map(serde_json::Value::Object))
            .collect::<Result<Vec<_>>>()?;
        package.assets.insert(type_name.to_string(), records);
    }
    Ok(package)
}
