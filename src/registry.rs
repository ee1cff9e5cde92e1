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

//! Asset type registry

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::asset::{Asset, ErasedAsset};
use crate::path::AssetTypeId;

/// Type registration data
#[derive(Clone, Copy)]
pub struct AssetTypeRegistration {
    pub type_id: AssetTypeId,
    pub type_name: &'static str,
    pub default_fn: fn() -> Box<dyn ErasedAsset>,
}

impl AssetTypeRegistration {
    pub fn new<A: Asset>() -> Self {
        Self {
            type_id: A::TYPE_ID,
            type_name: A::TYPE_NAME,
            default_fn: || Box::new(A::default()),
        }
    }

    /// Fresh default instance
    pub fn create(&self) -> Box<dyn ErasedAsset> {
        (self.default_fn)()
    }
}

impl std::fmt::Debug for AssetTypeRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetTypeRegistration")
            .field("type_id", &self.type_id)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Maps type ids and type names to constructors.
///
/// Iteration is in type id order so saved packages are stable.
#[derive(Debug, Default, Clone)]
pub struct AssetRegistry {
    registrations: BTreeMap<AssetTypeId, AssetTypeRegistration>,
    by_name: AHashMap<&'static str, AssetTypeId>,
}

impl AssetRegistry {
    /// Create new registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every type of the sample catalog
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        crate::catalog::register_all(&mut registry);
        registry
    }

    /// Register an asset type.
    ///
    /// # Panics
    /// If another type already uses the same id or name.
    pub fn register<A: Asset>(&mut self) -> &mut Self {
        let registration = AssetTypeRegistration::new::<A>();
        if let Some(existing) = self.registrations.get(&registration.type_id) {
            assert_eq!(
                existing.type_name, registration.type_name,
                "asset type id {} registered twice",
                registration.type_id
            );
            return self;
        }
        assert!(
            !self.by_name.contains_key(registration.type_name),
            "asset type name `{}` registered twice",
            registration.type_name
        );
        self.by_name
            .insert(registration.type_name, registration.type_id);
        self.registrations
            .insert(registration.type_id, registration);
        self
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<A: Asset>(mut self) -> Self {
        self.register::<A>();
        self
    }

    /// Get registration by type id
    pub fn get(&self, type_id: AssetTypeId) -> Option<&AssetTypeRegistration> {
        self.registrations.get(&type_id)
    }

    /// Get registration by type name
    pub fn by_name(&self, type_name: &str) -> Option<&AssetTypeRegistration> {
        self.by_name
            .get(type_name)
            .and_then(|type_id| self.registrations.get(type_id))
    }

    pub fn type_name(&self, type_id: AssetTypeId) -> Option<&'static str> {
        self.get(type_id).map(|registration| registration.type_name)
    }

    pub fn type_id(&self, type_name: &str) -> Option<AssetTypeId> {
        self.by_name.get(type_name).copied()
    }

    pub fn create(&self, type_id: AssetTypeId) -> Option<Box<dyn ErasedAsset>> {
        self.get(type_id).map(AssetTypeRegistration::create)
    }

    pub fn contains(&self, type_id: AssetTypeId) -> bool {
        self.registrations.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetTypeRegistration> {
        self.registrations.values()
    }
}
