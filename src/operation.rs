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

//! Reference maintenance.
//!
//! A [`PathOperation`] is applied in place to every [`AssetPath`] field of an
//! asset, nested sub-items included. Running one operation over a whole
//! collection is how deletes, merges and reorders stay referentially
//! consistent without per-type code.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::path::AssetPath;

/// Visitor applied to each asset path field
pub trait PathOperation: Sync {
    fn apply(&self, path: &mut AssetPath);
}

impl<F> PathOperation for F
where
    F: Fn(&mut AssetPath) + Sync,
{
    fn apply(&self, path: &mut AssetPath) {
        self(path)
    }
}

/// Rewrite one reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remap {
    pub from: AssetPath,
    pub to: AssetPath,
}

impl PathOperation for Remap {
    fn apply(&self, path: &mut AssetPath) {
        if *path == self.from {
            *path = self.to;
        }
    }
}

/// Rewrite many references at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    map: FxHashMap<AssetPath, AssetPath>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: AssetPath, to: AssetPath) {
        if from != to {
            self.map.insert(from, to);
        }
    }

    pub fn get(&self, from: &AssetPath) -> Option<AssetPath> {
        self.map.get(from).copied()
    }

    /// Where `path` ends up, itself when untouched
    pub fn resolve(&self, path: AssetPath) -> AssetPath {
        self.get(&path).unwrap_or(path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetPath, &AssetPath)> {
        self.map.iter()
    }
}

impl PathOperation for RemapTable {
    fn apply(&self, path: &mut AssetPath) {
        if let Some(to) = self.map.get(path) {
            *path = *to;
        }
    }
}

/// Null out references to one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidate {
    pub target: AssetPath,
}

impl PathOperation for Invalidate {
    fn apply(&self, path: &mut AssetPath) {
        if !path.is_null() && *path == self.target {
            *path = AssetPath::NULL;
        }
    }
}

/// Follow-up of removing `deleted` from a positional collection.
///
/// References to the deleted asset become null; references to assets of the
/// same type with a higher id move down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteShift {
    pub deleted: AssetPath,
}

impl PathOperation for DeleteShift {
    fn apply(&self, path: &mut AssetPath) {
        if path.is_null() || self.deleted.is_null() || path.type_id() != self.deleted.type_id() {
            return;
        }
        if path.id() == self.deleted.id() {
            *path = AssetPath::NULL;
        } else if path.id() > self.deleted.id() {
            *path = path.with_id(path.id() - 1);
        }
    }
}

/// Read-only: gather every non-null reference visited
#[derive(Debug, Default)]
pub struct CollectReferences {
    paths: Mutex<Vec<AssetPath>>,
}

impl CollectReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected paths, sorted and deduplicated
    pub fn into_paths(self) -> Vec<AssetPath> {
        let mut paths = self.paths.into_inner();
        paths.sort();
        paths.dedup();
        paths
    }
}

impl PathOperation for CollectReferences {
    fn apply(&self, path: &mut AssetPath) {
        if !path.is_null() {
            self.paths.lock().push(*path);
        }
    }
}

/// Read-only: count references to one asset
#[derive(Debug)]
pub struct CountReferences {
    target: AssetPath,
    count: AtomicUsize,
}

impl CountReferences {
    pub fn new(target: AssetPath) -> Self {
        Self {
            target,
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl PathOperation for CountReferences {
    fn apply(&self, path: &mut AssetPath) {
        if !path.is_null() && *path == self.target {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }
}
