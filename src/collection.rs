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

//! Asset storage with referential maintenance.
//!
//! Instances are stored per type in dense vectors: the id of an asset is its
//! position. Every structural edit (delete, move, merge) is followed by a
//! [`PathOperation`] pass over the whole collection so that stored
//! [`AssetPath`] fields keep pointing at the same assets.

use std::collections::BTreeMap;
use std::fmt;

use crate::asset::{Asset, ErasedAsset};
use crate::error::{AssetError, Result};
use crate::operation::{CountReferences, DeleteShift, PathOperation, RemapTable};
use crate::path::{AssetPath, AssetTypeId};

/// Every loaded asset, grouped by type
#[derive(Default)]
pub struct AssetCollection {
    assets: BTreeMap<AssetTypeId, Vec<Box<dyn ErasedAsset>>>,
}

impl AssetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset, returning its path
    pub fn insert<A: Asset>(&mut self, asset: A) -> AssetPath {
        self.insert_boxed(Box::new(asset))
    }

    pub fn insert_boxed(&mut self, asset: Box<dyn ErasedAsset>) -> AssetPath {
        let type_id = asset.asset_type_id();
        let slots = self.assets.entry(type_id).or_default();
        slots.push(asset);
        AssetPath::new(type_id, (slots.len() - 1) as u32)
    }

    pub fn get<A: Asset>(&self, path: AssetPath) -> Option<&A> {
        if !path.is_type::<A>() {
            return None;
        }
        self.get_dyn(path)?.downcast_ref::<A>()
    }

    pub fn get_mut<A: Asset>(&mut self, path: AssetPath) -> Option<&mut A> {
        if !path.is_type::<A>() {
            return None;
        }
        self.get_dyn_mut(path)?.downcast_mut::<A>()
    }

    pub fn get_dyn(&self, path: AssetPath) -> Option<&dyn ErasedAsset> {
        if path.is_null() {
            return None;
        }
        self.assets
            .get(&path.type_id())?
            .get(path.id() as usize)
            .map(|asset| &**asset)
    }

    pub fn get_dyn_mut(&mut self, path: AssetPath) -> Option<&mut (dyn ErasedAsset + 'static)> {
        if path.is_null() {
            return None;
        }
        self.assets
            .get_mut(&path.type_id())?
            .get_mut(path.id() as usize)
            .map(|asset| &mut **asset)
    }

    pub fn contains(&self, path: AssetPath) -> bool {
        self.get_dyn(path).is_some()
    }

    /// Number of instances of one type
    pub fn len_of(&self, type_id: AssetTypeId) -> usize {
        self.assets.get(&type_id).map_or(0, Vec::len)
    }

    /// Total number of instances
    pub fn len(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Types with at least one instance, ascending
    pub fn type_ids(&self) -> impl Iterator<Item = AssetTypeId> + '_ {
        self.assets
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(type_id, _)| *type_id)
    }

    /// Instances of one type in id order
    pub fn assets_of(&self, type_id: AssetTypeId) -> &[Box<dyn ErasedAsset>] {
        self.assets.get(&type_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Path of every instance
    pub fn paths(&self) -> impl Iterator<Item = AssetPath> + '_ {
        self.assets.iter().flat_map(|(type_id, slots)| {
            (0..slots.len()).map(move |id| AssetPath::new(*type_id, id as u32))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetPath, &dyn ErasedAsset)> + '_ {
        self.assets.iter().flat_map(|(type_id, slots)| {
            slots
                .iter()
                .enumerate()
                .map(move |(id, asset)| (AssetPath::new(*type_id, id as u32), &**asset))
        })
    }

    /// Copy an asset into a new slot of the same type
    pub fn duplicate(&mut self, path: AssetPath) -> Result<AssetPath> {
        let copy = self
            .get_dyn(path)
            .ok_or(AssetError::AssetNotFound(path))?
            .clone_boxed();
        Ok(self.insert_boxed(copy))
    }

    /// Remove an asset.
    ///
    /// References to it anywhere in the collection become null, and those to
    /// later assets of the same type follow their shifted ids.
    pub fn delete(&mut self, path: AssetPath) -> Result<Box<dyn ErasedAsset>> {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("delete_asset", path = %path).entered();

        if !self.contains(path) {
            return Err(AssetError::AssetNotFound(path));
        }
        let removed = match self.assets.get_mut(&path.type_id()) {
            Some(slots) => slots.remove(path.id() as usize),
            None => return Err(AssetError::AssetNotFound(path)),
        };
        self.apply_path_operation(&DeleteShift { deleted: path });
        Ok(removed)
    }

    /// Move an asset to position `to` among its type, shifting the others
    pub fn move_asset(&mut self, path: AssetPath, to: u32) -> Result<AssetPath> {
        if !self.contains(path) {
            return Err(AssetError::AssetNotFound(path));
        }
        let target = path.with_id(to);
        let Some(slots) = self.assets.get_mut(&path.type_id()) else {
            return Err(AssetError::AssetNotFound(path));
        };
        if to as usize >= slots.len() {
            return Err(AssetError::AssetNotFound(target));
        }
        let from = path.id();
        if from == to {
            return Ok(path);
        }

        let asset = slots.remove(from as usize);
        slots.insert(to as usize, asset);

        let mut table = RemapTable::new();
        table.insert(path, target);
        if from < to {
            for id in from + 1..=to {
                table.insert(path.with_id(id), path.with_id(id - 1));
            }
        } else {
            for id in to..from {
                table.insert(path.with_id(id), path.with_id(id + 1));
            }
        }
        self.apply_path_operation(&table);
        Ok(target)
    }

    /// Append every asset of `other`.
    ///
    /// Incoming assets get new ids after the existing ones and their
    /// references to each other are rewritten accordingly. A reference past
    /// the end of a type that `other` holds was dangling there and becomes
    /// null; references to types absent from `other` are kept. The returned
    /// table maps old incoming paths to new ones.
    pub fn merge(&mut self, other: AssetCollection) -> RemapTable {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("merge", incoming = other.len()).entered();

        let mut table = RemapTable::new();
        for (type_id, slots) in &other.assets {
            let offset = self.len_of(*type_id) as u32;
            for id in 0..slots.len() as u32 {
                table.insert(AssetPath::new(*type_id, id), AssetPath::new(*type_id, offset + id));
            }
        }

        let incoming_lengths: BTreeMap<AssetTypeId, usize> = other
            .assets
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(type_id, slots)| (*type_id, slots.len()))
            .collect();
        let relocate = |path: &mut AssetPath| {
            if path.is_null() {
                return;
            }
            match incoming_lengths.get(&path.type_id()) {
                Some(&len) if path.id() as usize >= len => *path = AssetPath::NULL,
                Some(_) => *path = table.resolve(*path),
                None => {}
            }
        };

        for (type_id, slots) in other.assets {
            let target = self.assets.entry(type_id).or_default();
            for mut asset in slots {
                asset.visit_asset_paths(&relocate);
                target.push(asset);
            }
        }
        table
    }

    /// Run `operation` over every asset path field of every asset.
    ///
    /// Not atomic: the operation is applied asset by asset.
    pub fn apply_path_operation(&mut self, operation: &dyn PathOperation) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("apply_path_operation", assets = self.len()).entered();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.assets.values_mut().for_each(|slots| {
                slots
                    .par_iter_mut()
                    .for_each(|asset| asset.visit_asset_paths(operation));
            });
        }

        #[cfg(not(feature = "parallel"))]
        for asset in self.assets.values_mut().flatten() {
            asset.visit_asset_paths(operation);
        }
    }

    /// Assets holding at least one reference to `target`
    pub fn references_to(&self, target: AssetPath) -> Vec<AssetPath> {
        self.iter()
            .filter(|(_, asset)| {
                let count = CountReferences::new(target);
                asset.for_each_asset_path(&mut |path: &AssetPath| {
                    let mut path = *path;
                    count.apply(&mut path);
                });
                count.count() > 0
            })
            .map(|(path, _)| path)
            .collect()
    }

    /// `(holder, target)` pairs whose non-null target is not in the collection
    pub fn dangling_references(&self) -> Vec<(AssetPath, AssetPath)> {
        let mut dangling = Vec::new();
        for (holder, asset) in self.iter() {
            asset.for_each_asset_path(&mut |path: &AssetPath| {
                if !path.is_null() && !self.contains(*path) {
                    dangling.push((holder, *path));
                }
            });
        }
        dangling
    }
}

impl Clone for AssetCollection {
    fn clone(&self) -> Self {
        let assets = self
            .assets
            .iter()
            .map(|(type_id, slots)| (*type_id, slots.iter().map(|asset| asset.clone_boxed()).collect()))
            .collect();
        Self { assets }
    }
}

impl fmt::Debug for AssetCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (type_id, slots) in &self.assets {
            let names: Vec<&str> = slots.iter().map(|asset| asset.asset_name()).collect();
            map.entry(type_id, &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Image, LineStyle, Sprite};

    fn named<A: Asset>(name: &str) -> A {
        let mut asset = A::default();
        asset.set_name(name);
        asset
    }

    fn style_for(sprite: AssetPath, name: &str) -> LineStyle {
        let mut style: LineStyle = named(name);
        style.sprite_path = sprite;
        style
    }

    #[test]
    fn test_insert_and_get() {
        let mut collection = AssetCollection::new();
        let first = collection.insert(named::<Sprite>("a"));
        let second = collection.insert(named::<Sprite>("b"));
        let image = collection.insert(named::<Image>("atlas"));

        assert_eq!(first, AssetPath::of::<Sprite>(0));
        assert_eq!(second, AssetPath::of::<Sprite>(1));
        assert_eq!(image, AssetPath::of::<Image>(0));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.len_of(Sprite::TYPE_ID), 2);
        assert_eq!(collection.get::<Sprite>(second).map(|s| s.name()), Some("b"));
        assert!(collection.get::<Image>(second).is_none());
        assert!(collection.get_dyn(AssetPath::NULL).is_none());
        assert!(collection.get_dyn(AssetPath::of::<Sprite>(2)).is_none());

        collection.get_mut::<Sprite>(first).unwrap().width = 16;
        assert_eq!(collection.get::<Sprite>(first).map(|s| s.width), Some(16));
    }

    #[test]
    fn test_delete_shifts_references() {
        let mut collection = AssetCollection::new();
        let sprites: Vec<_> = (0..3)
            .map(|i| collection.insert(named::<Sprite>(&format!("s{i}"))))
            .collect();
        let to_first = collection.insert(style_for(sprites[0], "first"));
        let to_second = collection.insert(style_for(sprites[1], "second"));
        let to_third = collection.insert(style_for(sprites[2], "third"));

        let removed = collection.delete(sprites[1]).unwrap();
        assert_eq!(removed.asset_name(), "s1");
        assert_eq!(collection.len_of(Sprite::TYPE_ID), 2);

        let sprite_of = |path| collection.get::<LineStyle>(path).unwrap().sprite_path;
        assert_eq!(sprite_of(to_first), sprites[0]);
        assert!(sprite_of(to_second).is_null());
        assert_eq!(sprite_of(to_third), AssetPath::of::<Sprite>(1));
        assert_eq!(
            collection.get::<Sprite>(AssetPath::of::<Sprite>(1)).map(|s| s.name()),
            Some("s2")
        );
        assert!(collection.dangling_references().is_empty());

        assert_eq!(
            collection.delete(AssetPath::of::<Sprite>(9)).err(),
            Some(AssetError::AssetNotFound(AssetPath::of::<Sprite>(9)))
        );
    }

    #[test]
    fn test_move_asset_remaps() {
        let mut collection = AssetCollection::new();
        let sprites: Vec<_> = (0..4)
            .map(|i| collection.insert(named::<Sprite>(&format!("s{i}"))))
            .collect();
        let styles: Vec<_> = sprites
            .iter()
            .map(|sprite| collection.insert(style_for(*sprite, "style")))
            .collect();

        let moved = collection.move_asset(sprites[0], 2).unwrap();
        assert_eq!(moved, AssetPath::of::<Sprite>(2));
        let names: Vec<_> = collection
            .assets_of(Sprite::TYPE_ID)
            .iter()
            .map(|asset| asset.asset_name().to_string())
            .collect();
        assert_eq!(names, ["s1", "s2", "s0", "s3"]);

        for (style, original) in styles.iter().zip(["s0", "s1", "s2", "s3"]) {
            let target = collection.get::<LineStyle>(*style).unwrap().sprite_path;
            assert_eq!(collection.get_dyn(target).map(|a| a.asset_name()), Some(original));
        }
        assert!(collection.move_asset(sprites[0], 4).is_err());
    }

    #[test]
    fn test_merge_relocates_incoming() {
        let mut base = AssetCollection::new();
        base.insert(named::<Sprite>("existing"));

        let mut incoming = AssetCollection::new();
        let sprite = incoming.insert(named::<Sprite>("incoming"));
        incoming.insert(style_for(sprite, "uses incoming"));

        let table = base.merge(incoming);
        assert_eq!(table.get(&sprite), Some(AssetPath::of::<Sprite>(1)));
        let style = base.get::<LineStyle>(AssetPath::of::<LineStyle>(0)).unwrap();
        assert_eq!(style.sprite_path, AssetPath::of::<Sprite>(1));
        assert_eq!(
            base.get_dyn(style.sprite_path).map(|a| a.asset_name()),
            Some("incoming")
        );
    }

    #[test]
    fn test_merge_nulls_dangling_incoming_references() {
        let mut base = AssetCollection::new();
        for i in 0..3 {
            base.insert(named::<Sprite>(&format!("base{i}")));
        }
        let image = base.insert(named::<Image>("atlas"));

        let mut incoming = AssetCollection::new();
        incoming.insert(named::<Sprite>("incoming"));
        incoming.insert(style_for(AssetPath::of::<Sprite>(2), "stale"));
        incoming.insert(Sprite {
            image_path: image,
            ..named::<Sprite>("external")
        });

        base.merge(incoming);
        let style = base.get::<LineStyle>(AssetPath::of::<LineStyle>(0)).unwrap();
        assert!(style.sprite_path.is_null());
        let external = base.get::<Sprite>(AssetPath::of::<Sprite>(4)).unwrap();
        assert_eq!(external.name(), "external");
        assert_eq!(external.image_path, image);
        assert!(base.dangling_references().is_empty());
    }

    #[test]
    fn test_duplicate_and_reference_queries() {
        let mut collection = AssetCollection::new();
        let sprite = collection.insert(named::<Sprite>("s"));
        let style = collection.insert(style_for(sprite, "original"));
        let copy = collection.duplicate(style).unwrap();

        assert_eq!(copy, AssetPath::of::<LineStyle>(1));
        assert_eq!(collection.references_to(sprite), vec![style, copy]);

        collection.get_mut::<LineStyle>(copy).unwrap().sprite_path = AssetPath::of::<Sprite>(7);
        assert_eq!(collection.references_to(sprite), vec![style]);
        assert_eq!(
            collection.dangling_references(),
            vec![(copy, AssetPath::of::<Sprite>(7))]
        );
        assert!(collection.duplicate(AssetPath::NULL).is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut collection = AssetCollection::new();
        let sprite = collection.insert(named::<Sprite>("s"));
        let snapshot = collection.clone();
        collection.get_mut::<Sprite>(sprite).unwrap().set_name("changed");
        assert_eq!(snapshot.get::<Sprite>(sprite).map(|s| s.name()), Some("s"));
        assert_eq!(snapshot.paths().collect::<Vec<_>>(), vec![sprite]);
    }
}
