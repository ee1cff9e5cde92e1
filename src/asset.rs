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

//! Asset base abstraction

use std::any::Any;

use crate::operation::PathOperation;
use crate::path::AssetTypeId;
use crate::record::{self, DynRecord, Record};
use crate::schema::FieldId;
use crate::sub_path::SubPath;
use crate::value::FieldValue;

/// Name field, shared by every asset type
pub const NAME: FieldId = FieldId(0);

/// First field id available to concrete asset types
pub const FIRST_FIELD: FieldId = FieldId(1);

/// Fields every asset carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetBase {
    pub name: String,
}

/// Trait for concrete asset types
pub trait Asset: Record {
    const TYPE_ID: AssetTypeId;
    const TYPE_NAME: &'static str;

    fn base(&self) -> &AssetBase;

    fn base_mut(&mut self) -> &mut AssetBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn set_name(&mut self, name: impl Into<String>) {
        self.base_mut().name = name.into();
    }
}

/// Type-erased asset, as stored by collections
pub trait ErasedAsset: DynRecord {
    fn asset_type_id(&self) -> AssetTypeId;
    fn asset_type_name(&self) -> &'static str;
    fn asset_name(&self) -> &str;
    fn clone_boxed(&self) -> Box<dyn ErasedAsset>;
    fn as_record(&self) -> &dyn DynRecord;
    fn as_record_mut(&mut self) -> &mut dyn DynRecord;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<A: Asset> ErasedAsset for A {
    fn asset_type_id(&self) -> AssetTypeId {
        A::TYPE_ID
    }

    fn asset_type_name(&self) -> &'static str {
        A::TYPE_NAME
    }

    fn asset_name(&self) -> &str {
        self.name()
    }

    fn clone_boxed(&self) -> Box<dyn ErasedAsset> {
        Box::new(self.clone())
    }

    fn as_record(&self) -> &dyn DynRecord {
        self
    }

    fn as_record_mut(&mut self) -> &mut dyn DynRecord {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<'a> dyn ErasedAsset + 'a {
    pub fn downcast_ref<A: Asset>(&self) -> Option<&A> {
        self.as_any().downcast_ref::<A>()
    }

    pub fn downcast_mut<A: Asset>(&mut self) -> Option<&mut A> {
        self.as_any_mut().downcast_mut::<A>()
    }

    pub fn get_value<T: FieldValue>(&self, field: FieldId, sub_path: &SubPath, default: T) -> T {
        record::get_field_value(self.as_record(), field, sub_path)
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    pub fn set_value<T: FieldValue>(&mut self, field: FieldId, sub_path: &SubPath, value: T) -> bool {
        record::set_field_value(self.as_record_mut(), field, sub_path, value.into_value())
    }

    pub fn add_sub_item(&mut self, kind: FieldId, sub_path: &SubPath) -> Option<usize> {
        record::insert_sub_item(self.as_record_mut(), kind, sub_path, None)
    }

    pub fn insert_sub_item(&mut self, kind: FieldId, sub_path: &SubPath, index: usize) -> Option<usize> {
        record::insert_sub_item(self.as_record_mut(), kind, sub_path, Some(index))
    }

    pub fn delete_sub_item(&mut self, sub_path: &SubPath) -> Option<usize> {
        record::delete_sub_item(self.as_record_mut(), sub_path)
    }

    pub fn sub_item_count(&self, kind: FieldId, sub_path: &SubPath) -> Option<usize> {
        record::sub_item_count(self.as_record(), kind, sub_path)
    }

    pub fn asset_path_operation(&mut self, operation: &dyn PathOperation) {
        self.visit_asset_paths(operation);
    }
}

/// Declare a concrete asset type.
///
/// Like [`define_record!`](crate::define_record) plus a `TYPE_ID` after the
/// struct name. Field offsets are relative to [`FIRST_FIELD`] so the base
/// fields keep the low ids on every type.
///
/// ```ignore
/// define_asset! {
///     #[derive(Default)]
///     pub struct LineStyle: 28 {
///         SPRITE_PATH = 0 => pub sprite_path: AssetPath,
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_asset {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_id:literal {
            $( $(#[$fmeta:meta])* $id:ident = $off:literal => $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
        $( arrays {
            $( $(#[$ameta:meta])* $aid:ident = $aoff:literal => $avis:vis $afield:ident : Vec<$aty:ty> ),* $(,)?
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            pub base: $crate::asset::AssetBase,
            $( $(#[$fmeta])* $fvis $field: $ty, )*
            $($( $(#[$ameta])* $avis $afield: Vec<$aty>, )*)?
        }

        impl $name {
            pub const NAME: $crate::schema::FieldId = $crate::asset::NAME;
            $( pub const $id: $crate::schema::FieldId =
                $crate::schema::FieldId($crate::asset::FIRST_FIELD.0 + $off); )*
            $($( pub const $aid: $crate::schema::FieldId =
                $crate::schema::FieldId($crate::asset::FIRST_FIELD.0 + $aoff); )*)?
        }

        impl $crate::record::Record for $name {
            fn schema() -> &'static $crate::schema::Schema<Self> {
                static SCHEMA: std::sync::OnceLock<$crate::schema::Schema<$name>> =
                    std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::schema::Schema::new(stringify!($name))
                        .with_scalar::<String>(
                            Self::NAME,
                            "name",
                            { fn get(r: &$name) -> &String { &r.base.name } get },
                            { fn get_mut(r: &mut $name) -> &mut String { &mut r.base.name } get_mut },
                        )
                        $( .with_scalar::<$ty>(
                            Self::$id,
                            stringify!($field),
                            { fn get(r: &$name) -> &$ty { &r.$field } get },
                            { fn get_mut(r: &mut $name) -> &mut $ty { &mut r.$field } get_mut },
                        ) )*
                        $($( .with_array::<$aty>(
                            Self::$aid,
                            stringify!($afield),
                            { fn get(r: &$name) -> &Vec<$aty> { &r.$afield } get },
                            { fn get_mut(r: &mut $name) -> &mut Vec<$aty> { &mut r.$afield } get_mut },
                        ) )*)?
                })
            }
        }

        impl $crate::asset::Asset for $name {
            const TYPE_ID: $crate::path::AssetTypeId = $crate::path::AssetTypeId($type_id);
            const TYPE_NAME: &'static str = stringify!($name);

            fn base(&self) -> &$crate::asset::AssetBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::asset::AssetBase {
                &mut self.base
            }
        }
    };
}
