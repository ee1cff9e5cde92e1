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

//! Records: assets and their sub-items.
//!
//! A record is any struct with a [`Schema`]. Assets are records, and so is
//! every element type stored in an array-valued field. All of the value
//! protocol is implemented here once, generically over the schema.

use crate::error::{AssetError, Result};
use crate::operation::PathOperation;
use crate::path::AssetPath;
use crate::schema::{FieldAccess, FieldId, Schema};
use crate::sub_path::{SubPath, SubPathOperation, SubPathStep};
use crate::tua::{SaveLoadContext, TuaRecord};
use crate::value::{FieldValue, Value};

/// Statically typed side of the protocol.
///
/// Implemented by [`define_record!`](crate::define_record) and
/// [`define_asset!`](crate::define_asset); the provided methods are the
/// uniform accessors every record gets.
pub trait Record: Default + Clone + Send + Sync + 'static {
    fn schema() -> &'static Schema<Self>;

    /// Value of `field` in the record addressed by `sub_path`, or `default`
    /// when the field is unknown, the sub-path does not resolve, or the
    /// stored type is not `T`.
    fn get_value<T: FieldValue>(&self, field: FieldId, sub_path: &SubPath, default: T) -> T {
        get_field_value(self, field, sub_path)
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    /// Write `value`; returns `false` and changes nothing on failure
    fn set_value<T: FieldValue>(&mut self, field: FieldId, sub_path: &SubPath, value: T) -> bool {
        set_field_value(self, field, sub_path, value.into_value())
    }

    /// Append a default element to array `kind` of the record at `sub_path`
    fn add_sub_item(&mut self, kind: FieldId, sub_path: &SubPath) -> Option<usize> {
        insert_sub_item(self, kind, sub_path, None)
    }

    /// Insert a default element at `index` (`index <= len`)
    fn insert_sub_item(&mut self, kind: FieldId, sub_path: &SubPath, index: usize) -> Option<usize> {
        insert_sub_item(self, kind, sub_path, Some(index))
    }

    /// Remove the element addressed by `sub_path`
    fn delete_sub_item(&mut self, sub_path: &SubPath) -> Option<usize> {
        delete_sub_item(self, sub_path)
    }

    fn sub_item_count(&self, kind: FieldId, sub_path: &SubPath) -> Option<usize> {
        sub_item_count(self, kind, sub_path)
    }

    fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Move everything out of `other`, leaving it default
    fn transfer_from(&mut self, other: &mut Self) {
        *self = std::mem::take(other);
    }

    fn asset_path_operation(&mut self, operation: &dyn PathOperation) {
        self.visit_asset_paths(operation);
    }

    fn sub_path_operation(&mut self, operation: &SubPathOperation) {
        self.visit_sub_paths(operation);
    }

    fn write_tua(&self, ctx: &SaveLoadContext<'_>) -> Result<TuaRecord> {
        self.write_record(ctx)
    }

    fn read_tua(&mut self, ctx: &SaveLoadContext<'_>, tua: &TuaRecord) -> Result<()> {
        self.read_record(ctx, tua)
    }
}

/// Object-safe side of the protocol, one level at a time.
///
/// Blanket-implemented for every [`Record`]; navigation across sub-paths is
/// done by the free functions of this module.
pub trait DynRecord: Send + Sync {
    fn record_type_name(&self) -> &'static str;
    fn read_field(&self, field: FieldId) -> Option<Value>;
    fn write_field(&mut self, field: FieldId, value: Value) -> bool;
    fn element(&self, step: SubPathStep) -> Option<&dyn DynRecord>;
    fn element_mut(&mut self, step: SubPathStep) -> Option<&mut dyn DynRecord>;
    fn array_len(&self, kind: FieldId) -> Option<usize>;
    fn insert_element(&mut self, kind: FieldId, index: usize) -> bool;
    fn remove_element(&mut self, kind: FieldId, index: usize) -> bool;
    fn visit_asset_paths(&mut self, operation: &dyn PathOperation);
    fn for_each_asset_path(&self, f: &mut dyn FnMut(&AssetPath));
    fn visit_sub_paths(&mut self, operation: &SubPathOperation);
    fn write_record(&self, ctx: &SaveLoadContext<'_>) -> Result<TuaRecord>;
    fn read_record(&mut self, ctx: &SaveLoadContext<'_>, tua: &TuaRecord) -> Result<()>;
}

impl<R: Record> DynRecord for R {
    fn record_type_name(&self) -> &'static str {
        R::schema().type_name()
    }

    fn read_field(&self, field: FieldId) -> Option<Value> {
        R::schema().scalar(field).map(|scalar| scalar.read(self))
    }

    fn write_field(&mut self, field: FieldId, value: Value) -> bool {
        match R::schema().scalar(field) {
            Some(scalar) => scalar.write(self, value),
            None => false,
        }
    }

    fn element(&self, step: SubPathStep) -> Option<&dyn DynRecord> {
        R::schema().array(step.field)?.element(self, step.index)
    }

    fn element_mut(&mut self, step: SubPathStep) -> Option<&mut dyn DynRecord> {
        R::schema().array(step.field)?.element_mut(self, step.index)
    }

    fn array_len(&self, kind: FieldId) -> Option<usize> {
        R::schema().array(kind).map(|array| array.len(self))
    }

    fn insert_element(&mut self, kind: FieldId, index: usize) -> bool {
        match R::schema().array(kind) {
            Some(array) => array.insert_default(self, index),
            None => false,
        }
    }

    fn remove_element(&mut self, kind: FieldId, index: usize) -> bool {
        match R::schema().array(kind) {
            Some(array) => array.remove(self, index),
            None => false,
        }
    }

    fn visit_asset_paths(&mut self, operation: &dyn PathOperation) {
        for field in R::schema().fields() {
            match &field.access {
                FieldAccess::Scalar(scalar) => scalar.visit_asset_paths(self, operation),
                FieldAccess::Array(array) => {
                    for index in 0..array.len(self) {
                        if let Some(element) = array.element_mut(self, index) {
                            element.visit_asset_paths(operation);
                        }
                    }
                }
            }
        }
    }

    fn for_each_asset_path(&self, f: &mut dyn FnMut(&AssetPath)) {
        for field in R::schema().fields() {
            match &field.access {
                FieldAccess::Scalar(scalar) => scalar.for_each_asset_path(self, f),
                FieldAccess::Array(array) => {
                    for index in 0..array.len(self) {
                        if let Some(element) = array.element(self, index) {
                            element.for_each_asset_path(f);
                        }
                    }
                }
            }
        }
    }

    fn visit_sub_paths(&mut self, operation: &SubPathOperation) {
        for field in R::schema().fields() {
            match &field.access {
                FieldAccess::Scalar(scalar) => scalar.visit_sub_paths(self, operation),
                FieldAccess::Array(array) => {
                    for index in 0..array.len(self) {
                        if let Some(element) = array.element_mut(self, index) {
                            element.visit_sub_paths(operation);
                        }
                    }
                }
            }
        }
    }

    fn write_record(&self, ctx: &SaveLoadContext<'_>) -> Result<TuaRecord> {
        let mut tua = TuaRecord::new();
        for field in R::schema().fields() {
            let value = match &field.access {
                FieldAccess::Scalar(scalar) => scalar.to_tua(self, ctx)?,
                FieldAccess::Array(array) => array.to_tua(self, ctx)?,
            };
            tua.insert(field.name.to_string(), value);
        }
        Ok(tua)
    }

    fn read_record(&mut self, ctx: &SaveLoadContext<'_>, tua: &TuaRecord) -> Result<()> {
        for field in R::schema().fields() {
            // Missing fields keep their default.
            let Some(value) = tua.get(field.name) else {
                continue;
            };
            let status = match &field.access {
                FieldAccess::Scalar(scalar) => scalar.from_tua(self, ctx, value),
                FieldAccess::Array(array) => array.from_tua(self, ctx, value),
            };
            status.map_err(|error| match error {
                AssetError::DeserializationError(reason) => AssetError::MalformedField {
                    field: field.name,
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Record addressed by `sub_path`, `None` for null or out of range paths
pub fn resolve<'a>(record: &'a dyn DynRecord, sub_path: &SubPath) -> Option<&'a dyn DynRecord> {
    if sub_path.is_null() {
        return None;
    }
    let mut current = record;
    for step in sub_path.steps() {
        current = current.element(*step)?;
    }
    Some(current)
}

pub fn resolve_mut<'a>(
    record: &'a mut dyn DynRecord,
    sub_path: &SubPath,
) -> Option<&'a mut dyn DynRecord> {
    if sub_path.is_null() {
        return None;
    }
    let mut current = record;
    for step in sub_path.steps() {
        current = current.element_mut(*step)?;
    }
    Some(current)
}

pub fn get_field_value(record: &dyn DynRecord, field: FieldId, sub_path: &SubPath) -> Option<Value> {
    resolve(record, sub_path)?.read_field(field)
}

pub fn set_field_value(
    record: &mut dyn DynRecord,
    field: FieldId,
    sub_path: &SubPath,
    value: Value,
) -> bool {
    match resolve_mut(record, sub_path) {
        Some(target) => target.write_field(field, value),
        None => false,
    }
}

pub fn sub_item_count(record: &dyn DynRecord, kind: FieldId, sub_path: &SubPath) -> Option<usize> {
    resolve(record, sub_path)?.array_len(kind)
}

/// Insert into array `kind` of the record at `sub_path`; appends when
/// `index` is `None`. Stored element references of the whole record are
/// shifted to keep pointing at the same elements.
pub fn insert_sub_item(
    record: &mut dyn DynRecord,
    kind: FieldId,
    sub_path: &SubPath,
    index: Option<usize>,
) -> Option<usize> {
    let target = resolve_mut(record, sub_path)?;
    let len = target.array_len(kind)?;
    let index = index.unwrap_or(len);
    if !target.insert_element(kind, index) {
        return None;
    }
    if index < len {
        record.visit_sub_paths(&SubPathOperation::Inserted {
            parent: sub_path.clone(),
            field: kind,
            index,
        });
    }
    Some(index)
}

/// Remove the element addressed by `sub_path`.
///
/// Stored element references to the removed element become null, and those
/// to its later siblings are shifted down.
pub fn delete_sub_item(record: &mut dyn DynRecord, sub_path: &SubPath) -> Option<usize> {
    let step = sub_path.last()?;
    let parent = sub_path.parent();
    let target = resolve_mut(record, &parent)?;
    if !target.remove_element(step.field, step.index) {
        return None;
    }
    record.visit_sub_paths(&SubPathOperation::Removed {
        parent,
        field: step.field,
        index: step.index,
    });
    Some(step.index)
}

/// Declare a sub-item record type with its field table.
///
/// ```ignore
/// define_record! {
///     #[derive(Default)]
///     pub struct KeyFrame {
///         TIME = 0 => pub time: f32,
///         COLOR = 1 => pub color: Vec4,
///     }
/// }
/// ```
///
/// Array-valued fields go in a trailing `arrays { ... }` block and hold
/// `Vec<E>` where `E` is itself a record. The macro derives `Debug`, `Clone`
/// and `PartialEq`; `Default` is up to the caller.
#[macro_export]
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $id:ident = $off:literal => $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
        $( arrays {
            $( $(#[$ameta:meta])* $aid:ident = $aoff:literal => $avis:vis $afield:ident : Vec<$aty:ty> ),* $(,)?
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
            $($( $(#[$ameta])* $avis $afield: Vec<$aty>, )*)?
        }

        impl $name {
            $( pub const $id: $crate::schema::FieldId = $crate::schema::FieldId($off); )*
            $($( pub const $aid: $crate::schema::FieldId = $crate::schema::FieldId($aoff); )*)?
        }

        impl $crate::record::Record for $name {
            fn schema() -> &'static $crate::schema::Schema<Self> {
                static SCHEMA: std::sync::OnceLock<$crate::schema::Schema<$name>> =
                    std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::schema::Schema::new(stringify!($name))
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
    };
}
