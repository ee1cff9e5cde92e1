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

//! Field descriptor tables.
//!
//! Every record type owns one [`Schema`], built once on first use, listing
//! its fields with type-erased accessors. The generic get/set, sub-item,
//! path-visiting and serialization logic all walk this table instead of
//! knowing the concrete layout.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};
use crate::operation::PathOperation;
use crate::path::AssetPath;
use crate::record::{DynRecord, Record};
use crate::sub_path::SubPathOperation;
use crate::tua::SaveLoadContext;
use crate::value::{FieldValue, Value, ValueKind};

/// Identifies one field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub u16);

/// Type-erased access to a scalar field of `R`
pub trait ScalarAccess<R>: Send + Sync {
    fn kind(&self) -> ValueKind;
    fn read(&self, record: &R) -> Value;
    fn write(&self, record: &mut R, value: Value) -> bool;
    fn visit_asset_paths(&self, record: &mut R, operation: &dyn PathOperation);
    fn for_each_asset_path(&self, record: &R, f: &mut dyn FnMut(&AssetPath));
    fn visit_sub_paths(&self, record: &mut R, operation: &SubPathOperation);
    fn to_tua(&self, record: &R, ctx: &SaveLoadContext<'_>) -> Result<serde_json::Value>;
    fn from_tua(
        &self,
        record: &mut R,
        ctx: &SaveLoadContext<'_>,
        value: &serde_json::Value,
    ) -> Result<()>;
}

/// Type-erased access to an array-valued field of `R`
pub trait ArrayAccess<R>: Send + Sync {
    fn element_type(&self) -> &'static str;
    fn len(&self, record: &R) -> usize;
    fn element<'a>(&self, record: &'a R, index: usize) -> Option<&'a dyn DynRecord>;
    fn element_mut<'a>(&self, record: &'a mut R, index: usize) -> Option<&'a mut dyn DynRecord>;
    fn insert_default(&self, record: &mut R, index: usize) -> bool;
    fn remove(&self, record: &mut R, index: usize) -> bool;
    fn to_tua(&self, record: &R, ctx: &SaveLoadContext<'_>) -> Result<serde_json::Value>;
    fn from_tua(
        &self,
        record: &mut R,
        ctx: &SaveLoadContext<'_>,
        value: &serde_json::Value,
    ) -> Result<()>;
}

struct ScalarField<R, V> {
    get: fn(&R) -> &V,
    get_mut: fn(&mut R) -> &mut V,
}

impl<R: 'static, V: FieldValue> ScalarAccess<R> for ScalarField<R, V> {
    fn kind(&self) -> ValueKind {
        V::KIND
    }

    fn read(&self, record: &R) -> Value {
        (self.get)(record).clone().into_value()
    }

    fn write(&self, record: &mut R, value: Value) -> bool {
        match V::from_value(value) {
            Some(value) => {
                *(self.get_mut)(record) = value;
                true
            }
            None => false,
        }
    }

    fn visit_asset_paths(&self, record: &mut R, operation: &dyn PathOperation) {
        FieldValue::visit_asset_paths((self.get_mut)(record), operation);
    }

    fn for_each_asset_path(&self, record: &R, f: &mut dyn FnMut(&AssetPath)) {
        FieldValue::for_each_asset_path((self.get)(record), f);
    }

    fn visit_sub_paths(&self, record: &mut R, operation: &SubPathOperation) {
        FieldValue::visit_sub_paths((self.get_mut)(record), operation);
    }

    fn to_tua(&self, record: &R, ctx: &SaveLoadContext<'_>) -> Result<serde_json::Value> {
        (self.get)(record).to_tua(ctx)
    }

    fn from_tua(
        &self,
        record: &mut R,
        ctx: &SaveLoadContext<'_>,
        value: &serde_json::Value,
    ) -> Result<()> {
        *(self.get_mut)(record) = V::from_tua(ctx, value)?;
        Ok(())
    }
}

struct ArrayField<R, E> {
    get: fn(&R) -> &Vec<E>,
    get_mut: fn(&mut R) -> &mut Vec<E>,
}

impl<R: 'static, E: Record> ArrayAccess<R> for ArrayField<R, E> {
    fn element_type(&self) -> &'static str {
        E::schema().type_name()
    }

    fn len(&self, record: &R) -> usize {
        (self.get)(record).len()
    }

    fn element<'a>(&self, record: &'a R, index: usize) -> Option<&'a dyn DynRecord> {
        (self.get)(record)
            .get(index)
            .map(|element| element as &dyn DynRecord)
    }

    fn element_mut<'a>(&self, record: &'a mut R, index: usize) -> Option<&'a mut dyn DynRecord> {
        (self.get_mut)(record)
            .get_mut(index)
            .map(|element| element as &mut dyn DynRecord)
    }

    fn insert_default(&self, record: &mut R, index: usize) -> bool {
        let elements = (self.get_mut)(record);
        if index > elements.len() {
            return false;
        }
        elements.insert(index, E::default());
        true
    }

    fn remove(&self, record: &mut R, index: usize) -> bool {
        let elements = (self.get_mut)(record);
        if index >= elements.len() {
            return false;
        }
        elements.remove(index);
        true
    }

    fn to_tua(&self, record: &R, ctx: &SaveLoadContext<'_>) -> Result<serde_json::Value> {
        let elements = (self.get)(record)
            .iter()
            .map(|element| element.write_tua(ctx).map(serde_json::Value::Object))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::Value::Array(elements))
    }

    fn from_tua(
        &self,
        record: &mut R,
        ctx: &SaveLoadContext<'_>,
        value: &serde_json::Value,
    ) -> Result<()> {
        let items = value.as_array().ok_or_else(|| {
            AssetError::DeserializationError(format!(
                "expected an array of `{}` records",
                self.element_type()
            ))
        })?;
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            let object = item.as_object().ok_or_else(|| {
                AssetError::DeserializationError(format!(
                    "expected a `{}` record object",
                    self.element_type()
                ))
            })?;
            let mut element = E::default();
            element.read_tua(ctx, object)?;
            elements.push(element);
        }
        *(self.get_mut)(record) = elements;
        Ok(())
    }
}

pub enum FieldAccess<R> {
    Scalar(Box<dyn ScalarAccess<R>>),
    Array(Box<dyn ArrayAccess<R>>),
}

/// Descriptor of one field
pub struct FieldDescriptor<R> {
    pub id: FieldId,
    pub name: &'static str,
    pub access: FieldAccess<R>,
}

/// Descriptor table of a record type
pub struct Schema<R> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<R>>,
    index: AHashMap<FieldId, usize>,
}

impl<R: 'static> Schema<R> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Add a scalar field
    pub fn with_scalar<V: FieldValue>(
        self,
        id: FieldId,
        name: &'static str,
        get: fn(&R) -> &V,
        get_mut: fn(&mut R) -> &mut V,
    ) -> Self {
        self.with_field(FieldDescriptor {
            id,
            name,
            access: FieldAccess::Scalar(Box::new(ScalarField { get, get_mut })),
        })
    }

    /// Add an array-valued field whose elements are records of type `E`
    pub fn with_array<E: Record>(
        self,
        id: FieldId,
        name: &'static str,
        get: fn(&R) -> &Vec<E>,
        get_mut: fn(&mut R) -> &mut Vec<E>,
    ) -> Self {
        self.with_field(FieldDescriptor {
            id,
            name,
            access: FieldAccess::Array(Box::new(ArrayField { get, get_mut })),
        })
    }

    fn with_field(mut self, descriptor: FieldDescriptor<R>) -> Self {
        assert!(
            !self.index.contains_key(&descriptor.id),
            "duplicate field id {} in `{}`",
            descriptor.id.0,
            self.type_name
        );
        self.index.insert(descriptor.id, self.fields.len());
        self.fields.push(descriptor);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldDescriptor<R>> {
        self.index.get(&id).map(|&position| &self.fields[position])
    }

    pub fn by_name(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn scalar(&self, id: FieldId) -> Option<&dyn ScalarAccess<R>> {
        match &self.get(id)?.access {
            FieldAccess::Scalar(scalar) => Some(scalar.as_ref()),
            FieldAccess::Array(_) => None,
        }
    }

    pub fn array(&self, id: FieldId) -> Option<&dyn ArrayAccess<R>> {
        match &self.get(id)?.access {
            FieldAccess::Array(array) => Some(array.as_ref()),
            FieldAccess::Scalar(_) => None,
        }
    }
}
