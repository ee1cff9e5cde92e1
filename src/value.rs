//! Tagged values exchanged by the generic field accessors.

use glam::{Vec2, Vec4};

use crate::operation::PathOperation;
use crate::path::AssetPath;
use crate::sub_path::{SubPath, SubPathOperation};
use crate::tua::SaveLoadContext;

/// Dynamic value storage for field access
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    Text(String),
    Vec2(Vec2),
    Color(Vec4),
    Path(AssetPath),
    SubPath(SubPath),
}

/// Discriminant of [`Value`], declared by each scalar field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Vec2,
    Color,
    Path,
    SubPath,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Color(_) => ValueKind::Color,
            Value::Path(_) => ValueKind::Path,
            Value::SubPath(_) => ValueKind::SubPath,
        }
    }
}

/// A Rust type that can live in a scalar field.
///
/// Conversion to and from [`Value`] is checked: `from_value` returns `None`
/// when the tag does not match, which is what makes `get_value` total and
/// `set_value` all-or-nothing.
pub trait FieldValue: Clone + Send + Sync + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Option<Self>;

    /// Serialized form of the field
    fn to_tua(&self, ctx: &SaveLoadContext<'_>) -> crate::Result<serde_json::Value>;

    /// Parse the serialized form
    fn from_tua(ctx: &SaveLoadContext<'_>, value: &serde_json::Value) -> crate::Result<Self>;

    fn visit_asset_paths(&mut self, _operation: &dyn PathOperation) {}

    fn for_each_asset_path(&self, _f: &mut dyn FnMut(&AssetPath)) {}

    fn visit_sub_paths(&mut self, _operation: &SubPathOperation) {}
}

macro_rules! impl_plain_field_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $t {
                const KIND: ValueKind = ValueKind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn to_tua(&self, _ctx: &SaveLoadContext<'_>) -> crate::Result<serde_json::Value> {
                    serde_json::to_value(self)
                        .map_err(|e| crate::AssetError::SerializationError(e.to_string()))
                }

                fn from_tua(
                    _ctx: &SaveLoadContext<'_>,
                    value: &serde_json::Value,
                ) -> crate::Result<Self> {
                    <$t as serde::Deserialize>::deserialize(value)
                        .map_err(|e| crate::AssetError::DeserializationError(e.to_string()))
                }
            }
        )*
    };
}

impl_plain_field_value!(
    bool => Bool,
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    String => Text,
    Vec2 => Vec2,
    Vec4 => Color,
);

impl FieldValue for AssetPath {
    const KIND: ValueKind = ValueKind::Path;

    fn into_value(self) -> Value {
        Value::Path(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Path(path) => Some(path),
            _ => None,
        }
    }

    fn to_tua(&self, ctx: &SaveLoadContext<'_>) -> crate::Result<serde_json::Value> {
        ctx.path_to_tua(self)
    }

    fn from_tua(ctx: &SaveLoadContext<'_>, value: &serde_json::Value) -> crate::Result<Self> {
        ctx.path_from_tua(value)
    }

    fn visit_asset_paths(&mut self, operation: &dyn PathOperation) {
        operation.apply(self);
    }

    fn for_each_asset_path(&self, f: &mut dyn FnMut(&AssetPath)) {
        f(self);
    }
}

impl FieldValue for SubPath {
    const KIND: ValueKind = ValueKind::SubPath;

    fn into_value(self) -> Value {
        Value::SubPath(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::SubPath(sub_path) => Some(sub_path),
            _ => None,
        }
    }

    fn to_tua(&self, _ctx: &SaveLoadContext<'_>) -> crate::Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| crate::AssetError::SerializationError(e.to_string()))
    }

    fn from_tua(_ctx: &SaveLoadContext<'_>, value: &serde_json::Value) -> crate::Result<Self> {
        <SubPath as serde::Deserialize>::deserialize(value)
            .map_err(|e| crate::AssetError::DeserializationError(e.to_string()))
    }

    fn visit_sub_paths(&mut self, operation: &SubPathOperation) {
        operation.apply(self);
    }
}
