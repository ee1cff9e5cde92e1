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

//! Error types

use std::fmt;

use crate::path::{AssetPath, AssetTypeId};

/// Asset framework error type
///
/// The value protocol (`get_value`, `set_value`, sub-item edits) never
/// produces these; they come out of the load/save pipeline and the
/// collection.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// Type name found in serialized data is not registered
    UnknownAssetType(String),

    /// Type id is not registered
    UnknownTypeId(AssetTypeId),

    /// A field is present but its serialized shape is wrong
    MalformedField { field: &'static str, reason: String },

    /// A record is not a JSON object
    MalformedRecord(String),

    /// Reference key points outside the loaded package
    UnresolvedReference { type_name: String, key: u32 },

    /// Serialization error
    SerializationError(String),

    /// Deserialization error
    DeserializationError(String),

    /// Asset not found in a collection
    AssetNotFound(AssetPath),

    /// IO error (file operations, etc.)
    IoError(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::UnknownAssetType(name) => write!(f, "Unknown asset type: {name}"),
            AssetError::UnknownTypeId(type_id) => write!(f, "Unknown asset type id: {type_id}"),
            AssetError::MalformedField { field, reason } => {
                write!(f, "Malformed field `{field}`: {reason}")
            }
            AssetError::MalformedRecord(msg) => write!(f, "Malformed record: {msg}"),
            AssetError::UnresolvedReference { type_name, key } => {
                write!(f, "Unresolved reference: {type_name}:{key}")
            }
            AssetError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            AssetError::DeserializationError(msg) => write!(f, "Deserialization error: {msg}"),
            AssetError::AssetNotFound(path) => write!(f, "Asset not found: {path}"),
            AssetError::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::IoError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssetError::UnresolvedReference {
            type_name: "Sprite".to_string(),
            key: 4,
        };
        assert_eq!(err.to_string(), "Unresolved reference: Sprite:4");

        let err = AssetError::MalformedField {
            field: "sprite_path",
            reason: "expected object".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed field `sprite_path`: expected object");
    }
}
