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

//! Typed asset references.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;

/// Statically assigned per concrete asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetTypeId(pub u16);

impl AssetTypeId {
    /// Reserved for the null path
    pub const NONE: AssetTypeId = AssetTypeId(u16::MAX);
}

impl fmt::Display for AssetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const NULL_ID: u32 = u32::MAX;

/// Reference to an asset instance by `(type, id)`.
///
/// A path never owns its target. Ids are positional inside a collection, so
/// removing or reordering assets invalidates paths unless a
/// [`PathOperation`](crate::operation::PathOperation) pass rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath {
    type_id: AssetTypeId,
    id: u32,
}

impl AssetPath {
    /// The "no reference" value
    pub const NULL: AssetPath = AssetPath {
        type_id: AssetTypeId::NONE,
        id: NULL_ID,
    };

    /// Create a path; reserved values collapse to [`AssetPath::NULL`]
    pub fn new(type_id: AssetTypeId, id: u32) -> Self {
        if type_id == AssetTypeId::NONE || id == NULL_ID {
            Self::NULL
        } else {
            Self { type_id, id }
        }
    }

    /// Path to instance `id` of asset type `A`
    pub fn of<A: Asset>(id: u32) -> Self {
        Self::new(A::TYPE_ID, id)
    }

    pub fn type_id(&self) -> AssetTypeId {
        self.type_id
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    pub fn is_type<A: Asset>(&self) -> bool {
        !self.is_null() && self.type_id == A::TYPE_ID
    }

    /// Same type, different instance
    pub fn with_id(&self, id: u32) -> Self {
        if self.is_null() {
            Self::NULL
        } else {
            Self::new(self.type_id, id)
        }
    }
}

impl Default for AssetPath {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}:{}", self.type_id, self.id)
        }
    }
}
