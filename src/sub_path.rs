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

//! Hierarchical addressing inside an asset.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::schema::FieldId;

/// One level of nesting: element `index` of the array field `field`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(FieldId, usize)", into = "(FieldId, usize)")]
pub struct SubPathStep {
    pub field: FieldId,
    pub index: usize,
}

impl From<(FieldId, usize)> for SubPathStep {
    fn from((field, index): (FieldId, usize)) -> Self {
        Self { field, index }
    }
}

impl From<SubPathStep> for (FieldId, usize) {
    fn from(step: SubPathStep) -> Self {
        (step.field, step.index)
    }
}

/// Location of a record inside an asset.
///
/// The empty path is the asset itself. The null path resolves to nothing and
/// is what element-reference fields hold when they point nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(
    from = "Option<SmallVec<[SubPathStep; 4]>>",
    into = "Option<SmallVec<[SubPathStep; 4]>>"
)]
pub struct SubPath {
    steps: SmallVec<[SubPathStep; 4]>,
    null: bool,
}

impl SubPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn null() -> Self {
        Self {
            steps: SmallVec::new(),
            null: true,
        }
    }

    /// Builder: descend into element `index` of array `field`
    pub fn with(mut self, field: FieldId, index: usize) -> Self {
        self.push(field, index);
        self
    }

    pub fn push(&mut self, field: FieldId, index: usize) {
        if !self.null {
            self.steps.push(SubPathStep { field, index });
        }
    }

    pub fn steps(&self) -> &[SubPathStep] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn is_root(&self) -> bool {
        !self.null && self.steps.is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.null
    }

    pub fn last(&self) -> Option<SubPathStep> {
        self.steps.last().copied()
    }

    /// Path of the record owning the addressed element
    pub fn parent(&self) -> SubPath {
        if self.null || self.steps.is_empty() {
            return Self::null();
        }
        Self {
            steps: self.steps[..self.steps.len() - 1].iter().copied().collect(),
            null: false,
        }
    }

    pub fn starts_with(&self, prefix: &SubPath) -> bool {
        !self.null && !prefix.null && self.steps.starts_with(&prefix.steps)
    }
}

impl From<(FieldId, usize)> for SubPath {
    fn from((field, index): (FieldId, usize)) -> Self {
        Self::root().with(field, index)
    }
}

impl From<Option<SmallVec<[SubPathStep; 4]>>> for SubPath {
    fn from(value: Option<SmallVec<[SubPathStep; 4]>>) -> Self {
        match value {
            Some(steps) => Self { steps, null: false },
            None => Self::null(),
        }
    }
}

impl From<SubPath> for Option<SmallVec<[SubPathStep; 4]>> {
    fn from(value: SubPath) -> Self {
        if value.null {
            None
        } else {
            Some(value.steps)
        }
    }
}

impl fmt::Display for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.null {
            return write!(f, "null");
        }
        if self.steps.is_empty() {
            return write!(f, "/");
        }
        for step in &self.steps {
            write!(f, "/{}[{}]", step.field.0, step.index)?;
        }
        Ok(())
    }
}

/// Keeps stored element references valid across sub-item edits.
///
/// Applied by the asset to every `SubPath` valued field after an element was
/// inserted into or removed from the array `field` of the record at `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubPathOperation {
    Removed {
        parent: SubPath,
        field: FieldId,
        index: usize,
    },
    Inserted {
        parent: SubPath,
        field: FieldId,
        index: usize,
    },
}

impl SubPathOperation {
    pub fn apply(&self, sub_path: &mut SubPath) {
        let (parent, field) = match self {
            SubPathOperation::Removed { parent, field, .. }
            | SubPathOperation::Inserted { parent, field, .. } => (parent, *field),
        };
        let depth = parent.depth();
        if sub_path.depth() <= depth || !sub_path.starts_with(parent) {
            return;
        }
        let step = &mut sub_path.steps[depth];
        if step.field != field {
            return;
        }
        match self {
            SubPathOperation::Removed { index, .. } => {
                if step.index == *index {
                    *sub_path = SubPath::null();
                } else if step.index > *index {
                    step.index -= 1;
                }
            }
            SubPathOperation::Inserted { index, .. } => {
                if step.index >= *index {
                    step.index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERS: FieldId = FieldId(3);
    const QUADS: FieldId = FieldId(1);

    #[test]
    fn test_root_and_null() {
        assert!(SubPath::root().is_root());
        assert!(!SubPath::root().is_null());
        assert!(SubPath::null().is_null());
        assert_ne!(SubPath::root(), SubPath::null());
        assert_eq!(SubPath::null().with(LAYERS, 1), SubPath::null());
    }

    #[test]
    fn test_nested_path() {
        let path = SubPath::root().with(LAYERS, 2).with(QUADS, 7);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.last(), Some(SubPathStep { field: QUADS, index: 7 }));
        assert_eq!(path.parent(), SubPath::from((LAYERS, 2)));
        assert!(path.starts_with(&SubPath::from((LAYERS, 2))));
        assert!(!path.starts_with(&SubPath::from((LAYERS, 1))));
        assert_eq!(path.to_string(), "/3[2]/1[7]");
    }

    #[test]
    fn test_removed_operation() {
        let op = SubPathOperation::Removed {
            parent: SubPath::root(),
            field: LAYERS,
            index: 1,
        };

        let mut before = SubPath::from((LAYERS, 0));
        let mut removed = SubPath::from((LAYERS, 1)).with(QUADS, 4);
        let mut after = SubPath::from((LAYERS, 3)).with(QUADS, 4);
        let mut other = SubPath::from((QUADS, 3));
        op.apply(&mut before);
        op.apply(&mut removed);
        op.apply(&mut after);
        op.apply(&mut other);

        assert_eq!(before, SubPath::from((LAYERS, 0)));
        assert!(removed.is_null());
        assert_eq!(after, SubPath::from((LAYERS, 2)).with(QUADS, 4));
        assert_eq!(other, SubPath::from((QUADS, 3)));
    }

    #[test]
    fn test_inserted_operation_nested() {
        let op = SubPathOperation::Inserted {
            parent: SubPath::from((LAYERS, 2)),
            field: QUADS,
            index: 1,
        };

        let mut shifted = SubPath::from((LAYERS, 2)).with(QUADS, 1);
        let mut kept = SubPath::from((LAYERS, 2)).with(QUADS, 0);
        let mut sibling_layer = SubPath::from((LAYERS, 1)).with(QUADS, 5);
        let mut parent_itself = SubPath::from((LAYERS, 2));
        op.apply(&mut shifted);
        op.apply(&mut kept);
        op.apply(&mut sibling_layer);
        op.apply(&mut parent_itself);

        assert_eq!(shifted, SubPath::from((LAYERS, 2)).with(QUADS, 2));
        assert_eq!(kept, SubPath::from((LAYERS, 2)).with(QUADS, 0));
        assert_eq!(sibling_layer, SubPath::from((LAYERS, 1)).with(QUADS, 5));
        assert_eq!(parent_itself, SubPath::from((LAYERS, 2)));
    }

    #[test]
    fn test_serde_form() {
        let path = SubPath::from((LAYERS, 2)).with(QUADS, 7);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!([[3, 2], [1, 7]]));
        let back: SubPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);

        let json = serde_json::to_value(SubPath::null()).unwrap();
        assert!(json.is_null());
        let back: SubPath = serde_json::from_value(json).unwrap();
        assert!(back.is_null());
    }
}
