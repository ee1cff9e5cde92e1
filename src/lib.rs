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

//! TUA Assets - typed asset storage with referential maintenance
//!
//! Asset types are declared once with [`define_asset!`] and get a uniform
//! field protocol (get/set by field id and sub-path, sub-item insertion and
//! deletion), path rewriting across a whole [`AssetCollection`], and JSON
//! load/save through [`TuaPackage`].

pub mod asset;
pub mod catalog;
pub mod collection;
pub mod error;
pub mod operation;
pub mod path;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod schema;
pub mod sub_path;
pub mod tua;
pub mod value;

pub use asset::*;
pub use collection::*;
pub use error::*;
pub use operation::*;
pub use path::*;
pub use record::{DynRecord, Record};
pub use registry::*;
pub use schema::{FieldDescriptor, FieldId, Schema};
pub use sub_path::*;
pub use tua::*;
pub use value::*;
