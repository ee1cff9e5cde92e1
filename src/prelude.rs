//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use tua_assets::prelude::*;
//! ```

pub use crate::asset::{Asset, AssetBase, ErasedAsset, NAME};
pub use crate::catalog::{Image, LineStyle, Map, MapLayer, MapLayerQuads, Quad, QuadKeyFrame, Sprite};
pub use crate::collection::AssetCollection;
pub use crate::error::{AssetError, Result};
pub use crate::operation::{Invalidate, PathOperation, Remap, RemapTable};
pub use crate::path::{AssetPath, AssetTypeId};
pub use crate::record::{DynRecord, Record};
pub use crate::registry::AssetRegistry;
pub use crate::schema::FieldId;
pub use crate::sub_path::SubPath;
pub use crate::tua::{load_package, save_package, LoadOptions, TuaPackage};
pub use crate::{define_asset, define_record};
