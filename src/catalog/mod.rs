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

//! Built-in asset types

pub mod image;
pub mod line_style;
pub mod map;
pub mod map_layer_quads;
pub mod sprite;

pub use image::Image;
pub use line_style::LineStyle;
pub use map::{Map, MapLayer};
pub use map_layer_quads::{MapLayerQuads, Quad, QuadKeyFrame};
pub use sprite::Sprite;

use crate::registry::AssetRegistry;

/// Register every built-in asset type
pub fn register_all(registry: &mut AssetRegistry) {
    registry
        .register::<Image>()
        .register::<Sprite>()
        .register::<Map>()
        .register::<MapLayerQuads>()
        .register::<LineStyle>();
}
