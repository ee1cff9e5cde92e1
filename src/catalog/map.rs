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

use glam::Vec2;

use crate::path::AssetPath;
use crate::{define_asset, define_record};

define_record! {
    /// Entry of a map's layer stack
    pub struct MapLayer {
        PATH = 0 => pub path: AssetPath,
        VISIBLE = 1 => pub visible: bool,
    }
}

impl Default for MapLayer {
    fn default() -> Self {
        Self {
            path: AssetPath::NULL,
            visible: true,
        }
    }
}

define_asset! {
    /// Ordered stack of layers
    #[derive(Default)]
    pub struct Map: 10 {
        CAMERA = 0 => pub camera: Vec2,
    }
    arrays {
        LAYERS = 1 => pub layers: Vec<MapLayer>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MapLayerQuads;
    use crate::operation::{CollectReferences, Remap};
    use crate::record::Record;
    use crate::sub_path::SubPath;

    fn layer(index: usize) -> SubPath {
        SubPath::from((Map::LAYERS, index))
    }

    #[test]
    fn test_layers() {
        let mut map = Map::default();
        for id in 0..3 {
            let index = map.add_sub_item(Map::LAYERS, &SubPath::root()).unwrap();
            assert!(map.get_value(MapLayer::VISIBLE, &layer(index), false));
            assert!(map.set_value(MapLayer::PATH, &layer(index), AssetPath::of::<MapLayerQuads>(id)));
        }
        assert_eq!(map.sub_item_count(Map::LAYERS, &SubPath::root()), Some(3));

        assert_eq!(map.delete_sub_item(&layer(0)), Some(0));
        assert_eq!(
            map.get_value(MapLayer::PATH, &layer(0), AssetPath::NULL),
            AssetPath::of::<MapLayerQuads>(1)
        );
        assert_eq!(map.get_value(MapLayer::PATH, &layer(2), AssetPath::NULL), AssetPath::NULL);
    }

    #[test]
    fn test_layer_references() {
        let mut map = Map::default();
        map.camera = Vec2::new(4.0, -2.0);
        for id in [0, 1, 0] {
            map.layers.push(MapLayer {
                path: AssetPath::of::<MapLayerQuads>(id),
                visible: true,
            });
        }

        map.asset_path_operation(&Remap {
            from: AssetPath::of::<MapLayerQuads>(0),
            to: AssetPath::of::<MapLayerQuads>(6),
        });
        let collect = CollectReferences::new();
        map.asset_path_operation(&collect);
        assert_eq!(
            collect.into_paths(),
            vec![AssetPath::of::<MapLayerQuads>(1), AssetPath::of::<MapLayerQuads>(6)]
        );
        assert_eq!(map.get_value(Map::CAMERA, &SubPath::root(), Vec2::ZERO), Vec2::new(4.0, -2.0));
    }
}
