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

//! Quad layer: free-form textured quads with colour animation.

use glam::{Vec2, Vec4};

use crate::asset::AssetBase;
use crate::path::AssetPath;
use crate::sub_path::SubPath;
use crate::{define_asset, define_record};

define_record! {
    pub struct QuadKeyFrame {
        TIME = 0 => pub time: f32,
        COLOR = 1 => pub color: Vec4,
    }
}

impl Default for QuadKeyFrame {
    fn default() -> Self {
        Self {
            time: 0.0,
            color: Vec4::ONE,
        }
    }
}

define_record! {
    pub struct Quad {
        PIVOT = 0 => pub pivot: Vec2,
        SIZE = 1 => pub size: Vec2,
        ANGLE = 2 => pub angle: f32,
        COLOR = 3 => pub color: Vec4,
        SPRITE_PATH = 4 => pub sprite_path: AssetPath,
    }
    arrays {
        KEYFRAMES = 5 => pub keyframes: Vec<QuadKeyFrame>,
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self {
            pivot: Vec2::ZERO,
            size: Vec2::ONE,
            angle: 0.0,
            color: Vec4::ONE,
            sprite_path: AssetPath::NULL,
            keyframes: Vec::new(),
        }
    }
}

impl Quad {
    /// Colour at `time`, interpolated between the surrounding keyframes
    pub fn color_at(&self, time: f32) -> Vec4 {
        let Some(first) = self.keyframes.first() else {
            return self.color;
        };
        if time <= first.time {
            return first.color;
        }
        for pair in self.keyframes.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if time <= to.time {
                let span = to.time - from.time;
                if span <= f32::EPSILON {
                    return to.color;
                }
                return from.color.lerp(to.color, (time - from.time) / span);
            }
        }
        self.keyframes.last().map_or(self.color, |last| last.color)
    }
}

define_asset! {
    pub struct MapLayerQuads: 12 {
        PARENT_PATH = 0 => pub parent_path: AssetPath,
        IMAGE_PATH = 1 => pub image_path: AssetPath,
        /// Quad selected in the editor, null when none
        FOCUS = 2 => pub focus: SubPath,
    }
    arrays {
        QUADS = 3 => pub quads: Vec<Quad>,
    }
}

impl Default for MapLayerQuads {
    fn default() -> Self {
        Self {
            base: AssetBase::default(),
            parent_path: AssetPath::NULL,
            image_path: AssetPath::NULL,
            focus: SubPath::null(),
            quads: Vec::new(),
        }
    }
}

impl MapLayerQuads {
    /// Sub-path of quad `index`
    pub fn quad_path(index: usize) -> SubPath {
        SubPath::from((Self::QUADS, index))
    }

    /// Sub-path of keyframe `frame` of quad `index`
    pub fn keyframe_path(index: usize, frame: usize) -> SubPath {
        Self::quad_path(index).with(Quad::KEYFRAMES, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Map, Sprite};
    use crate::operation::Invalidate;
    use crate::record::Record;

    fn layer_with_quads(count: usize) -> MapLayerQuads {
        let mut layer = MapLayerQuads::default();
        layer.parent_path = AssetPath::of::<Map>(0);
        for i in 0..count {
            let index = layer
                .add_sub_item(MapLayerQuads::QUADS, &SubPath::root())
                .unwrap();
            layer.set_value(Quad::ANGLE, &MapLayerQuads::quad_path(index), i as f32);
        }
        layer
    }

    #[test]
    fn test_quad_addressing() {
        let mut layer = layer_with_quads(3);
        let third = MapLayerQuads::quad_path(2);
        assert!(layer.set_value(Quad::COLOR, &third, Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(layer.quads[2].color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(layer.get_value(Quad::SIZE, &third, Vec2::ZERO), Vec2::ONE);
        assert_eq!(layer.get_value(Quad::ANGLE, &MapLayerQuads::quad_path(3), -1.0f32), -1.0);
    }

    #[test]
    fn test_keyframes() {
        let mut layer = layer_with_quads(1);
        let quad = MapLayerQuads::quad_path(0);
        for (frame, time) in [0.0f32, 2.0].into_iter().enumerate() {
            assert_eq!(layer.add_sub_item(Quad::KEYFRAMES, &quad), Some(frame));
            let path = MapLayerQuads::keyframe_path(0, frame);
            assert!(layer.set_value(QuadKeyFrame::TIME, &path, time));
        }
        layer.set_value(QuadKeyFrame::COLOR, &MapLayerQuads::keyframe_path(0, 1), Vec4::ZERO);

        assert_eq!(layer.sub_item_count(Quad::KEYFRAMES, &quad), Some(2));
        assert_eq!(layer.quads[0].color_at(1.0), Vec4::splat(0.5));
        assert_eq!(layer.quads[0].color_at(5.0), Vec4::ZERO);
        assert_eq!(Quad::default().color_at(1.0), Vec4::ONE);
    }

    #[test]
    fn test_focus_follows_deletion() {
        let mut layer = layer_with_quads(4);
        assert!(layer.focus.is_null());
        assert!(layer.set_value(MapLayerQuads::FOCUS, &SubPath::root(), MapLayerQuads::quad_path(3)));

        layer.delete_sub_item(&MapLayerQuads::quad_path(1));
        assert_eq!(layer.focus, MapLayerQuads::quad_path(2));
        assert_eq!(layer.get_value(Quad::ANGLE, &layer.focus, 0.0f32), 3.0);

        layer.delete_sub_item(&MapLayerQuads::quad_path(2));
        assert!(layer.focus.is_null());
        assert_eq!(layer.get_value(Quad::ANGLE, &SubPath::null(), -1.0f32), -1.0);
    }

    #[test]
    fn test_nested_sprite_references() {
        let mut layer = layer_with_quads(2);
        let sprite = AssetPath::of::<Sprite>(5);
        layer.set_value(Quad::SPRITE_PATH, &MapLayerQuads::quad_path(1), sprite);

        layer.asset_path_operation(&Invalidate { target: sprite });
        assert!(layer.quads[1].sprite_path.is_null());
        assert_eq!(layer.parent_path, AssetPath::of::<Map>(0));
    }
}
