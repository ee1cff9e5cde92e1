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

use crate::define_asset;
use crate::path::AssetPath;

define_asset! {
    /// Stroke drawn with a sprite
    #[derive(Default)]
    pub struct LineStyle: 28 {
        SPRITE_PATH = 0 => pub sprite_path: AssetPath,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, NAME};
    use crate::catalog::Sprite;
    use crate::record::Record;
    use crate::schema::FieldId;
    use crate::sub_path::SubPath;

    #[test]
    fn test_layout() {
        assert_eq!(LineStyle::TYPE_ID.0, 28);
        assert_eq!(LineStyle::SPRITE_PATH, FieldId(NAME.0 + 1));
        let names: Vec<_> = LineStyle::schema().fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["name", "sprite_path"]);
    }

    #[test]
    fn test_sprite_path_value() {
        let mut style = LineStyle::default();
        let sprite = AssetPath::of::<Sprite>(5);
        assert!(style.set_value(LineStyle::SPRITE_PATH, &SubPath::root(), sprite));
        assert_eq!(
            style.get_value(LineStyle::SPRITE_PATH, &SubPath::root(), AssetPath::NULL),
            sprite
        );
        assert_eq!(style.sub_item_count(LineStyle::SPRITE_PATH, &SubPath::root()), None);
    }
}
