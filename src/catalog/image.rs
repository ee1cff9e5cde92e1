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

use crate::asset::AssetBase;
use crate::define_asset;

define_asset! {
    /// Texture cut into a grid of cells
    pub struct Image: 3 {
        GRID_WIDTH = 0 => pub grid_width: u32,
        GRID_HEIGHT = 1 => pub grid_height: u32,
        TILING = 2 => pub tiling: bool,
    }
}

impl Default for Image {
    fn default() -> Self {
        Self {
            base: AssetBase::default(),
            grid_width: 1,
            grid_height: 1,
            tiling: false,
        }
    }
}

impl Image {
    /// Number of grid cells
    pub fn cell_count(&self) -> u32 {
        self.grid_width.saturating_mul(self.grid_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::sub_path::SubPath;

    #[test]
    fn test_defaults() {
        let image = Image::default();
        assert_eq!(image.cell_count(), 1);
        assert_eq!(image.get_value(Image::GRID_WIDTH, &SubPath::root(), 0u32), 1);
        assert!(!image.get_value(Image::TILING, &SubPath::root(), true));
    }

    #[test]
    fn test_typed_fields() {
        let mut image = Image::default();
        assert!(image.set_value(Image::GRID_HEIGHT, &SubPath::root(), 8u32));
        assert!(!image.set_value(Image::GRID_HEIGHT, &SubPath::root(), 8i32));
        assert!(image.set_value(Image::TILING, &SubPath::root(), true));
        assert_eq!(image.cell_count(), 8);
        assert!(image.tiling);
    }
}
