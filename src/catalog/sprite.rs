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
    /// Rectangle of grid cells taken from an image
    #[derive(Default)]
    pub struct Sprite: 5 {
        IMAGE_PATH = 0 => pub image_path: AssetPath,
        X = 1 => pub x: i32,
        Y = 2 => pub y: i32,
        WIDTH = 3 => pub width: i32,
        HEIGHT = 4 => pub height: i32,
    }
}
