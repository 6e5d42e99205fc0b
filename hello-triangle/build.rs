// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

fn main() {
    hello_assets::build::set_asset_default_dir();
    hello_assets::build::build_shaders();
}
