// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! `AssetDirs` is the list of directories searched for assets.  Build it once and reuse it for a
//! batch of lookups.
//!
//! ## Precedence Rules
//!
//! - On **debug builds**:
//!
//!   1. `HELLO_ASSETS_DIR`, for overriding anything.
//!   2. The `assets` folder next to the running crate's manifest (`CARGO_MANIFEST_DIR`).
//!
//! - On **release builds**:
//!
//!   1. `HELLO_ASSETS_DIR`
//!   2. The user's local data directory.
//!   3. The packaging directory baked in at build time through `HELLO_BUILD_ASSETS_DIR`, which the
//!      build script takes from `package.metadata.hello.asset_dir`.
//!   4. The system data directory.
//!
//! `HELLO_ASSETS_DIR` and `HELLO_BUILD_ASSETS_DIR` point directly at an assets root, the folder
//! containing `shaders/`.

use std::path::PathBuf;

use tracing::warn;

use crate::prelude::*;

/// Checked asset roots, in search order.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    search_paths: Vec<PathBuf>,
}

const DEFAULT_ASSET_DIR: Option<&str> = option_env!("HELLO_BUILD_ASSETS_DIR");

impl AssetDirs {
    /// Checks asset search directories once on construction.
    pub fn new() -> Self {
        let mut search_paths = Vec::with_capacity(4);

        let as_assets_root = |p: PathBuf| -> Option<PathBuf> {
            p.canonicalize().ok().filter(|p| p.is_dir())
        };

        // Treat the given path as a parent containing an `assets/` subdir.
        let with_assets_subdir = |p: PathBuf| as_assets_root(p.join("assets"));

        if let Ok(raw) = std::env::var("HELLO_ASSETS_DIR") {
            match as_assets_root(PathBuf::from(&raw)) {
                Some(path) => search_paths.push(path),
                None => warn!("invalid HELLO_ASSETS_DIR (path not found): {raw}"),
            }
        }

        if cfg!(debug_assertions) {
            search_paths.extend(
                std::env::var("CARGO_MANIFEST_DIR")
                    .ok()
                    .map(PathBuf::from)
                    .and_then(with_assets_subdir),
            );
        } else {
            search_paths.extend(dirs::data_local_dir().and_then(with_assets_subdir));
            search_paths.extend(
                DEFAULT_ASSET_DIR
                    .map(PathBuf::from)
                    .and_then(as_assets_root),
            );
            search_paths.extend(dirs::data_dir().and_then(with_assets_subdir));
        }

        AssetDirs { search_paths }
    }

    /// Search only `roots`, in order.  Roots are taken as given.
    pub fn with_roots(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        AssetDirs {
            search_paths: roots.into_iter().collect(),
        }
    }

    /// Roots in the order they are searched.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First existing file for `name` of `kind` across the search paths.
    pub fn find(&self, name: &str, kind: AssetKind) -> Option<PathBuf> {
        let mut file = PathBuf::from(kind.subdir()).join(name);
        file.set_extension(kind.ext());

        let found = self
            .search_paths
            .iter()
            .map(|root| root.join(&file))
            .find(|candidate| candidate.is_file());

        if found.is_none() {
            warn!("{kind:?} {name} not found.");
            self.search_paths.iter().for_each(|root| {
                warn!("  checked: {:?}", root.join(&file));
            });
        }
        found
    }

    pub fn find_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        let path = self
            .find(name, kind)
            .ok_or_else(|| AssetError::NotFound(name.to_owned()))?;
        Ok(std::fs::read(path)?)
    }

    /// Read a whole SPIR-V module as words.
    pub fn find_shader(&self, name: &str) -> Result<Vec<u32>, AssetError> {
        let bytes = self.find_bytes(name, AssetKind::Shader)?;
        spirv_words(&bytes)
    }
}

impl Default for AssetDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// SPIR-V is a stream of 32-bit words in host byte order.
pub fn spirv_words(bytes: &[u8]) -> Result<Vec<u32>, AssetError> {
    if bytes.len() % size_of::<u32>() != 0 {
        return Err(AssetError::InvalidShader(format!(
            "SPIR-V length not multiple of 4: {} bytes",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(size_of::<u32>())
        .map(|word| u32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    /// A scratch asset root unique to one test.
    fn scratch_root(test: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "hello-assets-{}-{test}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("shaders/triangle")).unwrap();
        root
    }

    #[test]
    fn test_find_shader_words() {
        let root = scratch_root("words");
        let words: [u32; 2] = [0x0723_0203, 0x0001_0000];
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        std::fs::write(root.join("shaders/triangle/vertex.spv"), bytes).unwrap();

        let dirs = AssetDirs::with_roots([root.clone()]);
        assert_eq!(dirs.find_shader("triangle/vertex").unwrap(), words.to_vec());
        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_find_shader_bad_length() {
        let root = scratch_root("bad-length");
        std::fs::write(root.join("shaders/triangle/fragment.spv"), [1u8, 2, 3]).unwrap();

        let dirs = AssetDirs::with_roots([root.clone()]);
        assert!(matches!(
            dirs.find_shader("triangle/fragment"),
            Err(AssetError::InvalidShader(_))
        ));
        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_find_shader_missing() {
        let dirs = AssetDirs::with_roots([std::env::temp_dir().join("hello-assets-nowhere")]);
        assert!(matches!(
            dirs.find_shader("triangle/vertex"),
            Err(AssetError::NotFound(name)) if name == "triangle/vertex"
        ));
    }

    #[test]
    fn test_search_order() {
        let first = scratch_root("order-first");
        let second = scratch_root("order-second");
        std::fs::write(second.join("shaders/triangle/vertex.spv"), [0u8; 4]).unwrap();
        std::fs::write(first.join("shaders/triangle/vertex.spv"), [0u8; 8]).unwrap();

        let dirs = AssetDirs::with_roots([first.clone(), second.clone()]);
        assert_eq!(dirs.search_paths(), [first.clone(), second.clone()]);
        assert_eq!(
            dirs.find("triangle/vertex", AssetKind::Shader).unwrap(),
            first.join("shaders/triangle/vertex.spv")
        );
        assert_eq!(dirs.find_shader("triangle/vertex").unwrap().len(), 2);

        std::fs::remove_dir_all(first).unwrap();
        std::fs::remove_dir_all(second).unwrap();
    }

    #[test]
    fn test_spirv_words_empty() {
        assert!(spirv_words(&[]).unwrap().is_empty());
    }
}
