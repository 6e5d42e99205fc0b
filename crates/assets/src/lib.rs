// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! Shaders are compiled ahead of time and loaded from an asset directory at runtime.  The build
//! support and runtime loading are feature gated so that build scripts do not pull in runtime
//! dependencies and vice versa.  Use the build feature in build-dependencies and the runtime
//! feature in normal dependencies.

#[cfg(feature = "runtime")]
pub mod assets;
#[cfg(feature = "build")]
pub mod build;
#[cfg(feature = "runtime")]
pub use assets::*;

use std::ffi::OsStr;

mod prelude {
    pub use super::AssetError;
    pub use super::AssetKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Shader,
}

impl AssetKind {
    fn ext(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("spv"),
        }
    }

    fn subdir(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("shaders"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("read failed: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("load spirv failed: {0}")]
    InvalidShader(String),
}
