// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Build Support
//!
//! Called from build scripts.  Failures panic, which is how a build script reports them.

use std::{ffi, fs, path::Path, process};

/// Compile every `shaders/**/*.slang` under the calling crate into `assets/shaders/**/*.spv`.
///
/// Without `slangc` on the `PATH` nothing is compiled and cargo prints a warning.  Previously
/// compiled SPIR-V in `assets/` is still used at runtime.
pub fn build_shaders() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR unset");
    let crate_root = Path::new(&manifest_dir);

    let src_root = crate_root.join("shaders");
    let dest_root = crate_root.join("assets/shaders");

    println!("cargo:rerun-if-changed=shaders");

    if !src_root.is_dir() {
        return;
    }

    if process::Command::new("slangc").arg("-v").output().is_err() {
        println!("cargo:warning=slangc not found, shaders in {src_root:?} were not compiled");
        return;
    }

    let slang_ext = ffi::OsStr::new("slang");
    compile_dir(&src_root, &src_root, &dest_root, slang_ext);
}

fn compile_dir(dir: &Path, src_root: &Path, dest_root: &Path, ext: &ffi::OsStr) {
    let mut out_ensured = false;
    let rel = dir.strip_prefix(src_root).expect("shader dir outside source root");
    let out_dir = dest_root.join(rel);

    let entries = fs::read_dir(dir).unwrap_or_else(|e| panic!("reading {dir:?}: {e}"));
    for entry in entries {
        let path = entry.expect("shader dir entry").path();
        if path.is_dir() {
            compile_dir(&path, src_root, dest_root, ext);
        } else if path.extension() == Some(ext) {
            if !out_ensured {
                fs::create_dir_all(&out_dir).unwrap_or_else(|e| panic!("creating {out_dir:?}: {e}"));
                out_ensured = true;
            }
            let stem = path.strip_prefix(src_root).expect("shader outside source root");
            let out = dest_root.join(stem).with_extension("spv");

            // `slangc <input> -target spirv -o <out>`
            let status = process::Command::new("slangc")
                .arg(path.as_os_str())
                .args(["-target", "spirv"])
                .arg("-o")
                .arg(&out)
                .status()
                .unwrap_or_else(|e| panic!("running slangc: {e}"));

            if !status.success() {
                panic!("slangc failed for {path:?}");
            }
        }
    }
}

/// Bake the packaging asset directory into the binary as `HELLO_BUILD_ASSETS_DIR`.
// Packagers set `package.metadata.hello.asset_dir` in the binary's Cargo.toml.
pub fn set_asset_default_dir() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR unset");
    let manifest = Path::new(&manifest_dir).join("Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.toml");

    let cargo = fs::read_to_string(&manifest).unwrap_or_else(|e| panic!("reading {manifest:?}: {e}"));
    let parsed: toml::Value =
        toml::from_str(&cargo).unwrap_or_else(|e| panic!("parsing {manifest:?}: {e}"));

    println!(
        "cargo:rustc-env=HELLO_BUILD_ASSETS_DIR={}",
        asset_dir(&parsed)
    );
}

fn asset_dir(manifest: &toml::Value) -> &str {
    manifest
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("hello"))
        .and_then(|h| h.get("asset_dir"))
        .and_then(|d| d.as_str())
        .unwrap_or("assets")
}
