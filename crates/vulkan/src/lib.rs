// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vulkan
//!
//! Everything needed to get one triangle on screen, in the order it has to happen:
//!
//! - `Instance` (+ optional validation `DebugMessenger`)
//! - `Surface`
//! - **Selection**: the first physical device that can draw and present to the surface
//! - `LogicalDevice` & `Queues`
//! - `Swapchain` & image views
//! - `RenderPass`, `GraphicsPipeline`, `Framebuffers`
//! - `Commands` & `FrameSync`
//!
//! `Renderer` owns all of the above.  Each resource wrapper releases its handle on drop, and the
//! renderer holds them so that they drop in reverse creation order.  If construction fails part way
//! through, whatever was already created is released the same way.

pub mod command;
pub mod debug;
pub mod device;
pub mod framebuffer;
pub mod instance;
pub mod pipeline;
pub mod queue;
pub mod render_pass;
pub mod renderer;
pub mod selection;
pub mod surface;
pub mod swapchain;
pub mod sync;

use ash::vk;

pub mod prelude {
    pub use super::{SetupError, VkResultExt};
    pub use crate::renderer::{Renderer, RendererConfig};
}

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("failed to find GPUs with Vulkan support")]
    NoDeviceFound,

    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,

    #[error("validation layers requested, but not available: {0}")]
    MissingValidationLayer(String),

    #[error("required instance extension not available: {0}")]
    MissingInstanceExtension(String),

    #[error("{call}: {result}")]
    Vulkan {
        call: &'static str,
        result: vk::Result,
    },

    #[error("failed to load Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("shader: {0}")]
    Asset(#[from] hello_assets::AssetError),

    #[error("window: {0}")]
    Window(String),
}

impl From<raw_window_handle::HandleError> for SetupError {
    fn from(e: raw_window_handle::HandleError) -> Self {
        SetupError::Window(e.to_string())
    }
}

/// Attach a description of the failed call to a raw `vk::Result`.
pub trait VkResultExt<T> {
    fn context(self, call: &'static str) -> Result<T, SetupError>;
}

impl<T> VkResultExt<T> for Result<T, vk::Result> {
    fn context(self, call: &'static str) -> Result<T, SetupError> {
        self.map_err(|result| SetupError::Vulkan { call, result })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_context_names_failed_call() {
        let failed: Result<(), vk::Result> = Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        let err = failed.context("failed to create instance").unwrap_err();
        assert!(matches!(
            err,
            SetupError::Vulkan {
                call: "failed to create instance",
                result: vk::Result::ERROR_INITIALIZATION_FAILED
            }
        ));
        assert!(err.to_string().starts_with("failed to create instance: "));
    }

    #[test]
    fn test_selection_errors_describe_failure() {
        assert_eq!(
            SetupError::NoSuitableDevice.to_string(),
            "failed to find a suitable GPU"
        );
        assert_eq!(
            SetupError::NoDeviceFound.to_string(),
            "failed to find GPUs with Vulkan support"
        );
    }
}
