// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation layer output, forwarded to `tracing` under the `vulkan` target.

use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};

use ash::vk;
use tracing::{debug, error, info, warn};

use crate::prelude::*;

static VALIDATION_ERRORS: AtomicUsize = AtomicUsize::new(0);

/// Error severity messages received since process start, across all instances.
pub fn validation_error_count() -> usize {
    VALIDATION_ERRORS.load(Ordering::Relaxed)
}

pub fn messenger_ci() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
}

unsafe extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    kind: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let message = unsafe { data.as_ref().and_then(|d| d.message_as_c_str()) }
        .map(|m| m.to_string_lossy())
        .unwrap_or_default();

    match severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            VALIDATION_ERRORS.fetch_add(1, Ordering::Relaxed);
            error!(target: "vulkan", ?kind, "{message}")
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            warn!(target: "vulkan", ?kind, "{message}")
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => info!(target: "vulkan", ?kind, "{message}"),
        _ => debug!(target: "vulkan", ?kind, "{message}"),
    }

    // The call that triggered the message is never aborted.
    vk::FALSE
}

/// The messenger that outlives instance creation.  Creation and destruction of the instance itself
/// are covered by chaining `messenger_ci` into the instance create info.
pub struct DebugMessenger {
    loader: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    pub fn new(entry: &ash::Entry, instance: &ash::Instance) -> Result<Self, SetupError> {
        let loader = ash::ext::debug_utils::Instance::new(entry, instance);
        let messenger = unsafe { loader.create_debug_utils_messenger(&messenger_ci(), None) }
            .context("failed to set up debug messenger")?;
        Ok(Self { loader, messenger })
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        unsafe {
            self.loader
                .destroy_debug_utils_messenger(self.messenger, None);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn deliver(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> vk::Bool32 {
        let data = vk::DebugUtilsMessengerCallbackDataEXT::default()
            .message(c"VUID-vkQueueSubmit-pSignalSemaphores-00067");
        unsafe {
            debug_callback(
                severity,
                vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
                &data,
                std::ptr::null_mut(),
            )
        }
    }

    #[test]
    fn test_errors_are_counted() {
        let before = validation_error_count();
        assert_eq!(
            deliver(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR),
            vk::FALSE
        );
        assert!(validation_error_count() > before);
    }
}
