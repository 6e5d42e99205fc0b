// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::instance::Instance;
use crate::prelude::*;
use crate::selection::SurfaceSupport;

/// The window's drawable area as Vulkan sees it.  Must be dropped before the window it was made
/// from.
pub struct Surface {
    pub loader: ash::khr::surface::Instance,
    pub surface: vk::SurfaceKHR,
}

impl Surface {
    pub fn new(
        instance: &Instance,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self, SetupError> {
        let surface = unsafe {
            ash_window::create_surface(&instance.entry, &instance.instance, display, window, None)
        }
        .context("failed to create window surface")?;
        let loader = ash::khr::surface::Instance::new(&instance.entry, &instance.instance);

        Ok(Self { loader, surface })
    }

    pub fn supports_present(
        &self,
        physical_device: vk::PhysicalDevice,
        family_index: u32,
    ) -> Result<bool, SetupError> {
        unsafe {
            self.loader.get_physical_device_surface_support(
                physical_device,
                family_index,
                self.surface,
            )
        }
        .context("failed to query surface support")
    }

    pub fn support(&self, physical_device: vk::PhysicalDevice) -> Result<SurfaceSupport, SetupError> {
        unsafe {
            Ok(SurfaceSupport {
                capabilities: self
                    .loader
                    .get_physical_device_surface_capabilities(physical_device, self.surface)
                    .context("failed to query surface capabilities")?,
                formats: self
                    .loader
                    .get_physical_device_surface_formats(physical_device, self.surface)
                    .context("failed to query surface formats")?,
                present_modes: self
                    .loader
                    .get_physical_device_surface_present_modes(physical_device, self.surface)
                    .context("failed to query present modes")?,
            })
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe { self.loader.destroy_surface(self.surface, None) };
    }
}
