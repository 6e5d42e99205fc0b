// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Device
//!
//! `AshProbe` answers selection's questions with real Vulkan queries.  `LogicalDevice` is the
//! device created from the selected physical device.

use std::ffi::{CString, c_char};

use ash::vk;

use crate::prelude::*;
use crate::queue::{QueueFamilies, Queues};
use crate::selection::{DeviceProbe, REQUIRED_DEVICE_EXTENSIONS, SurfaceSupport};
use crate::surface::Surface;

pub struct AshProbe<'a> {
    pub instance: &'a ash::Instance,
    pub surface: &'a Surface,
}

impl DeviceProbe for AshProbe<'_> {
    type Device = vk::PhysicalDevice;

    fn physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, SetupError> {
        unsafe { self.instance.enumerate_physical_devices() }
            .context("failed to enumerate physical devices")
    }

    fn device_name(&self, device: vk::PhysicalDevice) -> String {
        let properties = unsafe { self.instance.get_physical_device_properties(device) };
        properties
            .device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| format!("{device:?}"))
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(device)
        }
    }

    fn supports_present(
        &self,
        device: vk::PhysicalDevice,
        family_index: u32,
    ) -> Result<bool, SetupError> {
        self.surface.supports_present(device, family_index)
    }

    fn extension_names(&self, device: vk::PhysicalDevice) -> Result<Vec<CString>, SetupError> {
        let properties = unsafe { self.instance.enumerate_device_extension_properties(device) }
            .context("failed to enumerate device extensions")?;
        Ok(properties
            .iter()
            .filter_map(|ext| ext.extension_name_as_c_str().ok())
            .map(|name| name.to_owned())
            .collect())
    }

    fn surface_support(&self, device: vk::PhysicalDevice) -> Result<SurfaceSupport, SetupError> {
        self.surface.support(device)
    }
}

pub struct LogicalDevice {
    pub device: ash::Device,
    pub queues: Queues,
}

impl LogicalDevice {
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        families: QueueFamilies,
    ) -> Result<Self, SetupError> {
        let queue_priorities = [1.0];
        let queue_cis = families.queue_cis(&queue_priorities);
        let extension_names: Vec<*const c_char> = REQUIRED_DEVICE_EXTENSIONS
            .iter()
            .map(|name| name.as_ptr())
            .collect();
        let features = vk::PhysicalDeviceFeatures::default();

        let device_ci = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_cis)
            .enabled_extension_names(&extension_names)
            .enabled_features(&features);

        let device = unsafe { instance.create_device(physical_device, &device_ci, None) }
            .context("failed to create logical device")?;
        let queues = Queues::new(&device, families);

        Ok(Self { device, queues })
    }

    pub fn wait_idle(&self) -> Result<(), SetupError> {
        unsafe { self.device.device_wait_idle() }.context("failed to wait for device idle")
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe { self.device.destroy_device(None) };
    }
}
