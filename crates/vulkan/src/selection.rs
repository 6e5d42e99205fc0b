// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Selection
//!
//! Pick the first physical device that can draw to and present on our surface, then derive the
//! swapchain configuration from what that device reports.  There is no ranking.  The first device
//! passing every check wins and nothing after it is looked at.
//!
//! The queries go through `DeviceProbe` so that all of the decisions here can be exercised with
//! made-up devices.  `crate::device::AshProbe` is the real implementation.

use std::collections::HashSet;
use std::ffi::{CStr, CString};

use ash::vk;
use tracing::{debug, info};

use crate::prelude::*;
use crate::queue::{ImageSharing, QueueFamilies, QueueFamilyIndices};

/// Device extensions that must be present.  Missing any of them rejects the device.
pub const REQUIRED_DEVICE_EXTENSIONS: [&CStr; 1] = [vk::KHR_SWAPCHAIN_NAME];

/// The format we would like for swapchain images.
pub const PREFERRED_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_SRGB,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// Everything selection needs to ask about a device with respect to one surface.
pub trait DeviceProbe {
    type Device: Copy + std::fmt::Debug;

    fn physical_devices(&self) -> Result<Vec<Self::Device>, SetupError>;

    /// Human readable name, only used for logging.
    fn device_name(&self, device: Self::Device) -> String;

    fn queue_families(&self, device: Self::Device) -> Vec<vk::QueueFamilyProperties>;

    fn supports_present(&self, device: Self::Device, family_index: u32)
    -> Result<bool, SetupError>;

    fn extension_names(&self, device: Self::Device) -> Result<Vec<CString>, SetupError>;

    fn surface_support(&self, device: Self::Device) -> Result<SurfaceSupport, SetupError>;
}

/// What a device reports about presenting to the surface.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

/// Why a device was passed over.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Unsuitable {
    #[error("no graphics queue family")]
    NoGraphicsQueue,
    #[error("no queue family can present to the surface")]
    NoPresentQueue,
    #[error("missing device extensions: {0:?}")]
    MissingExtensions(Vec<String>),
    #[error("no surface formats")]
    NoSurfaceFormats,
    #[error("no present modes")]
    NoPresentModes,
}

/// The accepted device along with what was learned about it while checking.
#[derive(Clone, Debug)]
pub struct SelectedDevice<D> {
    pub device: D,
    pub families: QueueFamilies,
    pub support: SurfaceSupport,
}

/// Return the first suitable device in enumeration order.
pub fn select_device<P: DeviceProbe>(probe: &P) -> Result<SelectedDevice<P::Device>, SetupError> {
    let devices = probe.physical_devices()?;
    if devices.is_empty() {
        return Err(SetupError::NoDeviceFound);
    }

    for device in devices {
        match check_device(probe, device)? {
            Ok(selected) => {
                info!(
                    device = %probe.device_name(device),
                    graphics_family = selected.families.graphics,
                    present_family = selected.families.present,
                    "selected physical device"
                );
                return Ok(selected);
            }
            Err(reason) => {
                debug!(device = %probe.device_name(device), %reason, "device unsuitable");
            }
        }
    }

    Err(SetupError::NoSuitableDevice)
}

/// Run every suitability check against one device.  The outer error is a failed query, the inner
/// one the reason the device does not qualify.
pub fn check_device<P: DeviceProbe>(
    probe: &P,
    device: P::Device,
) -> Result<Result<SelectedDevice<P::Device>, Unsuitable>, SetupError> {
    let indices = QueueFamilyIndices::find(probe, device)?;
    let families = match indices.complete() {
        Some(families) => families,
        None if indices.graphics.is_none() => return Ok(Err(Unsuitable::NoGraphicsQueue)),
        None => return Ok(Err(Unsuitable::NoPresentQueue)),
    };

    let missing = missing_extensions(&probe.extension_names(device)?);
    if !missing.is_empty() {
        return Ok(Err(Unsuitable::MissingExtensions(missing)));
    }

    let support = probe.surface_support(device)?;
    if support.formats.is_empty() {
        return Ok(Err(Unsuitable::NoSurfaceFormats));
    }
    if support.present_modes.is_empty() {
        return Ok(Err(Unsuitable::NoPresentModes));
    }

    Ok(Ok(SelectedDevice {
        device,
        families,
        support,
    }))
}

/// Required extensions absent from `available`.
pub fn missing_extensions(available: &[CString]) -> Vec<String> {
    let available: HashSet<&CStr> = available.iter().map(CString::as_c_str).collect();
    REQUIRED_DEVICE_EXTENSIONS
        .iter()
        .filter(|required| !available.contains(*required))
        .map(|missing| missing.to_string_lossy().into_owned())
        .collect()
}

/// The preferred sRGB format if offered, otherwise whatever comes first.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| {
            f.format == PREFERRED_SURFACE_FORMAT.format
                && f.color_space == PREFERRED_SURFACE_FORMAT.color_space
        })
        .or_else(|| formats.first())
        .copied()
}

/// MAILBOX if offered.  FIFO is always available.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    modes
        .iter()
        .copied()
        .find(|mode| *mode == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// A current extent of `u32::MAX` means the surface size follows the swapchain, so we pick the
/// requested window size within the reported bounds.
pub fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, requested: vk::Extent2D) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        return caps.current_extent;
    }

    // NOTE not u32::clamp, which panics if a driver reports min > max.
    let clamp = |value: u32, min: u32, max: u32| value.max(min).min(max);
    vk::Extent2D {
        width: clamp(
            requested.width,
            caps.min_image_extent.width,
            caps.max_image_extent.width,
        ),
        height: clamp(
            requested.height,
            caps.min_image_extent.height,
            caps.max_image_extent.height,
        ),
    }
}

/// One more than the minimum so we are not waiting on the presentation engine.  A maximum of zero
/// means no maximum.
pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = caps.min_image_count.saturating_add(1);
    if caps.max_image_count > 0 {
        count.min(caps.max_image_count)
    } else {
        count
    }
}

pub fn choose_composite_alpha(caps: &vk::SurfaceCapabilitiesKHR) -> vk::CompositeAlphaFlagsKHR {
    [
        vk::CompositeAlphaFlagsKHR::OPAQUE,
        vk::CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
        vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED,
    ]
    .into_iter()
    .find(|alpha| caps.supported_composite_alpha.contains(*alpha))
    .unwrap_or(vk::CompositeAlphaFlagsKHR::INHERIT)
}

/// Swapchain parameters derived from a selected device.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceConfig {
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    pub composite_alpha: vk::CompositeAlphaFlagsKHR,
    pub sharing: ImageSharing,
}

impl SurfaceConfig {
    pub fn choose<D>(
        selected: &SelectedDevice<D>,
        requested: vk::Extent2D,
    ) -> Result<Self, SetupError> {
        let support = &selected.support;
        let caps = &support.capabilities;
        let format =
            choose_surface_format(&support.formats).ok_or(SetupError::NoSuitableDevice)?;

        Ok(SurfaceConfig {
            format,
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(caps, requested),
            image_count: choose_image_count(caps),
            pre_transform: caps.current_transform,
            composite_alpha: choose_composite_alpha(caps),
            sharing: selected.families.image_sharing(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_probe {
    //! Devices made of plain data.  `Device` is the index into the device list.

    use std::cell::RefCell;

    use super::*;

    pub struct FakeDevice {
        pub families: Vec<(vk::QueueFlags, bool)>,
        pub extensions: Vec<CString>,
        pub support: SurfaceSupport,
    }

    impl FakeDevice {
        /// One family doing everything, the swapchain extension, one format, FIFO.
        pub fn suitable() -> Self {
            Self::with_families(vec![(vk::QueueFlags::GRAPHICS, true)])
        }

        pub fn with_families(families: Vec<(vk::QueueFlags, bool)>) -> Self {
            FakeDevice {
                families,
                extensions: vec![vk::KHR_SWAPCHAIN_NAME.to_owned()],
                support: SurfaceSupport {
                    capabilities: vk::SurfaceCapabilitiesKHR {
                        min_image_count: 2,
                        current_extent: vk::Extent2D {
                            width: 800,
                            height: 600,
                        },
                        ..Default::default()
                    },
                    formats: vec![PREFERRED_SURFACE_FORMAT],
                    present_modes: vec![vk::PresentModeKHR::FIFO],
                },
            }
        }

        pub fn extensions(mut self, extensions: Vec<CString>) -> Self {
            self.extensions = extensions;
            self
        }

        pub fn formats(mut self, formats: Vec<vk::SurfaceFormatKHR>) -> Self {
            self.support.formats = formats;
            self
        }

        pub fn present_modes(mut self, modes: Vec<vk::PresentModeKHR>) -> Self {
            self.support.present_modes = modes;
            self
        }
    }

    pub struct FakeProbe {
        devices: Vec<FakeDevice>,
        present_queries: RefCell<Vec<(usize, u32)>>,
        support_queries: RefCell<Vec<usize>>,
    }

    impl FakeProbe {
        pub fn new(devices: Vec<FakeDevice>) -> Self {
            FakeProbe {
                devices,
                present_queries: RefCell::new(Vec::new()),
                support_queries: RefCell::new(Vec::new()),
            }
        }

        pub fn present_queries(&self) -> Vec<(usize, u32)> {
            self.present_queries.borrow().clone()
        }

        pub fn support_queries(&self) -> Vec<usize> {
            self.support_queries.borrow().clone()
        }
    }

    impl DeviceProbe for FakeProbe {
        type Device = usize;

        fn physical_devices(&self) -> Result<Vec<usize>, SetupError> {
            Ok((0..self.devices.len()).collect())
        }

        fn device_name(&self, device: usize) -> String {
            format!("fake device {device}")
        }

        fn queue_families(&self, device: usize) -> Vec<vk::QueueFamilyProperties> {
            self.devices[device]
                .families
                .iter()
                .map(|(flags, _)| vk::QueueFamilyProperties {
                    queue_flags: *flags,
                    queue_count: 1,
                    ..Default::default()
                })
                .collect()
        }

        fn supports_present(&self, device: usize, family_index: u32) -> Result<bool, SetupError> {
            self.present_queries
                .borrow_mut()
                .push((device, family_index));
            Ok(self.devices[device].families[family_index as usize].1)
        }

        fn extension_names(&self, device: usize) -> Result<Vec<CString>, SetupError> {
            Ok(self.devices[device].extensions.clone())
        }

        fn surface_support(&self, device: usize) -> Result<SurfaceSupport, SetupError> {
            self.support_queries.borrow_mut().push(device);
            Ok(self.devices[device].support.clone())
        }
    }
}
