// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Queue
//!
//! Drawing needs a graphics capable queue family and presenting needs a family that can present
//! to our surface.  On most hardware one family does both, but nothing guarantees it, so the two
//! indices are tracked separately and only collapsed when creating queues and swapchain images.

use ash::vk;

use crate::prelude::*;
use crate::selection::DeviceProbe;

/// Queue family indices found so far while scanning a device.  Either may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scan the device's queue families in index order, keeping the first graphics family and the
    /// first family that can present to the probe's surface.  Presentation support is queried per
    /// index and is independent of the graphics flag.  Scanning stops once both are known.
    pub fn find<P: DeviceProbe>(probe: &P, device: P::Device) -> Result<Self, SetupError> {
        let mut indices = Self::default();

        for (index, family) in probe.queue_families(device).iter().enumerate() {
            let index = index as u32;

            if indices.graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            {
                indices.graphics = Some(index);
            }

            if indices.present.is_none() && probe.supports_present(device, index)? {
                indices.present = Some(index);
            }

            if indices.is_complete() {
                break;
            }
        }

        Ok(indices)
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    pub fn complete(&self) -> Option<QueueFamilies> {
        match (self.graphics, self.present) {
            (Some(graphics), Some(present)) => Some(QueueFamilies { graphics, present }),
            _ => None,
        }
    }
}

/// A complete queue family selection.  The indices may coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilies {
    /// Distinct family indices, one queue create info each.
    pub fn unique(&self) -> Vec<u32> {
        if self.graphics == self.present {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }

    pub fn queue_cis<'a>(&self, priorities: &'a [f32]) -> Vec<vk::DeviceQueueCreateInfo<'a>> {
        self.unique()
            .into_iter()
            .map(|index| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(index)
                    .queue_priorities(priorities)
            })
            .collect()
    }

    /// How swapchain images are shared between the graphics and present families.
    pub fn image_sharing(&self) -> ImageSharing {
        if self.graphics == self.present {
            ImageSharing::Exclusive
        } else {
            ImageSharing::Concurrent([self.graphics, self.present])
        }
    }
}

/// When one family does both jobs, exclusive ownership avoids any ownership transfer.  Otherwise
/// images are shared concurrently across exactly the two families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSharing {
    Exclusive,
    Concurrent([u32; 2]),
}

impl ImageSharing {
    pub fn mode(&self) -> vk::SharingMode {
        match self {
            ImageSharing::Exclusive => vk::SharingMode::EXCLUSIVE,
            ImageSharing::Concurrent(_) => vk::SharingMode::CONCURRENT,
        }
    }

    pub fn family_indices(&self) -> &[u32] {
        match self {
            ImageSharing::Exclusive => &[],
            ImageSharing::Concurrent(indices) => indices,
        }
    }
}

/// Queue handles retrieved from the logical device.
pub struct Queues {
    pub graphics: vk::Queue,
    pub present: vk::Queue,
    pub families: QueueFamilies,
}

impl Queues {
    pub fn new(device: &ash::Device, families: QueueFamilies) -> Self {
        // NOTE device owns queues.  Nothing to destroy.
        let (graphics, present) = unsafe {
            (
                device.get_device_queue(families.graphics, 0),
                device.get_device_queue(families.present, 0),
            )
        };
        Queues {
            graphics,
            present,
            families,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selection::test_probe::{FakeDevice, FakeProbe};

    fn family(flags: vk::QueueFlags, present: bool) -> (vk::QueueFlags, bool) {
        (flags, present)
    }

    #[test]
    fn test_scan_shared_family() {
        let probe = FakeProbe::new(vec![FakeDevice::with_families(vec![
            family(vk::QueueFlags::TRANSFER, false),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER, true),
        ])]);
        let indices = QueueFamilyIndices::find(&probe, 0).unwrap();
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(1));
    }

    #[test]
    fn test_scan_split_families() {
        let probe = FakeProbe::new(vec![FakeDevice::with_families(vec![
            family(vk::QueueFlags::GRAPHICS, false),
            family(vk::QueueFlags::TRANSFER, true),
        ])]);
        let indices = QueueFamilyIndices::find(&probe, 0).unwrap();
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, Some(1));
        assert_eq!(
            indices.complete().unwrap().image_sharing(),
            ImageSharing::Concurrent([0, 1])
        );
    }

    #[test]
    fn test_scan_keeps_first_match() {
        let probe = FakeProbe::new(vec![FakeDevice::with_families(vec![
            family(vk::QueueFlags::COMPUTE, true),
            family(vk::QueueFlags::GRAPHICS, true),
            family(vk::QueueFlags::GRAPHICS, true),
        ])]);
        let indices = QueueFamilyIndices::find(&probe, 0).unwrap();
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(0));
    }

    #[test]
    fn test_scan_stops_when_complete() {
        let probe = FakeProbe::new(vec![FakeDevice::with_families(vec![
            family(vk::QueueFlags::GRAPHICS, true),
            family(vk::QueueFlags::GRAPHICS, true),
            family(vk::QueueFlags::GRAPHICS, true),
        ])]);
        QueueFamilyIndices::find(&probe, 0).unwrap();
        assert_eq!(probe.present_queries(), vec![(0, 0)]);
    }

    #[test]
    fn test_scan_incomplete() {
        let probe = FakeProbe::new(vec![FakeDevice::with_families(vec![
            family(vk::QueueFlags::COMPUTE, true),
            family(vk::QueueFlags::TRANSFER, false),
        ])]);
        let indices = QueueFamilyIndices::find(&probe, 0).unwrap();
        assert_eq!(indices.graphics, None);
        assert_eq!(indices.present, Some(0));
        assert!(!indices.is_complete());
        assert!(indices.complete().is_none());
    }

    #[test]
    fn test_exclusive_sharing_has_no_family_list() {
        let families = QueueFamilies {
            graphics: 2,
            present: 2,
        };
        let sharing = families.image_sharing();
        assert_eq!(sharing.mode(), vk::SharingMode::EXCLUSIVE);
        assert!(sharing.family_indices().is_empty());
        assert_eq!(families.unique(), vec![2]);
    }

    #[test]
    fn test_concurrent_sharing_lists_both_families() {
        let families = QueueFamilies {
            graphics: 0,
            present: 3,
        };
        let sharing = families.image_sharing();
        assert_eq!(sharing.mode(), vk::SharingMode::CONCURRENT);
        assert_eq!(sharing.family_indices(), &[0, 3]);
        assert_eq!(families.queue_cis(&[1.0]).len(), 2);
    }
}
