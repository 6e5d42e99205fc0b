// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use ash::vk;

use crate::prelude::*;

/// Synchronization for the single frame in flight.
///
/// Render-finished semaphores are per swapchain image.  The in-flight fence only covers the
/// submission, so a semaphore handed to present is only safe to signal again once that image has
/// been re-acquired.
pub struct FrameSync {
    pub image_available: vk::Semaphore,
    render_finished: Vec<vk::Semaphore>,
    pub in_flight: vk::Fence,
    device: ash::Device,
}

impl FrameSync {
    pub fn new(device: &ash::Device, image_count: usize) -> Result<Self, SetupError> {
        // Null handles are fine to destroy, so a partial failure cleans up through drop.
        let mut created = Self {
            image_available: vk::Semaphore::null(),
            render_finished: Vec::with_capacity(image_count),
            in_flight: vk::Fence::null(),
            device: device.clone(),
        };

        let semaphore_info = vk::SemaphoreCreateInfo::default();
        // Signaled so the first frame does not wait forever.
        let fence_info = vk::FenceCreateInfo {
            flags: vk::FenceCreateFlags::SIGNALED,
            ..Default::default()
        };

        unsafe {
            created.image_available = device
                .create_semaphore(&semaphore_info, None)
                .context("failed to create semaphore")?;
            for _ in 0..image_count {
                let semaphore = device
                    .create_semaphore(&semaphore_info, None)
                    .context("failed to create semaphore")?;
                created.render_finished.push(semaphore);
            }
            created.in_flight = device
                .create_fence(&fence_info, None)
                .context("failed to create fence")?;
        }

        Ok(created)
    }

    /// The semaphore signaled by rendering into swapchain image `image_index`.
    pub fn render_finished(&self, image_index: u32) -> vk::Semaphore {
        self.render_finished[image_index as usize]
    }

    /// Block until the previous frame's submission completes.
    pub fn wait_in_flight(&self) -> Result<(), SetupError> {
        unsafe { self.device.wait_for_fences(&[self.in_flight], true, u64::MAX) }
            .context("failed to wait for in-flight fence")
    }

    /// Unsignal the fence.  Only once a submission that signals it is certain to follow.
    pub fn reset_in_flight(&self) -> Result<(), SetupError> {
        unsafe { self.device.reset_fences(&[self.in_flight]) }
            .context("failed to reset in-flight fence")
    }
}

impl Drop for FrameSync {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.in_flight, None);
            for semaphore in &self.render_finished {
                self.device.destroy_semaphore(*semaphore, None);
            }
            self.device
                .destroy_semaphore(self.image_available, None);
        }
    }
}
