// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

// The swapchain and its image views.  Images belong to the swapchain and are not destroyed by us,
// the views are.

use ash::vk;

use crate::instance::Instance;
use crate::prelude::*;
use crate::selection::SurfaceConfig;
use crate::surface::Surface;

pub struct Swapchain {
    pub swapchain: vk::SwapchainKHR,
    pub swapchain_loader: ash::khr::swapchain::Device,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
    pub format: vk::Format,
    pub extent: vk::Extent2D,

    device: ash::Device,
}

impl Swapchain {
    pub fn new(
        instance: &Instance,
        device: &ash::Device,
        surface: &Surface,
        config: &SurfaceConfig,
    ) -> Result<Self, SetupError> {
        let swapchain_loader = ash::khr::swapchain::Device::new(&instance.instance, device);

        let swapchain_ci = vk::SwapchainCreateInfoKHR::default()
            .surface(surface.surface)
            .min_image_count(config.image_count)
            .image_format(config.format.format)
            .image_color_space(config.format.color_space)
            .image_extent(config.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(config.sharing.mode())
            .queue_family_indices(config.sharing.family_indices())
            .pre_transform(config.pre_transform)
            .composite_alpha(config.composite_alpha)
            .present_mode(config.present_mode)
            .clipped(true);

        let swapchain = unsafe { swapchain_loader.create_swapchain(&swapchain_ci, None) }
            .context("failed to create swap chain")?;

        // From here on, drop cleans up whatever exists.
        let mut created = Self {
            swapchain,
            swapchain_loader,
            images: Vec::new(),
            image_views: Vec::new(),
            format: config.format.format,
            extent: config.extent,
            device: device.clone(),
        };

        created.images = unsafe { created.swapchain_loader.get_swapchain_images(swapchain) }
            .context("failed to get swap chain images")?;
        created.image_views.reserve(created.images.len());

        for &image in &created.images {
            let view_ci = vk::ImageViewCreateInfo {
                image,
                view_type: vk::ImageViewType::TYPE_2D,
                format: created.format,
                components: vk::ComponentMapping::default(),
                subresource_range: vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    level_count: 1,
                    layer_count: 1,
                    ..Default::default()
                },
                ..Default::default()
            };
            let view = unsafe { device.create_image_view(&view_ci, None) }
                .context("failed to create image views")?;
            created.image_views.push(view);
        }

        Ok(created)
    }

    /// Returns the image index and whether the swapchain no longer matches the surface exactly.
    pub fn acquire_next_image(&self, signal: vk::Semaphore) -> Result<(u32, bool), SetupError> {
        unsafe {
            self.swapchain_loader
                .acquire_next_image(self.swapchain, u64::MAX, signal, vk::Fence::null())
        }
        .context("failed to acquire swap chain image")
    }

    pub fn present(
        &self,
        queue: vk::Queue,
        image_index: u32,
        wait: vk::Semaphore,
    ) -> Result<bool, SetupError> {
        let wait_semaphores = [wait];
        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        unsafe { self.swapchain_loader.queue_present(queue, &present_info) }
            .context("failed to present swap chain image")
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for view in &self.image_views {
                self.device.destroy_image_view(*view, None);
            }
            self.swapchain_loader
                .destroy_swapchain(self.swapchain, None);
        }
    }
}
