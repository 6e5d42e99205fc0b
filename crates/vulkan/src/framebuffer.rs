// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use ash::vk;

use crate::prelude::*;

/// One framebuffer per swapchain image view, indexed the same way.
pub struct Framebuffers {
    pub framebuffers: Vec<vk::Framebuffer>,
    device: ash::Device,
}

impl Framebuffers {
    pub fn new(
        device: &ash::Device,
        render_pass: vk::RenderPass,
        image_views: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> Result<Self, SetupError> {
        let mut created = Self {
            framebuffers: Vec::with_capacity(image_views.len()),
            device: device.clone(),
        };

        for view in image_views {
            let attachments = [*view];
            let framebuffer_ci = vk::FramebufferCreateInfo::default()
                .render_pass(render_pass)
                .attachments(&attachments)
                .width(extent.width)
                .height(extent.height)
                .layers(1);

            let framebuffer = unsafe { device.create_framebuffer(&framebuffer_ci, None) }
                .context("failed to create framebuffer")?;
            created.framebuffers.push(framebuffer);
        }

        Ok(created)
    }
}

impl Drop for Framebuffers {
    fn drop(&mut self) {
        unsafe {
            self.framebuffers.iter().for_each(|fb| {
                self.device.destroy_framebuffer(*fb, None);
            });
        }
    }
}
