// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Command
//!
//! A pool on the graphics family and the one primary command buffer re-recorded every frame.

use ash::vk;

use crate::pipeline::GraphicsPipeline;
use crate::prelude::*;

pub const CLEAR_COLOR: vk::ClearValue = vk::ClearValue {
    color: vk::ClearColorValue {
        float32: [0.0, 0.0, 0.0, 1.0],
    },
};

pub struct Commands {
    pub command_pool: vk::CommandPool,
    pub command_buffer: vk::CommandBuffer,
    device: ash::Device,
}

impl Commands {
    pub fn new(device: &ash::Device, graphics_family: u32) -> Result<Self, SetupError> {
        let command_pool_ci = vk::CommandPoolCreateInfo {
            flags: vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER,
            queue_family_index: graphics_family,
            ..Default::default()
        };
        let command_pool = unsafe { device.create_command_pool(&command_pool_ci, None) }
            .context("failed to create command pool")?;

        // Buffers go away with the pool.
        let mut created = Self {
            command_pool,
            command_buffer: vk::CommandBuffer::null(),
            device: device.clone(),
        };

        let alloc_info = vk::CommandBufferAllocateInfo {
            command_pool,
            level: vk::CommandBufferLevel::PRIMARY,
            command_buffer_count: 1,
            ..Default::default()
        };
        created.command_buffer = unsafe { device.allocate_command_buffers(&alloc_info) }
            .context("failed to allocate command buffers")?[0];

        Ok(created)
    }

    /// Reset and record the whole frame: clear `framebuffer` and draw the triangle into it.
    pub fn record(
        &self,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        extent: vk::Extent2D,
        pipeline: &GraphicsPipeline,
    ) -> Result<(), SetupError> {
        let device = &self.device;
        let cb = self.command_buffer;

        unsafe {
            device
                .reset_command_buffer(cb, vk::CommandBufferResetFlags::empty())
                .context("failed to reset command buffer")?;
            device
                .begin_command_buffer(cb, &vk::CommandBufferBeginInfo::default())
                .context("failed to begin recording command buffer")?;
        }

        let clear_values = [CLEAR_COLOR];
        let render_pass_begin = vk::RenderPassBeginInfo::default()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .clear_values(&clear_values);

        unsafe {
            device.cmd_begin_render_pass(cb, &render_pass_begin, vk::SubpassContents::INLINE);
        }
        pipeline.draw(cb, extent);
        unsafe {
            device.cmd_end_render_pass(cb);
            device
                .end_command_buffer(cb)
                .context("failed to record command buffer")
        }
    }
}

impl Drop for Commands {
    fn drop(&mut self) {
        unsafe { self.device.destroy_command_pool(self.command_pool, None) };
    }
}
